//! HTTP transport for one catalog resource.
//!
//! Every call returns `Result`; turning failures into channel events is the
//! job of the service layer.

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};

use crate::config::Config;
use crate::errors::ClientError;
use crate::models::{Catalog, RecordPayload, SearchCriteria};

/// Body and entity tag of a single-record GET.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub payload: Option<RecordPayload>,
    pub etag: Option<String>,
}

/// REST client bound to `{base_uri}/{resource}`.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_uri: String,
}

impl CatalogClient {
    /// Create a client for one feature area from the configuration.
    pub fn new(config: &Config, catalog: Catalog) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.api_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ClientError::Config(format!("Invalid API token: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let base_uri = format!(
            "{}/{}",
            config.base_uri.trim_end_matches('/'),
            catalog.resource_path(config)
        );
        reqwest::Url::parse(&base_uri)
            .map_err(|e| ClientError::Config(format!("Invalid base URI {}: {}", base_uri, e)))?;

        tracing::debug!("CatalogClient::new(): base_uri={}", base_uri);
        Ok(Self { http, base_uri })
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    fn record_uri(&self, id: &str) -> String {
        format!("{}/{}", self.base_uri, id)
    }

    /// GET the list of records matching the criteria.
    pub async fn list(&self, criteria: &SearchCriteria) -> Result<Vec<RecordPayload>, ClientError> {
        let params = criteria.to_query_params();
        tracing::debug!("CatalogClient::list(): uri={}, params={:?}", self.base_uri, params);

        let response = self.http.get(&self.base_uri).query(&params).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// GET a single record together with its `ETag`.
    pub async fn get(&self, id: &str) -> Result<Fetched, ClientError> {
        let uri = self.record_uri(id);
        tracing::debug!("CatalogClient::get(): uri={}", uri);

        let response = self.http.get(&uri).send().await?;
        let response = check_status(response).await?;
        let etag = header_string(response.headers(), header::ETAG);

        let bytes = response.bytes().await?;
        let payload = if bytes.is_empty() {
            None
        } else {
            serde_json::from_slice::<Option<RecordPayload>>(&bytes)?
        };

        Ok(Fetched { payload, etag })
    }

    /// POST a new record; returns the `Location` of the created resource.
    pub async fn create(&self, payload: &RecordPayload) -> Result<Option<String>, ClientError> {
        tracing::debug!("CatalogClient::create(): payload={:?}", payload);

        let response = self
            .http
            .post(&self.base_uri)
            .header(header::ACCEPT, "text/plain")
            .json(payload)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(header_string(response.headers(), header::LOCATION))
    }

    /// PUT a record guarded by `If-Match: "<version>"`. Returns the new
    /// `ETag` if the server sent one.
    pub async fn replace(
        &self,
        id: &str,
        version: u32,
        payload: &RecordPayload,
    ) -> Result<Option<String>, ClientError> {
        let uri = self.record_uri(id);
        tracing::debug!("CatalogClient::replace(): uri={}, version={}", uri, version);

        let response = self
            .http
            .put(&uri)
            .header(header::ACCEPT, "text/plain")
            .header(header::IF_MATCH, format!("\"{}\"", version))
            .json(payload)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(header_string(response.headers(), header::ETAG))
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let uri = self.record_uri(id);
        tracing::debug!("CatalogClient::delete(): uri={}", uri);

        let response = self.http.delete(&uri).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Turn a non-success response into `ClientError::Http`, keeping its body:
/// parsed as JSON when possible, as plain text otherwise.
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body = if text.trim().is_empty() {
        None
    } else {
        Some(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
    };

    if status == StatusCode::NOT_FOUND {
        tracing::debug!("Not found: status={}", status);
    } else {
        tracing::debug!("Error response: status={}, body={:?}", status, body);
    }
    Err(ClientError::Http {
        status: status.as_u16(),
        body,
    })
}
