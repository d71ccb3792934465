//! Data-access service: the only boundary between the views and the backend.
//!
//! `find` and `find_by_id` report through the broadcast channels and never
//! fail; mutating operations return their outcome directly.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::broadcast;

use crate::cache::RecordCache;
use crate::client::{CatalogClient, Fetched};
use crate::config::Config;
use crate::errors::ClientError;
use crate::events::{Channels, ErrorSignal, Event};
use crate::models::{parse_etag, Catalog, ChartConfig, ChartType, Record, SearchCriteria};

pub struct CatalogService {
    catalog: Catalog,
    client: CatalogClient,
    cache: Mutex<RecordCache>,
    channels: Channels,
}

impl CatalogService {
    pub fn new(config: &Config, catalog: Catalog) -> Result<Self, ClientError> {
        let client = CatalogClient::new(config, catalog)?;
        Ok(Self::with_client(catalog, client, RecordCache::new(config.cache_capacity)))
    }

    pub fn with_client(catalog: Catalog, client: CatalogClient, cache: RecordCache) -> Self {
        tracing::info!(
            "CatalogService: catalog={}, base_uri={}",
            catalog.as_str(),
            client.base_uri()
        );
        Self {
            catalog,
            client,
            cache: Mutex::new(cache),
            channels: Channels::new(),
        }
    }

    pub fn catalog(&self) -> Catalog {
        self.catalog
    }

    pub fn subscribe_records(&self) -> broadcast::Receiver<Vec<Record>> {
        self.channels.subscribe_records()
    }

    pub fn subscribe_record(&self) -> broadcast::Receiver<Record> {
        self.channels.subscribe_record()
    }

    pub fn subscribe_errors(&self) -> broadcast::Receiver<ErrorSignal> {
        self.channels.subscribe_errors()
    }

    /// Every publish of this service, in order.
    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.channels.subscribe_events()
    }

    fn cache(&self) -> MutexGuard<'_, RecordCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The cached copy of a record, if one with a version is held.
    pub fn cached(&self, id: &str) -> Option<Record> {
        self.cache().get(id).cloned()
    }

    pub fn invalidate(&self, id: &str) {
        self.cache().invalidate(id);
    }

    pub fn clear_cache(&self) {
        self.cache().clear();
    }

    /// Search records and publish the result list, or an error signal.
    pub async fn find(&self, criteria: &SearchCriteria) {
        tracing::debug!("CatalogService::find(): criteria={:?}", criteria);
        let ticket = self.channels.searches.begin();

        let outcome = self.client.list(criteria).await;
        if !self.channels.searches.is_current(ticket) {
            tracing::debug!("CatalogService::find(): dropping stale result {}", ticket);
            return;
        }

        match outcome {
            Ok(payloads) => {
                let records = payloads
                    .into_iter()
                    .map(|payload| Record::from_server(payload, None))
                    .collect();
                self.channels.publish_records(records);
            }
            Err(err) => {
                tracing::debug!("CatalogService::find(): {}", err);
                self.channels.publish_error(ErrorSignal::from(&err));
            }
        }
    }

    /// Look up a record by identifier and publish it on the record channel.
    ///
    /// A cached, versioned copy is published without a request. `None` does
    /// nothing. A response without body or `ETag` publishes nothing.
    pub async fn find_by_id(&self, id: Option<&str>) {
        tracing::debug!("CatalogService::find_by_id(): id={:?}", id);

        let Some(id) = id else {
            tracing::debug!("CatalogService::find_by_id(): no id");
            return;
        };

        let ticket = self.channels.lookups.begin();
        if let Some(record) = self.cached(id) {
            tracing::debug!(
                "CatalogService::find_by_id(): cached, version={:?}",
                record.version()
            );
            self.channels.publish_record(record);
            return;
        }

        let outcome = self.client.get(id).await;
        if !self.channels.lookups.is_current(ticket) {
            tracing::debug!("CatalogService::find_by_id(): dropping stale result {}", ticket);
            return;
        }

        match outcome {
            Ok(Fetched { payload, etag }) => {
                let Some(payload) = payload else {
                    tracing::warn!("CatalogService::find_by_id(): empty body for {}", id);
                    return;
                };
                let Some(etag) = etag else {
                    tracing::warn!("CatalogService::find_by_id(): no ETag for {}", id);
                    return;
                };
                let record = Record::from_server(payload, Some(&etag));
                self.cache().insert(record.clone());
                self.channels.publish_record(record);
            }
            Err(err) => {
                tracing::debug!("CatalogService::find_by_id(): {}", err);
                self.channels.publish_error(ErrorSignal::from(&err));
            }
        }
    }

    /// Create a record, stamping its creation date. Returns the `Location`
    /// of the new resource.
    pub async fn save(&self, record: &mut Record) -> Result<Option<String>, ClientError> {
        record.datum = Some(Utc::now());
        tracing::debug!("CatalogService::save(): record={:?}", record);

        match self.client.create(&record.to_payload()).await {
            Ok(location) => {
                tracing::info!("Created record at {:?}", location);
                Ok(location)
            }
            Err(err) => {
                log_failure("save", &err);
                Err(err)
            }
        }
    }

    /// Replace a record on the server using its version as precondition.
    ///
    /// Without a version nothing is sent. On success the local version is
    /// advanced to the server's new version and the cache refreshed. A version
    /// that cannot be advanced is dropped, so the record must be looked up
    /// again before the next update.
    pub async fn update(&self, record: &mut Record) -> Result<(), ClientError> {
        let Some(version) = record.version() else {
            tracing::error!("No version for record {:?}", record.id());
            return Err(ClientError::MissingVersion(record.id().map(str::to_string)));
        };
        let Some(id) = record.id().map(str::to_string) else {
            tracing::error!("No id for record with version {}", version);
            return Err(ClientError::MissingId);
        };
        tracing::debug!("CatalogService::update(): id={}, version={}", id, version);

        match self.client.replace(&id, version, &record.to_payload()).await {
            Ok(etag) => {
                let next = etag
                    .as_deref()
                    .and_then(parse_etag)
                    .or_else(|| version.checked_add(1));
                match next {
                    Some(next) => {
                        record.set_version(next);
                        self.cache().insert(record.clone());
                    }
                    None => {
                        tracing::error!(
                            "Version {} of record {} cannot be advanced",
                            version,
                            id
                        );
                        record.clear_version();
                        self.invalidate(&id);
                    }
                }
                Ok(())
            }
            Err(err) => {
                log_failure("update", &err);
                Err(err)
            }
        }
    }

    /// Delete a record by identifier and drop it from the cache.
    pub async fn remove(&self, record: &Record) -> Result<(), ClientError> {
        let Some(id) = record.id() else {
            tracing::error!("Cannot delete a record without id");
            return Err(ClientError::MissingId);
        };
        tracing::debug!("CatalogService::remove(): id={}", id);

        match self.client.delete(id).await {
            Ok(()) => {
                self.invalidate(id);
                Ok(())
            }
            Err(err) => {
                log_failure("remove", &err);
                Err(err)
            }
        }
    }

    /// Ratings of all records shaped for the given chart type.
    pub async fn chart(&self, chart_type: ChartType) -> Result<ChartConfig, ClientError> {
        tracing::debug!("CatalogService::chart(): type={:?}", chart_type);
        let payloads = self.client.list(&SearchCriteria::default()).await?;
        Ok(ChartConfig::from_payloads(chart_type, &payloads))
    }

    pub async fn bar_chart(&self) -> Result<ChartConfig, ClientError> {
        self.chart(ChartType::Bar).await
    }

    pub async fn line_chart(&self) -> Result<ChartConfig, ClientError> {
        self.chart(ChartType::Line).await
    }

    pub async fn pie_chart(&self) -> Result<ChartConfig, ClientError> {
        self.chart(ChartType::Pie).await
    }
}

fn log_failure(operation: &str, err: &ClientError) {
    match err {
        ClientError::Network(msg) => {
            tracing::error!("{}: client-side or network error: {}", operation, msg)
        }
        ClientError::Http { status, body } => {
            tracing::debug!("{}: status={}, body={:?}", operation, status, body)
        }
        other => tracing::error!("{}: {}", operation, other),
    }
}
