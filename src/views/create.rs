use std::sync::Arc;

use super::{Navigator, GENERIC_ERROR, HOME_PATH, NAVIGATION_FAILED};
use crate::errors::{ClientError, FieldError};
use crate::guard::Leavable;
use crate::models::{Record, RecordForm};
use crate::service::CatalogService;

/// Form for a new record. Guarded against leaving before it was saved.
pub struct CreateView {
    service: Arc<CatalogService>,
    finished: bool,
    show_warning: bool,
    error_msg: Option<String>,
    field_errors: Vec<FieldError>,
}

impl CreateView {
    pub fn new(service: Arc<CatalogService>) -> Self {
        Self {
            service,
            finished: false,
            show_warning: false,
            error_msg: None,
            field_errors: Vec::new(),
        }
    }

    pub fn title(&self) -> &'static str {
        self.service.catalog().create_title()
    }

    pub fn show_warning(&self) -> bool {
        self.show_warning
    }

    pub fn error_msg(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// Validate and send the form, then return to the start page.
    /// Returns the `Location` of the new record.
    pub async fn save<N: Navigator>(
        &mut self,
        form: RecordForm,
        navigator: &N,
    ) -> Result<Option<String>, ClientError> {
        self.field_errors.clear();

        let mut record = match Record::from_form(form) {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!("CreateView::save(): invalid form: {}", err);
                self.field_errors = err.field_errors();
                return Err(err);
            }
        };

        let location = match self.service.save(&mut record).await {
            Ok(location) => location,
            Err(err) => {
                if let ClientError::Http { body, .. } = &err {
                    self.error_msg = Some(match body {
                        Some(serde_json::Value::String(text)) => text.clone(),
                        _ => GENERIC_ERROR.to_string(),
                    });
                    self.field_errors = err.field_errors();
                }
                return Err(err);
            }
        };

        self.finished = true;
        self.show_warning = false;
        match navigator.navigate(HOME_PATH) {
            Ok(true) => self.error_msg = None,
            Ok(false) | Err(_) => {
                tracing::error!("CreateView::save(): navigation failed");
                self.error_msg = Some(NAVIGATION_FAILED.to_string());
            }
        }
        Ok(location)
    }
}

impl Leavable for CreateView {
    fn is_finished(&self) -> bool {
        self.finished
    }

    fn set_finished(&mut self, finished: bool) {
        self.finished = finished;
    }

    fn set_show_warning(&mut self, show_warning: bool) {
        self.show_warning = show_warning;
    }
}
