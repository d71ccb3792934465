use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

use super::{error_message, try_take, GENERIC_ERROR};
use crate::events::{ErrorSignal, Event};
use crate::models::Record;
use crate::service::CatalogService;

/// Read-only page of one record.
pub struct DetailsView {
    service: Arc<CatalogService>,
    events_rx: Receiver<Event>,
    waiting: bool,
    record: Option<Record>,
    error_msg: Option<String>,
    title: String,
}

impl DetailsView {
    pub fn new(service: Arc<CatalogService>) -> Self {
        let events_rx = service.subscribe_events();
        Self {
            service,
            events_rx,
            waiting: true,
            record: None,
            error_msg: None,
            title: "Details".to_string(),
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub fn record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    pub fn error_msg(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Look up the record named by the `:id` path parameter.
    pub async fn load(&mut self, id: Option<&str>) {
        self.service.find_by_id(id).await;
        self.drain();
    }

    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = try_take(&mut self.events_rx) {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    pub async fn next_event(&mut self) -> bool {
        loop {
            match self.events_rx.recv().await {
                Ok(event) => {
                    if self.apply(event) {
                        return true;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("DetailsView lagged behind by {} events", skipped);
                }
                Err(RecvError::Closed) => return false,
            }
        }
    }

    fn apply(&mut self, event: Event) -> bool {
        match event {
            Event::Record(record) => self.apply_record(record),
            Event::Error(signal) => self.apply_error(signal),
            Event::Records(_) => return false,
        }
        true
    }

    pub fn apply_record(&mut self, record: Record) {
        self.waiting = false;
        self.error_msg = None;
        self.title = match record.id() {
            Some(id) => format!("Details {}", id),
            None => "Details".to_string(),
        };
        self.record = Some(record);
    }

    pub fn apply_error(&mut self, signal: ErrorSignal) {
        self.waiting = false;
        match signal {
            ErrorSignal::Unknown => self.error_msg = Some(GENERIC_ERROR.to_string()),
            ErrorSignal::Message(text) => self.error_msg = Some(text),
            signal => {
                self.error_msg = Some(error_message(&signal, self.service.catalog().not_found()));
                self.title = "Fehler".to_string();
            }
        }
        tracing::debug!("DetailsView: error_msg={:?}", self.error_msg);
    }
}
