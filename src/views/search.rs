use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

use super::{error_message, try_take, NavigationError, Navigator};
use crate::errors::ClientError;
use crate::events::{ErrorSignal, Event};
use crate::models::{Record, SearchCriteria};
use crate::routes::Route;
use crate::service::CatalogService;

/// Search form plus result list.
pub struct SearchView {
    service: Arc<CatalogService>,
    events_rx: Receiver<Event>,
    criteria: SearchCriteria,
    waiting: bool,
    records: Vec<Record>,
    error_msg: Option<String>,
}

impl SearchView {
    pub fn new(service: Arc<CatalogService>) -> Self {
        let events_rx = service.subscribe_events();
        Self {
            service,
            events_rx,
            criteria: SearchCriteria::default(),
            waiting: false,
            records: Vec::new(),
            error_msg: None,
        }
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn error_msg(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }

    /// Start a search and apply whatever it published.
    pub async fn search(&mut self, criteria: SearchCriteria) {
        self.criteria = criteria;
        self.waiting = true;
        self.service.find(&self.criteria).await;
        self.drain();
    }

    /// Apply all events already published, without waiting. Returns the
    /// number of events applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = try_take(&mut self.events_rx) {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next event. Returns `false` once the service is gone.
    pub async fn next_event(&mut self) -> bool {
        loop {
            match self.events_rx.recv().await {
                Ok(event) => {
                    if self.apply(event) {
                        return true;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("SearchView lagged behind by {} events", skipped);
                }
                Err(RecvError::Closed) => return false,
            }
        }
    }

    fn apply(&mut self, event: Event) -> bool {
        match event {
            Event::Records(records) => self.apply_records(records),
            Event::Error(signal) => self.apply_error(signal),
            Event::Record(_) => return false,
        }
        true
    }

    pub fn apply_records(&mut self, records: Vec<Record>) {
        self.reset();
        self.error_msg = None;
        self.records = records;
        tracing::debug!("SearchView: {} records", self.records.len());
    }

    pub fn apply_error(&mut self, signal: ErrorSignal) {
        self.reset();
        self.records.clear();
        self.error_msg = Some(error_message(&signal, self.service.catalog().nothing_found()));
        tracing::debug!("SearchView: error_msg={:?}", self.error_msg);
    }

    /// Open the details page of a record.
    pub fn select<N: Navigator>(
        &self,
        record: &Record,
        navigator: &N,
    ) -> Result<bool, NavigationError> {
        let id = record
            .id()
            .ok_or_else(|| NavigationError("record has no id".to_string()))?;
        navigator.navigate(&Route::Details(id.to_string()).path(self.service.catalog()))
    }

    /// Delete a record. It leaves the local list immediately, without
    /// waiting for the server or searching again.
    pub async fn remove(&mut self, record: &Record) -> Result<(), ClientError> {
        if !self.records.is_empty() {
            self.records.retain(|r| r.id() != record.id());
        }

        let outcome = self.service.remove(record).await;
        if let Err(err) = &outcome {
            tracing::error!("Fehler beim Loeschen: {}", err);
        }
        outcome
    }

    fn reset(&mut self) {
        self.criteria = SearchCriteria::default();
        self.waiting = false;
    }
}
