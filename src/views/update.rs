use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

use super::{error_message, try_take, Navigator, HOME_PATH};
use crate::errors::ClientError;
use crate::events::{ErrorSignal, Event};
use crate::models::{Record, StammdatenUpdate};
use crate::service::CatalogService;

/// Edit page with the master data and keyword sub-forms.
pub struct UpdateView {
    service: Arc<CatalogService>,
    events_rx: Receiver<Event>,
    record: Option<Record>,
    error_msg: Option<String>,
}

impl UpdateView {
    pub const TITLE: &'static str = "Aktualisieren";

    pub fn new(service: Arc<CatalogService>) -> Self {
        let events_rx = service.subscribe_events();
        Self {
            service,
            events_rx,
            record: None,
            error_msg: None,
        }
    }

    pub fn record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    pub fn error_msg(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }

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
                    tracing::warn!("UpdateView lagged behind by {} events", skipped);
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
        self.error_msg = None;
        self.record = Some(record);
    }

    pub fn apply_error(&mut self, signal: ErrorSignal) {
        self.record = None;
        self.error_msg = Some(error_message(&signal, self.service.catalog().not_present()));
        tracing::debug!("UpdateView: error_msg={:?}", self.error_msg);
    }

    /// Apply new master data and send the whole record back.
    pub async fn update_stammdaten<N: Navigator>(
        &mut self,
        update: StammdatenUpdate,
        navigator: &N,
    ) -> Result<(), ClientError> {
        let Some(record) = self.record.as_mut() else {
            tracing::error!("UpdateView::update_stammdaten(): no record loaded");
            return Ok(());
        };
        record.update_stammdaten(update);
        self.send(navigator).await
    }

    /// Apply the keyword checkboxes and send the whole record back. An
    /// untouched form sends nothing.
    pub async fn update_schlagwoerter<N: Navigator>(
        &mut self,
        javascript: bool,
        typescript: bool,
        pristine: bool,
        navigator: &N,
    ) -> Result<(), ClientError> {
        if pristine {
            tracing::debug!("UpdateView::update_schlagwoerter(): no changes");
            return Ok(());
        }
        let Some(record) = self.record.as_mut() else {
            tracing::error!("UpdateView::update_schlagwoerter(): no record loaded");
            return Ok(());
        };
        record.update_schlagwoerter(javascript, typescript);
        self.send(navigator).await
    }

    async fn send<N: Navigator>(&mut self, navigator: &N) -> Result<(), ClientError> {
        let Some(record) = self.record.as_mut() else {
            return Ok(());
        };

        if let Err(err) = self.service.update(record).await {
            tracing::error!("UpdateView: update failed: {}", err);
            return Err(err);
        }

        match navigator.navigate(HOME_PATH) {
            Ok(true) => tracing::debug!("UpdateView: navigated to {}", HOME_PATH),
            Ok(false) | Err(_) => tracing::error!("UpdateView: navigation failed"),
        }
        Ok(())
    }
}
