//! Broadcast channels shared by the views.
//!
//! A view subscribes by holding a [`broadcast::Receiver`] and unsubscribes by
//! dropping it. Every publish also goes out on the [`Event`] stream, which
//! keeps the publish order across kinds. Each request kind carries a
//! [`Sequencer`] so that a response arriving after a newer request was started
//! is never published.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

use crate::errors::{ClientError, NETWORK_ERROR_CODE};
use crate::models::Record;

/// Buffered events per channel before slow receivers start lagging.
pub const CHANNEL_CAPACITY: usize = 16;

/// Error value pushed onto the error channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorSignal {
    /// HTTP status of a failed response
    Status(u16),
    /// No response was obtained
    Network,
    /// Message shown verbatim
    Message(String),
    Unknown,
}

impl ErrorSignal {
    pub fn code(&self) -> Option<i32> {
        match self {
            ErrorSignal::Status(status) => Some(i32::from(*status)),
            ErrorSignal::Network => Some(NETWORK_ERROR_CODE),
            _ => None,
        }
    }
}

impl From<&ClientError> for ErrorSignal {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::Network(_) => ErrorSignal::Network,
            ClientError::Http { status, .. } => ErrorSignal::Status(*status),
            _ => ErrorSignal::Unknown,
        }
    }
}

/// Any publish, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Records(Vec<Record>),
    Record(Record),
    Error(ErrorSignal),
}

/// Hands out increasing tickets; only the latest ticket is current.
#[derive(Debug, Default)]
pub struct Sequencer {
    latest: AtomicU64,
}

impl Sequencer {
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}

/// The result, record and error channels of one catalog service.
#[derive(Debug)]
pub struct Channels {
    records: broadcast::Sender<Vec<Record>>,
    record: broadcast::Sender<Record>,
    errors: broadcast::Sender<ErrorSignal>,
    events: broadcast::Sender<Event>,
    pub(crate) searches: Sequencer,
    pub(crate) lookups: Sequencer,
}

impl Channels {
    pub fn new() -> Self {
        let (records, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (record, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (errors, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (events, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            records,
            record,
            errors,
            events,
            searches: Sequencer::default(),
            lookups: Sequencer::default(),
        }
    }

    pub fn subscribe_records(&self) -> broadcast::Receiver<Vec<Record>> {
        self.records.subscribe()
    }

    pub fn subscribe_record(&self) -> broadcast::Receiver<Record> {
        self.record.subscribe()
    }

    pub fn subscribe_errors(&self) -> broadcast::Receiver<ErrorSignal> {
        self.errors.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    fn publish_event(&self, event: Event) {
        if self.events.send(event).is_err() {
            tracing::trace!("No subscribers for events");
        }
    }

    pub fn publish_records(&self, records: Vec<Record>) {
        self.publish_event(Event::Records(records.clone()));
        if self.records.send(records).is_err() {
            tracing::trace!("No subscribers for search results");
        }
    }

    pub fn publish_record(&self, record: Record) {
        self.publish_event(Event::Record(record.clone()));
        if self.record.send(record).is_err() {
            tracing::trace!("No subscribers for record");
        }
    }

    pub fn publish_error(&self, signal: ErrorSignal) {
        self.publish_event(Event::Error(signal.clone()));
        if self.errors.send(signal).is_err() {
            tracing::trace!("No subscribers for errors");
        }
    }
}

impl Default for Channels {
    fn default() -> Self {
        Self::new()
    }
}
