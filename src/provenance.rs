//! Provenance reporting for records modified by a processor.
//!
//! Processors hand a [`ProvenanceEvent`] to the injected [`ProvenanceReporter`] next to every
//! successful transfer. What happens to the event (persisted, forwarded to an audit trail, logged)
//! is up to the reporter.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProvenanceEventType {
    AttributesModified,
    ContentModified,
}

/// A single change made to a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceEvent {
    pub event_type: ProvenanceEventType,
    pub record_uuid: Uuid,
    pub component: String,
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ProvenanceEvent {
    pub fn attributes_modified(
        record: &Record,
        component: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            event_type: ProvenanceEventType::AttributesModified,
            record_uuid: record.uuid(),
            component: component.into(),
            details: Some(details.into()),
            timestamp: Utc::now(),
        }
    }

    pub fn content_modified(record: &Record, component: impl Into<String>) -> Self {
        Self {
            event_type: ProvenanceEventType::ContentModified,
            record_uuid: record.uuid(),
            component: component.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }
}

/// Receiver of provenance events.
pub trait ProvenanceReporter: Send + Sync {
    fn report(&self, event: ProvenanceEvent);
}

/// Writes every event to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProvenanceReporter for TracingReporter {
    fn report(&self, event: ProvenanceEvent) {
        info!(
            event_type = ?event.event_type,
            record = %event.record_uuid,
            component = %event.component,
            details = event.details.as_deref().unwrap_or_default(),
            "Provenance event"
        );
    }
}

/// Keeps events in memory, in the order they were reported.
#[derive(Debug, Default)]
pub struct ProvenanceLog {
    events: Mutex<Vec<ProvenanceEvent>>,
}

impl ProvenanceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every event reported so far.
    pub fn events(&self) -> Vec<ProvenanceEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProvenanceReporter for ProvenanceLog {
    fn report(&self, event: ProvenanceEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
