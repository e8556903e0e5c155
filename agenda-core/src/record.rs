//! Intake of raw event rows as stored by the data layer.
//!
//! Stored rows are loosely typed: timestamps are strings in a few different
//! shapes and the repeat value is free text. This module turns them into
//! [`Event`]s, skipping rows that cannot be used instead of failing the batch.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, AgendaResult};
use crate::event::Event;
use crate::recurrence::Recurrence;

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Row identifiers come back as either text or integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Text(s) => f.write_str(s),
            RecordId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// An event row before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "startTime", alias = "start_time")]
    pub start: Option<String>,
    #[serde(default, alias = "endTime", alias = "end_time")]
    pub end: Option<String>,
    #[serde(default, alias = "recurrence", alias = "repeatType")]
    pub repeat: Option<String>,
}

impl RawEvent {
    /// Validate this row. Returns `None` for rows without an id or with a
    /// missing or unreadable timestamp. An unknown repeat value degrades the
    /// event to non-repeating.
    pub fn to_event(&self) -> Option<Event> {
        let id = match &self.id {
            Some(id) => id.to_string(),
            None => String::new(),
        };
        if id.trim().is_empty() {
            tracing::warn!(title = ?self.title, "Skipping event record without an id");
            return None;
        }

        let Some(start) = self.start.as_deref().and_then(parse_timestamp) else {
            tracing::warn!(%id, start = ?self.start, "Skipping event record with unreadable start");
            return None;
        };
        let Some(end) = self.end.as_deref().and_then(parse_timestamp) else {
            tracing::warn!(%id, end = ?self.end, "Skipping event record with unreadable end");
            return None;
        };

        let recurrence = match self.repeat.as_deref() {
            None => Recurrence::None,
            Some(value) => Recurrence::parse(value).unwrap_or_else(|| {
                tracing::warn!(%id, repeat = value, "Unknown repeat value, treating as non-repeating");
                Recurrence::None
            }),
        };

        Some(Event {
            id,
            title: self.title.clone().unwrap_or_default(),
            description: self.description.clone().filter(|d| !d.is_empty()),
            start,
            end,
            recurrence,
        })
    }
}

impl From<&Event> for RawEvent {
    fn from(event: &Event) -> Self {
        RawEvent {
            id: Some(RecordId::Text(event.id.clone())),
            title: Some(event.title.clone()),
            description: event.description.clone(),
            start: Some(event.start.format("%Y-%m-%dT%H:%M:%S").to_string()),
            end: Some(event.end.format("%Y-%m-%dT%H:%M:%S").to_string()),
            repeat: Some(event.recurrence.to_string()),
        }
    }
}

/// Parse a stored timestamp as local wall-clock time.
///
/// RFC 3339 values keep their local clock reading and drop the offset.
/// A bare date means midnight.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Parse a JSON array of event rows.
///
/// Only a malformed document is an error. Rows that do not have the
/// expected shape are logged and skipped.
pub fn parse_records(json: &str) -> AgendaResult<Vec<Event>> {
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| AgendaError::Parse(e.to_string()))?;

    let events = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value::<RawEvent>(row) {
            Ok(raw) => raw.to_event(),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed event record");
                None
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(count = events.len(), "Parsed event records");
    Ok(events)
}

/// Read and parse an event file.
pub fn load_records(path: &Path) -> AgendaResult<Vec<Event>> {
    let content = std::fs::read_to_string(path)?;
    parse_records(&content)
}
