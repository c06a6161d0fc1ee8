//! The insert payload.
//!
//! Field names follow the Calendar API wire shape (`dateTime`,
//! `timeZone`) so the payload serializes directly to the body the
//! `events.insert` operation expects.

use chrono::NaiveDateTime;
use serde::Serialize;

const STAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A wall-clock timestamp paired with the zone label it is read in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZonedTimestamp {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

impl ZonedTimestamp {
    pub fn new(stamp: NaiveDateTime, time_zone: &str) -> Self {
        ZonedTimestamp {
            date_time: stamp.format(STAMP_FORMAT).to_string(),
            time_zone: time_zone.to_string(),
        }
    }
}

/// Request body for the remote insert operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventPayload {
    pub summary: String,
    pub description: String,
    pub start: ZonedTimestamp,
    pub end: ZonedTimestamp,
}
