//! Normalization of a submitted draft into concrete timestamps.
//!
//! This is the one place where the user's raw field strings become
//! `NaiveDateTime`s. The rules:
//!
//! - all-day items (flag set, or the marker phrase in the description)
//!   span 00:00:00–23:59:59 on the start date; time fields are ignored
//! - tasks are instants: end == start
//! - events end at the supplied end time on the same date, or at the
//!   start when no end time is given

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{BuildError, BuildResult};
use crate::item::{ItemDraft, ItemKind};
use crate::payload::{EventPayload, ZonedTimestamp};

/// Description text that forces a full-day span, matched case-insensitively.
pub const FULL_DAY_MARKER: &str = "full day activity";

const DATE_FORMAT: &str = "%m-%d-%Y";
const TIME_FORMAT: &str = "%I:%M %p";

/// A draft resolved into concrete timestamps plus the insert payload.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltItem {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub payload: EventPayload,
}

/// Normalize a draft against the configured zone label.
///
/// Pure: the only outcome is a `BuiltItem` or a `BuildError`. The caller
/// decides what to do with either.
pub fn build(draft: &ItemDraft, time_zone: &str) -> BuildResult<BuiltItem> {
    let date = parse_date(&draft.start_date)?;

    let (start, end) = if draft.all_day || has_full_day_marker(&draft.description) {
        full_day_span(date)
    } else {
        let start = date.and_time(parse_time(draft.start_time.as_deref())?);

        let end = match (draft.kind, draft.end_time.as_deref()) {
            (ItemKind::Event, Some(end_time)) if !end_time.trim().is_empty() => {
                date.and_time(parse_time(Some(end_time))?)
            }
            // Tasks are instants; events without an end time collapse to one
            _ => start,
        };

        (start, end)
    };

    let payload = EventPayload {
        summary: draft.name.clone(),
        description: draft.description.clone(),
        start: ZonedTimestamp::new(start, time_zone),
        end: ZonedTimestamp::new(end, time_zone),
    };

    Ok(BuiltItem { start, end, payload })
}

/// Check the description for the full-day marker phrase.
pub fn has_full_day_marker(description: &str) -> bool {
    description.to_lowercase().contains(FULL_DAY_MARKER)
}

fn full_day_span(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    (
        date.and_time(NaiveTime::MIN),
        date.and_hms_opt(23, 59, 59).unwrap(),
    )
}

/// Parse MM-DD-YYYY.
pub fn parse_date(input: &str) -> BuildResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| BuildError::InvalidDate(input.to_string()))
}

/// Parse HH:MM AM/PM. A missing or empty field is rejected the same way
/// as a malformed one.
pub fn parse_time(input: Option<&str>) -> BuildResult<NaiveTime> {
    let input = input.unwrap_or_default();

    NaiveTime::parse_from_str(input.trim(), TIME_FORMAT)
        .map_err(|_| BuildError::InvalidTime(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(kind: ItemKind) -> ItemDraft {
        ItemDraft {
            kind,
            name: "Dentist".to_string(),
            description: "Checkup".to_string(),
            start_date: "03-15-2024".to_string(),
            start_time: Some("02:30 PM".to_string()),
            end_time: Some("03:00 PM".to_string()),
            all_day: false,
        }
    }

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    // --- timed events ---

    #[test]
    fn event_uses_start_and_end_times() {
        let built = build(&draft(ItemKind::Event), "America/New_York").unwrap();

        assert_eq!(built.start, ymd_hms(2024, 3, 15, 14, 30, 0));
        assert_eq!(built.end, ymd_hms(2024, 3, 15, 15, 0, 0));
        assert_eq!(built.payload.start.date_time, "2024-03-15T14:30:00");
        assert_eq!(built.payload.end.date_time, "2024-03-15T15:00:00");
        assert_eq!(built.payload.start.time_zone, "America/New_York");
        assert_eq!(built.payload.end.time_zone, "America/New_York");
        assert_eq!(built.payload.summary, "Dentist");
        assert_eq!(built.payload.description, "Checkup");
    }

    #[test]
    fn event_without_end_time_collapses_to_start() {
        let mut d = draft(ItemKind::Event);
        d.end_time = None;

        let built = build(&d, "America/New_York").unwrap();
        assert_eq!(built.end, built.start);
    }

    #[test]
    fn event_with_blank_end_time_collapses_to_start() {
        let mut d = draft(ItemKind::Event);
        d.end_time = Some("   ".to_string());

        let built = build(&d, "America/New_York").unwrap();
        assert_eq!(built.end, built.start);
    }

    // --- tasks ---

    #[test]
    fn task_end_equals_start_even_with_end_time() {
        let built = build(&draft(ItemKind::Task), "America/New_York").unwrap();

        assert_eq!(built.start, ymd_hms(2024, 3, 15, 14, 30, 0));
        assert_eq!(built.end, built.start);
    }

    // --- all-day spans ---

    #[test]
    fn all_day_flag_spans_whole_date() {
        let mut d = draft(ItemKind::Event);
        d.all_day = true;

        let built = build(&d, "America/New_York").unwrap();
        assert_eq!(built.start, ymd_hms(2024, 3, 15, 0, 0, 0));
        assert_eq!(built.end, ymd_hms(2024, 3, 15, 23, 59, 59));
    }

    #[test]
    fn all_day_ignores_time_fields_entirely() {
        // Even a malformed time must not matter when the flag is set
        let mut d = draft(ItemKind::Event);
        d.all_day = true;
        d.start_time = Some("25:00 AM".to_string());
        d.end_time = Some("garbage".to_string());

        let built = build(&d, "America/New_York").unwrap();
        assert_eq!(built.start, ymd_hms(2024, 3, 15, 0, 0, 0));
        assert_eq!(built.end, ymd_hms(2024, 3, 15, 23, 59, 59));
    }

    #[test]
    fn marker_phrase_forces_full_day_span() {
        let mut d = draft(ItemKind::Event);
        d.description = "Team offsite, Full Day Activity downtown".to_string();

        let built = build(&d, "America/New_York").unwrap();
        assert_eq!(built.start, ymd_hms(2024, 3, 15, 0, 0, 0));
        assert_eq!(built.end, ymd_hms(2024, 3, 15, 23, 59, 59));
    }

    #[test]
    fn marker_phrase_is_case_insensitive() {
        assert!(has_full_day_marker("FULL DAY ACTIVITY"));
        assert!(has_full_day_marker("a full day activity."));
        assert!(has_full_day_marker("Full Day Activity"));
        assert!(!has_full_day_marker("full day"));
        assert!(!has_full_day_marker("activity"));
    }

    // --- parse failures ---

    #[test]
    fn malformed_date_is_rejected() {
        let mut d = draft(ItemKind::Event);
        d.start_date = "13-45-2024".to_string();

        assert_eq!(
            build(&d, "America/New_York"),
            Err(BuildError::InvalidDate("13-45-2024".to_string()))
        );
    }

    #[test]
    fn iso_ordered_date_is_rejected() {
        // Month-day-year order only
        let mut d = draft(ItemKind::Event);
        d.start_date = "2024-03-15".to_string();

        assert!(matches!(
            build(&d, "America/New_York"),
            Err(BuildError::InvalidDate(_))
        ));
    }

    #[test]
    fn malformed_start_time_is_rejected() {
        let mut d = draft(ItemKind::Event);
        d.start_time = Some("25:00 AM".to_string());

        assert_eq!(
            build(&d, "America/New_York"),
            Err(BuildError::InvalidTime("25:00 AM".to_string()))
        );
    }

    #[test]
    fn twenty_four_hour_time_is_rejected() {
        // No AM/PM marker
        let mut d = draft(ItemKind::Event);
        d.start_time = Some("14:30".to_string());

        assert!(matches!(
            build(&d, "America/New_York"),
            Err(BuildError::InvalidTime(_))
        ));
    }

    #[test]
    fn missing_start_time_for_timed_item_is_rejected() {
        let mut d = draft(ItemKind::Event);
        d.start_time = None;

        assert!(matches!(
            build(&d, "America/New_York"),
            Err(BuildError::InvalidTime(_))
        ));
    }

    #[test]
    fn malformed_end_time_is_rejected() {
        let mut d = draft(ItemKind::Event);
        d.end_time = Some("3 o'clock".to_string());

        assert!(matches!(
            build(&d, "America/New_York"),
            Err(BuildError::InvalidTime(_))
        ));
    }

    #[test]
    fn task_ignores_malformed_end_time() {
        // End times are never read for tasks
        let mut d = draft(ItemKind::Task);
        d.end_time = Some("garbage".to_string());

        assert!(build(&d, "America/New_York").is_ok());
    }

    // --- parse helpers ---

    #[test]
    fn parse_date_accepts_padding() {
        assert_eq!(
            parse_date(" 03-15-2024 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn parse_time_accepts_noon_and_midnight() {
        assert_eq!(
            parse_time(Some("12:00 PM")).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap()
        );
        assert_eq!(
            parse_time(Some("12:00 AM")).unwrap(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn payload_serializes_with_wire_field_names() {
        let built = build(&draft(ItemKind::Event), "America/New_York").unwrap();
        let json = serde_json::to_value(&built.payload).unwrap();

        assert_eq!(json["start"]["dateTime"], "2024-03-15T14:30:00");
        assert_eq!(json["start"]["timeZone"], "America/New_York");
        assert_eq!(json["end"]["dateTime"], "2024-03-15T15:00:00");
    }
}
