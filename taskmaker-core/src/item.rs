//! Draft types for a single submission.
//!
//! `ItemDraft` is the explicit form-state object: the caller collects the
//! raw field values (flags or prompts) into one of these and hands it to
//! the builder. Nothing here is parsed yet — date and time fields are the
//! strings the user typed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BuildError;

/// Whether a calendar entry is an instant (task) or an interval (event).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Task,
    #[default]
    Event,
}

impl ItemKind {
    /// All kinds, in the order they are offered to the user.
    pub const ALL: [ItemKind; 2] = [ItemKind::Task, ItemKind::Event];
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Task => write!(f, "Task"),
            ItemKind::Event => write!(f, "Event"),
        }
    }
}

impl FromStr for ItemKind {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "task" => Ok(ItemKind::Task),
            "event" => Ok(ItemKind::Event),
            _ => Err(BuildError::InvalidKind(s.to_string())),
        }
    }
}

/// Raw field values for one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDraft {
    pub kind: ItemKind,
    pub name: String,
    pub description: String,
    /// Start date, MM-DD-YYYY
    pub start_date: String,
    /// Start time, HH:MM AM/PM. Ignored for all-day items.
    pub start_time: Option<String>,
    /// End time, HH:MM AM/PM. Only meaningful for events.
    pub end_time: Option<String>,
    pub all_day: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("task".parse::<ItemKind>().unwrap(), ItemKind::Task);
        assert_eq!("Task".parse::<ItemKind>().unwrap(), ItemKind::Task);
        assert_eq!("EVENT".parse::<ItemKind>().unwrap(), ItemKind::Event);
        assert_eq!(" event ".parse::<ItemKind>().unwrap(), ItemKind::Event);
    }

    #[test]
    fn kind_rejects_unknown() {
        assert!(matches!(
            "meeting".parse::<ItemKind>(),
            Err(BuildError::InvalidKind(_))
        ));
    }

    #[test]
    fn kind_defaults_to_event() {
        assert_eq!(ItemKind::default(), ItemKind::Event);
    }
}
