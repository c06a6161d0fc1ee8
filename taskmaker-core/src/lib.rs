//! Core types for taskmaker.
//!
//! This crate holds everything that does not touch the network or the
//! terminal: the draft a submission produces, the normalization routine
//! that turns it into concrete timestamps, and the insert payload.

pub mod builder;
pub mod error;
pub mod item;
pub mod payload;

// Re-export the main types at crate root for convenience
pub use builder::{build, BuiltItem, FULL_DAY_MARKER};
pub use error::{BuildError, BuildResult};
pub use item::{ItemDraft, ItemKind};
pub use payload::{EventPayload, ZonedTimestamp};
