//! Persistence layer for the dialog store.
//!
//! # Overview
//!
//! All durable state lives in one JSON file mapping stringified user ids to
//! conversation records. The file is rewritten in full on every store
//! mutation; see [`crate::store::DialogStore`] for the save policy.
//!
//! # Design Principles
//!
//! ## Atomic Writes
//!
//! All save operations use write-then-rename to prevent corruption:
//!
//! 1. Write to `dialogs.json.tmp`
//! 2. Rename to `dialogs.json` (atomic on Unix)
//!
//! ## Forward Compatibility
//!
//! Field names on disk are stable (`userId`, `firstName`, `in`, ...) and
//! unknown extra fields are ignored on load.

pub mod dialogs;
pub mod types;

pub use dialogs::{load_dialogs, save_dialogs, DialogsError};
pub use types::{Conversation, ConversationSummary, DialogMap, Message};
