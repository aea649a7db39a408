//! Persistence data types.
//!
//! # Data Model Overview
//!
//! Chatdesk persists all conversation state in a single JSON file:
//!
//! ```text
//! dialogs.json
//! {
//!   "42": {                       # decimal string user id
//!     "userId": 42,
//!     "username": "ana" | null,
//!     "firstName": "Ana",
//!     "lastName": "B" | null,
//!     "messages": [ { "text": "hi", "time": 1000, "in": true }, ... ],
//!     "answered": false
//!   },
//!   ...
//! }
//! ```
//!
//! # Design Principles
//!
//! - **Forward-readable**: unknown extra fields are ignored on load,
//!   never rejected.
//! - **Append-only messages**: a conversation's message list is only ever
//!   extended, never reordered or edited.
//! - **Atomic writes**: write to temp file, then rename.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The full persisted store: stringified user id -> conversation.
///
/// A `BTreeMap` keeps iteration order stable across runs, which is what the
/// conversation list relies on.
pub type DialogMap = BTreeMap<String, Conversation>;

/// One conversation with a single remote user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Stable numeric identifier of the remote user. Never changes.
    pub user_id: i64,

    /// Latest known handle; overwritten on every inbound event.
    pub username: Option<String>,

    /// Latest known first name; overwritten on every inbound event.
    pub first_name: String,

    /// Latest known last name, if the user has one.
    pub last_name: Option<String>,

    /// Append-only message history, in arrival order.
    pub messages: Vec<Message>,

    /// False while the operator owes this user a reply.
    pub answered: bool,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Text content, or a placeholder description for media payloads.
    pub text: String,

    /// Seconds since epoch. Non-decreasing within a conversation.
    pub time: i64,

    /// True for messages from the remote user, false for operator replies.
    #[serde(rename = "in")]
    pub inbound: bool,
}

impl Conversation {
    /// The last recorded message timestamp, or 0 for an empty history.
    ///
    /// Used to clamp appends so `time` stays non-decreasing even if the
    /// transport delivers a stale clock reading.
    pub fn last_message_time(&self) -> i64 {
        self.messages.last().map(|m| m.time).unwrap_or(0)
    }
}

/// Lightweight conversation identity for list rendering.
///
/// A snapshot copy; holds no reference into the live store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
}

impl From<&Conversation> for ConversationSummary {
    fn from(convo: &Conversation) -> Self {
        Self {
            user_id: convo.user_id,
            username: convo.username.clone(),
            first_name: convo.first_name.clone(),
            last_name: convo.last_name.clone(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
