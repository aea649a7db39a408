//! The dialog store - authoritative conversation state.
//!
//! # Overview
//!
//! `DialogStore` owns the in-memory conversation map and the persisted file.
//! It is the single shared mutable resource between the network thread
//! (inbound events) and the UI thread (operator actions), so every public
//! operation is internally synchronized.
//!
//! # Save Policy
//!
//! Every mutating call persists the full store before returning, under the
//! same lock that guards the in-memory map. After any mutating call returns,
//! the file and memory agree; a crash between mutation and flush is the only
//! window of inconsistency.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use thiserror::Error;

use crate::persistence::{
    load_dialogs, save_dialogs, Conversation, ConversationSummary, DialogMap, DialogsError,
    Message,
};
use crate::transport::{InboundContent, RemoteIdentity};
use crate::view;

/// Error type for dialog store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The referenced user id has no conversation.
    #[error("Unknown conversation: {0}")]
    UnknownConversation(i64),

    /// The store could not be written to disk. The in-memory state still
    /// holds the mutation; the caller decides whether to retry or surface.
    #[error("Failed to persist dialogs: {0}")]
    Persistence(#[from] DialogsError),
}

/// Thread-safe conversation store backed by a single JSON file.
///
/// Construct one per process and share it (e.g. via `Arc`) between the
/// transport callback and the UI layer. There is deliberately no global
/// instance.
pub struct DialogStore {
    path: PathBuf,
    dialogs: Mutex<DialogMap>,
}

impl DialogStore {
    /// Open a store backed by `path`, loading existing state if present.
    ///
    /// A missing file is a first run and yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DialogsError> {
        let path = path.into();
        let dialogs = load_dialogs(&path)?;
        log::info!(
            "Opened dialog store at {} ({} conversations)",
            path.display(),
            dialogs.len()
        );
        Ok(Self {
            path,
            dialogs: Mutex::new(dialogs),
        })
    }

    /// The file this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record an inbound message from a remote user.
    ///
    /// Creates the conversation on first contact, otherwise refreshes the
    /// identity fields (display names may change between messages). Always
    /// appends, always flips `answered` to false, always persists.
    ///
    /// The appended timestamp is clamped so it never moves backwards within
    /// the conversation.
    pub fn record_inbound(
        &self,
        identity: &RemoteIdentity,
        content: &InboundContent,
        timestamp: i64,
    ) -> Result<(), StoreError> {
        let uid = identity.user_id.to_string();
        let text = content.description();

        let mut dialogs = self.dialogs.lock().unwrap();

        let convo = dialogs.entry(uid).or_insert_with(|| Conversation {
            user_id: identity.user_id,
            username: identity.username.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            messages: Vec::new(),
            answered: false,
        });

        convo.username = identity.username.clone();
        convo.first_name = identity.first_name.clone();
        convo.last_name = identity.last_name.clone();

        let time = timestamp.max(convo.last_message_time());
        convo.messages.push(Message {
            text,
            time,
            inbound: true,
        });
        convo.answered = false;

        save_dialogs(&self.path, &dialogs)?;
        Ok(())
    }

    /// Record an operator reply, stamped with the current time.
    ///
    /// Fails with [`StoreError::UnknownConversation`] if the user has never
    /// written in: the operator cannot originate a conversation.
    pub fn record_outbound(&self, user_id: i64, text: &str) -> Result<(), StoreError> {
        let mut dialogs = self.dialogs.lock().unwrap();

        let convo = dialogs
            .get_mut(&user_id.to_string())
            .ok_or(StoreError::UnknownConversation(user_id))?;

        let time = Utc::now().timestamp().max(convo.last_message_time());
        convo.messages.push(Message {
            text: text.to_string(),
            time,
            inbound: false,
        });
        convo.answered = true;

        save_dialogs(&self.path, &dialogs)?;
        Ok(())
    }

    /// Mark a conversation as answered without replying.
    ///
    /// A no-op (not an error) if the conversation is absent, so the UI can
    /// race a concurrent delete without blowing up.
    pub fn mark_answered(&self, user_id: i64) -> Result<(), StoreError> {
        let mut dialogs = self.dialogs.lock().unwrap();

        if let Some(convo) = dialogs.get_mut(&user_id.to_string()) {
            convo.answered = true;
            save_dialogs(&self.path, &dialogs)?;
        }
        Ok(())
    }

    /// Delete a conversation and its messages, irrecoverably.
    ///
    /// Idempotent: deleting an absent conversation is a no-op.
    pub fn delete_conversation(&self, user_id: i64) -> Result<(), StoreError> {
        let mut dialogs = self.dialogs.lock().unwrap();

        if dialogs.remove(&user_id.to_string()).is_some() {
            log::info!("Deleted conversation {user_id}");
            save_dialogs(&self.path, &dialogs)?;
        }
        Ok(())
    }

    /// Whether the operator has responded to (or dismissed) this conversation.
    pub fn is_answered(&self, user_id: i64) -> Result<bool, StoreError> {
        let dialogs = self.dialogs.lock().unwrap();
        dialogs
            .get(&user_id.to_string())
            .map(|c| c.answered)
            .ok_or(StoreError::UnknownConversation(user_id))
    }

    /// Rendering-ready transcript for one conversation.
    ///
    /// Inbound lines are attributed to the remote first name, outbound lines
    /// to the fixed operator label.
    pub fn transcript(&self, user_id: i64) -> Result<String, StoreError> {
        let dialogs = self.dialogs.lock().unwrap();
        dialogs
            .get(&user_id.to_string())
            .map(view::render_transcript)
            .ok_or(StoreError::UnknownConversation(user_id))
    }

    /// Snapshot of all conversation summaries, in stable store order.
    pub fn conversations(&self) -> Vec<ConversationSummary> {
        let dialogs = self.dialogs.lock().unwrap();
        dialogs.values().map(ConversationSummary::from).collect()
    }

    /// Full cloned snapshot of the store, for the view projection.
    pub fn snapshot(&self) -> DialogMap {
        self.dialogs.lock().unwrap().clone()
    }
}

// ============================================================================
// TESTS
// ============================================================================
