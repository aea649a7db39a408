//! Operator-side outbound orchestration.
//!
//! The UI calls these methods instead of touching the store and transport
//! separately, so the record-then-send order is in one place. The message is
//! persisted before the transport is invoked: if the send then fails, the
//! error propagates but the recorded message stays. A durable record of
//! intent beats silently losing what the operator wrote.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::attachments::{prepare_attachment, AttachmentError};
use crate::store::{DialogStore, StoreError};
use crate::transport::{Transport, TransportError};

/// Error type for operator send operations.
#[derive(Error, Debug)]
pub enum DeskError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The message was recorded but the transport rejected the send.
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Attachment(#[from] AttachmentError),
}

/// The operator's handle on one store/transport pair.
pub struct OperatorDesk {
    store: Arc<DialogStore>,
    transport: Arc<dyn Transport>,
}

impl OperatorDesk {
    pub fn new(store: Arc<DialogStore>, transport: Arc<dyn Transport>) -> Self {
        Self { store, transport }
    }

    /// Reply to a remote user with text.
    ///
    /// Whitespace-only input is silently ignored; nothing is recorded or
    /// sent. Otherwise the reply is recorded (and persisted) first, then
    /// handed to the transport.
    pub fn send_text(&self, user_id: i64, text: &str) -> Result<(), DeskError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        self.store.record_outbound(user_id, text)?;
        self.transport.send_text(user_id, text)?;
        Ok(())
    }

    /// Send a file to a remote user.
    ///
    /// The size cap is checked before anything else; an over-cap file is
    /// rejected without touching the store or the transport. The attachment
    /// label is recorded before the transport call, same as text.
    pub fn send_attachment(&self, user_id: i64, file: &Path) -> Result<(), DeskError> {
        let attachment = prepare_attachment(file)?;

        self.store
            .record_outbound(user_id, &attachment.outbound_label())?;
        self.transport.send_document(user_id, &attachment.path)?;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
