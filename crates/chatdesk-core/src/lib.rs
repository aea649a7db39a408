//! # chatdesk-core
//!
//! Core conversation state for Chatdesk, a desktop bridge between one human
//! operator and many remote chat users.
//!
//! This crate is framework-agnostic: any UI toolkit can render what it
//! produces, and any messaging client can feed it. The flow is:
//!
//! 1. The transport's receive loop hands inbound events to
//!    [`transport::InboundDispatcher`] on the network thread.
//! 2. [`store::DialogStore`] records the mutation and persists it
//!    synchronously.
//! 3. [`notify::RedrawSignal`] wakes the UI thread (bursts coalesce).
//! 4. The UI thread re-reads store state through [`view`] and renders.
//!
//! Outbound replies go through [`operator::OperatorDesk`], which records
//! before sending so a transport failure never loses what the operator wrote.

pub mod attachments;
pub mod notify;
pub mod operator;
pub mod persistence;
pub mod store;
pub mod transport;
pub mod view;

// Re-export commonly used types
pub use notify::{redraw_channel, RedrawReceiver, RedrawSignal};
pub use operator::{DeskError, OperatorDesk};
pub use persistence::{Conversation, ConversationSummary, DialogMap, Message};
pub use store::{DialogStore, StoreError};
pub use transport::{
    InboundContent, InboundDispatcher, InboundEvent, RemoteIdentity, Transport, TransportError,
};
pub use view::{conversation_rows, render_transcript, ConversationRow};
