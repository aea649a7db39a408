//! Remote transport adapter seam.
//!
//! The core never speaks the messaging wire protocol. It consumes inbound
//! events through [`InboundDispatcher`] and sends replies through the
//! [`Transport`] trait, which the platform's messaging client implements.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::notify::RedrawSignal;
use crate::store::DialogStore;

/// Latest known identity of a remote user, as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIdentity {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
}

/// Inbound payload, reduced to what the store records.
///
/// Raw media payloads are never carried into the core; each media kind maps
/// to a fixed placeholder description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundContent {
    Text(String),
    Photo,
    Document,
    Sticker,
    Video,
    Voice,
    Audio,
    Animation,
    /// Anything the table doesn't know. Recorded, never rejected.
    Unknown,
}

impl InboundContent {
    /// Map a transport content-type string to a content value.
    ///
    /// `text` is only consulted for the "text" type; a text message with no
    /// body records as empty text rather than failing.
    pub fn from_type(content_type: &str, text: Option<&str>) -> Self {
        match content_type {
            "text" => InboundContent::Text(text.unwrap_or("").to_string()),
            "photo" => InboundContent::Photo,
            "document" => InboundContent::Document,
            "sticker" => InboundContent::Sticker,
            "video" => InboundContent::Video,
            "voice" => InboundContent::Voice,
            "audio" => InboundContent::Audio,
            "animation" => InboundContent::Animation,
            _ => InboundContent::Unknown,
        }
    }

    /// The text stored for this payload: the message body for text, a fixed
    /// placeholder for everything else.
    pub fn description(&self) -> String {
        match self {
            InboundContent::Text(text) => text.clone(),
            InboundContent::Photo => "[Sent a photo]".to_string(),
            InboundContent::Document => "[Sent a file]".to_string(),
            InboundContent::Sticker => "[Sent a sticker]".to_string(),
            InboundContent::Video => "[Sent a video]".to_string(),
            InboundContent::Voice => "[Sent a voice message]".to_string(),
            InboundContent::Audio => "[Sent an audio track]".to_string(),
            InboundContent::Animation => "[Sent a GIF]".to_string(),
            InboundContent::Unknown => "[Sent unknown media]".to_string(),
        }
    }
}

/// One inbound event as delivered by the transport's receive loop.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub identity: RemoteIdentity,
    pub content: InboundContent,
    /// Seconds since epoch, as stamped by the transport.
    pub timestamp: i64,
}

/// Error type for outbound transport calls.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Send failed: {0}")]
    SendFailed(String),
}

/// Outbound side of the messaging client.
///
/// Implementations wrap whatever client library the platform provides; the
/// core only ever calls these two methods.
pub trait Transport: Send + Sync {
    /// Deliver a text reply to a remote user.
    fn send_text(&self, user_id: i64, text: &str) -> Result<(), TransportError>;

    /// Deliver a file to a remote user.
    fn send_document(&self, user_id: i64, file: &Path) -> Result<(), TransportError>;
}

/// Network-thread entry point for inbound events.
///
/// Register `dispatch` as the transport's message callback: it records the
/// event in the store and fires the redraw signal. It never blocks on the UI
/// thread and never panics on store errors; a failed persist is logged and
/// the in-memory record survives for the next successful save.
pub struct InboundDispatcher {
    store: Arc<DialogStore>,
    redraw: RedrawSignal,
}

impl InboundDispatcher {
    pub fn new(store: Arc<DialogStore>, redraw: RedrawSignal) -> Self {
        Self { store, redraw }
    }

    /// Record one inbound event and wake the UI.
    pub fn dispatch(&self, event: InboundEvent) {
        if let Err(e) = self
            .store
            .record_inbound(&event.identity, &event.content, event.timestamp)
        {
            log::error!(
                "Failed to record inbound message from {}: {e}",
                event.identity.user_id
            );
        }
        self.redraw.notify();
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod content_mapping {
        use super::*;

        #[test]
        fn text_carries_its_body() {
            let content = InboundContent::from_type("text", Some("hi"));
            assert_eq!(content, InboundContent::Text("hi".to_string()));
            assert_eq!(content.description(), "hi");
        }

        #[test]
        fn text_without_body_is_empty() {
            let content = InboundContent::from_type("text", None);
            assert_eq!(content.description(), "");
        }

        #[test]
        fn every_media_kind_has_a_placeholder() {
            let kinds = [
                ("photo", "[Sent a photo]"),
                ("document", "[Sent a file]"),
                ("sticker", "[Sent a sticker]"),
                ("video", "[Sent a video]"),
                ("voice", "[Sent a voice message]"),
                ("audio", "[Sent an audio track]"),
                ("animation", "[Sent a GIF]"),
            ];

            for (kind, expected) in kinds {
                let content = InboundContent::from_type(kind, None);
                assert_eq!(content.description(), expected, "kind: {kind}");
            }
        }

        #[test]
        fn unrecognized_kind_maps_to_generic_placeholder() {
            let content = InboundContent::from_type("poll", None);
            assert_eq!(content, InboundContent::Unknown);
            assert_eq!(content.description(), "[Sent unknown media]");
        }
    }

    mod dispatcher {
        use super::*;
        use crate::notify::redraw_channel;
        use tempfile::tempdir;

        fn event(user_id: i64, first_name: &str, text: &str) -> InboundEvent {
            InboundEvent {
                identity: RemoteIdentity {
                    user_id,
                    username: None,
                    first_name: first_name.to_string(),
                    last_name: None,
                },
                content: InboundContent::Text(text.to_string()),
                timestamp: 1000,
            }
        }

        #[test]
        fn dispatch_records_and_wakes() {
            let dir = tempdir().unwrap();
            let store = Arc::new(DialogStore::open(dir.path().join("dialogs.json")).unwrap());
            let (signal, mut receiver) = redraw_channel();
            let dispatcher = InboundDispatcher::new(Arc::clone(&store), signal);

            dispatcher.dispatch(event(42, "Ana", "hi"));

            assert_eq!(store.conversations().len(), 1);
            assert!(receiver.try_recv());
        }

        #[test]
        fn dispatch_from_network_thread_wakes_ui_thread() {
            let dir = tempdir().unwrap();
            let store = Arc::new(DialogStore::open(dir.path().join("dialogs.json")).unwrap());
            let (signal, mut receiver) = redraw_channel();
            let dispatcher = InboundDispatcher::new(Arc::clone(&store), signal);

            let ui = std::thread::spawn(move || receiver.wait());
            let network = std::thread::spawn(move || {
                dispatcher.dispatch(event(7, "Kim", "hello"));
            });

            network.join().unwrap();
            assert!(ui.join().unwrap());
            assert_eq!(store.conversations().len(), 1);
        }

        #[test]
        fn burst_of_events_records_all_messages() {
            let dir = tempdir().unwrap();
            let store = Arc::new(DialogStore::open(dir.path().join("dialogs.json")).unwrap());
            let (signal, mut receiver) = redraw_channel();
            let dispatcher = InboundDispatcher::new(Arc::clone(&store), signal);

            for i in 0..5 {
                dispatcher.dispatch(event(42, "Ana", &format!("msg {i}")));
            }

            // Every message is recorded even though the wake-ups coalesced.
            assert_eq!(store.snapshot()["42"].messages.len(), 5);
            assert!(receiver.try_recv());
            assert!(!receiver.try_recv());
        }
    }
}
