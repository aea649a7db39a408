//! Outbound file-attachment policy.
//!
//! Size capping and size display happen here, before any transport call.
//! The actual file transfer belongs to the transport implementation.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Hard cap on operator-initiated outbound files.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Error type for attachment preparation.
#[derive(Error, Debug)]
pub enum AttachmentError {
    /// File exceeds [`MAX_ATTACHMENT_BYTES`]. Carries the display pieces
    /// for the user-facing notice.
    #[error("File {name} is too large ({size}); the limit is 10 MiB")]
    TooLarge { name: String, size: String },

    #[error("Failed to read attachment: {0}")]
    Io(#[from] std::io::Error),
}

/// An attachment that passed the size check and is ready to send.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
}

impl Attachment {
    /// The text recorded in the conversation for this attachment.
    pub fn outbound_label(&self) -> String {
        format!("[Sent file {} {}]", self.name, format_file_size(self.size_bytes))
    }
}

/// Check a file against the size cap and gather its display metadata.
///
/// Rejects over-cap files before anything touches the transport.
pub fn prepare_attachment(path: &Path) -> Result<Attachment, AttachmentError> {
    let size_bytes = fs::metadata(path)?.len();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if size_bytes > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge {
            name,
            size: format_file_size(size_bytes),
        });
    }

    Ok(Attachment {
        path: path.to_path_buf(),
        name,
        size_bytes,
    })
}

/// Human-readable file size: KiB below 1 MiB, MiB at or above it, two
/// decimal places either way.
pub fn format_file_size(bytes: u64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    if (bytes as f64) < MIB {
        format!("{:.2} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MiB", bytes as f64 / MIB)
    }
}

// ============================================================================
// TESTS
// ============================================================================
