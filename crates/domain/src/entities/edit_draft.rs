//! Edit draft entity
//!
//! The in-progress, not-yet-persisted form values for one edit session.
//! A draft is seeded from the last known snapshot and discarded whenever a
//! new snapshot arrives (single-writer, last-snapshot-wins).

use bytes::Bytes;

use crate::errors::DomainError;

/// Upload size ceiling for a staged avatar file
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// A locally selected file staged for upload on the next submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    bytes: Bytes,
    content_type: String,
}

impl PendingFile {
    /// The staged bytes
    #[must_use]
    pub const fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// The MIME type the file was staged with
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Staged size in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the staged file is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Unsaved local edits for one profile
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditDraft {
    display_name: String,
    pending_file: Option<PendingFile>,
    preview_url: Option<String>,
}

impl EditDraft {
    /// Seed a draft from snapshot-derived values
    ///
    /// `preview_url` is the snapshot's avatar reference resolved to a
    /// displayable URL, or `None` when the profile has no avatar.
    #[must_use]
    pub fn seeded(display_name: impl Into<String>, preview_url: Option<String>) -> Self {
        Self {
            display_name: display_name.into(),
            pending_file: None,
            preview_url,
        }
    }

    /// Store an in-progress display name
    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = name.into();
    }

    /// Stage a locally selected file for upload
    ///
    /// Files above [`MAX_FILE_BYTES`] are rejected without mutating the
    /// draft. On success the preview switches to a transient local marker
    /// immediately, before any upload happens.
    pub fn set_pending_file(
        &mut self,
        bytes: Bytes,
        content_type: impl Into<String>,
    ) -> Result<(), DomainError> {
        let content_type = content_type.into();
        if content_type.is_empty() {
            return Err(DomainError::ValidationError(
                "content type is required".to_string(),
            ));
        }
        if bytes.len() > MAX_FILE_BYTES {
            return Err(DomainError::FileTooLarge {
                size_bytes: bytes.len(),
                max_bytes: MAX_FILE_BYTES,
            });
        }

        self.preview_url = Some(local_preview(&content_type, bytes.len()));
        self.pending_file = Some(PendingFile {
            bytes,
            content_type,
        });
        Ok(())
    }

    /// Drop the staged file, keeping the current preview
    pub fn clear_pending_file(&mut self) {
        self.pending_file = None;
    }

    /// Replace the preview with a resolved URL
    pub fn set_preview_url(&mut self, url: impl Into<String>) {
        self.preview_url = Some(url.into());
    }

    /// The in-progress display name
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The staged file, if one is selected
    #[must_use]
    pub const fn pending_file(&self) -> Option<&PendingFile> {
        self.pending_file.as_ref()
    }

    /// The current preview URL
    #[must_use]
    pub fn preview_url(&self) -> Option<&str> {
        self.preview_url.as_deref()
    }

    /// Whether the draft holds anything the given snapshot does not
    #[must_use]
    pub fn differs_from(&self, snapshot_display_name: &str) -> bool {
        self.pending_file.is_some() || self.display_name != snapshot_display_name
    }
}

/// Transient preview marker for a staged file
///
/// The draft never encodes image bytes; the hosting layer serves the staged
/// bytes directly when this marker is displayed.
fn local_preview(content_type: &str, len: usize) -> String {
    format!("pending:{content_type};{len}")
}
