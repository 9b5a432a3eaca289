//! Sensitive actions deferred behind an OTP challenge.

use serde::{Deserialize, Serialize};

/// Label used for record uploads.
pub const UPLOAD_LABEL: &str = "Upload Record";

/// A file held in memory until it is sent as a multipart upload.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name reported to the server.
    pub file_name: String,
    /// Raw file contents.
    pub content: Vec<u8>,
    /// Explicit MIME type; guessed from the file name when absent.
    pub content_type: Option<String>,
}

impl UploadFile {
    /// Creates an upload from a name and its bytes.
    #[must_use]
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
            content_type: None,
        }
    }

    /// Sets an explicit MIME type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Returns the size of the file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("len", &self.content.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Discriminant of a [`DeferredOperation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Upload a record file.
    Upload,
    /// Delete a record by id.
    Delete,
}

/// The operation executed once the OTP challenge succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredOperation {
    /// Upload `file` to the records endpoint.
    Upload(UploadFile),
    /// Delete the record with `record_id`.
    Delete {
        /// Identifier of the record to delete.
        record_id: String,
    },
}

impl DeferredOperation {
    /// Returns the operation kind.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Upload(_) => ActionKind::Upload,
            Self::Delete { .. } => ActionKind::Delete,
        }
    }
}

/// A sensitive action awaiting OTP confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    /// Human-readable label shown in the challenge prompt.
    pub label: String,
    /// What to run after verification.
    pub operation: DeferredOperation,
}

impl PendingAction {
    /// Creates a pending action with an explicit label.
    #[must_use]
    pub fn new(label: impl Into<String>, operation: DeferredOperation) -> Self {
        Self {
            label: label.into(),
            operation,
        }
    }

    /// Creates a pending record upload labelled "Upload Record".
    #[must_use]
    pub fn upload(file: UploadFile) -> Self {
        Self::new(UPLOAD_LABEL, DeferredOperation::Upload(file))
    }

    /// Creates a pending delete labelled "Delete <title>".
    #[must_use]
    pub fn delete(record_id: impl Into<String>, title: &str) -> Self {
        Self::new(
            format!("Delete {title}"),
            DeferredOperation::Delete {
                record_id: record_id.into(),
            },
        )
    }

    /// Returns the operation kind.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        self.operation.kind()
    }
}

/// Visibility of the OTP prompt.
///
/// Kept apart from the pending payload so the prompt can be hidden and
/// shown again without losing the deferred operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeState {
    /// Whether the prompt is visible.
    pub open: bool,
    /// Label of the action being confirmed.
    pub action_label: String,
}

impl ChallengeState {
    /// An open prompt for `label`.
    #[must_use]
    pub fn opened(label: impl Into<String>) -> Self {
        Self {
            open: true,
            action_label: label.into(),
        }
    }

    /// A closed prompt.
    #[must_use]
    pub fn closed() -> Self {
        Self::default()
    }
}
