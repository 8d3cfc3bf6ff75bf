//! Submit outcome
//!
//! The single notification produced by one profile submit. Callers pattern
//! match exhaustively instead of inspecting ad hoc flags; every branch can
//! carry non-fatal warnings.

use serde::{Deserialize, Serialize};

use super::ProfileSnapshot;

/// Result of one profile submit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// All intended changes were persisted
    Success {
        snapshot: ProfileSnapshot,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<String>,
    },
    /// Nothing differed from the snapshot; no write was issued
    NoOp,
    /// Some but not all intended changes were saved
    PartialFailure { reason: String },
    /// The submit failed; no changes were saved
    Failure { reason: String },
}

impl UpdateOutcome {
    /// A clean success with no warnings
    #[must_use]
    pub const fn success(snapshot: ProfileSnapshot) -> Self {
        Self::Success {
            snapshot,
            warnings: Vec::new(),
        }
    }

    /// A success that carries non-fatal notes
    #[must_use]
    pub const fn success_with_warnings(snapshot: ProfileSnapshot, warnings: Vec<String>) -> Self {
        Self::Success { snapshot, warnings }
    }

    /// Whether the submit persisted its changes
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether the submit had nothing to do
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    /// Non-fatal notes attached to the outcome
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Success { warnings, .. } => warnings,
            _ => &[],
        }
    }

    /// Stable label for logs
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::NoOp => "no_op",
            Self::PartialFailure { .. } => "partial_failure",
            Self::Failure { .. } => "failure",
        }
    }
}
