//! Domain entities - Objects with identity and lifecycle

mod change_set;
mod edit_draft;
mod profile_snapshot;
mod update_outcome;

pub use change_set::ChangeSet;
pub use edit_draft::{EditDraft, MAX_FILE_BYTES, PendingFile};
pub use profile_snapshot::ProfileSnapshot;
pub use update_outcome::UpdateOutcome;
