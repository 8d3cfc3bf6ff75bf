//! Adapters implementing application ports

mod fs_avatar_storage;
mod session_provider;

pub use fs_avatar_storage::FsAvatarStorage;
pub use session_provider::StoreBackedSessionProvider;
