//! shelfguard-file - Filesystem-backed session storage.
//!
//! [`FileStorage`] persists each key as a JSON file under a root directory,
//! so a session survives process restarts.

mod storage;

pub use storage::FileStorage;
