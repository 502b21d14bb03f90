//! Persistence bridge.
//!
//! This module keeps storage in step with the in-memory store:
//! - `Storage` backends (file, memory, no-op)
//! - the persisted envelope and its codec
//! - `Persister`, the single write path, used directly or behind `Autosaver`
//! - `SubmissionLog` for submitted form values

mod autosave;
pub mod envelope;
mod error;
mod persister;
mod storage;
mod submissions;

pub use autosave::{AutosaveSubscriber, Autosaver};
pub use envelope::STORE_KEY;
pub use error::StorageError;
pub use persister::Persister;
pub use storage::{FileStorage, MemoryStorage, NoopStorage, SharedStorage, Storage};
pub use submissions::{SubmissionLog, SUBMISSIONS_KEY};
