//! # Trellis Save
//!
//! The persistence discipline around the Trellis builder: a collaborator
//! trait for the storage backend, an in-memory implementation of it, and
//! the scheduler that debounces autosaves, dispatches manual saves, and
//! keeps the two from trampling each other when completions arrive out of
//! order. Edits always win - builder state is never rolled back because a
//! save failed.

mod editor;
mod error;
mod memory;
mod scheduler;
mod sink;

pub use editor::EditorSession;
pub use error::SaveError;
pub use memory::{InMemorySink, RecordedDispatch};
pub use scheduler::{SaveScheduler, SaveSchedulerConfig, SaveStatus};
pub use sink::PersistenceSink;
