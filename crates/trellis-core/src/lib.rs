//!
//! Trellis Core - domain model and ordering engine for the Trellis
//! workflow builder
//!
//! This crate holds the normalized builder state (groups in canonical
//! order, each owning an ordered list of steps), the copy-on-write store
//! operations that mutate it, and the drop-intent engine that turns
//! completed drag gestures into store commands. Serialization to the
//! persistence payload and save scheduling live in the sibling
//! `trellis-wire` and `trellis-save` crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Domain layer - entities, the store aggregate, and commands
pub mod domain;

/// Drop-intent resolution for drag gestures
pub mod engine;

/// Error types
pub mod error;

pub use error::CoreError;

// Re-export main API types for easy use
pub use domain::command::Command;
pub use domain::group::Group;
pub use domain::meta::{WorkflowMeta, WorkflowStatus};
pub use domain::state::{GroupId, StepId, WorkflowId, WorkflowState};
pub use domain::step::{InputField, InputKind, Step};
pub use engine::{resolve_drop, DragEntity, DragPhase, DragSession, DropTarget};
