/// Workflow state aggregate and value-object identifiers
pub mod state;

/// Step and input field domain models
pub mod step;

/// Group domain model
pub mod group;

/// Workflow-level metadata
pub mod meta;

/// Edit commands and the reducer seam
pub mod command;
