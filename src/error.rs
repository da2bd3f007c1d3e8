//! Error types for clinmap operations.
//!
//! Every failure is scoped to the feature that triggered it: a missing
//! mount point disables one panel, a rejected edit leaves the graph as it
//! was, and only a missing graph backend stops the editor from starting.

use std::io;

use thiserror::Error;

use crate::editor::MountRole;
use crate::graph::GraphError;

/// The main error type for clinmap operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Missing mount point: {0}")]
    MissingTarget(MountRole),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Script error on line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
