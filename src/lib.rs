//! clinmap - Clinical decision map editor core
//!
//! This library captures a clinical decision diagram from a live graph into
//! an immutable snapshot and renders that snapshot as an SVG for side-by-side
//! comparison with a reference diagram.
//!
//! # Example
//!
//! ```rust
//! use clinmap::{build_snapshot, render_comparison_default, MemoryGraph, Variant};
//! use clinmap::editor::insert_template;
//!
//! let mut graph = MemoryGraph::new();
//! insert_template(&mut graph).unwrap();
//!
//! let snapshot = build_snapshot(Some(&graph));
//! let svg = render_comparison_default(&snapshot, Variant::Learner);
//! assert!(svg.starts_with("<svg"));
//! ```
//!
//! # Modules
//!
//! - `graph` - interface to the live diagram graph, with an in-memory backend
//! - `snapshot` - live graph → [`Snapshot`]
//! - `svg` - [`Snapshot`] → comparison SVG
//! - `editor` - actions, template, banners and deferred view work
//! - `reference` - the static reference image
//! - `page` - standalone HTML comparison page
//! - `config` - TOML configuration

pub mod config;
pub mod editor;
pub mod error;
pub mod graph;
pub mod page;
pub mod reference;
pub mod snapshot;
pub mod style;
pub mod svg;
pub mod types;

pub use error::{Error, Result};
pub use graph::{DiagramGraph, GraphEditor, MemoryGraph};
pub use snapshot::build_snapshot;
pub use svg::{render_comparison, render_comparison_default, RenderOptions};
pub use types::*;

/// Render a snapshot given as JSON.
///
/// # Example
/// ```rust
/// let json = r#"{"nodes": [], "edges": []}"#;
/// let svg = clinmap::render_snapshot_json(json, clinmap::Variant::Learner).unwrap();
/// assert!(svg.contains("No diagram elements found"));
/// ```
pub fn render_snapshot_json(json: &str, variant: Variant) -> Result<String> {
    let snapshot = Snapshot::from_json(json)?;
    Ok(render_comparison_default(&snapshot, variant))
}
