//! SVG renderer - converts snapshots into comparison SVG strings.
//!
//! - Bounds and fit-to-canvas transform (viewport)
//! - Style tag → shape and colors (theme)
//! - Edges, node shapes and centered labels (renderer)
//!
//! Pure string building, no DOM manipulation.

mod renderer;
mod styles;
mod theme;
mod viewport;

pub use renderer::{
    escape_xml, layout_label, marker_id, render_comparison, render_comparison_default,
    RenderOptions, EMPTY_CAPTION,
};
pub use theme::{NodeAppearance, ShapeKind};
pub use viewport::{Bounds, Transform};
