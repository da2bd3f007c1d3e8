//! Narrow interface to the live diagram graph.
//!
//! The editing surface (dragging, connecting, in-place text editing) belongs
//! to an external diagramming library. This module names the small part of
//! its capability surface the rest of the crate relies on:
//!
//! - [`DiagramGraph`] reads the flat list of cells under the root container.
//! - [`GraphEditor`] issues edits and delivers change notifications.
//!
//! [`MemoryGraph`] implements both in memory, for headless use and tests.

mod memory;

pub use memory::MemoryGraph;

use crate::types::Geometry;
use thiserror::Error;

/// Identifier of a cell in the live graph
pub type CellId = String;

/// Handle returned by [`GraphEditor::subscribe`]
pub type SubscriptionId = u64;

/// Callback invoked once per completed update batch
pub type ChangeListener = Box<dyn FnMut(&GraphChange)>;

/// Kind of a child cell of the root container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Vertex,
    Edge,
}

/// Cells touched by one outermost update batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphChange {
    pub added: Vec<CellId>,
    pub removed: Vec<CellId>,
    pub updated: Vec<CellId>,
}

impl GraphChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

/// Edits rejected by the live graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("unknown cell '{0}'")]
    UnknownCell(CellId),

    #[error("cell id '{0}' is already in use")]
    DuplicateId(CellId),

    #[error("cell '{0}' is not a vertex")]
    NotAVertex(CellId),

    #[error("edge endpoint '{0}' does not name a vertex")]
    DanglingEdge(CellId),

    #[error("edge would connect '{0}' to itself")]
    SelfLoop(CellId),

    #[error("an edge from '{from}' to '{to}' already exists")]
    DuplicateEdge { from: CellId, to: CellId },
}

/// Read access to the live graph.
///
/// Accessors return `None` for unknown ids and for attributes a cell does
/// not carry (a vertex has no source, an edge has no geometry).
pub trait DiagramGraph {
    /// Capability check of the underlying library
    fn is_supported(&self) -> bool {
        true
    }

    /// Direct children of the root container, in child order
    fn children(&self) -> Vec<CellId>;

    fn kind(&self, id: &str) -> Option<CellKind>;

    fn label(&self, id: &str) -> Option<String>;

    fn style(&self, id: &str) -> Option<String>;

    fn geometry(&self, id: &str) -> Option<Geometry>;

    fn source(&self, id: &str) -> Option<CellId>;

    fn target(&self, id: &str) -> Option<CellId>;
}

/// Editing primitives of the live graph
pub trait GraphEditor: DiagramGraph {
    /// Insert a vertex. A fresh id is generated when `id` is `None`.
    fn insert_vertex(
        &mut self,
        id: Option<&str>,
        label: &str,
        geometry: Geometry,
        style: &str,
    ) -> Result<CellId, GraphError>;

    /// Insert a directed edge between two existing vertices.
    fn insert_edge(
        &mut self,
        id: Option<&str>,
        label: &str,
        source: &str,
        target: &str,
    ) -> Result<CellId, GraphError>;

    /// Remove cells. Removing a vertex also removes its connected edges.
    /// Returns the ids actually removed, in child order.
    fn remove_cells(&mut self, ids: &[CellId]) -> Vec<CellId>;

    fn set_label(&mut self, id: &str, label: &str) -> Result<(), GraphError>;

    fn set_style(&mut self, id: &str, style: &str) -> Result<(), GraphError>;

    fn set_geometry(&mut self, id: &str, geometry: Geometry) -> Result<(), GraphError>;

    fn selection(&self) -> Vec<CellId>;

    fn set_selection(&mut self, ids: &[CellId]);

    /// Open an update batch. Batches nest; listeners fire when the
    /// outermost batch ends.
    fn begin_update(&mut self);

    fn end_update(&mut self);

    fn subscribe(&mut self, listener: ChangeListener) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId);
}

/// Ids of the vertex children of the root container
pub fn child_vertices<G: DiagramGraph + ?Sized>(graph: &G) -> Vec<CellId> {
    graph
        .children()
        .into_iter()
        .filter(|id| graph.kind(id) == Some(CellKind::Vertex))
        .collect()
}

/// Bounding box of all vertex geometries, `None` for a graph without vertices
pub fn graph_bounds<G: DiagramGraph + ?Sized>(graph: &G) -> Option<Geometry> {
    let mut bounds: Option<(f64, f64, f64, f64)> = None;

    for id in child_vertices(graph) {
        let Some(g) = graph.geometry(&id) else {
            continue;
        };
        if !g.is_finite() {
            continue;
        }
        bounds = Some(match bounds {
            None => (g.x, g.y, g.right(), g.bottom()),
            Some((min_x, min_y, max_x, max_y)) => (
                min_x.min(g.x),
                min_y.min(g.y),
                max_x.max(g.right()),
                max_y.max(g.bottom()),
            ),
        });
    }

    bounds.map(|(min_x, min_y, max_x, max_y)| {
        Geometry::new(min_x, min_y, max_x - min_x, max_y - min_y)
    })
}
