//! In-memory live graph.
//!
//! Cells are kept in insertion order under a single root container. Edge
//! policies follow the editor configuration: no dangling edges, no self
//! loops, and at most one edge per ordered pair of vertices.

use super::{
    CellId, CellKind, ChangeListener, DiagramGraph, GraphChange, GraphEditor, GraphError,
    SubscriptionId,
};
use crate::types::Geometry;
use log::trace;

#[derive(Debug, Clone)]
struct Cell {
    id: CellId,
    kind: CellKind,
    label: String,
    style: String,
    geometry: Option<Geometry>,
    source: Option<CellId>,
    target: Option<CellId>,
}

/// Insertion-ordered graph model with batched change notification
pub struct MemoryGraph {
    cells: Vec<Cell>,
    selection: Vec<CellId>,
    next_id: u64,
    update_level: u32,
    pending: GraphChange,
    listeners: Vec<(SubscriptionId, ChangeListener)>,
    next_subscription: SubscriptionId,
    supported: bool,
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryGraph")
            .field("cells", &self.cells)
            .field("selection", &self.selection)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            selection: Vec::new(),
            next_id: 1,
            update_level: 0,
            pending: GraphChange::default(),
            listeners: Vec::new(),
            next_subscription: 1,
            supported: true,
        }
    }

    /// A graph whose capability check fails
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn cell(&self, id: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.id == id)
    }

    fn cell_mut(&mut self, id: &str) -> Result<&mut Cell, GraphError> {
        self.cells
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| GraphError::UnknownCell(id.to_string()))
    }

    fn contains(&self, id: &str) -> bool {
        self.cell(id).is_some()
    }

    fn is_vertex(&self, id: &str) -> bool {
        self.cell(id).is_some_and(|c| c.kind == CellKind::Vertex)
    }

    fn allocate_id(&mut self, requested: Option<&str>) -> Result<CellId, GraphError> {
        if let Some(id) = requested {
            if self.contains(id) {
                return Err(GraphError::DuplicateId(id.to_string()));
            }
            return Ok(id.to_string());
        }

        loop {
            let candidate = self.next_id.to_string();
            self.next_id += 1;
            if !self.contains(&candidate) {
                return Ok(candidate);
            }
        }
    }

    fn validate_edge(&self, source: &str, target: &str) -> Result<(), GraphError> {
        for end in [source, target] {
            if !self.is_vertex(end) {
                return Err(GraphError::DanglingEdge(end.to_string()));
            }
        }
        if source == target {
            return Err(GraphError::SelfLoop(source.to_string()));
        }
        let duplicate = self.cells.iter().any(|c| {
            c.kind == CellKind::Edge
                && c.source.as_deref() == Some(source)
                && c.target.as_deref() == Some(target)
        });
        if duplicate {
            return Err(GraphError::DuplicateEdge {
                from: source.to_string(),
                to: target.to_string(),
            });
        }
        Ok(())
    }

    fn fire(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let change = std::mem::take(&mut self.pending);
        trace!(
            added = change.added.len(),
            removed = change.removed.len(),
            updated = change.updated.len();
            "Graph changed"
        );
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
    }

    fn updated(&mut self, id: &str) {
        if !self.pending.updated.iter().any(|u| u == id) {
            self.pending.updated.push(id.to_string());
        }
    }
}

impl DiagramGraph for MemoryGraph {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn children(&self) -> Vec<CellId> {
        self.cells.iter().map(|c| c.id.clone()).collect()
    }

    fn kind(&self, id: &str) -> Option<CellKind> {
        self.cell(id).map(|c| c.kind)
    }

    fn label(&self, id: &str) -> Option<String> {
        self.cell(id).map(|c| c.label.clone())
    }

    fn style(&self, id: &str) -> Option<String> {
        self.cell(id).map(|c| c.style.clone())
    }

    fn geometry(&self, id: &str) -> Option<Geometry> {
        self.cell(id).and_then(|c| c.geometry)
    }

    fn source(&self, id: &str) -> Option<CellId> {
        self.cell(id).and_then(|c| c.source.clone())
    }

    fn target(&self, id: &str) -> Option<CellId> {
        self.cell(id).and_then(|c| c.target.clone())
    }
}

impl GraphEditor for MemoryGraph {
    fn insert_vertex(
        &mut self,
        id: Option<&str>,
        label: &str,
        geometry: Geometry,
        style: &str,
    ) -> Result<CellId, GraphError> {
        let id = self.allocate_id(id)?;
        self.begin_update();
        self.cells.push(Cell {
            id: id.clone(),
            kind: CellKind::Vertex,
            label: label.to_string(),
            style: style.to_string(),
            geometry: Some(geometry),
            source: None,
            target: None,
        });
        self.pending.added.push(id.clone());
        self.end_update();
        Ok(id)
    }

    fn insert_edge(
        &mut self,
        id: Option<&str>,
        label: &str,
        source: &str,
        target: &str,
    ) -> Result<CellId, GraphError> {
        self.validate_edge(source, target)?;
        let id = self.allocate_id(id)?;
        self.begin_update();
        self.cells.push(Cell {
            id: id.clone(),
            kind: CellKind::Edge,
            label: label.to_string(),
            style: String::new(),
            geometry: None,
            source: Some(source.to_string()),
            target: Some(target.to_string()),
        });
        self.pending.added.push(id.clone());
        self.end_update();
        Ok(id)
    }

    fn remove_cells(&mut self, ids: &[CellId]) -> Vec<CellId> {
        let vertices: Vec<&str> = ids
            .iter()
            .map(String::as_str)
            .filter(|id| self.is_vertex(id))
            .collect();

        let doomed = |cell: &Cell| {
            ids.iter().any(|id| *id == cell.id)
                || cell
                    .source
                    .as_deref()
                    .is_some_and(|s| vertices.contains(&s))
                || cell
                    .target
                    .as_deref()
                    .is_some_and(|t| vertices.contains(&t))
        };

        let removed: Vec<CellId> = self
            .cells
            .iter()
            .filter(|c| doomed(c))
            .map(|c| c.id.clone())
            .collect();

        if removed.is_empty() {
            return removed;
        }

        self.begin_update();
        self.cells.retain(|c| !removed.contains(&c.id));
        self.selection.retain(|s| !removed.contains(s));
        self.pending.removed.extend(removed.iter().cloned());
        self.end_update();
        removed
    }

    fn set_label(&mut self, id: &str, label: &str) -> Result<(), GraphError> {
        self.cell_mut(id)?.label = label.to_string();
        self.begin_update();
        self.updated(id);
        self.end_update();
        Ok(())
    }

    fn set_style(&mut self, id: &str, style: &str) -> Result<(), GraphError> {
        self.cell_mut(id)?.style = style.to_string();
        self.begin_update();
        self.updated(id);
        self.end_update();
        Ok(())
    }

    fn set_geometry(&mut self, id: &str, geometry: Geometry) -> Result<(), GraphError> {
        let cell = self.cell_mut(id)?;
        if cell.kind != CellKind::Vertex {
            return Err(GraphError::NotAVertex(id.to_string()));
        }
        cell.geometry = Some(geometry);
        self.begin_update();
        self.updated(id);
        self.end_update();
        Ok(())
    }

    fn selection(&self) -> Vec<CellId> {
        self.selection.clone()
    }

    fn set_selection(&mut self, ids: &[CellId]) {
        self.selection = ids
            .iter()
            .filter(|id| self.contains(id))
            .cloned()
            .collect();
    }

    fn begin_update(&mut self) {
        self.update_level += 1;
    }

    fn end_update(&mut self) {
        self.update_level = self.update_level.saturating_sub(1);
        if self.update_level == 0 {
            self.fire();
        }
    }

    fn subscribe(&mut self, listener: ChangeListener) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(sid, _)| *sid != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn rect() -> Geometry {
        Geometry::new(0.0, 0.0, 100.0, 40.0)
    }

    fn two_vertices() -> MemoryGraph {
        let mut graph = MemoryGraph::new();
        graph.insert_vertex(Some("a"), "A", rect(), "pathway-node").unwrap();
        graph.insert_vertex(Some("b"), "B", rect(), "outcome-node").unwrap();
        graph
    }

    #[test]
    fn test_generated_ids_skip_used() {
        let mut graph = MemoryGraph::new();
        graph.insert_vertex(Some("1"), "", rect(), "").unwrap();
        let id = graph.insert_vertex(None, "", rect(), "").unwrap();
        assert_eq!(id, "2");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut graph = two_vertices();
        let err = graph.insert_vertex(Some("a"), "", rect(), "").unwrap_err();
        assert_eq!(err, GraphError::DuplicateId("a".to_string()));
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_edge_policies() {
        let mut graph = two_vertices();
        assert_eq!(
            graph.insert_edge(None, "", "a", "missing"),
            Err(GraphError::DanglingEdge("missing".to_string()))
        );
        assert_eq!(
            graph.insert_edge(None, "", "a", "a"),
            Err(GraphError::SelfLoop("a".to_string()))
        );
        graph.insert_edge(Some("e1"), "", "a", "b").unwrap();
        let duplicate = graph.insert_edge(None, "", "a", "b").unwrap_err();
        assert_eq!(
            duplicate,
            GraphError::DuplicateEdge {
                from: "a".to_string(),
                to: "b".to_string(),
            }
        );
        assert_eq!(
            duplicate.to_string(),
            "an edge from 'a' to 'b' already exists"
        );
        // The reverse direction is a different ordered pair
        graph.insert_edge(Some("e2"), "", "b", "a").unwrap();
        assert_eq!(
            graph.insert_edge(None, "", "e1", "a"),
            Err(GraphError::DanglingEdge("e1".to_string()))
        );
    }

    #[test]
    fn test_remove_vertex_removes_connected_edges() {
        let mut graph = two_vertices();
        graph.insert_vertex(Some("c"), "C", rect(), "").unwrap();
        graph.insert_edge(Some("ab"), "", "a", "b").unwrap();
        graph.insert_edge(Some("bc"), "", "b", "c").unwrap();
        graph.set_selection(&["b".to_string(), "c".to_string()]);

        let removed = graph.remove_cells(&["b".to_string()]);
        assert_eq!(removed, vec!["b", "ab", "bc"]);
        assert_eq!(graph.children(), vec!["a", "c"]);
        assert_eq!(graph.selection(), vec!["c"]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut graph = two_vertices();
        assert!(graph.remove_cells(&["zz".to_string()]).is_empty());
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_listeners_fire_once_per_batch() {
        let mut graph = MemoryGraph::new();
        let seen: Rc<RefCell<Vec<GraphChange>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = graph.subscribe(Box::new(move |change: &GraphChange| {
            sink.borrow_mut().push(change.clone())
        }));

        graph.begin_update();
        graph.insert_vertex(Some("a"), "", rect(), "").unwrap();
        graph.insert_vertex(Some("b"), "", rect(), "").unwrap();
        graph.set_label("a", "renamed").unwrap();
        graph.end_update();

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].added, vec!["a", "b"]);
        assert_eq!(seen.borrow()[0].updated, vec!["a"]);

        graph.unsubscribe(sub);
        graph.insert_vertex(Some("c"), "", rect(), "").unwrap();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_edge_has_no_geometry() {
        let mut graph = two_vertices();
        graph.insert_edge(Some("e"), "go", "a", "b").unwrap();
        assert_eq!(graph.geometry("e"), None);
        assert_eq!(graph.source("e").as_deref(), Some("a"));
        assert_eq!(
            graph.set_geometry("e", rect()),
            Err(GraphError::NotAVertex("e".to_string()))
        );
    }
}
