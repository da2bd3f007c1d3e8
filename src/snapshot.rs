//! Snapshot builder - captures the live graph into an immutable [`Snapshot`].

use crate::graph::{CellKind, DiagramGraph};
use crate::types::{EdgeRecord, Geometry, NodeRecord, Snapshot};
use log::{debug, warn};

/// Capture the current state of `graph`.
///
/// Walks the direct children of the root container and records every vertex
/// and edge as it is at call time. The graph is only read. `None` stands for
/// a graph that does not exist yet and yields an empty snapshot.
pub fn build_snapshot<G: DiagramGraph + ?Sized>(graph: Option<&G>) -> Snapshot {
    let Some(graph) = graph else {
        debug!("No live graph, returning empty snapshot");
        return Snapshot::empty();
    };

    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    for id in graph.children() {
        match graph.kind(&id) {
            Some(CellKind::Vertex) => {
                let geometry = graph.geometry(&id).unwrap_or_else(|| {
                    warn!(cell = id.as_str(); "Vertex has no geometry, using origin");
                    Geometry::default()
                });
                nodes.push(NodeRecord {
                    label: graph.label(&id).unwrap_or_default(),
                    style: graph.style(&id).unwrap_or_default(),
                    geometry,
                    id,
                });
            }
            Some(CellKind::Edge) => {
                let label = graph.label(&id).filter(|l| !l.is_empty());
                edges.push(EdgeRecord {
                    source: graph.source(&id),
                    target: graph.target(&id),
                    label,
                    id,
                });
            }
            None => {}
        }
    }

    debug!(nodes = nodes.len(), edges = edges.len(); "Built snapshot");
    Snapshot::new(nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphEditor, MemoryGraph};

    fn sample_graph() -> MemoryGraph {
        let mut graph = MemoryGraph::new();
        graph
            .insert_vertex(
                Some("n1"),
                "Dog with Diarrhea",
                Geometry::new(300.0, 20.0, 200.0, 60.0),
                "presentation-node",
            )
            .unwrap();
        graph
            .insert_vertex(
                Some("n2"),
                "Duration?",
                Geometry::new(320.0, 120.0, 180.0, 100.0),
                "decision-node",
            )
            .unwrap();
        graph.insert_edge(Some("e1"), "", "n1", "n2").unwrap();
        graph
    }

    #[test]
    fn test_missing_graph_is_empty() {
        let snapshot = build_snapshot::<MemoryGraph>(None);
        assert!(snapshot.nodes().is_empty());
        assert!(snapshot.edges().is_empty());
    }

    #[test]
    fn test_empty_graph() {
        let snapshot = build_snapshot(Some(&MemoryGraph::new()));
        assert_eq!(snapshot, Snapshot::empty());
    }

    #[test]
    fn test_records_preserve_fields() {
        let graph = sample_graph();
        let snapshot = build_snapshot(Some(&graph));

        assert_eq!(snapshot.nodes().len(), 2);
        assert_eq!(snapshot.edges().len(), 1);

        let n1 = &snapshot.nodes()[0];
        assert_eq!(n1.id, "n1");
        assert_eq!(n1.label, "Dog with Diarrhea");
        assert_eq!(n1.style, "presentation-node");
        assert_eq!(n1.geometry, Geometry::new(300.0, 20.0, 200.0, 60.0));

        let e1 = &snapshot.edges()[0];
        assert_eq!(e1.source.as_deref(), Some("n1"));
        assert_eq!(e1.target.as_deref(), Some("n2"));
        assert_eq!(e1.label, None);
    }

    #[test]
    fn test_idempotent() {
        let graph = sample_graph();
        assert_eq!(build_snapshot(Some(&graph)), build_snapshot(Some(&graph)));
    }

    #[test]
    fn test_reads_geometry_at_call_time() {
        let mut graph = sample_graph();
        let before = build_snapshot(Some(&graph));
        graph
            .set_geometry("n1", Geometry::new(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        let after = build_snapshot(Some(&graph));

        assert_ne!(before, after);
        assert_eq!(before.nodes()[0].geometry.x, 300.0);
        assert_eq!(after.nodes()[0].geometry.x, 0.0);
    }

    #[test]
    fn test_through_trait_object() {
        let graph = sample_graph();
        let dyn_graph: &dyn DiagramGraph = &graph;
        assert_eq!(build_snapshot(Some(dyn_graph)).nodes().len(), 2);
    }
}
