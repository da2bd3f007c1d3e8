//! Default diagram and palette element presets.

use crate::graph::{GraphEditor, GraphError};
use crate::types::{Geometry, StyleTag};

/// Default label and size of a node added from the palette
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementTemplate {
    pub label: &'static str,
    pub width: f64,
    pub height: f64,
}

impl ElementTemplate {
    pub fn for_tag(tag: StyleTag) -> Self {
        let (label, width, height) = match tag {
            StyleTag::Presentation => ("Dog with Diarrhea", 200.0, 60.0),
            StyleTag::Decision => ("Decision Point", 180.0, 100.0),
            StyleTag::Pathway => ("Pathway", 180.0, 60.0),
            StyleTag::Diagnostic => ("Diagnostic Test", 200.0, 80.0),
            StyleTag::Treatment => ("Treatment", 200.0, 80.0),
            StyleTag::Outcome => ("Outcome", 200.0, 60.0),
        };
        Self {
            label,
            width,
            height,
        }
    }
}

struct TemplateNode {
    id: &'static str,
    label: &'static str,
    geometry: (f64, f64, f64, f64),
    tag: StyleTag,
}

struct TemplateEdge {
    id: &'static str,
    label: &'static str,
    source: &'static str,
    target: &'static str,
}

const TEMPLATE_NODES: &[TemplateNode] = &[
    TemplateNode {
        id: "n1",
        label: "Dog with Diarrhea",
        geometry: (300.0, 20.0, 200.0, 60.0),
        tag: StyleTag::Presentation,
    },
    TemplateNode {
        id: "n2",
        label: "Duration of\nclinical signs?",
        geometry: (320.0, 120.0, 180.0, 100.0),
        tag: StyleTag::Decision,
    },
    TemplateNode {
        id: "n3",
        label: "Acute (< 3 weeks)",
        geometry: (100.0, 260.0, 180.0, 60.0),
        tag: StyleTag::Pathway,
    },
    TemplateNode {
        id: "n4",
        label: "Chronic (≥ 3 weeks)",
        geometry: (520.0, 260.0, 180.0, 60.0),
        tag: StyleTag::Pathway,
    },
];

const TEMPLATE_EDGES: &[TemplateEdge] = &[
    TemplateEdge {
        id: "e1",
        label: "",
        source: "n1",
        target: "n2",
    },
    TemplateEdge {
        id: "e2",
        label: "Acute",
        source: "n2",
        target: "n3",
    },
    TemplateEdge {
        id: "e3",
        label: "Chronic",
        source: "n2",
        target: "n4",
    },
];

/// Insert the starting diagram into an empty graph, as one update batch.
pub fn insert_template<G: GraphEditor + ?Sized>(graph: &mut G) -> Result<(), GraphError> {
    graph.begin_update();
    let result = insert_cells(&mut *graph);
    graph.end_update();
    result
}

fn insert_cells<G: GraphEditor + ?Sized>(graph: &mut G) -> Result<(), GraphError> {
    for node in TEMPLATE_NODES {
        let (x, y, w, h) = node.geometry;
        graph.insert_vertex(
            Some(node.id),
            node.label,
            Geometry::new(x, y, w, h),
            &node.tag.style_name(),
        )?;
    }
    for edge in TEMPLATE_EDGES {
        graph.insert_edge(Some(edge.id), edge.label, edge.source, edge.target)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DiagramGraph, MemoryGraph};

    #[test]
    fn test_template_contents() {
        let mut graph = MemoryGraph::new();
        insert_template(&mut graph).unwrap();

        assert_eq!(graph.children(), vec!["n1", "n2", "n3", "n4", "e1", "e2", "e3"]);
        assert_eq!(graph.style("n2").as_deref(), Some("decision-node"));
        assert_eq!(graph.label("e2").as_deref(), Some("Acute"));
        assert_eq!(graph.target("e3").as_deref(), Some("n4"));
    }

    #[test]
    fn test_template_into_non_empty_graph_fails_on_ids() {
        let mut graph = MemoryGraph::new();
        insert_template(&mut graph).unwrap();
        assert_eq!(
            insert_template(&mut graph),
            Err(GraphError::DuplicateId("n1".to_string()))
        );
    }

    #[test]
    fn test_palette_sizes() {
        let decision = ElementTemplate::for_tag(StyleTag::Decision);
        assert_eq!((decision.width, decision.height), (180.0, 100.0));
        assert_eq!(ElementTemplate::for_tag(StyleTag::Outcome).label, "Outcome");
    }
}
