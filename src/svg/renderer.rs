//! SVG renderer - converts a Snapshot into a comparison SVG string.
//!
//! Pure string building, no DOM manipulation.
//! Renders back-to-front: edges → node shapes with their labels, so node
//! fills occlude edge endpoints.

use super::styles::{
    estimate_text_width, ArrowHead, FontSizes, StrokeWidths, CORNER_RADIUS, FONT_FAMILY,
    LABEL_SPACING, LINE_HEIGHT_EM,
};
use super::theme::{svg_open_tag, Chrome, NodeAppearance, ShapeKind};
use super::viewport::{Bounds, Transform};
use crate::types::{EdgeRecord, Geometry, NodeRecord, Snapshot, Variant};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Caption shown when a snapshot has no nodes
pub const EMPTY_CAPTION: &str = "No diagram elements found";

/// Output canvas dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub width: f64,
    pub height: f64,
    /// Margin kept free on every side when fitting the diagram
    pub padding: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 350.0,
            padding: 10.0,
        }
    }
}

impl RenderOptions {
    /// Area available to the diagram once padding is taken off
    pub fn usable_size(&self) -> (f64, f64) {
        (
            (self.width - 2.0 * self.padding).max(0.0),
            (self.height - 2.0 * self.padding).max(0.0),
        )
    }
}

/// Render a snapshot with the default canvas.
pub fn render_comparison_default(snapshot: &Snapshot, variant: Variant) -> String {
    render_comparison(snapshot, variant, &RenderOptions::default())
}

/// Render a snapshot as a self-contained SVG string.
///
/// The output depends only on the arguments. `variant` namespaces the
/// definition ids so a learner and a reference render can share a document.
pub fn render_comparison(snapshot: &Snapshot, variant: Variant, options: &RenderOptions) -> String {
    let mut parts: Vec<String> = Vec::new();
    parts.push(svg_open_tag(options));

    let bounds = match Bounds::of_nodes(snapshot.nodes()) {
        Some(bounds) => bounds,
        None => {
            debug!(variant = variant.as_str(); "Rendering empty placeholder");
            parts.push(render_placeholder(options));
            parts.push("</svg>".to_string());
            return parts.join("\n");
        }
    };
    let transform = Transform::fit(&bounds, options);

    let nodes: HashMap<&str, &NodeRecord> = snapshot
        .nodes()
        .iter()
        .filter(|n| n.geometry.is_finite())
        .map(|n| (n.id.as_str(), n))
        .collect();

    parts.push("<defs>".to_string());
    parts.push(arrow_marker_def(variant));
    parts.push("</defs>".to_string());

    // 1. Edges (rendered behind nodes)
    let mut drawn_edges = 0usize;
    for edge in snapshot.edges() {
        match resolve_edge(edge, &nodes) {
            Some((source, target)) => {
                parts.push(render_edge(source, target, &transform, variant));
                drawn_edges += 1;
            }
            None => {
                trace!(edge = edge.id.as_str(); "Skipping edge with unresolved endpoint");
            }
        }
    }

    // 2. Node shapes, each followed by its label
    for node in snapshot.nodes().iter().filter(|n| n.geometry.is_finite()) {
        let rect = transform.rect(&node.geometry);
        let appearance = NodeAppearance::for_tag(node.style_tag());
        parts.push(render_node_shape(&rect, &appearance));
        parts.push(render_node_label(&node.label, &rect, transform.scale));
    }

    debug!(
        variant = variant.as_str(),
        nodes = snapshot.nodes().len(),
        edges = drawn_edges,
        scale = transform.scale;
        "Rendered comparison"
    );

    parts.push("</svg>".to_string());
    parts.join("\n")
}

fn render_placeholder(options: &RenderOptions) -> String {
    format!(
        r#"<text x="{}" y="{}" text-anchor="middle" font-family="{}" font-size="{}" fill="{}">{}</text>"#,
        fmt_num(options.width / 2.0),
        fmt_num(options.height / 2.0),
        FONT_FAMILY,
        FontSizes::PLACEHOLDER,
        Chrome::CAPTION,
        EMPTY_CAPTION
    )
}

// ============================================================================
// Arrow marker definitions
// ============================================================================

/// Marker id of the arrowhead for `variant`
pub fn marker_id(variant: Variant) -> String {
    format!("arrowhead-{}", variant.as_str())
}

fn arrow_marker_def(variant: Variant) -> String {
    let w = ArrowHead::WIDTH;
    let h = ArrowHead::HEIGHT;
    format!(
        r#"  <marker id="{id}" markerWidth="{w}" markerHeight="{h}" refX="{ref_x}" refY="{half_h}" orient="auto">
    <polygon points="0 0, {w} {half_h}, 0 {h}" fill="{fill}" />
  </marker>"#,
        id = marker_id(variant),
        w = w,
        h = h,
        ref_x = ArrowHead::REF_X,
        half_h = h / 2.0,
        fill = Chrome::LINE
    )
}

// ============================================================================
// Edge rendering
// ============================================================================

fn resolve_edge<'a>(
    edge: &EdgeRecord,
    nodes: &HashMap<&str, &'a NodeRecord>,
) -> Option<(&'a NodeRecord, &'a NodeRecord)> {
    let source = *nodes.get(edge.source.as_deref()?)?;
    let target = *nodes.get(edge.target.as_deref()?)?;
    Some((source, target))
}

fn render_edge(
    source: &NodeRecord,
    target: &NodeRecord,
    t: &Transform,
    variant: Variant,
) -> String {
    let (sx, sy) = source.geometry.center();
    let (tx, ty) = target.geometry.center();
    let (x1, y1) = t.point(sx, sy);
    let (x2, y2) = t.point(tx, ty);
    format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" marker-end="url(#{})" />"#,
        fmt_num(x1),
        fmt_num(y1),
        fmt_num(x2),
        fmt_num(y2),
        Chrome::LINE,
        StrokeWidths::CONNECTOR,
        marker_id(variant)
    )
}

// ============================================================================
// Node rendering
// ============================================================================

fn render_node_shape(rect: &Geometry, appearance: &NodeAppearance) -> String {
    match appearance.shape {
        ShapeKind::Diamond => render_diamond(rect, appearance.fill, appearance.stroke),
        ShapeKind::RoundedRect => render_rounded_rect(rect, appearance.fill, appearance.stroke),
    }
}

fn render_rounded_rect(rect: &Geometry, fill: &str, stroke: &str) -> String {
    format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" stroke="{}" stroke-width="{}" />"#,
        fmt_num(rect.x),
        fmt_num(rect.y),
        fmt_num(rect.width),
        fmt_num(rect.height),
        CORNER_RADIUS,
        fill,
        stroke,
        StrokeWidths::NODE
    )
}

fn render_diamond(rect: &Geometry, fill: &str, stroke: &str) -> String {
    let (cx, cy) = rect.center();
    let points = format!(
        "{},{} {},{} {},{} {},{}",
        fmt_num(cx),
        fmt_num(rect.y), // top
        fmt_num(rect.right()),
        fmt_num(cy), // right
        fmt_num(cx),
        fmt_num(rect.bottom()), // bottom
        fmt_num(rect.x),
        fmt_num(cy) // left
    );
    format!(
        r#"<polygon points="{}" fill="{}" stroke="{}" stroke-width="{}" />"#,
        points,
        fill,
        stroke,
        StrokeWidths::NODE
    )
}

// ============================================================================
// Node label rendering
// ============================================================================

fn render_node_label(label: &str, rect: &Geometry, scale: f64) -> String {
    let (cx, cy) = rect.center();
    let max_width = rect.width - 2.0 * LABEL_SPACING * scale;
    let lines = layout_label(label, max_width, FontSizes::NODE_LABEL);

    let open = format!(
        r#"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" font-family="{}" font-size="{}" fill="{}">"#,
        fmt_num(cx),
        fmt_num(cy),
        FONT_FAMILY,
        FontSizes::NODE_LABEL,
        Chrome::TEXT
    );

    let body = match lines.len() {
        0 => String::new(),
        1 => escape_xml(&lines[0]),
        n => {
            // First line moves up so the block is centered on cy
            let first_dy = -((n - 1) as f64) / 2.0 * LINE_HEIGHT_EM;
            lines
                .iter()
                .enumerate()
                .map(|(i, line)| {
                    let dy = if i == 0 { first_dy } else { LINE_HEIGHT_EM };
                    format!(
                        r#"<tspan x="{}" dy="{}em">{}</tspan>"#,
                        fmt_num(cx),
                        fmt_num(dy),
                        escape_xml(line)
                    )
                })
                .collect::<Vec<_>>()
                .join("")
        }
    };

    format!("{}{}</text>", open, body)
}

/// Split a label into display lines.
///
/// Explicit newlines always break. Within a line, words are wrapped greedily
/// once the estimated width would exceed `max_width`; a single word wider
/// than the limit keeps a line of its own. An empty label has no lines.
pub fn layout_label(label: &str, max_width: f64, font_size: f64) -> Vec<String> {
    if label.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for paragraph in label.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        if max_width <= 0.0 || estimate_text_width(paragraph, font_size) <= max_width {
            lines.push(paragraph.to_string());
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", current, word);
            if estimate_text_width(&candidate, font_size) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}

// ============================================================================
// Utilities
// ============================================================================

/// Escape special XML characters in text content
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Format a coordinate with at most two decimals and no trailing zeros.
pub fn fmt_num(n: f64) -> String {
    let s = format!("{:.2}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
