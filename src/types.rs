//! Type definitions for diagram snapshots

use crate::style::CellStyle;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Geometry
// ============================================================================

/// Axis-aligned rectangle in diagram units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// All fields and the far corner are finite
    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.width, self.height, self.right(), self.bottom()]
            .iter()
            .all(|v| v.is_finite())
    }
}

// ============================================================================
// Style tags
// ============================================================================

/// Categorical node type, decides color and shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleTag {
    Presentation,
    Decision,
    Pathway,
    Diagnostic,
    Treatment,
    Outcome,
}

impl StyleTag {
    pub const ALL: [StyleTag; 6] = [
        StyleTag::Presentation,
        StyleTag::Decision,
        StyleTag::Pathway,
        StyleTag::Diagnostic,
        StyleTag::Treatment,
        StyleTag::Outcome,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleTag::Presentation => "presentation",
            StyleTag::Decision => "decision",
            StyleTag::Pathway => "pathway",
            StyleTag::Diagnostic => "diagnostic",
            StyleTag::Treatment => "treatment",
            StyleTag::Outcome => "outcome",
        }
    }

    /// Name of the stylesheet entry used by the live editor (`decision-node`)
    pub fn style_name(&self) -> String {
        format!("{}-node", self.as_str())
    }

    /// Resolve the tag of a live-graph style string.
    ///
    /// Only the style name counts, and it must be exactly `<tag>` or
    /// `<tag>-node`. Override entries such as `align=center` are ignored.
    pub fn from_style(style: &str) -> Option<Self> {
        let parsed = CellStyle::parse(style);
        let name = parsed.name()?;
        let base = name.strip_suffix("-node").unwrap_or(name);
        base.parse().ok()
    }
}

impl FromStr for StyleTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StyleTag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown style tag '{}'", s))
    }
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Render variant
// ============================================================================

/// Which of the two side-by-side renderings is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Learner,
    Reference,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Learner => "learner",
            Variant::Reference => "reference",
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "learner" | "student" => Ok(Variant::Learner),
            "reference" | "expert" => Ok(Variant::Reference),
            other => Err(format!("unknown variant '{}'", other)),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Snapshot records
// ============================================================================

/// A node captured from the live diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(default, alias = "value")]
    pub label: String,
    /// Raw style string as held by the live graph
    #[serde(default)]
    pub style: String,
    pub geometry: Geometry,
}

impl NodeRecord {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        style: impl Into<String>,
        geometry: Geometry,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            style: style.into(),
            geometry,
        }
    }

    pub fn style_tag(&self) -> Option<StyleTag> {
        StyleTag::from_style(&self.style)
    }
}

/// A directed edge captured from the live diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default, alias = "value", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl EdgeRecord {
    pub fn new(
        id: impl Into<String>,
        source: Option<&str>,
        target: Option<&str>,
        label: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.map(str::to_string),
            target: target.map(str::to_string),
            label: label.map(str::to_string),
        }
    }
}

/// Immutable copy of the diagram at one instant.
///
/// Snapshots are replaced wholesale on every edit; there is no way to
/// mutate one after it is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    edges: Vec<EdgeRecord>,
}

impl Snapshot {
    pub fn new(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>) -> Self {
        Self { nodes, edges }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Ids of edges whose present endpoints do not name a node of this snapshot
    pub fn dangling_edges(&self) -> Vec<&str> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges
            .iter()
            .filter(|e| {
                let missing = |end: &Option<String>| {
                    end.as_deref().is_some_and(|id| !ids.contains(id))
                };
                missing(&e.source) || missing(&e.target)
            })
            .map(|e| e.id.as_str())
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
