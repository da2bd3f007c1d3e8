//! Color and shape system for comparison renders.
//!
//! Node colors come from a fixed table keyed by [`StyleTag`]. Anything that
//! does not resolve to a tag falls back to [`NodeAppearance::DEFAULT`].

use super::renderer::{fmt_num, RenderOptions};
use super::styles::StrokeWidths;
use crate::types::StyleTag;

/// Chrome colors shared by both variants
pub struct Chrome;

impl Chrome {
    pub const BACKGROUND: &'static str = "white";
    pub const ACCENT: &'static str = "#017DFA";
    pub const LINE: &'static str = "#666";
    pub const TEXT: &'static str = "#000";
    pub const CAPTION: &'static str = "#666";
}

/// Outline traced for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    RoundedRect,
    /// Rhombus through the four edge midpoints of the node rectangle
    Diamond,
}

/// Shape and colors of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeAppearance {
    pub shape: ShapeKind,
    pub fill: &'static str,
    pub stroke: &'static str,
}

impl NodeAppearance {
    pub const DEFAULT: NodeAppearance = NodeAppearance {
        shape: ShapeKind::RoundedRect,
        fill: "#e3f2fd",
        stroke: "#1976d2",
    };

    pub fn for_tag(tag: Option<StyleTag>) -> Self {
        let Some(tag) = tag else {
            return Self::DEFAULT;
        };

        let (fill, stroke) = match tag {
            StyleTag::Presentation => ("#dae8fc", "#6c8ebf"),
            StyleTag::Decision => ("#fff2cc", "#d6b656"),
            StyleTag::Pathway => ("#d5e8d4", "#82b366"),
            StyleTag::Diagnostic | StyleTag::Treatment => ("#f8cecc", "#b85450"),
            StyleTag::Outcome => ("#e1d5e7", "#9673a6"),
        };
        let shape = match tag {
            StyleTag::Decision => ShapeKind::Diamond,
            _ => ShapeKind::RoundedRect,
        };

        Self {
            shape,
            fill,
            stroke,
        }
    }
}

/// Build the SVG opening tag for a canvas of the configured size.
pub fn svg_open_tag(options: &RenderOptions) -> String {
    let w = fmt_num(options.width);
    let h = fmt_num(options.height);
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="{}" viewBox="0 0 {} {}" style="border-top:{}px solid {};border-radius:0px;background:{}">"#,
        h,
        w,
        h,
        StrokeWidths::CANVAS_BORDER,
        Chrome::ACCENT,
        Chrome::BACKGROUND
    )
}
