//! Font metrics and styling constants.
//!
//! Calibrated for Open Sans with Arial as the fallback.

/// Font stack for every text element
pub const FONT_FAMILY: &str = "Open Sans, Arial, sans-serif";

/// Approximate rendered width of `text` in px at the given font size
pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    // Open Sans averages a little over half an em per glyph
    text.chars().count() as f64 * font_size * 0.55
}

/// Fixed font sizes used in the renderer (in px)
pub struct FontSizes;

impl FontSizes {
    pub const NODE_LABEL: f64 = 10.0;
    pub const PLACEHOLDER: f64 = 14.0;
}

/// Stroke widths per element type (in px)
pub struct StrokeWidths;

impl StrokeWidths {
    pub const NODE: f64 = 2.0;
    pub const CONNECTOR: f64 = 2.0;
    pub const CANVAS_BORDER: f64 = 2.0;
}

/// Arrow head marker dimensions
pub struct ArrowHead;

impl ArrowHead {
    pub const WIDTH: f64 = 10.0;
    pub const HEIGHT: f64 = 7.0;
    /// Tip sits one unit inside the marker box
    pub const REF_X: f64 = 9.0;
}

/// Corner radius of rounded node rectangles
pub const CORNER_RADIUS: f64 = 5.0;

/// Line advance for multi-line labels, in em
pub const LINE_HEIGHT_EM: f64 = 1.2;

/// Horizontal inset kept free on each side of a label (scaled with the node)
pub const LABEL_SPACING: f64 = 8.0;
