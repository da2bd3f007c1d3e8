//! Zoom and pan state of the editing surface.
//!
//! Screen coordinates are `(graph + translate) * scale`.

use crate::types::Geometry;

/// Factor applied by one zoom step
pub const ZOOM_FACTOR: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    screen_bounds: Option<Geometry>,
}

impl Default for View {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            screen_bounds: None,
        }
    }
}

impl View {
    pub fn zoom_in(&mut self) {
        self.scale *= ZOOM_FACTOR;
    }

    pub fn zoom_out(&mut self) {
        self.scale /= ZOOM_FACTOR;
    }

    /// Graph-space point at the center of the visible area
    pub fn visible_center(&self, container: (f64, f64)) -> (f64, f64) {
        let (width, height) = container;
        (
            (width / 2.0 - self.translate_x * self.scale) / self.scale,
            (height / 2.0 - self.translate_y * self.scale) / self.scale,
        )
    }

    /// Scale and translate so `bounds` fills the container, centered on both axes.
    ///
    /// An axis with zero extent does not constrain the scale; if both are
    /// zero the current scale is kept.
    pub fn fit(&mut self, bounds: &Geometry, container: (f64, f64)) {
        let (width, height) = container;
        let scale_x = (bounds.width > 0.0).then(|| width / bounds.width);
        let scale_y = (bounds.height > 0.0).then(|| height / bounds.height);

        let scale = match (scale_x, scale_y) {
            (Some(x), Some(y)) => x.min(y),
            (Some(s), None) | (None, Some(s)) => s,
            (None, None) => self.scale,
        };
        if !scale.is_finite() || scale <= 0.0 {
            return;
        }

        self.scale = scale;
        self.translate_x = (width / scale - bounds.width) / 2.0 - bounds.x;
        self.translate_y = (height / scale - bounds.height) / 2.0 - bounds.y;
    }

    /// Recompute cached screen bounds of the graph content
    pub fn validate(&mut self, graph_bounds: Option<Geometry>) {
        self.screen_bounds = graph_bounds.map(|g| self.to_screen(&g));
    }

    /// Screen bounds as of the last [`View::validate`]
    pub fn screen_bounds(&self) -> Option<Geometry> {
        self.screen_bounds
    }

    pub fn to_screen(&self, g: &Geometry) -> Geometry {
        Geometry::new(
            (g.x + self.translate_x) * self.scale,
            (g.y + self.translate_y) * self.scale,
            g.width * self.scale,
            g.height * self.scale,
        )
    }
}
