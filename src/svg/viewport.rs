//! Mapping from diagram space onto the fixed output canvas.

use super::renderer::RenderOptions;
use crate::types::{Geometry, NodeRecord};

/// Axis-aligned box enclosing every node rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounds of all nodes with finite geometry, `None` if there are none
    /// or the combined extent overflows
    pub fn of_nodes<'a>(nodes: impl IntoIterator<Item = &'a NodeRecord>) -> Option<Self> {
        nodes
            .into_iter()
            .map(|n| &n.geometry)
            .filter(|g| g.is_finite())
            .fold(None, |acc: Option<Bounds>, g| {
                Some(match acc {
                    None => Bounds {
                        min_x: g.x,
                        min_y: g.y,
                        max_x: g.right(),
                        max_y: g.bottom(),
                    },
                    Some(b) => Bounds {
                        min_x: b.min_x.min(g.x),
                        min_y: b.min_y.min(g.y),
                        max_x: b.max_x.max(g.right()),
                        max_y: b.max_y.max(g.bottom()),
                    },
                })
            })
            .filter(|b| b.width().is_finite() && b.height().is_finite())
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Uniform scale followed by a translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Transform {
    /// Shrink `bounds` to fit the usable canvas area (never enlarge) and
    /// center the result on both axes.
    ///
    /// An axis with zero extent does not constrain the scale.
    pub fn fit(bounds: &Bounds, options: &RenderOptions) -> Self {
        let (usable_w, usable_h) = options.usable_size();
        let mut scale: f64 = 1.0;
        if bounds.width() > 0.0 {
            scale = scale.min(usable_w / bounds.width());
        }
        if bounds.height() > 0.0 {
            scale = scale.min(usable_h / bounds.height());
        }

        Self {
            scale,
            offset_x: (options.width - bounds.width() * scale) / 2.0 - bounds.min_x * scale,
            offset_y: (options.height - bounds.height() * scale) / 2.0 - bounds.min_y * scale,
        }
    }

    pub fn point(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale + self.offset_x, y * self.scale + self.offset_y)
    }

    pub fn rect(&self, g: &Geometry) -> Geometry {
        let (x, y) = self.point(g.x, g.y);
        Geometry::new(x, y, g.width * self.scale, g.height * self.scale)
    }
}
