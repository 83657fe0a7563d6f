/// Treemap layout: maps a node's children onto rectangles whose areas are
/// proportional to their sizes.
///
/// - [`squarify`] lays out a single level.
/// - [`layout_nested`] recurses into directories, reserving a header band
///   and padding at each level, for a full nested treemap.
///
/// Both are pure functions of their inputs: no state is kept between calls
/// and degenerate inputs produce an empty layout instead of an error.
mod nested;
mod squarify;

pub use nested::{layout_nested, NestedLayout, Tile};
pub use squarify::squarify;

/// Axis-aligned rectangle in layout units, `(x, y)` being the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Longer side over shorter side; `INFINITY` for a degenerate rectangle.
    pub fn aspect_ratio(&self) -> f64 {
        let (long, short) = if self.w >= self.h {
            (self.w, self.h)
        } else {
            (self.h, self.w)
        };
        if short > 0.0 {
            long / short
        } else {
            f64::INFINITY
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// The rectangle left after removing `header` from the top and `pad`
    /// from every side, or `None` if nothing usable remains.
    pub fn inset(&self, header: f64, pad: f64) -> Option<Rect> {
        let inner = Rect::new(
            self.x + pad,
            self.y + header + pad,
            self.w - 2.0 * pad,
            self.h - header - 2.0 * pad,
        );
        (!inner.is_empty()).then_some(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_is_orientation_independent() {
        assert_eq!(Rect::new(0.0, 0.0, 4.0, 1.0).aspect_ratio(), 4.0);
        assert_eq!(Rect::new(0.0, 0.0, 1.0, 4.0).aspect_ratio(), 4.0);
        assert!(Rect::new(0.0, 0.0, 0.0, 4.0).aspect_ratio().is_infinite());
    }

    #[test]
    fn inset_removes_header_and_padding() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.inset(16.0, 2.0), Some(Rect::new(12.0, 38.0, 96.0, 30.0)));
        assert_eq!(r.inset(48.0, 2.0), None);
    }
}
