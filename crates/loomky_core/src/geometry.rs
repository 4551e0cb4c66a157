//! Viewport geometry
//!
//! Page-space points, sizes and rectangles, plus the visible-fraction math
//! used to decide whether a region has scrolled far enough into view.

/// 2D point in page coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

/// 2D rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn area(&self) -> f32 {
        self.size.area()
    }

    /// Check if this rect intersects with another
    ///
    /// Edges that merely touch do not count as an intersection.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.origin.x < other.right()
            && self.right() > other.origin.x
            && self.origin.y < other.bottom()
            && self.bottom() > other.origin.y
    }

    /// Get the intersection of two rects (if they overlap)
    pub fn intersection(&self, other: &Rect) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }

        let x = self.origin.x.max(other.origin.x);
        let y = self.origin.y.max(other.origin.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Some(Rect::new(x, y, right - x, bottom - y))
    }

    /// Fraction of this rect's area that lies inside `viewport`, in `[0, 1]`
    ///
    /// Returns `None` for a rect with no area: there is nothing to measure,
    /// so such a region can never be considered visible.
    pub fn visible_fraction(&self, viewport: &Rect) -> Option<f32> {
        let area = self.area();
        if area <= 0.0 || !area.is_finite() {
            return None;
        }
        let visible = self
            .intersection(viewport)
            .map(|r| r.area())
            .unwrap_or(0.0);
        Some((visible / area).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 100.0, 100.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));

        let touching = Rect::new(100.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&touching));
        assert_eq!(a.intersection(&touching), None);
    }

    #[test]
    fn test_visible_fraction() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);

        let inside = Rect::new(0.0, 100.0, 800.0, 200.0);
        assert_eq!(inside.visible_fraction(&viewport), Some(1.0));

        // Bottom quarter of the region hangs below the fold
        let straddling = Rect::new(0.0, 500.0, 800.0, 400.0);
        assert_eq!(straddling.visible_fraction(&viewport), Some(0.25));

        let below = Rect::new(0.0, 900.0, 800.0, 100.0);
        assert_eq!(below.visible_fraction(&viewport), Some(0.0));
    }

    #[test]
    fn test_zero_area_has_no_fraction() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
        assert_eq!(Rect::new(10.0, 10.0, 0.0, 50.0).visible_fraction(&viewport), None);
        assert_eq!(Rect::ZERO.visible_fraction(&viewport), None);
    }
}
