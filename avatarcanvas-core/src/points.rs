use serde::{Deserialize, Serialize};

/// 2D coordinate, used for both canvas-space and image-space values
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    pub fn mul_scalar(&self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }

    pub fn div_scalar(&self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }

    /// Midpoint between `self` and `other`
    pub fn midpoint(&self, other: &Self) -> Self {
        self.add(other).div_scalar(2.0)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Width and height of a canvas or a decoded image, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero (or not a positive number)
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

/// Axis-aligned rectangle, top-left anchored
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at (0, 0) with the given size
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if `other` lies fully inside this rectangle, allowing `epsilon` slack per edge
    pub fn contains_rect(&self, other: &Rect, epsilon: f64) -> bool {
        other.x >= self.x - epsilon
            && other.y >= self.y - epsilon
            && other.right() <= self.right() + epsilon
            && other.bottom() <= self.bottom() + epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(10.0, 20.0);
        let b = Point::new(4.0, 6.0);

        assert_eq!(a.add(&b), Point::new(14.0, 26.0));
        assert_eq!(a.sub(&b), Point::new(6.0, 14.0));
        assert_eq!(a.div_scalar(2.0), Point::new(5.0, 10.0));
        assert_eq!(a.mul_scalar(0.5), Point::new(5.0, 10.0));
        assert_eq!(a.midpoint(&b), Point::new(7.0, 13.0));
    }

    #[test]
    fn test_size_emptiness() {
        assert!(Size::new(0.0, 100.0).is_empty());
        assert!(Size::new(100.0, 0.0).is_empty());
        assert!(Size::new(f64::NAN, 10.0).is_empty());
        assert!(!Size::new(1.0, 1.0).is_empty());
    }

    #[test]
    fn test_rect_edges_and_center() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);

        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert_eq!(rect.center(), Point::new(60.0, 45.0));
        assert_eq!(rect.size(), Size::new(100.0, 50.0));
    }

    #[test]
    fn test_rect_contains_rect() {
        let bounds = Rect::from_size(Size::new(1000.0, 400.0));

        assert!(bounds.contains_rect(&Rect::new(0.0, 0.0, 1000.0, 400.0), 0.0));
        assert!(bounds.contains_rect(&Rect::new(100.0, 50.0, 200.0, 200.0), 0.0));
        assert!(!bounds.contains_rect(&Rect::new(-1.0, 0.0, 200.0, 200.0), 0.0));
        assert!(!bounds.contains_rect(&Rect::new(900.0, 0.0, 200.0, 200.0), 0.0));
        assert!(bounds.contains_rect(&Rect::new(-1e-12, 0.0, 200.0, 200.0), 1e-9));
    }

    #[test]
    fn test_rect_serialization_roundtrip() {
        let original = Rect::new(350.0, 150.0, 600.0, 600.0);

        let json = serde_json::to_string(&original).unwrap();
        let restored: Rect = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, original);
        assert_eq!(json, r#"{"x":350.0,"y":150.0,"width":600.0,"height":600.0}"#);
    }
}
