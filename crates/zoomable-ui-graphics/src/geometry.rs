//! Geometric primitives: Point, Size

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A position or a displacement in logical pixels.
///
/// Pointer positions, pan deltas, centroids and content offsets all use this
/// type, so it carries the vector arithmetic the gesture math needs.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// Euclidean length of this point seen as a vector.
    pub fn distance(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Point {
    type Output = Point;

    fn div(self, rhs: f32) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    /// True when either dimension is zero or negative, i.e. nothing can be
    /// laid out or fitted into it.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }

    /// Width divided by height. Only meaningful for non-empty sizes.
    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }
}

impl Mul<f32> for Size {
    type Output = Size;

    fn mul(self, rhs: f32) -> Size {
        Size::new(self.width * rhs, self.height * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, -2.0);
        assert_eq!(a + b, Point::new(4.0, 2.0));
        assert_eq!(a - b, Point::new(2.0, 6.0));
        assert_eq!(a * 2.0, Point::new(6.0, 8.0));
        assert_eq!(a / 2.0, Point::new(1.5, 2.0));
        assert_eq!(-b, Point::new(-1.0, 2.0));
        assert_eq!(a.distance(), 5.0);
    }

    #[test]
    fn empty_sizes() {
        assert!(Size::ZERO.is_empty());
        assert!(Size::new(100.0, 0.0).is_empty());
        assert!(!Size::new(1.0, 1.0).is_empty());
    }
}
