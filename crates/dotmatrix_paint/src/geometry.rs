//! Geometric primitives
//!
//! Integer types address pixels; [`PointF`] carries sub-pixel positions for
//! antialiased drawing.

use std::ops::{Add, Sub};

/// A pixel position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_empty(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<PointF> for Point {
    fn from(p: PointF) -> Self {
        Point::new(p.x.round() as i32, p.y.round() as i32)
    }
}

/// A sub-pixel position
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub const ZERO: PointF = PointF { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_empty(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for PointF {
    type Output = PointF;

    fn add(self, rhs: PointF) -> PointF {
        PointF::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PointF {
    type Output = PointF;

    fn sub(self, rhs: PointF) -> PointF {
        PointF::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<Point> for PointF {
    fn from(p: Point) -> Self {
        PointF::new(p.x as f32, p.y as f32)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point3d {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Point3d {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn is_empty(&self) -> bool {
        self.x == 0 && self.y == 0 && self.z == 0
    }
}

impl Add for Point3d {
    type Output = Point3d;

    fn add(self, rhs: Point3d) -> Point3d {
        Point3d::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3d {
    type Output = Point3d;

    fn sub(self, rhs: Point3d) -> Point3d {
        Point3d::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// A width/height pair in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 && self.height == 0
    }
}

impl Add for Size {
    type Output = Size;

    fn add(self, rhs: Size) -> Size {
        Size::new(self.width + rhs.width, self.height + rhs.height)
    }
}

impl Sub for Size {
    type Output = Size;

    fn sub(self, rhs: Size) -> Size {
        Size::new(self.width - rhs.width, self.height - rhs.height)
    }
}

/// An axis-aligned rectangle
///
/// `right` and `bottom` are exclusive, so a rectangle covers
/// `width() * height()` pixels. Operations assume the rectangle is
/// normalized (`left <= right`, `top <= bottom`); use [`Rect::normalized`]
/// on user input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// The smallest rectangle containing both points, inclusive of both
    pub fn from_points(p1: Point, p2: Point) -> Self {
        Self::new(
            p1.x.min(p2.x),
            p1.y.min(p2.y),
            p1.x.max(p2.x) + 1,
            p1.y.max(p2.y) + 1,
        )
    }

    pub fn normalized(&self) -> Self {
        Self::new(
            self.left.min(self.right),
            self.top.min(self.bottom),
            self.left.max(self.right),
            self.top.max(self.bottom),
        )
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn mid_x(&self) -> i32 {
        self.left + self.width() / 2
    }

    pub fn mid_y(&self) -> i32 {
        self.top + self.height() / 2
    }

    pub fn center(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    /// True if the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    pub fn contains_point(&self, point: Point) -> bool {
        self.contains(point.x, point.y)
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// The overlapping area of both rectangles, `None` if they are disjoint
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let r = Rect::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        (!r.is_empty()).then_some(r)
    }

    /// The smallest rectangle containing both rectangles
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.left + dx,
            self.top + dy,
            self.right + dx,
            self.bottom + dy,
        )
    }

    /// Grow (or shrink, for negative amounts) the rectangle on every side
    pub fn inflate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.left - dx,
            self.top - dy,
            self.right + dx,
            self.bottom + dy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(3, 4);
        let b = Point::new(1, 7);
        assert_eq!(a + b, Point::new(4, 11));
        assert_eq!(a - b, Point::new(2, -3));
        assert!(Point::ZERO.is_empty());
        assert!(!a.is_empty());
        assert!(Point3d::default().is_empty());
        assert!(!Size::new(0, 1).is_empty());
    }

    #[test]
    fn test_pointf_rounds_to_nearest() {
        assert_eq!(Point::from(PointF::new(1.6, -0.4)), Point::new(2, 0));
    }

    #[test]
    fn test_rect_dimensions() {
        let r = Rect::from_origin_size(10, 20, 30, 40);
        assert_eq!(r.width(), 30);
        assert_eq!(r.height(), 40);
        assert_eq!(r.mid_x(), 25);
        assert_eq!(r.mid_y(), 40);
        assert_eq!(r.size(), Size::new(30, 40));
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let r = Rect::new(0, 0, 4, 4);
        assert!(r.contains(0, 0));
        assert!(r.contains(3, 3));
        assert!(!r.contains(4, 3));
        assert!(!r.contains(-1, 0));
        assert!(r.contains_rect(&Rect::new(1, 1, 4, 4)));
        assert!(!r.contains_rect(&Rect::new(1, 1, 5, 4)));
    }

    #[test]
    fn test_rect_intersect_and_union() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 15, 15);
        assert_eq!(a.intersect(&b), Some(Rect::new(5, 5, 10, 10)));
        assert_eq!(a.union(&b), Rect::new(0, 0, 15, 15));

        let far = Rect::new(20, 20, 30, 30);
        assert!(!a.intersects(&far));
        assert_eq!(a.intersect(&far), None);
        assert_eq!(Rect::default().union(&far), far);
    }

    #[test]
    fn test_rect_normalized() {
        let r = Rect::new(10, 8, 2, 1).normalized();
        assert_eq!(r, Rect::new(2, 1, 10, 8));
        assert_eq!(
            Rect::from_points(Point::new(5, 1), Point::new(2, 3)),
            Rect::new(2, 1, 6, 4)
        );
    }
}
