//! Display orientation

use crate::geometry::{Point, Rect};

/// Clockwise rotation between logical and physical buffer coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    Normal,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Rotation {
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees % 360 {
            0 => Some(Rotation::Normal),
            90 => Some(Rotation::Rotate90),
            180 => Some(Rotation::Rotate180),
            270 => Some(Rotation::Rotate270),
            _ => None,
        }
    }

    pub const fn degrees(&self) -> u32 {
        match self {
            Rotation::Normal => 0,
            Rotation::Rotate90 => 90,
            Rotation::Rotate180 => 180,
            Rotation::Rotate270 => 270,
        }
    }

    /// Rotate further by `other`
    pub fn rotated_by(&self, other: Rotation) -> Rotation {
        match Rotation::from_degrees(self.degrees() + other.degrees()) {
            Some(rotation) => rotation,
            None => unreachable!("sum of quarter turns is a quarter turn"),
        }
    }

    /// True if logical width and height are swapped relative to the buffer
    pub const fn is_transposed(&self) -> bool {
        matches!(self, Rotation::Rotate90 | Rotation::Rotate270)
    }

    /// Logical size for a physical buffer of `width` x `height`
    pub const fn logical_size(&self, width: i32, height: i32) -> (i32, i32) {
        if self.is_transposed() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Map a logical coordinate onto a physical buffer of `width` x `height`
    pub const fn apply(&self, x: i32, y: i32, width: i32, height: i32) -> (i32, i32) {
        match self {
            Rotation::Normal => (x, y),
            Rotation::Rotate90 => (width - y - 1, x),
            Rotation::Rotate180 => (width - x - 1, height - y - 1),
            Rotation::Rotate270 => (y, height - x - 1),
        }
    }

    pub fn apply_point(&self, point: Point, width: i32, height: i32) -> Point {
        let (x, y) = self.apply(point.x, point.y, width, height);
        Point::new(x, y)
    }

    /// Map a logical rectangle onto the physical buffer
    pub fn apply_rect(&self, rect: Rect, width: i32, height: i32) -> Rect {
        if rect.is_empty() {
            return Rect::default();
        }
        let a = self.apply_point(rect.origin(), width, height);
        let b = self.apply_point(
            Point::new(rect.right - 1, rect.bottom - 1),
            width,
            height,
        );
        Rect::from_points(a, b)
    }
}
