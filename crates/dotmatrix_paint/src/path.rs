//! Path building and representation

use crate::geometry::{Point, Rect};

/// Path action tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Start a new subpath
    Move,
    /// Extend the current subpath
    Line,
    /// Reconnect to the start of the current subpath
    Close,
}

/// One entry of a [`Path`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PathAction {
    pub point: Point,
    pub verb: Verb,
}

/// An ordered list of move/line/close actions
///
/// Actions are stored contiguously so fills can scan them linearly. A path
/// only grows until [`Path::reset`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    actions: Vec<PathAction>,
    /// Index of the first action of the current subpath
    subpath_start: usize,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[PathAction] {
        &self.actions
    }

    pub fn points(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.actions.iter().map(|a| a.point)
    }

    pub fn point_count(&self) -> usize {
        self.actions.len()
    }

    /// Every point carries exactly one verb
    pub fn verb_count(&self) -> usize {
        self.actions.len()
    }

    pub fn last_point(&self) -> Option<Point> {
        self.actions.last().map(|a| a.point)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn push(&mut self, point: Point, verb: Verb) {
        self.actions.push(PathAction { point, verb });
    }

    pub fn move_to(&mut self, point: Point) -> &mut Self {
        self.subpath_start = self.actions.len();
        self.push(point, Verb::Move);
        self
    }

    /// Extend the current subpath; on an empty path this starts it instead
    pub fn line_to(&mut self, point: Point) -> &mut Self {
        if self.actions.is_empty() {
            return self.move_to(point);
        }
        self.push(point, Verb::Line);
        self
    }

    /// Add a separate line segment as its own subpath
    pub fn add_line(&mut self, from: Point, to: Point) -> &mut Self {
        self.move_to(from).line_to(to)
    }

    /// Add connected segments through `points`
    pub fn add_poly_line(&mut self, points: &[Point]) -> &mut Self {
        let Some((first, rest)) = points.split_first() else {
            return self;
        };
        self.move_to(*first);
        for point in rest {
            self.line_to(*point);
        }
        self
    }

    /// Add a closed polygon through `points`
    pub fn add_polygon(&mut self, points: &[Point]) -> &mut Self {
        if points.is_empty() {
            return self;
        }
        self.add_poly_line(points).close()
    }

    /// Append every action of `other`, keeping its verbs
    pub fn add_path(&mut self, other: &Path) -> &mut Self {
        for action in &other.actions {
            match action.verb {
                Verb::Move => {
                    self.move_to(action.point);
                }
                Verb::Line => {
                    self.line_to(action.point);
                }
                Verb::Close => {
                    self.close();
                }
            }
        }
        self
    }

    /// Append a point equal to the start of the current subpath
    ///
    /// The next appended point starts a new subpath.
    pub fn close(&mut self) -> &mut Self {
        let Some(start) = self.actions.get(self.subpath_start).map(|a| a.point) else {
            return self;
        };
        self.push(start, Verb::Close);
        self.subpath_start = self.actions.len();
        self
    }

    pub fn reset(&mut self) {
        self.actions.clear();
        self.subpath_start = 0;
    }

    /// Inclusive bounding box of every point, `None` for an empty path
    ///
    /// The returned rectangle's `right`/`bottom` are one past the extreme
    /// points, so a single-point path has a 1x1 bounds.
    pub fn bounds(&self) -> Option<Rect> {
        let first = self.actions.first()?.point;
        let (min, max) = self.points().fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Some(Rect::from_points(min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_first_line_becomes_move() {
        let mut path = Path::new();
        path.line_to(p(1, 1)).line_to(p(2, 2));
        assert_eq!(path.actions()[0].verb, Verb::Move);
        assert_eq!(path.actions()[1].verb, Verb::Line);
    }

    #[test]
    fn test_close_returns_to_subpath_start() {
        let mut path = Path::new();
        path.add_polygon(&[p(0, 0), p(4, 0), p(4, 4)]);
        path.line_to(p(10, 10)).line_to(p(12, 10)).close();

        let points: Vec<Point> = path.points().collect();
        assert_eq!(
            points,
            vec![
                p(0, 0),
                p(4, 0),
                p(4, 4),
                p(0, 0),
                p(10, 10),
                p(12, 10),
                p(10, 10)
            ]
        );
        assert_eq!(path.verb_count(), 7);
    }

    #[test]
    fn test_close_after_move_uses_move_point() {
        let mut path = Path::new();
        path.add_line(p(0, 0), p(1, 0));
        path.move_to(p(5, 5)).line_to(p(6, 5)).close();
        assert_eq!(path.last_point(), Some(p(5, 5)));
    }

    #[test]
    fn test_bounds_uses_min_and_max() {
        let mut path = Path::new();
        assert_eq!(path.bounds(), None);
        path.add_poly_line(&[p(3, 9), p(-2, 4), p(7, 1)]);
        assert_eq!(path.bounds(), Some(Rect::new(-2, 1, 8, 10)));
    }

    #[test]
    fn test_add_path_and_reset() {
        let mut a = Path::new();
        a.add_polygon(&[p(0, 0), p(2, 0), p(2, 2)]);
        let mut b = Path::new();
        b.add_line(p(9, 9), p(8, 8));
        b.add_path(&a);
        assert_eq!(b.point_count(), 6);
        assert_eq!(b.last_point(), Some(p(0, 0)));

        b.reset();
        assert!(b.is_empty());
        assert_eq!(b.bounds(), None);
    }
}
