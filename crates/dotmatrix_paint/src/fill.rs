//! Scanline polygon fill and path drawing

use smallvec::SmallVec;
use tracing::trace;

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::geometry::Point;
use crate::path::{Path, Verb};
use crate::raster::Rasterizer;

/// Bias applied before rounding span ends up, so an intersection that lands
/// a hair above an integer does not claim the next pixel
const EPSILON: f64 = 1e-9;

/// A non-horizontal polygon edge, walked one scanline at a time
#[derive(Clone, Copy, Debug)]
struct Edge {
    /// Intersection with the current scanline
    x: f64,
    /// Change in x per scanline
    inverse_slope: f64,
}

impl<B: PixelBuffer> Rasterizer<B> {
    /// Fill a closed polygon with the even-odd rule
    ///
    /// Each edge covers scanlines `top <= y < bottom`, so shared vertices are
    /// counted once and horizontal edges are ignored. Within a scanline,
    /// intersections are sorted and filled pairwise; a pixel is inside when
    /// its column lies in `[x0, x1)`.
    pub fn fill_polygon(&mut self, points: &[Point], color: Color) {
        if points.len() < 3 {
            return;
        }
        let (top, bottom) = points
            .iter()
            .fold((i32::MAX, i32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        // Rows actually walked; off-screen rows get no bucket
        let (first, end) = if self.ignore_out_of_bounds() {
            (top.max(0), bottom.min(self.height()))
        } else {
            (top, bottom)
        };
        if first >= end {
            return;
        }
        let row_of = |y: i32| (i64::from(y) - i64::from(first)) as usize;

        let mut edges: Vec<Edge> = Vec::with_capacity(points.len());
        let mut buckets: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); row_of(end)];

        for (i, &a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            if a.y == b.y {
                continue;
            }
            let (upper, lower) = if a.y < b.y { (a, b) } else { (b, a) };
            let (start, stop) = (upper.y.max(first), lower.y.min(end));
            if start >= stop {
                continue;
            }
            let inverse_slope = (f64::from(lower.x) - f64::from(upper.x))
                / (f64::from(lower.y) - f64::from(upper.y));
            let index = edges.len();
            edges.push(Edge {
                x: f64::from(upper.x) + inverse_slope * (f64::from(start) - f64::from(upper.y)),
                inverse_slope,
            });
            for y in start..stop {
                buckets[row_of(y)].push(index);
            }
        }
        trace!(edges = edges.len(), rows = buckets.len(), "fill_polygon");

        let mut active: SmallVec<[usize; 8]> = SmallVec::new();
        for (row, bucket) in buckets.iter().enumerate() {
            let y = first + row as i32;
            active.clear();
            active.extend_from_slice(bucket);
            active.sort_by(|&a, &b| edges[a].x.total_cmp(&edges[b].x));

            // An unmatched trailing intersection is dropped
            for pair in active.chunks_exact(2) {
                let x0 = (edges[pair[0]].x - EPSILON).ceil() as i32;
                let x1 = (edges[pair[1]].x - EPSILON).ceil() as i32;
                self.fill_span(x0, x1.saturating_sub(1), y, color);
            }
            for &index in bucket {
                edges[index].x += edges[index].inverse_slope;
            }
        }
    }

    /// Fill every point of `path` as one polygon
    pub fn fill_path(&mut self, path: &Path, color: Color) {
        let points: SmallVec<[Point; 16]> = path.points().collect();
        self.fill_polygon(&points, color);
    }

    /// Stroke or fill a path
    ///
    /// Outlines draw a line for every line or close action from the
    /// previous point; move actions only reposition.
    pub fn draw_path(&mut self, path: &Path, filled: bool, color: Color) {
        if filled {
            self.fill_path(path, color);
            return;
        }
        let mut current: Option<Point> = None;
        for action in path.actions() {
            match (action.verb, current) {
                (Verb::Line | Verb::Close, Some(from)) => {
                    self.draw_line_between(from, action.point, color);
                }
                _ => {}
            }
            current = Some(action.point);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Bitmap;
    use crate::color::ColorMode;
    use pretty_assertions::assert_eq;

    fn raster() -> Rasterizer<Bitmap> {
        Rasterizer::new(Bitmap::new(16, 16, ColorMode::Format1bpp))
    }

    fn count(r: &Rasterizer<Bitmap>) -> usize {
        (0..r.height())
            .flat_map(|y| (0..r.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| r.get_pixel(x, y) == Some(Color::WHITE))
            .count()
    }

    #[test]
    fn test_axis_aligned_square_is_half_open() {
        let mut r = raster();
        let square = [
            Point::new(2, 2),
            Point::new(6, 2),
            Point::new(6, 6),
            Point::new(2, 6),
        ];
        r.fill_polygon(&square, Color::WHITE);
        assert_eq!(count(&r), 16);
        assert_eq!(r.get_pixel(2, 2), Some(Color::WHITE));
        assert_eq!(r.get_pixel(5, 5), Some(Color::WHITE));
        assert_eq!(r.get_pixel(6, 5), Some(Color::BLACK));
        assert_eq!(r.get_pixel(5, 6), Some(Color::BLACK));
    }

    #[test]
    fn test_degenerate_polygons_draw_nothing() {
        let mut r = raster();
        r.fill_polygon(&[Point::new(0, 0), Point::new(5, 5)], Color::WHITE);
        r.fill_polygon(
            &[Point::new(0, 3), Point::new(5, 3), Point::new(9, 3)],
            Color::WHITE,
        );
        assert_eq!(count(&r), 0);
    }

    #[test]
    fn test_even_odd_leaves_hole() {
        let mut r = raster();
        let mut path = Path::new();
        path.add_polygon(&[
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
        ]);
        path.add_polygon(&[
            Point::new(3, 3),
            Point::new(7, 3),
            Point::new(7, 7),
            Point::new(3, 7),
        ]);
        r.draw_path(&path, true, Color::WHITE);
        assert_eq!(r.get_pixel(1, 1), Some(Color::WHITE));
        assert_eq!(r.get_pixel(5, 5), Some(Color::BLACK));
    }

    #[test]
    fn test_outline_path_skips_moves() {
        let mut r = raster();
        let mut path = Path::new();
        path.add_line(Point::new(0, 0), Point::new(3, 0));
        path.add_line(Point::new(0, 5), Point::new(3, 5));
        r.draw_path(&path, false, Color::WHITE);
        assert_eq!(count(&r), 8);
        assert_eq!(r.get_pixel(0, 2), Some(Color::BLACK));
    }

    #[test]
    fn test_far_offscreen_vertices_are_clipped() {
        let mut r = raster();
        r.fill_polygon(
            &[
                Point::new(-1_000_000, -1_000_000),
                Point::new(1_000_000, -1_000_000),
                Point::new(1_000_000, 1_000_000),
                Point::new(-1_000_000, 1_000_000),
            ],
            Color::WHITE,
        );
        assert_eq!(count(&r), 16 * 16);
    }

    #[test]
    fn test_extreme_vertices_do_not_overflow() {
        let mut r = Rasterizer::new(Bitmap::new(8, 8, ColorMode::Format1bpp));
        r.fill_polygon(
            &[
                Point::new(0, i32::MIN + 1),
                Point::new(4, i32::MAX - 1),
                Point::new(8, 0),
            ],
            Color::WHITE,
        );
        // Near-vertical edges at x = 2 and x = 8 bound every visible row
        assert_eq!(r.get_pixel(5, 3), Some(Color::WHITE));
        assert_eq!(r.get_pixel(0, 3), Some(Color::BLACK));
    }
}
