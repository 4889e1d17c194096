//! Dotmatrix Paint
//!
//! Integer scan conversion for small pixel displays.
//!
//! # Features
//!
//! - Packed pixel buffers from 1bpp monochrome up to 32bpp RGBA
//! - Lines, rectangles, triangles, circles, arcs and rounded rectangles
//! - Path outlines and even-odd polygon fills
//! - Antialiased lines and triangles
//! - Quarter-turn rotation and buffer compositing

pub mod antialias;
pub mod buffer;
pub mod circle;
pub mod color;
pub mod compositor;
pub mod error;
pub mod fill;
pub mod geometry;
pub mod gradient;
pub mod path;
pub mod raster;
pub mod rotation;

pub use buffer::{Bitmap, PixelBuffer};
pub use color::{Color, ColorMode};
pub use compositor::{BlitOptions, HorizontalAlignment, VerticalAlignment};
pub use error::{PaintError, Result};
pub use geometry::{Point, Point3d, PointF, Rect, Size};
pub use gradient::{GradientDirection, GradientStop, LinearGradient};
pub use path::{Path, PathAction, Verb};
pub use raster::{BitImage, Rasterizer};
pub use rotation::Rotation;
