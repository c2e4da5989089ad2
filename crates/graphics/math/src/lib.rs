//! Common utilities used in graphics-related libraries

mod angle;
mod bitmap;
mod color;
mod rect;
mod transform;
mod vec2d;

pub use angle::Angle;
pub use bitmap::Bitmap;
pub use color::Color;
pub use rect::Rectangle;
pub use transform::AffineTransform;
pub use vec2d::Vec2D;
