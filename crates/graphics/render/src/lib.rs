//! Retained mode 2D renderer for LED matrix displays
//!
//! Shapes live in a [Scene] and are arranged hierarchically using collections.
//! A [Renderer] walks the scene graph and draws it into a [FrameBuffer],
//! which can then be pushed to a display.

mod collision;
mod frame_buffer;
mod rasterizer;
mod renderer;
mod scene;
mod shape;
mod transform;

pub use collision::intersects;
pub use frame_buffer::{
    decode_records, encode_records, FrameBuffer, PixelRecord, PACKED_RECORD_SIZE,
};
pub use rasterizer::Rasterizer;
pub use renderer::{RenderError, Renderer};
pub use scene::{Scene, SceneError, ShapeId};
pub use shape::{
    regular_polygon_radius, regular_polygon_side_length, Collider, Geometry, RegularPolygonParams,
    RegularPolygonSize, Shape, ShapeError,
};
pub use transform::{TextureTransform, Transform};
