//! Texture decoding and sampling

pub mod bmp;
mod texture;

pub use texture::{Texture, TextureError, UnknownWrapMode, WrapMode};
