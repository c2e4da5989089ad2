use std::{fs, io, path::Path, str::FromStr};

use math::{Bitmap, Color};

use crate::bmp;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to read texture file")]
    Io(#[from] io::Error),

    #[error("failed to decode bmp")]
    Bmp(#[from] bmp::Error),
}

/// Controls what is sampled outside of the texture area
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrapMode {
    /// Tile the texture
    #[default]
    Repeat,

    /// Use the nearest edge pixel
    Clamp,

    /// Tile the texture, flipping every other tile
    Mirror,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown wrap mode")]
pub struct UnknownWrapMode;

impl FromStr for WrapMode {
    type Err = UnknownWrapMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repeat" => Ok(Self::Repeat),
            "clamp" => Ok(Self::Clamp),
            "mirror" => Ok(Self::Mirror),
            _ => Err(UnknownWrapMode),
        }
    }
}

impl WrapMode {
    /// Map a (possibly out of range) coordinate into `0..size`
    ///
    /// `size` must not be zero.
    #[must_use]
    pub fn wrap(&self, coordinate: i32, size: usize) -> usize {
        debug_assert_ne!(size, 0);
        let size = size as i64;
        let coordinate = coordinate as i64;

        let wrapped = match self {
            Self::Repeat => coordinate.rem_euclid(size),
            Self::Clamp => coordinate.clamp(0, size - 1),
            Self::Mirror => {
                let period = coordinate.rem_euclid(2 * size);
                if period < size {
                    period
                } else {
                    2 * size - 1 - period
                }
            },
        };
        wrapped as usize
    }
}

/// A decoded image that can be mapped onto shapes
///
/// A texture without any pixels is considered invalid. Sampling an invalid
/// texture yields black.
#[derive(Clone, Debug)]
pub struct Texture {
    pixels: Bitmap<Color>,
    wrap_mode: WrapMode,
}

impl Default for Texture {
    fn default() -> Self {
        Self::from_pixels(Bitmap::from_data(vec![], 0, 0))
    }
}

impl Texture {
    #[must_use]
    pub fn from_pixels(pixels: Bitmap<Color>) -> Self {
        Self {
            pixels,
            wrap_mode: WrapMode::default(),
        }
    }

    pub fn from_bmp_bytes(bytes: &[u8]) -> Result<Self, TextureError> {
        Ok(Self::from_pixels(bmp::decode(bytes)?))
    }

    /// Read and decode a `.bmp` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let texture = Self::from_bmp_bytes(&bytes)?;

        log::info!(
            "Loaded texture {} ({}x{}, {} bytes)",
            path.display(),
            texture.width(),
            texture.height(),
            bytes.len()
        );
        Ok(texture)
    }

    /// Replace the contents of this texture with the file at `path`
    ///
    /// Returns whether loading succeeded. On failure the texture becomes invalid,
    /// so shapes using it fall back to their plain color. The wrap mode is kept.
    pub fn load_into<P: AsRef<Path>>(&mut self, path: P) -> bool {
        match Self::load(path.as_ref()) {
            Ok(texture) => {
                self.pixels = texture.pixels;
                true
            },
            Err(error) => {
                log::error!("Failed to load texture {}: {error}", path.as_ref().display());
                self.pixels = Bitmap::from_data(vec![], 0, 0);
                false
            },
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width() != 0 && self.height() != 0
    }

    #[must_use]
    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap_mode
    }

    pub fn set_wrap_mode(&mut self, wrap_mode: WrapMode) {
        self.wrap_mode = wrap_mode;
    }

    #[must_use]
    pub fn pixels(&self) -> &Bitmap<Color> {
        &self.pixels
    }

    /// Access a texel, wrapping the coordinates according to the [WrapMode]
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Color {
        if !self.is_valid() {
            return Color::BLACK;
        }

        let x = self.wrap_mode.wrap(x, self.width());
        let y = self.wrap_mode.wrap(y, self.height());
        self.pixels.get_pixel(x, y)
    }

    /// Nearest-neighbour sample at normalized texture coordinates
    ///
    /// `(0, 0)` is the top left corner of the texture and `(1, 1)` the bottom right one.
    #[must_use]
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let to_texel = |coordinate: f32, size: usize| {
            let texel = (coordinate * size as f32).floor();
            if texel.is_finite() {
                texel as i32
            } else {
                0
            }
        };

        self.get(to_texel(u, self.width()), to_texel(v, self.height()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Texture, WrapMode};
    use crate::bmp::tests::encode;
    use math::{Bitmap, Color};

    fn checkerboard() -> Texture {
        Texture::from_pixels(Bitmap::from_data(
            vec![Color::RED, Color::GREEN, Color::BLUE, Color::WHITE],
            2,
            2,
        ))
    }

    #[test]
    fn wrap_modes() {
        assert_eq!(WrapMode::Repeat.wrap(-1, 4), 3);
        assert_eq!(WrapMode::Repeat.wrap(9, 4), 1);
        assert_eq!(WrapMode::Clamp.wrap(-5, 4), 0);
        assert_eq!(WrapMode::Clamp.wrap(9, 4), 3);
        assert_eq!(WrapMode::Mirror.wrap(4, 4), 3);
        assert_eq!(WrapMode::Mirror.wrap(-1, 4), 0);
        assert_eq!(WrapMode::Mirror.wrap(9, 4), 1);
    }

    #[test]
    fn parse_wrap_mode() {
        assert_eq!("mirror".parse::<WrapMode>(), Ok(WrapMode::Mirror));
        assert!("wobble".parse::<WrapMode>().is_err());
    }

    #[test]
    fn nearest_sampling() {
        let texture = checkerboard();
        assert_eq!(texture.sample(0.1, 0.1), Color::RED);
        assert_eq!(texture.sample(0.9, 0.1), Color::GREEN);
        assert_eq!(texture.sample(0.1, 0.9), Color::BLUE);
        assert_eq!(texture.sample(1.25, 0.1), Color::RED);
    }

    #[test]
    fn clamped_sampling() {
        let mut texture = checkerboard();
        texture.set_wrap_mode(WrapMode::Clamp);
        assert_eq!(texture.sample(1.25, 0.1), Color::GREEN);
        assert_eq!(texture.sample(-3., 5.), Color::BLUE);
    }

    #[test]
    fn invalid_texture_samples_black() {
        let texture = Texture::default();
        assert!(!texture.is_valid());
        assert_eq!(texture.sample(0.5, 0.5), Color::BLACK);
    }

    #[test]
    fn failed_load_invalidates() {
        let mut texture = checkerboard();
        assert!(!texture.load_into("/this/file/does/not/exist.bmp"));
        assert!(!texture.is_valid());
    }

    #[test]
    fn load_from_disk() {
        let path = std::env::temp_dir().join(format!("texture-{}.bmp", std::process::id()));
        std::fs::write(&path, encode(1, 1, 24, &[vec![0, 255, 0]])).expect("write temp file");

        let mut texture = Texture::default();
        assert!(texture.load_into(&path));
        assert_eq!(texture.get(0, 0), Color::GREEN);

        let _ = std::fs::remove_file(path);
    }
}
