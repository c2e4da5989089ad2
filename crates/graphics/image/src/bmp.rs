//! The `.bmp` file format
//!
//! Only uncompressed 24 and 32 bit images are supported, which is what image
//! editors produce when exporting textures for small LED panels.
//!
//! Information about the format can be found at
//! * <http://www.ece.ualberta.ca/~elliott/ee552/studentAppNotes/2003_w/misc/bmp_file_format/bmp_file_format.htm>
//! * <http://www.martinreddy.net/gfx/2d/BMP.txt>

use math::{Bitmap, Color};

pub(crate) const BMP_MAGIC: [u8; 2] = [0x42, 0x4d];

/// Size of the file header plus the smallest info header
const MIN_FILE_SIZE: usize = 54;

const MAX_ACCEPTABLE_SIZE: u32 = 8096;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("not a bmp file")]
    NotABmp,

    #[error("unexpected end of file")]
    UnexpectedEndOfFile,

    #[error("unsupported bit depth: {0} bits per pixel")]
    UnsupportedBitDepth(u16),

    #[error("unsupported compression method {0}")]
    UnsupportedCompression(u32),

    #[error("image has no pixels")]
    InvalidDimensions,

    /// This image contains extreme values and cannot be parsed
    ///
    /// For example, the image might be too large to fit in memory.
    #[error("refusing to parse image")]
    RefuseToParse,

    #[error("pixel data extends past the end of the file")]
    DataOutOfBounds,
}

/// Little endian cursor over the raw file
struct Reader<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    fn next_chunk<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let chunk = self
            .bytes
            .get(self.cursor..self.cursor + N)
            .ok_or(Error::UnexpectedEndOfFile)?;
        self.cursor += N;

        let mut result = [0; N];
        result.copy_from_slice(chunk);
        Ok(result)
    }

    fn next_le_u16(&mut self) -> Result<u16, Error> {
        self.next_chunk().map(u16::from_le_bytes)
    }

    fn next_le_u32(&mut self) -> Result<u32, Error> {
        self.next_chunk().map(u32::from_le_bytes)
    }

    fn next_le_i32(&mut self) -> Result<i32, Error> {
        self.next_chunk().map(i32::from_le_bytes)
    }
}

pub fn decode(bytes: &[u8]) -> Result<Bitmap<Color>, Error> {
    if bytes.len() < MIN_FILE_SIZE {
        // Every file must at least contain the header and info header structures
        return Err(Error::UnexpectedEndOfFile);
    }

    let mut reader = Reader::new(bytes);

    // Start of header
    if reader.next_chunk()? != BMP_MAGIC {
        return Err(Error::NotABmp);
    }

    let file_size = reader.next_le_u32()?;
    if file_size as usize != bytes.len() {
        log::warn!(
            "bmp header states that the file size is 0x{file_size:x} bytes, but its 0x{:x}",
            bytes.len()
        );
    }

    let reserved = reader.next_le_u32()?;
    if reserved != 0 {
        log::warn!("Reserved field in bmp header is not zero (it is 0x{reserved:x})")
    }

    let image_data_offset = reader.next_le_u32()? as usize;

    // Start of the Info Header
    let info_header_size = reader.next_le_u32()?;
    let width = reader.next_le_i32()?;
    let height = reader.next_le_i32()?;
    let planes = reader.next_le_u16()?;
    if planes != 1 {
        log::warn!("Unexpected number of planes, expected 1, got {planes:?}");
    }

    let bits_per_pixel = reader.next_le_u16()?;
    let compression = reader.next_le_u32()?;

    log::debug!(
        "bmp info: {width}x{height}, {bits_per_pixel} bpp, header: {info_header_size} bytes, data offset: 0x{image_data_offset:x}"
    );

    let bytes_per_pixel = match bits_per_pixel {
        24 => 3,
        32 => 4,
        other => {
            log::error!("Unsupported bmp format: {other} bits per pixel");
            return Err(Error::UnsupportedBitDepth(other));
        },
    };

    // 3 (BI_BITFIELDS) is commonly used for 32 bit images with the default BGRA masks
    if compression != 0 && !(compression == 3 && bits_per_pixel == 32) {
        log::error!("Unsupported bmp compression: {compression}");
        return Err(Error::UnsupportedCompression(compression));
    }

    // A negative height means the rows are stored top to bottom
    let top_down = height < 0;
    let width = u32::try_from(width).map_err(|_| Error::InvalidDimensions)?;
    let height = height.unsigned_abs();

    if width == 0 || height == 0 {
        log::error!("Invalid bmp dimensions: {width}x{height}");
        return Err(Error::InvalidDimensions);
    }

    if width > MAX_ACCEPTABLE_SIZE || height > MAX_ACCEPTABLE_SIZE {
        log::error!("Refusing to allocate image of size {width}x{height}");
        return Err(Error::RefuseToParse);
    }

    let width = width as usize;
    let height = height as usize;
    let scanline_width = align_up::<4>(bytes_per_pixel * width);

    let image_data = bytes
        .get(image_data_offset..)
        .ok_or(Error::DataOutOfBounds)?;
    if image_data.len() < scanline_width * (height - 1) + bytes_per_pixel * width {
        log::error!("bmp pixel data is truncated");
        return Err(Error::DataOutOfBounds);
    }

    let mut pixels = Vec::with_capacity(width * height);
    for row in 0..height {
        let stored_row = if top_down { row } else { height - 1 - row };
        let scanline = &image_data[stored_row * scanline_width..];

        for pixel in scanline.chunks_exact(bytes_per_pixel).take(width) {
            let blue = pixel[0];
            let green = pixel[1];
            let red = pixel[2];
            let alpha = pixel.get(3).map_or(1., |&alpha| alpha as f32 / 255.);
            pixels.push(Color::rgba(red, green, blue, alpha));
        }
    }

    // Many encoders write 32 bit images without filling in the alpha channel
    if bytes_per_pixel == 4 && pixels.iter().all(|pixel| pixel.alpha() == 0.) {
        log::debug!("bmp alpha channel is empty, treating image as opaque");
        pixels.iter_mut().for_each(|pixel| pixel.set_alpha(1.));
    }

    Ok(Bitmap::from_data(pixels, width, height))
}

#[must_use]
fn align_up<const N: usize>(x: usize) -> usize {
    (x + N - 1) & !(N - 1)
}
