use math::{Bitmap, Color};

/// Size of a single packed [PixelRecord], in bytes
pub const PACKED_RECORD_SIZE: usize = 8;

/// A grid of colors that shapes are rendered into
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pixels: Bitmap<Color>,
}

impl FrameBuffer {
    /// Create a buffer where every pixel is [Color::TRANSPARENT]
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: Bitmap::filled(width, height, Color::TRANSPARENT),
        }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    pub fn clear(&mut self) {
        self.clear_with(Color::TRANSPARENT);
    }

    pub fn clear_with(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Returns `None` outside of the buffer
    #[inline]
    #[must_use]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.pixels.get(x, y)
    }

    /// Overwrite a pixel, writes outside of the buffer are ignored
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(pixel) = self.pixels.get_mut(x, y) {
            *pixel = color;
        }
    }

    /// Draw `color` on top of a pixel, writes outside of the buffer are ignored
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(pixel) = self.pixels.get_mut(x, y) {
            *pixel = pixel.blend_over(color);
        }
    }

    /// Iterate over all pixels in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = (i32, i32, Color)> + '_ {
        let width = self.width().max(1);
        self.pixels
            .data()
            .iter()
            .enumerate()
            .map(move |(index, &color)| ((index % width) as i32, (index / width) as i32, color))
    }

    /// All pixels that are not fully transparent
    pub fn covered_pixels(&self) -> impl Iterator<Item = PixelRecord> + '_ {
        self.pixels()
            .filter(|(_, _, color)| color.alpha() > 0.)
            .map(|(x, y, color)| PixelRecord { x, y, color })
    }

    #[must_use]
    pub fn as_bitmap(&self) -> &Bitmap<Color> {
        &self.pixels
    }
}

/// A single colored pixel, the unit of sparse frame updates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRecord {
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

impl PixelRecord {
    #[must_use]
    pub fn new(x: i32, y: i32, color: Color) -> Self {
        Self { x, y, color }
    }

    /// `x: i16 LE, y: i16 LE, red, green, blue, alpha * 255`
    ///
    /// Coordinates outside of the `i16` range are clamped.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; PACKED_RECORD_SIZE] {
        let clamp = |value: i32| value.clamp(i16::MIN.into(), i16::MAX.into()) as i16;
        let [x0, x1] = clamp(self.x).to_le_bytes();
        let [y0, y1] = clamp(self.y).to_le_bytes();
        let alpha = (self.color.alpha() * 255.).round() as u8;

        [
            x0,
            x1,
            y0,
            y1,
            self.color.red(),
            self.color.green(),
            self.color.blue(),
            alpha,
        ]
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; PACKED_RECORD_SIZE]) -> Self {
        Self {
            x: i16::from_le_bytes([bytes[0], bytes[1]]).into(),
            y: i16::from_le_bytes([bytes[2], bytes[3]]).into(),
            color: Color::rgba(bytes[4], bytes[5], bytes[6], bytes[7] as f32 / 255.),
        }
    }
}

#[must_use]
pub fn encode_records(records: &[PixelRecord]) -> Vec<u8> {
    records.iter().flat_map(PixelRecord::to_bytes).collect()
}

/// Decode packed records, a trailing partial record is ignored
#[must_use]
pub fn decode_records(bytes: &[u8]) -> Vec<PixelRecord> {
    let records = bytes.chunks_exact(PACKED_RECORD_SIZE);
    if !records.remainder().is_empty() {
        log::warn!(
            "Ignoring {} trailing bytes after {} pixel records",
            records.remainder().len(),
            bytes.len() / PACKED_RECORD_SIZE
        );
    }

    records
        .map(|chunk| {
            let mut record = [0; PACKED_RECORD_SIZE];
            record.copy_from_slice(chunk);
            PixelRecord::from_bytes(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{decode_records, encode_records, FrameBuffer, PixelRecord};
    use math::Color;

    #[test]
    fn out_of_bounds_access_is_ignored() {
        let mut buffer = FrameBuffer::new(4, 2);
        buffer.set_pixel(-1, 0, Color::RED);
        buffer.set_pixel(4, 1, Color::RED);
        buffer.set_pixel(3, 1, Color::GREEN);

        assert_eq!(buffer.get_pixel(3, 1), Some(Color::GREEN));
        assert_eq!(buffer.get_pixel(0, 2), None);
        assert_eq!(buffer.covered_pixels().count(), 1);
    }

    #[test]
    fn blending_and_clearing() {
        let mut buffer = FrameBuffer::new(1, 1);
        buffer.clear_with(Color::BLUE);
        buffer.blend_pixel(0, 0, Color::rgba(255, 0, 0, 0.5));

        let blended = buffer.get_pixel(0, 0).unwrap();
        assert_eq!((blended.red(), blended.blue()), (128, 128));

        buffer.clear();
        assert_eq!(buffer.get_pixel(0, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn covered_pixels_in_row_major_order() {
        let mut buffer = FrameBuffer::new(3, 3);
        buffer.set_pixel(2, 0, Color::RED);
        buffer.set_pixel(0, 2, Color::WHITE);

        let covered: Vec<_> = buffer.covered_pixels().collect();
        assert_eq!(
            covered,
            vec![
                PixelRecord::new(2, 0, Color::RED),
                PixelRecord::new(0, 2, Color::WHITE)
            ]
        );
    }

    #[test]
    fn packed_layout() {
        let record = PixelRecord::new(-2, 300, Color::rgba(1, 2, 3, 1.));
        assert_eq!(record.to_bytes(), [0xfe, 0xff, 0x2c, 0x01, 1, 2, 3, 255]);
    }

    #[test]
    fn decode_ignores_partial_records() {
        let records = [
            PixelRecord::new(0, 1, Color::RED),
            PixelRecord::new(63, 31, Color::rgba(10, 20, 30, 0.2)),
        ];
        let mut bytes = encode_records(&records);
        bytes.extend_from_slice(&[1, 2, 3]);

        let decoded = decode_records(&bytes);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0], records[0]);
        assert_eq!((decoded[1].x, decoded[1].y), (63, 31));
        assert_eq!(decoded[1].color.alpha(), 51. / 255.);
    }
}
