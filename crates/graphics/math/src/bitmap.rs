/// A row-major grid of values
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap<T: Copy> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy> Bitmap<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn from_data(data: Vec<T>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);

        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Set the pixel at the given coordinates to the specified value.
    ///
    /// # Panics
    /// This function panics if the coordinates are outside of the bitmap
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: T) {
        let index = self.index_of_pixel(x, y);
        self.data[index] = pixel;
    }

    /// Get the pixel value at the given coordinates
    ///
    /// # Panics
    /// This function panics if the coordinates are outside of the bitmap
    pub fn get_pixel(&self, x: usize, y: usize) -> T {
        self.data[self.index_of_pixel(x, y)]
    }

    /// Access a pixel with signed coordinates, returning `None` outside the bitmap
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<T> {
        self.contains(x, y)
            .then(|| self.data[y as usize * self.width + x as usize])
    }

    /// Mutable access to a pixel with signed coordinates, returning `None` outside the bitmap
    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        if self.contains(x, y) {
            let index = y as usize * self.width + x as usize;
            Some(&mut self.data[index])
        } else {
            None
        }
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        0 <= x && 0 <= y && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Calculate the index of the pixel data for a given set of coordinates
    fn index_of_pixel(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width);
        debug_assert!(y < self.height);

        y * self.width + x
    }
}

#[cfg(test)]
mod tests {
    use super::Bitmap;

    #[test]
    fn signed_access_is_clipped() {
        let mut bitmap = Bitmap::filled(3, 2, 0_u8);
        bitmap.set_pixel(2, 1, 7);

        assert_eq!(bitmap.get(2, 1), Some(7));
        assert_eq!(bitmap.get(-1, 0), None);
        assert_eq!(bitmap.get(3, 0), None);
        assert!(bitmap.get_mut(0, 2).is_none());
    }
}
