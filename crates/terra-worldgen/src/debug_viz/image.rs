//! RGBA pixel buffer filled one sample at a time by the map renderers.

use hashbrown::HashSet;

/// Opaque RGB color.
pub type Rgb = (u8, u8, u8);

/// Row-major RGBA image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height` RGBA quadruples, row by row.
    pub pixels: Vec<u8>,
}

impl DebugImage {
    /// A fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Build an opaque image by asking `color` for every pixel in row order.
    ///
    /// Stops at the first error.
    pub fn try_from_fn<E>(
        width: u32,
        height: u32,
        mut color: impl FnMut(u32, u32) -> Result<Rgb, E>,
    ) -> Result<Self, E> {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for py in 0..height {
            for px in 0..width {
                let (r, g, b) = color(px, py)?;
                pixels.extend_from_slice(&[r, g, b, u8::MAX]);
            }
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Set an opaque pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the image.
    pub fn set_rgb(&mut self, x: u32, y: u32, (r, g, b): Rgb) {
        let i = self.offset(x, y);
        self.pixels[i..i + 4].copy_from_slice(&[r, g, b, u8::MAX]);
    }

    /// RGBA value of a pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let i = self.offset(x, y);
        let [r, g, b, a] = [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ];
        (r, g, b, a)
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Distinct RGB values, alpha ignored.
    pub fn unique_color_count(&self) -> usize {
        let colors: HashSet<Rgb> = self
            .pixels
            .chunks_exact(4)
            .map(|p| (p[0], p[1], p[2]))
            .collect();
        colors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_image_is_transparent() {
        let image = DebugImage::new(6, 3);
        assert_eq!(image.dimensions(), (6, 3));
        assert_eq!(image.pixels.len(), 6 * 3 * 4);
        assert_eq!(image.get_pixel(5, 2), (0, 0, 0, 0));
    }

    #[test]
    fn test_try_from_fn_visits_row_major() {
        let image = DebugImage::try_from_fn(3, 2, |x, y| Ok::<_, ()>((x as u8, y as u8, 7)))
            .expect("infallible");
        assert_eq!(image.get_pixel(2, 0), (2, 0, 7, 255));
        assert_eq!(image.get_pixel(0, 1), (0, 1, 7, 255));
        assert_eq!(&image.pixels[12..16], &[0, 1, 7, 255]);
    }

    #[test]
    fn test_try_from_fn_stops_at_first_error() {
        let mut calls = 0;
        let result = DebugImage::try_from_fn(4, 4, |x, y| {
            calls += 1;
            if (x, y) == (1, 1) { Err("boom") } else { Ok((0, 0, 0)) }
        });
        assert_eq!(result, Err("boom"));
        assert_eq!(calls, 6);
    }

    #[test]
    fn test_set_rgb_is_opaque() {
        let mut image = DebugImage::new(8, 8);
        image.set_rgb(2, 3, (10, 20, 30));
        assert_eq!(image.get_pixel(2, 3), (10, 20, 30, 255));
        assert_eq!(image.get_pixel(3, 2), (0, 0, 0, 0));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_out_of_bounds_pixel_panics() {
        DebugImage::new(2, 2).set_rgb(2, 0, (1, 1, 1));
    }

    #[test]
    fn test_unique_color_count() {
        let colors = [(255, 0, 0), (0, 255, 0), (255, 0, 0), (0, 0, 255)];
        let image = DebugImage::try_from_fn(4, 1, |x, _| Ok::<_, ()>(colors[x as usize]))
            .expect("infallible");
        assert_eq!(image.unique_color_count(), 3);
    }
}
