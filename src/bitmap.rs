use crate::error::BitmapDefect;

//===========================================================================//

/// One rendered image, stored as straight (non-premultiplied) RGBA.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    rgba_data: Vec<u8>,
}

impl Bitmap {
    /// Wraps the given RGBA data, which should have `4 * width * height`
    /// bytes in row-major order from top to bottom.  Never panics; a bitmap
    /// with bad dimensions is rejected later, when it is encoded.
    pub fn from_rgba_data(
        width: u32,
        height: u32,
        rgba_data: Vec<u8>,
    ) -> Bitmap {
        Bitmap { width, height, rgba_data }
    }

    /// Creates a bitmap where every pixel has the same color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Bitmap {
        let num_pixels = (width as usize) * (height as usize);
        let mut rgba_data = Vec::with_capacity(num_pixels * 4);
        for _ in 0..num_pixels {
            rgba_data.extend_from_slice(&rgba);
        }
        Bitmap { width, height, rgba_data }
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the RGBA data for this image, in row-major order from top to
    /// bottom.
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }

    /// Returns the RGBA value of the pixel at `(x, y)`, or `None` if the
    /// coordinates are outside the image or the buffer is too short.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = 4 * ((y as usize) * (self.width as usize) + x as usize);
        let px = self.rgba_data.get(start..start + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    #[cfg(feature = "render")]
    pub(crate) fn pixel_mut(&mut self, x: u32, y: u32) -> Option<&mut [u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = 4 * ((y as usize) * (self.width as usize) + x as usize);
        self.rgba_data.get_mut(start..start + 4)
    }

    /// Checks that the dimensions are nonzero and that the buffer holds
    /// exactly one RGBA quadruple per pixel.
    pub fn validate(&self) -> Result<(), BitmapDefect> {
        if self.width == 0 || self.height == 0 {
            return Err(BitmapDefect::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        let expected = match (self.width as u64)
            .checked_mul(self.height as u64)
            .and_then(|num_pixels| num_pixels.checked_mul(4))
        {
            Some(expected) => expected,
            None => {
                return Err(BitmapDefect::Oversized {
                    width: self.width,
                    height: self.height,
                })
            }
        };
        if self.rgba_data.len() as u64 != expected {
            return Err(BitmapDefect::BufferLength {
                actual: self.rgba_data.len(),
                expected,
            });
        }
        Ok(())
    }
}

//===========================================================================//


//===========================================================================//
