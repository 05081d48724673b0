use crate::bitmap::Bitmap;
use std::io::{self, Read, Write};

//===========================================================================//

// The signature that all PNG files start with.
pub(crate) const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G'];

//===========================================================================//

/// Compresses one bitmap into a self-contained image payload for an ICO
/// directory entry.
///
/// Implementations must be deterministic (the same bitmap always yields the
/// same bytes) and lossless, and the payload must carry its own dimensions
/// and alpha channel.
pub trait ImageCodec {
    /// Encodes `bitmap`, which has already been validated, and returns the
    /// payload bytes.
    fn compress(&self, bitmap: &Bitmap) -> io::Result<Vec<u8>>;
}

impl<C: ImageCodec + ?Sized> ImageCodec for &C {
    fn compress(&self, bitmap: &Bitmap) -> io::Result<Vec<u8>> {
        (**self).compress(bitmap)
    }
}

//===========================================================================//

/// Stores each bitmap as an 8-bit RGBA PNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngCodec;

impl PngCodec {
    /// Encodes the bitmap as a PNG file.
    pub fn write_png<W: Write>(bitmap: &Bitmap, writer: W) -> io::Result<()> {
        match PngCodec::write_png_enc(bitmap, writer) {
            Ok(()) => Ok(()),
            Err(png::EncodingError::IoError(error)) => Err(error),
            Err(png::EncodingError::Format(error)) => {
                invalid_input!("PNG format error: {}", error);
            }
            Err(png::EncodingError::LimitsExceeded) => {
                invalid_input!("PNG limits exceeded");
            }
            Err(png::EncodingError::Parameter(error)) => {
                invalid_input!("PNG parameter error: {}", error);
            }
        }
    }

    fn write_png_enc<W: Write>(
        bitmap: &Bitmap,
        writer: W,
    ) -> Result<(), png::EncodingError> {
        let mut encoder =
            png::Encoder::new(writer, bitmap.width(), bitmap.height());
        // Always RGBA, so that the directory's 32 bits-per-pixel is accurate.
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_color(png::ColorType::Rgba);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(bitmap.rgba_data())
    }

    /// Decodes a PNG file into a bitmap.  Returns an error if the PNG data is
    /// malformed or uses a format this crate can't convert to RGBA.
    pub fn read_png<R: Read>(reader: R) -> io::Result<Bitmap> {
        let decoder = png::Decoder::new(reader);
        let mut png_reader = match decoder.read_info() {
            Ok(png_reader) => png_reader,
            Err(error) => invalid_data!("Malformed PNG data: {}", error),
        };
        let info = png_reader.info();
        if info.width == 0 || info.height == 0 {
            invalid_data!(
                "Invalid PNG dimensions (was {}x{}, but must be nonzero)",
                info.width,
                info.height
            );
        }
        if info.bit_depth != png::BitDepth::Eight {
            invalid_data!("Unsupported PNG bit depth: {:?}", info.bit_depth);
        }
        let mut buffer = vec![0u8; png_reader.output_buffer_size()];
        let frame = match png_reader.next_frame(&mut buffer) {
            Ok(frame) => frame,
            Err(error) => invalid_data!("Malformed PNG data: {}", error),
        };
        buffer.truncate(frame.buffer_size());
        let rgba_data = match frame.color_type {
            png::ColorType::Rgba => buffer,
            png::ColorType::Rgb => {
                let mut rgba = Vec::with_capacity(buffer.len() / 3 * 4);
                for px in buffer.chunks_exact(3) {
                    rgba.extend_from_slice(px);
                    rgba.push(u8::MAX);
                }
                rgba
            }
            png::ColorType::GrayscaleAlpha => {
                let mut rgba = Vec::with_capacity(buffer.len() * 2);
                for px in buffer.chunks_exact(2) {
                    rgba.extend_from_slice(&[px[0], px[0], px[0], px[1]]);
                }
                rgba
            }
            png::ColorType::Grayscale => {
                let mut rgba = Vec::with_capacity(buffer.len() * 4);
                for &gray in buffer.iter() {
                    rgba.extend_from_slice(&[gray, gray, gray, u8::MAX]);
                }
                rgba
            }
            png::ColorType::Indexed => {
                invalid_data!(
                    "Unsupported PNG color type: {:?}",
                    frame.color_type
                );
            }
        };
        Ok(Bitmap::from_rgba_data(frame.width, frame.height, rgba_data))
    }
}

impl ImageCodec for PngCodec {
    fn compress(&self, bitmap: &Bitmap) -> io::Result<Vec<u8>> {
        let mut data = Vec::new();
        PngCodec::write_png(bitmap, &mut data)?;
        Ok(data)
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{ImageCodec, PngCodec, PNG_SIGNATURE};
    use crate::bitmap::Bitmap;

    fn gradient(width: u32, height: u32) -> Bitmap {
        let mut rgba = Vec::new();
        for index in 0..(width * height) {
            rgba.push((index % 256) as u8);
            rgba.push(if index % 3 == 0 { 0 } else { 255 });
            rgba.push((index / 7 % 256) as u8);
            rgba.push(if index % 5 == 0 { 128 } else { 255 });
        }
        Bitmap::from_rgba_data(width, height, rgba)
    }

    #[test]
    fn png_payload_starts_with_signature() {
        let data = PngCodec.compress(&gradient(5, 3)).unwrap();
        assert!(data.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn png_payload_is_lossless() {
        let bitmap = gradient(11, 13);
        let data = PngCodec.compress(&bitmap).unwrap();
        let decoded = PngCodec::read_png(data.as_slice()).unwrap();
        assert_eq!(decoded, bitmap);
    }

    #[test]
    fn png_payload_is_deterministic() {
        let bitmap = gradient(16, 16);
        assert_eq!(
            PngCodec.compress(&bitmap).unwrap(),
            PngCodec.compress(&bitmap).unwrap()
        );
    }

    #[test]
    fn read_grayscale_png() {
        let input: &[u8] = b"\
            \x89\x50\x4e\x47\x0d\x0a\x1a\x0a\x00\x00\x00\x0d\x49\x48\x44\x52\
            \x00\x00\x00\x02\x00\x00\x00\x02\x08\x00\x00\x00\x00\x57\xdd\x52\
            \xf8\x00\x00\x00\x0e\x49\x44\x41\x54\x78\x9c\x63\xb4\x77\x60\xdc\
            \xef\x00\x00\x04\x08\x01\x81\x86\x2e\xc9\x8d\x00\x00\x00\x00\x49\
            \x45\x4e\x44\xae\x42\x60\x82";
        let bitmap = PngCodec::read_png(input).unwrap();
        assert_eq!(bitmap.width(), 2);
        assert_eq!(bitmap.height(), 2);
        let rgba: &[u8] = b"\
            \x3f\x3f\x3f\xff\x7f\x7f\x7f\xff\
            \xbf\xbf\xbf\xff\xff\xff\xff\xff";
        assert_eq!(bitmap.rgba_data(), rgba);
    }

    #[test]
    fn read_truncated_png_fails() {
        assert!(PngCodec::read_png(&PNG_SIGNATURE[..]).is_err());
    }
}

//===========================================================================//
