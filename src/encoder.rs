use crate::bitmap::Bitmap;
use crate::codec::{ImageCodec, PngCodec};
use crate::error::EncodeError;
use crate::layout::{write_header, DirectoryEntry, DIR_ENTRY_LEN, HEADER_LEN};
use std::io::{self, Write};
use tracing::{debug, trace};

//===========================================================================//

/// Packs a list of bitmaps into a single ICO container.
///
/// Encoding runs in two phases: every bitmap is compressed first, and only
/// once all payload sizes are known are the directory offsets computed and
/// the bytes emitted.  The output is therefore a plain append with no seeking
/// or backpatching.  The encoder keeps no state between calls, so one encoder
/// may be shared freely between threads.
#[derive(Clone, Debug, Default)]
pub struct IconEncoder<C = PngCodec> {
    codec: C,
}

impl IconEncoder<PngCodec> {
    /// Creates an encoder that stores each image as a PNG.
    pub fn new() -> IconEncoder<PngCodec> {
        IconEncoder { codec: PngCodec }
    }
}

impl<C: ImageCodec> IconEncoder<C> {
    /// Creates an encoder that compresses images with the given codec.
    pub fn with_codec(codec: C) -> IconEncoder<C> {
        IconEncoder { codec }
    }

    /// Returns the codec used for each payload.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Encodes `bitmaps`, in order, into the bytes of an ICO file.
    pub fn encode(&self, bitmaps: &[Bitmap]) -> Result<Vec<u8>, EncodeError> {
        let count = check_input(bitmaps)?;
        let payloads = self.compress_all(bitmaps)?;
        let images: Vec<(u32, u32, usize)> = bitmaps
            .iter()
            .zip(payloads.iter())
            .map(|(bitmap, data)| {
                (bitmap.width(), bitmap.height(), data.len())
            })
            .collect();
        let entries = plan_directory(&images)?;
        let total = entries
            .last()
            .map_or(0, |entry| entry.payload_end() as usize);
        let mut output = Vec::with_capacity(total);
        assemble(&mut output, count, &entries, &payloads)
            .map_err(EncodeError::SinkWrite)?;
        debug_assert_eq!(output.len(), total);
        debug!(count, bytes = output.len(), "encoded icon container");
        Ok(output)
    }

    /// Encodes `bitmaps` and writes the finished container to `sink`.
    /// Nothing is written unless encoding succeeds in full.
    pub fn encode_to<W: Write>(
        &self,
        bitmaps: &[Bitmap],
        mut sink: W,
    ) -> Result<(), EncodeError> {
        let data = self.encode(bitmaps)?;
        sink.write_all(&data).map_err(EncodeError::SinkWrite)?;
        sink.flush().map_err(EncodeError::SinkWrite)
    }

    fn compress_all(
        &self,
        bitmaps: &[Bitmap],
    ) -> Result<Vec<Vec<u8>>, EncodeError> {
        let mut payloads = Vec::with_capacity(bitmaps.len());
        for (index, bitmap) in bitmaps.iter().enumerate() {
            let data = self
                .codec
                .compress(bitmap)
                .map_err(|source| EncodeError::Codec { index, source })?;
            debug!(
                index,
                width = bitmap.width(),
                height = bitmap.height(),
                payload_size = data.len(),
                "compressed icon image"
            );
            payloads.push(data);
        }
        Ok(payloads)
    }
}

//===========================================================================//

/// Rejects inputs that can't form a valid container and returns the entry
/// count.
fn check_input(bitmaps: &[Bitmap]) -> Result<u16, EncodeError> {
    if bitmaps.is_empty() {
        return Err(EncodeError::EmptyInput);
    }
    let count = match u16::try_from(bitmaps.len()) {
        Ok(count) => count,
        Err(_) => {
            return Err(EncodeError::TooManyImages { count: bitmaps.len() })
        }
    };
    for (index, bitmap) in bitmaps.iter().enumerate() {
        bitmap
            .validate()
            .map_err(|defect| EncodeError::InvalidBitmap { index, defect })?;
    }
    Ok(count)
}

/// Computes the directory for images given as `(width, height,
/// payload_size)` triples, in input order.  Payloads start right after the
/// directory and follow one another with no gaps.
pub fn plan_directory(
    images: &[(u32, u32, usize)],
) -> Result<Vec<DirectoryEntry>, EncodeError> {
    let count = match u16::try_from(images.len()) {
        Ok(count) => count as u32,
        Err(_) => {
            return Err(EncodeError::TooManyImages { count: images.len() })
        }
    };
    let mut data_offset = HEADER_LEN + DIR_ENTRY_LEN * count;
    let mut entries = Vec::with_capacity(images.len());
    for (index, &(width, height, size)) in images.iter().enumerate() {
        let data_size = u32::try_from(size)
            .map_err(|_| EncodeError::OffsetOverflow { index })?;
        let next_offset = data_offset
            .checked_add(data_size)
            .ok_or(EncodeError::OffsetOverflow { index })?;
        trace!(index, offset = data_offset, size = data_size, "placed");
        entries.push(DirectoryEntry::for_image(
            width,
            height,
            data_size,
            data_offset,
        ));
        data_offset = next_offset;
    }
    Ok(entries)
}

fn assemble<W: Write>(
    writer: &mut W,
    count: u16,
    entries: &[DirectoryEntry],
    payloads: &[Vec<u8>],
) -> io::Result<()> {
    write_header(writer, count)?;
    for entry in entries.iter() {
        entry.write(writer)?;
    }
    for data in payloads.iter() {
        writer.write_all(data)?;
    }
    Ok(())
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{plan_directory, IconEncoder};
    use crate::bitmap::Bitmap;
    use crate::codec::ImageCodec;
    use crate::error::{BitmapDefect, EncodeError};
    use std::io;

    // Stores raw RGBA bytes as the payload, so payload sizes are predictable.
    struct RawCodec;

    impl ImageCodec for RawCodec {
        fn compress(&self, bitmap: &Bitmap) -> io::Result<Vec<u8>> {
            Ok(bitmap.rgba_data().to_vec())
        }
    }

    // Fails on any bitmap wider than 20 pixels.
    struct PickyCodec;

    impl ImageCodec for PickyCodec {
        fn compress(&self, bitmap: &Bitmap) -> io::Result<Vec<u8>> {
            if bitmap.width() > 20 {
                invalid_input!("too wide");
            }
            Ok(vec![0xab; 3])
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        let result = IconEncoder::new().encode(&[]);
        assert!(matches!(result, Err(EncodeError::EmptyInput)));
    }

    #[test]
    fn zero_width_bitmap_is_rejected_with_index() {
        let bitmaps = vec![
            Bitmap::filled(16, 16, [0, 0, 0, 255]),
            Bitmap::from_rgba_data(0, 16, Vec::new()),
        ];
        match IconEncoder::new().encode(&bitmaps) {
            Err(EncodeError::InvalidBitmap { index, defect }) => {
                assert_eq!(index, 1);
                assert_eq!(
                    defect,
                    BitmapDefect::ZeroDimension { width: 0, height: 16 }
                );
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn too_many_images_are_rejected() {
        let bitmaps = vec![Bitmap::filled(1, 1, [0; 4]); 65536];
        let result = IconEncoder::with_codec(RawCodec).encode(&bitmaps);
        assert!(matches!(
            result,
            Err(EncodeError::TooManyImages { count: 65536 })
        ));
    }

    #[test]
    fn codec_failure_names_index() {
        let bitmaps = vec![
            Bitmap::filled(16, 16, [0; 4]),
            Bitmap::filled(32, 32, [0; 4]),
        ];
        let error =
            IconEncoder::with_codec(PickyCodec).encode(&bitmaps).unwrap_err();
        assert_eq!(error.index(), Some(1));
        assert!(matches!(error, EncodeError::Codec { index: 1, .. }));
    }

    #[test]
    fn raw_payloads_are_laid_out_contiguously() {
        let bitmaps = vec![
            Bitmap::filled(1, 1, [1, 2, 3, 4]),
            Bitmap::filled(2, 1, [5, 6, 7, 8]),
        ];
        let output =
            IconEncoder::with_codec(RawCodec).encode(&bitmaps).unwrap();
        let expected: &[u8] = b"\
            \x00\x00\x01\x00\x02\x00\
            \
            \x01\x01\x00\x00\x01\x00\x20\x00\
            \x04\x00\x00\x00\x26\x00\x00\x00\
            \
            \x02\x01\x00\x00\x01\x00\x20\x00\
            \x08\x00\x00\x00\x2a\x00\x00\x00\
            \
            \x01\x02\x03\x04\
            \x05\x06\x07\x08\x05\x06\x07\x08";
        assert_eq!(output.as_slice(), expected);
    }

    #[test]
    fn plan_offsets_follow_directory() {
        let entries =
            plan_directory(&[(16, 16, 10), (256, 256, 20), (48, 48, 30)])
                .unwrap();
        let offsets: Vec<u32> =
            entries.iter().map(|e| e.payload_offset).collect();
        assert_eq!(offsets, vec![54, 64, 84]);
        assert_eq!(entries[1].stored_width, 0);
        assert_eq!(entries[2].stored_height, 48);
    }

    #[test]
    fn plan_rejects_offsets_past_four_gigabytes() {
        let images = [(16, 16, u32::MAX as usize - 100), (16, 16, 200)];
        let result = plan_directory(&images);
        assert!(matches!(
            result,
            Err(EncodeError::OffsetOverflow { index: 1 })
        ));
    }

    #[test]
    fn plan_single_image_starts_after_directory() {
        let entries = plan_directory(&[(32, 32, 7)]).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].payload_offset, 22);
        assert_eq!(entries[0].payload_size, 7);
        assert_eq!(entries[0].payload_end(), 29);
    }

    #[test]
    fn plan_nothing_is_empty() {
        assert!(plan_directory(&[]).unwrap().is_empty());
    }

    #[test]
    fn failed_encode_writes_nothing() {
        let mut sink = Vec::<u8>::new();
        let bitmaps = vec![Bitmap::from_rgba_data(4, 4, vec![0; 3])];
        assert!(IconEncoder::new().encode_to(&bitmaps, &mut sink).is_err());
        assert!(sink.is_empty());
    }
}

//===========================================================================//
