use crate::bitmap::Bitmap;
use crate::codec::{PngCodec, PNG_SIGNATURE};
use crate::layout::{read_header, DirectoryEntry};
use std::io::{self, Read, Seek, SeekFrom};

//===========================================================================//

/// The parsed contents of an ICO file.
#[derive(Clone, Debug)]
pub struct IconFile {
    entries: Vec<IconFileEntry>,
}

impl IconFile {
    /// Returns the entries in file order.
    pub fn entries(&self) -> &[IconFileEntry] {
        &self.entries
    }

    /// Reads an ICO file into memory.
    pub fn read<R: Read + Seek>(mut reader: R) -> io::Result<IconFile> {
        let num_entries = read_header(&mut reader)? as usize;
        let mut directory = Vec::<DirectoryEntry>::with_capacity(num_entries);
        for _ in 0..num_entries {
            directory.push(DirectoryEntry::read(&mut reader)?);
        }
        let mut entries = Vec::<IconFileEntry>::with_capacity(num_entries);
        for entry in directory.into_iter() {
            reader.seek(SeekFrom::Start(entry.payload_offset as u64))?;
            // Read at most the declared size; it may be garbage.
            let mut data = Vec::new();
            (&mut reader)
                .take(entry.payload_size as u64)
                .read_to_end(&mut data)?;
            if data.len() as u64 != entry.payload_size as u64 {
                invalid_data!(
                    "Truncated image payload (was {} bytes, but should be {})",
                    data.len(),
                    entry.payload_size
                );
            }
            entries.push(IconFileEntry { entry, data });
        }
        Ok(IconFile { entries })
    }
}

//===========================================================================//

/// One image stored in an ICO file: its directory row and its raw payload.
#[derive(Clone, Debug)]
pub struct IconFileEntry {
    entry: DirectoryEntry,
    data: Vec<u8>,
}

impl IconFileEntry {
    /// Returns the directory row as stored on disk.
    pub fn directory(&self) -> &DirectoryEntry {
        &self.entry
    }

    /// Returns the width declared by the directory, in pixels.
    pub fn width(&self) -> u32 {
        self.entry.width()
    }

    /// Returns the height declared by the directory, in pixels.
    pub fn height(&self) -> u32 {
        self.entry.height()
    }

    /// Returns true if the payload is a PNG, or false if it is something else
    /// (normally a BMP).
    pub fn is_png(&self) -> bool {
        self.data.starts_with(PNG_SIGNATURE)
    }

    /// Returns the raw, encoded image data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Decodes the PNG payload into a bitmap.  Returns an error if the payload
    /// is not a PNG, is malformed, or doesn't match the directory's size.
    pub fn decode(&self) -> io::Result<Bitmap> {
        if !self.is_png() {
            invalid_data!("Only PNG payloads can be decoded");
        }
        let bitmap = PngCodec::read_png(self.data.as_slice())?;
        // A zero byte only says "256 or more", so the payload is the
        // authority for those sizes.
        let width_ok = (self.entry.stored_width == 0 && bitmap.width() >= 256)
            || bitmap.width() == self.entry.width();
        let height_ok = (self.entry.stored_height == 0
            && bitmap.height() >= 256)
            || bitmap.height() == self.entry.height();
        if !width_ok || !height_ok {
            invalid_data!(
                "Encoded image has wrong dimensions \
                 (was {}x{}, but should be {}x{})",
                bitmap.width(),
                bitmap.height(),
                self.entry.width(),
                self.entry.height()
            );
        }
        Ok(bitmap)
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::IconFile;
    use std::io::{Cursor, ErrorKind};

    #[test]
    fn read_single_png_entry() {
        let input: &[u8] = b"\
            \x00\x00\x01\x00\x01\x00\
            \
            \x02\x02\x00\x00\x01\x00\x20\x00\
            \x47\x00\x00\x00\x16\x00\x00\x00\
            \
            \x89\x50\x4e\x47\x0d\x0a\x1a\x0a\x00\x00\x00\x0d\x49\x48\x44\x52\
            \x00\x00\x00\x02\x00\x00\x00\x02\x08\x00\x00\x00\x00\x57\xdd\x52\
            \xf8\x00\x00\x00\x0e\x49\x44\x41\x54\x78\x9c\x63\xb4\x77\x60\xdc\
            \xef\x00\x00\x04\x08\x01\x81\x86\x2e\xc9\x8d\x00\x00\x00\x00\x49\
            \x45\x4e\x44\xae\x42\x60\x82";
        let file = IconFile::read(Cursor::new(input)).unwrap();
        assert_eq!(file.entries().len(), 1);
        let entry = &file.entries()[0];
        assert_eq!(entry.width(), 2);
        assert_eq!(entry.height(), 2);
        assert!(entry.is_png());
        let bitmap = entry.decode().unwrap();
        assert_eq!(bitmap.pixel(1, 1), Some([255, 255, 255, 255]));
    }

    #[test]
    fn png_with_wrong_size_fails_to_decode() {
        // Same PNG as above, but the directory claims it is 3x2.
        let input: &[u8] = b"\
            \x00\x00\x01\x00\x01\x00\
            \
            \x03\x02\x00\x00\x01\x00\x20\x00\
            \x47\x00\x00\x00\x16\x00\x00\x00\
            \
            \x89\x50\x4e\x47\x0d\x0a\x1a\x0a\x00\x00\x00\x0d\x49\x48\x44\x52\
            \x00\x00\x00\x02\x00\x00\x00\x02\x08\x00\x00\x00\x00\x57\xdd\x52\
            \xf8\x00\x00\x00\x0e\x49\x44\x41\x54\x78\x9c\x63\xb4\x77\x60\xdc\
            \xef\x00\x00\x04\x08\x01\x81\x86\x2e\xc9\x8d\x00\x00\x00\x00\x49\
            \x45\x4e\x44\xae\x42\x60\x82";
        let file = IconFile::read(Cursor::new(input)).unwrap();
        assert!(file.entries()[0].decode().is_err());
    }

    #[test]
    fn truncated_payload_fails_to_read() {
        let input: &[u8] = b"\
            \x00\x00\x01\x00\x01\x00\
            \
            \x10\x10\x00\x00\x01\x00\x20\x00\
            \x40\x00\x00\x00\x16\x00\x00\x00\
            \
            \x89\x50\x4e\x47";
        assert!(IconFile::read(Cursor::new(input)).is_err());
    }

    #[test]
    fn huge_payload_size_is_not_trusted() {
        let input: &[u8] = b"\
            \x00\x00\x01\x00\x01\x00\
            \
            \x10\x10\x00\x00\x01\x00\x20\x00\
            \xf0\xff\xff\xff\x16\x00\x00\x00\
            \
            \x89\x50\x4e\x47";
        let error = IconFile::read(Cursor::new(input)).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn bmp_payload_is_not_decoded() {
        let input: &[u8] = b"\
            \x00\x00\x01\x00\x01\x00\
            \
            \x01\x01\x00\x00\x01\x00\x20\x00\
            \x04\x00\x00\x00\x16\x00\x00\x00\
            \
            \x28\x00\x00\x00";
        let file = IconFile::read(Cursor::new(input)).unwrap();
        let entry = &file.entries()[0];
        assert!(!entry.is_png());
        assert_eq!(entry.data(), b"\x28\x00\x00\x00");
        assert!(entry.decode().is_err());
    }
}

//===========================================================================//
