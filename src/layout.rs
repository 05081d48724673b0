use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};

//===========================================================================//

/// The size of the ICONDIR header, in bytes.
pub const HEADER_LEN: u32 = 6;

/// The size of one ICONDIRENTRY, in bytes.
pub const DIR_ENTRY_LEN: u32 = 16;

// The resource type number for icons (cursors would be 2).
pub(crate) const ICON_TYPE: u16 = 1;

const COLOR_PLANES: u16 = 1;
const BITS_PER_PIXEL: u16 = 32;

//===========================================================================//

/// Converts an image dimension into the single byte stored in the directory.
/// A byte of zero means 256 (or, since Windows Vista, anything >= 256, with
/// the real size coming from the payload).
pub fn stored_dimension(dimension: u32) -> u8 {
    if dimension > 255 {
        0
    } else {
        dimension as u8
    }
}

/// The inverse of `stored_dimension`, treating 0 as 256.
pub fn logical_dimension(byte: u8) -> u32 {
    if byte == 0 {
        256
    } else {
        byte as u32
    }
}

//===========================================================================//

/// Writes the ICONDIR header for an icon container with `count` entries.
pub(crate) fn write_header<W: Write>(
    writer: &mut W,
    count: u16,
) -> io::Result<()> {
    writer.write_u16::<LittleEndian>(0)?; // reserved
    writer.write_u16::<LittleEndian>(ICON_TYPE)?;
    writer.write_u16::<LittleEndian>(count)?;
    Ok(())
}

/// Reads the ICONDIR header and returns the entry count.
pub(crate) fn read_header<R: Read>(reader: &mut R) -> io::Result<u16> {
    let reserved = reader.read_u16::<LittleEndian>()?;
    if reserved != 0 {
        invalid_data!(
            "Invalid reserved field value in ICONDIR \
             (was {}, but must be 0)",
            reserved
        );
    }
    let restype = reader.read_u16::<LittleEndian>()?;
    if restype != ICON_TYPE {
        invalid_data!(
            "Unsupported resource type (was {}, but must be {})",
            restype,
            ICON_TYPE
        );
    }
    reader.read_u16::<LittleEndian>()
}

//===========================================================================//

/// One row of the ICO directory, exactly as stored on disk.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct DirectoryEntry {
    /// Width byte; 0 means 256 or more.
    pub stored_width: u8,
    /// Height byte; 0 means 256 or more.
    pub stored_height: u8,
    /// Number of palette colors; 0 for truecolor images.
    pub color_palette: u8,
    /// Number of color planes.
    pub color_planes: u16,
    /// Color depth of the payload.
    pub bits_per_pixel: u16,
    /// Length of the payload, in bytes.
    pub payload_size: u32,
    /// Absolute position of the payload from the start of the file.
    pub payload_offset: u32,
}

impl DirectoryEntry {
    /// Creates the entry for a 32-bpp truecolor image of the given logical
    /// size whose payload is stored at `payload_offset`.
    pub fn for_image(
        width: u32,
        height: u32,
        payload_size: u32,
        payload_offset: u32,
    ) -> DirectoryEntry {
        DirectoryEntry {
            stored_width: stored_dimension(width),
            stored_height: stored_dimension(height),
            color_palette: 0,
            color_planes: COLOR_PLANES,
            bits_per_pixel: BITS_PER_PIXEL,
            payload_size,
            payload_offset,
        }
    }

    /// Returns the width this entry declares, in pixels.
    pub fn width(&self) -> u32 {
        logical_dimension(self.stored_width)
    }

    /// Returns the height this entry declares, in pixels.
    pub fn height(&self) -> u32 {
        logical_dimension(self.stored_height)
    }

    /// Returns the offset of the first byte past this entry's payload.
    pub fn payload_end(&self) -> u64 {
        self.payload_offset as u64 + self.payload_size as u64
    }

    pub(crate) fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(self.stored_width)?;
        writer.write_u8(self.stored_height)?;
        writer.write_u8(self.color_palette)?;
        writer.write_u8(0)?; // reserved
        writer.write_u16::<LittleEndian>(self.color_planes)?;
        writer.write_u16::<LittleEndian>(self.bits_per_pixel)?;
        writer.write_u32::<LittleEndian>(self.payload_size)?;
        writer.write_u32::<LittleEndian>(self.payload_offset)?;
        Ok(())
    }

    pub(crate) fn read<R: Read>(reader: &mut R) -> io::Result<DirectoryEntry> {
        let stored_width = reader.read_u8()?;
        let stored_height = reader.read_u8()?;
        let color_palette = reader.read_u8()?;
        let reserved = reader.read_u8()?;
        if reserved != 0 {
            invalid_data!(
                "Invalid reserved field value in ICONDIRENTRY \
                 (was {}, but must be 0)",
                reserved
            );
        }
        let color_planes = reader.read_u16::<LittleEndian>()?;
        let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
        let payload_size = reader.read_u32::<LittleEndian>()?;
        let payload_offset = reader.read_u32::<LittleEndian>()?;
        Ok(DirectoryEntry {
            stored_width,
            stored_height,
            color_palette,
            color_planes,
            bits_per_pixel,
            payload_size,
            payload_offset,
        })
    }
}

//===========================================================================//


//===========================================================================//
