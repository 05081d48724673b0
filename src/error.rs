use std::io;
use thiserror::Error;

//===========================================================================//

/// What is wrong with a bitmap handed to the encoder.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum BitmapDefect {
    /// Width or height is zero.
    #[error("dimensions must be nonzero (was {width}x{height})")]
    ZeroDimension {
        /// The declared width.
        width: u32,
        /// The declared height.
        height: u32,
    },
    /// The pixel buffer does not hold exactly `4 * width * height` bytes.
    #[error("RGBA buffer has {actual} bytes, but must have {expected}")]
    BufferLength {
        /// The actual buffer length, in bytes.
        actual: usize,
        /// The length implied by the dimensions, in bytes.
        expected: u64,
    },
    /// `4 * width * height` does not fit in 64 bits.
    #[error("dimensions are too large (was {width}x{height})")]
    Oversized {
        /// The declared width.
        width: u32,
        /// The declared height.
        height: u32,
    },
}

//===========================================================================//

/// An error from encoding bitmaps into an ICO container.  None of these are
/// retried; the whole encode call fails and nothing is written.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// No bitmaps were supplied; an ICO with zero images is not produced.
    #[error("cannot encode an icon with no images")]
    EmptyInput,
    /// The bitmap at `index` is malformed.
    #[error("invalid bitmap at index {index}: {defect}")]
    InvalidBitmap {
        /// Position of the offending bitmap in the input.
        index: usize,
        /// What is wrong with it.
        defect: BitmapDefect,
    },
    /// More bitmaps than the 16-bit entry count can describe.
    #[error("too many images (was {count}, but max is {})", u16::MAX)]
    TooManyImages {
        /// Number of bitmaps supplied.
        count: usize,
    },
    /// The image codec failed on the bitmap at `index`.
    #[error("failed to compress bitmap at index {index}")]
    Codec {
        /// Position of the offending bitmap in the input.
        index: usize,
        /// The codec's error.
        #[source]
        source: io::Error,
    },
    /// The payload at `index` would end past the 4 GiB range of the 32-bit
    /// size/offset fields.
    #[error("payload at index {index} does not fit in a 32-bit offset")]
    OffsetOverflow {
        /// Position of the offending payload.
        index: usize,
    },
    /// The assembled container could not be written to the sink.
    #[error("failed to write icon data")]
    SinkWrite(#[source] io::Error),
}

impl EncodeError {
    /// Returns the index of the bitmap this error refers to, if any.
    pub fn index(&self) -> Option<usize> {
        match *self {
            EncodeError::InvalidBitmap { index, .. }
            | EncodeError::Codec { index, .. }
            | EncodeError::OffsetOverflow { index } => Some(index),
            EncodeError::EmptyInput
            | EncodeError::TooManyImages { .. }
            | EncodeError::SinkWrite(_) => None,
        }
    }
}

//===========================================================================//


//===========================================================================//
