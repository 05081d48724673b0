//! Packs rendered glyph bitmaps into multi-resolution ICO files.
//!
//! The heart of the crate is [`IconEncoder`], which takes any number of RGBA
//! bitmaps (of possibly different sizes), compresses each one with an
//! [`ImageCodec`] (PNG by default), and lays them out as a single ICO
//! container.  [`IconFile`] reads such containers back.  With the `render`
//! feature, [`GlyphRenderer`] draws a single font glyph at each configured
//! size to produce the bitmaps.
//!
//! ```
//! let bitmaps = vec![
//!     glyphico::Bitmap::filled(16, 16, [255, 0, 0, 255]),
//!     glyphico::Bitmap::filled(32, 32, [255, 0, 0, 255]),
//! ];
//! let data = glyphico::IconEncoder::new().encode(&bitmaps).unwrap();
//! assert_eq!(&data[..6], b"\x00\x00\x01\x00\x02\x00");
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod bitmap;
mod codec;
mod color;
mod config;
mod encoder;
mod error;
mod layout;
mod reader;
#[cfg(feature = "render")]
mod render;
mod source;

pub use crate::bitmap::Bitmap;
pub use crate::codec::{ImageCodec, PngCodec};
pub use crate::color::{ParseColorError, Rgba};
pub use crate::config::{RenderConfig, DEFAULT_SIZES};
pub use crate::encoder::{plan_directory, IconEncoder};
pub use crate::error::{BitmapDefect, EncodeError};
pub use crate::layout::{
    logical_dimension, stored_dimension, DirectoryEntry, DIR_ENTRY_LEN,
    HEADER_LEN,
};
pub use crate::reader::{IconFile, IconFileEntry};
#[cfg(feature = "render")]
pub use crate::render::GlyphRenderer;
pub use crate::source::{render_all, BitmapSource, RenderError};
