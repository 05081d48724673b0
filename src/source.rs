use crate::bitmap::Bitmap;
use thiserror::Error;

//===========================================================================//

/// An error from rendering a glyph into a bitmap.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RenderError {
    /// The font data could not be parsed.
    #[error("failed to load font: {0}")]
    Font(String),
    /// The font has no glyph for this character.
    #[error("font has no glyph for {0:?} (U+{:04X})", codepoint(.0))]
    MissingGlyph(char),
    /// A requested icon size was zero.
    #[error("invalid icon size: {0}")]
    InvalidSize(u32),
}

fn codepoint(ch: &char) -> u32 {
    *ch as u32
}

//===========================================================================//

/// Produces one bitmap of a glyph per requested square size.
pub trait BitmapSource {
    /// Renders `ch` onto a `size` by `size` canvas.
    fn render(&self, ch: char, size: u32) -> Result<Bitmap, RenderError>;
}

impl<S: BitmapSource + ?Sized> BitmapSource for &S {
    fn render(&self, ch: char, size: u32) -> Result<Bitmap, RenderError> {
        (**self).render(ch, size)
    }
}

/// Renders `ch` at each of `sizes`, in order, stopping at the first failure.
pub fn render_all<S: BitmapSource + ?Sized>(
    source: &S,
    ch: char,
    sizes: &[u32],
) -> Result<Vec<Bitmap>, RenderError> {
    sizes.iter().map(|&size| source.render(ch, size)).collect()
}

//===========================================================================//


//===========================================================================//
