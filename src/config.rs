use crate::color::Rgba;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

/// The square sizes, in pixels, rendered when none are configured.
pub const DEFAULT_SIZES: &[u32] = &[16, 20, 24, 32, 40, 48, 64, 80, 96];

// Glyph height as a fraction of the icon size.
const DEFAULT_GLYPH_SCALE: f32 = 0.95;

//===========================================================================//

/// Everything a glyph renderer needs besides the font itself.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct RenderConfig {
    /// Color every canvas is filled with before the glyph is drawn.
    pub background: Rgba,
    /// Color of the glyph.
    pub foreground: Rgba,
    /// Square icon sizes to render, in output order.
    pub sizes: Vec<u32>,
    /// Font size as a fraction of the icon size.
    pub glyph_scale: f32,
}

impl RenderConfig {
    /// Returns the default configuration with a different glyph color.
    pub fn with_foreground(foreground: Rgba) -> RenderConfig {
        RenderConfig { foreground, ..RenderConfig::default() }
    }
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            background: Rgba::TRANSPARENT_WHITE,
            foreground: Rgba::DARK_GRAY,
            sizes: DEFAULT_SIZES.to_vec(),
            glyph_scale: DEFAULT_GLYPH_SCALE,
        }
    }
}

//===========================================================================//


//===========================================================================//
