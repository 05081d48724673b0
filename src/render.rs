use crate::bitmap::Bitmap;
use crate::color::Rgba;
use crate::config::RenderConfig;
use crate::source::{BitmapSource, RenderError};
use fontdue::{Font, FontSettings};
use tracing::trace;

//===========================================================================//

/// Rasterizes glyphs from a TrueType/OpenType font with `fontdue`.
pub struct GlyphRenderer {
    font: Font,
    config: RenderConfig,
}

impl GlyphRenderer {
    /// Parses `font_data` as a font file.
    pub fn from_bytes(
        font_data: &[u8],
        config: RenderConfig,
    ) -> Result<GlyphRenderer, RenderError> {
        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|error| RenderError::Font(error.to_string()))?;
        Ok(GlyphRenderer { font, config })
    }

    /// Returns the configuration this renderer draws with.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Renders `ch` at every configured size.
    pub fn render_configured(
        &self,
        ch: char,
    ) -> Result<Vec<Bitmap>, RenderError> {
        crate::source::render_all(self, ch, &self.config.sizes)
    }
}

impl BitmapSource for GlyphRenderer {
    fn render(&self, ch: char, size: u32) -> Result<Bitmap, RenderError> {
        if size == 0 {
            return Err(RenderError::InvalidSize(size));
        }
        if self.font.lookup_glyph_index(ch) == 0 {
            return Err(RenderError::MissingGlyph(ch));
        }
        let px = font_px(size, self.config.glyph_scale);
        let (metrics, coverage) = self.font.rasterize(ch, px);
        let (ascent, descent) = match self.font.horizontal_line_metrics(px) {
            Some(line) => (line.ascent, line.descent),
            None => (px, 0.0),
        };
        // Center the line box (ascent down to descent) vertically, and the
        // glyph's own bitmap horizontally.
        let baseline = (size as f32 - (ascent - descent)) / 2.0 + ascent;
        let left = ((size as f32 - metrics.width as f32) / 2.0).round() as i32;
        let top = (baseline - (metrics.ymin as f32 + metrics.height as f32))
            .round() as i32;
        trace!(size, left, top, width = metrics.width, "placing glyph");
        let mut canvas = Bitmap::filled(size, size, self.config.background.0);
        draw_coverage(
            &mut canvas,
            left,
            top,
            metrics.width,
            &coverage,
            self.config.foreground,
        );
        Ok(canvas)
    }
}

//===========================================================================//

/// Returns the whole-pixel font size used to draw a glyph into a `size`-pixel
/// square.  Rounding down keeps the glyph inside the canvas.
fn font_px(size: u32, glyph_scale: f32) -> f32 {
    (size as f32 * glyph_scale).floor()
}

/// Paints `color` over `canvas` through an 8-bit coverage mask whose top-left
/// corner lands at `(left, top)`.  Parts of the mask outside the canvas are
/// clipped.
pub(crate) fn draw_coverage(
    canvas: &mut Bitmap,
    left: i32,
    top: i32,
    mask_width: usize,
    coverage: &[u8],
    color: Rgba,
) {
    if mask_width == 0 {
        return;
    }
    for (row, mask_row) in coverage.chunks(mask_width).enumerate() {
        let y = top + row as i32;
        if y < 0 {
            continue;
        }
        for (col, &cov) in mask_row.iter().enumerate() {
            let x = left + col as i32;
            if x < 0 || cov == 0 {
                continue;
            }
            if let Some(dst) = canvas.pixel_mut(x as u32, y as u32) {
                blend_over(dst, color, cov);
            }
        }
    }
}

/// Composites `color`, scaled by `coverage`, over one RGBA pixel.
fn blend_over(dst: &mut [u8], color: Rgba, coverage: u8) {
    let src_a = (color.alpha() as f32 / 255.0) * (coverage as f32 / 255.0);
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return;
    }
    for channel in 0..3 {
        let src = color.0[channel] as f32 * src_a;
        let under = dst[channel] as f32 * dst_a * (1.0 - src_a);
        dst[channel] = ((src + under) / out_a).round().min(255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().min(255.0) as u8;
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{blend_over, draw_coverage, font_px, GlyphRenderer};
    use crate::bitmap::Bitmap;
    use crate::color::Rgba;
    use crate::config::RenderConfig;
    use crate::source::RenderError;

    const RED: Rgba = Rgba::opaque(255, 0, 0);

    #[test]
    fn full_coverage_replaces_pixel() {
        let mut px = [255, 255, 255, 0];
        blend_over(&mut px, RED, 255);
        assert_eq!(px, [255, 0, 0, 255]);
    }

    #[test]
    fn partial_coverage_on_transparent_keeps_color() {
        let mut px = [255, 255, 255, 0];
        blend_over(&mut px, RED, 51);
        assert_eq!(px, [255, 0, 0, 51]);
    }

    #[test]
    fn partial_coverage_on_opaque_mixes_colors() {
        let mut px = [0, 0, 255, 255];
        blend_over(&mut px, RED, 51);
        assert_eq!(px, [51, 0, 204, 255]);
    }

    #[test]
    fn font_size_rounds_down_to_whole_pixels() {
        assert_eq!(font_px(16, 0.95), 15.0);
        assert_eq!(font_px(48, 0.95), 45.0);
        assert_eq!(font_px(64, 0.95), 60.0);
        assert_eq!(font_px(32, 1.0), 32.0);
    }

    #[test]
    fn mask_is_clipped_to_canvas() {
        let mut canvas = Bitmap::filled(2, 2, Rgba::TRANSPARENT_WHITE.0);
        // A 3x3 solid mask whose top-left corner is off the canvas.
        draw_coverage(&mut canvas, -1, -1, 3, &[255; 9], RED);
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(canvas.pixel(x, y), Some([255, 0, 0, 255]));
            }
        }
    }

    #[test]
    fn empty_mask_leaves_canvas_alone() {
        let mut canvas = Bitmap::filled(2, 2, [1, 2, 3, 4]);
        draw_coverage(&mut canvas, 0, 0, 0, &[], RED);
        assert_eq!(canvas, Bitmap::filled(2, 2, [1, 2, 3, 4]));
    }

    #[test]
    fn garbage_font_data_is_rejected() {
        let result =
            GlyphRenderer::from_bytes(b"not a font", RenderConfig::default());
        assert!(matches!(result, Err(RenderError::Font(_))));
    }
}

//===========================================================================//
