//! Glyph advance and ink coverage sampling.
//!
//! Ink coverage is a rough visual-density proxy: the glyph outline is filled
//! into an 8-bit coverage canvas (white background, black ink) and the share
//! of pixels whose luminance falls below a threshold is reported. It is meant
//! for comparing glyphs against each other, not as an exact area.

use tiny_skia::{FillRule, Mask, Path, PathBuilder, Transform};
use tracing::{debug, warn};
use ttf_parser::{Face, GlyphId};

use crate::error::GlyphError;
use crate::fonts::{CharacterMap, FontFile};
use crate::types::Codepoint;

/// Raster parameters for ink sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterConfig {
    /// Width and height of the square canvas in pixels.
    pub canvas_size: u32,
    /// Em size in pixels.
    pub point_size: f32,
    /// Pixels with luminance strictly below this count as ink.
    pub ink_threshold: u8,
    /// Top-left text anchor; the baseline sits one ascender below it.
    pub origin: (f32, f32),
}

impl Default for RasterConfig {
    fn default() -> Self {
        RasterConfig {
            canvas_size: 200,
            point_size: 200.0,
            ink_threshold: 128,
            origin: (0.0, 0.0),
        }
    }
}

impl RasterConfig {
    pub fn pixel_count(&self) -> u64 {
        self.canvas_size as u64 * self.canvas_size as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSample {
    pub codepoint: Codepoint,
    /// Advance width in font units.
    pub advance_width: u16,
    /// Dark pixel share in `[0, 1]`.
    pub ink_ratio: f64,
}

impl MetricsSample {
    pub fn absent(codepoint: Codepoint) -> Self {
        MetricsSample {
            codepoint,
            advance_width: 0,
            ink_ratio: 0.0,
        }
    }
}

/// Converts ttf-parser glyph outlines to tiny-skia paths in font units.
pub(crate) struct GlyphOutlineBuilder {
    builder: PathBuilder,
}

impl GlyphOutlineBuilder {
    pub(crate) fn new() -> Self {
        Self {
            builder: PathBuilder::new(),
        }
    }

    pub(crate) fn finish(self) -> Option<Path> {
        self.builder.finish()
    }
}

impl ttf_parser::OutlineBuilder for GlyphOutlineBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Maps font design units (y-up) to canvas pixels (y-down).
#[inline]
pub(crate) fn glyph_transform(scale: f32, x: f32, baseline: f32) -> Transform {
    Transform::from_row(scale, 0.0, 0.0, -scale, x, baseline)
}

/// Share of pixels darker than `threshold`, given ink coverage per pixel.
///
/// Luminance of a pixel is `255 - coverage` on a white background.
pub fn dark_pixel_ratio(coverage: &[u8], threshold: u8) -> f64 {
    if coverage.is_empty() {
        return 0.0;
    }
    let dark = coverage
        .iter()
        .filter(|&&c| 255 - c < threshold)
        .count();
    dark as f64 / coverage.len() as f64
}

/// Samples glyphs of one font.
///
/// The character map is read once when the sampler is built.
pub struct GlyphSampler<'a> {
    font: &'a FontFile,
    face: Face<'a>,
    cmap: CharacterMap,
    config: RasterConfig,
}

impl<'a> GlyphSampler<'a> {
    pub fn new(font: &'a FontFile, config: RasterConfig) -> Result<Self, GlyphError> {
        let face = font.face()?;
        let cmap = CharacterMap::from_face(&face);
        Ok(GlyphSampler {
            font,
            face,
            cmap,
            config,
        })
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    /// Advance width and ink ratio of `codepoint`.
    ///
    /// A codepoint the font does not map yields a zero sample rather than
    /// an error.
    pub fn sample(&self, codepoint: Codepoint) -> Result<MetricsSample, GlyphError> {
        let Some(entry) = self.cmap.get(codepoint) else {
            warn!("{} has no glyph in {}", codepoint, self.font.display_name());
            return Ok(MetricsSample::absent(codepoint));
        };

        let advance_width = self.face.glyph_hor_advance(entry.glyph_id).unwrap_or(0);
        let ink_ratio = self.ink_ratio(entry.glyph_id)?;
        debug!(
            "{} {} ({}): width={} ink={:.4}",
            self.font.display_name(),
            codepoint,
            entry.glyph_name,
            advance_width,
            ink_ratio
        );
        Ok(MetricsSample {
            codepoint,
            advance_width,
            ink_ratio,
        })
    }

    fn ink_ratio(&self, glyph_id: GlyphId) -> Result<f64, GlyphError> {
        let size = self.config.canvas_size;
        let mut mask = Mask::new(size, size).ok_or(GlyphError::CanvasError {
            width: size,
            height: size,
        })?;

        let mut builder = GlyphOutlineBuilder::new();
        if self.face.outline_glyph(glyph_id, &mut builder).is_none() {
            return Ok(0.0);
        }
        let Some(path) = builder.finish() else {
            return Ok(0.0);
        };

        let scale = self.config.point_size / self.face.units_per_em() as f32;
        let (x, y) = self.config.origin;
        let baseline = y + self.face.ascender() as f32 * scale;
        mask.fill_path(
            &path,
            FillRule::Winding,
            true,
            glyph_transform(scale, x, baseline),
        );

        Ok(dark_pixel_ratio(mask.data(), self.config.ink_threshold))
    }
}

/// Sample one codepoint of `font` with a freshly read character map.
pub fn sample_glyph(
    font: &FontFile,
    codepoint: Codepoint,
    config: RasterConfig,
) -> Result<MetricsSample, GlyphError> {
    GlyphSampler::new(font, config)?.sample(codepoint)
}
