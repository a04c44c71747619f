//! Glyph rasterization for cell labels
//!
//! Text is laid out on a single baseline per line with ab_glyph, rasterized
//! into a small coverage pixmap, then composited onto the board with the same
//! transform as the cell shapes so labels pan and zoom with their cells.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};
use tiny_skia::{Color, ColorU8, Pixmap, PixmapPaint, Transform};

use crate::domain::core::Point;

#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("Failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Font data could not be parsed")]
    InvalidFont,
}

/// Lays out and draws text with one font
pub struct GlyphRasterizer {
    font: FontVec,
}

impl std::fmt::Debug for GlyphRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphRasterizer")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl GlyphRasterizer {
    /// Parses TTF/OTF font bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, TextError> {
        let font = FontVec::try_from_vec(bytes).map_err(|_| TextError::InvalidFont)?;
        Ok(Self { font })
    }

    /// Reads and parses a font file
    pub fn load(path: &Path) -> Result<Self, TextError> {
        let bytes = fs::read(path).map_err(|source| TextError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(bytes)
    }

    /// Vertical distance between consecutive baselines
    pub fn line_height(&self, size: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(size));
        scaled.ascent() - scaled.descent() + scaled.line_gap()
    }

    /// Horizontal advance of `text` including kerning
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(size));
        let mut width = 0.0;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width
    }

    /// Greedy word wrap to `max_width`
    ///
    /// A single word wider than the limit gets a line of its own rather than
    /// being split.
    pub fn wrap(&self, text: &str, size: f32, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if self.measure(&candidate, size) <= max_width || current.is_empty() {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Draws one line of text with its top-left corner at `origin`
    ///
    /// `origin` is in board coordinates; `transform` maps board to canvas.
    pub fn draw_line(
        &self,
        target: &mut Pixmap,
        text: &str,
        size: f32,
        origin: Point,
        color: Color,
        transform: Transform,
    ) {
        let Some(layer) = self.rasterize(text, size, color) else {
            return;
        };

        target.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &PixmapPaint::default(),
            transform.pre_translate(origin.x, origin.y),
            None,
        );
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize(&self, text: &str, size: f32, color: Color) -> Option<Pixmap> {
        let scale = PxScale::from(size);
        let scaled = self.font.as_scaled(scale);
        let width = self.measure(text, size).ceil() as u32;
        let height = (scaled.ascent() - scaled.descent()).ceil() as u32;
        let mut layer = Pixmap::new(width, height)?;

        let base = color.to_color_u8();
        let stride = width as usize;
        let pixels = layer.pixels_mut();

        let mut caret = 0.0;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, scaled.ascent()));
            caret += scaled.h_advance(id);
            previous = Some(id);

            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i32 + gx as i32;
                let y = bounds.min.y as i32 + gy as i32;
                if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
                    return;
                }
                let alpha = (coverage.clamp(0.0, 1.0) * f32::from(base.alpha())).round() as u8;
                let slot = &mut pixels[y as usize * stride + x as usize];
                if alpha > slot.alpha() {
                    *slot = ColorU8::from_rgba(base.red(), base.green(), base.blue(), alpha).premultiply();
                }
            });
        }

        Some(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_bytes_are_rejected() {
        let result = GlyphRasterizer::from_bytes(vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(TextError::InvalidFont)));
    }

    #[test]
    fn missing_font_file_reports_path() {
        let result = GlyphRasterizer::load(Path::new("/definitely/not/a/font.ttf"));
        match result {
            Err(TextError::Io { path, .. }) => assert!(path.ends_with("font.ttf")),
            other => panic!("Expected IO error, got {other:?}"),
        }
    }
}
