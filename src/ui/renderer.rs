//! Board rendering
//!
//! Renders the bingo board with tiny-skia. Cell placement comes from
//! [`BoardLayout`], the same rectangles the controller hit-tests against.

use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect as SkiaRect, Stroke, Transform};

use crate::app::state::{CellStatus, CellVisual};
use crate::domain::core::{Point, Rect, ViewportTransform};
use crate::domain::layout::BoardLayout;
use crate::ui::text::GlyphRasterizer;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Failed to create pixmap for rendering")]
    PixmapCreationFailed,

    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidCanvasDimensions { width: f32, height: f32 },

    #[error("PNG encoding failed: {0}")]
    Encoding(String),

    #[error("Nothing has been rendered yet")]
    NoFrame,

    #[error("Failed to write {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

/// Colors used for the board
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub incomplete: Color,
    pub completed: Color,
    pub free: Color,
    pub highlight: Color,
    pub photo_marker: Color,
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgba8(24, 24, 32, 255),
            incomplete: Color::from_rgba8(245, 245, 240, 255),
            completed: Color::from_rgba8(120, 200, 140, 255),
            free: Color::from_rgba8(250, 210, 90, 255),
            highlight: Color::from_rgba8(230, 60, 90, 255),
            photo_marker: Color::from_rgba8(40, 110, 220, 255),
            text: Color::from_rgba8(20, 20, 20, 255),
        }
    }
}

/// Software renderer for the bingo board
#[derive(Debug, Default)]
pub struct BoardRenderer {
    palette: Palette,
    text: Option<GlyphRasterizer>,
}

impl BoardRenderer {
    /// Create a renderer without text; cells are drawn as plain shapes
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer that labels cells with the given font
    pub fn with_text(text: GlyphRasterizer) -> Self {
        Self {
            palette: Palette::default(),
            text: Some(text),
        }
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    /// Render the board under a viewport transform
    ///
    /// The canvas is the untransformed board size; zooming in crops, zooming
    /// out leaves background around the board.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render(
        &self,
        layout: &BoardLayout,
        cells: &[CellVisual],
        viewport: ViewportTransform,
    ) -> Result<Pixmap, RendererError> {
        let side = layout.canvas_size();
        if !side.is_finite() || side < 1.0 {
            return Err(RendererError::InvalidCanvasDimensions {
                width: side,
                height: side,
            });
        }

        let mut pixmap =
            Pixmap::new(side.ceil() as u32, side.ceil() as u32).ok_or(RendererError::PixmapCreationFailed)?;
        pixmap.fill(self.palette.background);

        let transform = to_skia(viewport);
        for cell in cells {
            if let Some(rect) = layout.cell_rect(cell.index) {
                self.render_cell(&mut pixmap, rect, cell, transform);
            }
        }

        Ok(pixmap)
    }

    fn render_cell(&self, pixmap: &mut Pixmap, rect: Rect, cell: &CellVisual, transform: Transform) {
        let fill = match cell.status {
            CellStatus::Free => self.palette.free,
            CellStatus::Incomplete => self.palette.incomplete,
            CellStatus::Completed => self.palette.completed,
        };
        fill_rect(pixmap, rect, fill, transform);

        if cell.has_photo {
            self.render_photo_marker(pixmap, rect, transform);
        }

        if cell.highlighted {
            stroke_rect(pixmap, rect.inset(2.0), self.palette.highlight, 4.0, transform);
        }

        if let Some(text) = &self.text {
            self.render_label(pixmap, text, rect, cell, transform);
        }
    }

    /// Small triangle in the top-right corner of cells with a photo attached
    fn render_photo_marker(&self, pixmap: &mut Pixmap, rect: Rect, transform: Transform) {
        let size = rect.w * 0.2;
        let mut pb = PathBuilder::new();
        pb.move_to(rect.right() - size, rect.y);
        pb.line_to(rect.right(), rect.y);
        pb.line_to(rect.right(), rect.y + size);
        pb.close();

        if let Some(path) = pb.finish() {
            let mut paint = Paint::default();
            paint.set_color(self.palette.photo_marker);
            paint.anti_alias = true;
            pixmap.fill_path(&path, &paint, tiny_skia::FillRule::Winding, transform, None);
        }
    }

    /// Cell number in the corner, challenge text wrapped below it
    fn render_label(
        &self,
        pixmap: &mut Pixmap,
        text: &GlyphRasterizer,
        rect: Rect,
        cell: &CellVisual,
        transform: Transform,
    ) {
        let padding = rect.w * 0.06;
        let number_size = rect.w * 0.12;
        let body_size = rect.w * 0.1;

        text.draw_line(
            pixmap,
            &(cell.index + 1).to_string(),
            number_size,
            Point::new(rect.x + padding, rect.y + padding),
            self.palette.text,
            transform,
        );

        let max_width = rect.w - padding * 2.0;
        let line_height = text.line_height(body_size);
        let mut y = rect.y + padding * 2.0 + number_size;
        for line in text.wrap(&cell.text, body_size, max_width) {
            if y + line_height > rect.bottom() {
                break;
            }
            let width = text.measure(&line, body_size);
            let x = rect.x + (rect.w - width).max(0.0) / 2.0;
            text.draw_line(pixmap, &line, body_size, Point::new(x, y), self.palette.text, transform);
            y += line_height;
        }
    }

    /// Encode a rendered frame as PNG bytes
    pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RendererError> {
        pixmap
            .encode_png()
            .map_err(|err| RendererError::Encoding(err.to_string()))
    }
}

/// Viewport transform as a tiny-skia matrix (scale, then translate)
pub fn to_skia(viewport: ViewportTransform) -> Transform {
    Transform::from_row(
        viewport.scale,
        0.0,
        0.0,
        viewport.scale,
        viewport.translate_x,
        viewport.translate_y,
    )
}

fn fill_rect(pixmap: &mut Pixmap, rect: Rect, color: Color, transform: Transform) {
    if let Some(rect) = SkiaRect::from_xywh(rect.x, rect.y, rect.w, rect.h) {
        let mut paint = Paint::default();
        paint.set_color(color);
        pixmap.fill_rect(rect, &paint, transform, None);
    }
}

fn stroke_rect(pixmap: &mut Pixmap, rect: Rect, color: Color, width: f32, transform: Transform) {
    let Some(rect) = SkiaRect::from_xywh(rect.x, rect.y, rect.w, rect.h) else {
        return;
    };
    let path = PathBuilder::from_rect(rect);

    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;

    let stroke = Stroke {
        width,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, transform, None);
}
