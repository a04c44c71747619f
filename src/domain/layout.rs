//! Board geometry
//!
//! Where each cell sits in board coordinates. Shared by the renderer and by
//! hit testing, so a tap lands on exactly the rectangle that was drawn.

use crate::domain::core::{Point, Rect};

/// Cell placement on the board
///
/// Cells are squares of `cell_px` separated (and surrounded) by `gap_px`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    size: usize,
    cell_px: f32,
    gap_px: f32,
}

impl BoardLayout {
    pub fn new(size: usize, cell_px: f32, gap_px: f32) -> Self {
        Self { size, cell_px, gap_px }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Total board width and height
    #[allow(clippy::cast_precision_loss)]
    pub fn canvas_size(&self) -> f32 {
        self.gap_px + self.size as f32 * (self.cell_px + self.gap_px)
    }

    /// Rectangle of a cell in board coordinates
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_rect(&self, index: usize) -> Option<Rect> {
        if index >= self.size * self.size {
            return None;
        }
        let pitch = self.cell_px + self.gap_px;
        let row = (index / self.size) as f32;
        let col = (index % self.size) as f32;
        Some(Rect::new(
            self.gap_px + col * pitch,
            self.gap_px + row * pitch,
            self.cell_px,
            self.cell_px,
        ))
    }

    /// Cell under a board point; gaps and the outer margin hit nothing
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn cell_at(&self, board: Point) -> Option<usize> {
        if board.x < 0.0 || board.y < 0.0 {
            return None;
        }
        let pitch = self.cell_px + self.gap_px;
        let col = ((board.x - self.gap_px) / pitch).floor();
        let row = ((board.y - self.gap_px) / pitch).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.size || col >= self.size {
            return None;
        }
        let index = row * self.size + col;
        self.cell_rect(index)
            .filter(|rect| rect.contains_point(board))
            .map(|_| index)
    }
}
