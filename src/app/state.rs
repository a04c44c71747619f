//! Play session state
//!
//! A session pairs the bingo grid with the photos proving each completed
//! cell. The grid tracks completion only; the album lives here so a failed
//! capture can never leave a completed cell without its proof.

use thiserror::Error;

use crate::app::photo::{CaptureError, ImageProvider, PhotoAlbum, PhotoBlob};
use crate::app::progress::SessionProgress;
use crate::domain::grid::{BingoGrid, CompletionOutcome};
use crate::domain::line::Line;

/// Errors surfaced to the player while playing
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Cell {index} does not exist on a {cell_count}-cell board")]
    NoSuchCell { index: usize, cell_count: usize },
    #[error("Cell {0} is the free space")]
    FreeCell(usize),
    #[error("Cell {0} is already completed")]
    AlreadyCompleted(usize),
    #[error("Photo capture failed: {0}")]
    Capture(#[from] CaptureError),
    #[error("Saved progress is for a {saved}x{saved} board, this board is {current}x{current}")]
    ProgressSizeMismatch { saved: usize, current: usize },
}

/// Completion summary for status displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub completed: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent
    pub percentage: u32,
}

impl SessionStatus {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn new(completed: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (completed as f64 / total as f64 * 100.0).round() as u32
        };
        Self {
            completed,
            total,
            percentage,
        }
    }
}

/// Visual state of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStatus {
    Free,
    Incomplete,
    Completed,
}

/// Everything a presenter needs to draw one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellVisual {
    pub index: usize,
    pub status: CellStatus,
    /// Lies on an announced bingo line
    pub highlighted: bool,
    pub has_photo: bool,
    pub text: String,
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, Copy)]
pub struct BoardView<'a> {
    pub grid: &'a BingoGrid,
    pub album: &'a PhotoAlbum,
}

impl BoardView<'_> {
    /// Per-cell visuals in index order
    pub fn cells(&self) -> Vec<CellVisual> {
        (0..self.grid.cell_count())
            .map(|index| {
                let status = if self.grid.is_free_cell(index) {
                    CellStatus::Free
                } else if self.grid.is_completed(index) {
                    CellStatus::Completed
                } else {
                    CellStatus::Incomplete
                };
                CellVisual {
                    index,
                    status,
                    highlighted: self.grid.is_highlighted(index),
                    has_photo: self.album.contains(index),
                    text: self
                        .grid
                        .challenge(index)
                        .map(|challenge| challenge.text.clone())
                        .unwrap_or_default(),
                }
            })
            .collect()
    }
}

/// One player's game on one board
#[derive(Debug, Clone)]
pub struct PlaySession {
    grid: BingoGrid,
    album: PhotoAlbum,
}

impl PlaySession {
    pub fn new(grid: BingoGrid) -> Self {
        Self {
            grid,
            album: PhotoAlbum::new(),
        }
    }

    pub fn grid(&self) -> &BingoGrid {
        &self.grid
    }

    pub fn album(&self) -> &PhotoAlbum {
        &self.album
    }

    pub fn view(&self) -> BoardView<'_> {
        BoardView {
            grid: &self.grid,
            album: &self.album,
        }
    }

    pub fn photo(&self, index: usize) -> Option<&PhotoBlob> {
        self.album.get(index)
    }

    fn check_attachable(&self, index: usize) -> Result<(), SessionError> {
        if index >= self.grid.cell_count() {
            return Err(SessionError::NoSuchCell {
                index,
                cell_count: self.grid.cell_count(),
            });
        }
        if self.grid.is_free_cell(index) {
            return Err(SessionError::FreeCell(index));
        }
        if self.grid.is_completed(index) {
            return Err(SessionError::AlreadyCompleted(index));
        }
        Ok(())
    }

    /// Captures a photo for a cell and completes it
    ///
    /// The cell is only completed once the provider has returned an image.
    ///
    /// # Errors
    /// Unknown, free or already completed cells, and capture failures. In
    /// every error case the session is unchanged.
    pub fn attach_photo(
        &mut self,
        index: usize,
        provider: &mut dyn ImageProvider,
    ) -> Result<CompletionOutcome, SessionError> {
        self.check_attachable(index)?;

        let photo = provider.capture(index)?;
        if photo.is_empty() {
            return Err(CaptureError::Empty.into());
        }

        self.album.insert(index, photo);
        Ok(self.grid.complete(index))
    }

    /// Removes a cell's photo and marks it incomplete
    ///
    /// # Returns
    /// true if the cell was completed before
    pub fn remove_photo(&mut self, index: usize) -> bool {
        self.album.remove(index);
        self.grid.incomplete(index)
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus::new(self.grid.completed_count(), self.grid.cell_count())
    }

    /// Snapshot for the progress store
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            grid_size: self.grid.size(),
            completed: self
                .grid
                .completed_indices()
                .into_iter()
                .filter(|&index| !self.grid.is_free_cell(index))
                .collect(),
            is_completed: self.grid.is_win(),
            photos: self.album.sources(),
        }
    }

    /// Re-applies saved progress on top of the current state
    ///
    /// Completions come back first, then each saved photo is captured again
    /// through `provider`. A photo that cannot be reloaded is logged and its
    /// cell stays completed without a proof.
    ///
    /// # Errors
    /// [`SessionError::ProgressSizeMismatch`] if the snapshot belongs to a
    /// different board size.
    pub fn restore(
        &mut self,
        progress: &SessionProgress,
        provider: &mut dyn ImageProvider,
    ) -> Result<Vec<Line>, SessionError> {
        if progress.grid_size != self.grid.size() {
            return Err(SessionError::ProgressSizeMismatch {
                saved: progress.grid_size,
                current: self.grid.size(),
            });
        }
        let lines = self.grid.restore(progress.completed.iter().copied());

        for &index in progress.photos.keys() {
            if !self.grid.is_completed(index) || self.grid.is_free_cell(index) {
                continue;
            }
            match provider.capture(index) {
                Ok(photo) if !photo.is_empty() => {
                    self.album.insert(index, photo);
                }
                Ok(_) => log::warn!("Saved photo for cell {index} is empty"),
                Err(err) => log::warn!("Could not reload photo for cell {index}: {err}"),
            }
        }
        Ok(lines)
    }

    /// Clears every photo and completion
    pub fn reset(&mut self) {
        self.album.clear();
        self.grid.reset();
    }
}
