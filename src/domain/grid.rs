//! Bingo grid state and win detection
//!
//! This module owns cell completion for one game and detects winning lines.
//! It never renders and never stores photos: callers get plain data back and
//! decide what to show.
//!
//! Win detection is incremental. Every line keeps a count of its completed
//! members; completing or clearing a cell touches only the lines that cell
//! belongs to, and a line is won exactly when its count equals the grid size.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::domain::challenge::Challenge;
use crate::domain::line::{CellCoords, Line, enumerate_lines, lines_by_cell};

/// Errors that can occur when building a grid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Grid size outside the supported range
    #[error("Grid size {size} is not supported (expected {min}..={max})")]
    InvalidSize { size: usize, min: usize, max: usize },
    /// Challenge list does not cover the grid exactly
    #[error("{0}")]
    ChallengeCountMismatch(ChallengeCountMismatch),
}

/// Challenge list length differs from the number of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Expected {expected} challenges for the grid, got {actual}")]
pub struct ChallengeCountMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// Result of a completion request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionOutcome {
    /// Whether the call changed the cell from incomplete to completed
    pub completed: bool,
    /// Lines that became fully completed and had not been announced yet
    pub newly_won: Vec<Line>,
}

impl CompletionOutcome {
    /// Outcome for a call that changed nothing
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// Returns true if this call produced a bingo
    pub fn is_bingo(&self) -> bool {
        !self.newly_won.is_empty()
    }
}

/// A square bingo board
///
/// The size is fixed for the lifetime of the value; changing the board size
/// means building a new grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BingoGrid {
    size: usize,
    challenges: Vec<Challenge>,
    lines: Vec<Line>,
    /// Line ids per cell
    cell_lines: Vec<Vec<usize>>,
    completed: Vec<bool>,
    /// Completed members per line
    line_counts: Vec<usize>,
    /// Lines that already produced a win event
    announced: BTreeSet<usize>,
}

impl BingoGrid {
    /// Smallest supported board
    pub const MIN_SIZE: usize = 2;
    /// Largest supported board
    pub const MAX_SIZE: usize = 15;

    /// Creates a new grid from exactly `size * size` challenges
    ///
    /// # Arguments
    /// * `challenges` - Challenge for each cell in row-major order
    /// * `size` - Number of rows (and columns)
    ///
    /// # Errors
    /// [`GridError::InvalidSize`] for unsupported sizes and
    /// [`GridError::ChallengeCountMismatch`] if the list length is not
    /// `size * size`.
    ///
    /// # Example
    /// ```rust
    /// use photo_bingo::domain::{challenge::Challenge, grid::BingoGrid};
    ///
    /// let challenges = (0..25).map(Challenge::placeholder).collect();
    /// let grid = BingoGrid::new(challenges, 5).unwrap();
    /// assert_eq!(grid.center_index(), Some(12));
    /// assert_eq!(grid.lines().len(), 12);
    /// ```
    pub fn new(challenges: Vec<Challenge>, size: usize) -> Result<Self, GridError> {
        Self::validate_size(size)?;

        let expected = size * size;
        if challenges.len() != expected {
            return Err(GridError::ChallengeCountMismatch(ChallengeCountMismatch {
                expected,
                actual: challenges.len(),
            }));
        }

        Ok(Self::build(challenges, size))
    }

    /// Creates a grid from whatever challenges are available
    ///
    /// Missing cells get [`Challenge::placeholder`] and surplus challenges are
    /// dropped. The mismatch, if any, is logged and returned so the caller can
    /// surface it.
    ///
    /// # Errors
    /// [`GridError::InvalidSize`] for unsupported sizes.
    pub fn from_partial(
        mut challenges: Vec<Challenge>,
        size: usize,
    ) -> Result<(Self, Option<ChallengeCountMismatch>), GridError> {
        Self::validate_size(size)?;

        let expected = size * size;
        let mismatch = (challenges.len() != expected).then_some(ChallengeCountMismatch {
            expected,
            actual: challenges.len(),
        });

        if let Some(mismatch) = mismatch {
            log::warn!("{mismatch}; continuing with placeholders/truncation");
            challenges.truncate(expected);
            let present = challenges.len();
            challenges.extend((present..expected).map(Challenge::placeholder));
        }

        Ok((Self::build(challenges, size), mismatch))
    }

    fn validate_size(size: usize) -> Result<(), GridError> {
        if !(Self::MIN_SIZE..=Self::MAX_SIZE).contains(&size) {
            return Err(GridError::InvalidSize {
                size,
                min: Self::MIN_SIZE,
                max: Self::MAX_SIZE,
            });
        }
        Ok(())
    }

    fn build(challenges: Vec<Challenge>, size: usize) -> Self {
        let cell_count = size * size;
        let lines = enumerate_lines(size);
        let cell_lines = lines_by_cell(&lines, cell_count);
        let line_count = lines.len();

        let mut grid = Self {
            size,
            challenges,
            lines,
            cell_lines,
            completed: vec![false; cell_count],
            line_counts: vec![0; line_count],
            announced: BTreeSet::new(),
        };
        grid.mark_free_cell();
        grid
    }

    fn mark_free_cell(&mut self) {
        if let Some(center) = self.center_index() {
            self.completed[center] = true;
            for &line_id in &self.cell_lines[center] {
                self.line_counts[line_id] += 1;
            }
        }
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Index of the free center cell; only odd grids have one
    pub fn center_index(&self) -> Option<usize> {
        (self.size % 2 == 1).then_some(self.cell_count() / 2)
    }

    pub fn is_free_cell(&self, index: usize) -> bool {
        self.center_index() == Some(index)
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.get(index).copied().unwrap_or(false)
    }

    pub fn challenge(&self, index: usize) -> Option<&Challenge> {
        self.challenges.get(index)
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    /// All `2 * size + 2` lines of the grid
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Converts a cell index to (row, col)
    pub fn coords(&self, index: usize) -> Option<CellCoords> {
        (index < self.cell_count()).then(|| CellCoords::new(index / self.size, index % self.size))
    }

    /// Converts (row, col) to a cell index
    pub fn index_of(&self, coords: CellCoords) -> Option<usize> {
        (coords.row < self.size && coords.col < self.size).then(|| coords.row * self.size + coords.col)
    }

    /// Marks a cell completed
    ///
    /// Out-of-range indices, the free cell, and cells that are already
    /// completed are left alone and yield [`CompletionOutcome::unchanged`].
    /// Otherwise every line that became complete with this cell and has not
    /// been announced yet is returned and remembered as announced.
    pub fn complete(&mut self, index: usize) -> CompletionOutcome {
        if index >= self.cell_count() || self.is_free_cell(index) || self.completed[index] {
            return CompletionOutcome::unchanged();
        }

        self.completed[index] = true;

        let mut newly_won = Vec::new();
        for &line_id in &self.cell_lines[index] {
            self.line_counts[line_id] += 1;
            if self.line_counts[line_id] == self.size && self.announced.insert(line_id) {
                newly_won.push(self.lines[line_id].clone());
            }
        }

        log::debug!("Cell {index} completed ({} new lines)", newly_won.len());
        for line in &newly_won {
            log::info!("Bingo on {}", line.kind());
        }

        CompletionOutcome {
            completed: true,
            newly_won,
        }
    }

    /// Clears a cell's completion
    ///
    /// The free cell, out-of-range indices and incomplete cells are left
    /// alone. Every announced line through this cell is un-announced, so
    /// completing it again produces a fresh win event.
    ///
    /// # Returns
    /// true if the cell changed state
    pub fn incomplete(&mut self, index: usize) -> bool {
        if index >= self.cell_count() || self.is_free_cell(index) || !self.completed[index] {
            return false;
        }

        self.completed[index] = false;
        for &line_id in &self.cell_lines[index] {
            self.line_counts[line_id] -= 1;
            self.announced.remove(&line_id);
        }

        log::debug!("Cell {index} cleared");
        true
    }

    /// Returns true if any line is fully completed right now
    pub fn is_win(&self) -> bool {
        self.line_counts.iter().any(|&count| count == self.size)
    }

    /// Lines whose every member is completed right now
    pub fn active_lines(&self) -> Vec<&Line> {
        self.lines
            .iter()
            .zip(&self.line_counts)
            .filter(|(_, count)| **count == self.size)
            .map(|(line, _)| line)
            .collect()
    }

    /// Lines that have been announced and are still highlighted
    pub fn highlighted_lines(&self) -> Vec<&Line> {
        self.announced.iter().map(|&line_id| &self.lines[line_id]).collect()
    }

    /// Returns true if the cell lies on a highlighted line
    pub fn is_highlighted(&self, index: usize) -> bool {
        self.cell_lines
            .get(index)
            .is_some_and(|ids| ids.iter().any(|id| self.announced.contains(id)))
    }

    /// Indices of completed cells, including the free cell
    pub fn completed_indices(&self) -> BTreeSet<usize> {
        self.completed
            .iter()
            .enumerate()
            .filter_map(|(index, &done)| done.then_some(index))
            .collect()
    }

    /// Number of completed cells, including the free cell
    pub fn completed_count(&self) -> usize {
        self.completed.iter().filter(|&&done| done).count()
    }

    /// Re-applies previously saved completions without producing win events
    ///
    /// Lines completed by the restore are marked announced, since the player
    /// has already seen them, and returned for highlighting. Unknown indices
    /// are skipped.
    pub fn restore(&mut self, indices: impl IntoIterator<Item = usize>) -> Vec<Line> {
        let mut restored = Vec::new();
        for index in indices {
            if index >= self.cell_count() {
                log::warn!("Ignoring saved completion for out-of-range cell {index}");
                continue;
            }
            restored.extend(self.complete(index).newly_won);
        }
        restored
    }

    /// Clears every completion except the free cell and forgets announcements
    pub fn reset(&mut self) {
        self.completed.fill(false);
        self.line_counts.fill(0);
        self.announced.clear();
        self.mark_free_cell();
        log::debug!("Grid reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::line::LineKind;

    fn grid(size: usize) -> BingoGrid {
        let challenges = (0..size * size).map(Challenge::placeholder).collect();
        BingoGrid::new(challenges, size).unwrap()
    }

    #[test]
    fn creation_yields_expected_lines() {
        for size in [3, 5, 7, 9] {
            let g = grid(size);
            assert_eq!(g.lines().len(), 2 * size + 2);
            assert_eq!(g.cell_count(), size * size);
        }
    }

    #[test]
    fn creation_rejects_wrong_challenge_count() {
        let challenges = (0..24).map(Challenge::placeholder).collect();
        let result = BingoGrid::new(challenges, 5);
        assert_eq!(
            result,
            Err(GridError::ChallengeCountMismatch(ChallengeCountMismatch {
                expected: 25,
                actual: 24
            }))
        );
    }

    #[test]
    fn creation_rejects_invalid_size() {
        assert!(matches!(
            BingoGrid::new(vec![Challenge::placeholder(0)], 1),
            Err(GridError::InvalidSize { size: 1, .. })
        ));
        assert!(matches!(BingoGrid::new(Vec::new(), 0), Err(GridError::InvalidSize { .. })));
    }

    #[test]
    fn partial_creation_pads_and_reports() {
        let challenges = (0..7).map(Challenge::placeholder).collect();
        let (g, mismatch) = BingoGrid::from_partial(challenges, 3).unwrap();
        assert_eq!(mismatch, Some(ChallengeCountMismatch { expected: 9, actual: 7 }));
        assert_eq!(g.challenges().len(), 9);
        assert_eq!(g.challenge(8).unwrap().text, "Challenge 9");
    }

    #[test]
    fn partial_creation_truncates_surplus() {
        let challenges = (0..12).map(Challenge::placeholder).collect();
        let (g, mismatch) = BingoGrid::from_partial(challenges, 3).unwrap();
        assert_eq!(mismatch.map(|m| m.actual), Some(12));
        assert_eq!(g.challenges().len(), 9);
    }

    #[test]
    fn partial_creation_exact_count_has_no_mismatch() {
        let challenges = (0..9).map(Challenge::placeholder).collect();
        let (_, mismatch) = BingoGrid::from_partial(challenges, 3).unwrap();
        assert!(mismatch.is_none());
    }

    #[test]
    fn free_cell_is_completed_and_immutable() {
        let mut g = grid(5);
        assert_eq!(g.center_index(), Some(12));
        assert!(g.is_completed(12));
        assert_eq!(g.complete(12), CompletionOutcome::unchanged());
        assert!(!g.incomplete(12));
        assert!(g.is_completed(12));
        assert!(g.completed_indices().contains(&12));
    }

    #[test]
    fn even_grid_has_no_free_cell() {
        let g = grid(4);
        assert_eq!(g.center_index(), None);
        assert!(g.completed_indices().is_empty());
    }

    #[test]
    fn free_cell_counts_toward_its_lines() {
        let mut g = grid(5);
        // Row 2 through the center needs only the four other cells
        for index in [10, 11, 13] {
            assert!(!g.complete(index).is_bingo());
        }
        let outcome = g.complete(14);
        assert_eq!(outcome.newly_won.len(), 1);
        assert_eq!(outcome.newly_won[0].kind(), LineKind::Row(2));

        // Both diagonals also contain the center
        let mut g = grid(5);
        for index in [0, 6, 18] {
            g.complete(index);
        }
        let outcome = g.complete(24);
        assert_eq!(outcome.newly_won[0].kind(), LineKind::Diagonal);

        let mut g = grid(5);
        for index in [2, 7, 17] {
            g.complete(index);
        }
        assert_eq!(g.complete(22).newly_won[0].kind(), LineKind::Column(2));

        let mut g = grid(5);
        for index in [4, 8, 16] {
            g.complete(index);
        }
        assert_eq!(g.complete(20).newly_won[0].kind(), LineKind::AntiDiagonal);
    }

    #[test]
    fn completing_single_line_yields_exactly_one_win() {
        let size = 5;
        let lines = grid(size).lines().to_vec();
        for line in lines {
            let mut g = grid(size);
            let members: Vec<usize> = line.cells().iter().copied().filter(|&i| !g.is_free_cell(i)).collect();
            let (last, rest) = members.split_last().unwrap();
            for &index in rest {
                assert!(g.complete(index).newly_won.is_empty());
            }
            let outcome = g.complete(*last);
            assert!(outcome.completed);
            assert_eq!(outcome.newly_won, vec![line.clone()]);
            assert!(g.is_win());
        }
    }

    #[test]
    fn simultaneous_lines_are_all_returned() {
        let mut g = grid(3);
        // Row 0 except cell 0, column 0 except cell 0
        for index in [1, 2, 3, 6] {
            g.complete(index);
        }
        let outcome = g.complete(0);
        let kinds: Vec<LineKind> = outcome.newly_won.iter().map(Line::kind).collect();
        assert_eq!(kinds, vec![LineKind::Row(0), LineKind::Column(0)]);
    }

    #[test]
    fn redundant_complete_is_noop() {
        let mut g = grid(3);
        assert!(g.complete(0).completed);
        assert_eq!(g.complete(0), CompletionOutcome::unchanged());
        assert_eq!(g.complete(9), CompletionOutcome::unchanged());
        assert_eq!(g.complete(usize::MAX), CompletionOutcome::unchanged());
    }

    #[test]
    fn redundant_incomplete_is_noop() {
        let mut g = grid(3);
        assert!(!g.incomplete(0));
        assert!(!g.incomplete(42));
        g.complete(0);
        assert!(g.incomplete(0));
        assert!(!g.incomplete(0));
    }

    #[test]
    fn recompletion_after_incomplete_retriggers_once() {
        let mut g = grid(3);
        for index in [0, 1] {
            g.complete(index);
        }
        assert_eq!(g.complete(2).newly_won.len(), 1);

        assert!(g.incomplete(1));
        assert!(!g.is_win());
        assert!(g.highlighted_lines().is_empty());

        let again = g.complete(1);
        assert_eq!(again.newly_won.len(), 1);
        assert_eq!(again.newly_won[0].kind(), LineKind::Row(0));
    }

    #[test]
    fn announced_line_not_reannounced_by_other_cells() {
        let mut g = grid(3);
        for index in [0, 1, 2] {
            g.complete(index);
        }
        // Completing cells elsewhere keeps row 0 announced, never re-fires it
        let outcome = g.complete(5);
        assert!(outcome.newly_won.is_empty());
        assert_eq!(g.highlighted_lines().len(), 1);
    }

    #[test]
    fn incomplete_only_unannounces_lines_through_cell() {
        let mut g = grid(4);
        // Win the top and bottom rows
        for index in [0, 1, 2, 3, 12, 13, 14, 15] {
            g.complete(index);
        }
        assert_eq!(g.highlighted_lines().len(), 2);

        g.incomplete(13);
        let highlighted: Vec<LineKind> = g.highlighted_lines().iter().map(|l| l.kind()).collect();
        assert_eq!(highlighted, vec![LineKind::Row(0)]);
        assert!(g.is_win());
        assert!(g.is_highlighted(0));
        assert!(!g.is_highlighted(12));
    }

    #[test]
    fn is_win_independent_of_announcements() {
        let mut g = grid(3);
        assert!(!g.is_win());
        for index in [3, 5] {
            g.complete(index);
        }
        assert!(g.is_win()); // Row 1 through the free center
        assert_eq!(g.active_lines().len(), 1);
    }

    #[test]
    fn reset_matches_fresh_grid() {
        let fresh = grid(5);
        let mut g = grid(5);
        for index in [0, 1, 2, 3, 4, 20, 24] {
            g.complete(index);
        }
        g.reset();
        assert_eq!(g, fresh);
        assert_eq!(g.completed_indices(), [12].into_iter().collect());
    }

    #[test]
    fn restore_marks_lines_announced_without_events() {
        let mut g = grid(3);
        let restored = g.restore([0, 1, 2, 99]);
        assert_eq!(restored.len(), 1);
        assert_eq!(g.highlighted_lines().len(), 1);
        // Re-completing is a no-op and produces nothing new
        assert!(g.complete(2).newly_won.is_empty());
    }

    #[test]
    fn coords_round_trip_for_corners() {
        let g = grid(5);
        assert_eq!(g.coords(0), Some(CellCoords::new(0, 0)));
        assert_eq!(g.coords(24), Some(CellCoords::new(4, 4)));
        assert_eq!(g.coords(25), None);
        assert_eq!(g.index_of(CellCoords::new(2, 3)), Some(13));
        assert_eq!(g.index_of(CellCoords::new(5, 0)), None);
    }
}
