//! Winning lines of a square grid
//!
//! A line is a row, a column or one of the two full diagonals. Lines are
//! enumerated once when a grid is built; everything else refers to them by
//! their position in that enumeration.

/// Grid coordinates representing (row, col) position
///
/// Uses zero-based indexing starting from top-left:
/// - (0,0) = top-left cell
/// - (0,1) = top row, second column
/// - (1,0) = second row, first column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoords {
    pub row: usize,
    pub col: usize,
}

impl CellCoords {
    /// Creates new cell coordinates
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Which kind of line this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LineKind {
    Row(usize),
    Column(usize),
    /// Top-left to bottom-right
    Diagonal,
    /// Top-right to bottom-left
    AntiDiagonal,
}

impl std::fmt::Display for LineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineKind::Row(r) => write!(f, "row {}", r + 1),
            LineKind::Column(c) => write!(f, "column {}", c + 1),
            LineKind::Diagonal => write!(f, "diagonal"),
            LineKind::AntiDiagonal => write!(f, "anti-diagonal"),
        }
    }
}

/// An ordered set of exactly `size` cell indices
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Line {
    kind: LineKind,
    cells: Vec<usize>,
}

impl Line {
    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Member cell indices in row-major order along the line
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    pub fn contains(&self, index: usize) -> bool {
        self.cells.contains(&index)
    }
}

/// Enumerates every line of a `size`×`size` grid
///
/// Order: `size` rows, then `size` columns, then the main diagonal and the
/// anti-diagonal, for `2 * size + 2` lines in total.
pub fn enumerate_lines(size: usize) -> Vec<Line> {
    let mut lines = Vec::with_capacity(2 * size + 2);

    for row in 0..size {
        lines.push(Line {
            kind: LineKind::Row(row),
            cells: (0..size).map(|col| row * size + col).collect(),
        });
    }

    for col in 0..size {
        lines.push(Line {
            kind: LineKind::Column(col),
            cells: (0..size).map(|row| row * size + col).collect(),
        });
    }

    lines.push(Line {
        kind: LineKind::Diagonal,
        cells: (0..size).map(|i| i * size + i).collect(),
    });
    lines.push(Line {
        kind: LineKind::AntiDiagonal,
        cells: (0..size).map(|i| i * size + (size - 1 - i)).collect(),
    });

    lines
}

/// Builds the reverse index: for each cell, the ids of the lines it belongs to
///
/// Every cell sits on its row and its column, plus zero, one or (for the
/// center of an odd grid) both diagonals.
pub fn lines_by_cell(lines: &[Line], cell_count: usize) -> Vec<Vec<usize>> {
    let mut by_cell = vec![Vec::new(); cell_count];
    for (line_id, line) in lines.iter().enumerate() {
        for &index in line.cells() {
            by_cell[index].push(line_id);
        }
    }
    by_cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_count_for_odd_sizes() {
        for size in [3, 5, 7, 9] {
            assert_eq!(enumerate_lines(size).len(), 2 * size + 2);
        }
    }

    #[test]
    fn three_by_three_lines() {
        let lines = enumerate_lines(3);
        assert_eq!(lines[0].cells(), &[0, 1, 2]);
        assert_eq!(lines[0].kind(), LineKind::Row(0));
        assert_eq!(lines[4].cells(), &[1, 4, 7]);
        assert_eq!(lines[4].kind(), LineKind::Column(1));
        assert_eq!(lines[6].cells(), &[0, 4, 8]);
        assert_eq!(lines[6].kind(), LineKind::Diagonal);
        assert_eq!(lines[7].cells(), &[2, 4, 6]);
        assert_eq!(lines[7].kind(), LineKind::AntiDiagonal);
    }

    #[test]
    fn every_line_has_size_members() {
        let lines = enumerate_lines(5);
        assert!(lines.iter().all(|line| line.cells().len() == 5));
    }

    #[test]
    fn cells_belong_to_two_or_three_lines_except_odd_center() {
        let size = 5;
        let lines = enumerate_lines(size);
        let by_cell = lines_by_cell(&lines, size * size);

        assert_eq!(by_cell[12].len(), 4); // Center: row, column, both diagonals
        assert_eq!(by_cell[0].len(), 3); // Corner: row, column, diagonal
        assert_eq!(by_cell[1].len(), 2); // Edge: row and column only
        assert!(by_cell.iter().all(|ids| (2..=4).contains(&ids.len())));
    }

    #[test]
    fn even_grid_has_no_shared_diagonal_cell() {
        let lines = enumerate_lines(4);
        let by_cell = lines_by_cell(&lines, 16);
        assert!(by_cell.iter().all(|ids| ids.len() <= 3));
    }

    #[test]
    fn line_kind_display_is_one_based() {
        assert_eq!(LineKind::Row(0).to_string(), "row 1");
        assert_eq!(LineKind::Column(4).to_string(), "column 5");
    }
}
