//! Presenter that renders frames into memory
//!
//! Keeps the last board view and transform so either one changing produces a
//! fresh frame. Used by the command line front end and in tests.

use std::fs;
use std::path::Path;

use tiny_skia::Pixmap;

use crate::app::controller::PresentationAdapter;
use crate::app::state::{BoardView, CellVisual, SessionError};
use crate::domain::core::ViewportTransform;
use crate::domain::layout::BoardLayout;
use crate::domain::line::{Line, LineKind};
use crate::ui::renderer::{BoardRenderer, RendererError};

#[derive(Debug)]
pub struct SnapshotPresenter {
    layout: BoardLayout,
    renderer: BoardRenderer,
    cells: Vec<CellVisual>,
    transform: ViewportTransform,
    frame: Option<Pixmap>,
    celebrations: Vec<Vec<LineKind>>,
    errors: Vec<String>,
}

impl SnapshotPresenter {
    pub fn new(layout: BoardLayout, renderer: BoardRenderer) -> Self {
        Self {
            layout,
            renderer,
            cells: Vec::new(),
            transform: ViewportTransform::IDENTITY,
            frame: None,
            celebrations: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Latest rendered frame, `None` until the first board arrives
    pub fn frame(&self) -> Option<&Pixmap> {
        self.frame.as_ref()
    }

    pub fn celebrations(&self) -> &[Vec<LineKind>] {
        &self.celebrations
    }

    pub fn celebration_count(&self) -> usize {
        self.celebrations.len()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Writes the latest frame as a PNG file
    ///
    /// # Errors
    /// Fails if nothing was rendered yet, on encoding errors and on IO errors.
    pub fn save_png(&self, path: &Path) -> Result<(), RendererError> {
        let frame = self.frame.as_ref().ok_or(RendererError::NoFrame)?;
        let bytes = BoardRenderer::encode_png(frame)?;
        fs::write(path, bytes).map_err(|source| RendererError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Wrote board image to {}", path.display());
        Ok(())
    }

    fn redraw(&mut self) {
        if self.cells.is_empty() {
            return;
        }
        match self.renderer.render(&self.layout, &self.cells, self.transform) {
            Ok(frame) => self.frame = Some(frame),
            Err(err) => {
                log::error!("Failed to render board: {err}");
                self.errors.push(err.to_string());
            }
        }
    }
}

impl PresentationAdapter for SnapshotPresenter {
    fn render_board(&mut self, view: BoardView<'_>) {
        self.cells = view.cells();
        self.redraw();
    }

    fn celebrate(&mut self, lines: &[Line]) {
        let names: Vec<String> = lines.iter().map(|line| line.kind().to_string()).collect();
        log::info!("BINGO! {}", names.join(", "));
        self.celebrations.push(lines.iter().map(Line::kind).collect());
    }

    fn apply_transform(&mut self, transform: ViewportTransform) {
        if transform == self.transform && self.frame.is_some() {
            return;
        }
        self.transform = transform;
        self.redraw();
    }

    fn report_error(&mut self, error: &SessionError) {
        log::warn!("{error}");
        self.errors.push(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::photo::PhotoAlbum;
    use crate::domain::challenge::Challenge;
    use crate::domain::grid::BingoGrid;

    fn presenter() -> SnapshotPresenter {
        SnapshotPresenter::new(BoardLayout::new(3, 40.0, 4.0), BoardRenderer::new())
    }

    fn grid() -> BingoGrid {
        BingoGrid::new((0..9).map(Challenge::placeholder).collect(), 3).unwrap()
    }

    #[test]
    fn no_frame_before_first_board() {
        let mut p = presenter();
        p.apply_transform(ViewportTransform::IDENTITY);
        assert!(p.frame().is_none());
        assert!(matches!(p.save_png(Path::new("unused.png")), Err(RendererError::NoFrame)));
    }

    #[test]
    fn render_board_produces_frame() {
        let mut p = presenter();
        let grid = grid();
        let album = PhotoAlbum::new();
        p.render_board(BoardView {
            grid: &grid,
            album: &album,
        });
        let frame = p.frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (136, 136));
    }

    #[test]
    fn transform_rerenders() {
        let mut p = presenter();
        let grid = grid();
        let album = PhotoAlbum::new();
        p.render_board(BoardView {
            grid: &grid,
            album: &album,
        });
        let before = p.frame().unwrap().clone();
        p.apply_transform(ViewportTransform {
            scale: 2.0,
            translate_x: -30.0,
            translate_y: -30.0,
        });
        assert_ne!(p.frame().unwrap().data(), before.data());
    }

    #[test]
    fn celebrations_are_recorded() {
        let mut p = presenter();
        let grid = grid();
        p.celebrate(&grid.lines()[..2]);
        assert_eq!(p.celebration_count(), 1);
        assert_eq!(p.celebrations()[0], vec![LineKind::Row(0), LineKind::Row(1)]);
    }

    #[test]
    fn save_png_writes_file() {
        let mut p = presenter();
        let grid = grid();
        let album = PhotoAlbum::new();
        p.render_board(BoardView {
            grid: &grid,
            album: &album,
        });
        let path = std::env::temp_dir().join(format!("photo_bingo_snapshot_{}.png", std::process::id()));
        p.save_png(&path).unwrap();
        let bytes = fs::read(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }

    #[test]
    fn reported_errors_are_kept() {
        let mut p = presenter();
        p.report_error(&SessionError::FreeCell(4));
        assert_eq!(p.errors(), ["Cell 4 is the free space".to_string()]);
    }
}
