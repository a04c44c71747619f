//! Application controller and coordination layer
//!
//! The controller owns the play session and the gesture controller and pushes
//! their results to an injected presentation adapter. Nothing is looked up
//! globally: whoever builds the controller decides how it is presented.

use crate::app::photo::ImageProvider;
use crate::app::progress::SessionProgress;
use crate::app::state::{BoardView, PlaySession, SessionError, SessionStatus};
use crate::domain::core::{Point, ViewportTransform};
use crate::domain::grid::{BingoGrid, CompletionOutcome};
use crate::domain::layout::BoardLayout;
use crate::domain::line::Line;
use crate::input::gesture::GestureController;

/// Receives everything the player should see
///
/// Calls arrive after the state change they describe has fully completed.
pub trait PresentationAdapter {
    /// Redraw every cell from the current board state
    fn render_board(&mut self, view: BoardView<'_>);

    /// Celebrate a bingo; called once per action with every new line
    fn celebrate(&mut self, lines: &[Line]);

    /// Apply a new viewport transform to the board container
    fn apply_transform(&mut self, transform: ViewportTransform);

    /// Show a failure to the player
    fn report_error(&mut self, error: &SessionError) {
        log::warn!("{error}");
    }
}

/// Wires a play session, gesture input and a presenter together
#[derive(Debug)]
pub struct GameController<P: PresentationAdapter> {
    session: PlaySession,
    gestures: GestureController,
    layout: BoardLayout,
    zoom_step: f32,
    presenter: P,
}

impl<P: PresentationAdapter> GameController<P> {
    /// Creates a controller and draws the initial board
    pub fn new(grid: BingoGrid, gestures: GestureController, layout: BoardLayout, zoom_step: f32, presenter: P) -> Self {
        let mut controller = Self {
            session: PlaySession::new(grid),
            gestures,
            layout,
            zoom_step,
            presenter,
        };
        controller.presenter.render_board(controller.session.view());
        controller.presenter.apply_transform(controller.gestures.transform());
        controller
    }

    pub fn session(&self) -> &PlaySession {
        &self.session
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn transform(&self) -> ViewportTransform {
        self.gestures.transform()
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    /// Cell under a screen point, accounting for pan and zoom
    pub fn cell_at(&self, screen: Point) -> Option<usize> {
        let board = self.gestures.transform().invert(screen);
        self.layout.cell_at(board)
    }

    /// Captures a photo for a cell and completes it
    ///
    /// Errors are reported to the presenter as well as returned; the board is
    /// only redrawn when something changed.
    pub fn attach_photo(
        &mut self,
        index: usize,
        provider: &mut dyn ImageProvider,
    ) -> Result<CompletionOutcome, SessionError> {
        match self.session.attach_photo(index, provider) {
            Ok(outcome) => {
                self.presenter.render_board(self.session.view());
                if outcome.is_bingo() {
                    self.presenter.celebrate(&outcome.newly_won);
                }
                Ok(outcome)
            }
            Err(err) => {
                self.presenter.report_error(&err);
                Err(err)
            }
        }
    }

    /// Removes a cell's photo and marks it incomplete
    pub fn remove_photo(&mut self, index: usize) -> bool {
        let changed = self.session.remove_photo(index);
        self.presenter.render_board(self.session.view());
        changed
    }

    /// Re-applies saved progress and highlights lines it completes
    ///
    /// Saved photos are reloaded through `provider`. Restored lines are not
    /// celebrated again.
    pub fn restore(
        &mut self,
        progress: &SessionProgress,
        provider: &mut dyn ImageProvider,
    ) -> Result<Vec<Line>, SessionError> {
        let lines = self.session.restore(progress, provider).inspect_err(|err| {
            self.presenter.report_error(err);
        })?;
        self.presenter.render_board(self.session.view());
        Ok(lines)
    }

    pub fn touch_start(&mut self, points: &[Point]) {
        self.gestures.on_gesture_start(points);
    }

    pub fn touch_move(&mut self, points: &[Point]) -> ViewportTransform {
        let transform = self.gestures.on_gesture_move(points);
        self.presenter.apply_transform(transform);
        transform
    }

    pub fn touch_end(&mut self) {
        self.gestures.on_gesture_end();
    }

    /// Zoom buttons / wheel: positive steps zoom in around `focus`
    pub fn zoom_by_step(&mut self, steps: i32, focus: Point) -> ViewportTransform {
        let transform = self.gestures.zoom_by_step(steps, self.zoom_step, focus);
        self.presenter.apply_transform(transform);
        transform
    }

    /// Starts the game over: photos, completions and viewport
    pub fn reset(&mut self) {
        self.session.reset();
        let transform = self.gestures.reset();
        self.presenter.render_board(self.session.view());
        self.presenter.apply_transform(transform);
        log::info!("Game reset");
    }
}
