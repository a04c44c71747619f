use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;

use photo_bingo::app::controller::{GameController, PresentationAdapter};
use photo_bingo::app::photo::FileImageProvider;
use photo_bingo::app::progress::{JsonFileStore, ProgressStore};
use photo_bingo::config::{self, GameConfig};
use photo_bingo::domain::challenge::{ChallengeSource, CsvFileSource, QuestionListSource};
use photo_bingo::domain::core::Point;
use photo_bingo::domain::grid::BingoGrid;
use photo_bingo::domain::layout::BoardLayout;
use photo_bingo::input::gesture::GestureController;
use photo_bingo::ui::renderer::BoardRenderer;
use photo_bingo::ui::snapshot::SnapshotPresenter;
use photo_bingo::ui::text::GlyphRasterizer;

/// Play a photo bingo board from the command line
#[derive(Debug, Parser)]
#[command(name = "photo-bingo", version, about)]
struct Cli {
    /// Config file (defaults to the per-user config location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective config to the config location and exit
    #[arg(long)]
    init_config: bool,

    /// Challenge CSV with an `id,text` header
    #[arg(long, conflicts_with = "questions")]
    challenges: Option<PathBuf>,

    /// Plain question list, one per line
    #[arg(long)]
    questions: Option<PathBuf>,

    /// Board size, overriding the config
    #[arg(long)]
    size: Option<usize>,

    /// Attach a photo to a cell, e.g. `--photo 3=proof.jpg`
    #[arg(long = "photo", value_parser = parse_photo_arg)]
    photos: Vec<(usize, PathBuf)>,

    /// Remove the photo from a cell after attaching
    #[arg(long = "remove")]
    removals: Vec<usize>,

    /// Drag the board by `dx,dy` screen pixels
    #[arg(long, value_parser = parse_point_arg, allow_hyphen_values = true)]
    pan: Option<Point>,

    /// Zoom steps around the board center (negative zooms out)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    zoom: i32,

    /// Session id whose progress is loaded and saved
    #[arg(long)]
    session: Option<String>,

    /// Directory holding saved sessions
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Start the session over before applying photos
    #[arg(long)]
    reset: bool,

    /// Where to write the rendered board
    #[arg(long, default_value = "board.png")]
    out: PathBuf,
}

fn parse_photo_arg(value: &str) -> Result<(usize, PathBuf), String> {
    let (index, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=PATH, got {value:?}"))?;
    let index = index
        .trim()
        .parse()
        .map_err(|err| format!("invalid cell index {index:?}: {err}"))?;
    Ok((index, PathBuf::from(path.trim())))
}

fn parse_point_arg(value: &str) -> Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {value:?}"))?;
    let x = x.trim().parse().map_err(|err| format!("invalid x {x:?}: {err}"))?;
    let y = y.trim().parse().map_err(|err| format!("invalid y {y:?}: {err}"))?;
    Ok(Point::new(x, y))
}

fn load_config(cli: &Cli) -> Result<GameConfig, Box<dyn Error>> {
    let mut config = GameConfig::load_or_default(cli.config.as_deref())?;
    if let Some(size) = cli.size {
        config.grid.size = size;
        config = config.validate()?;
    }
    Ok(config)
}

fn load_grid(cli: &Cli, config: &GameConfig) -> Result<BingoGrid, Box<dyn Error>> {
    let size = config.grid.size;
    let challenges = if let Some(path) = &cli.questions {
        QuestionListSource::new(path, size).load()?
    } else {
        let path = cli.challenges.clone().unwrap_or_else(|| config.challenge_file.clone());
        match CsvFileSource::new(&path).load() {
            Ok(challenges) => challenges,
            Err(err) => {
                log::warn!("{err}; using placeholder challenges");
                Vec::new()
            }
        }
    };

    let (grid, _mismatch) = BingoGrid::from_partial(challenges, size)?;
    Ok(grid)
}

fn load_renderer(config: &GameConfig) -> BoardRenderer {
    let Some(path) = &config.render.font_path else {
        return BoardRenderer::new();
    };
    match GlyphRasterizer::load(path) {
        Ok(font) => BoardRenderer::with_text(font),
        Err(err) => {
            log::warn!("{err}; drawing cells without labels");
            BoardRenderer::new()
        }
    }
}

fn progress_store(cli: &Cli) -> Result<JsonFileStore, Box<dyn Error>> {
    let dir = match &cli.state_dir {
        Some(dir) => dir.clone(),
        None => config::config_dir()
            .ok_or(config::ConfigError::NoConfigDir)?
            .join("sessions"),
    };
    Ok(JsonFileStore::new(dir))
}

/// Attaches every photo the provider has a file for
///
/// Returns how many failed; each failure has already been reported through
/// the presenter.
fn attach_photos<P: PresentationAdapter>(
    controller: &mut GameController<P>,
    provider: &mut FileImageProvider,
) -> usize {
    let indices: Vec<usize> = provider.indices().collect();
    let mut failed = 0;
    for index in indices {
        if controller.attach_photo(index, provider).is_err() {
            failed += 1;
        }
    }
    failed
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if cli.init_config {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => config::config_path().ok_or(config::ConfigError::NoConfigDir)?,
        };
        config.save(&path)?;
        log::info!("Wrote config to {}", path.display());
        return Ok(());
    }

    let grid = load_grid(&cli, &config)?;
    let layout = BoardLayout::new(grid.size(), config.render.cell_px, config.render.gap_px);
    let presenter = SnapshotPresenter::new(layout, load_renderer(&config));
    let gestures = GestureController::new(config.zoom.limits()?);
    let mut controller = GameController::new(grid, gestures, layout, config.zoom.step, presenter);

    let store = match &cli.session {
        Some(_) => Some(progress_store(&cli)?),
        None => None,
    };
    if let (Some(store), Some(session)) = (&store, &cli.session) {
        if cli.reset {
            controller.reset();
        } else if let Some(progress) = store.load(session)? {
            let mut saved = FileImageProvider::new();
            saved.extend(progress.photos.clone());
            let lines = controller.restore(&progress, &mut saved)?;
            log::info!(
                "Restored session {session}: {} cells, {} photos, {} bingo lines",
                progress.completed.len(),
                controller.session().album().len(),
                lines.len()
            );
        }
    }

    let mut provider = FileImageProvider::new();
    provider.extend(cli.photos.iter().cloned());
    let failed = attach_photos(&mut controller, &mut provider);
    for &index in &cli.removals {
        controller.remove_photo(index);
    }

    if let Some(delta) = cli.pan {
        controller.touch_start(&[Point::new(0.0, 0.0)]);
        controller.touch_move(&[delta]);
        controller.touch_end();
    }
    if cli.zoom != 0 {
        let center = layout.canvas_size() / 2.0;
        controller.zoom_by_step(cli.zoom, Point::new(center, center));
    }

    let status = controller.status();
    println!(
        "{}/{} cells complete ({}%), {} bingo line(s)",
        status.completed,
        status.total,
        status.percentage,
        controller.session().grid().highlighted_lines().len()
    );
    for line in controller.session().grid().highlighted_lines() {
        println!("  BINGO: {}", line.kind());
    }

    if let (Some(store), Some(session)) = (&store, &cli.session) {
        store.save(session, &controller.session().progress())?;
    }

    controller.presenter().save_png(&cli.out)?;

    if failed > 0 {
        for error in controller.presenter().errors() {
            eprintln!("error: {error}");
        }
        return Err(format!("{failed} photo(s) could not be attached").into());
    }
    Ok(())
}
