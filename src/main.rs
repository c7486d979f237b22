mod config;
mod game;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use simplelog::{LevelFilter, WriteLogger};
use std::{fs, io, path::PathBuf, thread, time::Duration};
use tui::{backend::CrosstermBackend, Terminal};

use config::Config;
use game::{FileStore, Game, GameRng, InputEvent};

/// Snake - the classic terminal game, with maps, pausing and a leaderboard
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Cli {
    /// Config file to use instead of the default location
    #[clap(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for food and map generation
    #[clap(long)]
    seed: Option<u64>,

    /// Where to write the log
    #[clap(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Let the snake wrap around the board edges
    #[clap(long)]
    wrap: bool,

    /// Leaderboard file
    #[clap(long, value_name = "PATH")]
    records: Option<PathBuf>,
}

fn init_logging(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => {
            let dir = config::data_dir();
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create data directory: {:?}", dir))?;
            dir.join("snake.log")
        }
    };

    let file = fs::File::create(&path)
        .with_context(|| format!("Failed to create log file: {:?}", path))?;
    WriteLogger::init(LevelFilter::Debug, simplelog::Config::default(), file)
        .with_context(|| "Failed to initialise logging")?;

    Ok(())
}

/// Wait for the next key press. Returns immediately with `InputEvent::None`
/// when `non_blocking` is set and nothing is pending.
fn next_input(game: &Game, non_blocking: bool) -> Result<InputEvent> {
    if non_blocking && !event::poll(Duration::from_millis(0))? {
        return Ok(InputEvent::None);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(game
            .config
            .key_bindings
            .resolve(&key, game.input_context())),
        _ => Ok(InputEvent::None),
    }
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut game: Game) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, &game))?;

        // Rounds advance on a timer; menus wait for the player
        let delay = game.tick_delay();
        let input = next_input(&game, delay.is_some())?;

        if !game.handle_input(input) {
            return Ok(());
        }

        if let Some(delay) = delay {
            thread::sleep(delay);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.clone())?;

    // Load config
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::config_path()?,
    };
    let mut config = Config::load_from(&config_path)?;
    if cli.wrap {
        config.wrap = true;
    }

    let records = cli.records.clone().unwrap_or_else(|| config.record_path());
    let store = FileStore::new(records, config.leaderboard_capacity);
    let rng = match cli.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };

    let (cols, rows) = terminal::size()?;
    let (width, height) = ui::board_size(cols, rows);
    let game = Game::new(config, width, height, Box::new(store), rng, Some(config_path))
        .with_context(|| format!("Terminal too small ({}x{})", cols, rows))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let res = run_app(&mut terminal, game);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("Session ended");

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}
