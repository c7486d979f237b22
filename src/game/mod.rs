mod board;
mod error;
mod food;
mod input;
mod leaderboard;
mod map;
mod menu;
mod mode;
mod options;
mod rng;
mod round;
mod snake;

pub use board::{Board, Position};
pub use error::GameError;
pub use input::{InputContext, InputEvent};
pub use leaderboard::{FileStore, Leaderboard, LeaderboardStore};
pub use map::{GameMap, MapCatalog, MapChoice, MapDefinition};
pub use menu::{Menu, MenuAction};
pub use mode::Mode;
pub use options::{OptionsAction, OptionsMenu};
pub use rng::GameRng;
pub use round::{ExitReason, Round, RoundSettings, RoundStatus};
pub use snake::{Direction, Snake};

use std::path::PathBuf;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainChoice {
    Classic,
    Endless,
    Options,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMenuItem {
    Map(MapChoice),
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartChoice {
    Restart,
    Quit,
}

fn main_menu() -> Menu<MainChoice> {
    Menu::new(
        "Snake",
        vec![
            ("Classic Mode".to_string(), MainChoice::Classic),
            ("Endless Mode".to_string(), MainChoice::Endless),
            ("Options".to_string(), MainChoice::Options),
            ("Quit".to_string(), MainChoice::Quit),
        ],
    )
}

fn restart_menu() -> Menu<RestartChoice> {
    Menu::new(
        "Game Over",
        vec![
            ("Restart".to_string(), RestartChoice::Restart),
            ("Quit".to_string(), RestartChoice::Quit),
        ],
    )
}

/// The game-mode state machine. Owns the configuration, the random
/// stream, the leaderboard and the round in progress.
pub struct Game {
    pub mode: Mode,
    pub config: Config,
    board: Board,
    rng: GameRng,
    leaderboard: Leaderboard,
    store: Box<dyn LeaderboardStore>,
    config_path: Option<PathBuf>,
    main_menu: Menu<MainChoice>,
    map_menu: Menu<MapMenuItem>,
    catalog: Option<MapCatalog>,
    options: OptionsMenu,
    restart_menu: Menu<RestartChoice>,
    current_map: Option<GameMap>,
    round: Option<Round>,
    last_result: Option<(ExitReason, u32)>,
    notice: Option<String>,
}

impl Game {
    /// `width` and `height` are the outer board dimensions, wall ring
    /// included. `config_path` is where option changes are persisted.
    pub fn new(
        mut config: Config,
        width: i32,
        height: i32,
        store: Box<dyn LeaderboardStore>,
        rng: GameRng,
        config_path: Option<PathBuf>,
    ) -> Result<Self, GameError> {
        let board = Board::with_minimum(
            width,
            height,
            config.wrap,
            config.min_board_width,
            config.min_board_height,
        )?;
        let max_length = Snake::max_spawn_length(&board);
        if config.initial_length > max_length {
            warn!(
                "Initial length {} does not fit a {}x{} board, using {}",
                config.initial_length, width, height, max_length
            );
            config.initial_length = max_length;
        }
        let leaderboard = Leaderboard::load_from(&*store, config.leaderboard_capacity);

        info!(
            "Session started: board {}x{}, seed {}",
            width,
            height,
            rng.seed()
        );

        Ok(Self {
            mode: Mode::MainMenu,
            config,
            board,
            rng,
            leaderboard,
            store,
            config_path,
            main_menu: main_menu(),
            map_menu: Menu::new("Select Map", vec![("Back".to_string(), MapMenuItem::Back)]),
            catalog: None,
            options: OptionsMenu::new(max_length),
            restart_menu: restart_menu(),
            current_map: None,
            round: None,
            last_result: None,
            notice: None,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn main_menu(&self) -> &Menu<MainChoice> {
        &self.main_menu
    }

    pub fn map_menu(&self) -> &Menu<MapMenuItem> {
        &self.map_menu
    }

    pub fn options(&self) -> &OptionsMenu {
        &self.options
    }

    pub fn restart_menu(&self) -> &Menu<RestartChoice> {
        &self.restart_menu
    }

    pub fn last_result(&self) -> Option<(ExitReason, u32)> {
        self.last_result
    }

    /// A one-line message for the player, cleared on the next menu input.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Which key bindings the next key press should be resolved with.
    pub fn input_context(&self) -> InputContext {
        match (&self.mode, &self.round) {
            (Mode::Playing, Some(round)) if round.status() == RoundStatus::Running => {
                InputContext::Play
            }
            _ => InputContext::Menu,
        }
    }

    /// Delay after the current step while a round is running; `None` when
    /// the driver should block on input instead.
    pub fn tick_delay(&self) -> Option<Duration> {
        match self.mode {
            Mode::Playing => self.round.as_ref().and_then(Round::tick_delay),
            _ => None,
        }
    }

    /// Feed one input. Returns false when the player asked to leave.
    pub fn handle_input(&mut self, input: InputEvent) -> bool {
        match self.mode {
            Mode::MainMenu => self.handle_main_menu(input),
            Mode::MapSelect => self.handle_map_select(input),
            Mode::Options => self.handle_options(input),
            Mode::Playing => self.handle_playing(input),
            Mode::RestartPrompt => self.handle_restart_prompt(input),
            Mode::EndlessUnavailable => self.handle_endless(input),
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        debug!("Mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    fn handle_main_menu(&mut self, input: InputEvent) -> bool {
        if input != InputEvent::None {
            self.notice = None;
        }
        if input == InputEvent::Quit {
            return false;
        }

        match self.main_menu.handle(input) {
            MenuAction::Confirm(MainChoice::Classic) => self.enter_map_select(),
            MenuAction::Confirm(MainChoice::Endless) => self.set_mode(Mode::EndlessUnavailable),
            MenuAction::Confirm(MainChoice::Options) => {
                self.options = OptionsMenu::new(Snake::max_spawn_length(&self.board));
                self.set_mode(Mode::Options);
            }
            MenuAction::Confirm(MainChoice::Quit) | MenuAction::Back => return false,
            MenuAction::None => {}
        }
        true
    }

    fn enter_map_select(&mut self) {
        let catalog = match MapCatalog::build(
            &self.board,
            self.config.initial_length,
            &self.config.maps,
            &mut self.rng,
        ) {
            Ok(catalog) => catalog,
            Err(err) => {
                error!("Map catalog unavailable: {}", err);
                self.notice = Some(err.to_string());
                return;
            }
        };

        let mut items: Vec<(String, MapMenuItem)> = catalog
            .names()
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), MapMenuItem::Map(MapChoice::Preset(i))))
            .collect();
        items.push(("Random".to_string(), MapMenuItem::Map(MapChoice::Random)));
        items.push(("Back".to_string(), MapMenuItem::Back));

        self.map_menu = Menu::new("Select Map", items);
        self.catalog = Some(catalog);
        self.set_mode(Mode::MapSelect);
    }

    fn handle_map_select(&mut self, input: InputEvent) -> bool {
        let action = match input {
            InputEvent::Quit => MenuAction::Back,
            other => self.map_menu.handle(other),
        };

        match action {
            MenuAction::Confirm(MapMenuItem::Map(choice)) => {
                let selected = self
                    .catalog
                    .as_ref()
                    .and_then(|catalog| catalog.select(choice, &mut self.rng));
                match selected {
                    Some(map) => {
                        info!("Classic session on '{}'", map.name());
                        self.current_map = Some(map);
                        self.start_round();
                    }
                    None => warn!("No map for selection {:?}", choice),
                }
            }
            MenuAction::Confirm(MapMenuItem::Back) | MenuAction::Back => {
                self.set_mode(Mode::MainMenu);
            }
            MenuAction::None => {}
        }
        true
    }

    fn handle_options(&mut self, input: InputEvent) -> bool {
        if self.options.handle(input, &mut self.config) == OptionsAction::Back {
            self.board.set_wrap(self.config.wrap);
            self.persist_config();
            self.set_mode(Mode::MainMenu);
        }
        true
    }

    fn persist_config(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(err) = self.config.save_to(path) {
            error!("Options not saved: {:#}", err);
        }
    }

    fn handle_endless(&mut self, input: InputEvent) -> bool {
        if matches!(
            input,
            InputEvent::MenuConfirm | InputEvent::MenuBack | InputEvent::Quit
        ) {
            self.set_mode(Mode::MainMenu);
        }
        true
    }

    fn round_settings(&self) -> RoundSettings {
        RoundSettings {
            initial_length: self.config.initial_length,
            base_delay_ms: self.config.base_delay_ms,
            min_delay_ms: self.config.min_delay_ms,
        }
    }

    fn start_round(&mut self) {
        let Some(map) = self.current_map.clone() else {
            self.set_mode(Mode::MainMenu);
            return;
        };

        match Round::new(self.board, map, self.round_settings(), &mut self.rng) {
            Ok(round) => {
                self.round = Some(round);
                self.set_mode(Mode::Playing);
            }
            Err(err) => {
                error!("Could not start a round: {}", err);
                self.notice = Some(err.to_string());
                self.round = None;
                self.set_mode(Mode::MainMenu);
            }
        }
    }

    fn handle_playing(&mut self, input: InputEvent) -> bool {
        let Some(round) = self.round.as_mut() else {
            self.set_mode(Mode::MainMenu);
            return true;
        };

        round.tick(input, &mut self.rng);
        if let Some((reason, score)) = round.outcome() {
            self.finish_round(reason, score);
        }
        true
    }

    fn finish_round(&mut self, reason: ExitReason, score: u32) {
        self.last_result = Some((reason, score));
        self.record_score(score);

        match reason {
            ExitReason::Collision | ExitReason::BoardCleared => {
                self.restart_menu = restart_menu();
                self.set_mode(Mode::RestartPrompt);
            }
            ExitReason::Quit => {
                self.round = None;
                self.set_mode(Mode::MainMenu);
            }
            ExitReason::PlayerRestart => self.start_round(),
        }
    }

    fn record_score(&mut self, score: u32) {
        let score = i32::try_from(score).unwrap_or(i32::MAX);
        if self.leaderboard.insert(score) {
            info!("New leaderboard entry: {}", score);
        }
        self.leaderboard.save_to(&*self.store);
    }

    fn handle_restart_prompt(&mut self, input: InputEvent) -> bool {
        if input == InputEvent::Quit {
            return false;
        }

        match self.restart_menu.handle(input) {
            MenuAction::Confirm(RestartChoice::Restart) | MenuAction::Back => {
                self.round = None;
                self.set_mode(Mode::MainMenu);
                true
            }
            MenuAction::Confirm(RestartChoice::Quit) => false,
            MenuAction::None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::tempdir;

    /// In-memory store that records every save.
    #[derive(Clone, Default)]
    struct MemoryStore {
        scores: Rc<RefCell<Option<Vec<i32>>>>,
        saves: Rc<RefCell<usize>>,
    }

    impl LeaderboardStore for MemoryStore {
        fn load(&self) -> anyhow::Result<Vec<i32>> {
            self.scores
                .borrow()
                .clone()
                .ok_or_else(|| anyhow::anyhow!("nothing stored"))
        }

        fn save(&self, scores: &[i32]) -> anyhow::Result<()> {
            *self.scores.borrow_mut() = Some(scores.to_vec());
            *self.saves.borrow_mut() += 1;
            Ok(())
        }
    }

    fn new_game(store: MemoryStore) -> Game {
        Game::new(
            Config::default(),
            20,
            10,
            Box::new(store),
            GameRng::new(99),
            None,
        )
        .unwrap()
    }

    /// Main menu -> Classic -> first map (Empty Field).
    fn start_classic(game: &mut Game) {
        assert!(game.handle_input(InputEvent::Shortcut(1)));
        assert_eq!(game.mode, Mode::MapSelect);
        assert!(game.handle_input(InputEvent::MenuConfirm));
        assert_eq!(game.mode, Mode::Playing);
    }

    fn play_until_not_running(game: &mut Game) {
        for _ in 0..50 {
            game.handle_input(InputEvent::None);
            if game.mode != Mode::Playing {
                return;
            }
        }
        panic!("Round never ended");
    }

    #[test]
    fn test_too_small_board_is_rejected() {
        let result = Game::new(
            Config::default(),
            10,
            5,
            Box::new(MemoryStore::default()),
            GameRng::new(1),
            None,
        );
        assert!(matches!(result, Err(GameError::BoardTooSmall { .. })));
    }

    #[test]
    fn test_leaderboard_loaded_at_start() {
        let store = MemoryStore::default();
        *store.scores.borrow_mut() = Some(vec![10, 50, 30]);

        let game = new_game(store);
        assert_eq!(game.leaderboard().scores(), &[50, 30, 10]);

        // A failing load falls back to zeros
        let game = new_game(MemoryStore::default());
        assert_eq!(game.leaderboard().scores(), &[0, 0, 0]);
    }

    #[test]
    fn test_classic_round_to_restart_prompt() {
        let store = MemoryStore::default();
        let mut game = new_game(store.clone());
        start_classic(&mut game);
        assert_eq!(game.round().unwrap().map().name(), "Empty Field");
        assert_eq!(game.input_context(), InputContext::Play);
        assert!(game.tick_delay().is_some());

        // Heading up with no input runs into the top wall
        play_until_not_running(&mut game);

        assert_eq!(game.mode, Mode::RestartPrompt);
        assert_eq!(game.input_context(), InputContext::Menu);
        assert_eq!(game.tick_delay(), None);
        let (reason, score) = game.last_result().unwrap();
        assert_eq!(reason, ExitReason::Collision);
        assert_eq!(*store.saves.borrow(), 1);
        assert_eq!(store.scores.borrow().as_deref(), Some(game.leaderboard().scores()));
        assert_eq!(game.leaderboard().scores()[0], score as i32);

        // Restart goes back to the main menu
        assert!(game.handle_input(InputEvent::MenuConfirm));
        assert_eq!(game.mode, Mode::MainMenu);
        assert!(game.round().is_none());
    }

    #[test]
    fn test_restart_prompt_quit_exits() {
        let mut game = new_game(MemoryStore::default());
        start_classic(&mut game);
        play_until_not_running(&mut game);

        game.handle_input(InputEvent::MenuDown);
        assert!(!game.handle_input(InputEvent::MenuConfirm));
    }

    #[test]
    fn test_pause_restart_restarts_in_place() {
        let store = MemoryStore::default();
        let mut game = new_game(store.clone());
        start_classic(&mut game);
        game.handle_input(InputEvent::None);

        game.handle_input(InputEvent::PauseToggle);
        assert_eq!(game.input_context(), InputContext::Menu);
        assert_eq!(game.tick_delay(), None);
        game.handle_input(InputEvent::MenuDown);
        game.handle_input(InputEvent::MenuConfirm);

        assert_eq!(game.mode, Mode::Playing);
        assert_eq!(game.last_result().unwrap().0, ExitReason::PlayerRestart);
        let round = game.round().unwrap();
        assert_eq!(round.status(), RoundStatus::Running);
        assert_eq!(round.map().name(), "Empty Field");
        // Fresh snake at the spawn point
        assert_eq!(round.snake().head(), game.board().center());
        assert_eq!(*store.saves.borrow(), 1);
    }

    #[test]
    fn test_quit_from_round_returns_to_menu() {
        let mut game = new_game(MemoryStore::default());
        start_classic(&mut game);

        game.handle_input(InputEvent::PauseToggle);
        game.handle_input(InputEvent::Quit);

        assert_eq!(game.mode, Mode::MainMenu);
        assert_eq!(game.last_result(), Some((ExitReason::Quit, 0)));
        assert!(game.round().is_none());
    }

    #[test]
    fn test_map_select_back_and_random() {
        let mut game = new_game(MemoryStore::default());
        game.handle_input(InputEvent::MenuConfirm);
        assert_eq!(game.mode, Mode::MapSelect);

        // Entries: three presets, Random, Back
        assert_eq!(game.map_menu().len(), 5);
        game.handle_input(InputEvent::MenuBack);
        assert_eq!(game.mode, Mode::MainMenu);

        game.handle_input(InputEvent::MenuConfirm);
        game.handle_input(InputEvent::MenuUp);
        assert_eq!(game.map_menu().selected(), Some(MapMenuItem::Back));
        game.handle_input(InputEvent::MenuConfirm);
        assert_eq!(game.mode, Mode::MainMenu);

        game.handle_input(InputEvent::MenuConfirm);
        game.handle_input(InputEvent::Shortcut(4));
        assert_eq!(game.mode, Mode::Playing);
        let name = game.round().unwrap().map().name().to_string();
        assert!(["Empty Field", "Boxed Arena", "Crossing Field"].contains(&name.as_str()));
    }

    #[test]
    fn test_endless_mode_is_a_stub() {
        let mut game = new_game(MemoryStore::default());

        game.handle_input(InputEvent::Shortcut(2));
        assert_eq!(game.mode, Mode::EndlessUnavailable);
        assert!(game.round().is_none());

        game.handle_input(InputEvent::MenuConfirm);
        assert_eq!(game.mode, Mode::MainMenu);
    }

    #[test]
    fn test_options_are_applied_and_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut game = Game::new(
            Config::default(),
            20,
            10,
            Box::new(MemoryStore::default()),
            GameRng::new(3),
            Some(path.clone()),
        )
        .unwrap();

        game.handle_input(InputEvent::Shortcut(3));
        assert_eq!(game.mode, Mode::Options);

        game.handle_input(InputEvent::Left);
        game.handle_input(InputEvent::MenuDown);
        game.handle_input(InputEvent::MenuDown);
        game.handle_input(InputEvent::Right);
        game.handle_input(InputEvent::MenuBack);

        assert_eq!(game.mode, Mode::MainMenu);
        assert_eq!(game.config.initial_length, 1);
        assert!(game.config.wrap);
        assert!(game.board().wraps());

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.initial_length, 1);
        assert!(saved.wrap);

        // New rounds use the edited length
        start_classic(&mut game);
        assert_eq!(game.round().unwrap().snake().len(), 1);
    }

    #[test]
    fn test_every_allowed_length_spawns_in_full() {
        let mut config = Config::default();
        config.initial_length = 20;
        let mut game = Game::new(
            config,
            20,
            10,
            Box::new(MemoryStore::default()),
            GameRng::new(11),
            None,
        )
        .unwrap();
        // Oversized lengths from the config file are cut down at start
        let max = Snake::max_spawn_length(game.board());
        assert_eq!(game.config.initial_length, max);

        game.handle_input(InputEvent::Shortcut(3));
        assert_eq!(game.options().entries()[0].max, max as i64);
        for _ in 0..max {
            game.handle_input(InputEvent::Left);
        }
        assert_eq!(game.config.initial_length, 1);
        game.handle_input(InputEvent::MenuBack);

        for length in 1..=max {
            start_classic(&mut game);
            assert_eq!(game.round().unwrap().snake().len(), length);
            assert_eq!(game.round().unwrap().snake().len(), game.config.initial_length);

            game.handle_input(InputEvent::PauseToggle);
            game.handle_input(InputEvent::Quit);
            assert_eq!(game.mode, Mode::MainMenu);

            game.handle_input(InputEvent::Shortcut(3));
            game.handle_input(InputEvent::Right);
            game.handle_input(InputEvent::MenuBack);
        }
        assert_eq!(game.config.initial_length, max);
    }

    #[test]
    fn test_main_menu_quit() {
        let mut game = new_game(MemoryStore::default());
        assert!(game.handle_input(InputEvent::MenuDown));
        assert!(!game.handle_input(InputEvent::Shortcut(4)));

        let mut game = new_game(MemoryStore::default());
        assert!(!game.handle_input(InputEvent::MenuBack));
    }
}
