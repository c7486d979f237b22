use std::time::Duration;

use log::{debug, info};

use super::food::{place_food, Scoring};
use super::menu::{Menu, MenuAction};
use super::{Board, GameError, GameMap, GameRng, InputEvent, Position, Snake};

/// Why a round stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The snake ran into itself, a wall or an obstacle.
    Collision,
    /// Restart chosen from the pause menu.
    PlayerRestart,
    /// Quit chosen from the pause menu or the quit key.
    Quit,
    /// No free cell left for food: the snake filled the board.
    BoardCleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Running,
    Paused,
    Ended(ExitReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseChoice {
    Continue,
    Restart,
    Quit,
}

/// The per-round tunables taken from the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSettings {
    pub initial_length: usize,
    pub base_delay_ms: u64,
    pub min_delay_ms: u64,
}

/// One round of play: a snake, one food item and the score on a fixed map.
pub struct Round {
    board: Board,
    map: GameMap,
    snake: Snake,
    food: Position,
    scoring: Scoring,
    status: RoundStatus,
    pause_menu: Menu<PauseChoice>,
    fast: bool,
}

fn pause_menu() -> Menu<PauseChoice> {
    Menu::new(
        "Game Paused",
        vec![
            ("Continue".to_string(), PauseChoice::Continue),
            ("Restart".to_string(), PauseChoice::Restart),
            ("Quit".to_string(), PauseChoice::Quit),
        ],
    )
}

impl Round {
    pub fn new(
        board: Board,
        map: GameMap,
        settings: RoundSettings,
        rng: &mut GameRng,
    ) -> Result<Self, GameError> {
        let snake = Snake::spawn(&board, settings.initial_length);
        if snake.len() < settings.initial_length {
            debug!(
                "Initial length {} clamped to {} to fit the board",
                settings.initial_length,
                snake.len()
            );
        }
        let food = place_food(&board, &snake, &map, rng)?;

        info!("Round started on '{}' ({}x{})", map.name(), board.width(), board.height());

        Ok(Self {
            board,
            map,
            snake,
            food,
            scoring: Scoring::new(settings.base_delay_ms, settings.min_delay_ms),
            status: RoundStatus::Running,
            pause_menu: pause_menu(),
            fast: false,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.scoring.score()
    }

    pub fn difficulty(&self) -> u32 {
        self.scoring.difficulty()
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn is_paused(&self) -> bool {
        self.status == RoundStatus::Paused
    }

    pub fn is_fast(&self) -> bool {
        self.fast
    }

    pub fn pause_menu(&self) -> &Menu<PauseChoice> {
        &self.pause_menu
    }

    /// The reason and final score once the round has ended.
    pub fn outcome(&self) -> Option<(ExitReason, u32)> {
        match self.status {
            RoundStatus::Ended(reason) => Some((reason, self.score())),
            _ => None,
        }
    }

    /// How long to wait after this tick: the current delay, halved in fast
    /// mode. `None` while paused or ended, when input drives the pace.
    pub fn tick_delay(&self) -> Option<Duration> {
        if self.status != RoundStatus::Running {
            return None;
        }
        let delay = self.scoring.delay();
        if self.fast {
            Some((delay / 2).max(Duration::from_millis(1)))
        } else {
            Some(delay)
        }
    }

    /// Advance the round by one tick with at most one input.
    pub fn tick(&mut self, input: InputEvent, rng: &mut GameRng) -> RoundStatus {
        match self.status {
            RoundStatus::Paused => self.tick_paused(input),
            RoundStatus::Running => self.tick_running(input, rng),
            RoundStatus::Ended(_) => {}
        }
        self.status
    }

    fn end(&mut self, reason: ExitReason) {
        info!("Round ended: {:?} with score {}", reason, self.score());
        self.status = RoundStatus::Ended(reason);
    }

    fn tick_paused(&mut self, input: InputEvent) {
        let action = match input {
            InputEvent::PauseToggle => MenuAction::Back,
            InputEvent::Quit => MenuAction::Confirm(PauseChoice::Quit),
            other => self.pause_menu.handle(other),
        };

        match action {
            MenuAction::Confirm(PauseChoice::Continue) | MenuAction::Back => {
                self.status = RoundStatus::Running;
            }
            MenuAction::Confirm(PauseChoice::Restart) => self.end(ExitReason::PlayerRestart),
            MenuAction::Confirm(PauseChoice::Quit) => self.end(ExitReason::Quit),
            MenuAction::None => {}
        }
    }

    fn tick_running(&mut self, input: InputEvent, rng: &mut GameRng) {
        match input {
            InputEvent::PauseToggle => {
                self.pause_menu = pause_menu();
                self.status = RoundStatus::Paused;
                return;
            }
            InputEvent::Quit => {
                self.end(ExitReason::Quit);
                return;
            }
            InputEvent::SpeedToggle => self.fast = !self.fast,
            other => {
                if let Some(direction) = other.direction() {
                    self.snake.change_direction(direction);
                }
            }
        }

        self.snake.advance_head(&self.board);

        if self.snake.is_self_collision()
            || self.snake.is_wall_collision(&self.board)
            || self.snake.is_obstacle_collision(&self.board, self.map.obstacles())
        {
            self.end(ExitReason::Collision);
            return;
        }

        let ate_food = self.snake.touches_food(self.food);
        self.snake.grow_or_shrink(ate_food);
        if !ate_food {
            return;
        }

        if self.scoring.on_food_eaten() {
            debug!(
                "Difficulty {} reached, delay now {:?}",
                self.scoring.difficulty(),
                self.scoring.delay()
            );
        }

        match place_food(&self.board, &self.snake, &self.map, rng) {
            Ok(food) => self.food = food,
            Err(err) => {
                debug!("{}", err);
                self.end(ExitReason::BoardCleared);
            }
        }
    }
}
