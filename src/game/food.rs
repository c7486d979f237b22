use std::time::Duration;

use super::{Board, GameError, GameMap, GameRng, Position, Snake};

/// Random draws before falling back to scanning every free cell.
const MAX_PLACEMENT_ATTEMPTS: usize = 1024;
/// Points per difficulty level.
const POINTS_PER_LEVEL: u32 = 5;
/// Milliseconds shaved off the tick delay per difficulty level.
const DELAY_STEP_MS: u64 = 10;

fn is_free(pos: Position, snake: &Snake, map: &GameMap) -> bool {
    !snake.contains(pos) && !map.is_obstacle(pos)
}

/// Pick a uniformly random interior cell that is neither snake nor obstacle.
pub fn place_food(
    board: &Board,
    snake: &Snake,
    map: &GameMap,
    rng: &mut GameRng,
) -> Result<Position, GameError> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let candidate = Position::new(
            rng.gen_range(1..board.width() - 1),
            rng.gen_range(1..board.height() - 1),
        );
        if is_free(candidate, snake, map) {
            return Ok(candidate);
        }
    }

    // Crowded board: choose among the cells that are actually free
    let free: Vec<Position> = board
        .interior_cells()
        .filter(|pos| is_free(*pos, snake, map))
        .collect();
    rng.choose(&free).copied().ok_or(GameError::BoardFull)
}

pub fn difficulty_for(score: u32) -> u32 {
    score / POINTS_PER_LEVEL
}

/// `base - 10 * difficulty`, never below `min_delay_ms` (or the base
/// itself when the base is already lower).
pub fn delay_for(base_delay_ms: u64, min_delay_ms: u64, difficulty: u32) -> u64 {
    let floor = min_delay_ms.min(base_delay_ms).max(1);
    base_delay_ms
        .saturating_sub(DELAY_STEP_MS * difficulty as u64)
        .max(floor)
}

/// Score, difficulty and the tick delay derived from them.
#[derive(Debug, Clone)]
pub struct Scoring {
    score: u32,
    difficulty: u32,
    base_delay_ms: u64,
    min_delay_ms: u64,
    delay_ms: u64,
}

impl Scoring {
    pub fn new(base_delay_ms: u64, min_delay_ms: u64) -> Self {
        Self {
            score: 0,
            difficulty: 0,
            base_delay_ms,
            min_delay_ms,
            delay_ms: delay_for(base_delay_ms, min_delay_ms, 0),
        }
    }

    /// Add a point. Returns true when the difficulty level changed, in
    /// which case the delay has been recomputed.
    pub fn on_food_eaten(&mut self) -> bool {
        self.score += 1;
        let difficulty = difficulty_for(self.score);
        if difficulty == self.difficulty {
            return false;
        }
        self.difficulty = difficulty;
        self.delay_ms = delay_for(self.base_delay_ms, self.min_delay_ms, difficulty);
        true
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
