use thiserror::Error;

use super::Position;

/// Domain errors raised by the game engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Every interior cell is covered by the snake or an obstacle.
    #[error("no free cell left on the board for food")]
    BoardFull,
    /// A map declares obstacles the board cannot hold.
    #[error("map '{name}' is invalid: {reason}")]
    InvalidMap { name: String, reason: String },
    /// Obstacle outside the playable interior of the board.
    #[error("map '{name}' places an obstacle at ({}, {}) outside the board", .position.x, .position.y)]
    ObstacleOutOfBounds { name: String, position: Position },
    /// The terminal cannot fit the minimum playable board.
    #[error("board {width}x{height} is smaller than the minimum {min_width}x{min_height}")]
    BoardTooSmall {
        width: i32,
        height: i32,
        min_width: i32,
        min_height: i32,
    },
}
