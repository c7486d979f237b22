use serde::{Deserialize, Serialize};

use super::GameError;

/// A cell on the game board. The wall ring sits at x = 0, x = width - 1,
/// y = 0 and y = height - 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Static board geometry: outer dimensions and edge behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
    wrap: bool,
}

impl Board {
    pub fn new(width: i32, height: i32, wrap: bool) -> Self {
        Self { width, height, wrap }
    }

    /// Build a board, rejecting sizes below the playable minimum.
    pub fn with_minimum(
        width: i32,
        height: i32,
        wrap: bool,
        min_width: i32,
        min_height: i32,
    ) -> Result<Self, GameError> {
        if width < min_width || height < min_height {
            return Err(GameError::BoardTooSmall {
                width,
                height,
                min_width,
                min_height,
            });
        }
        Ok(Self::new(width, height, wrap))
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn wraps(&self) -> bool {
        self.wrap
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    /// Cells the snake may occupy: everything inside the wall ring.
    pub fn is_interior(&self, pos: Position) -> bool {
        pos.x >= 1 && pos.x <= self.width - 2 && pos.y >= 1 && pos.y <= self.height - 2
    }

    pub fn interior_cells(&self) -> impl Iterator<Item = Position> + '_ {
        (1..self.height - 1).flat_map(move |y| (1..self.width - 1).map(move |x| Position::new(x, y)))
    }

    pub fn interior_area(&self) -> usize {
        ((self.width - 2).max(0) * (self.height - 2).max(0)) as usize
    }

    /// Fold a position that crossed the wall ring back onto the opposite
    /// interior edge.
    pub fn wrap_position(&self, pos: Position) -> Position {
        let max_x = self.width - 2;
        let max_y = self.height - 2;

        let x = if pos.x < 1 {
            max_x
        } else if pos.x > max_x {
            1
        } else {
            pos.x
        };
        let y = if pos.y < 1 {
            max_y
        } else if pos.y > max_y {
            1
        } else {
            pos.y
        };

        Position::new(x, y)
    }
}
