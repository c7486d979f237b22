use std::collections::{HashSet, VecDeque};

use super::{Board, Position};

// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Transition table for a heading change requested while moving in
    /// `self`. Only a 180-degree reversal is refused.
    pub fn can_turn_to(self, requested: Direction) -> bool {
        use Direction::*;
        match (self, requested) {
            (Up, Down) | (Down, Up) | (Left, Right) | (Right, Left) => false,
            (Up, Up) | (Up, Left) | (Up, Right) => true,
            (Down, Down) | (Down, Left) | (Down, Right) => true,
            (Left, Left) | (Left, Up) | (Left, Down) => true,
            (Right, Right) | (Right, Up) | (Right, Down) => true,
        }
    }
}

/// The snake's body (head at the front) and heading.
///
/// Moving is split into steps so the round can query collisions between
/// inserting the new head and dropping the tail:
/// `advance_head` -> collision queries -> `grow_or_shrink`.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
}

impl Snake {
    /// Lay out `length` segments behind `head`, opposite to `direction`.
    pub fn new(head: Position, length: usize, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.offset(-dx * i, -dy * i))
            .collect();

        Self { body, direction }
    }

    /// Longest snake that fits between the centre and the bottom wall.
    pub fn max_spawn_length(board: &Board) -> usize {
        (board.height() - 2 - board.center().y).max(1) as usize
    }

    /// Spawn at the board centre heading up, body trailing downwards.
    /// The length is clamped to `max_spawn_length`.
    pub fn spawn(board: &Board, length: usize) -> Self {
        let room = Self::max_spawn_length(board);
        Self::new(board.center(), length.clamp(1, room), Direction::Up)
    }

    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Returns whether the heading was changed. Reversals are ignored.
    pub fn change_direction(&mut self, requested: Direction) -> bool {
        if self.direction.can_turn_to(requested) {
            self.direction = requested;
            true
        } else {
            false
        }
    }

    /// Step the head one cell along the heading and insert it at the front.
    pub fn advance_head(&mut self, board: &Board) -> Position {
        let (dx, dy) = self.direction.delta();
        let mut new_head = self.head().offset(dx, dy);
        if board.wraps() {
            new_head = board.wrap_position(new_head);
        }
        self.body.push_front(new_head);
        new_head
    }

    /// The new head overlaps another segment. The tail still counts: it is
    /// only dropped after the collision checks.
    pub fn is_self_collision(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    pub fn is_wall_collision(&self, board: &Board) -> bool {
        !board.wraps() && !board.is_interior(self.head())
    }

    /// An obstacle blocks the snake when the step from the previous head
    /// in the direction of travel lands on it, wrapping included.
    pub fn is_obstacle_collision(&self, board: &Board, obstacles: &HashSet<Position>) -> bool {
        let Some(previous_head) = self.body.get(1) else {
            return false;
        };
        let (dx, dy) = self.direction.delta();
        let mut step = previous_head.offset(dx, dy);
        if board.wraps() {
            step = board.wrap_position(step);
        }
        obstacles.contains(&step)
    }

    pub fn touches_food(&self, food: Position) -> bool {
        self.head() == food
    }

    pub fn grow_or_shrink(&mut self, ate_food: bool) {
        if !ate_food {
            self.body.pop_back();
        }
    }
}
