use super::Direction;

/// One discrete input delivered to the game per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Up,
    Down,
    Left,
    Right,
    PauseToggle,
    SpeedToggle,
    MenuUp,
    MenuDown,
    MenuConfirm,
    MenuBack,
    Quit,
    /// Jump straight to the n-th (1-based) entry of the current menu.
    Shortcut(u8),
    None,
}

impl InputEvent {
    pub fn direction(self) -> Option<Direction> {
        match self {
            InputEvent::Up => Some(Direction::Up),
            InputEvent::Down => Some(Direction::Down),
            InputEvent::Left => Some(Direction::Left),
            InputEvent::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Which set of key bindings applies to the next key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    Play,
    Menu,
}
