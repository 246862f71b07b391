//! Keyboard and on-screen controls feed a single pending direction.

use crossterm::event::KeyCode;

use crate::snake::Direction;

/// Holds the most recent requested heading until the next tick picks it up.
///
/// Setting never validates: whether the turn is legal depends on the heading
/// at the moment the tick applies it, not when the key was pressed.
#[derive(Debug, Default, Clone)]
pub struct InputMapper {
    pending: Option<Direction>,
}

impl InputMapper {
    pub fn new() -> Self {
        InputMapper::default()
    }

    /// Overwrites whatever was pending. Last input before a tick wins.
    pub fn set_direction(&mut self, direction: Direction) {
        self.pending = Some(direction);
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    pub fn take_pending(&mut self) -> Option<Direction> {
        self.pending.take()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

/// Arrow keys steer; anything else is not a direction.
pub fn direction_for_key(code: &KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}
