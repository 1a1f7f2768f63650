use crossterm::event::KeyCode;

use crate::grid::Direction;

/// Holds the authoritative direction and the one buffered for the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputBuffer {
    current: Direction,
    next: Direction,
}

impl InputBuffer {
    pub fn new(direction: Direction) -> Self {
        InputBuffer {
            current: direction,
            next: direction,
        }
    }

    pub fn current(&self) -> Direction {
        self.current
    }

    pub fn pending(&self) -> Direction {
        self.next
    }

    /// Buffer `requested` for the next tick. A reversal of the current
    /// direction is dropped. Returns whether the request was accepted.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if requested == self.current.opposite() {
            return false;
        }
        self.next = requested;
        true
    }

    /// Promote the buffered direction. Called once at the start of a tick.
    pub fn commit(&mut self) -> Direction {
        self.current = self.next;
        self.current
    }
}

/// Player intents coming from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Steer(Direction),
    Start,
    Quit,
}

pub fn command_for_key(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Up => Command::Steer(Direction::Up),
        KeyCode::Down => Command::Steer(Direction::Down),
        KeyCode::Left => Command::Steer(Direction::Left),
        KeyCode::Right => Command::Steer(Direction::Right),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Command::Steer(Direction::Up),
            's' => Command::Steer(Direction::Down),
            'a' => Command::Steer(Direction::Left),
            'd' => Command::Steer(Direction::Right),
            ' ' => Command::Start,
            'q' => Command::Quit,
            _ => return None,
        },
        KeyCode::Enter => Command::Start,
        KeyCode::Esc => Command::Quit,
        _ => return None,
    };
    Some(command)
}
