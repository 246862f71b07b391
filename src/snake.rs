use std::collections::VecDeque;

use crate::Coords;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit step on the grid. `y` grows downwards.
    pub fn delta(self) -> (i16, i16) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

/// Why a move ended the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

/// Head-first list of occupied cells plus the current heading.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Coords>,
    direction: Direction,
}

impl Snake {
    pub fn new(pos: Coords, direction: Direction) -> Self {
        let mut body = VecDeque::new();
        body.push_back(pos);
        Snake { body, direction }
    }

    /// Builds a snake from head-first cells. Test scaffolding only.
    #[cfg(test)]
    pub(crate) fn from_cells(cells: &[Coords], direction: Direction) -> Self {
        Snake { body: cells.iter().copied().collect(), direction }
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, pos: &Coords) -> bool {
        self.body.contains(pos)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Changes heading unless `new_direction` would reverse the snake onto
    /// its own neck. Returns whether the turn was taken.
    pub fn turn(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction.opposite() {
            return false;
        }

        self.direction = new_direction;
        true
    }

    /// Where the head would land on the next move, or what it would hit.
    /// The whole body counts, tail included.
    pub fn next_head(&self, grid_size: i16) -> Result<Coords, Collision> {
        let (x, y) = self.head();
        let (dx, dy) = self.direction.delta();
        let new_head = (x + dx, y + dy);

        if new_head.0 < 0 || new_head.1 < 0 || new_head.0 >= grid_size || new_head.1 >= grid_size {
            return Err(Collision::Wall);
        }

        if self.body.contains(&new_head) {
            return Err(Collision::Body);
        }

        Ok(new_head)
    }

    /// Pushes `new_head` and drops the tail unless growing. Returns the freed
    /// tail cell.
    pub fn advance(&mut self, new_head: Coords, grow: bool) -> Option<Coords> {
        self.body.push_front(new_head);

        if grow {
            None
        } else {
            self.body.pop_back()
        }
    }
}
