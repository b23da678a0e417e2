use std::time::Duration;

use super::action::Direction;
use super::food::Food;

/// A cell on the game grid, in grid units (one unit = one cell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this position by a cell delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Step one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Squared Euclidean distance to another cell, in cell units.
    /// Proximity thresholds compare against this without ever leaving
    /// integer arithmetic.
    pub fn distance_squared(&self, other: Position) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        dx * dx + dy * dy
    }

    /// Whether this cell lies inside a grid of the given extent
    pub fn in_grid(&self, grid_width: usize, grid_height: usize) -> bool {
        self.x >= 0
            && self.x < grid_width as i32
            && self.y >= 0
            && self.y < grid_height as i32
    }
}

/// The player-controlled snake
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with the head at index 0
    pub body: Vec<Position>,
    /// Current direction of travel
    pub direction: Direction,
}

impl Snake {
    /// Create a snake of the given length with its body trailing behind the head
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx, -dy);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self { body, direction }
    }

    /// The head cell
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Body segments excluding the head
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Whether a candidate head cell would collide with the body.
    /// The current head is excluded; it becomes an ordinary segment once
    /// the new head is pushed.
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Whether any segment (head included) occupies the given cell
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Advance the head to a new cell; the old head becomes a body segment
    pub fn push_head(&mut self, pos: Position) {
        self.body.insert(0, pos);
    }

    /// Drop the tail cell, keeping the length constant across a tick
    pub fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// The head left the grid
    Boundary,
    /// The head ran into the snake's own body
    SelfCollision,
}

/// One running game session: the snake, the active food set, the score and
/// the tick interval derived from it. Rebuilt from scratch when a run ends.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Active food items; ordinarily exactly one
    pub foods: Vec<Food>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    /// Ticks survived in this run
    pub ticks: u32,
    /// Current delay between simulation steps; shrinks as the score climbs
    pub tick_interval: Duration,
}

impl GameState {
    pub fn new(
        snake: Snake,
        foods: Vec<Food>,
        grid_width: usize,
        grid_height: usize,
        tick_interval: Duration,
    ) -> Self {
        Self {
            snake,
            foods,
            grid_width,
            grid_height,
            score: 0,
            ticks: 0,
            tick_interval,
        }
    }

    /// Whether a cell is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.in_grid(self.grid_width, self.grid_height)
    }
}
