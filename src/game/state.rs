use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A cell on the game grid, addressed by (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Top-left corner of this cell in field units
    pub fn to_units(&self, cell_size: u32) -> (i64, i64) {
        let size = i64::from(cell_size);
        (i64::from(self.x) * size, i64::from(self.y) * size)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Direction of the last move
    pub direction: Direction,
}

impl Snake {
    /// Create a snake with `length` segments trailing behind `head`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        Self::with_capacity(head, direction, length, length)
    }

    /// Like [`Snake::new`], reserving room for `capacity` segments up front
    pub fn with_capacity(
        head: Position,
        direction: Direction,
        length: usize,
        capacity: usize,
    ) -> Self {
        let mut body = Vec::with_capacity(capacity.max(length));
        body.push(head);

        let back = direction.opposite();
        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_in_direction(back));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Move one cell in `direction`; on growth the vacated tail cell is kept
    pub fn advance(&mut self, direction: Direction, grow: bool) {
        let new_head = self.head().moved_in_direction(direction);
        self.body.insert(0, new_head);
        self.direction = direction;

        if !grow {
            self.body.pop();
        }
    }

    /// Whether the head sits on a segment past the exemption zone
    pub fn head_hits_body(&self) -> bool {
        let head = self.head();
        self.body
            .iter()
            .skip(SELF_COLLISION_START)
            .any(|&segment| segment == head)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// First body index checked for self-collision; indices 1..=4 are exempt
pub const SELF_COLLISION_START: usize = 5;

/// Phase of the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundState {
    Active,
    Paused,
    Over,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// Head left the grid
    Wall,
    /// Head ran into the body
    SelfCollision,
    /// The snake occupies every cell
    BoardFilled,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub score: u32,
    /// Ticks that advanced the snake this round
    pub ticks: u64,
    pub round: RoundState,
    pub end_reason: Option<EndReason>,
}

impl GameState {
    /// Create a fresh, active game state
    pub fn new(snake: Snake, food: Position) -> Self {
        Self {
            snake,
            food,
            score: 0,
            ticks: 0,
            round: RoundState::Active,
            end_reason: None,
        }
    }
}

/// Read-only view of the simulation handed to renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub body: Vec<Position>,
    pub food: Position,
    pub score: u32,
    pub state: RoundState,
    /// Direction the next tick will move in
    pub direction: Direction,
    pub end_reason: Option<EndReason>,
    pub ticks: u64,
    pub grid_cells: usize,
    /// Cell size in field units
    pub cell_size: u32,
    /// Side of the square field in units
    pub field_size: u32,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn head(&self) -> Option<Position> {
        self.body.first().copied()
    }

    /// Head's top-left corner in field units
    pub fn head_units(&self) -> Option<(i64, i64)> {
        self.head().map(|head| head.to_units(self.cell_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_by(0, 1), Position::new(5, 6));
        assert_eq!(pos.moved_by(0, -1), Position::new(5, 4));
    }

    #[test]
    fn test_position_units() {
        assert_eq!(Position::new(3, 3).to_units(16), (48, 48));
        assert_eq!(Position::new(19, 0).to_units(16), (304, 0));
        assert_eq!(Position::new(-1, 2).to_units(16), (-16, 32));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.body[1], Position::new(4, 5));
        assert_eq!(snake.body[2], Position::new(3, 5));
    }

    #[test]
    fn test_snake_capacity() {
        let snake = Snake::with_capacity(Position::new(3, 3), Direction::Right, 3, 400);
        assert_eq!(snake.len(), 3);
        assert!(snake.body.capacity() >= 400);
    }

    #[test]
    fn test_snake_movement() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        snake.advance(Direction::Right, false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.body[2], Position::new(4, 5));

        snake.advance(Direction::Down, true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(6, 6));
        assert_eq!(snake.direction, Direction::Down);
        // grown tail is the cell the old tail just left
        assert_eq!(snake.body[3], Position::new(4, 5));
    }

    #[test]
    fn test_exempt_segments_do_not_collide() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 6);
        for index in 1..SELF_COLLISION_START {
            snake.body[0] = snake.body[index];
            assert!(!snake.head_hits_body(), "index {index} should be exempt");
        }

        snake.body[0] = snake.body[5];
        assert!(snake.head_hits_body());
    }

    #[test]
    fn test_snapshot_accessors() {
        let snapshot = Snapshot {
            body: vec![Position::new(1, 1), Position::new(0, 1)],
            food: Position::new(4, 4),
            score: 0,
            state: RoundState::Active,
            direction: Direction::Right,
            end_reason: None,
            ticks: 0,
            grid_cells: 10,
            cell_size: 16,
            field_size: 160,
        };
        assert_eq!(snapshot.len(), 2);
        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.head(), Some(Position::new(1, 1)));
        assert_eq!(snapshot.head_units(), Some((16, 16)));
    }
}
