use std::collections::VecDeque;

use super::types::{Direction, Point};

/// One snake, head first. The body may hold a duplicated tail tile for one
/// tick after fruit growth, so segments are kept as a plain deque and scanned
/// linearly (bodies stay short on a 16x16 grid).
#[derive(Clone, Debug)]
pub struct Snake {
    pub body: VecDeque<Point>,
    pub direction: Direction,
    pub pending_direction: Option<Direction>,
}

impl Snake {
    pub fn new(segments: impl IntoIterator<Item = Point>, direction: Direction) -> Self {
        Self {
            body: segments.into_iter().collect(),
            direction,
            pending_direction: None,
        }
    }

    /// Player start: three segments heading right, as in every mode.
    pub fn player_spawn() -> Self {
        Self::new(
            [Point::new(10, 10), Point::new(9, 10), Point::new(8, 10)],
            Direction::Right,
        )
    }

    /// Opponent start and respawn point: near the far corner, heading left.
    pub fn opponent_spawn(tile_count: i32) -> Self {
        let t = tile_count;
        Self::new(
            [
                Point::new(t - 10, t - 10),
                Point::new(t - 9, t - 10),
                Point::new(t - 8, t - 10),
            ],
            Direction::Left,
        )
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, pos: Point) -> bool {
        self.body.contains(&pos)
    }

    /// Latch a new intent. Direct reversals are rejected here, at input time,
    /// so the tick never has to re-validate.
    pub fn queue_direction(&mut self, direction: Direction) {
        if !direction.is_opposite(&self.direction) {
            self.pending_direction = Some(direction);
        }
    }

    /// Apply the latched intent, if any, and return the head's next position.
    pub fn project_next_head(&mut self) -> Point {
        if let Some(next) = self.pending_direction.take() {
            self.direction = next;
        }
        self.head().step(self.direction)
    }

    /// Commit a move: push the new head and drop the tail unless growing.
    pub fn advance(&mut self, next_head: Point, grow: bool) {
        self.body.push_front(next_head);
        if !grow {
            self.body.pop_back();
        }
    }

    /// Fruit growth after the tail was already dropped this tick: re-append a
    /// copy of the current tail for a net length of +1.
    pub fn regrow_tail(&mut self) {
        if let Some(tail) = self.body.back().copied() {
            self.body.push_back(tail);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_spawn_shape() {
        let snake = Snake::player_spawn();
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Point::new(10, 10));
        assert_eq!(snake.direction, Direction::Right);
    }

    #[test]
    fn test_opponent_spawn_shape() {
        let snake = Snake::opponent_spawn(16);
        assert_eq!(
            snake.body,
            [Point::new(6, 6), Point::new(7, 6), Point::new(8, 6)]
        );
        assert_eq!(snake.direction, Direction::Left);
    }

    #[test]
    fn test_reversal_rejected_at_input_time() {
        let mut snake = Snake::player_spawn();
        snake.queue_direction(Direction::Left);
        assert_eq!(snake.pending_direction, None);

        snake.queue_direction(Direction::Up);
        assert_eq!(snake.pending_direction, Some(Direction::Up));
    }

    #[test]
    fn test_advance_without_growth_keeps_length() {
        let mut snake = Snake::player_spawn();
        let next = snake.project_next_head();
        assert_eq!(next, Point::new(11, 10));

        snake.advance(next, false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Point::new(11, 10));
    }

    #[test]
    fn test_regrow_duplicates_tail() {
        let mut snake = Snake::player_spawn();
        let tail = *snake.body.back().unwrap();
        snake.regrow_tail();
        assert_eq!(snake.len(), 4);
        assert_eq!(*snake.body.back().unwrap(), tail);
    }
}
