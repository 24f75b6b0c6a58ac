use crate::rng::GameRng;

use super::entities::{Food, Fruit, MAX_ACTIVE_FRUITS, Rarity};
use super::grid::Grid;
use super::state::GameState;
use super::types::Point;

/// Random samples taken per free tile before falling back to a full scan.
const FOOD_SAMPLE_FACTOR: usize = 4;
const FRUIT_MAX_ATTEMPTS: usize = 200;
pub const OBSTACLE_MAX_ATTEMPTS: usize = 50;
pub const OBSTACLE_MIN_HEAD_DISTANCE: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnError {
    /// No free tile left for the mandatory food. Fatal for the session.
    GridFull,
}

fn random_tile(grid: &Grid, rng: &mut GameRng) -> Point {
    Point::new(
        rng.random_range(0..grid.tile_count),
        rng.random_range(0..grid.tile_count),
    )
}

fn food_tile_free(state: &GameState, pos: Point) -> bool {
    if state.snake.contains(pos) {
        return false;
    }
    if let Some(opponent) = &state.opponent
        && opponent.contains(pos)
    {
        return false;
    }
    if state.obstacles.contains(&pos) {
        return false;
    }
    !state.fruits.iter().any(|fruit| fruit.position == pos)
}

/// Pick a spot for the shared food. Bounded random sampling first; if that
/// fails, a full scan decides between some remaining free tile and a genuine
/// grid-full condition, which the caller must treat as terminal.
pub fn place_food(state: &GameState, rng: &mut GameRng) -> Result<Food, SpawnError> {
    let attempts = state.grid.tile_total() * FOOD_SAMPLE_FACTOR;
    for _ in 0..attempts {
        let pos = random_tile(&state.grid, rng);
        if food_tile_free(state, pos) {
            return Ok(Food::at(pos, rng));
        }
    }

    let count = state.grid.tile_count;
    let free = (0..count)
        .flat_map(|y| (0..count).map(move |x| Point::new(x, y)))
        .filter(|pos| food_tile_free(state, *pos))
        .collect::<Vec<_>>();

    if free.is_empty() {
        return Err(SpawnError::GridFull);
    }
    let pos = free[rng.random_range(0..free.len())];
    Ok(Food::at(pos, rng))
}

/// Try to place a bonus fruit. None when the cap is reached or no free tile
/// turns up within the attempt budget; both are recoverable skips.
pub fn place_fruit(state: &GameState, rng: &mut GameRng) -> Option<Fruit> {
    if state.fruits.len() >= MAX_ACTIVE_FRUITS {
        return None;
    }

    let rarity = Rarity::draw(rng);
    for _ in 0..FRUIT_MAX_ATTEMPTS {
        let pos = random_tile(&state.grid, rng);
        if pos != state.food.position && food_tile_free(state, pos) {
            return Some(Fruit::at(pos, rarity));
        }
    }
    None
}

/// Try to place a survival-mode obstacle: at least five Manhattan tiles from
/// the player's head and clear of the snake, the food, and other obstacles.
/// None after the attempt budget; the caller reschedules.
pub fn place_obstacle(state: &GameState, rng: &mut GameRng) -> Option<Point> {
    let head = state.snake.head();

    for _ in 0..OBSTACLE_MAX_ATTEMPTS {
        let pos = random_tile(&state.grid, rng);

        if Grid::manhattan(pos, head) < OBSTACLE_MIN_HEAD_DISTANCE {
            continue;
        }
        if state.snake.contains(pos)
            || pos == state.food.position
            || state.obstacles.contains(&pos)
            || state.fruits.iter().any(|fruit| fruit.position == pos)
        {
            continue;
        }
        return Some(pos);
    }
    None
}
