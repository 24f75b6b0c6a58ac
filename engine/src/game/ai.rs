use crate::rng::GameRng;

use super::collision::would_collide;
use super::grid::Grid;
use super::state::GameState;
use super::types::{Actor, Difficulty, Direction, Point};

/// What the opponent is currently chasing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Food,
    Fruit(usize),
}

/// The opponent controller. Stateless apart from the difficulty knob, which
/// may change at any time; every decision is recomputed from the game state.
#[derive(Clone, Copy, Debug)]
pub struct OpponentAi {
    pub difficulty: Difficulty,
}

impl OpponentAi {
    pub fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Weigh every active fruit against the shared food. A fruit wins only if
    /// it is meaningfully closer or meaningfully more valuable than the food;
    /// otherwise the food stays the target. Deterministic for fixed inputs.
    pub fn determine_target(&self, state: &GameState) -> Target {
        let Some(opponent) = &state.opponent else {
            return Target::Food;
        };
        if state.fruits.is_empty() {
            return Target::Food;
        }

        let head = opponent.head();
        let weights = self.difficulty.weights();

        let mut best: Option<(usize, f64, u32)> = None;
        for (index, fruit) in state.fruits.iter().enumerate() {
            let distance = Grid::manhattan(head, fruit.position) as f64;
            let score = (fruit.points as f64 * weights.value_weight)
                / (distance * weights.distance_weight);
            if best.is_none_or(|(_, best_score, _)| score > best_score) {
                best = Some((index, score, distance as u32));
            }
        }

        let food_distance = Grid::manhattan(head, state.food.position);
        if let Some((index, _, fruit_distance)) = best {
            let fruit = &state.fruits[index];
            if (fruit_distance as f64) < food_distance as f64 * 1.5
                || fruit.points as f64 > state.food.points as f64 * 1.5
            {
                return Target::Fruit(index);
            }
        }
        Target::Food
    }

    /// Full per-tick decision: greedy direction toward the target, a
    /// difficulty-scaled random override, then collision avoidance. May still
    /// return a lethal direction when every alternative is also lethal.
    pub fn choose_direction(&self, state: &GameState, rng: &mut GameRng) -> Option<Direction> {
        let opponent = state.opponent.as_ref()?;
        let head = opponent.head();
        let current = opponent.direction;

        let target_pos = match self.determine_target(state) {
            Target::Food => state.food.position,
            Target::Fruit(index) => state.fruits[index].position,
        };

        let mut direction = direction_toward(current, head, target_pos);

        let weights = self.difficulty.weights();
        if weights.random_move_chance > 0.0 && rng.chance(weights.random_move_chance) {
            direction = random_non_reversing(current, rng);
        }

        Some(avoid_collisions(state, current, head, direction))
    }
}

/// Greedy step: prefer the axis with the larger offset, fall back to the
/// other axis rather than reverse, and keep the current heading when every
/// axis move would be a reversal.
fn direction_toward(current: Direction, head: Point, target: Point) -> Direction {
    let dx = target.x - head.x;
    let dy = target.y - head.y;

    if dx.abs() > dy.abs() {
        if dx > 0 && current != Direction::Left {
            Direction::Right
        } else if dx < 0 && current != Direction::Right {
            Direction::Left
        } else if dy > 0 && current != Direction::Up {
            Direction::Down
        } else if dy < 0 && current != Direction::Down {
            Direction::Up
        } else {
            current
        }
    } else if dy > 0 && current != Direction::Up {
        Direction::Down
    } else if dy < 0 && current != Direction::Down {
        Direction::Up
    } else if dx > 0 && current != Direction::Left {
        Direction::Right
    } else if dx < 0 && current != Direction::Right {
        Direction::Left
    } else {
        current
    }
}

/// Uniform draw from the three directions that do not reverse the heading.
fn random_non_reversing(current: Direction, rng: &mut GameRng) -> Direction {
    let options: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|d| !d.is_opposite(&current))
        .collect();
    options[rng.random_range(0..options.len())]
}

/// If the chosen step is lethal, try the remaining non-reversing directions
/// in a fixed order and take the first safe one. When nothing is safe the
/// unsafe direction stands: the opponent is allowed to die.
fn avoid_collisions(
    state: &GameState,
    current: Direction,
    head: Point,
    chosen: Direction,
) -> Direction {
    if !would_collide(state, Actor::Opponent, head.step(chosen)) {
        return chosen;
    }

    for candidate in Direction::ALL {
        if candidate == chosen || candidate.is_opposite(&current) {
            continue;
        }
        if !would_collide(state, Actor::Opponent, head.step(candidate)) {
            return candidate;
        }
    }
    chosen
}

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;

    use super::super::entities::{Fruit, Rarity};
    use super::super::snake::Snake;
    use super::super::types::Mode;
    use super::*;

    fn versus_ai_state(seed: u64) -> (GameState, GameRng) {
        let mut rng = GameRng::new(seed);
        let state = GameState::new(
            &EngineConfig::default(),
            Mode::versus_ai(Difficulty::Expert),
            &mut rng,
        );
        (state, rng)
    }

    fn place_opponent(state: &mut GameState, head: Point, direction: Direction) {
        let (dx, dy) = direction.offset();
        let second = Point::new(head.x - dx, head.y - dy);
        let third = Point::new(second.x - dx, second.y - dy);
        state.opponent = Some(Snake::new([head, second, third], direction));
    }

    #[test]
    fn test_no_fruits_targets_food() {
        let (mut state, _) = versus_ai_state(1);
        state.fruits.clear();
        let ai = OpponentAi::new(Difficulty::Medium);
        assert_eq!(ai.determine_target(&state), Target::Food);
    }

    #[test]
    fn test_valuable_close_fruit_wins_over_food() {
        let (mut state, _) = versus_ai_state(2);
        place_opponent(&mut state, Point::new(8, 8), Direction::Left);
        state.food.position = Point::new(0, 0);
        state.fruits = vec![Fruit::at(Point::new(7, 8), Rarity::Legendary)];

        let ai = OpponentAi::new(Difficulty::Medium);
        assert_eq!(ai.determine_target(&state), Target::Fruit(0));
    }

    #[test]
    fn test_distant_cheap_fruit_loses_to_food() {
        let (mut state, _) = versus_ai_state(3);
        place_opponent(&mut state, Point::new(8, 8), Direction::Left);
        state.food.position = Point::new(8, 7);
        state.food.points = 10;
        state.fruits = vec![Fruit::at(Point::new(0, 0), Rarity::Common)];

        let ai = OpponentAi::new(Difficulty::Medium);
        assert_eq!(ai.determine_target(&state), Target::Food);
    }

    #[test]
    fn test_targeting_is_deterministic() {
        let (mut state, _) = versus_ai_state(4);
        place_opponent(&mut state, Point::new(8, 8), Direction::Left);
        state.fruits = vec![
            Fruit::at(Point::new(2, 2), Rarity::Rare),
            Fruit::at(Point::new(12, 8), Rarity::Uncommon),
        ];

        let ai = OpponentAi::new(Difficulty::Hard);
        let first = ai.determine_target(&state);
        for _ in 0..10 {
            assert_eq!(ai.determine_target(&state), first);
        }
    }

    #[test]
    fn test_dominant_axis_is_preferred() {
        let dir = direction_toward(Direction::Up, Point::new(5, 5), Point::new(9, 6));
        assert_eq!(dir, Direction::Right);

        let dir = direction_toward(Direction::Right, Point::new(5, 5), Point::new(6, 9));
        assert_eq!(dir, Direction::Down);
    }

    #[test]
    fn test_never_reverses_toward_target() {
        // Target directly behind the head: the fallback axis must win.
        let dir = direction_toward(Direction::Right, Point::new(5, 5), Point::new(1, 5));
        assert_ne!(dir, Direction::Left);
    }

    #[test]
    fn test_expert_direction_is_deterministic() {
        let (mut state, mut rng) = versus_ai_state(5);
        place_opponent(&mut state, Point::new(8, 8), Direction::Left);
        state.food.position = Point::new(2, 8);
        state.fruits.clear();

        let ai = OpponentAi::new(Difficulty::Expert);
        let dir = ai.choose_direction(&state, &mut rng).unwrap();
        assert_eq!(dir, Direction::Left);
    }

    #[test]
    fn test_avoidance_reroutes_around_player_body() {
        let (mut state, mut rng) = versus_ai_state(6);
        place_opponent(&mut state, Point::new(8, 8), Direction::Left);
        // Wall of player segments directly left of the opponent's head.
        state.snake = Snake::new(
            [Point::new(7, 7), Point::new(7, 8), Point::new(7, 9)],
            Direction::Up,
        );
        state.food.position = Point::new(2, 8);
        state.fruits.clear();

        let ai = OpponentAi::new(Difficulty::Expert);
        let dir = ai.choose_direction(&state, &mut rng).unwrap();
        assert_ne!(dir, Direction::Left);
        assert_ne!(dir, Direction::Right); // reversal is never offered
    }

    #[test]
    fn test_boxed_in_opponent_keeps_unsafe_direction() {
        let (mut state, mut rng) = versus_ai_state(7);
        place_opponent(&mut state, Point::new(0, 0), Direction::Up);
        // Corner: up and left are walls, down and right blocked by the player.
        state.snake = Snake::new(
            [Point::new(1, 0), Point::new(0, 1), Point::new(1, 1)],
            Direction::Up,
        );
        state.food.position = Point::new(5, 5);
        state.fruits.clear();

        let ai = OpponentAi::new(Difficulty::Expert);
        let dir = ai.choose_direction(&state, &mut rng).unwrap();
        let head = state.opponent.as_ref().unwrap().head();
        assert!(would_collide(&state, Actor::Opponent, head.step(dir)));
    }

    #[test]
    fn test_random_override_never_reverses() {
        let (mut state, mut rng) = versus_ai_state(8);
        place_opponent(&mut state, Point::new(8, 8), Direction::Right);
        state.food.position = Point::new(14, 8);
        state.fruits.clear();

        let ai = OpponentAi::new(Difficulty::Easy);
        for _ in 0..200 {
            let dir = ai.choose_direction(&state, &mut rng).unwrap();
            assert_ne!(dir, Direction::Left);
        }
    }
}
