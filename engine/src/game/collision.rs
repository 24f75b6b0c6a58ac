use super::state::GameState;
use super::types::{Actor, GameOverReason, Point};

/// Would `pos` be lethal for the given actor? Walls, the actor's own body
/// (current head excluded, since the head is what moves there), the opposing
/// snake, and obstacles when the mode has them. Pure query.
pub fn would_collide(state: &GameState, actor: Actor, pos: Point) -> bool {
    if !state.grid.in_bounds(pos) {
        return true;
    }

    let (own, other) = match actor {
        Actor::Player => (Some(&state.snake), state.opponent.as_ref()),
        Actor::Opponent => (state.opponent.as_ref(), Some(&state.snake)),
    };

    if let Some(own) = own
        && own.body.iter().skip(1).any(|segment| *segment == pos)
    {
        return true;
    }

    if let Some(other) = other
        && other.contains(pos)
    {
        return true;
    }

    state.mode.has_obstacles() && state.obstacles.contains(&pos)
}

/// Projected-head check for the player, reporting which terminal path fired.
/// Runs before the move commits; a hit transitions the session to Over.
pub fn player_collision(state: &GameState, next_head: Point) -> Option<GameOverReason> {
    if !state.grid.in_bounds(next_head) {
        return Some(GameOverReason::WallCollision);
    }

    if state.snake.contains(next_head) {
        return Some(GameOverReason::SelfCollision);
    }

    if state.mode.has_obstacles() && state.obstacles.contains(&next_head) {
        return Some(GameOverReason::ObstacleCollision);
    }

    if state.mode.has_ai()
        && let Some(opponent) = &state.opponent
        && opponent.contains(next_head)
    {
        return Some(GameOverReason::OpponentCollision);
    }

    None
}

/// Post-move environment check for the opponent: walls, its own body, and
/// obstacles. Hitting the player is handled by the cross-snake pass instead.
pub fn opponent_environment_collision(state: &GameState) -> bool {
    let Some(opponent) = &state.opponent else {
        return false;
    };
    let head = opponent.head();

    if !state.grid.in_bounds(head) {
        return true;
    }

    if opponent.body.iter().skip(1).any(|segment| *segment == head) {
        return true;
    }

    state.mode.has_obstacles() && state.obstacles.contains(&head)
}

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::rng::GameRng;

    use super::super::snake::Snake;
    use super::super::types::{Difficulty, Direction, Mode};
    use super::*;

    fn versus_ai_state() -> GameState {
        let mut rng = GameRng::new(99);
        GameState::new(
            &EngineConfig::default(),
            Mode::versus_ai(Difficulty::Medium),
            &mut rng,
        )
    }

    #[test]
    fn test_out_of_bounds_collides_for_both_actors() {
        let state = versus_ai_state();
        assert!(would_collide(&state, Actor::Player, Point::new(-1, 0)));
        assert!(would_collide(&state, Actor::Opponent, Point::new(0, 16)));
    }

    #[test]
    fn test_own_head_tile_is_not_a_collision() {
        let state = versus_ai_state();
        let head = state.snake.head();
        assert!(!would_collide(&state, Actor::Player, head));
    }

    #[test]
    fn test_opposing_body_collides() {
        let state = versus_ai_state();
        let player_segment = state.snake.body[1];
        assert!(would_collide(&state, Actor::Opponent, player_segment));
    }

    #[test]
    fn test_player_collision_reports_wall_reason() {
        let mut state = versus_ai_state();
        state.snake = Snake::new([Point::new(15, 5), Point::new(14, 5)], Direction::Right);
        assert_eq!(
            player_collision(&state, Point::new(16, 5)),
            Some(GameOverReason::WallCollision)
        );
    }

    #[test]
    fn test_player_collision_reports_self_before_opponent() {
        let state = versus_ai_state();
        let own_segment = state.snake.body[1];
        assert_eq!(
            player_collision(&state, own_segment),
            Some(GameOverReason::SelfCollision)
        );
    }

    #[test]
    fn test_obstacle_ignored_outside_survival() {
        let mut state = versus_ai_state();
        let pos = Point::new(3, 3);
        state.obstacles.push(pos);
        assert!(!would_collide(&state, Actor::Player, pos));
    }
}
