use std::time::Duration;

use crate::config::EngineConfig;
use crate::log;
use crate::rng::GameRng;

use super::ai::OpponentAi;
use super::collision;
use super::entities::{Food, Fruit};
use super::events::GameEvent;
use super::grid::Grid;
use super::snake::Snake;
use super::spawner::{self, SpawnError};
use super::types::{Actor, Difficulty, GameOverReason, Mode, Point};

pub const AI_RESPAWN_DELAY: Duration = Duration::from_secs(5);
pub const AI_DEATH_PENALTY: u32 = 50;
pub const FIRST_OBSTACLE_DELAY: Duration = Duration::from_secs(10);
pub const OBSTACLE_RETRY_DELAY: Duration = Duration::from_secs(5);
pub const OBSTACLE_WARNING_WINDOW: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Active,
    Over,
}

/// The whole session state. One `tick` call per frame is the only driver;
/// the independent one-second countdown enters through `countdown_second`.
#[derive(Debug)]
pub struct GameState {
    pub grid: Grid,
    pub mode: Mode,
    pub phase: Phase,
    pub game_over_reason: Option<GameOverReason>,

    pub snake: Snake,
    pub opponent: Option<Snake>,
    pub ai: Option<OpponentAi>,

    pub food: Food,
    pub fruits: Vec<Fruit>,
    pub obstacles: Vec<Point>,

    pub score: u32,
    pub ai_score: u32,

    pub tick_interval: Duration,
    initial_tick_interval: Duration,
    min_tick_interval: Duration,
    fruit_spawn_chance: f64,

    /// Simulated clock: the sum of tick intervals committed so far. All
    /// deadlines below are against this clock and fire at the start of a
    /// tick, never from a real timer racing the loop.
    pub elapsed: Duration,
    pub time_left: Option<Duration>,
    ai_respawn_at: Option<Duration>,
    next_obstacle_at: Option<Duration>,
    pub obstacle_warning: bool,

    pub total_ticks: u64,
}

/// Read-only view handed to the render sink after each tick.
#[derive(Clone, Debug)]
pub struct GameSnapshot {
    pub snake: Vec<Point>,
    pub ai_snake: Vec<Point>,
    pub food: Food,
    pub fruits: Vec<Fruit>,
    pub obstacles: Vec<Point>,
    pub score: u32,
    pub ai_score: u32,
    pub mode: Mode,
    pub phase: Phase,
    pub time_left: Option<Duration>,
    pub obstacle_warning: bool,
    pub tick: u64,
}

impl GameState {
    pub fn new(config: &EngineConfig, mode: Mode, rng: &mut GameRng) -> Self {
        let grid = Grid::new(config.tile_count);

        let mut state = Self {
            grid,
            mode,
            phase: Phase::Active,
            game_over_reason: None,
            snake: Snake::player_spawn(),
            opponent: mode
                .has_ai()
                .then(|| Snake::opponent_spawn(grid.tile_count)),
            ai: match mode {
                Mode::VersusAi { difficulty } => Some(OpponentAi::new(difficulty)),
                _ => None,
            },
            food: Food::initial(),
            fruits: Vec::new(),
            obstacles: Vec::new(),
            score: 0,
            ai_score: 0,
            tick_interval: config.initial_tick_interval(),
            initial_tick_interval: config.initial_tick_interval(),
            min_tick_interval: config.min_tick_interval(),
            fruit_spawn_chance: config.fruit_spawn_chance,
            elapsed: Duration::ZERO,
            time_left: match mode {
                Mode::TimeAttack { limit } => Some(limit),
                _ => None,
            },
            ai_respawn_at: None,
            next_obstacle_at: mode.has_obstacles().then_some(FIRST_OBSTACLE_DELAY),
            obstacle_warning: false,
            total_ticks: 0,
        };

        // Replace the placeholder food with a properly sampled one. A fresh
        // grid always has free tiles.
        if let Ok(food) = spawner::place_food(&state, rng) {
            state.food = food;
        }

        state
    }

    /// Input seam: latch the newest direction intent. Reversals are rejected
    /// here, before the tick ever sees them.
    pub fn queue_direction(&mut self, direction: super::types::Direction) {
        if self.phase == Phase::Active {
            self.snake.queue_direction(direction);
        }
    }

    /// Difficulty may change at any point while the AI is active.
    pub fn set_ai_difficulty(&mut self, difficulty: Difficulty) {
        if let Some(ai) = &mut self.ai {
            ai.set_difficulty(difficulty);
        }
    }

    /// Advance the simulation one step. Returns the events of this tick, in
    /// order. A no-op once the session is over.
    pub fn tick(&mut self, rng: &mut GameRng) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase == Phase::Over {
            return events;
        }

        self.total_ticks += 1;
        self.elapsed += self.tick_interval;

        self.process_ai_respawn(&mut events);

        // 1. Player's next head from the latched direction.
        let next_head = self.snake.project_next_head();

        // 2. The opponent moves first so the player check below sees its
        //    final position for this tick.
        if self.mode.has_ai() {
            self.move_opponent(rng, &mut events);
        }

        // 3. Terminal check before anything commits for the player.
        if let Some(reason) = collision::player_collision(self, next_head) {
            self.finish(reason, &mut events);
            return events;
        }

        // 4. Commit the move; eating retains the tail this tick.
        let player_ate = next_head == self.food.position;
        self.snake.advance(next_head, player_ate);
        if player_ate {
            self.eat_food(Actor::Player, rng, &mut events);
            if self.phase == Phase::Over {
                return events;
            }
        }

        // 5. Shared food, opponent second by design.
        if let Some(opponent) = &mut self.opponent {
            if opponent.head() == self.food.position {
                self.eat_food(Actor::Opponent, rng, &mut events);
                if self.phase == Phase::Over {
                    return events;
                }
            } else {
                opponent.body.pop_back();
            }
        }

        // 6. Occasional bonus fruit, versus-AI only.
        if self.mode.has_ai() && rng.chance(self.fruit_spawn_chance) {
            if let Some(fruit) = spawner::place_fruit(self, rng) {
                events.push(GameEvent::FruitSpawned {
                    rarity: fruit.rarity,
                    position: fruit.position,
                });
                self.fruits.push(fruit);
            }
        }

        // 7. Cross-snake collisions.
        if self.mode.has_ai() {
            self.cross_snake_pass(&mut events);
            if self.phase == Phase::Over {
                return events;
            }
        }

        // 8. Fruit lifetimes and consumption.
        if self.mode.has_ai() {
            self.fruit_pass(&mut events);
        }

        // 9. Survival obstacle drip.
        if self.mode.has_obstacles() {
            self.obstacle_drip(rng, &mut events);
        }

        events
    }

    /// Driven by the independent one-second countdown timer, never by the
    /// tick loop: speed changes must not stretch or shrink the countdown.
    pub fn countdown_second(&mut self) -> Option<GameEvent> {
        if self.phase == Phase::Over || !self.mode.has_countdown() {
            return None;
        }
        let left = self.time_left.as_mut()?;
        *left = left.saturating_sub(Duration::from_secs(1));
        if left.is_zero() {
            return self.game_over(GameOverReason::TimeExpired);
        }
        None
    }

    /// Terminal transition. Idempotent: a second call is a no-op and returns
    /// nothing, so double triggers cannot deduct or save twice.
    pub fn game_over(&mut self, reason: GameOverReason) -> Option<GameEvent> {
        if self.phase == Phase::Over {
            return None;
        }
        self.phase = Phase::Over;
        self.game_over_reason = Some(reason);
        self.obstacle_warning = false;
        if self.mode.has_ai() {
            self.opponent = None;
            self.fruits.clear();
            self.ai_respawn_at = None;
        }
        log!("Game over: {:?} (score {})", reason, self.score);
        Some(GameEvent::GameOver { reason })
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            snake: self.snake.body.iter().copied().collect(),
            ai_snake: self
                .opponent
                .as_ref()
                .map(|o| o.body.iter().copied().collect())
                .unwrap_or_default(),
            food: self.food,
            fruits: self.fruits.clone(),
            obstacles: self.obstacles.clone(),
            score: self.score,
            ai_score: self.ai_score,
            mode: self.mode,
            phase: self.phase,
            time_left: self.time_left,
            obstacle_warning: self.obstacle_warning,
            tick: self.total_ticks,
        }
    }

    fn finish(&mut self, reason: GameOverReason, events: &mut Vec<GameEvent>) {
        if let Some(event) = self.game_over(reason) {
            events.push(event);
        }
    }

    fn process_ai_respawn(&mut self, events: &mut Vec<GameEvent>) {
        if let Some(deadline) = self.ai_respawn_at
            && self.elapsed >= deadline
        {
            self.ai_respawn_at = None;
            self.opponent = Some(Snake::opponent_spawn(self.grid.tile_count));
            events.push(GameEvent::AiRespawned);
            log!("AI opponent respawned");
        }
    }

    fn move_opponent(&mut self, rng: &mut GameRng, events: &mut Vec<GameEvent>) {
        let Some(ai) = self.ai else {
            return;
        };
        let Some(direction) = ai.choose_direction(self, rng) else {
            return;
        };

        let opponent = self
            .opponent
            .as_mut()
            .expect("choose_direction returned Some, so the opponent exists");
        opponent.direction = direction;
        let next = opponent.head().step(direction);
        opponent.body.push_front(next);

        // The avoidance pass can run out of safe options; walls, its own
        // body, and obstacles are lethal. Hitting the player is scored in
        // the cross-snake pass instead.
        if collision::opponent_environment_collision(self) {
            self.kill_opponent(0, events);
        }
    }

    fn kill_opponent(&mut self, penalty: u32, events: &mut Vec<GameEvent>) {
        self.opponent = None;
        if penalty > 0 {
            self.ai_score = self.ai_score.saturating_sub(penalty);
        }
        events.push(GameEvent::AiDied { penalty });

        // A death while a respawn is already pending schedules nothing new:
        // exactly one respawn per death window.
        if self.ai_respawn_at.is_none() {
            self.ai_respawn_at = Some(self.elapsed + AI_RESPAWN_DELAY);
        }
    }

    fn eat_food(&mut self, actor: Actor, rng: &mut GameRng, events: &mut Vec<GameEvent>) {
        let points = self.food.points;
        match actor {
            Actor::Player => self.score += points,
            Actor::Opponent => self.ai_score += points,
        }
        events.push(GameEvent::AteFood { actor, points });

        if actor == Actor::Player && self.mode.speed_increase() {
            self.apply_speed_rule();
        }

        match spawner::place_food(self, rng) {
            Ok(food) => self.food = food,
            Err(SpawnError::GridFull) => {
                log!("No free tile left for food; ending session");
                self.finish(GameOverReason::GridFull, events);
            }
        }
    }

    /// Longer snake, faster ticks: shave `min(5, len/5) * 10ms` off the
    /// initial interval, floored at the minimum.
    fn apply_speed_rule(&mut self) {
        let steps = (self.snake.len() as f64 / 5.0).min(5.0);
        let reduced_ms = self.initial_tick_interval.as_millis() as f64 - steps * 10.0;
        let reduced = Duration::from_millis(reduced_ms.max(0.0) as u64);
        self.tick_interval = reduced.max(self.min_tick_interval);
    }

    fn cross_snake_pass(&mut self, events: &mut Vec<GameEvent>) {
        let Some(opponent) = &self.opponent else {
            return;
        };
        if self.snake.is_empty() {
            return;
        }

        let player_head = self.snake.head();
        let ai_head = opponent.head();

        if opponent.contains(player_head) {
            self.finish(GameOverReason::OpponentCollision, events);
            return;
        }

        if self.snake.contains(ai_head) {
            self.kill_opponent(AI_DEATH_PENALTY, events);
            log!(
                "AI opponent ran into the player at ({}, {})",
                ai_head.x,
                ai_head.y
            );
        }
    }

    fn fruit_pass(&mut self, events: &mut Vec<GameEvent>) {
        let player_head = self.snake.head();
        let ai_head = self.opponent.as_ref().map(|o| o.head());
        let mut player_grew = false;

        let mut index = 0;
        while index < self.fruits.len() {
            let fruit = &mut self.fruits[index];
            fruit.remaining_lifetime -= 1;

            if fruit.remaining_lifetime == 0 {
                events.push(GameEvent::FruitExpired {
                    position: fruit.position,
                });
                self.fruits.remove(index);
                continue;
            }

            if fruit.position == player_head {
                let fruit = self.fruits.remove(index);
                self.score += fruit.points;
                events.push(GameEvent::AteFruit {
                    actor: Actor::Player,
                    rarity: fruit.rarity,
                    points: fruit.points,
                });
                player_grew = true;
                continue;
            }

            if Some(fruit.position) == ai_head {
                let fruit = self.fruits.remove(index);
                self.ai_score += fruit.points;
                events.push(GameEvent::AteFruit {
                    actor: Actor::Opponent,
                    rarity: fruit.rarity,
                    points: fruit.points,
                });
                continue;
            }

            index += 1;
        }

        // Fruit grows the player by one net segment; the AI only scores.
        if player_grew {
            self.snake.regrow_tail();
        }
    }

    fn obstacle_drip(&mut self, rng: &mut GameRng, events: &mut Vec<GameEvent>) {
        let Mode::Survival { obstacle_cap } = self.mode else {
            return;
        };
        let Some(deadline) = self.next_obstacle_at else {
            return;
        };

        if self.obstacles.len() >= obstacle_cap {
            self.next_obstacle_at = None;
            self.obstacle_warning = false;
            return;
        }

        let remaining = deadline.saturating_sub(self.elapsed);
        self.obstacle_warning = !remaining.is_zero() && remaining <= OBSTACLE_WARNING_WINDOW;

        if self.elapsed < deadline {
            return;
        }

        match spawner::place_obstacle(self, rng) {
            Some(position) => {
                self.obstacles.push(position);
                events.push(GameEvent::ObstacleAdded { position });
                let offset_ms: u64 = rng.random_range(10_000..=20_000);
                self.next_obstacle_at = Some(self.elapsed + Duration::from_millis(offset_ms));
            }
            None => {
                log!("No room for a new obstacle; retrying in 5s");
                self.next_obstacle_at = Some(self.elapsed + OBSTACLE_RETRY_DELAY);
            }
        }
    }
}
