use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::config::EngineConfig;
use crate::game::{Direction, GameEvent, GameOverReason, GameSnapshot, GameState, Mode, Phase};
use crate::log;
use crate::rng::GameRng;
use crate::scores::{ScoreRecord, ScoreStore, is_saveable_name};

/// Drawing seam: receives a read-only snapshot after every tick. The core
/// never calls back into rendering beyond this.
pub trait RenderSink: Send + Sync + 'static {
    fn present(&self, snapshot: GameSnapshot) -> impl Future<Output = ()> + Send;
}

/// Sound seam: receives the discrete events worth a sound effect. Playback
/// is fire-and-forget.
pub trait AudioSink: Send + Sync + 'static {
    fn play(&self, event: GameEvent) -> impl Future<Output = ()> + Send;
}

pub struct SessionConfig {
    pub mode: Mode,
    pub seed: u64,
    pub engine: EngineConfig,
    pub player_name: Option<String>,
    /// Stop after this many ticks even without a game over. Headless runs.
    pub max_ticks: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct SessionOutcome {
    pub mode: Mode,
    pub score: u32,
    pub ai_score: u32,
    pub reason: Option<GameOverReason>,
    pub ticks: u64,
    pub high_score: u32,
}

/// One running game. Owns the state and RNG behind mutexes so external
/// inspection (and the driver loop) can share them.
pub struct GameSession {
    pub state: Arc<Mutex<GameState>>,
    pub rng: Arc<Mutex<GameRng>>,
    mode: Mode,
    player_name: Option<String>,
    max_ticks: Option<u64>,
}

impl GameSession {
    pub fn create(config: SessionConfig) -> Self {
        let mut rng = GameRng::new(config.seed);
        let state = GameState::new(&config.engine, config.mode, &mut rng);

        Self {
            state: Arc::new(Mutex::new(state)),
            rng: Arc::new(Mutex::new(rng)),
            mode: config.mode,
            player_name: config.player_name,
            max_ticks: config.max_ticks,
        }
    }

    /// Drive the session to completion. Two independent timers: the tick
    /// timer, re-armed whenever the speed rule changes the interval, and a
    /// fixed one-second countdown timer for time-attack. A shutdown signal
    /// cancels both along with any pending simulated-clock deadline, so
    /// nothing can mutate a discarded session afterwards.
    pub async fn run(
        self,
        mut input: mpsc::Receiver<Direction>,
        mut shutdown: watch::Receiver<bool>,
        render: impl RenderSink,
        audio: impl AudioSink,
        scores: impl ScoreStore,
    ) -> SessionOutcome {
        let mode_key = self.mode.score_key();
        let high_score = query_high_score(&scores, mode_key).await;
        log!("Session started: mode {} (high score {})", self.mode, high_score);

        let mut current_interval = self.state.lock().await.tick_interval;
        let mut tick_timer = new_tick_timer(current_interval);
        let mut countdown_timer =
            interval_at(Instant::now() + Duration::from_secs(1), Duration::from_secs(1));
        let has_countdown = self.mode.has_countdown();

        loop {
            tokio::select! {
                _ = tick_timer.tick() => {
                    let mut latest = None;
                    while let Ok(direction) = input.try_recv() {
                        latest = Some(direction);
                    }

                    let mut state = self.state.lock().await;
                    if let Some(direction) = latest {
                        state.queue_direction(direction);
                    }

                    let mut rng = self.rng.lock().await;
                    let events = state.tick(&mut rng);
                    drop(rng);

                    let snapshot = state.snapshot();
                    let over = state.phase == Phase::Over;
                    let tick_budget_spent = self
                        .max_ticks
                        .is_some_and(|max| state.total_ticks >= max);

                    if state.tick_interval != current_interval {
                        current_interval = state.tick_interval;
                        tick_timer = new_tick_timer(current_interval);
                    }
                    drop(state);

                    render.present(snapshot).await;
                    for event in events {
                        if is_audible(&event) {
                            audio.play(event).await;
                        }
                    }

                    if over || tick_budget_spent {
                        break;
                    }
                }
                _ = countdown_timer.tick(), if has_countdown => {
                    let mut state = self.state.lock().await;
                    let event = state.countdown_second();
                    let over = state.phase == Phase::Over;
                    drop(state);

                    if let Some(event) = event {
                        audio.play(event).await;
                    }
                    if over {
                        break;
                    }
                }
                _ = shutdown.changed() => {
                    log!("Session cancelled");
                    break;
                }
            }
        }

        self.finish(&scores, mode_key).await
    }

    async fn finish(&self, scores: &impl ScoreStore, mode_key: &str) -> SessionOutcome {
        let state = self.state.lock().await;
        let outcome_score = state.score;
        let reason = state.game_over_reason;
        let over = state.phase == Phase::Over;
        let ai_score = state.ai_score;
        let ticks = state.total_ticks;
        drop(state);

        // Terminal game over, non-AI modes, positive score: offer the score
        // to the store. Failures are logged and swallowed.
        if over && outcome_score > 0 && !self.mode.has_ai() {
            if let Some(name) = self.player_name.as_deref().filter(|n| is_saveable_name(n)) {
                let record = ScoreRecord {
                    mode: mode_key.to_string(),
                    player_name: name.to_string(),
                    score: outcome_score,
                    created_at: chrono::Local::now(),
                };
                if let Err(e) = scores.save_score(record).await {
                    log!("Failed to save score: {}", e);
                }
            }
        }

        SessionOutcome {
            mode: self.mode,
            score: outcome_score,
            ai_score,
            reason,
            ticks,
            high_score: query_high_score(scores, mode_key).await,
        }
    }
}

fn new_tick_timer(period: Duration) -> tokio::time::Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

fn is_audible(event: &GameEvent) -> bool {
    matches!(
        event,
        GameEvent::AteFood { .. } | GameEvent::AteFruit { .. } | GameEvent::GameOver { .. }
    )
}

/// Best-effort read: a failed store is a logged warning and "no known high
/// score", never an error for the session.
async fn query_high_score(scores: &impl ScoreStore, mode_key: &str) -> u32 {
    match scores.high_score(mode_key).await {
        Ok(value) => value,
        Err(e) => {
            log!("High score query failed ({}); treating as 0", e);
            0
        }
    }
}

/// Sink that discards everything. Headless runs and tests.
#[derive(Clone, Copy, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    async fn present(&self, _snapshot: GameSnapshot) {}
}

impl AudioSink for NullSink {
    async fn play(&self, _event: GameEvent) {}
}

#[cfg(test)]
mod tests {
    use crate::scores::InMemoryScoreStore;

    use super::*;

    fn session(mode: Mode, max_ticks: Option<u64>) -> GameSession {
        GameSession::create(SessionConfig {
            mode,
            seed: 9001,
            engine: EngineConfig::default(),
            player_name: None,
            max_ticks,
        })
    }

    fn channels() -> (
        mpsc::Sender<Direction>,
        mpsc::Receiver<Direction>,
        watch::Sender<bool>,
        watch::Receiver<bool>,
    ) {
        let (input_tx, input_rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        (input_tx, input_rx, shutdown_tx, shutdown_rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsteered_classic_session_hits_the_wall() {
        let (_input_tx, input_rx, _shutdown_tx, shutdown_rx) = channels();

        let outcome = session(Mode::Classic, None)
            .run(
                input_rx,
                shutdown_rx,
                NullSink,
                NullSink,
                InMemoryScoreStore::new(),
            )
            .await;

        assert_eq!(outcome.reason, Some(GameOverReason::WallCollision));
        assert!(outcome.ticks <= 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_budget_stops_session_early() {
        let (_input_tx, input_rx, _shutdown_tx, shutdown_rx) = channels();

        let outcome = session(Mode::Classic, Some(3))
            .run(
                input_rx,
                shutdown_rx,
                NullSink,
                NullSink,
                InMemoryScoreStore::new(),
            )
            .await;

        assert_eq!(outcome.ticks, 3);
        assert_eq!(outcome.reason, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_session() {
        let (_input_tx, input_rx, shutdown_tx, shutdown_rx) = channels();
        shutdown_tx.send(true).expect("receiver is alive");

        let outcome = session(Mode::survival(), None)
            .run(
                input_rx,
                shutdown_rx,
                NullSink,
                NullSink,
                InMemoryScoreStore::new(),
            )
            .await;

        assert_eq!(outcome.reason, None);
        assert!(outcome.ticks <= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_steers_the_player() {
        let (input_tx, input_rx, _shutdown_tx, shutdown_rx) = channels();

        // Turn down immediately; with only two ticks the snake must end up
        // below its spawn row instead of to the right.
        input_tx.send(Direction::Down).await.unwrap();

        let game = session(Mode::Classic, Some(2));
        let state = game.state.clone();
        let outcome = game
            .run(
                input_rx,
                shutdown_rx,
                NullSink,
                NullSink,
                InMemoryScoreStore::new(),
            )
            .await;

        assert_eq!(outcome.reason, None);
        let state = state.lock().await;
        assert!(state.snake.head().y > 10);
    }
}
