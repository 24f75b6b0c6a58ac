use std::io::Write;
use std::str::FromStr;

use clap::Parser;
use snake_engine::game::{Difficulty, Direction, GameEvent, GameSnapshot, Mode};
use snake_engine::log;
use snake_engine::logger;
use snake_engine::scores::InMemoryScoreStore;
use snake_engine::session::{AudioSink, GameSession, RenderSink, SessionConfig};
use snake_engine::{GameRng, load_config};
use tokio::io::AsyncBufReadExt;
use tokio::sync::{mpsc, watch};

#[derive(Parser)]
#[command(name = "snake_arcade")]
struct Args {
    /// Game mode: classic, time_attack, survival or ai.
    #[arg(long, default_value = "classic")]
    mode: String,

    /// AI difficulty, used by the ai mode: easy, medium, hard or expert.
    #[arg(long, default_value = "medium")]
    difficulty: String,

    /// RNG seed; omit for a random session.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "snake.yaml")]
    config: String,

    /// Stop after this many ticks (headless benchmarking).
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Name attached to saved scores.
    #[arg(long)]
    player_name: Option<String>,

    #[arg(long)]
    use_log_prefix: bool,
}

/// Parse the mode and difficulty arguments. Unknown keys are rejected up
/// front; no session state exists yet at this point.
fn resolve_mode(mode: &str, difficulty: &str) -> Result<Mode, String> {
    let mode = Mode::from_str(mode)?;
    if !mode.has_ai() {
        return Ok(mode);
    }
    Ok(Mode::versus_ai(Difficulty::from_str(difficulty)?))
}

/// ASCII view of the grid, redrawn in place after every tick.
struct TerminalRenderer {
    tile_count: i32,
}

impl TerminalRenderer {
    fn new(tile_count: i32) -> Self {
        Self { tile_count }
    }

    fn draw(&self, snapshot: &GameSnapshot) {
        let size = self.tile_count as usize;
        let mut cells = vec![vec!['.'; size]; size];
        let mut put = |x: i32, y: i32, glyph: char| {
            if x >= 0 && y >= 0 && (x as usize) < size && (y as usize) < size {
                cells[y as usize][x as usize] = glyph;
            }
        };

        for p in &snapshot.obstacles {
            put(p.x, p.y, '#');
        }
        put(snapshot.food.position.x, snapshot.food.position.y, '+');
        for fruit in &snapshot.fruits {
            put(fruit.position.x, fruit.position.y, '$');
        }
        for (i, p) in snapshot.ai_snake.iter().enumerate() {
            put(p.x, p.y, if i == 0 { 'X' } else { 'x' });
        }
        for (i, p) in snapshot.snake.iter().enumerate() {
            put(p.x, p.y, if i == 0 { 'O' } else { 'o' });
        }

        let mut frame = String::new();
        frame.push_str("\x1b[2J\x1b[H");
        frame.push_str(&format!("score {}", snapshot.score));
        if snapshot.mode.has_ai() {
            frame.push_str(&format!("  ai {}", snapshot.ai_score));
        }
        if let Some(left) = snapshot.time_left {
            frame.push_str(&format!("  time {}s", left.as_secs()));
        }
        if snapshot.obstacle_warning {
            frame.push_str("  [obstacle incoming]");
        }
        frame.push('\n');
        for row in &cells {
            frame.extend(row.iter());
            frame.push('\n');
        }

        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(frame.as_bytes());
        let _ = stdout.flush();
    }
}

impl RenderSink for TerminalRenderer {
    async fn present(&self, snapshot: GameSnapshot) {
        self.draw(&snapshot);
    }
}

/// No sound device on a terminal; narrate the effects through the logger.
struct LogAudio;

impl AudioSink for LogAudio {
    async fn play(&self, event: GameEvent) {
        match event {
            GameEvent::AteFood { actor, points } => {
                log!("{:?} ate food (+{})", actor, points);
            }
            GameEvent::AteFruit {
                actor,
                rarity,
                points,
            } => {
                log!("{:?} ate a {:?} fruit (+{})", actor, rarity, points);
            }
            GameEvent::GameOver { reason } => {
                log!("Game over: {:?}", reason);
            }
            _ => {}
        }
    }
}

/// Line-based steering: w/a/s/d (or u/d/l/r words) followed by Enter.
fn spawn_input_reader(input_tx: mpsc::Sender<Direction>) {
    tokio::spawn(async move {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let direction = match line.trim() {
                "w" | "up" => Direction::Up,
                "s" | "down" => Direction::Down,
                "a" | "left" => Direction::Left,
                "d" | "right" => Direction::Right,
                _ => continue,
            };
            if input_tx.send(direction).await.is_err() {
                break;
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Arcade".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let engine = load_config(&args.config)?;
    let mode = resolve_mode(&args.mode, &args.difficulty)?;
    let seed = args.seed.unwrap_or_else(|| GameRng::from_entropy().seed());

    log!("Starting {} game (seed {})", mode, seed);

    let session = GameSession::create(SessionConfig {
        mode,
        seed,
        engine: engine.clone(),
        player_name: args.player_name.clone(),
        max_ticks: args.max_ticks,
    });

    let (input_tx, input_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    spawn_input_reader(input_tx);
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        log!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let outcome = session
        .run(
            input_rx,
            shutdown_rx,
            TerminalRenderer::new(engine.tile_count),
            LogAudio,
            InMemoryScoreStore::new(),
        )
        .await;

    match outcome.reason {
        Some(reason) => log!(
            "Finished after {} ticks: {:?}, score {} (best {})",
            outcome.ticks,
            reason,
            outcome.score,
            outcome.high_score
        ),
        None => log!(
            "Stopped after {} ticks, score {}",
            outcome.ticks,
            outcome.score
        ),
    }

    Ok(())
}
