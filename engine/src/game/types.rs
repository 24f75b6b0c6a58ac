use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const TIME_ATTACK_LIMIT: Duration = Duration::from_secs(120);
pub const SURVIVAL_OBSTACLE_CAP: usize = 20;

/// Grid coordinates. Signed so a projected head one step beyond the edge is
/// representable; the bounds check rejects it before anything commits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
                | (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
        )
    }
}

/// AI difficulty. Scales how the opponent trades fruit value against distance
/// and how often it moves at random.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

pub struct DifficultyWeights {
    pub value_weight: f64,
    pub distance_weight: f64,
    pub random_move_chance: f64,
}

impl Difficulty {
    pub fn weights(&self) -> DifficultyWeights {
        match self {
            Difficulty::Easy => DifficultyWeights {
                value_weight: 0.5,
                distance_weight: 1.5,
                random_move_chance: 0.30,
            },
            Difficulty::Medium => DifficultyWeights {
                value_weight: 1.0,
                distance_weight: 1.0,
                random_move_chance: 0.15,
            },
            Difficulty::Hard => DifficultyWeights {
                value_weight: 1.5,
                distance_weight: 0.5,
                random_move_chance: 0.05,
            },
            Difficulty::Expert => DifficultyWeights {
                value_weight: 2.0,
                distance_weight: 0.2,
                random_move_chance: 0.0,
            },
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            other => Err(format!("Unknown difficulty: {}", other)),
        }
    }
}

/// Game mode. Each variant carries its mode-specific configuration so tick
/// logic dispatches on the variant instead of comparing mode keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Classic,
    TimeAttack { limit: Duration },
    Survival { obstacle_cap: usize },
    VersusAi { difficulty: Difficulty },
}

impl Mode {
    pub fn time_attack() -> Self {
        Mode::TimeAttack {
            limit: TIME_ATTACK_LIMIT,
        }
    }

    pub fn survival() -> Self {
        Mode::Survival {
            obstacle_cap: SURVIVAL_OBSTACLE_CAP,
        }
    }

    pub fn versus_ai(difficulty: Difficulty) -> Self {
        Mode::VersusAi { difficulty }
    }

    /// All shipped modes speed up on food; kept as a per-mode flag because it
    /// is part of the mode table, not a global rule.
    pub fn speed_increase(&self) -> bool {
        true
    }

    pub fn has_ai(&self) -> bool {
        matches!(self, Mode::VersusAi { .. })
    }

    pub fn has_obstacles(&self) -> bool {
        matches!(self, Mode::Survival { .. })
    }

    pub fn has_countdown(&self) -> bool {
        matches!(self, Mode::TimeAttack { .. })
    }

    /// Key used by the score store, matching the original database rows.
    pub fn score_key(&self) -> &'static str {
        match self {
            Mode::Classic => "classic",
            Mode::TimeAttack { .. } => "time_attack",
            Mode::Survival { .. } => "survival",
            Mode::VersusAi { .. } => "ai",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classic" => Ok(Mode::Classic),
            "time_attack" => Ok(Mode::time_attack()),
            "survival" => Ok(Mode::survival()),
            "versus_ai" | "ai" => Ok(Mode::versus_ai(Difficulty::Medium)),
            other => Err(format!("Unknown game mode: {}", other)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.score_key())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Actor {
    Player,
    Opponent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    WallCollision,
    SelfCollision,
    ObstacleCollision,
    OpponentCollision,
    TimeExpired,
    /// No free tile left for the mandatory food respawn.
    GridFull,
}
