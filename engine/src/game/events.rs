use super::types::{Actor, GameOverReason, Point};
use super::entities::Rarity;

/// Discrete things that happened during one tick, in order. The session
/// runner forwards these to the audio sink and the log; the core never waits
/// on their handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    AteFood { actor: Actor, points: u32 },
    AteFruit { actor: Actor, rarity: Rarity, points: u32 },
    FruitSpawned { rarity: Rarity, position: Point },
    FruitExpired { position: Point },
    ObstacleAdded { position: Point },
    AiDied { penalty: u32 },
    AiRespawned,
    GameOver { reason: GameOverReason },
}
