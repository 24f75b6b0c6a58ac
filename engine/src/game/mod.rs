pub mod ai;
pub mod collision;
pub mod entities;
pub mod events;
pub mod grid;
pub mod snake;
pub mod spawner;
pub mod state;
pub mod types;

pub use ai::{OpponentAi, Target};
pub use entities::{Food, Fruit, Rarity};
pub use events::GameEvent;
pub use grid::Grid;
pub use snake::Snake;
pub use spawner::SpawnError;
pub use state::{GameSnapshot, GameState, Phase};
pub use types::{Actor, Difficulty, Direction, GameOverReason, Mode, Point};
