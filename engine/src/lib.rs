pub mod config;
pub mod game;
pub mod logger;
pub mod rng;
pub mod scores;
pub mod session;

pub use config::{EngineConfig, load_config};
pub use rng::GameRng;
