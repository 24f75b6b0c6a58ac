use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::Mutex;

pub const LEADERBOARD_SIZE: usize = 10;

#[derive(Clone, Debug)]
pub struct ScoreRecord {
    pub mode: String,
    pub player_name: String,
    pub score: u32,
    pub created_at: DateTime<Local>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreStoreError(pub String);

impl std::fmt::Display for ScoreStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Score store error: {}", self.0)
    }
}

/// Persistence seam. Implementations may sit in front of anything (the
/// bundled store is in-memory); callers treat every method as best-effort
/// and fall back to defaults on error, never blocking the tick loop.
pub trait ScoreStore: Send + Sync {
    fn high_score(&self, mode: &str) -> impl Future<Output = Result<u32, ScoreStoreError>> + Send;

    fn save_score(
        &self,
        record: ScoreRecord,
    ) -> impl Future<Output = Result<(), ScoreStoreError>> + Send;

    fn leaderboard(
        &self,
        mode: &str,
    ) -> impl Future<Output = Result<Vec<ScoreRecord>, ScoreStoreError>> + Send;
}

/// Names the original database refused to attach a score to.
pub fn is_saveable_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("anonymous")
}

/// In-memory store keeping a top-10 per mode. The bundled implementation and
/// the test double.
#[derive(Clone, Default)]
pub struct InMemoryScoreStore {
    by_mode: Arc<Mutex<HashMap<String, Vec<ScoreRecord>>>>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for InMemoryScoreStore {
    async fn high_score(&self, mode: &str) -> Result<u32, ScoreStoreError> {
        let by_mode = self.by_mode.lock().await;
        Ok(by_mode
            .get(mode)
            .and_then(|records| records.first())
            .map(|record| record.score)
            .unwrap_or(0))
    }

    async fn save_score(&self, record: ScoreRecord) -> Result<(), ScoreStoreError> {
        if !is_saveable_name(&record.player_name) {
            return Err(ScoreStoreError("Valid player name required".to_string()));
        }

        let mut by_mode = self.by_mode.lock().await;
        let records = by_mode.entry(record.mode.clone()).or_default();
        records.push(record);
        records.sort_by(|a, b| b.score.cmp(&a.score));
        records.truncate(LEADERBOARD_SIZE);
        Ok(())
    }

    async fn leaderboard(&self, mode: &str) -> Result<Vec<ScoreRecord>, ScoreStoreError> {
        let by_mode = self.by_mode.lock().await;
        Ok(by_mode.get(mode).cloned().unwrap_or_default())
    }
}
