//! Hall of fame (accepted high scores) and hall of shame (rejected
//! submissions with the reason they were caught). Both are small enough to
//! keep fully in memory and rewrite wholesale on every update.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::dto::LeaderboardEntry;
use crate::error::CheatKind;

const MAX_ENTRIES: usize = 100;

pub struct Leaderboard {
    path: PathBuf,
    entries: RwLock<Vec<LeaderboardEntry>>,
}

impl Leaderboard {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = read_json_or_default(&path)?;
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub async fn top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.entries.read().await.iter().take(limit).cloned().collect()
    }

    pub async fn rank_of(&self, score: i32) -> usize {
        self.entries.read().await.iter().filter(|e| e.score > score).count() + 1
    }

    /// Inserts a new accepted score, keeps the list sorted descending, caps
    /// it at `MAX_ENTRIES`, and persists the result.
    pub async fn record(&self, entry: LeaderboardEntry) -> anyhow::Result<()> {
        let mut guard = self.entries.write().await;
        guard.push(entry);
        guard.sort_by(|a, b| b.score.cmp(&a.score));
        guard.truncate(MAX_ENTRIES);
        write_json(&self.path, &*guard)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShameEntry {
    pub player_id: String,
    pub attempted_score: i32,
    pub kind: CheatKind,
    pub reason: String,
    pub timestamp_millis: i64,
}

pub struct ShameList {
    path: PathBuf,
    entries: RwLock<Vec<ShameEntry>>,
}

impl ShameList {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = read_json_or_default(&path)?;
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub async fn top(&self, limit: usize) -> Vec<ShameEntry> {
        self.entries.read().await.iter().take(limit).cloned().collect()
    }

    pub async fn record(&self, entry: ShameEntry) -> anyhow::Result<()> {
        let mut guard = self.entries.write().await;
        guard.push(entry);
        guard.sort_by(|a, b| b.attempted_score.cmp(&a.attempted_score));
        guard.truncate(MAX_ENTRIES);
        write_json(&self.path, &*guard)
    }
}

fn read_json_or_default<T: serde::de::DeserializeOwned + Default>(path: &Path) -> anyhow::Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
