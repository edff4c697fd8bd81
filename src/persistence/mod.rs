//! File-backed persistence ports (spec section 4.9-ish ambient concern). The
//! pipeline only needs append-only logs and a small versioned model
//! registry, not a relational store, so everything here lives under one
//! root directory as plain JSON/JSONL files.

mod edge_log;
mod leaderboard;
mod model_registry;
mod training_store;

pub use edge_log::EdgeCaseLog;
pub use leaderboard::{Leaderboard, ShameEntry, ShameList};
pub use model_registry::ModelRegistry;
pub use training_store::TrainingStore;

use std::path::{Path, PathBuf};

/// Resolves the on-disk layout under a single configured root.
#[derive(Debug, Clone)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn leaderboard_file(&self) -> PathBuf {
        self.root.join("leaderboard.json")
    }

    pub fn shame_file(&self) -> PathBuf {
        self.root.join("shame.json")
    }

    pub fn edge_case_log(&self) -> PathBuf {
        self.root.join("edge_cases.jsonl")
    }

    pub fn training_samples_log(&self) -> PathBuf {
        self.root.join("training_samples.jsonl")
    }

    pub fn models_dir(&self) -> PathBuf {
        self.root.join("models")
    }

    pub fn ensure_exists(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.models_dir())?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
