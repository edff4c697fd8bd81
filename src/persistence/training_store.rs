//! Append-only JSONL log of labeled training samples, fed by every
//! submission the Orchestrator finishes classifying (spec section 4.8).

use anyhow::Context;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::model::TrainingSample;

pub struct TrainingStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl TrainingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub async fn append(&self, sample: &TrainingSample) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut line = serde_json::to_string(sample)?;
        line.push('\n');
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    pub async fn read_all(&self) -> anyhow::Result<Vec<TrainingSample>> {
        let _guard = self.lock.lock().await;
        read_all_sync(&self.path)
    }
}

fn read_all_sync(path: &Path) -> anyhow::Result<Vec<TrainingSample>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = std::fs::File::open(path)?;
    BufReader::new(file)
        .lines()
        .map(|line| {
            let line = line?;
            Ok(serde_json::from_str(&line)?)
        })
        .collect()
}
