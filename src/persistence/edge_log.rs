//! Append-only JSONL log of edge cases (spec section 4.7), one line per
//! classified disagreement between the rule chain and the ML predictor. The
//! scheduler reads this file's length to decide whether to retrain.

use anyhow::Context;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::model::EdgeCase;

pub struct EdgeCaseLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl EdgeCaseLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub async fn append(&self, case: &EdgeCase) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut line = serde_json::to_string(case)?;
        line.push('\n');
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    pub async fn count(&self) -> anyhow::Result<usize> {
        let _guard = self.lock.lock().await;
        count_lines(&self.path)
    }

    pub async fn read_all(&self) -> anyhow::Result<Vec<EdgeCase>> {
        let _guard = self.lock.lock().await;
        read_all_sync(&self.path)
    }
}

fn count_lines(path: &Path) -> anyhow::Result<usize> {
    if !path.exists() {
        return Ok(0);
    }
    let file = std::fs::File::open(path)?;
    Ok(BufReader::new(file).lines().count())
}

fn read_all_sync(path: &Path) -> anyhow::Result<Vec<EdgeCase>> {
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
