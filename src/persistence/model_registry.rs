//! Directory-per-version model registry. Each trained model lives at
//! `models/<id>/{weights.bin, stats.json, metrics.json}`; the `ACTIVE` file
//! at the registry root names the currently-served version id.

use anyhow::Context;
use std::path::{Path, PathBuf};

use crate::ml::ModelBundle;
use crate::model::ModelVersion;

pub struct ModelRegistry {
    root: PathBuf,
}

impl ModelRegistry {
    pub fn new(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn active_pointer(&self) -> PathBuf {
        self.root.join("ACTIVE")
    }

    fn version_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    pub fn active_id(&self) -> anyhow::Result<Option<String>> {
        let pointer = self.active_pointer();
        if !pointer.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(pointer)?.trim().to_string()))
    }

    /// Atomically repoints `ACTIVE` at `id` via write-then-rename so a crash
    /// mid-write never leaves a half-written pointer.
    pub fn activate(&self, id: &str) -> anyhow::Result<()> {
        if !self.version_dir(id).exists() {
            anyhow::bail!("model version {id} has no directory in the registry");
        }
        let tmp = self.root.join("ACTIVE.tmp");
        std::fs::write(&tmp, id)?;
        std::fs::rename(tmp, self.active_pointer())?;
        Ok(())
    }

    pub fn persist(&self, bundle: &ModelBundle) -> anyhow::Result<()> {
        bundle.save(&self.version_dir(&bundle.version.id))
    }

    pub fn load_active(&self) -> anyhow::Result<Option<ModelBundle>> {
        match self.active_id()? {
            Some(id) => Ok(Some(self.load(&id)?)),
            None => Ok(None),
        }
    }

    pub fn load(&self, id: &str) -> anyhow::Result<ModelBundle> {
        let dir = self.version_dir(id);
        let version = self.read_version(&dir, id)?;
        ModelBundle::load(&dir, version)
    }

    pub fn list(&self) -> anyhow::Result<Vec<ModelVersion>> {
        let mut versions = Vec::new();
        if !self.root.exists() {
            return Ok(versions);
        }
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let id = entry.file_name().to_string_lossy().to_string();
            if let Ok(version) = self.read_version(&entry.path(), &id) {
                versions.push(version);
            }
        }
        versions.sort_by_key(|v| std::cmp::Reverse(v.created_at_millis));
        Ok(versions)
    }

    fn read_version(&self, dir: &Path, id: &str) -> anyhow::Result<ModelVersion> {
        let stats_path = dir.join("stats.json");
        let metrics_path = dir.join("metrics.json");
        let (means, stds): ([f32; crate::model::FEATURE_COUNT], [f32; crate::model::FEATURE_COUNT]) =
            serde_json::from_slice(
                &std::fs::read(&stats_path).with_context(|| format!("reading {}", stats_path.display()))?,
            )?;
        let metrics = serde_json::from_slice(
            &std::fs::read(&metrics_path).with_context(|| format!("reading {}", metrics_path.display()))?,
        )?;
        let created_at_millis = std::fs::metadata(dir)?
            .created()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Ok(ModelVersion {
            id: id.to_string(),
            created_at_millis,
            metrics,
            means,
            stds,
        })
    }
}
