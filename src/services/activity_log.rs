use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::models::Activity;

pub const MAX_ENTRIES: usize = 1000;

// Bounded local mirror of the activity stream. Full read-modify-write on every
// append; assumes a single writer process.
pub struct ActivityLog {
    dir: PathBuf,
    file: PathBuf,
}

impl ActivityLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let file = dir.join("activity-log.json");
        Self { dir, file }
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    pub fn append(&self, activity: &Activity) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create log directory {}", self.dir.display()))?;

        let mut activities = self.read_all()?;
        activities.push(activity.clone());

        if activities.len() > MAX_ENTRIES {
            activities = activities.split_off(activities.len() - MAX_ENTRIES);
        }

        let json = serde_json::to_string_pretty(&activities)?;
        fs::write(&self.file, json)
            .with_context(|| format!("Failed to write {}", self.file.display()))?;

        debug!("Activity saved locally to {}", self.file.display());
        Ok(())
    }

    // Missing file starts empty. Unreadable content is discarded with a
    // warning instead of poisoning every later append.
    pub fn read_all(&self) -> Result<Vec<Activity>> {
        if !self.file.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;

        match serde_json::from_str(&content) {
            Ok(activities) => Ok(activities),
            Err(err) => {
                warn!(
                    "Discarding corrupt activity log {}: {}",
                    self.file.display(),
                    err
                );
                Ok(Vec::new())
            }
        }
    }
}
