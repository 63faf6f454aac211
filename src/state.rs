use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of the last release that was turned into a package. All fields are
/// optional on disk so files written by older builds still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct State {
    pub last_release_id: Option<u64>,
    pub last_tag: Option<String>,
    pub last_version: Option<String>,
    pub languages: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl State {
    /// Fresh record for a just-processed release, stamped with the current
    /// time.
    pub fn new(release_id: u64, tag: String, version: String, languages: Vec<String>) -> Self {
        Self {
            last_release_id: Some(release_id),
            last_tag: Some(tag),
            last_version: Some(version),
            languages,
            updated_at: Some(Utc::now()),
        }
    }

    /// Read the state file, treating an absent file as an empty state. A file
    /// that exists but cannot be read or parsed is an error: guessing here
    /// would re-process or skip releases unpredictably.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;
        let state = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;
        Ok(state)
    }

    /// True when `release_id` is the release this state was written for.
    pub fn is_current(&self, release_id: u64) -> bool {
        self.last_release_id == Some(release_id)
    }

    /// Write the record as pretty-printed JSON with a trailing newline.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut content = serde_json::to_string_pretty(self)
            .with_context(|| format!("Failed to serialize state for: {}", path.display()))?;
        content.push('\n');
        fs::write(path, content)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;
        Ok(())
    }
}
