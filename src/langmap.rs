use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::Error;

/// Load the code -> display name mapping from disk. The file is required:
/// a missing or empty mapping would silently produce bare-code section
/// names, so both are rejected up front.
pub fn load_language_map(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Err(Error::Configuration {
            path: path.to_path_buf(),
        }
        .into());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read language mapping file: {}", path.display()))?;
    let map: HashMap<String, String> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse language mapping file: {}", path.display()))?;

    if map.is_empty() {
        return Err(Error::Configuration {
            path: path.to_path_buf(),
        }
        .into());
    }

    Ok(map)
}
