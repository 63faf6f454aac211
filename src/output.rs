use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Name of the generated artifact inside the output directory.
pub const CONFIG_FILENAME: &str = "config.ini";

/// Make `dir` exist and be empty. The directory is fully replaced on every
/// run so stale artifacts from previous releases never survive. Entries are
/// removed without following symlinks.
pub fn replace_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read output directory: {}", dir.display()))?;
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read output directory: {}", dir.display()))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to inspect output entry: {}", path.display()))?;
        if file_type.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        }
        .with_context(|| format!("Failed to remove output entry: {}", path.display()))?;
    }
    Ok(())
}

/// Write the rendered config into `dir` and return its path.
pub fn write_config(dir: &Path, content: &str) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILENAME);
    fs::write(&path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(path)
}
