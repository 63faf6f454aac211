use std::path::PathBuf;
use thiserror::Error;

/// Fatal failure kinds. Each one aborts the run with a non-zero exit; there
/// are no retries and no partial output.
#[derive(Debug, Error)]
pub enum Error {
    /// The language mapping is a hard prerequisite: with no entries there is
    /// nothing to render.
    #[error("Language mapping file is empty or missing: {}", path.display())]
    Configuration { path: PathBuf },

    /// Request failure, timeout, or non-success status from the releases API.
    #[error("Failed to query GitHub releases: {reason}")]
    Network { reason: String },

    /// The latest-release payload carried no numeric id.
    #[error("Latest release payload does not contain an id")]
    MalformedResponse,

    /// Two qualifying assets disagreed on the release version.
    #[error("Inconsistent versions in assets: expected {expected}, got {found} from {asset}")]
    Consistency {
        expected: String,
        found: String,
        asset: String,
    },

    /// Not a single asset matched the expected name shape.
    #[error("No DBI assets found in the latest release")]
    NoAssets,
}
