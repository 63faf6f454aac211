pub mod github;

use serde::Deserialize;

/// One downloadable file attached to a release. Only the name is read here;
/// download URLs in the rendered config come from the fixed release path.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
}

/// Latest-release payload, reduced to the fields this tool consumes. `id`
/// stays optional so a payload without one is reported as malformed by the
/// caller instead of failing deserialization outright.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub id: Option<u64>,
    pub tag_name: Option<String>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}
