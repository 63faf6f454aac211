use crate::error::Error;
use crate::provider::ReleaseAsset;

/// Qualification tokens, matched against the lowercased asset name. The
/// split below runs on the original name so language-code case survives.
const NAME_PREFIX: &str = "dbi.";
const NAME_SUFFIX: &str = ".nro";

/// Version and language codes shared by the qualifying assets of a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRelease {
    pub version: String,
    /// Sorted lexicographically; duplicates are preserved.
    pub languages: Vec<String>,
}

/// Extract the shared version and per-language codes from asset names of the
/// form `DBI.<version>.<code>.nro`. Names that do not fit the shape (wrong
/// prefix or extension, not exactly four dot-separated segments) are skipped
/// silently; qualifying names that disagree on the version are a hard error.
pub fn parse_assets(assets: &[ReleaseAsset]) -> Result<ParsedRelease, Error> {
    let mut version: Option<String> = None;
    let mut languages: Vec<String> = Vec::new();

    for asset in assets {
        let lower = asset.name.to_lowercase();
        if !lower.starts_with(NAME_PREFIX) || !lower.ends_with(NAME_SUFFIX) {
            continue;
        }

        let parts: Vec<&str> = asset.name.split('.').collect();
        if parts.len() != 4 {
            continue;
        }
        let (asset_version, lang_code) = (parts[1], parts[2]);

        match &version {
            None => version = Some(asset_version.to_string()),
            Some(expected) if expected != asset_version => {
                return Err(Error::Consistency {
                    expected: expected.clone(),
                    found: asset_version.to_string(),
                    asset: asset.name.clone(),
                });
            }
            Some(_) => {}
        }
        languages.push(lang_code.to_string());
    }

    let Some(version) = version else {
        return Err(Error::NoAssets);
    };
    languages.sort();
    Ok(ParsedRelease { version, languages })
}
