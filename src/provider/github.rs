use super::Release;
use crate::error::Error;
use reqwest::Client;

/// Latest-release endpoint for the DBIPatcher repository.
pub const GITHUB_RELEASES_API: &str =
    "https://api.github.com/repos/rashevskyv/DBIPatcher/releases/latest";

/// Sent on every API request; GitHub rejects anonymous-agent calls.
pub const USER_AGENT: &str = "dbipack/0.1.0";

/// Fetch the latest release. Exactly one request, no retry; any transport
/// failure or non-success status is a `Network` error for the caller to
/// surface. `api_url` is `GITHUB_RELEASES_API` outside of tests.
pub async fn fetch_latest_release(client: &Client, api_url: &str) -> Result<Release, Error> {
    let response = client
        .get(api_url)
        .header("Accept", "application/vnd.github.v3+json")
        .header("User-Agent", USER_AGENT)
        .send()
        .await
        .map_err(|e| Error::Network {
            reason: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(Error::Network {
            reason: format!("GitHub API returned status: {}", response.status()),
        });
    }

    response.json().await.map_err(|e| Error::Network {
        reason: e.to_string(),
    })
}
