use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod assets;
mod error;
mod langmap;
mod output;
mod provider;
mod render;
mod state;

use crate::error::Error;
use crate::state::State;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(name = "dbipack")]
#[command(about = "Watch DBIPatcher releases and build Ultrahand config.ini archive", version, long_about = None)]
struct Args {
    /// Directory to store generated artifacts
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Path to store release tracking state
    #[arg(short, long, default_value = "state.json")]
    state_file: PathBuf,

    /// JSON file with language mapping
    #[arg(short, long, default_value = "languages.json")]
    languages: PathBuf,

    /// Force regeneration even if release was already processed
    #[arg(short, long)]
    force: bool,
}

#[derive(Debug)]
enum Outcome {
    /// The latest release matches the recorded one and `--force` was not
    /// given; nothing on disk was touched.
    AlreadyProcessed,
    Generated {
        tag: String,
        version: String,
        languages: Vec<String>,
        config_path: PathBuf,
    },
}

/// One full pass: read configuration and state, query GitHub, and when the
/// release is new (or `--force` is set) rebuild the output directory and
/// record the release. `api_url` is the "latest release" endpoint.
async fn run(args: &Args, api_url: &str) -> Result<Outcome> {
    let lang_map = langmap::load_language_map(&args.languages)?;
    let state = State::load(&args.state_file)?;

    let client = reqwest::Client::builder()
        .user_agent(provider::github::USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    info!(url = api_url, "Fetching latest release");
    let release = provider::github::fetch_latest_release(&client, api_url).await?;
    let release_id = release.id.ok_or(Error::MalformedResponse)?;

    if state.is_current(release_id) && !args.force {
        return Ok(Outcome::AlreadyProcessed);
    }

    let parsed = assets::parse_assets(&release.assets)?;
    let rendered = render::render_config(&parsed.version, &parsed.languages, &lang_map);
    let tag = release
        .tag_name
        .unwrap_or_else(|| format!("dbi-{}", parsed.version));
    info!(release_id, tag = %tag, version = %parsed.version, "Building package");

    output::replace_dir(&args.output_dir)?;
    let config_path = output::write_config(&args.output_dir, &rendered.content)?;
    State::new(
        release_id,
        tag.clone(),
        parsed.version.clone(),
        rendered.languages.clone(),
    )
    .save(&args.state_file)?;

    Ok(Outcome::Generated {
        tag,
        version: parsed.version,
        languages: rendered.languages,
        config_path,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dbipack=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args, provider::github::GITHUB_RELEASES_API).await? {
        Outcome::AlreadyProcessed => {
            println!("Latest release was already processed. Use --force to rebuild.");
        }
        Outcome::Generated {
            tag,
            version,
            languages,
            config_path,
        } => {
            println!("Prepared package for release {} with version {}.", tag, version);
            println!("Languages: {}", languages.join(", "));
            println!("config.ini: {}", config_path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn release_payload() -> serde_json::Value {
        serde_json::json!({
            "id": 8311,
            "tag_name": "657",
            "assets": [
                { "name": "DBI.657.ru.nro" },
                { "name": "DBI.657.en.nro" },
                { "name": "checksums.txt" }
            ]
        })
    }

    async fn serve(payload: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/releases/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload))
            .mount(&server)
            .await;
        server
    }

    fn endpoint(server: &MockServer) -> String {
        format!("{}/releases/latest", server.uri())
    }

    fn args_in(dir: &Path) -> Args {
        let languages = dir.join("languages.json");
        fs::write(&languages, r#"{"en": "English", "ru": "Русский"}"#).unwrap();
        Args {
            output_dir: dir.join("output"),
            state_file: dir.join("state.json"),
            languages,
            force: false,
        }
    }

    #[tokio::test]
    async fn first_run_writes_config_and_state() {
        let dir = tempfile::tempdir().unwrap();
        let args = args_in(dir.path());
        let server = serve(release_payload()).await;

        let outcome = run(&args, &endpoint(&server)).await.unwrap();

        match outcome {
            Outcome::Generated {
                tag,
                version,
                languages,
                config_path,
            } => {
                assert_eq!(tag, "657");
                assert_eq!(version, "657");
                assert_eq!(languages, vec!["en", "ru"]);
                assert_eq!(config_path, args.output_dir.join("config.ini"));
            }
            other => panic!("expected a generated package, got {other:?}"),
        }

        let config = fs::read_to_string(args.output_dir.join("config.ini")).unwrap();
        assert!(config.starts_with(";LANGUAGES\n\n[English]\n"));
        assert!(config.contains("/DBI.657.ru.nro /switch/DBI/DBI_new.nro"));

        let state = State::load(&args.state_file).unwrap();
        assert!(state.is_current(8311));
        assert_eq!(state.last_tag.as_deref(), Some("657"));
        assert_eq!(state.last_version.as_deref(), Some("657"));
        assert_eq!(state.languages, vec!["en", "ru"]);
        assert!(state.updated_at.is_some());
    }

    #[tokio::test]
    async fn second_run_for_the_same_release_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let args = args_in(dir.path());
        let server = serve(release_payload()).await;

        run(&args, &endpoint(&server)).await.unwrap();
        fs::remove_dir_all(&args.output_dir).unwrap();

        let outcome = run(&args, &endpoint(&server)).await.unwrap();

        assert!(matches!(outcome, Outcome::AlreadyProcessed));
        assert!(!args.output_dir.exists());
    }

    #[tokio::test]
    async fn force_rebuilds_an_already_processed_release() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args_in(dir.path());
        let server = serve(release_payload()).await;

        run(&args, &endpoint(&server)).await.unwrap();
        fs::remove_dir_all(&args.output_dir).unwrap();
        args.force = true;

        let outcome = run(&args, &endpoint(&server)).await.unwrap();

        assert!(matches!(outcome, Outcome::Generated { .. }));
        assert!(args.output_dir.join("config.ini").is_file());
    }

    #[tokio::test]
    async fn stale_output_contents_are_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let args = args_in(dir.path());
        let server = serve(release_payload()).await;
        fs::create_dir_all(args.output_dir.join("nested")).unwrap();
        fs::write(args.output_dir.join("nested").join("old.ini"), "stale").unwrap();
        fs::write(args.output_dir.join("junk.txt"), "stale").unwrap();

        run(&args, &endpoint(&server)).await.unwrap();

        let names: Vec<String> = fs::read_dir(&args.output_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["config.ini"]);
    }

    #[tokio::test]
    async fn missing_tag_falls_back_to_the_version() {
        let dir = tempfile::tempdir().unwrap();
        let args = args_in(dir.path());
        let server = serve(serde_json::json!({
            "id": 8311,
            "assets": [{ "name": "DBI.657.en.nro" }]
        }))
        .await;

        let outcome = run(&args, &endpoint(&server)).await.unwrap();

        match outcome {
            Outcome::Generated { tag, .. } => assert_eq!(tag, "dbi-657"),
            other => panic!("expected a generated package, got {other:?}"),
        }
        let state = State::load(&args.state_file).unwrap();
        assert_eq!(state.last_tag.as_deref(), Some("dbi-657"));
    }

    #[tokio::test]
    async fn missing_language_map_aborts_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args_in(dir.path());
        args.languages = dir.path().join("nowhere.json");

        let err = run(&args, "http://127.0.0.1:9/unreachable").await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn release_without_an_id_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let args = args_in(dir.path());
        let server = serve(serde_json::json!({
            "tag_name": "657",
            "assets": [{ "name": "DBI.657.en.nro" }]
        }))
        .await;

        let err = run(&args, &endpoint(&server)).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::MalformedResponse)
        ));
        assert_eq!(
            err.downcast_ref::<Error>().unwrap().to_string(),
            "Latest release payload does not contain an id"
        );
    }
}
