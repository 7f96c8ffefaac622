use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use roadmap_client::api::ContentClient;
use roadmap_client::app::App;
use roadmap_client::completion::{CompletionTracker, ProgressStore, PROGRESS_NAMESPACE};
use roadmap_client::config::ClientConfig;
use roadmap_common::redis::RedisCache;

const USAGE: &str = "usage: roadmap-client [URL] [--click ELEMENT_ID]... [--type ELEMENT_ID=TEXT]...";

/// One scripted interaction, replayed in command-line order.
enum Step {
    Click(String),
    Type { input: String, text: String },
}

struct Args {
    url: String,
    steps: Vec<Step>,
}

impl Args {
    fn parse(mut raw: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut url = None;
        let mut steps = Vec::new();
        while let Some(arg) = raw.next() {
            match arg.as_str() {
                "--click" => {
                    let target = raw.next().context("--click needs an element id")?;
                    steps.push(Step::Click(target));
                }
                "--type" => {
                    let pair = raw.next().context("--type needs ELEMENT_ID=TEXT")?;
                    let (input, text) = pair
                        .split_once('=')
                        .context("--type needs ELEMENT_ID=TEXT")?;
                    steps.push(Step::Type {
                        input: input.to_string(),
                        text: text.to_string(),
                    });
                }
                "-h" | "--help" => bail!(USAGE),
                flag if flag.starts_with("--") => bail!("unknown flag {flag}\n{USAGE}"),
                _ if url.is_none() => url = Some(arg),
                _ => bail!("unexpected argument '{arg}'\n{USAGE}"),
            }
        }
        Ok(Self {
            url: url.unwrap_or_else(|| "/".to_string()),
            steps,
        })
    }
}

/// Redis when reachable, then the configured file, then memory.
async fn progress_store(config: &ClientConfig) -> ProgressStore {
    if config.redis_url.is_some() {
        let redis = RedisCache::new(config.redis_url.as_deref(), PROGRESS_NAMESPACE);
        if redis.is_available().await {
            return ProgressStore::redis(redis);
        }
        warn!("redis unavailable, falling back to local progress store");
    }
    match &config.progress_file {
        Some(path) => ProgressStore::file(path),
        None => ProgressStore::memory(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    let config = ClientConfig::from_env()?;

    let tracker = CompletionTracker::new(progress_store(&config).await);
    let client = Arc::new(ContentClient::new(&config)?);
    info!(
        base_url = %client.base_url(),
        progress = tracker.backend(),
        "configuration loaded"
    );

    let mut app = App::new(client, tracker, config.restricted_origin);
    app.start(&args.url).await?;

    for step in &args.steps {
        let (element, handled) = match step {
            Step::Click(id) => (id, app.click(id).await),
            Step::Type { input, text } => (input, app.type_into(input, text).await),
        };
        if !handled {
            warn!(element = %element, "no listener for scripted step");
        }
    }

    info!(requests = app.client().request_count(), "done");
    println!("{}", app.document().to_html());
    Ok(())
}
