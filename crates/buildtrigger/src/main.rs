//! Build Trigger CLI
//!
//! The `buildtrigger` command files one tracking issue per release stream and
//! notifies the build system that a component tag is ready to build.
//!
//! ## Commands
//!
//! - `trigger`: Validate a build request and dispatch it
//! - `streams`: List the registered release streams
//! - `parse-tag`: Derive repository and tag from a tag URL

mod input;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn, Level};

use trigger_core::config::{
    parse_cc_list, DEFAULT_JIRA_URL, ENV_CC, ENV_JIRA_KEY, ENV_JIRA_URL, ENV_MODE, ENV_PUBLISH_URL,
    ENV_STREAMS_FILE,
};
use trigger_core::{
    BuildPublisher, BuildTriggerDispatcher, ExecutionMode, IssueSubmission, LogBuildPublisher,
    StreamRegistry, TriggerConfig, TriggerError, UNKNOWN_IDENTITY,
};
use trigger_http::{parse_tag_url, JiraConfig, JiraRestClient, WebhookBuildPublisher};

#[derive(Parser)]
#[command(name = "buildtrigger")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Trigger component builds and file their tracking issues", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

/// Runtime settings, each backed by an environment variable.
#[derive(Args, Debug, Clone)]
struct Settings {
    /// Execution mode: prod, dev or test (only prod files real issues)
    #[arg(long, global = true, env = ENV_MODE, default_value = "dev")]
    mode: ExecutionMode,

    /// Issue tracker base URL
    #[arg(long, global = true, env = ENV_JIRA_URL, default_value = DEFAULT_JIRA_URL)]
    jira_url: String,

    /// Issue tracker bearer token
    #[arg(long, global = true, env = ENV_JIRA_KEY, hide_env_values = true)]
    jira_key: Option<String>,

    /// Build system endpoint for trigger events (events are logged when unset)
    #[arg(long, global = true, env = ENV_PUBLISH_URL)]
    publish_url: Option<String>,

    /// JSON file replacing the built-in stream table
    #[arg(long, global = true, env = ENV_STREAMS_FILE)]
    streams_file: Option<PathBuf>,

    /// Comma-separated tracker usernames copied on every issue
    #[arg(long, global = true, env = ENV_CC)]
    cc: Vec<String>,
}

impl From<Settings> for TriggerConfig {
    fn from(settings: Settings) -> Self {
        TriggerConfig {
            mode: settings.mode,
            jira_url: settings.jira_url,
            jira_key: settings.jira_key.filter(|k| !k.trim().is_empty()),
            publish_url: settings.publish_url.filter(|u| !u.trim().is_empty()),
            streams_file: settings.streams_file,
            cc: settings.cc.iter().flat_map(|raw| parse_cc_list(raw)).collect(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a build request, file its issues and trigger the build
    Trigger {
        /// Request JSON file, or `-` for stdin
        #[arg(short, long)]
        request: PathBuf,

        /// Requester email used to pick the issue assignee
        #[arg(short, long)]
        email: Option<String>,
    },

    /// List the registered release streams
    Streams,

    /// Derive repository URL and tag from a tag URL
    ParseTag {
        /// Tag URL, e.g. https://github.com/org/repo/releases/tag/1.0.0
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    trigger_core::init_tracing(cli.json, level);

    let config = TriggerConfig::from(cli.settings);

    match cli.command {
        Commands::Trigger { request, email } => {
            let summary = cmd_trigger(&config, &request, email.as_deref()).await?;
            println!("{}", summary);
            Ok(())
        }
        Commands::Streams => cmd_streams(&config),
        Commands::ParseTag { url } => cmd_parse_tag(&url),
    }
}

async fn cmd_trigger(
    config: &TriggerConfig,
    request_path: &Path,
    email: Option<&str>,
) -> Result<String> {
    let fields = input::read_request(request_path)?;
    let registry = config
        .load_registry()
        .context("Failed to load stream registry")?;

    let mut jira_config = JiraConfig::new(&config.jira_url);
    if let Some(token) = &config.jira_key {
        jira_config = jira_config.with_token(token);
    }
    let tracker = Arc::new(JiraRestClient::new(jira_config).context("Invalid Jira URL")?);

    let publisher: Arc<dyn BuildPublisher> = match &config.publish_url {
        Some(url) => Arc::new(WebhookBuildPublisher::new(url).context("Invalid publish URL")?),
        None => Arc::new(LogBuildPublisher),
    };

    let dispatcher = BuildTriggerDispatcher::from_config(config, registry, tracker, publisher);
    info!(mode = %dispatcher.mode(), "Dispatching build request");

    let requester = email.unwrap_or(UNKNOWN_IDENTITY);
    let outcome = match dispatcher.trigger(fields, Some(requester)).await {
        Ok(outcome) => outcome,
        Err(e) if e.is_client_error() => {
            anyhow::bail!("Build request rejected: {}", e);
        }
        Err(e @ TriggerError::Publish(_)) => {
            return Err(e).context("Failed to notify the build system");
        }
        Err(e) => return Err(e.into()),
    };

    let issues = match &outcome.issues {
        IssueSubmission::Submitted => format!("{} issue(s) created", outcome.issue_count),
        IssueSubmission::Suppressed => format!(
            "{} issue(s) logged, not created ({} mode)",
            outcome.issue_count, config.mode
        ),
        IssueSubmission::Failed(reason) => format!("issue creation failed: {}", reason),
    };
    Ok(format!(
        "{}\n  Streams: {}\n  Issues:  {}\n  Event:   {}",
        outcome.message(),
        outcome.streams.join(", "),
        issues,
        outcome.event_id
    ))
}

fn cmd_streams(config: &TriggerConfig) -> Result<()> {
    let registry = config
        .load_registry()
        .context("Failed to load stream registry")?;
    print!("{}", render_streams(&registry));
    Ok(())
}

fn render_streams(registry: &StreamRegistry) -> String {
    let mut out = format!(
        "{:<12} {:<16} {:<14} {}\n",
        "STREAM", "MACHINE LABEL", "PREFIX", "TARGET RELEASE"
    );
    for def in registry.iter() {
        out.push_str(&format!(
            "{:<12} {:<16} {:<14} {}\n",
            def.human_label, def.machine_label, def.title_prefix, def.target_release
        ));
    }
    out
}

fn cmd_parse_tag(url: &str) -> Result<()> {
    println!("{}", render_tag(url)?);
    Ok(())
}

/// Tag location plus the request fields it seeds, or a notice when the URL
/// names no tag.
fn render_tag(url: &str) -> Result<String> {
    match parse_tag_url(url) {
        Ok(location) => {
            let report = serde_json::json!({
                "location": location,
                "request": location.partial_fields(),
            });
            serde_json::to_string_pretty(&report).context("Failed to serialize tag location")
        }
        Err(e) => {
            warn!(error = %e, "Tag URL not recognised");
            Ok(format!(
                "No build information available for the given URL: {}",
                url.trim()
            ))
        }
    }
}
