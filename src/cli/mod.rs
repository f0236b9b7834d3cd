use crate::{
    config::ViewConfig,
    error::ViewError,
    extract::extract_value,
    message::{route_message, AssistantMessage},
};
use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use std::io::Read;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const FORMATS: [&str; 3] = ["html", "json", "route"];

/// CLI entry point for the dateplan-view tool
pub fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("dateplan-view")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract an embedded date plan from an assistant reply and render it")
        .arg(
            Arg::new("input")
                .help("File holding the assistant reply; `-` or absent reads stdin")
                .value_name("INPUT")
                .index(1),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Output: rendered html, extracted json, or the chosen view")
                .value_parser(FORMATS)
                .default_value("html"),
        )
        .arg(
            Arg::new("verify-checks")
                .long("verify-checks")
                .action(ArgAction::SetTrue)
                .help("Recompute plan checks and flag claims that do not hold"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .action(ArgAction::SetTrue)
                .help("Validate the payload against the JSON Schema"),
        )
        .arg(
            Arg::new("normalize")
                .long("normalize")
                .action(ArgAction::SetTrue)
                .help("Align itineraries and backfill meta, links and summary"),
        )
        .get_matches();

    // Flags override the environment
    let mut config = ViewConfig::from_env()?;
    config.verify_checks |= matches.get_flag("verify-checks");
    config.strict_schema |= matches.get_flag("strict");
    config.normalize |= matches.get_flag("normalize");
    debug!(target: "dateplan::cli", ?config, "resolved configuration");

    let input = matches.get_one::<String>("input").map(String::as_str);
    let content = read_input(input)?;
    info!(
        target: "dateplan::cli",
        bytes = content.len(),
        source = input.unwrap_or("-"),
        "read assistant reply"
    );

    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("html");

    match format {
        "json" => println!("{}", render_json(&content, &config)?),
        "route" => {
            let view = route_message(&AssistantMessage::new(content), &config);
            println!("{}", view.kind());
        }
        _ => {
            let view = route_message(&AssistantMessage::new(content), &config);
            println!("{}", view.to_html(&config));
        }
    }

    Ok(())
}

fn read_input(path: Option<&str>) -> anyhow::Result<String> {
    match path {
        None | Some("-") => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(ViewError::from)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
        Some(path) => std::fs::read_to_string(path)
            .map_err(ViewError::from)
            .with_context(|| format!("failed to read {path}")),
    }
}

/// The extracted payload pretty-printed, or an error payload when the reply
/// carries no date plan. Without normalisation the payload is echoed as found.
fn render_json(content: &str, config: &ViewConfig) -> anyhow::Result<String> {
    let view = route_message(&AssistantMessage::new(content), config);

    let value = match view.payload() {
        Some(response) => match (config.normalize, extract_value(content)) {
            (false, Some(payload)) => payload.into_value(),
            _ => serde_json::to_value(response)?,
        },
        None => {
            ViewError::Validation("no date plan found in input".to_string()).to_error_payload()
        }
    };

    Ok(serde_json::to_string_pretty(&value)?)
}
