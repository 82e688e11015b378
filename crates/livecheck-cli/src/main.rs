//! `livecheck`: preview a live stream and run one remote analysis against it.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use livecheck::config::{BASE_URL_ENV, TIMEOUT_ENV};
use livecheck::observability::init_observability;
use livecheck::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "livecheck", version, about = "Live stream preview and one-shot match analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the embeddable preview URL for a stream link.
    Preview {
        /// Stream link, e.g. https://www.youtube.com/live/<id>
        url: String,
    },
    /// Send one analysis request for a stream and print the result.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Stream link sent to the analysis service.
    #[arg(long)]
    url: String,
    /// Bearer token for the analysis service.
    #[arg(long, env = "TRIO_API_KEY", hide_env_values = true)]
    api_key: String,
    /// Overrides TRIO_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,
    /// Overrides TRIO_TIMEOUT_SECS.
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Overrides the built-in analysis instruction.
    #[arg(long)]
    condition: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_observability();

    let cli = Cli::parse();
    match cli.command {
        Command::Preview { url } => Ok(preview(&url)),
        Command::Check(args) => check(args).await,
    }
}

fn preview(url: &str) -> ExitCode {
    match resolve(url) {
        Some(reference) => {
            println!("{}", reference.embed_url());
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("no preview available for {url:?}");
            ExitCode::FAILURE
        }
    }
}

async fn check(args: CheckArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut config = ServiceConfig::from_env()?;
    if let Some(base_url) = args.base_url {
        config = config.base_url(base_url);
    }
    if let Some(secs) = args.timeout_secs {
        if secs == 0 {
            return Err(format!("--timeout-secs (or {TIMEOUT_ENV}) must be greater than 0").into());
        }
        config = config.timeout(Duration::from_secs(secs));
    }
    tracing::debug!(
        event = "cli.config_loaded",
        domain = "cli",
        has_base_url = config.base_url.is_some(),
        base_url_env = BASE_URL_ENV,
        timeout_secs = config.timeout.map(|t| t.as_secs())
    );

    let mut builder = AnalysisController::builder(config);
    if let Some(condition) = args.condition {
        builder = builder.condition(condition);
    }
    let controller = builder.build()?;

    match preview_url(&args.url) {
        Some(embed) => println!("Preview: {embed}"),
        None => println!("Preview: unavailable"),
    }

    let submission = match controller.submit(&args.url, &Credential::new(args.api_key)) {
        Ok(submission) => submission,
        Err(CheckError::Config(_)) => {
            eprintln!("{}", controller.output());
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };
    let printed = controller.output();
    print!("{printed}");

    let wait = submission.wait();
    tokio::pin!(wait);
    let outcome = tokio::select! {
        outcome = &mut wait => outcome,
        _ = tokio::signal::ctrl_c() => {
            controller.cancel();
            wait.await
        }
    };

    // Failures and cancellation append to what is already on screen.
    let output = controller.output();
    let rest = output.strip_prefix(printed.as_str()).unwrap_or(&output);
    match outcome {
        AnalysisOutcome::Succeeded { .. } | AnalysisOutcome::Cancelled => {
            println!("{}", rest.trim_start());
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            eprintln!("{}", rest.trim_start());
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn check_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "livecheck",
            "check",
            "--url",
            "https://youtu.be/abc",
            "--api-key",
            "k",
            "--base-url",
            "http://localhost:8000",
            "--timeout-secs",
            "30",
        ])
        .expect("parse");
        let Command::Check(args) = cli.command else {
            panic!("expected check subcommand");
        };
        assert_eq!(args.url, "https://youtu.be/abc");
        assert_eq!(args.base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(args.timeout_secs, Some(30));
        assert_eq!(args.condition, None);
    }

    #[test]
    fn preview_requires_a_url() {
        assert!(Cli::try_parse_from(["livecheck", "preview"]).is_err());
    }
}
