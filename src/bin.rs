//! Binary entry point for `issue-labeler`.
//!
//! This module provides the command-line interface for issue-labeler with options
//! for a configuration file, logging verbosity, and trace export. It reads the
//! action inputs and runner context, runs a single labeling pass, and reports
//! failures to the runner.

use std::process::ExitCode;

use clap::Parser;
use issue_labeler::{
    base::{config::Config, types::Void},
    service::action::{self, ActionContext},
};
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Issue-labeler – label GitHub issues with OpenAI.
///
/// Configuration comes from the action inputs (`INPUT_*` environment variables),
/// optionally layered over a TOML file. The runner context (`GITHUB_REPOSITORY`,
/// `GITHUB_EVENT_PATH`, ...) is read from the environment.
#[derive(Parser, Debug)]
#[command(version, author, about, long_about = None)]
struct Args {
    /// Config file to load underneath the action inputs (optional).
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: INFO level
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Export spans over OTLP/HTTP (configured via the `OTEL_EXPORTER_OTLP_*` variables).
    #[arg(long)]
    otlp: bool,
}

/// Main entry point for the issue-labeler binary.
///
/// Any failure is written as an `::error::` workflow command and the process exits non-zero.
#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            action::set_failed(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

/// Sets up logging, loads configuration and context, and labels the issue.
async fn run(args: Args) -> Void {
    init_tracing(args.verbose, args.otlp)?;

    let config = Config::load(args.config.as_deref())?;
    let context = ActionContext::from_env()?;

    issue_labeler::start(config, context).await?;

    Ok(())
}

fn init_tracing(verbose: u8, otlp: bool) -> Void {
    // Construct the level filter.

    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer.
    // Stdout carries workflow commands, so logs go to stderr.

    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    // Prepare the otlp layer.

    let otel = if otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("issue-labeler");

        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(stderr).try_init()?;

    Ok(())
}
