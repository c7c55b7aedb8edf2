//! Main entry point for sigrip CLI

use std::collections::HashMap;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use sigrip::cli::args::Args;
use sigrip::cli::output::OutputFormatter;
use sigrip::error::SigripError;
use sigrip::platform::client::WebClient;
use sigrip::platform::player::{locate_player_reference, AlgorithmExtractor};
use sigrip::platform::procedure::{decode, Procedure};
use sigrip::utils::url::is_http_url;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging()?;

    // Parse command line arguments
    let args = Args::parse();

    info!("Starting sigrip with args: {:?}", args);

    // Initialize output formatter
    let formatter = OutputFormatter::new(args.verbosity_level()).with_json(args.json);

    if let Err(e) = run(&args, &formatter).await {
        formatter.error(&format!("{:#}", e));
        if let Some(source) = e.downcast_ref::<SigripError>() {
            if source.is_interpreter() {
                formatter.warning(
                    "The notation no longer matches this signature; the player algorithm may have changed",
                );
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(args: &Args, formatter: &OutputFormatter) -> anyhow::Result<()> {
    // Offline mode: replay a known algorithm without touching the network
    if let Some(algorithm) = &args.algorithm {
        let signature = args
            .signature
            .as_deref()
            .ok_or_else(|| anyhow!("--algorithm requires --signature"))?;
        return transform_signature(args, formatter, algorithm, signature);
    }

    let page_url = args
        .url
        .as_deref()
        .ok_or_else(|| anyhow!("provide a page URL, or --algorithm with --signature"))?;
    if !is_http_url(page_url) {
        bail!("not an http(s) URL: {}", page_url);
    }

    let extractor = AlgorithmExtractor::with_client(WebClient::with_config(args.http_config()));

    let page = extractor
        .client()
        .get(page_url, &HashMap::new())
        .await
        .with_context(|| format!("failed to fetch {}", page_url))?;

    let reference = locate_player_reference(&page)?
        .ok_or_else(|| anyhow!("no versioned player script referenced by {}", page_url))?;
    info!(
        "Player script version {} at {}",
        reference.version, reference.url
    );

    if args.player_version {
        formatter.print_player_reference(&reference);
        return Ok(());
    }

    let algorithm = extractor
        .algorithm_from_page(&page)
        .await?
        .ok_or_else(|| anyhow!("player script has no signature transformer entry point"))?;

    match args.signature.as_deref() {
        Some(signature) => {
            formatter.info(&format!("Player version: {}", reference.version));
            formatter.info(&format!("Algorithm: {}", algorithm));
            transform_signature(args, formatter, &algorithm, signature)
        }
        None => {
            formatter.print_algorithm(&reference, &algorithm);
            Ok(())
        }
    }
}

/// Apply `algorithm` to `signature` and print the result
fn transform_signature(
    args: &Args,
    formatter: &OutputFormatter,
    algorithm: &str,
    signature: &str,
) -> anyhow::Result<()> {
    match args.stream_url.as_deref() {
        Some(stream_url) => {
            let decoded = decode(stream_url, signature, algorithm)?;
            formatter.print_decoded_url(&decoded);
        }
        None => {
            let procedure: Procedure = algorithm.parse()?;
            let transformed = procedure.apply(signature)?;
            formatter.print_transformed_signature(&transformed);
        }
    }
    Ok(())
}

/// Initialize logging system
fn init_logging() -> anyhow::Result<()> {
    // Get log level from environment or default to info
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    // Parse log level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();

    Ok(())
}
