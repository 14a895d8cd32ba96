//! vaani - line-oriented voice command driver.
//!
//! Reads one transcribed utterance per line from stdin (or a single
//! utterance from the command line), resolves it, runs the matching
//! handlers and prints the spoken reply. Due alarms and reminders are
//! printed as they fire.
//!
//! # Configuration
//!
//! - `VAANI_CONFIG` - Optional TOML/JSON/YAML config file
//! - `VAANI_STORE_PATH`, `VAANI_POLL_INTERVAL_SECS`, `VAANI_CONFIDENCE_THRESHOLD`,
//!   `VAANI_TAXONOMY_PATH`, `VAANI_ENABLE_TIMEKEEPER` - used when no file is given
//! - `RUST_LOG` - log filter (logs go to stderr)

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vaani_core::{
    BackgroundRuntime, CommandResolver, Devices, Dispatcher, FireHandler, FiredEvent, VaaniConfig,
    VaaniResult,
};

/// Prints fired events to stdout.
struct ConsoleFireHandler;

#[async_trait]
impl FireHandler for ConsoleFireHandler {
    async fn fire(&self, fired: &FiredEvent) -> VaaniResult<()> {
        println!("{}", alert_line(fired));
        Ok(())
    }
}

fn alert_line(fired: &FiredEvent) -> String {
    format!("⏰ {}", fired.event.message)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn load_config() -> Result<VaaniConfig> {
    match std::env::var("VAANI_CONFIG") {
        Ok(path) if !path.trim().is_empty() => VaaniConfig::from_file(path.trim())
            .with_context(|| format!("failed to load config from {}", path.trim())),
        _ => {
            let config = VaaniConfig::from_env();
            config.validate()?;
            Ok(config)
        }
    }
}

async fn respond(resolver: &CommandResolver, dispatcher: &Dispatcher, utterance: &str) {
    let matches = resolver.resolve(utterance);
    for m in &matches {
        debug!(segment = %m.segment, intent = %m.intent, confidence = m.confidence, "Resolved");
    }

    let outcome = dispatcher.dispatch(&matches).await;
    if !outcome.is_silent() {
        println!("{}", outcome.spoken);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing to stderr (stdout carries replies)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let config = load_config()?;
    let resolver =
        CommandResolver::with_taxonomy(config.load_taxonomy()?, config.confidence_threshold);

    let mut runtime = BackgroundRuntime::new(config).await?;
    if runtime.timekeeper().is_some() {
        runtime.spawn_fire_handler(Arc::new(ConsoleFireHandler))?;
    }
    runtime.start().await?;
    info!(store = %runtime.config().store_path.display(), "vaani ready");

    let dispatcher = Dispatcher::standard(Devices::simulated(), runtime.store());

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        respond(&resolver, &dispatcher, &args.join(" ")).await;
    } else {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) if line.trim().is_empty() => continue,
                    Some(line) => respond(&resolver, &dispatcher, &line).await,
                    None => break,
                },
                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }
    }

    runtime.shutdown().await?;
    Ok(())
}
