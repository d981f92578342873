//! emma: conversational assistant front end
//!
//! Wires the console stand-ins for keyboard, voice, shell and canned replies
//! into a session and drives it turn by turn:
//! - Turn loop runs on a blocking thread (speech and keyboard calls block)
//! - Connectivity probe keeps the internet flag current
//! - SIGINT/SIGTERM end the process

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use emma::capability::{
    CannedResponder, Capabilities, ConsoleVoice, FileLog, StdTerminal, SystemShell, TracingLog,
    TurnLog,
};
use emma::lifecycle::{ConnectivityProbe, ShutdownSignal};
use emma::{driver, Config, SessionContext};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they don't interleave with the conversation
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "emma starting");

    let config = Config::load()?;
    config.ensure_dirs()?;
    info!(
        ?config.log_file,
        lang = %config.spoken_language,
        initial_state = %config.initial_state,
        "configuration loaded"
    );

    let shutdown = ShutdownSignal::new();

    // Written by the probe, read by the dispatcher
    let connectivity = Arc::new(AtomicBool::new(false));
    let probe = ConnectivityProbe::new(
        config.probe_addr.clone(),
        config.probe_interval,
        Arc::clone(&connectivity),
    );
    let probe_task = tokio::spawn(probe.run());

    let driver_config = config.clone();
    let driver_task = tokio::task::spawn_blocking(move || -> Result<()> {
        let capabilities = build_capabilities(&driver_config)?;
        let mut session = SessionContext::standard(
            driver_config.initial_state,
            driver_config.spoken_language.clone(),
            capabilities,
            connectivity,
        );
        driver::run(&mut session)?;
        Ok(())
    });

    tokio::select! {
        result = driver_task => {
            probe_task.abort();
            result.context("driver task panicked")??;
            info!("emma stopped");
            Ok(())
        }

        result = shutdown.wait() => {
            let code = match result {
                Ok(()) => {
                    info!("shutdown signal received");
                    0
                }
                Err(e) => {
                    error!(?e, "failed to install signal handlers");
                    1
                }
            };
            probe_task.abort();
            info!("emma stopped");
            // The driver thread may be parked on a blocking read; don't wait for it
            std::process::exit(code);
        }
    }
}

fn build_capabilities(config: &Config) -> Result<Capabilities> {
    let log: Box<dyn TurnLog> = match &config.log_file {
        Some(path) => {
            let log = FileLog::open(path)
                .with_context(|| format!("failed to open turn log {}", path.display()))?;
            info!(path = ?log.path(), "turn log opened");
            Box::new(log)
        }
        None => Box::new(TracingLog::new()),
    };

    Ok(Capabilities {
        terminal: Box::new(StdTerminal::new()),
        voice: Box::new(ConsoleVoice::new(config.spoken_language.clone())),
        log,
        shell: Box::new(SystemShell::new()),
        responder: Box::new(CannedResponder::new()),
    })
}
