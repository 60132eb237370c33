//! `jumpfsm` - Event-driven phase controller for legged-robot jumping

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use clap::Parser;
use tokio::signal::unix::{Signal, SignalKind, signal};
use tokio_util::sync::CancellationToken;

use jumpfsm::cli::args::Cli;
use jumpfsm::cli::commands;
use jumpfsm::error::ExitCode;
use jumpfsm::observability::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format.into(), cli.verbose, cli.color);
    }

    let cancel = CancellationToken::new();
    let signal_exit = Arc::new(AtomicI32::new(ExitCode::SUCCESS));

    // First signal stops the replay cleanly; a second one exits at once
    {
        let cancel = cancel.clone();
        let signal_exit = Arc::clone(&signal_exit);
        tokio::spawn(async move {
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(sigterm) => Some(sigterm),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to register SIGTERM handler");
                    None
                }
            };

            let code = tokio::select! {
                _ = tokio::signal::ctrl_c() => ExitCode::INTERRUPTED,
                () = terminated(sigterm.as_mut()) => ExitCode::TERMINATED,
            };
            signal_exit.store(code, Ordering::SeqCst);
            eprintln!("\nShutting down gracefully... (press Ctrl+C again to force)");
            cancel.cancel();

            tokio::select! {
                _ = tokio::signal::ctrl_c() => std::process::exit(ExitCode::INTERRUPTED),
                () = terminated(sigterm.as_mut()) => std::process::exit(ExitCode::TERMINATED),
            }
        });
    }

    let result = commands::dispatch(cli, cancel).await;

    match result {
        Ok(()) => std::process::exit(signal_exit.load(Ordering::SeqCst)),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}

/// Resolves on the next SIGTERM, or never if no handler is registered.
async fn terminated(sigterm: Option<&mut Signal>) {
    match sigterm {
        Some(sigterm) => {
            sigterm.recv().await;
        }
        None => std::future::pending().await,
    }
}
