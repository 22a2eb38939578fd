//! Sticker picker binary entrypoint kept minimal. The host lives in `args::host`.

use std::fmt::{self, Write as _};
use std::sync::OnceLock;

use clap::Parser;

use stickerpicker::args::{self, Args};

struct PickerTimer;

impl tracing_subscriber::fmt::time::FormatTime for PickerTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let ts = chrono::Local::now().format("%Y-%m-%d-T %H:%M:%S");
        write!(w, "{ts}")
    }
}

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// What: Initialize tracing, writing to the log file or falling back to stderr.
///
/// Details:
/// - `RUST_LOG` wins over the level from the command line.
fn init_logging(level: &str) {
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level))
    };
    let log_dir = stickerpicker::theme::logs_dir();
    let log_path = log_dir.join("stickerpicker.log");
    let opened = std::fs::create_dir_all(&log_dir).and_then(|()| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
    });
    match opened {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_timer(PickerTimer)
                .init();
            let _ = LOG_GUARD.set(guard);
            tracing::info!(path = %log_path.display(), "logging initialized");
        }
        Err(e) => {
            // Fallback: stderr logger so startup never blocks on the log file
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_ansi(true)
                .with_writer(std::io::stderr)
                .with_timer(PickerTimer)
                .init();
            tracing::warn!(error = %e, "failed to open log file; using stderr");
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    init_logging(&args::determine_log_level(&args));

    tracing::info!("Sticker picker starting");
    let code = match args::run(&args).await {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!(error = %err, "Application error");
            eprintln!("error: {err}");
            1
        }
    };
    tracing::info!("Sticker picker exited");
    if code != 0 {
        std::process::exit(code);
    }
}
