use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global tracing subscriber.
///
/// Logs always go to a daily rolling file under `log_dir`; `log_to_stdout`
/// adds a coloured console layer on stderr, keeping stdout free for command
/// output. The filter comes from `LOG_LEVEL` when it parses, otherwise from
/// `default_level`.
///
/// Keep the returned guard alive for as long as logs should be flushed.
pub fn init_logging(
    log_dir: &str,
    log_file: &str,
    default_level: &str,
    log_to_stdout: bool,
) -> WorkerGuard {
    fs::create_dir_all(log_dir).ok();

    let file_appender = rolling::daily(log_dir, log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = log_to_stdout.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
    });

    let env_filter =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(default_level));

    // try_init: a second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init();

    guard
}
