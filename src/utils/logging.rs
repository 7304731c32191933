use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_appender::non_blocking::WorkerGuard;
use anyhow::Result;

/// Installs the global `tracing` subscriber for the door sensor's diagnostics.
///
/// Events go to stdout, and additionally to `<dir>/vhpt-door-sensor_<date>.log` when `log_dir` is set.
/// `RUST_LOG` wins over `default_level`. Status lines written by the state machine show up here too, at
/// `info`, next to the dedicated status log.
///
/// Keep the returned guard alive until the process exits; dropping it stops the file writer.
pub fn init_logger(default_level: &str, log_dir: Option<PathBuf>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?;

    let format = fmt::format()
        .with_timer(fmt::time::LocalTime::rfc_3339())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if let Some(dir) = log_dir {
        let console_layer = fmt::Layer::default()
            .event_format(format.clone().with_ansi(true))
            .with_writer(std::io::stdout);

        std::fs::create_dir_all(&dir)?;

        let file_name = format!(
            "vhpt-door-sensor_{}.log",
            chrono::Local::now().format("%Y-%m-%d")
        );
        let file_appender = RollingFileAppender::new(Rotation::NEVER, &dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = fmt::Layer::default()
            .event_format(format)
            .with_writer(non_blocking);

        tracing::subscriber::set_global_default(subscriber.with(file_layer).with(console_layer))?;

        tracing::info!("Diagnostics written to stdout and {:?}", dir);
        Ok(Some(guard))
    } else {
        let console_layer = fmt::Layer::default()
            .event_format(format.clone().with_ansi(true))
            .with_writer(std::io::stdout);

        tracing::subscriber::set_global_default(subscriber.with(console_layer))?;

        tracing::info!("Diagnostics written to stdout only");
        Ok(None)
    }
}
