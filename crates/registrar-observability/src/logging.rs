use std::fs;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::DEFAULT_FILTER;

pub const DEFAULT_LOG_DIR: &str = "storage/logs";

/// Installs console logging plus a daily-rolling JSON file under `LOG_DIR`
/// (default `storage/logs`). If the directory cannot be created the file
/// layer is skipped and a warning is logged.
pub fn init_tracing() {
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());

    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let dir_error = fs::create_dir_all(&log_dir).err();

    let json_layer = dir_error.is_none().then(|| {
        let json_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "registrar.json");
        fmt::layer()
            .json()
            .with_writer(json_appender)
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(EnvFilter::new("info"))
    });

    if tracing_subscriber::registry()
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .is_err()
    {
        eprintln!("tracing subscriber already installed");
        return;
    }

    match dir_error {
        None => tracing::info!(log_dir = %log_dir, "tracing initialized with JSON file logging"),
        Some(e) => tracing::warn!(
            log_dir = %log_dir,
            error = %e,
            "cannot create log directory, logging to console only"
        ),
    }
}
