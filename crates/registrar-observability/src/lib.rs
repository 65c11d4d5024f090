//! Registrar Observability
//!
//! Tracing subscriber setup and HTTP request logging.
//!
//! # Features
//!
//! - `observability` (default): adds a daily-rolling JSON log file under
//!   `LOG_DIR` next to the console output. Without it only
//!   [`init_basic_console_logging`] is available.
//!
//! # Example
//!
//! ```no_run
//! use registrar_observability::init_tracing;
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     // ... application code ...
//! }
//! ```

pub mod basic_logging;
pub mod middleware;

#[cfg(feature = "observability")]
pub mod logging;

pub use basic_logging::init_basic_console_logging;
pub use middleware::logging_middleware;

#[cfg(feature = "observability")]
pub use logging::init_tracing;

/// Console-only fallback when the feature is compiled out.
#[cfg(not(feature = "observability"))]
pub fn init_tracing() {
    init_basic_console_logging();
}

/// Default `EnvFilter` directives when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "registrar=info,tower_http=warn,sqlx=warn";
