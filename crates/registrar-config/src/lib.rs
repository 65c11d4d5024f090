//! # Registrar Config
//!
//! Configuration types for the registrar API, loaded from environment
//! variables (call `dotenvy::dotenv()` first in binaries):
//!
//! - [`app`]: listen port and startup switches
//! - [`jwt`]: token signing secret
//! - [`cors`]: allowed browser origins
//! - [`password`]: bcrypt cost factor
//!
//! # Example
//!
//! ```ignore
//! use registrar_config::{AppConfig, CorsConfig, JwtConfig, PasswordConfig};
//!
//! let app = AppConfig::from_env();
//! let jwt = JwtConfig::from_env();
//! ```

pub mod app;
pub mod cors;
pub mod jwt;
pub mod password;

pub use app::AppConfig;
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use password::PasswordConfig;
