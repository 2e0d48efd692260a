//! Spotbot automated spot-trading engine.
//!
//! The application wires the pieces together:
//! - filter cache and validator fed from the exchange gateway
//! - pair selection strategy driving the buy cycle
//! - execution matcher watching order books for entries and exits
//! - sell sweep task re-arming exit watches
//! - account stream feeding the event loop

pub mod app;
pub mod config;
pub mod error;
pub mod settings;

pub use app::{Application, EngineEvent};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use settings::EngineSettings;
