//! Common utilities shared across services.
//!
//! This crate provides:
//! - Unified application error wrapping domain errors
//! - Configuration structures
//! - Tracing subscriber setup

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::*;
pub use error::{AppError, AppResult, ErrorResponse, OptionExt};
pub use telemetry::init_tracing;
