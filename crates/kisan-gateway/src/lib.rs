//! Kisan Gateway - HTTP boundary for the advisory operations
//!
//! Exposes the [`kisan_core::Advisor`] operations to the presentation layer
//! as JSON endpoints. Every advisory endpoint answers `200 OK` with an
//! `OperationOutcome` body, so clients branch on `success` / `error` rather
//! than on status codes.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │                   Kisan Gateway                    │
//! ├────────────────────────────────────────────────────┤
//! │  POST /api/crop-timing       ─┐                    │
//! │  POST /api/yield-prediction  ─┤                    │
//! │  POST /api/weather-advice    ─┼──► Advisor ──► Gemini
//! │  POST /api/speech            ─┘                    │
//! │  GET  /api/forecast · /api/languages · /health     │
//! └────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod gateway;

pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use gateway::{Gateway, GatewayState};

/// Gateway version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8787;

/// Default host
pub const DEFAULT_HOST: &str = "127.0.0.1";
