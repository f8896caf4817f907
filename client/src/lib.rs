//! SpreadScope Client Library
//!
//! Wires the converter and the spread feed to the backend's HTTP API and
//! reports every change to a [`ViewSink`].

pub mod client;
pub mod config;
pub mod connection;
pub mod handler;
pub mod metrics;

pub use client::SpreadScopeClient;
pub use config::ClientConfig;
pub use connection::{ApiConnection, HealthStatus};
pub use handler::{CallbackSink, LoggingSink, SinkRenderer, ViewSink};
pub use metrics::{ClientMetrics, MetricsSnapshot};
