//! Middleware for the live transport and for logical requests.
//!
//! - [`LoggingLayer`] / [`Logging`] - logs exchanges with `tracing`; a tower
//!   layer for [`HyperTransport`](crate::HyperTransport) and a wrapper for any
//!   [`Transport`](courier_core::Transport)
//! - [`bearer_auth`] / [`basic_auth`] - steps for a
//!   [`Middleware<Endpoint>`](courier_core::Middleware) chain
//!
//! # Example
//!
//! ```no_run
//! use courier::middleware::{LoggingLayer, bearer_auth};
//! use courier::{ApiClient, HttpRequestClient, HyperTransport};
//!
//! let transport = HyperTransport::builder()
//!     .layer(LoggingLayer::new())
//!     .build();
//!
//! let api = ApiClient::new(HttpRequestClient::new(transport), "https://api.example.com")
//!     .unwrap()
//!     .with_step(bearer_auth("my-token"));
//! ```

mod auth;
mod logging;

pub use auth::{basic_auth, bearer_auth};
pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
