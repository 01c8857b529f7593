//! Remote client for the LeadDesk backend.
//!
//! Every network interaction goes through [`RemoteClient::call`], so success
//! and failure reach the controller in one shape:
//!
//! - JSON bodies are serialized and sent with a JSON content type
//! - response bodies are parsed when they are JSON; empty or non-JSON bodies
//!   become an absent payload rather than an error
//! - non-success statuses become [`ClientError::Request`] carrying the
//!   backend's `error`/`detail` message, the status and the raw payload
//!
//! The wire itself sits behind the [`Transport`] trait. [`HttpTransport`]
//! talks to a real backend; tests substitute an in-memory one.

pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::RemoteClient;
pub use error::{ClientError, Result};
pub use http::HttpTransport;
pub use transport::{ApiRequest, Method, RawResponse, Transport};
pub use types::{ChatReply, HealthStatus};
