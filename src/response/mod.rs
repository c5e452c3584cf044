//! The `{status, message, data}` envelope shared by API handlers and clients.
//!
//! Handlers build envelopes with [`create_response`] (or the
//! [`ResponseEnvelope::success`] / [`ResponseEnvelope::fail`] shorthands) and
//! return them directly from axum. Callers on the other side of the wire hand
//! the pending request to [`parse_api_response`], which always yields an
//! envelope and never an error.

pub mod envelope;
pub mod transport;
pub mod unwrap;

pub use envelope::{create_response, ResponseEnvelope, ResponseStatus};
pub use transport::{TransportError, TransportResponse};
pub use unwrap::{parse_api_response, DEFAULT_ERROR_MESSAGE};
