//! Transport abstraction: opaque request bytes in, opaque response bytes out.
//!
//! The connector never touches the network itself. Anything implementing [`Transport`] can
//! carry its requests; [`HttpTransport`] is the stock implementation for polling nodes over
//! HTTP.

use async_trait::async_trait;
use bytes::Bytes;

pub mod errors;
pub mod http;

pub use errors::TransportError;
pub use http::HttpTransport;

/// Carries one serialized request to a node and returns the raw response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `payload` and waits for the node's reply.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the exchange fails.
    async fn send(&self, payload: Bytes) -> Result<Bytes, TransportError>;
}
