//! Stateful log-polling connector.
//!
//! A [`LogConnector`] owns a [`FilterQuery`] whose `from_block` acts as the polling cursor. One
//! cycle is strictly sequential:
//!
//! ```text
//! probe_request() ──► transport ──► parse_probe_response()     (once, seeds the cursor)
//!
//! fetch_request() ──► transport ──► parse_fetch_response()     (repeatedly)
//!       ▲                                    │
//!       └──────── cursor (from_block) ◄──────┘  advanced past the highest block seen
//! ```
//!
//! Request construction is pure; the cursor is only written by the parse operations, which take
//! `&mut self`. Sharing one connector between tasks therefore requires an external lock.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{chain::Chain, config::SubscriptionConfig, filter::FilterQuery, types::Event};

pub mod cursor;
pub mod request;
pub mod response;

pub use request::RequestBuilder;
pub use response::{ResponseError, ResponseInterpreter};

/// How the connector talks to the node.
///
/// Only [`ConnectionKind::Rpc`] polls and therefore probes and tracks a cursor. A push
/// subscription receives logs as they are produced and needs neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    /// Request/response polling over JSON-RPC.
    #[default]
    Rpc,
    /// Persistent socket with pushed notifications.
    WebSocket,
}

impl ConnectionKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rpc => "rpc",
            Self::WebSocket => "websocket",
        }
    }
}

impl std::fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log connector for one node and one filter.
#[derive(Debug)]
pub struct LogConnector<C: Chain> {
    query: FilterQuery,
    kind: ConnectionKind,
    requests: RequestBuilder<C>,
    responses: ResponseInterpreter<C>,
}

impl<C: Chain> LogConnector<C> {
    #[must_use]
    pub fn new(query: FilterQuery, kind: ConnectionKind) -> Self {
        Self {
            query,
            kind,
            requests: RequestBuilder::new(kind),
            responses: ResponseInterpreter::new(kind),
        }
    }

    /// Creates a connector whose filter comes from a subscription config.
    #[must_use]
    pub fn from_subscription(config: &SubscriptionConfig, kind: ConnectionKind) -> Self {
        Self::new(FilterQuery::from_subscription(config), kind)
    }

    #[must_use]
    pub fn kind(&self) -> ConnectionKind {
        self.kind
    }

    #[must_use]
    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    /// Current cursor: where the next poll starts. Empty until seeded or advanced.
    #[must_use]
    pub fn cursor(&self) -> &str {
        &self.query.from_block
    }

    /// Serialized logs request reflecting the current cursor, or `None` if there is nothing to
    /// send.
    #[must_use]
    pub fn fetch_request(&self) -> Option<Bytes> {
        self.requests.fetch_request(&self.query)
    }

    /// Serialized connectivity probe; `None` unless polling.
    #[must_use]
    pub fn probe_request(&self) -> Option<Bytes> {
        self.requests.probe_request()
    }

    /// Seeds the cursor from the probe response.
    ///
    /// # Errors
    ///
    /// Returns a [`ResponseError`] if the response cannot be decoded.
    pub fn parse_probe_response(&mut self, data: &[u8]) -> Result<(), ResponseError> {
        self.responses.parse_probe(data, &mut self.query)
    }

    /// Extracts events from a logs response, advancing the cursor.
    ///
    /// # Errors
    ///
    /// Returns a [`ResponseError`] if the response cannot be decoded at all. An empty batch is
    /// `Ok(vec![])`.
    pub fn parse_fetch_response(&mut self, data: &[u8]) -> Result<Vec<Event>, ResponseError> {
        self.responses.parse_fetch(data, &mut self.query)
    }
}
