//! Interpretation of probe and logs responses.
//!
//! Envelope or result decoding failures are reported as a [`ResponseError`], distinct from a
//! successfully decoded batch that happens to be empty. Problems with a single record only drop
//! that record's contribution; they never fail the batch.

use std::marker::PhantomData;
use thiserror::Error;
use tracing::{debug, trace};

use super::{
    cursor::{self, Advance},
    ConnectionKind,
};
use crate::{
    chain::{Chain, LogEntry},
    filter::FilterQuery,
    types::{Event, JsonRpcResponse},
};

/// Errors produced while interpreting a node response
#[derive(Debug, Error)]
pub enum ResponseError {
    /// Payload is not a JSON-RPC response object.
    #[error("invalid response envelope: {0}")]
    InvalidEnvelope(#[source] serde_json::Error),

    /// Envelope decoded, but `result` does not have the expected shape.
    #[error("unexpected result shape: {0}")]
    InvalidResult(#[source] serde_json::Error),

    /// Envelope carries neither `result` nor `error`.
    #[error("response carries no result")]
    MissingResult,

    /// Node answered with a JSON-RPC error object.
    #[error("node returned error {code}: {message}")]
    Rpc { code: i32, message: String },
}

/// Decodes responses for a chain dialect and maintains the cursor of the query it is handed.
#[derive(Debug, Clone, Copy)]
pub struct ResponseInterpreter<C: Chain> {
    kind: ConnectionKind,
    _chain: PhantomData<C>,
}

impl<C: Chain> ResponseInterpreter<C> {
    #[must_use]
    pub fn new(kind: ConnectionKind) -> Self {
        Self { kind, _chain: PhantomData }
    }

    /// Seeds the cursor from a probe response.
    ///
    /// In polling mode the height string is stored verbatim as `query.from_block`. Other
    /// connection kinds never probe, so this is a no-op for them.
    ///
    /// # Errors
    ///
    /// Returns a [`ResponseError`] if the envelope or its string result cannot be decoded.
    pub fn parse_probe(&self, data: &[u8], query: &mut FilterQuery) -> Result<(), ResponseError> {
        match self.kind {
            ConnectionKind::Rpc => {
                let result = Self::decode_result(data)?;
                let height: String =
                    serde_json::from_value(result).map_err(ResponseError::InvalidResult)?;

                debug!(chain = C::NAME, height = %height, "cursor seeded from probe");
                query.from_block = height;
                Ok(())
            }
            ConnectionKind::WebSocket => Ok(()),
        }
    }

    /// Extracts normalized events from a logs response and advances the cursor.
    ///
    /// Each record is re-serialized into an [`Event`]; a record that fails to re-serialize is
    /// skipped. For every emitted record the cursor is offered `block_number + 1`, see
    /// [`cursor::advance`]. In push mode the envelope is validated and no events are returned.
    ///
    /// # Errors
    ///
    /// Returns a [`ResponseError`] if the envelope cannot be decoded, carries an error object,
    /// lacks a `result` member, or its result is neither `null` nor a list of log records.
    pub fn parse_fetch(
        &self,
        data: &[u8],
        query: &mut FilterQuery,
    ) -> Result<Vec<Event>, ResponseError> {
        debug!(chain = C::NAME, kind = %self.kind, bytes = data.len(), "parsing logs response");

        match self.kind {
            ConnectionKind::Rpc => {
                let result = Self::decode_result(data)?;
                // `"result": null` means no logs
                let logs: Vec<C::Log> = serde_json::from_value::<Option<_>>(result)
                    .map_err(ResponseError::InvalidResult)?
                    .unwrap_or_default();

                let mut events = Vec::with_capacity(logs.len());
                for log in &logs {
                    let payload = match serde_json::to_vec(log) {
                        Ok(payload) => payload,
                        Err(e) => {
                            debug!(error = %e, "skipping log that failed to serialize");
                            continue;
                        }
                    };
                    events.push(Event::new(payload));

                    match cursor::advance(&mut query.from_block, log.block_number()) {
                        Advance::Moved(next) => trace!(next, "cursor advanced"),
                        Advance::Unchanged => {}
                        Advance::InvalidBlockNumber => debug!(
                            block_number = log.block_number(),
                            "log has undecodable block number, cursor not advanced"
                        ),
                        Advance::UnreadableCursor => debug!(
                            cursor = %query.from_block,
                            "cursor is not numeric, not advanced"
                        ),
                    }
                }

                Ok(events)
            }
            ConnectionKind::WebSocket => {
                Self::decode_envelope(data)?;
                Ok(Vec::new())
            }
        }
    }

    fn decode_envelope(data: &[u8]) -> Result<JsonRpcResponse, ResponseError> {
        let response: JsonRpcResponse =
            serde_json::from_slice(data).map_err(ResponseError::InvalidEnvelope)?;
        if let Some(error) = response.error {
            return Err(ResponseError::Rpc { code: error.code, message: error.message });
        }
        Ok(response)
    }

    fn decode_result(data: &[u8]) -> Result<serde_json::Value, ResponseError> {
        Self::decode_envelope(data)?.result.ok_or(ResponseError::MissingResult)
    }
}
