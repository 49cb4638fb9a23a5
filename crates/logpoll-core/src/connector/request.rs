//! Request envelopes for the logs and probe calls.

use bytes::Bytes;
use serde_json::json;
use std::{borrow::Cow, marker::PhantomData};
use tracing::{trace, warn};

use super::ConnectionKind;
use crate::{
    chain::Chain,
    filter::FilterQuery,
    types::{JsonRpcRequest, DEFAULT_REQUEST_ID},
    utils::block_param::LATEST_STATE,
};

/// Builds serialized JSON-RPC requests for a chain dialect.
///
/// Building never mutates the query it is given. Failures are logged and reported as "nothing
/// to send" rather than propagated; the caller simply skips the cycle.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<C: Chain> {
    kind: ConnectionKind,
    _chain: PhantomData<C>,
}

impl<C: Chain> RequestBuilder<C> {
    #[must_use]
    pub fn new(kind: ConnectionKind) -> Self {
        Self { kind, _chain: PhantomData }
    }

    /// Resolves the query actually sent on the wire.
    ///
    /// A polling connector without a cursor starts at the chain's current executed state, so the
    /// first poll does not replay history from genesis. The stored query is left untouched.
    #[must_use]
    pub fn effective_query<'a>(&self, query: &'a FilterQuery) -> Cow<'a, FilterQuery> {
        match self.kind {
            ConnectionKind::Rpc if query.from_block.is_empty() => Cow::Owned(FilterQuery {
                from_block: LATEST_STATE.to_string(),
                ..query.clone()
            }),
            ConnectionKind::Rpc | ConnectionKind::WebSocket => Cow::Borrowed(query),
        }
    }

    /// Builds the logs request for `query`, or `None` if it cannot be encoded.
    #[must_use]
    pub fn fetch_request(&self, query: &FilterQuery) -> Option<Bytes> {
        let query = self.effective_query(query);

        let filter = match query.encode() {
            Ok(filter) => filter,
            Err(e) => {
                warn!(chain = C::NAME, error = %e, "failed to encode log filter");
                return None;
            }
        };

        let params = match serde_json::to_value([filter]) {
            Ok(params) => params,
            Err(e) => {
                warn!(chain = C::NAME, error = %e, "failed to serialize log filter");
                return None;
            }
        };

        trace!(method = C::LOGS_METHOD, from_block = %query.from_block, "built logs request");
        let request = JsonRpcRequest::new(C::LOGS_METHOD, Some(params), json!(DEFAULT_REQUEST_ID));
        Self::serialize(&request)
    }

    /// Builds the connectivity probe, which also reports the current chain height.
    ///
    /// Only a polling connector probes; any other connection kind returns `None`.
    #[must_use]
    pub fn probe_request(&self) -> Option<Bytes> {
        match self.kind {
            ConnectionKind::Rpc => {
                let request =
                    JsonRpcRequest::new(C::HEIGHT_METHOD, None, json!(DEFAULT_REQUEST_ID));
                Self::serialize(&request)
            }
            ConnectionKind::WebSocket => None,
        }
    }

    fn serialize(request: &JsonRpcRequest) -> Option<Bytes> {
        serde_json::to_vec(request)
            .map(Bytes::from)
            .map_err(|e| warn!(method = %request.method, error = %e, "failed to serialize request"))
            .ok()
    }
}
