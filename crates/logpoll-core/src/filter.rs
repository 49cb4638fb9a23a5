//! Log filter query and its wire encoding.
//!
//! A [`FilterQuery`] selects logs either by a block range (`from_block`..`to_block`) or by an
//! exact block hash, never both. Range bounds are kept as raw strings: they may hold a hex or
//! decimal number, a symbolic tag, or nothing at all (meaning "use the default").
//!
//! # Topic matching
//!
//! Each event has an ordered list of topics. `topics[i]` constrains position `i`:
//!
//! ```text
//! []                 matches any topic list
//! [[A]]              A in first position
//! [[], [B]]          anything in first position AND B in second position
//! [[A], [B]]         A in first position AND B in second position
//! [[A, B], [C, D]]   (A OR B) in first position AND (C OR D) in second position
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::{
    chain::LogEntry,
    config::SubscriptionConfig,
    types::Hash32,
    utils::block_param::{GENESIS_QUANTITY, LATEST},
};

/// Errors raised while encoding a filter query
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("cannot specify both blockHash and fromBlock/toBlock")]
    ConflictingRange,
}

/// Matching criteria for a log query.
///
/// `from_block` doubles as the polling cursor: the connector owning the query advances it as
/// responses come in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    /// Return logs only from the block with this hash.
    pub block_hash: Option<Hash32>,
    /// Beginning of the queried range; empty means genesis.
    pub from_block: String,
    /// End of the queried range; empty means latest.
    pub to_block: String,
    /// Restricts matches to events emitted by these contracts; empty matches any.
    pub addresses: Vec<String>,
    /// Positional topic alternatives, see the module docs.
    pub topics: Vec<Vec<String>>,
}

/// Encoded form of a [`FilterQuery`], serialized as the single positional parameter of a
/// logs request.
///
/// Empty address lists, empty topic lists and empty alternative sets serialize as `null`,
/// which nodes read as "match anything".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedFilter {
    pub address: Option<Vec<String>>,
    pub topics: Option<Vec<Option<Vec<String>>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<Hash32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_block: Option<String>,
}

impl FilterQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the initial query for a subscription.
    ///
    /// Empty strings are dropped. All configured topics become alternatives for the first
    /// position, i.e. the event signature slot.
    #[must_use]
    pub fn from_subscription(config: &SubscriptionConfig) -> Self {
        let addresses: Vec<String> =
            config.addresses.iter().filter(|a| !a.is_empty()).cloned().collect();
        let signatures: Vec<String> =
            config.topics.iter().filter(|t| !t.is_empty()).cloned().collect();

        Self { addresses, topics: vec![signatures], ..Self::default() }
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.addresses.push(address.into());
        self
    }

    /// Appends a topic position with the given alternatives (empty matches anything).
    #[must_use]
    pub fn with_topic_alternatives<I, S>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics.push(alternatives.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_range(
        mut self,
        from_block: impl Into<String>,
        to_block: impl Into<String>,
    ) -> Self {
        self.from_block = from_block.into();
        self.to_block = to_block.into();
        self
    }

    #[must_use]
    pub fn with_block_hash(mut self, block_hash: Hash32) -> Self {
        self.block_hash = Some(block_hash);
        self
    }

    /// Encodes the query into the request argument.
    ///
    /// Range bounds default to `"0x0"` and `"latest"` when unset.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::ConflictingRange`] if a block hash is combined with a non-empty
    /// range bound.
    pub fn encode(&self) -> Result<EncodedFilter, FilterError> {
        let address = (!self.addresses.is_empty()).then(|| self.addresses.clone());
        let topics = (!self.topics.is_empty()).then(|| {
            self.topics
                .iter()
                .map(|alternatives| (!alternatives.is_empty()).then(|| alternatives.clone()))
                .collect()
        });

        if let Some(block_hash) = self.block_hash {
            if !self.from_block.is_empty() || !self.to_block.is_empty() {
                return Err(FilterError::ConflictingRange);
            }
            return Ok(EncodedFilter {
                address,
                topics,
                block_hash: Some(block_hash),
                from_block: None,
                to_block: None,
            });
        }

        let from_block =
            if self.from_block.is_empty() { GENESIS_QUANTITY } else { self.from_block.as_str() };
        let to_block = if self.to_block.is_empty() { LATEST } else { self.to_block.as_str() };

        Ok(EncodedFilter {
            address,
            topics,
            block_hash: None,
            from_block: Some(from_block.to_string()),
            to_block: Some(to_block.to_string()),
        })
    }

    /// Checks a log against the address and topic criteria.
    ///
    /// Block range and block hash are not evaluated: range bounds may be symbolic and only the
    /// node can resolve them. Hex strings compare case-insensitively.
    #[must_use]
    pub fn matches<L: LogEntry>(&self, log: &L) -> bool {
        if !self.addresses.is_empty() &&
            !self.addresses.iter().any(|a| a.eq_ignore_ascii_case(log.address()))
        {
            return false;
        }

        let log_topics = log.topics();
        for (position, alternatives) in self.topics.iter().enumerate() {
            if alternatives.is_empty() {
                continue;
            }
            let Some(topic) = log_topics.get(position) else {
                return false;
            };
            if !alternatives.iter().any(|alt| alt.eq_ignore_ascii_case(topic)) {
                return false;
            }
        }

        true
    }
}
