//! Chain dialects.
//!
//! Nodes speaking the Ethereum-style log API differ in three places only: the namespace of the
//! RPC methods, the method returning the current height, and the key under which a log carries
//! its containing block. A [`Chain`] captures those differences at the type level so the
//! connector logic stays dialect-agnostic.
//!
//! | Dialect | Logs method | Height method | Block key |
//! |---------|-------------|---------------|-----------|
//! | [`Conflux`] | `cfx_getLogs` | `cfx_epochNumber` | `epochNumber` |
//! | [`Ethereum`] | `eth_getLogs` | `eth_blockNumber` | `blockNumber` |

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

pub mod conflux;
pub mod ethereum;

pub use conflux::{CfxLog, Conflux};
pub use ethereum::{EthLog, Ethereum};

/// A node dialect: method names plus the shape of the log records it returns.
pub trait Chain: Send + Sync + 'static {
    /// Short name used in logs and configuration.
    const NAME: &'static str;

    /// Method returning log records matching a filter.
    const LOGS_METHOD: &'static str;

    /// Method returning the current chain height as a hex quantity.
    const HEIGHT_METHOD: &'static str;

    /// Log record as returned by [`Self::LOGS_METHOD`].
    type Log: LogEntry;
}

/// Accessors the connector needs on a decoded log record.
///
/// Events carry the record re-serialized in the dialect's own field layout.
pub trait LogEntry: Serialize + DeserializeOwned + Send + 'static {
    /// Containing block (or epoch) number, still hex encoded.
    fn block_number(&self) -> &str;

    /// Emitting contract address.
    fn address(&self) -> &str;

    /// Indexed topics, in order.
    fn topics(&self) -> &[String];
}

/// Decodes an explicit `null` as the field's default, so one sparse record never fails a batch.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Runtime selector for a [`Chain`] implementation, as found in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
    #[default]
    Conflux,
    Ethereum,
}

impl ChainKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conflux => Conflux::NAME,
            Self::Ethereum => Ethereum::NAME,
        }
    }
}

impl std::fmt::Display for ChainKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
