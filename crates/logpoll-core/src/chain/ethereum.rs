use serde::{Deserialize, Serialize};

use super::{Chain, LogEntry};

/// Ethereum execution layer (`eth_*` namespace).
#[derive(Debug, Clone, Copy, Default)]
pub struct Ethereum;

impl Chain for Ethereum {
    const NAME: &'static str = "ethereum";
    const LOGS_METHOD: &'static str = "eth_getLogs";
    const HEIGHT_METHOD: &'static str = "eth_blockNumber";
    type Log = EthLog;
}

/// Log record returned by `eth_getLogs`.
///
/// Pending logs carry `null` positions; those decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EthLog {
    #[serde(deserialize_with = "super::null_as_default")]
    pub log_index: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub block_number: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub block_hash: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub transaction_hash: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub transaction_index: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub data: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub topics: Vec<String>,
    /// Set when the log was dropped by a reorg.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
}

impl LogEntry for EthLog {
    fn block_number(&self) -> &str {
        &self.block_number
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn topics(&self) -> &[String] {
        &self.topics
    }
}
