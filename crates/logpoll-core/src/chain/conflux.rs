use serde::{Deserialize, Serialize};

use super::{Chain, LogEntry};

/// Conflux core space (`cfx_*` namespace).
#[derive(Debug, Clone, Copy, Default)]
pub struct Conflux;

impl Chain for Conflux {
    const NAME: &'static str = "conflux";
    const LOGS_METHOD: &'static str = "cfx_getLogs";
    const HEIGHT_METHOD: &'static str = "cfx_epochNumber";
    type Log = CfxLog;
}

/// Log record returned by `cfx_getLogs`.
///
/// Missing or `null` fields decode as empty values; unknown fields are dropped on re-serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CfxLog {
    #[serde(deserialize_with = "super::null_as_default")]
    pub log_index: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub epoch_number: String,
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
}

impl LogEntry for CfxLog {
    fn block_number(&self) -> &str {
        &self.epoch_number
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn topics(&self) -> &[String] {
        &self.topics
    }
}
