//! RPC Mock Builder for log-polling tests.

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};

fn method_matcher(method: &str) -> Matcher {
    Matcher::Regex(format!(r#""method"\s*:\s*"{method}""#))
}

fn result_body(result: &Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": result
    })
    .to_string()
}

/// Builder for creating mock node responses.
pub struct RpcMockBuilder {
    server: ServerGuard,
    mocks: Vec<Mock>,
}

impl RpcMockBuilder {
    /// Creates a new RPC mock builder with a fresh mockito server.
    pub async fn new() -> Self {
        Self { server: Server::new_async().await, mocks: Vec::new() }
    }

    /// Returns the URL of the mock server.
    #[must_use]
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Mocks a height method (`cfx_epochNumber`, `eth_blockNumber`).
    pub fn mock_height(&mut self, method: &str, height: u64) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .match_header("content-type", "application/json")
            .match_body(method_matcher(method))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(result_body(&json!(format!("0x{height:x}"))))
            .expect_at_least(1)
            .create();

        self.mocks.push(mock);
        self
    }

    /// Mocks a logs method for requests whose filter starts at `from_block`.
    pub fn mock_get_logs(&mut self, method: &str, from_block: &str, logs: &[Value]) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .match_body(Matcher::AllOf(vec![
                method_matcher(method),
                Matcher::Regex(format!(r#""fromBlock"\s*:\s*"{from_block}""#)),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(result_body(&json!(logs)))
            .expect_at_least(1)
            .create();

        self.mocks.push(mock);
        self
    }

    /// Mocks a logs method whose filter carries `fragment` somewhere in the request body.
    pub fn mock_get_logs_with(
        &mut self,
        method: &str,
        fragment: &str,
        logs: &[Value],
    ) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .match_body(Matcher::AllOf(vec![
                method_matcher(method),
                Matcher::Regex(regex_escape(fragment)),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(result_body(&json!(logs)))
            .expect_at_least(1)
            .create();

        self.mocks.push(mock);
        self
    }

    /// Mocks an RPC error response.
    pub fn mock_rpc_error(&mut self, method: &str, code: i32, message: &str) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .match_body(method_matcher(method))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": {
                        "code": code,
                        "message": message
                    }
                })
                .to_string(),
            )
            .expect_at_least(1)
            .create();

        self.mocks.push(mock);
        self
    }

    /// Mocks a server error (500).
    pub fn mock_server_error(&mut self) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .with_status(500)
            .with_body("Internal Server Error")
            .expect_at_least(1)
            .create();

        self.mocks.push(mock);
        self
    }

    /// Mocks a 200 response whose body is not JSON.
    pub fn mock_garbage(&mut self, method: &str) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .match_body(method_matcher(method))
            .with_status(200)
            .with_body("<html>bad gateway</html>")
            .expect_at_least(1)
            .create();

        self.mocks.push(mock);
        self
    }

    /// Verifies every mock was called at least once.
    ///
    /// Pollers repeat requests, so each mock accepts any number of hits.
    #[must_use]
    pub fn verify_all_called(&self) -> bool {
        self.mocks.iter().all(mockito::Mock::matched)
    }

    /// Gets the number of mocks that were called at least once.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.mocks.iter().filter(|m| m.matched()).count()
    }
}

fn regex_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Builder for constructing log records in either dialect.
pub struct LogResponseBuilder {
    address: String,
    block_number: u64,
    log_index: u64,
    topics: Vec<String>,
    data: String,
}

impl LogResponseBuilder {
    /// Creates a new log response builder.
    #[must_use]
    pub fn new(block_number: u64, log_index: u64) -> Self {
        Self {
            address: "0x0000000000000000000000000000000000000001".to_string(),
            block_number,
            log_index,
            topics: vec![format!("0x{:064x}", 0)],
            data: "0x".to_string(),
        }
    }

    /// Sets a custom contract address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Sets topics for the log.
    #[must_use]
    pub fn with_topics(mut self, topics: Vec<String>) -> Self {
        self.topics = topics;
        self
    }

    /// Sets the log data.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    /// Builds a `cfx_getLogs` record.
    #[must_use]
    pub fn build_conflux(self) -> Value {
        json!({
            "address": self.address,
            "epochNumber": format!("0x{:x}", self.block_number),
            "blockHash": format!("0x{:064x}", self.block_number),
            "logIndex": format!("0x{:x}", self.log_index),
            "transactionHash": format!("0x{:064x}", self.block_number * 100 + self.log_index),
            "transactionIndex": "0x0",
            "topics": self.topics,
            "data": self.data
        })
    }

    /// Builds an `eth_getLogs` record.
    #[must_use]
    pub fn build_ethereum(self) -> Value {
        json!({
            "address": self.address,
            "blockNumber": format!("0x{:x}", self.block_number),
            "blockHash": format!("0x{:064x}", self.block_number),
            "logIndex": format!("0x{:x}", self.log_index),
            "transactionHash": format!("0x{:064x}", self.block_number * 100 + self.log_index),
            "transactionIndex": "0x0",
            "topics": self.topics,
            "data": self.data,
            "removed": false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rpc_mock_builder_creation() {
        let mock = RpcMockBuilder::new().await;
        assert!(mock.url().starts_with("http://"));
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn test_log_builders_use_dialect_keys() {
        let cfx = LogResponseBuilder::new(16, 2).build_conflux();
        assert_eq!(cfx["epochNumber"], "0x10");
        assert!(cfx.get("blockNumber").is_none());

        let eth = LogResponseBuilder::new(16, 2).with_data("0xff").build_ethereum();
        assert_eq!(eth["blockNumber"], "0x10");
        assert_eq!(eth["data"], "0xff");
    }

    #[test]
    fn test_regex_escape() {
        assert_eq!(regex_escape(r#""address":["0xab"]"#), r#""address":\["0xab"\]"#);
    }
}
