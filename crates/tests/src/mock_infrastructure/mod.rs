//! Mock JSON-RPC node for integration tests.
//!
//! `RpcMockBuilder` wraps a mockito server and answers the height and logs methods of either
//! chain dialect. Requests are told apart by method and, for logs, by the `fromBlock` they carry,
//! so a test can script what each successive poll sees.
//!
//! ```ignore
//! use tests::mock_infrastructure::{LogResponseBuilder, RpcMockBuilder};
//!
//! let mut node = RpcMockBuilder::new().await;
//! node.mock_height("cfx_epochNumber", 100)
//!     .mock_get_logs("cfx_getLogs", "0x64", &[LogResponseBuilder::new(100, 0).build_conflux()]);
//! ```

pub mod rpc_mock;

pub use rpc_mock::{LogResponseBuilder, RpcMockBuilder};
