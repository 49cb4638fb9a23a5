//! Connector cycles exchanged with a mock node over HTTP.

use logpoll_core::{
    chain::{Conflux, Ethereum},
    config::SubscriptionConfig,
    connector::{ConnectionKind, LogConnector, ResponseError},
    transport::{HttpTransport, Transport},
};
use serde_json::Value;
use std::time::Duration;

use crate::mock_infrastructure::{LogResponseBuilder, RpcMockBuilder};

const TRANSFER: &str = "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";
const TOKEN: &str = "0x8a6e0b0a4b7e1f7c3b46a1c4f0c39d5ab8d7c7f1";

fn transport(url: &str) -> HttpTransport {
    HttpTransport::new(url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_probe_then_fetch_over_http() {
    let mut node = RpcMockBuilder::new().await;
    node.mock_height("cfx_epochNumber", 100).mock_get_logs(
        "cfx_getLogs",
        "0x64",
        &[LogResponseBuilder::new(100, 0).build_conflux()],
    );
    let transport = transport(&node.url());
    let mut connector = LogConnector::<Conflux>::new(Default::default(), ConnectionKind::Rpc);

    let probe = transport.send(connector.probe_request().unwrap()).await.unwrap();
    connector.parse_probe_response(&probe).unwrap();
    assert_eq!(connector.cursor(), "0x64");

    let logs = transport.send(connector.fetch_request().unwrap()).await.unwrap();
    let events = connector.parse_fetch_response(&logs).unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].to_json().unwrap()["epochNumber"], "0x64");
    assert_eq!(connector.cursor(), "0x65");
    assert!(node.verify_all_called());
}

#[tokio::test]
async fn test_subscription_filter_reaches_the_wire() {
    let subscription = SubscriptionConfig {
        addresses: vec![TOKEN.to_string(), String::new()],
        topics: vec![TRANSFER.to_string()],
    };
    let connector = LogConnector::<Ethereum>::from_subscription(&subscription, ConnectionKind::Rpc);

    let mut node = RpcMockBuilder::new().await;
    node.mock_get_logs_with(
        "eth_getLogs",
        &format!(r#""address":["{TOKEN}"]"#),
        &[LogResponseBuilder::new(7, 0)
            .with_address(TOKEN)
            .with_topics(vec![TRANSFER.to_string()])
            .build_ethereum()],
    );

    let body = transport(&node.url()).send(connector.fetch_request().unwrap()).await.unwrap();
    let response: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(response["result"][0]["topics"][0], TRANSFER);
    assert!(node.verify_all_called());

    let request: Value = serde_json::from_slice(&connector.fetch_request().unwrap()).unwrap();
    assert_eq!(request["params"][0]["topics"], serde_json::json!([[TRANSFER]]));
    assert_eq!(request["params"][0]["fromBlock"], "latest_state");
}

#[tokio::test]
async fn test_ethereum_dialect_round_trip() {
    let mut node = RpcMockBuilder::new().await;
    node.mock_height("eth_blockNumber", 0x20).mock_get_logs(
        "eth_getLogs",
        "0x20",
        &[
            LogResponseBuilder::new(0x21, 1).build_ethereum(),
            LogResponseBuilder::new(0x20, 0).build_ethereum(),
        ],
    );
    let transport = transport(&node.url());
    let mut connector = LogConnector::<Ethereum>::new(Default::default(), ConnectionKind::Rpc);

    let probe = transport.send(connector.probe_request().unwrap()).await.unwrap();
    connector.parse_probe_response(&probe).unwrap();

    let logs = transport.send(connector.fetch_request().unwrap()).await.unwrap();
    let events = connector.parse_fetch_response(&logs).unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].to_json().unwrap()["removed"], false);
    assert_eq!(connector.cursor(), "0x22");
}

#[tokio::test]
async fn test_node_errors_leave_cursor_alone() {
    let mut node = RpcMockBuilder::new().await;
    node.mock_height("cfx_epochNumber", 5)
        .mock_rpc_error("cfx_getLogs", -32000, "epoch range too large");
    let transport = transport(&node.url());
    let mut connector = LogConnector::<Conflux>::new(Default::default(), ConnectionKind::Rpc);

    let probe = transport.send(connector.probe_request().unwrap()).await.unwrap();
    connector.parse_probe_response(&probe).unwrap();

    let logs = transport.send(connector.fetch_request().unwrap()).await.unwrap();
    let err = connector.parse_fetch_response(&logs).unwrap_err();

    assert!(matches!(err, ResponseError::Rpc { code: -32000, .. }));
    assert_eq!(connector.cursor(), "0x5");
}

#[tokio::test]
async fn test_garbage_body_is_an_envelope_error() {
    let mut node = RpcMockBuilder::new().await;
    node.mock_garbage("cfx_getLogs");
    let mut connector = LogConnector::<Conflux>::new(Default::default(), ConnectionKind::Rpc);

    let body = transport(&node.url()).send(connector.fetch_request().unwrap()).await.unwrap();
    let err = connector.parse_fetch_response(&body).unwrap_err();

    assert!(matches!(err, ResponseError::InvalidEnvelope(_)));
    assert_eq!(connector.cursor(), "");
}
