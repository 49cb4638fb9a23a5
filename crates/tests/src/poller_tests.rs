//! Poll loop end to end against a mock node.

use logpoll_core::{
    chain::{Conflux, Ethereum},
    connector::{ConnectionKind, LogConnector},
    filter::FilterQuery,
    runtime::{PollError, Poller},
    transport::{HttpTransport, TransportError},
    types::Event,
};
use std::{sync::Arc, time::Duration};
use tokio::sync::{broadcast, mpsc};

use crate::mock_infrastructure::{LogResponseBuilder, RpcMockBuilder};

const INTERVAL: Duration = Duration::from_millis(20);

fn transport(url: &str) -> Arc<HttpTransport> {
    Arc::new(HttpTransport::new(url, Duration::from_secs(5)).unwrap())
}

async fn next_event(rx: &mut mpsc::Receiver<Event>) -> serde_json::Value {
    let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("event should arrive")
        .expect("channel should be open");
    event.to_json().unwrap()
}

#[tokio::test]
async fn test_poller_delivers_events_across_two_polls() {
    let mut node = RpcMockBuilder::new().await;
    node.mock_height("cfx_epochNumber", 0x64)
        .mock_get_logs(
            "cfx_getLogs",
            "0x64",
            &[
                LogResponseBuilder::new(0x64, 0).build_conflux(),
                LogResponseBuilder::new(0x65, 0).build_conflux(),
            ],
        )
        .mock_get_logs("cfx_getLogs", "0x66", &[LogResponseBuilder::new(0x66, 0).build_conflux()])
        .mock_get_logs("cfx_getLogs", "0x67", &[]);

    let connector = LogConnector::<Conflux>::new(FilterQuery::new(), ConnectionKind::Rpc);
    let (tx, mut rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let handle = Poller::new(connector, transport(&node.url()), INTERVAL, tx).spawn(shutdown_rx);

    assert_eq!(next_event(&mut rx).await["epochNumber"], "0x64");
    assert_eq!(next_event(&mut rx).await["epochNumber"], "0x65");
    assert_eq!(next_event(&mut rx).await["epochNumber"], "0x66");

    // Let at least one empty poll happen past the last batch.
    tokio::time::sleep(INTERVAL * 5).await;
    shutdown_tx.send(()).unwrap();
    let connector = tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();

    assert_eq!(connector.cursor(), "0x67");
    assert!(node.verify_all_called());
    assert!(rx.try_recv().is_err(), "no event may be delivered twice");
}

#[tokio::test]
async fn test_poller_without_probe_starts_at_latest_state() {
    let mut node = RpcMockBuilder::new().await;
    node.mock_rpc_error("eth_blockNumber", -32601, "method not found")
        .mock_get_logs(
            "eth_getLogs",
            "latest_state",
            &[LogResponseBuilder::new(9, 0).build_ethereum()],
        )
        .mock_get_logs("eth_getLogs", "0xa", &[]);

    let connector = LogConnector::<Ethereum>::new(FilterQuery::new(), ConnectionKind::Rpc);
    let (tx, mut rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let handle = Poller::new(connector, transport(&node.url()), INTERVAL, tx).spawn(shutdown_rx);

    assert_eq!(next_event(&mut rx).await["blockNumber"], "0x9");

    tokio::time::sleep(INTERVAL * 5).await;
    shutdown_tx.send(()).unwrap();
    let connector = tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();

    assert_eq!(connector.cursor(), "0xa");
    assert!(node.verify_all_called());
}

#[tokio::test]
async fn test_poller_keeps_running_through_server_errors() {
    let mut node = RpcMockBuilder::new().await;
    node.mock_server_error();

    let connector = LogConnector::<Conflux>::new(FilterQuery::new(), ConnectionKind::Rpc);
    let (tx, _rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let handle = Poller::new(connector, transport(&node.url()), INTERVAL, tx).spawn(shutdown_rx);

    tokio::time::sleep(INTERVAL * 5).await;
    assert!(!handle.is_finished(), "poller must survive failed cycles");

    shutdown_tx.send(()).unwrap();
    let connector = tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
    assert_eq!(connector.cursor(), "");
}

#[tokio::test]
async fn test_poll_once_reports_http_status() {
    let mut node = RpcMockBuilder::new().await;
    node.mock_server_error();

    let connector = LogConnector::<Conflux>::new(FilterQuery::new(), ConnectionKind::Rpc);
    let (tx, _rx) = mpsc::channel(16);
    let mut poller = Poller::new(connector, transport(&node.url()), INTERVAL, tx);

    let err = poller.poll_once().await.unwrap_err();
    assert!(matches!(err, PollError::Transport(TransportError::HttpError(500, _))));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_poller_stops_when_receiver_dropped() {
    let mut node = RpcMockBuilder::new().await;
    node.mock_height("cfx_epochNumber", 1)
        .mock_get_logs("cfx_getLogs", "0x1", &[LogResponseBuilder::new(1, 0).build_conflux()]);

    let connector = LogConnector::<Conflux>::new(FilterQuery::new(), ConnectionKind::Rpc);
    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

    let handle = Poller::new(connector, transport(&node.url()), INTERVAL, tx).spawn(shutdown_rx);

    let result = tokio::time::timeout(Duration::from_secs(5), handle).await;
    assert!(result.is_ok(), "poller should stop once nobody listens");
}
