use logpoll_core::{
    chain::{Chain, ChainKind, Conflux, Ethereum},
    config::AppConfig,
    connector::LogConnector,
    runtime::Poller,
    transport::HttpTransport,
    types::Event,
};
use std::{
    io::{self, Write},
    sync::Arc,
};
use tokio::{
    signal,
    sync::{broadcast, mpsc},
};
use tracing::{error, info};

use super::utils::CliResult;

/// Runs the poll loop until Ctrl-C, printing each event as one JSON line on stdout.
pub async fn run_poller(config: &AppConfig) -> CliResult<()> {
    match config.endpoint.chain {
        ChainKind::Conflux => run::<Conflux>(config).await,
        ChainKind::Ethereum => run::<Ethereum>(config).await,
    }
}

async fn run<C: Chain>(config: &AppConfig) -> CliResult<()> {
    let transport = Arc::new(HttpTransport::new(&config.endpoint.url, config.request_timeout())?);
    let connector =
        LogConnector::<C>::from_subscription(&config.subscription, config.endpoint.connection);

    let (events_tx, mut events_rx) = mpsc::channel(config.polling.event_buffer);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    info!(
        url = %config.endpoint.url,
        chain = C::NAME,
        interval_ms = config.polling.interval_ms,
        "starting poller"
    );
    let handle = Poller::new(connector, transport, config.poll_interval(), events_tx)
        .spawn(shutdown_rx);

    let mut stdout = io::stdout();
    let ctrl_c = shutdown_signal();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = events_rx.recv() => {
                let Some(event) = event else { break };
                if let Err(e) = write_event(&mut stdout, &event) {
                    error!(error = %e, "failed to write event, stopping");
                    break;
                }
            }
            () = &mut ctrl_c => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    drop(events_rx);
    let _ = shutdown_tx.send(());

    match handle.await {
        Ok(connector) => info!(cursor = %connector.cursor(), "poller stopped"),
        Err(e) => error!(error = %e, "poller task failed"),
    }

    Ok(())
}

fn write_event(out: &mut impl Write, event: &Event) -> io::Result<()> {
    out.write_all(event.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
