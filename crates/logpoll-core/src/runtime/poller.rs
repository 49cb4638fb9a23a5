use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    chain::Chain,
    connector::{LogConnector, ResponseError},
    transport::{Transport, TransportError},
    types::Event,
};

/// Failure of a single probe or poll cycle.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error("response rejected: {0}")]
    Response(#[from] ResponseError),

    /// The event receiver was dropped; nobody is listening any more.
    #[error("event channel closed")]
    ChannelClosed,
}

/// Drives a [`LogConnector`] against a [`Transport`] on a fixed interval.
///
/// The poller owns its connector, so cursor updates never race. Events are forwarded in the
/// order the node returned them.
pub struct Poller<C: Chain, T: Transport> {
    connector: LogConnector<C>,
    transport: Arc<T>,
    poll_interval: Duration,
    events: mpsc::Sender<Event>,
}

impl<C: Chain, T: Transport + 'static> Poller<C, T> {
    #[must_use]
    pub fn new(
        connector: LogConnector<C>,
        transport: Arc<T>,
        poll_interval: Duration,
        events: mpsc::Sender<Event>,
    ) -> Self {
        Self { connector, transport, poll_interval, events }
    }

    #[must_use]
    pub fn connector(&self) -> &LogConnector<C> {
        &self.connector
    }

    /// Sends the connectivity probe, if the connection kind has one, and seeds the cursor.
    ///
    /// # Errors
    ///
    /// Returns a [`PollError`] if the probe cannot be sent or its response is rejected. The
    /// cursor is left as it was.
    pub async fn probe(&mut self) -> Result<(), PollError> {
        let Some(request) = self.connector.probe_request() else {
            return Ok(());
        };

        let response = self.transport.send(request).await?;
        self.connector.parse_probe_response(&response)?;
        Ok(())
    }

    /// Runs one fetch cycle and forwards the resulting events.
    ///
    /// Returns the number of events forwarded. A query that cannot be encoded forwards nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`PollError`] if the exchange fails, the response is rejected, or the event
    /// receiver has been dropped.
    pub async fn poll_once(&mut self) -> Result<usize, PollError> {
        let Some(request) = self.connector.fetch_request() else {
            return Ok(0);
        };

        let response = self.transport.send(request).await?;
        let events = self.connector.parse_fetch_response(&response)?;
        let count = events.len();

        for event in events {
            self.events.send(event).await.map_err(|_| PollError::ChannelClosed)?;
        }

        Ok(count)
    }

    /// Probes once, then polls on every tick until `shutdown` fires or the event receiver is
    /// dropped.
    ///
    /// Shutdown is observed while a probe or cycle is in flight too, including while the cycle
    /// waits for room in the event channel. An interrupted cycle forwards nothing further.
    ///
    /// Returns the connector so callers can inspect the final cursor.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> LogConnector<C> {
        let probed = tokio::select! {
            probed = self.probe() => probed,
            _ = shutdown.recv() => {
                info!("poller shut down before probing");
                return self.connector;
            }
        };
        match probed {
            Ok(()) => info!(chain = C::NAME, cursor = %self.connector.cursor(), "poller started"),
            Err(e) => {
                warn!(chain = C::NAME, error = %e, "probe failed, polling from the latest state");
            }
        }

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let outcome = tokio::select! {
                _ = ticker.tick() => tokio::select! {
                    outcome = self.poll_once() => outcome,
                    _ = shutdown.recv() => {
                        info!("poller shutting down mid-cycle");
                        break;
                    }
                },
                _ = shutdown.recv() => {
                    info!("poller shutting down");
                    break;
                }
            };

            match outcome {
                Ok(count) => {
                    if count > 0 {
                        let cursor = self.connector.cursor();
                        debug!(count, cursor = %cursor, "events forwarded");
                    }
                    if self.events.is_closed() {
                        info!("event receiver dropped, poller stopping");
                        break;
                    }
                }
                Err(PollError::ChannelClosed) => {
                    info!("event receiver dropped, poller stopping");
                    break;
                }
                Err(e) => {
                    warn!(
                        chain = C::NAME,
                        error = %e,
                        transient = e.is_transient(),
                        "poll cycle failed"
                    );
                }
            }
        }

        self.connector
    }

    /// Spawns [`Poller::run`] on the Tokio runtime.
    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> JoinHandle<LogConnector<C>> {
        tokio::spawn(self.run(shutdown))
    }
}

impl PollError {
    /// Returns `true` if the next cycle may succeed without intervention.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_transient(),
            Self::Response(ResponseError::Rpc { .. }) => true,
            Self::Response(_) | Self::ChannelClosed => false,
        }
    }
}
