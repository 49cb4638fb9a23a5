//! Poll loop runtime.
//!
//! [`Poller`] owns one [`LogConnector`](crate::connector::LogConnector) inside a single Tokio
//! task: it probes once, then fetches on every interval tick and forwards events into an
//! `mpsc` channel until a `broadcast` shutdown signal fires.
//!
//! ```no_run
//! use std::{sync::Arc, time::Duration};
//! use logpoll_core::{
//!     chain::Conflux,
//!     connector::{ConnectionKind, LogConnector},
//!     filter::FilterQuery,
//!     runtime::Poller,
//!     transport::HttpTransport,
//! };
//! use tokio::sync::{broadcast, mpsc};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "http://127.0.0.1:12537";
//! let transport = Arc::new(HttpTransport::new(url, Duration::from_secs(30))?);
//! let connector = LogConnector::<Conflux>::new(FilterQuery::new(), ConnectionKind::Rpc);
//! let (events_tx, mut events_rx) = mpsc::channel(1024);
//! let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
//!
//! let handle = Poller::new(connector, transport, Duration::from_secs(5), events_tx)
//!     .spawn(shutdown_rx);
//!
//! while let Some(event) = events_rx.recv().await {
//!     println!("{}", String::from_utf8_lossy(event.as_bytes()));
//! }
//!
//! shutdown_tx.send(()).ok();
//! handle.await?;
//! # Ok(())
//! # }
//! ```

pub mod poller;

pub use poller::{PollError, Poller};
