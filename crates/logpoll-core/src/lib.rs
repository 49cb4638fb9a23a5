//! # Logpoll Core
//!
//! Core library for polling a blockchain node's JSON-RPC interface for contract event logs.
//!
//! This crate provides:
//!
//! - **[`filter`]**: The log filter query (addresses, positional topic alternatives, block range
//!   or block hash) and its wire encoding.
//!
//! - **[`connector`]**: The stateful connector that builds probe and logs requests, interprets
//!   responses into opaque [`types::Event`]s and advances its block cursor so repeated polls only
//!   return logs from blocks not yet seen.
//!
//! - **[`chain`]**: Chain dialects (method names and log record shapes) for Conflux and Ethereum
//!   style nodes.
//!
//! - **[`transport`]**: The byte-in, byte-out transport seam and its HTTP implementation.
//!
//! - **[`runtime`]**: The poll loop driving a connector on a fixed interval.
//!
//! - **[`config`]**: Layered configuration from defaults, TOML and environment variables.
//!
//! ## Poll Cycle
//!
//! ```text
//!  Poller ──probe──► Transport ──► Node        (once: seeds cursor with chain height)
//!    │
//!    └─tick─► fetch_request ──► Transport ──► Node
//!                                               │
//!             Events ◄── parse_fetch_response ◄─┘   (cursor = highest block + 1)
//! ```

pub mod chain;
pub mod config;
pub mod connector;
pub mod filter;
pub mod runtime;
pub mod transport;
pub mod types;
pub mod utils;
