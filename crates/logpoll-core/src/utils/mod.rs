//! Utility functions shared by the filter, request and response layers.
//!
//! ## Block Quantity Parsing (`block_param`)
//! - Lenient hex/decimal parsing for cursors and range bounds
//! - Strict hex parsing for quantities reported by nodes
//! - Minimal hex encoding for the cursor

pub mod block_param;

pub use block_param::{BlockParameter, ParseError as BlockParseError};
