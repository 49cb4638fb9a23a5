//! Centralized block quantity parsing utilities.
//!
//! Filter bounds and the polling cursor are kept as raw strings, since nodes accept both
//! numbers and symbolic tags there. This module is the single place that turns those strings
//! into numbers and numbers back into wire quantities.

use thiserror::Error;

/// Tag meaning "the chain head", used as the default upper bound of a range.
pub const LATEST: &str = "latest";

/// Tag meaning "the latest executed state"; the polling start point before a cursor exists.
pub const LATEST_STATE: &str = "latest_state";

/// Lower bound used when a range query leaves `fromBlock` unset.
pub const GENESIS_QUANTITY: &str = "0x0";

/// Error types for block quantity parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    #[error("invalid number: {0}")]
    InvalidNumber(String),
}

/// Centralized block quantity parsing
pub struct BlockParameter;

impl BlockParameter {
    /// Parse a numeric cursor or range bound: `0x`-prefixed hex, or plain decimal.
    ///
    /// Leading zeros are tolerated, since bounds may come from hand-written configuration.
    /// Tags are rejected.
    ///
    /// # Examples
    /// ```
    /// use logpoll_core::utils::block_param::BlockParameter;
    ///
    /// assert_eq!(BlockParameter::parse_quantity("0x64"), Ok(100));
    /// assert_eq!(BlockParameter::parse_quantity("100"), Ok(100));
    /// assert!(BlockParameter::parse_quantity("latest").is_err());
    /// ```
    ///
    /// # Errors
    /// Returns `ParseError` if the input is not a hex or decimal number that fits in `u64`.
    pub fn parse_quantity(s: &str) -> Result<u64, ParseError> {
        if let Some(hex_str) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Self::parse_hex_digits(hex_str).ok_or_else(|| ParseError::InvalidHex(s.to_string()))
        } else {
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseError::InvalidNumber(s.to_string()));
            }
            s.parse::<u64>().map_err(|_| ParseError::InvalidNumber(s.to_string()))
        }
    }

    /// Parse a quantity reported by a node, such as a log record's block number.
    ///
    /// Strict wire form: `0x` prefix, at least one digit, no leading zeros (`"0x0"` is the only
    /// quantity starting with `0`).
    ///
    /// # Examples
    /// ```
    /// use logpoll_core::utils::block_param::BlockParameter;
    ///
    /// assert_eq!(BlockParameter::parse_hex_quantity("0x64"), Ok(100));
    /// assert!(BlockParameter::parse_hex_quantity("0x0064").is_err());
    /// assert!(BlockParameter::parse_hex_quantity("100").is_err());
    /// ```
    ///
    /// # Errors
    /// Returns `ParseError::InvalidHex` if the input is not a canonical hex quantity that fits in
    /// `u64`.
    pub fn parse_hex_quantity(s: &str) -> Result<u64, ParseError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .filter(|d| !(d.len() > 1 && d.starts_with('0')));

        digits
            .and_then(Self::parse_hex_digits)
            .ok_or_else(|| ParseError::InvalidHex(s.to_string()))
    }

    fn parse_hex_digits(digits: &str) -> Option<u64> {
        // from_str_radix tolerates a leading '+', quantities never carry one
        if digits.is_empty() || digits.starts_with('+') {
            return None;
        }
        u64::from_str_radix(digits, 16).ok()
    }

    /// Encode a number as a minimal `0x`-prefixed hex quantity.
    ///
    /// # Examples
    /// ```
    /// use logpoll_core::utils::block_param::BlockParameter;
    ///
    /// assert_eq!(BlockParameter::encode_quantity(0), "0x0");
    /// assert_eq!(BlockParameter::encode_quantity(101), "0x65");
    /// ```
    #[must_use]
    pub fn encode_quantity(value: u64) -> String {
        format!("{value:#x}")
    }
}
