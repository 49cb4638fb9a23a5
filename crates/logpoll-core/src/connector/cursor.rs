//! Cursor advancement.
//!
//! The cursor is the `from_block` of the connector's query: the lower bound of the next poll.
//! After a batch of logs arrives it moves to one past the highest block seen, so the next
//! poll starts strictly after it. The result only depends on the maximum block number in the
//! batch, never on the order of the records.

use crate::utils::block_param::{BlockParameter, LATEST};

/// Outcome of offering one observed block number to the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Cursor now points at the contained block number.
    Moved(u64),
    /// Cursor already at or beyond the candidate.
    Unchanged,
    /// The record's block number is not a canonical hex quantity (or is `u64::MAX`).
    InvalidBlockNumber,
    /// The current cursor is neither a number nor an advanceable sentinel.
    UnreadableCursor,
}

/// Returns `true` for cursor values that any concrete block number should replace.
#[must_use]
pub fn is_open_sentinel(cursor: &str) -> bool {
    cursor.is_empty() || cursor == LATEST
}

/// Offers the block number of one received log to the cursor.
///
/// The cursor moves to `block_number + 1` when it is currently an open sentinel (`""` or
/// `"latest"`), or when that candidate is strictly greater than the current numeric cursor.
///
/// Block numbers reported by the node must be canonical hex quantities. The cursor itself may
/// also be decimal or zero-padded, since its first value can come from configuration.
///
/// # Examples
/// ```
/// use logpoll_core::connector::cursor::{advance, Advance};
///
/// let mut cursor = String::new();
/// assert_eq!(advance(&mut cursor, "0x64"), Advance::Moved(0x65));
/// assert_eq!(cursor, "0x65");
/// assert_eq!(advance(&mut cursor, "0x10"), Advance::Unchanged);
/// ```
pub fn advance(cursor: &mut String, block_number: &str) -> Advance {
    let Some(candidate) =
        BlockParameter::parse_hex_quantity(block_number).ok().and_then(|n| n.checked_add(1))
    else {
        return Advance::InvalidBlockNumber;
    };

    let should_move = if is_open_sentinel(cursor) {
        true
    } else {
        match BlockParameter::parse_quantity(cursor) {
            Ok(current) => candidate > current,
            Err(_) => return Advance::UnreadableCursor,
        }
    };

    if should_move {
        *cursor = BlockParameter::encode_quantity(candidate);
        Advance::Moved(candidate)
    } else {
        Advance::Unchanged
    }
}
