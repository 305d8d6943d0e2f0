//! The opaque transaction form consumed by the processing core.

use alloy_primitives::{B256, Bytes, keccak256};

/// A transaction as seen by the block processing core.
///
/// The core never interprets the payload; the transaction executor owns its
/// semantics. Only the hash identity matters at this layer, and a transaction
/// without one is rejected before execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    /// Keccak hash of the canonical payload encoding, if known.
    pub hash: Option<B256>,
    /// The canonical payload encoding.
    pub payload: Bytes,
}

impl Transaction {
    /// Creates a transaction, deriving the hash from the payload.
    pub fn new(payload: Bytes) -> Self {
        let hash = keccak256(&payload);
        Self { hash: Some(hash), payload }
    }

    /// Creates a transaction with an explicit, pre-computed hash.
    pub const fn with_hash(hash: B256, payload: Bytes) -> Self {
        Self { hash: Some(hash), payload }
    }
}
