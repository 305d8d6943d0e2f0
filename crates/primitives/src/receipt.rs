//! Transaction receipts and their trie-leaf encoding.

use alloc::vec::Vec;
use alloy_primitives::{B256, Bloom, Log};
use alloy_rlp::{Encodable, Header as RlpHeader};

/// The receipt produced by executing one transaction.
///
/// The executor fills everything except `block_hash`, which the processing
/// pipeline stamps with the containing block's hash before persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Receipt {
    /// Hash of the transaction this receipt belongs to.
    pub tx_hash: B256,
    /// Hash of the containing processed block.
    pub block_hash: Option<B256>,
    /// Intermediate state root after this transaction, serialized before
    /// EIP-658.
    pub post_state: Option<B256>,
    /// Whether execution succeeded, serialized as the status byte from
    /// EIP-658 onward.
    pub success: bool,
    /// Running total of gas used in the block up to and including this
    /// transaction.
    pub cumulative_gas_used: u64,
    /// Logs emitted during execution.
    pub logs: Vec<Log>,
    /// Bloom filter over the logs.
    pub bloom: Bloom,
}

impl Receipt {
    /// Encodes the receipt the way it is inserted into the receipt trie:
    /// `rlp([outcome, cumulative_gas_used, bloom, logs])`.
    ///
    /// The outcome field is fork-gated: the status byte from EIP-658 onward,
    /// the intermediate state root before.
    pub fn encode_for_root(&self, eip658: bool, out: &mut Vec<u8>) {
        RlpHeader { list: true, payload_length: self.payload_length(eip658) }.encode(out);
        if eip658 {
            self.success.encode(out);
        } else {
            self.post_state.unwrap_or_default().encode(out);
        }
        self.cumulative_gas_used.encode(out);
        self.bloom.encode(out);
        self.logs.encode(out);
    }

    fn payload_length(&self, eip658: bool) -> usize {
        let outcome = if eip658 {
            self.success.length()
        } else {
            self.post_state.unwrap_or_default().length()
        };
        outcome
            + self.cumulative_gas_used.length()
            + self.bloom.length()
            + self.logs.length()
    }
}
