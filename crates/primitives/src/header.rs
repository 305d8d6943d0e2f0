//! The block header and its sealed form.

use alloy_consensus::Sealable;
use alloy_primitives::{Address, B256, B64, Bloom, Bytes, U256, keccak256};
use alloy_rlp::{RlpDecodable, RlpEncodable};

/// An Ethereum block header.
///
/// Fields are declared in canonical order so that the derived RLP
/// implementations produce the exact byte sequence hashed into the block hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct Header {
    /// Hash of the parent block's header.
    pub parent_hash: B256,
    /// Hash of the RLP-encoded list of ommer headers.
    pub ommers_hash: B256,
    /// Address credited with the block reward.
    pub beneficiary: Address,
    /// Root of the state trie after executing the block.
    pub state_root: B256,
    /// Root of the transaction trie.
    pub transactions_root: B256,
    /// Root of the receipt trie.
    pub receipts_root: B256,
    /// OR-aggregate of every receipt's log bloom.
    pub logs_bloom: Bloom,
    /// Proof-of-work difficulty target.
    pub difficulty: U256,
    /// Block height.
    pub number: u64,
    /// Gas ceiling for the block.
    pub gas_limit: u64,
    /// Gas consumed by all transactions in the block.
    pub gas_used: u64,
    /// Unix timestamp the block was sealed at.
    pub timestamp: u64,
    /// Arbitrary sealer-supplied bytes.
    pub extra_data: Bytes,
    /// Proof-of-work mix digest.
    pub mix_hash: B256,
    /// Proof-of-work nonce.
    pub nonce: B64,
}

impl Header {
    /// Returns `true` if this header belongs to the genesis block.
    pub const fn is_genesis(&self) -> bool {
        self.number == 0
    }
}

impl Sealable for Header {
    fn hash_slow(&self) -> B256 {
        keccak256(alloy_rlp::encode(self))
    }
}

/// A [`Header`] paired with its keccak hash.
pub type SealedHeader = alloy_consensus::Sealed<Header>;
