//! Block types: the mutable working form and the sealed form.

use crate::{Header, SealedHeader, Transaction};
use alloc::vec::Vec;
use alloy_consensus::Sealable;
use alloy_primitives::B256;

/// A block whose header is still being finalized.
///
/// The processing pipeline mutates the header in well-defined steps (receipts
/// root and bloom, then state root, then transactions root) and seals it
/// exactly once, after every field is final.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    /// The working header.
    pub header: Header,
    /// Transactions in execution order.
    pub transactions: Vec<Transaction>,
    /// Ommer headers included by reference.
    pub ommers: Vec<Header>,
}

impl Block {
    /// Seals the block, computing the header hash.
    ///
    /// This is the one-way transition out of the mutable form; downstream
    /// consumers only ever observe a [`SealedBlock`].
    pub fn seal_slow(self) -> SealedBlock {
        SealedBlock {
            header: self.header.seal_slow(),
            transactions: self.transactions,
            ommers: self.ommers,
        }
    }
}

/// A block whose header hash has been computed and pinned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedBlock {
    /// The sealed header.
    pub header: SealedHeader,
    /// Transactions in execution order.
    pub transactions: Vec<Transaction>,
    /// Ommer headers included by reference.
    pub ommers: Vec<Header>,
}

impl SealedBlock {
    /// The block hash.
    pub fn hash(&self) -> B256 {
        self.header.seal()
    }

    /// The block height.
    pub fn number(&self) -> u64 {
        self.header.number
    }

    /// Returns `true` for the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.header.is_genesis()
    }
}
