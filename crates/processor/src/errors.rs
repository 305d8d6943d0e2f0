//! Errors for the `ferrite-processor` crate.

use alloc::string::String;
use alloy_primitives::{Address, B256};
use thiserror::Error;

/// The error type for [`BlockProcessor`] operations.
///
/// Only [`InvalidBlock`](Self::InvalidBlock) is acted upon inside the batch
/// driver; every variant triggers a rollback to the pre-batch snapshot before
/// it is surfaced.
///
/// [`BlockProcessor`]: crate::BlockProcessor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessorError {
    /// Post-execution validation rejected a processed block.
    #[error("invalid block {number} ({hash})")]
    InvalidBlock {
        /// Height of the rejected suggested block.
        number: u64,
        /// Hash of the rejected suggested block.
        hash: B256,
    },
    /// A transaction reached the runner without a hash identity.
    #[error("transaction {index} of block {number} has no hash")]
    MissingTransactionHash {
        /// Position of the transaction within its block.
        index: usize,
        /// Height of the containing block.
        number: u64,
    },
    /// The transaction executor failed.
    #[error("transaction execution failed: {_0}")]
    Execution(String),
    /// A state, storage, or store collaborator failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// A [`Result`] type for the [`ProcessorError`] enum.
pub type ProcessorResult<T> = Result<T, ProcessorError>;

/// An error raised by a state, storage, or store collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The account does not exist in the current state.
    #[error("account {_0} does not exist")]
    AccountNotFound(Address),
    /// The snapshot version is unknown to the store.
    #[error("unknown snapshot version {_0}")]
    UnknownSnapshot(usize),
    /// An opaque backend failure.
    #[error("backend failure: {_0}")]
    Backend(String),
}

/// A [`Result`] type alias where the error is [`ProviderError`].
pub type ProviderResult<T> = Result<T, ProviderError>;
