//! Collaborator contracts consumed by the block processor.
//!
//! The processor is the sole writer during a batch: mutating collaborators
//! are owned `&mut`-style, pure ones are shared read-only. Each trait is the
//! narrowest capability the pipeline needs, so embedders can back them with
//! anything from a full trie database to an in-memory double.

use crate::{
    errors::{ProcessorResult, ProviderResult},
    rewards::BlockReward,
};
use alloc::vec::Vec;
use alloy_primitives::{Address, B256, Bytes, U256};
use ferrite_forks::ForkSpec;
use ferrite_primitives::{Block, Header, Receipt, SealedBlock, Transaction};

/// The outcome of executing a single transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// The receipt describing the execution.
    pub receipt: Receipt,
    /// The trace, when tracing was requested.
    pub trace: Option<TxTrace>,
}

/// A summary trace of one transaction, forwarded to the [`TraceListener`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxTrace {
    /// Hash of the traced transaction.
    pub tx_hash: B256,
    /// Gas consumed by the transaction.
    pub gas_used: u64,
    /// Whether execution halted exceptionally.
    pub failed: bool,
    /// The return data.
    pub output: Bytes,
}

/// Executes transactions against the state and storage providers.
///
/// Implementations borrow the providers for the duration of each call and
/// must be deterministic given identical provider contents and fork rules.
#[auto_impl::auto_impl(&mut, Box)]
pub trait TransactionExecutor {
    /// Executes the transaction at `index` of the block described by
    /// `header`.
    ///
    /// When `trace` is set the executor additionally produces a [`TxTrace`];
    /// untraced runs must not pay for trace collection.
    fn execute(
        &mut self,
        index: usize,
        tx: &Transaction,
        header: &Header,
        state: &mut dyn StateProvider,
        storage: &mut dyn StorageProvider,
        trace: bool,
    ) -> ProcessorResult<ExecutionOutcome>;
}

/// Mutable view over the world state trie.
#[auto_impl::auto_impl(&mut, Box)]
pub trait StateProvider {
    /// The current state root.
    fn state_root(&self) -> B256;

    /// Repoints the provider at a different state root.
    fn set_state_root(&mut self, root: B256);

    /// Discards all uncommitted in-memory writes, keeping the root.
    fn reset(&mut self);

    /// Folds dirty trie nodes into the backing store and updates the state
    /// root, applying the fork's account-cleanup rules.
    fn commit(&mut self, spec: &ForkSpec) -> ProviderResult<()>;

    /// Finalizes the tree structure into the backing store.
    fn commit_tree(&mut self) -> ProviderResult<()>;

    /// Returns `true` if an account exists at `address`.
    fn account_exists(&self, address: Address) -> ProviderResult<bool>;

    /// Creates an account with an initial balance.
    fn create_account(&mut self, address: Address, balance: U256) -> ProviderResult<()>;

    /// The balance of `address`, zero for absent accounts.
    fn balance(&self, address: Address) -> ProviderResult<U256>;

    /// Adds `value` to the balance of an existing account.
    fn add_to_balance(
        &mut self,
        address: Address,
        value: U256,
        spec: &ForkSpec,
    ) -> ProviderResult<()>;

    /// Subtracts `value` from the balance of an existing account.
    fn subtract_from_balance(
        &mut self,
        address: Address,
        value: U256,
        spec: &ForkSpec,
    ) -> ProviderResult<()>;
}

/// Mutable view over the contract storage tries.
#[auto_impl::auto_impl(&mut, Box)]
pub trait StorageProvider {
    /// Discards all uncommitted in-memory writes.
    fn reset(&mut self);

    /// Finalizes the storage trees into the backing store.
    fn commit_trees(&mut self) -> ProviderResult<()>;
}

/// A key/value store supporting versioned undo and durable commit.
#[auto_impl::auto_impl(&mut, Box)]
pub trait SnapshotStore {
    /// Marks the current version and returns its handle.
    ///
    /// Versions form a stack: a later [`restore`](Self::restore) pops back
    /// down to the marker.
    fn take_snapshot(&mut self) -> usize;

    /// Rewinds to a previously taken version marker.
    fn restore(&mut self, version: usize) -> ProviderResult<()>;

    /// Durably persists everything written since the last commit.
    ///
    /// Outstanding version markers are invalidated.
    fn commit(&mut self) -> ProviderResult<()>;
}

/// Post-execution block validation.
#[auto_impl::auto_impl(&, Box, Arc)]
pub trait BlockValidator {
    /// Compares a processed block against the suggestion it was derived
    /// from.
    fn validate_processed_block(&self, processed: &SealedBlock, suggested: &SealedBlock) -> bool;
}

/// Computes the consensus reward deltas for one block.
#[auto_impl::auto_impl(&, Box, Arc)]
pub trait RewardCalculator {
    /// The reward deltas to apply, in application order.
    fn calculate_rewards(&self, block: &Block) -> Vec<BlockReward>;
}

/// Persistence for processed transaction receipts.
#[auto_impl::auto_impl(&mut, Box)]
pub trait ReceiptStore {
    /// Persists the receipt for `tx_hash`. Idempotent per hash.
    fn store_receipt(&mut self, tx_hash: B256, receipt: &Receipt) -> ProviderResult<()>;
}

/// Per-transaction tracing opt-in.
#[auto_impl::auto_impl(&mut, Box)]
pub trait TraceListener {
    /// Returns `true` if the transaction should be traced.
    fn should_trace(&self, tx_hash: B256) -> bool;

    /// Receives the trace of a transaction that opted in.
    fn record_trace(&mut self, tx_hash: B256, trace: TxTrace);
}

/// A [`TraceListener`] that never requests traces.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTraceListener;

impl TraceListener for NoopTraceListener {
    fn should_trace(&self, _tx_hash: B256) -> bool {
        false
    }

    fn record_trace(&mut self, _tx_hash: B256, _trace: TxTrace) {}
}
