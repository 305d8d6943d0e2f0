//! Stateful collaborator doubles for exercising the block processor.
//!
//! The doubles are wired through shared handles so tests keep a view onto
//! state, stores and receipts after the processor takes ownership of its
//! boxed collaborators.

use crate::{
    BlockProcessor, BlockValidator, EraRewardCalculator, ExecutionOutcome, ProcessorResult,
    ProviderError, ProviderResult, ReceiptStore, SnapshotStore, StateProvider, StorageProvider,
    TraceListener, TransactionExecutor, TxTrace,
};
use alloy_primitives::{Address, B256, Bytes, Log, U256, keccak256, logs_bloom};
use ferrite_forks::{ChainSpec, ForkSpec};
use ferrite_primitives::{Block, Header, Receipt, SealedBlock, Transaction};
use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
    rc::Rc,
    sync::Arc,
};

/// A snapshotting key/value store: committed contents plus a write journal
/// whose length doubles as the version marker.
#[derive(Debug, Default)]
pub(crate) struct MemDb {
    committed: BTreeMap<Vec<u8>, Vec<u8>>,
    journal: Vec<(Vec<u8>, Vec<u8>)>,
}

impl MemDb {
    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.journal.push((key, value));
    }

    /// The full observable content of the store, for bit-identity asserts.
    pub(crate) fn fingerprint(&self) -> (usize, BTreeMap<Vec<u8>, Vec<u8>>) {
        (self.journal.len(), self.committed.clone())
    }
}

pub(crate) type SharedDb = Rc<RefCell<MemDb>>;

/// Adapter giving the processor a [`SnapshotStore`] view over a [`SharedDb`].
#[derive(Debug, Clone, Default)]
pub(crate) struct SharedStore(pub(crate) SharedDb);

impl SnapshotStore for SharedStore {
    fn take_snapshot(&mut self) -> usize {
        self.0.borrow().journal.len()
    }

    fn restore(&mut self, version: usize) -> ProviderResult<()> {
        let mut db = self.0.borrow_mut();
        if version > db.journal.len() {
            return Err(ProviderError::UnknownSnapshot(version));
        }
        db.journal.truncate(version);
        Ok(())
    }

    fn commit(&mut self) -> ProviderResult<()> {
        let mut db = self.0.borrow_mut();
        let journal = core::mem::take(&mut db.journal);
        for (key, value) in journal {
            db.committed.insert(key, value);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TestAccount {
    balance: U256,
}

/// An in-memory state provider with root-addressed history.
///
/// Committing folds dirty writes into the live view and derives a
/// deterministic root from its contents; every committed view is retained so
/// `set_state_root` can reseat onto any historical root, the way a trie
/// database keeps recent roots reachable.
#[derive(Debug)]
pub(crate) struct TestState {
    db: SharedDb,
    live: BTreeMap<Address, TestAccount>,
    dirty: BTreeMap<Address, TestAccount>,
    root: B256,
    history: BTreeMap<B256, BTreeMap<Address, TestAccount>>,
}

impl TestState {
    fn new(db: SharedDb, genesis: &[(Address, U256)]) -> Self {
        let live: BTreeMap<Address, TestAccount> = genesis
            .iter()
            .map(|(address, balance)| (*address, TestAccount { balance: *balance }))
            .collect();
        let root = contents_root(&live);
        let mut history = BTreeMap::new();
        history.insert(root, live.clone());
        Self { db, live, dirty: BTreeMap::new(), root, history }
    }

    fn lookup(&self, address: Address) -> Option<&TestAccount> {
        self.dirty.get(&address).or_else(|| self.live.get(&address))
    }
}

fn contents_root(accounts: &BTreeMap<Address, TestAccount>) -> B256 {
    let mut preimage = Vec::new();
    for (address, account) in accounts {
        preimage.extend_from_slice(address.as_slice());
        preimage.extend_from_slice(&account.balance.to_be_bytes::<32>());
    }
    keccak256(preimage)
}

impl StateProvider for TestState {
    fn state_root(&self) -> B256 {
        self.root
    }

    fn set_state_root(&mut self, root: B256) {
        self.live = self.history.get(&root).cloned().unwrap_or_default();
        self.root = root;
    }

    fn reset(&mut self) {
        self.dirty.clear();
    }

    fn commit(&mut self, _spec: &ForkSpec) -> ProviderResult<()> {
        let dirty = core::mem::take(&mut self.dirty);
        for (address, account) in dirty {
            self.live.insert(address, account);
        }
        self.root = contents_root(&self.live);
        self.history.insert(self.root, self.live.clone());
        Ok(())
    }

    fn commit_tree(&mut self) -> ProviderResult<()> {
        // Mirror the live view into the backing store so store-level
        // rollback assertions observe the state writes.
        let mut db = self.db.borrow_mut();
        for (address, account) in &self.live {
            db.put(address.as_slice().to_vec(), account.balance.to_be_bytes::<32>().to_vec());
        }
        db.put(b"state-root".to_vec(), self.root.as_slice().to_vec());
        Ok(())
    }

    fn account_exists(&self, address: Address) -> ProviderResult<bool> {
        Ok(self.lookup(address).is_some())
    }

    fn create_account(&mut self, address: Address, balance: U256) -> ProviderResult<()> {
        self.dirty.insert(address, TestAccount { balance });
        Ok(())
    }

    fn balance(&self, address: Address) -> ProviderResult<U256> {
        Ok(self.lookup(address).map_or(U256::ZERO, |account| account.balance))
    }

    fn add_to_balance(
        &mut self,
        address: Address,
        value: U256,
        _spec: &ForkSpec,
    ) -> ProviderResult<()> {
        let mut account =
            self.lookup(address).cloned().ok_or(ProviderError::AccountNotFound(address))?;
        account.balance += value;
        self.dirty.insert(address, account);
        Ok(())
    }

    fn subtract_from_balance(
        &mut self,
        address: Address,
        value: U256,
        _spec: &ForkSpec,
    ) -> ProviderResult<()> {
        let mut account =
            self.lookup(address).cloned().ok_or(ProviderError::AccountNotFound(address))?;
        account.balance -= value;
        self.dirty.insert(address, account);
        Ok(())
    }
}

/// Delegating [`StateProvider`] so tests retain a handle after the processor
/// boxes its copy.
#[derive(Debug, Clone)]
pub(crate) struct SharedState(pub(crate) Rc<RefCell<TestState>>);

impl StateProvider for SharedState {
    fn state_root(&self) -> B256 {
        self.0.borrow().state_root()
    }

    fn set_state_root(&mut self, root: B256) {
        self.0.borrow_mut().set_state_root(root);
    }

    fn reset(&mut self) {
        self.0.borrow_mut().reset();
    }

    fn commit(&mut self, spec: &ForkSpec) -> ProviderResult<()> {
        self.0.borrow_mut().commit(spec)
    }

    fn commit_tree(&mut self) -> ProviderResult<()> {
        self.0.borrow_mut().commit_tree()
    }

    fn account_exists(&self, address: Address) -> ProviderResult<bool> {
        self.0.borrow().account_exists(address)
    }

    fn create_account(&mut self, address: Address, balance: U256) -> ProviderResult<()> {
        self.0.borrow_mut().create_account(address, balance)
    }

    fn balance(&self, address: Address) -> ProviderResult<U256> {
        self.0.borrow().balance(address)
    }

    fn add_to_balance(
        &mut self,
        address: Address,
        value: U256,
        spec: &ForkSpec,
    ) -> ProviderResult<()> {
        self.0.borrow_mut().add_to_balance(address, value, spec)
    }

    fn subtract_from_balance(
        &mut self,
        address: Address,
        value: U256,
        spec: &ForkSpec,
    ) -> ProviderResult<()> {
        self.0.borrow_mut().subtract_from_balance(address, value, spec)
    }
}

/// Counters observed by branch-realignment and commit assertions.
#[derive(Debug, Default)]
pub(crate) struct StorageStats {
    pub(crate) resets: usize,
    pub(crate) commits: usize,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SharedStorage(pub(crate) Rc<RefCell<StorageStats>>);

impl StorageProvider for SharedStorage {
    fn reset(&mut self) {
        self.0.borrow_mut().resets += 1;
    }

    fn commit_trees(&mut self) -> ProviderResult<()> {
        self.0.borrow_mut().commits += 1;
        Ok(())
    }
}

/// A per-transaction plan interpreted by the [`ScriptedExecutor`].
#[derive(Debug, Clone, Default)]
pub(crate) struct TxPlan {
    pub(crate) gas_used: u64,
    pub(crate) logs: Vec<Log>,
    /// Credit this account as a side effect, creating it if needed.
    pub(crate) credit: Option<(Address, U256)>,
}

/// Executes transactions by looking up their plan by hash; state side effects
/// go through the same provider the processor later commits.
#[derive(Debug, Default)]
pub(crate) struct ScriptedExecutor {
    plans: BTreeMap<B256, TxPlan>,
    cumulative_gas: u64,
}

impl ScriptedExecutor {
    pub(crate) fn new(plans: BTreeMap<B256, TxPlan>) -> Self {
        Self { plans, cumulative_gas: 0 }
    }
}

impl TransactionExecutor for ScriptedExecutor {
    fn execute(
        &mut self,
        index: usize,
        tx: &Transaction,
        _header: &Header,
        state: &mut dyn StateProvider,
        _storage: &mut dyn StorageProvider,
        trace: bool,
    ) -> ProcessorResult<ExecutionOutcome> {
        let tx_hash = tx.hash.expect("the runner rejects hashless transactions");
        let plan = self.plans.get(&tx_hash).cloned().unwrap_or_default();

        if index == 0 {
            self.cumulative_gas = 0;
        }
        self.cumulative_gas += plan.gas_used;

        if let Some((address, value)) = plan.credit {
            if state.account_exists(address)? {
                state.add_to_balance(address, value, &ForkSpec::default())?;
            } else {
                state.create_account(address, value)?;
            }
        }

        let receipt = Receipt {
            tx_hash,
            block_hash: None,
            post_state: Some(keccak256(tx_hash)),
            success: true,
            cumulative_gas_used: self.cumulative_gas,
            logs: plan.logs.clone(),
            bloom: logs_bloom(plan.logs.iter()),
        };

        let trace = trace.then(|| TxTrace {
            tx_hash,
            gas_used: plan.gas_used,
            failed: false,
            output: Bytes::new(),
        });

        Ok(ExecutionOutcome { receipt, trace })
    }
}

/// Accepts every processed block except an optionally configured height.
#[derive(Debug, Clone, Default)]
pub(crate) struct RejectingValidator {
    pub(crate) reject_number: Option<u64>,
}

impl BlockValidator for RejectingValidator {
    fn validate_processed_block(&self, processed: &SealedBlock, _suggested: &SealedBlock) -> bool {
        self.reject_number != Some(processed.number())
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SharedReceiptStore(pub(crate) Rc<RefCell<BTreeMap<B256, Receipt>>>);

impl ReceiptStore for SharedReceiptStore {
    fn store_receipt(&mut self, tx_hash: B256, receipt: &Receipt) -> ProviderResult<()> {
        self.0.borrow_mut().insert(tx_hash, receipt.clone());
        Ok(())
    }
}

/// Traces an allow-listed set of transactions and records what it receives.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingTracer {
    pub(crate) traced: BTreeSet<B256>,
    pub(crate) records: Vec<(B256, TxTrace)>,
}

impl TraceListener for RecordingTracer {
    fn should_trace(&self, tx_hash: B256) -> bool {
        self.traced.contains(&tx_hash)
    }

    fn record_trace(&mut self, tx_hash: B256, trace: TxTrace) {
        self.records.push((tx_hash, trace));
    }
}

/// A fully wired processor over shared doubles, plus the handles tests use
/// for assertions.
#[derive(Debug)]
pub(crate) struct Harness {
    pub(crate) processor: BlockProcessor,
    pub(crate) state: Rc<RefCell<TestState>>,
    pub(crate) state_db: SharedDb,
    pub(crate) code_db: SharedDb,
    pub(crate) storage: Rc<RefCell<StorageStats>>,
    pub(crate) receipts: Rc<RefCell<BTreeMap<B256, Receipt>>>,
}

impl Harness {
    pub(crate) fn new(
        chain_spec: ChainSpec,
        genesis: &[(Address, U256)],
        plans: BTreeMap<B256, TxPlan>,
        reject_number: Option<u64>,
    ) -> Self {
        let chain_spec = Arc::new(chain_spec);
        let state_db = SharedDb::default();
        let code_db = SharedDb::default();
        let state = Rc::new(RefCell::new(TestState::new(state_db.clone(), genesis)));
        let storage = Rc::new(RefCell::new(StorageStats::default()));
        let receipts = Rc::new(RefCell::new(BTreeMap::new()));

        let processor = BlockProcessor::new(
            chain_spec.clone(),
            Box::new(ScriptedExecutor::new(plans)),
            Box::new(SharedState(state.clone())),
            Box::new(SharedStorage(storage.clone())),
            Box::new(SharedStore(state_db.clone())),
            Box::new(SharedStore(code_db.clone())),
            Box::new(RejectingValidator { reject_number }),
            Box::new(EraRewardCalculator::new(chain_spec)),
            Box::new(SharedReceiptStore(receipts.clone())),
        );

        Self { processor, state, state_db, code_db, storage, receipts }
    }

    pub(crate) fn state_root(&self) -> B256 {
        self.state.borrow().state_root()
    }

    pub(crate) fn balance(&self, address: Address) -> U256 {
        self.state.borrow().balance(address).unwrap()
    }

    /// The observable content of both backing stores.
    pub(crate) fn store_fingerprints(
        &self,
    ) -> ((usize, BTreeMap<Vec<u8>, Vec<u8>>), (usize, BTreeMap<Vec<u8>, Vec<u8>>)) {
        (self.state_db.borrow().fingerprint(), self.code_db.borrow().fingerprint())
    }
}

/// A suggested block over the given transactions.
pub(crate) fn suggested_block(
    number: u64,
    beneficiary: Address,
    transactions: Vec<Transaction>,
) -> SealedBlock {
    let header = Header {
        parent_hash: B256::repeat_byte(number as u8),
        beneficiary,
        number,
        gas_limit: 8_000_000,
        timestamp: 1_438_269_988 + number,
        transactions_root: keccak256(number.to_be_bytes()),
        ..Default::default()
    };
    Block { header, transactions, ommers: Vec::new() }.seal_slow()
}
