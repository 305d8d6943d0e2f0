//! The single-block pipeline and the batch driver on top of it.

use crate::{
    checkpoint::Checkpoint,
    errors::{ProcessorError, ProcessorResult},
    options::ProcessingOptions,
    receipts,
    traits::{
        BlockValidator, ReceiptStore, RewardCalculator, SnapshotStore, StateProvider,
        StorageProvider, TraceListener, TransactionExecutor,
    },
};
use alloc::{boxed::Box, sync::Arc, vec::Vec};
use alloy_primitives::{B256, Bloom, U256};
use ferrite_forks::{ChainSpec, DaoForkConfig, SpecProvider};
use ferrite_primitives::{Block, Header, Receipt, SealedBlock, Transaction};

/// Advances world state over a linear sequence of candidate blocks.
///
/// One [`process`](Self::process) call is a batch: the two backing stores are
/// snapshotted up front and the batch either commits durably or rewinds to
/// that snapshot, never anything in between. The processor is the sole writer
/// to its providers and stores for the duration of a batch; execution is
/// strictly sequential.
pub struct BlockProcessor {
    chain_spec: Arc<ChainSpec>,
    executor: Box<dyn TransactionExecutor>,
    state: Box<dyn StateProvider>,
    storage: Box<dyn StorageProvider>,
    state_db: Box<dyn SnapshotStore>,
    code_db: Box<dyn SnapshotStore>,
    validator: Box<dyn BlockValidator>,
    rewards: Box<dyn RewardCalculator>,
    receipt_store: Box<dyn ReceiptStore>,
    /// Receipts awaiting the batch's durable commit.
    pending_receipts: Vec<(B256, Receipt)>,
}

impl core::fmt::Debug for BlockProcessor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BlockProcessor")
            .field("chain_spec", &self.chain_spec)
            .field("pending_receipts", &self.pending_receipts.len())
            .finish_non_exhaustive()
    }
}

impl BlockProcessor {
    /// Creates a processor over its collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chain_spec: Arc<ChainSpec>,
        executor: Box<dyn TransactionExecutor>,
        state: Box<dyn StateProvider>,
        storage: Box<dyn StorageProvider>,
        state_db: Box<dyn SnapshotStore>,
        code_db: Box<dyn SnapshotStore>,
        validator: Box<dyn BlockValidator>,
        rewards: Box<dyn RewardCalculator>,
        receipt_store: Box<dyn ReceiptStore>,
    ) -> Self {
        Self {
            chain_spec,
            executor,
            state,
            storage,
            state_db,
            code_db,
            validator,
            rewards,
            receipt_store,
            pending_receipts: Vec::new(),
        }
    }

    /// The fork schedule the processor runs under.
    pub fn chain_spec(&self) -> &Arc<ChainSpec> {
        &self.chain_spec
    }

    /// A shared view of the state provider.
    pub fn state(&self) -> &dyn StateProvider {
        self.state.as_ref()
    }

    /// Processes a batch of suggested blocks on top of `branch_state_root`.
    ///
    /// Returned blocks correspond positionally to the input, each carrying
    /// the recomputed receipts root, bloom, state root and hash. On any error
    /// the stores and providers are rewound to their pre-batch snapshot
    /// before the error surfaces; with
    /// [`read_only_chain`](ProcessingOptions::read_only_chain) the rewind
    /// happens even on success and the returned blocks are the only output.
    pub fn process(
        &mut self,
        branch_state_root: Option<B256>,
        suggested: &[SealedBlock],
        options: ProcessingOptions,
        tracer: &mut dyn TraceListener,
    ) -> ProcessorResult<Vec<SealedBlock>> {
        if suggested.is_empty() {
            return Ok(Vec::new());
        }

        let checkpoint = self.capture();
        self.realign_branch(branch_state_root);

        info!(
            target: "block_processor",
            count = suggested.len(),
            first = suggested[0].number(),
            ?options,
            "Processing batch"
        );

        match self.run_batch(suggested, options, tracer) {
            Ok(processed) => {
                if options.read_only_chain {
                    debug!(target: "block_processor", "Read-only batch complete, restoring");
                    self.restore(checkpoint)?;
                } else {
                    self.commit(checkpoint)?;
                }
                Ok(processed)
            }
            Err(err) => {
                // Every failure rolls back, not only invalid blocks; the
                // stores must never be left mid-batch.
                warn!(target: "block_processor", %err, "Batch failed, rolling back");
                if let Err(restore_err) = self.restore(checkpoint) {
                    error!(
                        target: "block_processor",
                        %restore_err,
                        "Rollback after failed batch also failed"
                    );
                }
                Err(err)
            }
        }
    }

    /// Captures the rewind point for a batch.
    fn capture(&mut self) -> Checkpoint {
        Checkpoint::new(
            self.state_db.take_snapshot(),
            self.code_db.take_snapshot(),
            self.state.state_root(),
        )
    }

    /// Rewinds the stores and providers to a captured checkpoint and
    /// discards any receipts buffered since.
    fn restore(&mut self, checkpoint: Checkpoint) -> ProcessorResult<()> {
        let (state_db_version, code_db_version, state_root) = checkpoint.release();
        self.pending_receipts.clear();
        self.state_db.restore(state_db_version)?;
        self.code_db.restore(code_db_version)?;
        self.storage.reset();
        self.state.reset();
        self.state.set_state_root(state_root);
        debug!(target: "block_processor", root = %state_root, "Restored processing snapshot");
        Ok(())
    }

    /// Flushes buffered receipts, then durably commits both backing stores.
    ///
    /// The two store commits are sequential, not transactional: a crash
    /// between them leaves the stores inconsistent. Closing the window
    /// requires a single write batch spanning both column families in the
    /// backing database.
    fn commit(&mut self, checkpoint: Checkpoint) -> ProcessorResult<()> {
        if let Err(err) = self.flush_receipts() {
            self.restore(checkpoint)?;
            return Err(err);
        }
        checkpoint.release();
        self.state_db.commit()?;
        self.code_db.commit()?;
        debug!(target: "block_processor", root = %self.state.state_root(), "Committed batch");
        Ok(())
    }

    /// Persists the receipts buffered during the batch.
    fn flush_receipts(&mut self) -> ProcessorResult<()> {
        if self.pending_receipts.is_empty() {
            return Ok(());
        }
        debug!(
            target: "block_processor",
            count = self.pending_receipts.len(),
            "Persisting receipts"
        );
        let pending = core::mem::take(&mut self.pending_receipts);
        for (tx_hash, receipt) in &pending {
            self.receipt_store.store_receipt(*tx_hash, receipt)?;
        }
        Ok(())
    }

    /// Repoints the providers at the caller's branch parent when it differs
    /// from the current root, discarding uncommitted in-memory writes.
    fn realign_branch(&mut self, branch_state_root: Option<B256>) {
        let Some(root) = branch_state_root else { return };
        if root == self.state.state_root() {
            return;
        }
        debug!(
            target: "block_processor",
            current = %self.state.state_root(),
            branch = %root,
            "Realigning to branch state root"
        );
        self.storage.reset();
        self.state.reset();
        self.state.set_state_root(root);
    }

    fn run_batch(
        &mut self,
        suggested: &[SealedBlock],
        options: ProcessingOptions,
        tracer: &mut dyn TraceListener,
    ) -> ProcessorResult<Vec<SealedBlock>> {
        let mut processed = Vec::with_capacity(suggested.len());
        for block in suggested {
            processed.push(self.process_one(block, options, tracer)?);
        }
        Ok(processed)
    }

    /// Runs the single-block pipeline, then folds the providers' trees into
    /// the backing stores.
    fn process_one(
        &mut self,
        suggested: &SealedBlock,
        options: ProcessingOptions,
        tracer: &mut dyn TraceListener,
    ) -> ProcessorResult<SealedBlock> {
        let block = if suggested.is_genesis() {
            // Genesis carries its own pre-seeded state; emit it unchanged.
            trace!(target: "block_processor", "Genesis passthrough");
            suggested.clone()
        } else {
            self.execute_and_seal(suggested, options, tracer)?
        };
        self.state.commit_tree()?;
        self.storage.commit_trees()?;
        Ok(block)
    }

    fn execute_and_seal(
        &mut self,
        suggested: &SealedBlock,
        options: ProcessingOptions,
        tracer: &mut dyn TraceListener,
    ) -> ProcessorResult<SealedBlock> {
        debug!(
            target: "block_processor",
            number = suggested.number(),
            hash = %suggested.hash(),
            tx_count = suggested.transactions.len(),
            "Processing block"
        );
        let chain_spec = Arc::clone(&self.chain_spec);

        if let Some(dao) = chain_spec.dao_fork() {
            if dao.activates_at(suggested.number()) {
                self.apply_dao_transition(dao)?;
            }
        }

        let mut block = working_copy(suggested);
        let spec = chain_spec.spec_at(block.header.number);

        let tx_receipts = self.execute_transactions(&block.header, &block.transactions, tracer)?;
        receipts::seal_receipts_into(&mut block.header, &tx_receipts, &spec);

        self.apply_rewards(&block)?;

        // Fold the executor's trie changes and read back the resulting root.
        self.state.commit(&spec)?;
        block.header.state_root = self.state.state_root();

        // The transaction trie is taken on trust from the suggestion; the
        // structural validation pass upstream has already verified it.
        block.header.transactions_root = suggested.header.transactions_root;

        let processed = block.seal_slow();

        if !options.read_only_chain
            && !options.no_validation
            && !self.validator.validate_processed_block(&processed, suggested)
        {
            warn!(
                target: "block_processor",
                number = suggested.number(),
                hash = %suggested.hash(),
                "Post-execution validation failed"
            );
            return Err(ProcessorError::InvalidBlock {
                number: suggested.number(),
                hash: suggested.hash(),
            });
        }

        if options.store_receipts {
            let block_hash = processed.hash();
            for mut receipt in tx_receipts {
                receipt.block_hash = Some(block_hash);
                self.pending_receipts.push((receipt.tx_hash, receipt));
            }
        }

        Ok(processed)
    }

    /// Runs every transaction of the block in declared order, collecting
    /// receipts.
    fn execute_transactions(
        &mut self,
        header: &Header,
        transactions: &[Transaction],
        tracer: &mut dyn TraceListener,
    ) -> ProcessorResult<Vec<Receipt>> {
        let mut tx_receipts = Vec::with_capacity(transactions.len());
        for (index, tx) in transactions.iter().enumerate() {
            let Some(tx_hash) = tx.hash else {
                return Err(ProcessorError::MissingTransactionHash {
                    index,
                    number: header.number,
                });
            };

            let should_trace = tracer.should_trace(tx_hash);
            trace!(target: "block_processor", %tx_hash, index, should_trace, "Executing transaction");
            let outcome = self.executor.execute(
                index,
                tx,
                header,
                self.state.as_mut(),
                self.storage.as_mut(),
                should_trace,
            )?;

            if should_trace {
                if let Some(tx_trace) = outcome.trace {
                    tracer.record_trace(tx_hash, tx_trace);
                }
            }
            tx_receipts.push(outcome.receipt);
        }
        Ok(tx_receipts)
    }

    /// Applies the block's consensus reward deltas, creating recipient
    /// accounts as needed.
    fn apply_rewards(&mut self, block: &Block) -> ProcessorResult<()> {
        let spec = self.chain_spec.spec_at(block.header.number);
        for reward in self.rewards.calculate_rewards(block) {
            trace!(
                target: "block_processor",
                beneficiary = %reward.beneficiary,
                value = %reward.value,
                kind = ?reward.kind,
                "Applying reward"
            );
            if self.state.account_exists(reward.beneficiary)? {
                self.state.add_to_balance(reward.beneficiary, reward.value, &spec)?;
            } else {
                self.state.create_account(reward.beneficiary, reward.value)?;
            }
        }
        Ok(())
    }

    /// The DAO irregular state transition: drains the configured account set
    /// into the withdrawal beneficiary, before any transaction of the
    /// activation block runs.
    fn apply_dao_transition(&mut self, dao: &DaoForkConfig) -> ProcessorResult<()> {
        info!(
            target: "block_processor",
            block = dao.activation_block,
            accounts = dao.drained_accounts.len(),
            "Applying DAO transition"
        );
        let spec = self.chain_spec.spec_at(dao.activation_block);
        if !self.state.account_exists(dao.beneficiary)? {
            self.state.create_account(dao.beneficiary, U256::ZERO)?;
        }
        for address in &dao.drained_accounts {
            if !self.state.account_exists(*address)? {
                continue;
            }
            let balance = self.state.balance(*address)?;
            self.state.add_to_balance(dao.beneficiary, balance, &spec)?;
            self.state.subtract_from_balance(*address, balance, &spec)?;
        }
        Ok(())
    }
}

/// Clones a suggestion into the mutable working form, clearing the header
/// fields the pipeline recomputes.
fn working_copy(suggested: &SealedBlock) -> Block {
    let header = Header {
        state_root: B256::ZERO,
        transactions_root: B256::ZERO,
        receipts_root: B256::ZERO,
        logs_bloom: Bloom::ZERO,
        gas_used: 0,
        ..suggested.header.inner().clone()
    };
    Block {
        header,
        transactions: suggested.transactions.clone(),
        ommers: suggested.ommers.clone(),
    }
}
