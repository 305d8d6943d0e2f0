#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
extern crate tracing;

mod errors;
pub use errors::{ProcessorError, ProcessorResult, ProviderError, ProviderResult};

mod options;
pub use options::ProcessingOptions;

mod traits;
pub use traits::{
    BlockValidator, ExecutionOutcome, NoopTraceListener, ReceiptStore, RewardCalculator,
    SnapshotStore, StateProvider, StorageProvider, TraceListener, TransactionExecutor, TxTrace,
};

mod checkpoint;

mod receipts;
pub use receipts::{aggregate_bloom, receipts_root};

mod rewards;
pub use rewards::{BlockReward, EraRewardCalculator, RewardKind};

mod processor;
pub use processor::BlockProcessor;

#[cfg(test)]
mod test_utils;
