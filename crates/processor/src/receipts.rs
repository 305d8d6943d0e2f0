//! Receipt-trie root and bloom aggregation.

use alloy_consensus::EMPTY_ROOT_HASH;
use alloy_primitives::{B256, Bloom};
use alloy_trie::root::ordered_trie_root_with_encoder;
use ferrite_forks::ForkSpec;
use ferrite_primitives::{Header, Receipt};

/// Computes the root of the index-keyed receipt trie.
///
/// The trie is ephemeral: its leaves are the fork-gated receipt encodings,
/// keyed by the RLP of each receipt's position in the block. An empty block
/// yields the canonical empty-trie hash.
pub fn receipts_root(receipts: &[Receipt], eip658: bool) -> B256 {
    if receipts.is_empty() {
        return EMPTY_ROOT_HASH;
    }
    ordered_trie_root_with_encoder(receipts, |receipt, out| receipt.encode_for_root(eip658, out))
}

/// The component-wise OR of every receipt's bloom.
pub fn aggregate_bloom(receipts: &[Receipt]) -> Bloom {
    receipts.iter().fold(Bloom::ZERO, |bloom, receipt| bloom | receipt.bloom)
}

/// Writes the derived receipt fields onto a working header: receipts root,
/// bloom, and the gas consumed by the block.
pub(crate) fn seal_receipts_into(header: &mut Header, receipts: &[Receipt], spec: &ForkSpec) {
    header.receipts_root = receipts_root(receipts, spec.is_eip658_enabled);
    header.logs_bloom = aggregate_bloom(receipts);
    header.gas_used = receipts.last().map_or(0, |receipt| receipt.cumulative_gas_used);
}
