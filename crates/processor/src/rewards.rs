//! Consensus reward calculation.

use crate::traits::RewardCalculator;
use alloc::{sync::Arc, vec::Vec};
use alloy_primitives::{Address, U256};
use ferrite_forks::ChainSpec;
use ferrite_primitives::Block;

/// The provenance of a reward delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardKind {
    /// The sealing reward, paid to the block beneficiary.
    Block,
    /// The inclusion reward, paid to an ommer's beneficiary.
    Ommer,
}

/// A single consensus reward delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockReward {
    /// The credited address.
    pub beneficiary: Address,
    /// The value added to its balance.
    pub value: U256,
    /// Where the reward comes from.
    pub kind: RewardKind,
}

/// The canonical proof-of-work reward schedule.
///
/// The block beneficiary receives the era base reward plus 1/32 of it per
/// included ommer; each ommer's beneficiary receives the base reward scaled
/// by `(8 - depth) / 8`. Era values come from the fork schedule.
#[derive(Debug, Clone)]
pub struct EraRewardCalculator {
    spec: Arc<ChainSpec>,
}

impl EraRewardCalculator {
    /// Creates a calculator over the given fork schedule.
    pub fn new(spec: Arc<ChainSpec>) -> Self {
        Self { spec }
    }
}

impl RewardCalculator for EraRewardCalculator {
    fn calculate_rewards(&self, block: &Block) -> Vec<BlockReward> {
        let number = block.header.number;
        let base = self.spec.block_reward(number);

        let mut rewards = Vec::with_capacity(1 + block.ommers.len());
        let inclusion = base * U256::from(block.ommers.len()) / U256::from(32u64);
        rewards.push(BlockReward {
            beneficiary: block.header.beneficiary,
            value: base + inclusion,
            kind: RewardKind::Block,
        });

        for ommer in &block.ommers {
            let depth = number.saturating_sub(ommer.number);
            if depth >= 8 {
                continue;
            }
            rewards.push(BlockReward {
                beneficiary: ommer.beneficiary,
                value: base * U256::from(8 - depth) / U256::from(8u64),
                kind: RewardKind::Ommer,
            });
        }

        rewards
    }
}
