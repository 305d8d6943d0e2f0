//! The per-block protocol rule set.

use alloy_primitives::U256;

/// Base block reward before Byzantium.
pub const FRONTIER_BLOCK_REWARD: U256 = U256::from_limbs([5_000_000_000_000_000_000, 0, 0, 0]);

/// Base block reward from Byzantium onward (EIP-649).
pub const BYZANTIUM_BLOCK_REWARD: U256 = U256::from_limbs([3_000_000_000_000_000_000, 0, 0, 0]);

/// Base block reward from Constantinople onward (EIP-1234).
pub const CONSTANTINOPLE_BLOCK_REWARD: U256 = U256::from_limbs([2_000_000_000_000_000_000, 0, 0, 0]);

/// The protocol rule set active at a single block number.
///
/// Produced by [`SpecProvider::spec_at`](crate::SpecProvider::spec_at); the
/// processing core threads it through every state mutation so that
/// fork-conditional behavior stays centralized in the schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForkSpec {
    /// EIP-158/161: state commits clear touched empty accounts.
    pub is_eip158_enabled: bool,
    /// EIP-658: receipts serialize a status byte instead of an intermediate
    /// state root.
    pub is_eip658_enabled: bool,
    /// Base consensus reward for sealing a block in this era.
    pub block_reward: U256,
}
