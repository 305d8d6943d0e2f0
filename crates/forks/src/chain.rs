//! The chain-wide fork schedule.

use crate::{
    BYZANTIUM_BLOCK_REWARD, CONSTANTINOPLE_BLOCK_REWARD, DaoForkConfig, FRONTIER_BLOCK_REWARD,
    ForkSpec, SpecProvider,
};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Fork schedule and chain-wide settings, keyed by activation block number.
///
/// A fork with no scheduled block (`None`) is never active. Activation is
/// inclusive: a fork scheduled at block `n` is active at `n` and every block
/// after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainSpec {
    /// Network chain id.
    pub chain_id: u64,
    /// Homestead activation block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homestead_block: Option<u64>,
    /// Tangerine Whistle (EIP-150) activation block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tangerine_block: Option<u64>,
    /// Spurious Dragon (EIP-158/161) activation block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spurious_dragon_block: Option<u64>,
    /// Byzantium (EIP-649, EIP-658) activation block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byzantium_block: Option<u64>,
    /// Constantinople (EIP-1234) activation block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constantinople_block: Option<u64>,
    /// The DAO irregular state transition, if this chain schedules one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dao_fork: Option<DaoForkConfig>,
}

impl ChainSpec {
    /// Returns `true` if Homestead is active at the given block number.
    pub fn is_homestead_active(&self, number: u64) -> bool {
        self.homestead_block.is_some_and(|b| number >= b)
    }

    /// Returns `true` if Tangerine Whistle is active at the given block number.
    pub fn is_tangerine_active(&self, number: u64) -> bool {
        self.tangerine_block.is_some_and(|b| number >= b)
    }

    /// Returns `true` if Spurious Dragon is active at the given block number.
    pub fn is_spurious_dragon_active(&self, number: u64) -> bool {
        self.spurious_dragon_block.is_some_and(|b| number >= b)
    }

    /// Returns `true` if Byzantium is active at the given block number.
    pub fn is_byzantium_active(&self, number: u64) -> bool {
        self.byzantium_block.is_some_and(|b| number >= b)
    }

    /// Returns `true` if Constantinople is active at the given block number.
    pub fn is_constantinople_active(&self, number: u64) -> bool {
        self.constantinople_block.is_some_and(|b| number >= b)
    }

    /// The base consensus reward for a block sealed at the given number.
    pub fn block_reward(&self, number: u64) -> U256 {
        if self.is_constantinople_active(number) {
            CONSTANTINOPLE_BLOCK_REWARD
        } else if self.is_byzantium_active(number) {
            BYZANTIUM_BLOCK_REWARD
        } else {
            FRONTIER_BLOCK_REWARD
        }
    }
}

impl SpecProvider for ChainSpec {
    fn spec_at(&self, number: u64) -> ForkSpec {
        ForkSpec {
            is_eip158_enabled: self.is_spurious_dragon_active(number),
            is_eip658_enabled: self.is_byzantium_active(number),
            block_reward: self.block_reward(number),
        }
    }

    fn dao_fork(&self) -> Option<&DaoForkConfig> {
        self.dao_fork.as_ref()
    }
}

/// Builds [`ChainSpec`]s for embedders and tests.
///
/// The `*_activated` methods schedule a fork from genesis and imply every
/// earlier fork, mirroring how live networks roll upgrades out cumulatively.
#[derive(Debug, Clone, Default)]
pub struct ChainSpecBuilder {
    spec: ChainSpec,
}

impl ChainSpecBuilder {
    /// A mainnet-flavored schedule with every fork unscheduled.
    pub fn frontier() -> Self {
        Self { spec: ChainSpec { chain_id: 1, ..Default::default() } }
    }

    /// Sets the chain id.
    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.spec.chain_id = chain_id;
        self
    }

    /// Activates Homestead from genesis.
    pub fn homestead_activated(mut self) -> Self {
        self.spec.homestead_block = Some(0);
        self
    }

    /// Activates Tangerine Whistle (and earlier forks) from genesis.
    pub fn tangerine_activated(mut self) -> Self {
        self = self.homestead_activated();
        self.spec.tangerine_block = Some(0);
        self
    }

    /// Activates Spurious Dragon (and earlier forks) from genesis.
    pub fn spurious_dragon_activated(mut self) -> Self {
        self = self.tangerine_activated();
        self.spec.spurious_dragon_block = Some(0);
        self
    }

    /// Activates Byzantium (and earlier forks) from genesis.
    pub fn byzantium_activated(mut self) -> Self {
        self = self.spurious_dragon_activated();
        self.spec.byzantium_block = Some(0);
        self
    }

    /// Activates Constantinople (and earlier forks) from genesis.
    pub fn constantinople_activated(mut self) -> Self {
        self = self.byzantium_activated();
        self.spec.constantinople_block = Some(0);
        self
    }

    /// Schedules the DAO transition.
    pub fn with_dao_fork(mut self, dao: DaoForkConfig) -> Self {
        self.spec.dao_fork = Some(dao);
        self
    }

    /// Finalizes the schedule.
    pub fn build(self) -> ChainSpec {
        self.spec
    }
}
