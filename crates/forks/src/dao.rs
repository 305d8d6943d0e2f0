//! The DAO irregular state transition, expressed as configuration.

use alloc::vec::Vec;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// The one-shot balance migration applied at the DAO fork block.
///
/// The drained account table and the withdrawal beneficiary are carried as
/// chain configuration rather than baked-in constants; consensus only fixes
/// them for mainnet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaoForkConfig {
    /// The block number the migration runs at.
    pub activation_block: u64,
    /// The withdrawal contract every drained balance is credited to.
    pub beneficiary: Address,
    /// The accounts whose balances are drained.
    pub drained_accounts: Vec<Address>,
}

impl DaoForkConfig {
    /// Returns `true` if the migration runs at the given block number.
    pub const fn activates_at(&self, number: u64) -> bool {
        self.activation_block == number
    }
}
