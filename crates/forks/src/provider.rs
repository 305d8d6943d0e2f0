//! The fork-lookup seam consumed by the block processor.

use crate::{DaoForkConfig, ForkSpec};

/// Supplies the protocol rule set for a block number.
///
/// Every fork-conditional branch in the processing core funnels through this
/// trait; block-number comparisons do not appear anywhere else.
#[auto_impl::auto_impl(&, Arc)]
pub trait SpecProvider {
    /// The rule set active at `number`.
    fn spec_at(&self, number: u64) -> ForkSpec;

    /// The DAO transition, if this chain schedules one.
    fn dao_fork(&self) -> Option<&DaoForkConfig>;
}
