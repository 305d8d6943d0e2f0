//! The all-or-nothing guard over a processing batch.

use alloy_primitives::B256;

/// The rewind point for one batch: the version markers of the two backing
/// stores plus the state root at capture time.
///
/// A checkpoint must be consumed by the batch driver's commit or restore
/// path. Dropping an armed checkpoint means a batch ended without either,
/// which trips a debug assertion.
#[derive(Debug)]
#[must_use = "a checkpoint must be committed or restored"]
pub(crate) struct Checkpoint {
    state_db_version: usize,
    code_db_version: usize,
    state_root: B256,
    armed: bool,
}

impl Checkpoint {
    /// Captures a rewind point from the given markers.
    pub(crate) const fn new(
        state_db_version: usize,
        code_db_version: usize,
        state_root: B256,
    ) -> Self {
        Self { state_db_version, code_db_version, state_root, armed: true }
    }

    /// Disarms the guard and yields the captured markers.
    pub(crate) fn release(mut self) -> (usize, usize, B256) {
        self.armed = false;
        (self.state_db_version, self.code_db_version, self.state_root)
    }
}

impl Drop for Checkpoint {
    fn drop(&mut self) {
        debug_assert!(!self.armed, "checkpoint dropped without commit or restore");
    }
}
