//! Batch processing options.

/// Flags controlling one [`process`](crate::BlockProcessor::process) call.
///
/// Flags are independent and combine with struct-update syntax:
///
/// ```
/// use ferrite_processor::ProcessingOptions;
///
/// let options = ProcessingOptions {
///     store_receipts: true,
///     ..ProcessingOptions::READ_ONLY_CHAIN
/// };
/// assert!(options.read_only_chain && options.store_receipts);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingOptions {
    /// Roll the batch back unconditionally once it completes; the returned
    /// blocks are the only output.
    pub read_only_chain: bool,
    /// Skip post-execution validation.
    pub no_validation: bool,
    /// Persist receipts to the receipt store when the batch commits.
    pub store_receipts: bool,
}

impl ProcessingOptions {
    /// Process and durably commit, with validation and without receipt
    /// persistence.
    pub const NONE: Self =
        Self { read_only_chain: false, no_validation: false, store_receipts: false };

    /// Speculative execution: always roll back.
    pub const READ_ONLY_CHAIN: Self = Self { read_only_chain: true, ..Self::NONE };

    /// Skip post-execution validation.
    pub const NO_VALIDATION: Self = Self { no_validation: true, ..Self::NONE };

    /// Persist receipts when the batch commits.
    pub const STORE_RECEIPTS: Self = Self { store_receipts: true, ..Self::NONE };
}
