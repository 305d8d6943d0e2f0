#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod header;
pub use header::{Header, SealedHeader};

mod block;
pub use block::{Block, SealedBlock};

mod transaction;
pub use transaction::Transaction;

mod receipt;
pub use receipt::Receipt;
