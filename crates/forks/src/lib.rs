#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod fork;
pub use fork::{
    BYZANTIUM_BLOCK_REWARD, CONSTANTINOPLE_BLOCK_REWARD, FRONTIER_BLOCK_REWARD, ForkSpec,
};

mod dao;
pub use dao::DaoForkConfig;

mod chain;
pub use chain::{ChainSpec, ChainSpecBuilder};

mod provider;
pub use provider::SpecProvider;
