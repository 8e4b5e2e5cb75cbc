//! HTTP client for preapply/inject workflows against a remote node
//! (spec §4.8).

pub mod client;
pub mod error;

pub use client::{NodeClient, PoolConfig};
pub use error::RpcError;
