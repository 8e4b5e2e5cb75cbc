//! Client-side toolkit for forging, signing and submitting operations to a
//! Tezos-format permissionless blockchain.
//!
//! The hard core — [`zarith`], [`forge`], and [`crypto`] — is purely
//! functional and byte-exact against the network's wire format. [`fee`] and
//! [`rpc`] are thin glue around a remote node's simulate/inject workflow.

pub mod config;
pub mod crypto;
pub mod error;
pub mod fee;
pub mod forge;
pub mod rpc;
pub mod zarith;

pub use error::{Error, Result};
