//! Crate-wide error aggregation.
//!
//! Every component owns its own error enum (`ZarithError`, `Base58Error`,
//! `forge::ForgeError`, `crypto::CryptoError`, `rpc::RpcError`); this
//! top-level `Error` wraps each via `#[from]` so callers crossing module
//! boundaries can bubble errors with `?` without matching on the source.

use thiserror::Error;

use crate::crypto::base58::Base58Error;
use crate::crypto::CryptoError;
use crate::forge::ForgeError;
use crate::rpc::RpcError;
use crate::zarith::ZarithError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Base58(#[from] Base58Error),

    #[error(transparent)]
    Zarith(#[from] ZarithError),

    #[error(transparent)]
    Forge(#[from] ForgeError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

pub type Result<T> = std::result::Result<T, Error>;
