use thiserror::Error;

use crate::crypto::base58::Base58Error;
use crate::crypto::CryptoError;
use crate::forge::prim::PrimError;
use crate::zarith::ZarithError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ForgeError {
    #[error(transparent)]
    Prim(#[from] PrimError),

    #[error(transparent)]
    Zarith(#[from] ZarithError),

    #[error(transparent)]
    Base58(#[from] Base58Error),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("input ended before the expected structure was complete")]
    Truncated,

    #[error("top-level Micheline tag {0:#x} is not one of 00-0a")]
    UnknownNodeTag(u8),

    #[error("a Micheline String node was not valid UTF-8")]
    InvalidUtf8,

    #[error("operation kind tag {0:#x} is not one of the supported kinds")]
    UnknownOperationKind(u8),

    #[error("address outer tag {0:#x} is neither 00 (implicit) nor 01 (originated)")]
    UnknownAddressTag(u8),

    #[error("trailing bytes after a complete structure: {0} unconsumed")]
    TrailingBytes(usize),
}
