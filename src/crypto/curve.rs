//! Curve dispatch as a tagged variant (spec §9: "prefer a tagged variant
//! `Curve ∈ {Ed25519, Secp256k1, P256}`... do not use inheritance").

use crate::crypto::base58::Prefix;
use crate::crypto::error::CryptoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    Ed25519,
    Secp256k1,
    P256,
}

impl Curve {
    /// The 1-byte curve tag used in forged public keys and operation `source` fields.
    pub const fn tag(self) -> u8 {
        match self {
            Curve::Ed25519 => 0x00,
            Curve::Secp256k1 => 0x01,
            Curve::P256 => 0x02,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, CryptoError> {
        match tag {
            0x00 => Ok(Curve::Ed25519),
            0x01 => Ok(Curve::Secp256k1),
            0x02 => Ok(Curve::P256),
            other => Err(CryptoError::UnsupportedCurve(other)),
        }
    }

    pub const fn public_key_prefix(self) -> Prefix {
        match self {
            Curve::Ed25519 => Prefix::EdPk,
            Curve::Secp256k1 => Prefix::SpPk,
            Curve::P256 => Prefix::P2Pk,
        }
    }

    pub const fn secret_key_prefix(self) -> Prefix {
        match self {
            Curve::Ed25519 => Prefix::EdSk,
            Curve::Secp256k1 => Prefix::SpSk,
            Curve::P256 => Prefix::P2Sk,
        }
    }

    pub const fn signature_prefix(self) -> Prefix {
        match self {
            Curve::Ed25519 => Prefix::EdSig,
            Curve::Secp256k1 => Prefix::SpSig,
            Curve::P256 => Prefix::P2Sig,
        }
    }

    pub const fn public_key_hash_prefix(self) -> Prefix {
        match self {
            Curve::Ed25519 => Prefix::Tz1,
            Curve::Secp256k1 => Prefix::Tz2,
            Curve::P256 => Prefix::Tz3,
        }
    }

    /// Maps a public-key-hash prefix (`tz1`/`tz2`/`tz3`) back to its curve.
    pub fn from_pkh_prefix(prefix: Prefix) -> Result<Self, CryptoError> {
        match prefix {
            Prefix::Tz1 => Ok(Curve::Ed25519),
            Prefix::Tz2 => Ok(Curve::Secp256k1),
            Prefix::Tz3 => Ok(Curve::P256),
            _ => Err(CryptoError::UnsupportedCurve(0xff)),
        }
    }

    /// Maps a secret-key prefix (`edsk`/`spsk`/`p2sk`) back to its curve.
    pub fn from_secret_key_prefix(prefix: Prefix) -> Result<Self, CryptoError> {
        match prefix {
            Prefix::EdSk => Ok(Curve::Ed25519),
            Prefix::SpSk => Ok(Curve::Secp256k1),
            Prefix::P2Sk => Ok(Curve::P256),
            _ => Err(CryptoError::UnsupportedCurve(0xff)),
        }
    }

    /// Maps a public-key prefix (`edpk`/`sppk`/`p2pk`) back to its curve.
    pub fn from_public_key_prefix(prefix: Prefix) -> Result<Self, CryptoError> {
        match prefix {
            Prefix::EdPk => Ok(Curve::Ed25519),
            Prefix::SpPk => Ok(Curve::Secp256k1),
            Prefix::P2Pk => Ok(Curve::P256),
            _ => Err(CryptoError::UnsupportedCurve(0xff)),
        }
    }
}
