//! Standalone Base58↔bytes address and public-key forging (spec §4.3's
//! "Optimized address encoding" / "Public-key encoding").

use crate::crypto::base58::{self, Prefix};
use crate::crypto::curve::Curve;
use crate::forge::error::ForgeError;

const TAG_IMPLICIT: u8 = 0x00;
const TAG_ORIGINATED: u8 = 0x01;

/// Forges a Base58 address string (`tz1`/`tz2`/`tz3`/`KT1`, optionally
/// carrying a `%entrypoint` suffix that is dropped — entrypoints are not
/// part of the 22-byte address form) into its wire bytes.
pub fn forge_address(address: &str) -> Result<Vec<u8>, ForgeError> {
    let base = address.split('%').next().unwrap_or(address);
    let (prefix, hash) = base58::decode_any(base)?;
    let mut out = Vec::with_capacity(22);
    match prefix {
        Prefix::Tz1 | Prefix::Tz2 | Prefix::Tz3 => {
            let curve = Curve::from_pkh_prefix(prefix)?;
            out.push(TAG_IMPLICIT);
            out.push(curve.tag());
            out.extend_from_slice(&hash);
        }
        Prefix::Kt1 => {
            out.push(TAG_ORIGINATED);
            out.extend_from_slice(&hash);
            out.push(0x00);
        }
        _ => return Err(ForgeError::UnknownAddressTag(0xff)),
    }
    Ok(out)
}

/// Inverse of [`forge_address`]: parses the 22-byte wire form back into a
/// Base58 address string.
pub fn unforge_address(bytes: &[u8]) -> Result<String, ForgeError> {
    if bytes.len() != 22 {
        return Err(ForgeError::Truncated);
    }
    match bytes[0] {
        TAG_IMPLICIT => {
            let curve = Curve::from_tag(bytes[1]).map_err(ForgeError::Crypto)?;
            Ok(base58::encode(curve.public_key_hash_prefix(), &bytes[2..22])?)
        }
        TAG_ORIGINATED => Ok(base58::encode(Prefix::Kt1, &bytes[1..21])?),
        other => Err(ForgeError::UnknownAddressTag(other)),
    }
}

/// Forges a Base58 public key string (`edpk`/`sppk`/`p2pk`) into
/// curve-tag-prefixed wire bytes (spec §4.3's "Public-key encoding").
pub fn forge_public_key(public_key: &str) -> Result<Vec<u8>, ForgeError> {
    let (prefix, raw) = base58::decode_any(public_key)?;
    let curve = Curve::from_public_key_prefix(prefix).map_err(ForgeError::Crypto)?;
    let mut out = Vec::with_capacity(1 + raw.len());
    out.push(curve.tag());
    out.extend_from_slice(&raw);
    Ok(out)
}

/// Inverse of [`forge_public_key`].
pub fn unforge_public_key(bytes: &[u8]) -> Result<String, ForgeError> {
    let (tag, raw) = bytes.split_first().ok_or(ForgeError::Truncated)?;
    let curve = Curve::from_tag(*tag).map_err(ForgeError::Crypto)?;
    Ok(base58::encode(curve.public_key_prefix(), raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_2_forge_address() {
        let bytes = forge_address("tz1LKpeN8ZSSFNyTWiBNaE4u4sjaq7J1Vz2z").unwrap();
        assert_eq!(
            hex::encode(&bytes),
            "0000078694ecd15392219b7e47814ecfa11f90192642"
        );
    }

    #[test]
    fn scenario_3_forge_public_key() {
        let bytes =
            forge_public_key("edpktsPhZ8weLEXqf4Fo5FS9Qx8ZuX4QpEBEwe63L747G8iDjTAF6w").unwrap();
        assert_eq!(
            hex::encode(&bytes),
            "001de67a53b0d3ab18dd6c415da17c9f83015489cde2c7165a3ada081a6049b78f"
        );
    }

    #[test]
    fn address_round_trips() {
        let s = "tz1LKpeN8ZSSFNyTWiBNaE4u4sjaq7J1Vz2z";
        let bytes = forge_address(s).unwrap();
        assert_eq!(unforge_address(&bytes).unwrap(), s);
    }

    #[test]
    fn originated_address_round_trips() {
        let s = "KT1VYUxhLoSvouozCaDGL1XcswnagNfwr3yi";
        let bytes = forge_address(s).unwrap();
        assert_eq!(bytes[0], TAG_ORIGINATED);
        assert_eq!(unforge_address(&bytes).unwrap(), s);
    }

    #[test]
    fn public_key_round_trips() {
        let s = "edpktsPhZ8weLEXqf4Fo5FS9Qx8ZuX4QpEBEwe63L747G8iDjTAF6w";
        let bytes = forge_public_key(s).unwrap();
        assert_eq!(unforge_public_key(&bytes).unwrap(), s);
    }

    #[test]
    fn entrypoint_suffix_is_dropped_before_forging() {
        let with_entrypoint = forge_address("KT1VYUxhLoSvouozCaDGL1XcswnagNfwr3yi%default").unwrap();
        let without = forge_address("KT1VYUxhLoSvouozCaDGL1XcswnagNfwr3yi").unwrap();
        assert_eq!(with_entrypoint, without);
    }
}
