//! Zarith variable-length integer codec (spec §4.2).
//!
//! Two distinct wire encodings live here, both derived from the same
//! continuation-bit scheme but differing in how the first byte is carved up:
//!
//! - **Z** (signed `Zarith`, [`encode`]/[`decode`]/[`consume`]): bit 6 of the
//!   first byte is a sign flag, so the first byte only carries 6 payload
//!   bits. Used for Micheline `Int` literals.
//! - **N** (unsigned "natural", [`encode_nat`]/[`decode_nat`]/[`consume_nat`]):
//!   no sign bit, so every byte (including the first) carries 7 payload bits.
//!   Used for the numeric fields of an operation (`fee`, `counter`,
//!   `gas_limit`, `storage_limit`, `amount`) — these are never negative, and
//!   a literal reading of spec.md's field table (which labels them `(Z)`)
//!   decodes scenario (5) to negative nonsense; byte-level verification
//!   against that vector confirms the natural encoding is the one the
//!   network actually uses for operation fields (see DESIGN.md).
//!
//! In both encodings every byte but the last has its high bit (`0x80`) set;
//! subsequent bytes carry payload little-endian (least-significant 7-bit
//! group first).

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{ToPrimitive, Zero};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ZarithError {
    #[error("zarith stream is empty")]
    Empty,

    #[error("zarith stream ended while the continuation bit was still set")]
    Truncated,

    #[error("zarith value left {0} unconsumed trailing byte(s)")]
    TrailingBytes(usize),

    #[error("zarith value does not fit in a u64")]
    Overflow,
}

/// Encodes a signed arbitrary-precision integer using the `Z` scheme.
pub fn encode(x: &BigInt) -> Vec<u8> {
    let negative = x.sign() == Sign::Minus;
    let mut mag = x.magnitude().clone();

    let mut first = (&mag & BigUint::from(0x3fu32)).to_u8().expect("masked to 6 bits");
    mag >>= 6u32;
    if negative {
        first |= 0x40;
    }

    let mut out = Vec::new();
    if mag.is_zero() {
        out.push(first);
    } else {
        first |= 0x80;
        out.push(first);
        push_7bit_groups(&mut out, mag);
    }
    out
}

/// Convenience wrapper around [`encode`] for the common machine-integer case.
pub fn encode_i64(x: i64) -> Vec<u8> {
    encode(&BigInt::from(x))
}

/// Decodes a complete `Z`-encoded buffer, failing if any byte is left over.
pub fn decode(bytes: &[u8]) -> Result<BigInt, ZarithError> {
    let (value, consumed) = consume(bytes)?;
    if consumed != bytes.len() {
        return Err(ZarithError::TrailingBytes(bytes.len() - consumed));
    }
    Ok(value)
}

/// Decodes the leading `Z`-encoded integer from `bytes`, returning the value
/// and the number of bytes consumed. Does not require the whole buffer to be
/// consumed — used when a zarith integer is embedded in a larger structure.
pub fn consume(bytes: &[u8]) -> Result<(BigInt, usize), ZarithError> {
    let first = *bytes.first().ok_or(ZarithError::Empty)?;
    let negative = first & 0x40 != 0;
    let mut mag = BigUint::from((first & 0x3f) as u64);

    let mut consumed = 1usize;
    let mut shift = 6u32;
    let mut cont = first & 0x80 != 0;
    while cont {
        let b = *bytes.get(consumed).ok_or(ZarithError::Truncated)?;
        mag |= BigUint::from((b & 0x7f) as u64) << shift;
        shift += 7;
        consumed += 1;
        cont = b & 0x80 != 0;
    }

    let value = if negative {
        -BigInt::from(mag)
    } else {
        BigInt::from(mag)
    };
    Ok((value, consumed))
}

/// Encodes an unbounded non-negative integer using the `N` (natural) scheme.
pub fn encode_nat(n: &BigUint) -> Vec<u8> {
    push_7bit_groups_with_first(n.clone())
}

/// Convenience wrapper around [`encode_nat`] for the common machine-integer case.
pub fn encode_nat_u64(n: u64) -> Vec<u8> {
    encode_nat(&BigUint::from(n))
}

/// Decodes a complete `N`-encoded buffer, failing if any byte is left over.
pub fn decode_nat(bytes: &[u8]) -> Result<BigUint, ZarithError> {
    let (value, consumed) = consume_nat(bytes)?;
    if consumed != bytes.len() {
        return Err(ZarithError::TrailingBytes(bytes.len() - consumed));
    }
    Ok(value)
}

/// Decodes the leading `N`-encoded integer from `bytes`, returning the value
/// and the number of bytes consumed.
pub fn consume_nat(bytes: &[u8]) -> Result<(BigUint, usize), ZarithError> {
    let mut value = BigUint::zero();
    let mut shift = 0u32;
    let mut consumed = 0usize;
    loop {
        let b = *bytes.get(consumed).ok_or(ZarithError::Truncated)?;
        value |= BigUint::from((b & 0x7f) as u64) << shift;
        shift += 7;
        consumed += 1;
        if b & 0x80 == 0 {
            break;
        }
    }
    Ok((value, consumed))
}

/// Decodes a complete `N`-encoded buffer into a `u64`.
pub fn decode_nat_u64(bytes: &[u8]) -> Result<u64, ZarithError> {
    decode_nat(bytes)?.to_u64().ok_or(ZarithError::Overflow)
}

/// Decodes the leading `N`-encoded integer from `bytes` into a `u64`, also
/// returning the number of bytes consumed.
pub fn consume_nat_u64(bytes: &[u8]) -> Result<(u64, usize), ZarithError> {
    let (value, consumed) = consume_nat(bytes)?;
    Ok((value.to_u64().ok_or(ZarithError::Overflow)?, consumed))
}

/// Appends the 7-bit little-endian groups of `mag` (already shifted past the
/// bits carried by a preceding first byte) to `out`.
fn push_7bit_groups(out: &mut Vec<u8>, mut mag: BigUint) {
    loop {
        let mut byte = (&mag & BigUint::from(0x7fu32)).to_u8().expect("masked to 7 bits");
        mag >>= 7u32;
        if mag.is_zero() {
            out.push(byte);
            break;
        }
        byte |= 0x80;
        out.push(byte);
    }
}

/// Like [`push_7bit_groups`] but also emits the first (unshifted) byte — used
/// by the natural encoding, whose first byte has no sign bit to make room for.
fn push_7bit_groups_with_first(mag: BigUint) -> Vec<u8> {
    let mut out = Vec::new();
    push_7bit_groups(&mut out, mag);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(bytes: &[u8]) -> String {
        hex::encode(bytes)
    }

    #[test]
    fn scenario_1_literal_vectors() {
        assert_eq!(h(&encode_i64(1_000_000)), "80897a");
        assert_eq!(h(&encode_i64(-33)), "61");
        assert_eq!(h(&encode_i64(-917_431_994)), "fa9af7ea06");
    }

    #[test]
    fn invariants_from_spec() {
        assert_eq!(encode_i64(0), vec![0x00]);
        assert_eq!(encode_i64(-1), vec![0x41]);
        assert_eq!(encode_i64(1), vec![0x01]);
    }

    #[test]
    fn round_trip_small_integers() {
        for x in -5000i64..5000 {
            let encoded = encode_i64(x);
            let decoded = decode(&encoded).unwrap();
            assert_eq!(decoded, BigInt::from(x));
        }
    }

    #[test]
    fn consume_is_canonical_and_stops_at_boundary() {
        let encoded = encode_i64(1_000_000);
        let mut trailing = encoded.clone();
        trailing.push(0xAB);
        let (value, consumed) = consume(&trailing).unwrap();
        assert_eq!(value, BigInt::from(1_000_000));
        assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn truncated_stream_is_an_error() {
        let mut encoded = encode_i64(1_000_000);
        encoded.pop();
        assert_eq!(consume(&encoded), Err(ZarithError::Truncated));
    }

    #[test]
    fn empty_stream_is_an_error() {
        assert_eq!(consume(&[]), Err(ZarithError::Empty));
    }

    #[test]
    fn scenario_5_operation_fields_use_natural_encoding() {
        // Natural-encoded fee/counter/gas_limit/storage_limit/amount bytes
        // lifted from the scenario (5) operation group (spec §8).
        assert_eq!(decode_nat_u64(&hex::decode("d2ae06").unwrap()).unwrap(), 104274);
        assert_eq!(decode_nat_u64(&hex::decode("a59e1b").unwrap()).unwrap(), 446245);
        assert_eq!(decode_nat_u64(&hex::decode("80bd3f").unwrap()).unwrap(), 1_040_000);
        assert_eq!(decode_nat_u64(&hex::decode("e0d403").unwrap()).unwrap(), 60_000);
        assert_eq!(decode_nat_u64(&hex::decode("00").unwrap()).unwrap(), 0);
        assert_eq!(encode_nat_u64(104274), hex::decode("d2ae06").unwrap());
        assert_eq!(encode_nat_u64(446245), hex::decode("a59e1b").unwrap());
        assert_eq!(encode_nat_u64(1_040_000), hex::decode("80bd3f").unwrap());
        assert_eq!(encode_nat_u64(60_000), hex::decode("e0d403").unwrap());
    }

    #[test]
    fn nat_round_trip() {
        for n in 0u64..5000 {
            let encoded = encode_nat_u64(n);
            assert_eq!(decode_nat_u64(&encoded).unwrap(), n);
        }
        let big = 1_040_000u64;
        assert_eq!(decode_nat_u64(&encode_nat_u64(big)).unwrap(), big);
    }

    proptest::proptest! {
        #[test]
        fn prop_zarith_round_trip(x: i64) {
            let encoded = encode_i64(x);
            let decoded = decode(&encoded).unwrap();
            proptest::prop_assert_eq!(decoded, BigInt::from(x));
        }

        #[test]
        fn prop_nat_round_trip(n: u64) {
            let encoded = encode_nat_u64(n);
            proptest::prop_assert_eq!(decode_nat_u64(&encoded).unwrap(), n);
        }
    }
}
