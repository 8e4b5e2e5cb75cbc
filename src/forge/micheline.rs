//! Micheline expression tree and its self-describing tag-prefixed binary
//! codec (spec §4.3).
//!
//! No dynamic dispatch: a node is one variant of [`Expr`], matched
//! structurally rather than modeled as an object hierarchy (spec §9).

use num_bigint::BigInt;

use crate::forge::error::ForgeError;
use crate::forge::prim;
use crate::zarith;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Int(BigInt),
    String(String),
    Bytes(Vec<u8>),
    Prim {
        prim: String,
        args: Vec<Expr>,
        annots: Vec<String>,
    },
    Sequence(Vec<Expr>),
}

impl Expr {
    /// Convenience constructor for a zero-argument, unannotated prim (e.g. `Unit`).
    pub fn prim0(name: impl Into<String>) -> Expr {
        Expr::Prim { prim: name.into(), args: Vec::new(), annots: Vec::new() }
    }
}

const TAG_INT: u8 = 0x00;
const TAG_STRING: u8 = 0x01;
const TAG_SEQUENCE: u8 = 0x02;
const TAG_PRIM0: u8 = 0x03;
const TAG_PRIM0_ANNOTS: u8 = 0x04;
const TAG_PRIM1: u8 = 0x05;
const TAG_PRIM1_ANNOTS: u8 = 0x06;
const TAG_PRIM2: u8 = 0x07;
const TAG_PRIM2_ANNOTS: u8 = 0x08;
const TAG_PRIMN: u8 = 0x09;
const TAG_BYTES: u8 = 0x0a;

fn push_u32_be(buf: &mut Vec<u8>, n: u32) {
    buf.extend_from_slice(&n.to_be_bytes());
}

fn take_u32_be(bytes: &[u8], pos: &mut usize) -> Result<u32, ForgeError> {
    let slice = bytes.get(*pos..*pos + 4).ok_or(ForgeError::Truncated)?;
    *pos += 4;
    Ok(u32::from_be_bytes(slice.try_into().unwrap()))
}

fn take_n(bytes: &[u8], pos: &mut usize, n: usize) -> Result<&[u8], ForgeError> {
    let slice = bytes.get(*pos..*pos + n).ok_or(ForgeError::Truncated)?;
    *pos += n;
    Ok(slice)
}

fn take_byte(bytes: &[u8], pos: &mut usize) -> Result<u8, ForgeError> {
    let b = *bytes.get(*pos).ok_or(ForgeError::Truncated)?;
    *pos += 1;
    Ok(b)
}

fn encode_annots(annots: &[String]) -> Vec<u8> {
    let joined = annots.join(" ");
    let mut out = Vec::new();
    push_u32_be(&mut out, joined.len() as u32);
    out.extend_from_slice(joined.as_bytes());
    out
}

fn decode_annots(bytes: &[u8], pos: &mut usize) -> Result<Vec<String>, ForgeError> {
    let len = take_u32_be(bytes, pos)? as usize;
    let raw = take_n(bytes, pos, len)?;
    let s = std::str::from_utf8(raw).map_err(|_| ForgeError::InvalidUtf8)?;
    if s.is_empty() {
        Ok(Vec::new())
    } else {
        Ok(s.split(' ').map(|a| a.to_string()).collect())
    }
}

/// Encodes `node` to its canonical binary form.
pub fn forge_micheline(node: &Expr) -> Result<Vec<u8>, ForgeError> {
    let mut out = Vec::new();
    forge_into(node, &mut out)?;
    Ok(out)
}

fn forge_into(node: &Expr, out: &mut Vec<u8>) -> Result<(), ForgeError> {
    match node {
        Expr::Int(n) => {
            out.push(TAG_INT);
            out.extend_from_slice(&zarith::encode(n));
        }
        Expr::String(s) => {
            out.push(TAG_STRING);
            push_u32_be(out, s.len() as u32);
            out.extend_from_slice(s.as_bytes());
        }
        Expr::Bytes(b) => {
            out.push(TAG_BYTES);
            push_u32_be(out, b.len() as u32);
            out.extend_from_slice(b);
        }
        Expr::Sequence(items) => {
            out.push(TAG_SEQUENCE);
            let mut body = Vec::new();
            for item in items {
                forge_into(item, &mut body)?;
            }
            push_u32_be(out, body.len() as u32);
            out.extend_from_slice(&body);
        }
        Expr::Prim { prim: name, args, annots } => {
            let tag_byte = prim::tag_of(name)?;
            let has_annots = !annots.is_empty();
            match (args.len(), has_annots) {
                (0, false) => {
                    out.push(TAG_PRIM0);
                    out.push(tag_byte);
                }
                (0, true) => {
                    out.push(TAG_PRIM0_ANNOTS);
                    out.push(tag_byte);
                    out.extend_from_slice(&encode_annots(annots));
                }
                (1, false) => {
                    out.push(TAG_PRIM1);
                    out.push(tag_byte);
                    forge_into(&args[0], out)?;
                }
                (1, true) => {
                    out.push(TAG_PRIM1_ANNOTS);
                    out.push(tag_byte);
                    forge_into(&args[0], out)?;
                    out.extend_from_slice(&encode_annots(annots));
                }
                (2, false) => {
                    out.push(TAG_PRIM2);
                    out.push(tag_byte);
                    forge_into(&args[0], out)?;
                    forge_into(&args[1], out)?;
                }
                (2, true) => {
                    out.push(TAG_PRIM2_ANNOTS);
                    out.push(tag_byte);
                    forge_into(&args[0], out)?;
                    forge_into(&args[1], out)?;
                    out.extend_from_slice(&encode_annots(annots));
                }
                _ => {
                    out.push(TAG_PRIMN);
                    out.push(tag_byte);
                    let mut args_body = Vec::new();
                    for arg in args {
                        forge_into(arg, &mut args_body)?;
                    }
                    push_u32_be(out, args_body.len() as u32);
                    out.extend_from_slice(&args_body);
                    out.extend_from_slice(&encode_annots(annots));
                }
            }
        }
    }
    Ok(())
}

/// Decodes a single Micheline node from `bytes`, requiring the entire input
/// to be consumed.
pub fn unforge_micheline(bytes: &[u8]) -> Result<Expr, ForgeError> {
    let mut pos = 0;
    let node = unforge_from(bytes, &mut pos)?;
    if pos != bytes.len() {
        return Err(ForgeError::TrailingBytes(bytes.len() - pos));
    }
    Ok(node)
}

fn unforge_from(bytes: &[u8], pos: &mut usize) -> Result<Expr, ForgeError> {
    let tag = take_byte(bytes, pos)?;
    match tag {
        TAG_INT => {
            let (n, consumed) = zarith::consume(&bytes[*pos..])?;
            *pos += consumed;
            Ok(Expr::Int(n))
        }
        TAG_STRING => {
            let len = take_u32_be(bytes, pos)? as usize;
            let raw = take_n(bytes, pos, len)?;
            let s = std::str::from_utf8(raw).map_err(|_| ForgeError::InvalidUtf8)?;
            Ok(Expr::String(s.to_string()))
        }
        TAG_BYTES => {
            let len = take_u32_be(bytes, pos)? as usize;
            Ok(Expr::Bytes(take_n(bytes, pos, len)?.to_vec()))
        }
        TAG_SEQUENCE => {
            let len = take_u32_be(bytes, pos)? as usize;
            let end = *pos + len;
            if end > bytes.len() {
                return Err(ForgeError::Truncated);
            }
            let mut items = Vec::new();
            while *pos < end {
                items.push(unforge_from(bytes, pos)?);
            }
            Ok(Expr::Sequence(items))
        }
        TAG_PRIM0 => {
            let tag_byte = take_byte(bytes, pos)?;
            Ok(Expr::Prim { prim: prim::name_of(tag_byte)?.to_string(), args: Vec::new(), annots: Vec::new() })
        }
        TAG_PRIM0_ANNOTS => {
            let tag_byte = take_byte(bytes, pos)?;
            let annots = decode_annots(bytes, pos)?;
            Ok(Expr::Prim { prim: prim::name_of(tag_byte)?.to_string(), args: Vec::new(), annots })
        }
        TAG_PRIM1 => {
            let tag_byte = take_byte(bytes, pos)?;
            let arg = unforge_from(bytes, pos)?;
            Ok(Expr::Prim { prim: prim::name_of(tag_byte)?.to_string(), args: vec![arg], annots: Vec::new() })
        }
        TAG_PRIM1_ANNOTS => {
            let tag_byte = take_byte(bytes, pos)?;
            let arg = unforge_from(bytes, pos)?;
            let annots = decode_annots(bytes, pos)?;
            Ok(Expr::Prim { prim: prim::name_of(tag_byte)?.to_string(), args: vec![arg], annots })
        }
        TAG_PRIM2 => {
            let tag_byte = take_byte(bytes, pos)?;
            let a = unforge_from(bytes, pos)?;
            let b = unforge_from(bytes, pos)?;
            Ok(Expr::Prim { prim: prim::name_of(tag_byte)?.to_string(), args: vec![a, b], annots: Vec::new() })
        }
        TAG_PRIM2_ANNOTS => {
            let tag_byte = take_byte(bytes, pos)?;
            let a = unforge_from(bytes, pos)?;
            let b = unforge_from(bytes, pos)?;
            let annots = decode_annots(bytes, pos)?;
            Ok(Expr::Prim { prim: prim::name_of(tag_byte)?.to_string(), args: vec![a, b], annots })
        }
        TAG_PRIMN => {
            let tag_byte = take_byte(bytes, pos)?;
            let args_len = take_u32_be(bytes, pos)? as usize;
            let args_end = *pos + args_len;
            if args_end > bytes.len() {
                return Err(ForgeError::Truncated);
            }
            let mut args = Vec::new();
            while *pos < args_end {
                args.push(unforge_from(bytes, pos)?);
            }
            let annots = decode_annots(bytes, pos)?;
            Ok(Expr::Prim { prim: prim::name_of(tag_byte)?.to_string(), args, annots })
        }
        other => Err(ForgeError::UnknownNodeTag(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    #[test]
    fn round_trip_int() {
        let node = Expr::Int(BigInt::from_i64(-917_431_994).unwrap());
        let bytes = forge_micheline(&node).unwrap();
        assert_eq!(unforge_micheline(&bytes).unwrap(), node);
    }

    #[test]
    fn round_trip_unit() {
        let node = Expr::prim0("Unit");
        let bytes = forge_micheline(&node).unwrap();
        assert_eq!(bytes, vec![TAG_PRIM0, 0x0b]);
        assert_eq!(unforge_micheline(&bytes).unwrap(), node);
    }

    #[test]
    fn round_trip_pair_with_two_args() {
        let node = Expr::Prim {
            prim: "Pair".to_string(),
            args: vec![Expr::Int(BigInt::from(1)), Expr::Int(BigInt::from(2))],
            annots: Vec::new(),
        };
        let bytes = forge_micheline(&node).unwrap();
        assert_eq!(bytes[0], TAG_PRIM2);
        assert_eq!(unforge_micheline(&bytes).unwrap(), node);
    }

    #[test]
    fn round_trip_primn_with_three_args() {
        let node = Expr::Prim {
            prim: "Pair".to_string(),
            args: vec![
                Expr::Int(BigInt::from(1)),
                Expr::Int(BigInt::from(2)),
                Expr::Int(BigInt::from(3)),
            ],
            annots: Vec::new(),
        };
        let bytes = forge_micheline(&node).unwrap();
        assert_eq!(bytes[0], TAG_PRIMN);
        assert_eq!(unforge_micheline(&bytes).unwrap(), node);
    }

    #[test]
    fn round_trip_annotated_prim() {
        let node = Expr::Prim {
            prim: "Left".to_string(),
            args: vec![Expr::String("hi".to_string())],
            annots: vec!["%x".to_string(), ":y".to_string()],
        };
        let bytes = forge_micheline(&node).unwrap();
        assert_eq!(bytes[0], TAG_PRIM1_ANNOTS);
        assert_eq!(unforge_micheline(&bytes).unwrap(), node);
    }

    #[test]
    fn round_trip_sequence_and_bytes() {
        let node = Expr::Sequence(vec![
            Expr::Bytes(vec![0xde, 0xad, 0xbe, 0xef]),
            Expr::String("tezos".to_string()),
        ]);
        let bytes = forge_micheline(&node).unwrap();
        assert_eq!(unforge_micheline(&bytes).unwrap(), node);
    }

    #[test]
    fn unknown_prim_name_is_rejected() {
        let node = Expr::prim0("NOT_A_PRIM");
        assert!(matches!(forge_micheline(&node), Err(ForgeError::Prim(_))));
    }

    #[test]
    fn truncated_input_is_rejected() {
        assert_eq!(unforge_micheline(&[TAG_INT]), Err(ForgeError::Truncated));
        assert_eq!(unforge_micheline(&[]), Err(ForgeError::Truncated));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let node = Expr::prim0("Unit");
        let mut bytes = forge_micheline(&node).unwrap();
        bytes.push(0x00);
        assert_eq!(unforge_micheline(&bytes), Err(ForgeError::TrailingBytes(1)));
    }
}
