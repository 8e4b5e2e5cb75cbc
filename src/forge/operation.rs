//! Operation and operation-group forging (spec §4.3's "Operation-group
//! forging").

use crate::crypto::base58::{self, Prefix};
use crate::crypto::curve::Curve;
use crate::forge::address::{forge_address, forge_public_key, unforge_address, unforge_public_key};
use crate::forge::error::ForgeError;
use crate::forge::micheline::{forge_micheline, unforge_micheline, Expr};
use crate::zarith;

const KIND_SEED_NONCE_REVELATION: u8 = 0x01;
const KIND_ACTIVATE_ACCOUNT: u8 = 0x04;
const KIND_REVEAL: u8 = 0x6b;
const KIND_TRANSACTION: u8 = 0x6c;
const KIND_ORIGINATION: u8 = 0x6d;
const KIND_DELEGATION: u8 = 0x6e;

const ENTRYPOINT_DEFAULT: u8 = 0x00;
const ENTRYPOINT_ROOT: u8 = 0x01;
const ENTRYPOINT_DO: u8 = 0x02;
const ENTRYPOINT_SET_DELEGATE: u8 = 0x03;
const ENTRYPOINT_REMOVE_DELEGATE: u8 = 0x04;
const ENTRYPOINT_DEPOSIT: u8 = 0x05;
const ENTRYPOINT_CUSTOM: u8 = 0xff;

/// `parameters` carried by a `transaction` (spec §4.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameters {
    pub entrypoint: String,
    pub value: Expr,
}

/// The fields common to every manager operation (`source`, `fee`, `counter`,
/// `gas_limit`, `storage_limit`) — spec §3's "At minimum" list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerFields {
    pub source: String,
    pub fee: u64,
    pub counter: u64,
    pub gas_limit: u64,
    pub storage_limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Supplemental kind (tag `01`): trivial fixed-width fields, included so
    /// `unforge_operation`'s tag dispatch has no hole (see DESIGN.md).
    SeedNonceRevelation { level: u32, nonce: [u8; 32] },
    Reveal { manager: ManagerFields, public_key: String },
    Transaction {
        manager: ManagerFields,
        amount: u64,
        destination: String,
        parameters: Option<Parameters>,
    },
    Origination {
        manager: ManagerFields,
        balance: u64,
        delegate: Option<String>,
        code: Expr,
        storage: Expr,
    },
    Delegation { manager: ManagerFields, delegate: Option<String> },
    /// Supplemental kind (tag `04`): pkh + 20-byte secret (spec §3).
    ActivateAccount { pkh: String, secret: [u8; 20] },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationGroup {
    pub branch: String,
    pub contents: Vec<Operation>,
}

fn push_nat(out: &mut Vec<u8>, n: u64) {
    out.extend_from_slice(&zarith::encode_nat_u64(n));
}

fn take_nat(bytes: &[u8], pos: &mut usize) -> Result<u64, ForgeError> {
    let (value, consumed) = zarith::consume_nat_u64(&bytes[*pos..])?;
    *pos += consumed;
    Ok(value)
}

fn forge_source(pkh: &str) -> Result<Vec<u8>, ForgeError> {
    // Same bytes as the implicit-address form without the outer `00` tag.
    let full = forge_address(pkh)?;
    Ok(full[1..].to_vec())
}

fn unforge_source(bytes: &[u8], pos: &mut usize) -> Result<String, ForgeError> {
    let curve_tag = *bytes.get(*pos).ok_or(ForgeError::Truncated)?;
    let curve = Curve::from_tag(curve_tag).map_err(ForgeError::Crypto)?;
    let hash = bytes.get(*pos + 1..*pos + 21).ok_or(ForgeError::Truncated)?;
    *pos += 21;
    Ok(base58::encode(curve.public_key_hash_prefix(), hash)?)
}

fn push_manager_fields(out: &mut Vec<u8>, m: &ManagerFields) -> Result<(), ForgeError> {
    out.extend_from_slice(&forge_source(&m.source)?);
    push_nat(out, m.fee);
    push_nat(out, m.counter);
    push_nat(out, m.gas_limit);
    push_nat(out, m.storage_limit);
    Ok(())
}

fn take_manager_fields(bytes: &[u8], pos: &mut usize) -> Result<ManagerFields, ForgeError> {
    Ok(ManagerFields {
        source: unforge_source(bytes, pos)?,
        fee: take_nat(bytes, pos)?,
        counter: take_nat(bytes, pos)?,
        gas_limit: take_nat(bytes, pos)?,
        storage_limit: take_nat(bytes, pos)?,
    })
}

fn forge_delegate(delegate: &Option<String>) -> Result<Vec<u8>, ForgeError> {
    let mut out = Vec::new();
    match delegate {
        None => out.push(0x00),
        Some(pkh) => {
            out.push(0xff);
            out.extend_from_slice(&forge_source(pkh)?);
        }
    }
    Ok(out)
}

fn take_delegate(bytes: &[u8], pos: &mut usize) -> Result<Option<String>, ForgeError> {
    let flag = *bytes.get(*pos).ok_or(ForgeError::Truncated)?;
    *pos += 1;
    match flag {
        0x00 => Ok(None),
        0xff => Ok(Some(unforge_source(bytes, pos)?)),
        _ => Err(ForgeError::Truncated),
    }
}

fn entrypoint_tag(entrypoint: &str) -> u8 {
    match entrypoint {
        "default" => ENTRYPOINT_DEFAULT,
        "root" => ENTRYPOINT_ROOT,
        "do" => ENTRYPOINT_DO,
        "set_delegate" => ENTRYPOINT_SET_DELEGATE,
        "remove_delegate" => ENTRYPOINT_REMOVE_DELEGATE,
        "deposit" => ENTRYPOINT_DEPOSIT,
        _ => ENTRYPOINT_CUSTOM,
    }
}

/// True for `{entrypoint: "default", value: Unit}`, the one parameters value
/// a transaction already carries implicitly when no parameters are given.
fn is_default_unit(p: &Parameters) -> bool {
    p.entrypoint == "default"
        && matches!(&p.value, Expr::Prim { prim, args, annots } if prim == "Unit" && args.is_empty() && annots.is_empty())
}

fn forge_entrypoint(entrypoint: &str) -> Vec<u8> {
    let tag = entrypoint_tag(entrypoint);
    let mut out = vec![tag];
    if tag == ENTRYPOINT_CUSTOM {
        out.push(entrypoint.len() as u8);
        out.extend_from_slice(entrypoint.as_bytes());
    }
    out
}

fn take_entrypoint(bytes: &[u8], pos: &mut usize) -> Result<String, ForgeError> {
    let tag = *bytes.get(*pos).ok_or(ForgeError::Truncated)?;
    *pos += 1;
    let name = match tag {
        ENTRYPOINT_DEFAULT => "default".to_string(),
        ENTRYPOINT_ROOT => "root".to_string(),
        ENTRYPOINT_DO => "do".to_string(),
        ENTRYPOINT_SET_DELEGATE => "set_delegate".to_string(),
        ENTRYPOINT_REMOVE_DELEGATE => "remove_delegate".to_string(),
        ENTRYPOINT_DEPOSIT => "deposit".to_string(),
        ENTRYPOINT_CUSTOM => {
            let len = *bytes.get(*pos).ok_or(ForgeError::Truncated)? as usize;
            *pos += 1;
            let raw = bytes.get(*pos..*pos + len).ok_or(ForgeError::Truncated)?;
            *pos += len;
            std::str::from_utf8(raw).map_err(|_| ForgeError::InvalidUtf8)?.to_string()
        }
        other => return Err(ForgeError::UnknownAddressTag(other)),
    };
    Ok(name)
}

/// Forges a single operation (no branch prefix) to its wire bytes.
pub fn forge_operation(op: &Operation) -> Result<Vec<u8>, ForgeError> {
    let mut out = Vec::new();
    match op {
        Operation::SeedNonceRevelation { level, nonce } => {
            out.push(KIND_SEED_NONCE_REVELATION);
            out.extend_from_slice(&level.to_be_bytes());
            out.extend_from_slice(nonce);
        }
        Operation::ActivateAccount { pkh, secret } => {
            out.push(KIND_ACTIVATE_ACCOUNT);
            let (prefix, hash) = base58::decode_any(pkh)?;
            if prefix != Prefix::Tz1 {
                return Err(ForgeError::UnknownAddressTag(0xff));
            }
            out.extend_from_slice(&hash);
            out.extend_from_slice(secret);
        }
        Operation::Reveal { manager, public_key } => {
            out.push(KIND_REVEAL);
            push_manager_fields(&mut out, manager)?;
            out.extend_from_slice(&forge_public_key(public_key)?);
        }
        Operation::Transaction { manager, amount, destination, parameters } => {
            out.push(KIND_TRANSACTION);
            push_manager_fields(&mut out, manager)?;
            push_nat(&mut out, *amount);
            out.extend_from_slice(&forge_address(destination)?);
            match parameters {
                // A `default` entrypoint called with the unit value is the
                // implicit default a plain transfer already gets, so it is
                // forged identically to an omitted parameters block.
                None => out.push(0x00),
                Some(p) if is_default_unit(p) => out.push(0x00),
                Some(Parameters { entrypoint, value }) => {
                    out.push(0xff);
                    out.extend_from_slice(&forge_entrypoint(entrypoint));
                    let micheline = forge_micheline(value)?;
                    out.extend_from_slice(&(micheline.len() as u32).to_be_bytes());
                    out.extend_from_slice(&micheline);
                }
            }
        }
        Operation::Origination { manager, balance, delegate, code, storage } => {
            out.push(KIND_ORIGINATION);
            push_manager_fields(&mut out, manager)?;
            push_nat(&mut out, *balance);
            out.extend_from_slice(&forge_delegate(delegate)?);
            let code_bytes = forge_micheline(code)?;
            let storage_bytes = forge_micheline(storage)?;
            out.extend_from_slice(&(code_bytes.len() as u32).to_be_bytes());
            out.extend_from_slice(&code_bytes);
            out.extend_from_slice(&(storage_bytes.len() as u32).to_be_bytes());
            out.extend_from_slice(&storage_bytes);
        }
        Operation::Delegation { manager, delegate } => {
            out.push(KIND_DELEGATION);
            push_manager_fields(&mut out, manager)?;
            out.extend_from_slice(&forge_delegate(delegate)?);
        }
    }
    Ok(out)
}

/// Decodes a single operation from `bytes` starting at `*pos`, advancing it.
fn unforge_operation_at(bytes: &[u8], pos: &mut usize) -> Result<Operation, ForgeError> {
    let kind = *bytes.get(*pos).ok_or(ForgeError::Truncated)?;
    *pos += 1;
    match kind {
        KIND_SEED_NONCE_REVELATION => {
            let level_bytes = bytes.get(*pos..*pos + 4).ok_or(ForgeError::Truncated)?;
            let level = u32::from_be_bytes(level_bytes.try_into().unwrap());
            *pos += 4;
            let nonce_slice = bytes.get(*pos..*pos + 32).ok_or(ForgeError::Truncated)?;
            let mut nonce = [0u8; 32];
            nonce.copy_from_slice(nonce_slice);
            *pos += 32;
            Ok(Operation::SeedNonceRevelation { level, nonce })
        }
        KIND_ACTIVATE_ACCOUNT => {
            let hash = bytes.get(*pos..*pos + 20).ok_or(ForgeError::Truncated)?;
            let pkh = base58::encode(Prefix::Tz1, hash)?;
            *pos += 20;
            let secret_slice = bytes.get(*pos..*pos + 20).ok_or(ForgeError::Truncated)?;
            let mut secret = [0u8; 20];
            secret.copy_from_slice(secret_slice);
            *pos += 20;
            Ok(Operation::ActivateAccount { pkh, secret })
        }
        KIND_REVEAL => {
            let manager = take_manager_fields(bytes, pos)?;
            let pk_tag = *bytes.get(*pos).ok_or(ForgeError::Truncated)?;
            let key_len = if pk_tag == Curve::Ed25519.tag() { 32 } else { 33 };
            let pk_bytes = bytes.get(*pos..*pos + 1 + key_len).ok_or(ForgeError::Truncated)?;
            let public_key = unforge_public_key(pk_bytes)?;
            *pos += 1 + key_len;
            Ok(Operation::Reveal { manager, public_key })
        }
        KIND_TRANSACTION => {
            let manager = take_manager_fields(bytes, pos)?;
            let amount = take_nat(bytes, pos)?;
            let addr_bytes = bytes.get(*pos..*pos + 22).ok_or(ForgeError::Truncated)?;
            let destination = unforge_address(addr_bytes)?;
            *pos += 22;
            let flag = *bytes.get(*pos).ok_or(ForgeError::Truncated)?;
            *pos += 1;
            let parameters = if flag == 0x00 {
                None
            } else {
                let entrypoint = take_entrypoint(bytes, pos)?;
                let len_bytes = bytes.get(*pos..*pos + 4).ok_or(ForgeError::Truncated)?;
                let len = u32::from_be_bytes(len_bytes.try_into().unwrap()) as usize;
                *pos += 4;
                let micheline_bytes = bytes.get(*pos..*pos + len).ok_or(ForgeError::Truncated)?;
                *pos += len;
                Some(Parameters { entrypoint, value: unforge_micheline(micheline_bytes)? })
            };
            Ok(Operation::Transaction { manager, amount, destination, parameters })
        }
        KIND_ORIGINATION => {
            let manager = take_manager_fields(bytes, pos)?;
            let balance = take_nat(bytes, pos)?;
            let delegate = take_delegate(bytes, pos)?;
            let code_len_bytes = bytes.get(*pos..*pos + 4).ok_or(ForgeError::Truncated)?;
            let code_len = u32::from_be_bytes(code_len_bytes.try_into().unwrap()) as usize;
            *pos += 4;
            let code_bytes = bytes.get(*pos..*pos + code_len).ok_or(ForgeError::Truncated)?;
            *pos += code_len;
            let code = unforge_micheline(code_bytes)?;
            let storage_len_bytes = bytes.get(*pos..*pos + 4).ok_or(ForgeError::Truncated)?;
            let storage_len = u32::from_be_bytes(storage_len_bytes.try_into().unwrap()) as usize;
            *pos += 4;
            let storage_bytes = bytes.get(*pos..*pos + storage_len).ok_or(ForgeError::Truncated)?;
            *pos += storage_len;
            let storage = unforge_micheline(storage_bytes)?;
            Ok(Operation::Origination { manager, balance, delegate, code, storage })
        }
        KIND_DELEGATION => {
            let manager = take_manager_fields(bytes, pos)?;
            let delegate = take_delegate(bytes, pos)?;
            Ok(Operation::Delegation { manager, delegate })
        }
        other => Err(ForgeError::UnknownOperationKind(other)),
    }
}

/// Decodes a single operation, requiring the entire input to be consumed.
pub fn unforge_operation(bytes: &[u8]) -> Result<Operation, ForgeError> {
    let mut pos = 0;
    let op = unforge_operation_at(bytes, &mut pos)?;
    if pos != bytes.len() {
        return Err(ForgeError::TrailingBytes(bytes.len() - pos));
    }
    Ok(op)
}

/// Forges an entire operation group: 32-byte branch followed by each
/// operation's bytes concatenated in order (spec §4.3).
pub fn forge_operation_group(group: &OperationGroup) -> Result<Vec<u8>, ForgeError> {
    let (_, branch) = base58::decode_any(&group.branch)?;
    let mut out = branch;
    for op in &group.contents {
        out.extend_from_slice(&forge_operation(op)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_5_group() -> OperationGroup {
        OperationGroup {
            branch: "BKpLvH3E3bUa5Z2nb3RkH2p6EKLfymvxUAEgtRJnu4m9UX1TWUb".to_string(),
            contents: vec![Operation::Transaction {
                manager: ManagerFields {
                    source: "tz1grSQDByRpnVs7sPtaprNZRp531ZKz6Jmm".to_string(),
                    fee: 104274,
                    counter: 446245,
                    gas_limit: 1_040_000,
                    storage_limit: 60_000,
                },
                amount: 0,
                destination: "KT1VYUxhLoSvouozCaDGL1XcswnagNfwr3yi".to_string(),
                parameters: Some(Parameters { entrypoint: "default".to_string(), value: Expr::prim0("Unit") }),
            }],
        }
    }

    #[test]
    fn scenario_5_operation_group_forge() {
        let bytes = forge_operation_group(&scenario_5_group()).unwrap();
        assert_eq!(
            hex::encode(&bytes),
            "0dc397b7865779d87bd47d406e8b4eee84498f22ab01dff124433c7f057af5ae6c00e8b36c80efb51ec85a14562426049aa182a3ce38d2ae06a59e1b80bd3fe0d4030001e5ebf2dcc7dcc9d13c2c45cd76823dd604740c7f0000"
        );
    }

    #[test]
    fn default_unit_parameters_collapse_to_omitted() {
        // {entrypoint: "default", value: Unit} forges identically to no
        // parameters at all, so unforging it back never reconstructs the
        // `Some(..)` we started from.
        let group = scenario_5_group();
        let op = &group.contents[0];
        let bytes = forge_operation(op).unwrap();
        let Operation::Transaction { parameters, .. } = unforge_operation(&bytes).unwrap() else {
            panic!("expected a transaction");
        };
        assert_eq!(parameters, None);

        let Operation::Transaction { manager, amount, destination, .. } = op.clone() else {
            panic!("expected a transaction");
        };
        let without_parameters =
            Operation::Transaction { manager, amount, destination, parameters: None };
        assert_eq!(forge_operation(&without_parameters).unwrap(), bytes);
    }

    #[test]
    fn transaction_with_parameters_round_trips() {
        let op = Operation::Transaction {
            manager: ManagerFields {
                source: "tz1grSQDByRpnVs7sPtaprNZRp531ZKz6Jmm".to_string(),
                fee: 500,
                counter: 1,
                gas_limit: 1000,
                storage_limit: 0,
            },
            amount: 100,
            destination: "KT1VYUxhLoSvouozCaDGL1XcswnagNfwr3yi".to_string(),
            parameters: Some(Parameters { entrypoint: "do".to_string(), value: Expr::prim0("Unit") }),
        };
        let bytes = forge_operation(&op).unwrap();
        assert_eq!(&unforge_operation(&bytes).unwrap(), &op);
    }

    #[test]
    fn reveal_round_trips() {
        let op = Operation::Reveal {
            manager: ManagerFields {
                source: "tz1grSQDByRpnVs7sPtaprNZRp531ZKz6Jmm".to_string(),
                fee: 374,
                counter: 1,
                gas_limit: 1000,
                storage_limit: 0,
            },
            public_key: "edpktsPhZ8weLEXqf4Fo5FS9Qx8ZuX4QpEBEwe63L747G8iDjTAF6w".to_string(),
        };
        let bytes = forge_operation(&op).unwrap();
        assert_eq!(&unforge_operation(&bytes).unwrap(), &op);
    }

    #[test]
    fn delegation_with_and_without_delegate_round_trips() {
        let manager = ManagerFields {
            source: "tz1grSQDByRpnVs7sPtaprNZRp531ZKz6Jmm".to_string(),
            fee: 374,
            counter: 1,
            gas_limit: 1000,
            storage_limit: 0,
        };
        let none_op = Operation::Delegation { manager: manager.clone(), delegate: None };
        let bytes = forge_operation(&none_op).unwrap();
        assert_eq!(&unforge_operation(&bytes).unwrap(), &none_op);

        let some_op = Operation::Delegation {
            manager,
            delegate: Some("tz1grSQDByRpnVs7sPtaprNZRp531ZKz6Jmm".to_string()),
        };
        let bytes = forge_operation(&some_op).unwrap();
        assert_eq!(&unforge_operation(&bytes).unwrap(), &some_op);
    }

    #[test]
    fn origination_round_trips() {
        let op = Operation::Origination {
            manager: ManagerFields {
                source: "tz1grSQDByRpnVs7sPtaprNZRp531ZKz6Jmm".to_string(),
                fee: 1000,
                counter: 2,
                gas_limit: 10_000,
                storage_limit: 500,
            },
            balance: 0,
            delegate: None,
            code: Expr::Sequence(vec![Expr::prim0("UNIT")]),
            storage: Expr::prim0("Unit"),
        };
        let bytes = forge_operation(&op).unwrap();
        assert_eq!(&unforge_operation(&bytes).unwrap(), &op);
    }

    #[test]
    fn seed_nonce_revelation_round_trips() {
        let op = Operation::SeedNonceRevelation { level: 12345, nonce: [7u8; 32] };
        let bytes = forge_operation(&op).unwrap();
        assert_eq!(&unforge_operation(&bytes).unwrap(), &op);
    }

    #[test]
    fn activate_account_round_trips() {
        let op = Operation::ActivateAccount {
            pkh: "tz1grSQDByRpnVs7sPtaprNZRp531ZKz6Jmm".to_string(),
            secret: [9u8; 20],
        };
        let bytes = forge_operation(&op).unwrap();
        assert_eq!(&unforge_operation(&bytes).unwrap(), &op);
    }

    #[test]
    fn unknown_operation_kind_is_rejected() {
        assert_eq!(unforge_operation(&[0xaa]), Err(ForgeError::UnknownOperationKind(0xaa)));
    }
}
