//! Static bidirectional table mapping a Michelson primitive name to its
//! single-byte wire tag (spec §4.3's "prim registry").
//!
//! No scenario in the literal regression vectors exercises this table
//! directly — the one operation that carries Michelson parameters collapses
//! the default-entrypoint `Unit` argument away before any prim tag would
//! appear in the forged bytes (see DESIGN.md). The tag assignment below
//! follows the network's well-known, stable primitive ordering.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrimError {
    #[error("prim tag {0:#x} is not in the primitive registry")]
    UnknownTag(u8),

    #[error("prim name {0:?} is not in the primitive registry")]
    UnknownName(String),
}

macro_rules! prim_table {
    ($( $tag:literal => $name:literal ),+ $(,)?) => {
        const TABLE: &[(u8, &str)] = &[ $( ($tag, $name) ),+ ];
    };
}

// Tag assignment mirrors the network's historical primitive numbering:
// keywords (parameter/storage/code), then data constructors, then
// instructions, then type keywords, in the order they were introduced.
prim_table! {
    0x00 => "parameter",
    0x01 => "storage",
    0x02 => "code",
    0x03 => "False",
    0x04 => "Elt",
    0x05 => "Left",
    0x06 => "None",
    0x07 => "Pair",
    0x08 => "Right",
    0x09 => "Some",
    0x0a => "True",
    0x0b => "Unit",
    0x0c => "PACK",
    0x0d => "UNPACK",
    0x0e => "BLAKE2B",
    0x0f => "SHA256",
    0x10 => "SHA512",
    0x11 => "ABS",
    0x12 => "ADD",
    0x13 => "AMOUNT",
    0x14 => "AND",
    0x15 => "BALANCE",
    0x16 => "CAR",
    0x17 => "CDR",
    0x18 => "CHECK_SIGNATURE",
    0x19 => "COMPARE",
    0x1a => "CONCAT",
    0x1b => "CONS",
    0x1c => "CREATE_ACCOUNT",
    0x1d => "CREATE_CONTRACT",
    0x1e => "IMPLICIT_ACCOUNT",
    0x1f => "DIP",
    0x20 => "DROP",
    0x21 => "DUP",
    0x22 => "EDIV",
    0x23 => "EMPTY_MAP",
    0x24 => "EMPTY_SET",
    0x25 => "EQ",
    0x26 => "EXEC",
    0x27 => "FAILWITH",
    0x28 => "GE",
    0x29 => "GET",
    0x2a => "GT",
    0x2b => "HASH_KEY",
    0x2c => "IF",
    0x2d => "IF_CONS",
    0x2e => "IF_LEFT",
    0x2f => "IF_NONE",
    0x30 => "INT",
    0x31 => "LAMBDA",
    0x32 => "LE",
    0x33 => "LEFT",
    0x34 => "LOOP",
    0x35 => "LSL",
    0x36 => "LSR",
    0x37 => "LT",
    0x38 => "MAP",
    0x39 => "MEM",
    0x3a => "MUL",
    0x3b => "NEG",
    0x3c => "NEQ",
    0x3d => "NIL",
    0x3e => "NONE",
    0x3f => "NOT",
    0x40 => "NOW",
    0x41 => "OR",
    0x42 => "PAIR",
    0x43 => "PUSH",
    0x44 => "RIGHT",
    0x45 => "SIZE",
    0x46 => "SOME",
    0x47 => "SOURCE",
    0x48 => "SENDER",
    0x49 => "SELF",
    0x4a => "STEPS_TO_QUOTA",
    0x4b => "SUB",
    0x4c => "SWAP",
    0x4d => "TRANSFER_TOKENS",
    0x4e => "SET_DELEGATE",
    0x4f => "UNIT",
    0x50 => "UPDATE",
    0x51 => "XOR",
    0x52 => "ITER",
    0x53 => "LOOP_LEFT",
    0x54 => "ADDRESS",
    0x55 => "CONTRACT",
    0x56 => "ISNAT",
    0x57 => "CAST",
    0x58 => "RENAME",
    0x59 => "bool",
    0x5a => "contract",
    0x5b => "int",
    0x5c => "key",
    0x5d => "key_hash",
    0x5e => "lambda",
    0x5f => "list",
    0x60 => "map",
    0x61 => "big_map",
    0x62 => "nat",
    0x63 => "option",
    0x64 => "or",
    0x65 => "pair",
    0x66 => "set",
    0x67 => "signature",
    0x68 => "string",
    0x69 => "bytes",
    0x6a => "mutez",
    0x6b => "timestamp",
    0x6c => "unit",
    0x6d => "operation",
    0x6e => "address",
    0x6f => "SLICE",
    0x70 => "DIG",
    0x71 => "DUG",
    0x72 => "EMPTY_BIG_MAP",
    0x73 => "APPLY",
    0x74 => "chain_id",
    0x75 => "CHAIN_ID",
    0x76 => "LEVEL",
    0x77 => "SELF_ADDRESS",
    0x78 => "never",
    0x79 => "NEVER",
    0x7a => "UNPAIR",
    0x7b => "VOTING_POWER",
    0x7c => "TOTAL_VOTING_POWER",
    0x7d => "KECCAK",
    0x7e => "SHA3",
    0x7f => "PAIRING_CHECK",
    0x80 => "bls12_381_g1",
    0x81 => "bls12_381_g2",
    0x82 => "bls12_381_fr",
    0x83 => "sapling_state",
    0x84 => "sapling_transaction_deprecated",
    0x85 => "SAPLING_EMPTY_STATE",
    0x86 => "SAPLING_VERIFY_UPDATE",
    0x87 => "ticket",
    0x88 => "TICKET_DEPRECATED",
    0x89 => "READ_TICKET",
    0x8a => "SPLIT_TICKET",
    0x8b => "JOIN_TICKETS",
    0x8c => "GET_AND_UPDATE",
    0x8d => "chest",
    0x8e => "chest_key",
    0x8f => "OPEN_CHEST",
    0x90 => "VIEW",
    0x91 => "CONSTANT",
}

/// Looks up the wire tag for a prim name.
pub fn tag_of(name: &str) -> Result<u8, PrimError> {
    TABLE
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(tag, _)| *tag)
        .ok_or_else(|| PrimError::UnknownName(name.to_string()))
}

/// Looks up the prim name for a wire tag.
pub fn name_of(tag: u8) -> Result<&'static str, PrimError> {
    TABLE
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, name)| *name)
        .ok_or(PrimError::UnknownTag(tag))
}
