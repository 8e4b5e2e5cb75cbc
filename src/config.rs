//! Named constants shared across the crate.
//!
//! Mirrors the teacher's flat `pub const` config block rather than
//! scattering magic numbers through the forge/fee/rpc modules.

/// Watermark byte prepended before hashing an operation group (§4.4).
pub const WATERMARK_OPERATION: u8 = 0x03;
/// Watermark byte prepended before hashing an arbitrary message (§4.4).
pub const WATERMARK_GENERIC: u8 = 0x05;

/// Size in bytes of a public-key hash (Blake2b-160 digest).
pub const PKH_SIZE: usize = 20;
/// Size in bytes of a Blake2b-256 digest (branch hash, operation hash, message hash).
pub const HASH_SIZE: usize = 32;

/// Size in bytes of an Ed25519 raw public key.
pub const ED25519_PUBLIC_KEY_SIZE: usize = 32;
/// Size in bytes of a compressed secp256k1/P-256 raw public key.
pub const EC_PUBLIC_KEY_SIZE: usize = 33;
/// Size in bytes of an Ed25519 signature.
pub const ED25519_SIGNATURE_SIZE: usize = 64;
/// Size in bytes of an `r || s` ECDSA signature (secp256k1 and P-256 share this layout).
pub const ECDSA_SIGNATURE_SIZE: usize = 64;

/// Minimum fee, in mutez, accepted by the network regardless of operation size (§4.7).
pub const MINIMAL_FEES: u64 = 100;
/// Minimum fee, in nanotez, charged per unit of gas consumed (§4.7).
pub const MINIMAL_NANOTEZ_PER_GAS_UNIT: u64 = 100;
/// Minimum fee, in nanotez, charged per forged byte (§4.7).
pub const MINIMAL_NANOTEZ_PER_BYTE: u64 = 1000;
/// Hard protocol ceiling on gas per operation (§4.7).
pub const HARD_GAS_LIMIT_PER_OPERATION: u64 = 1_040_000;
/// Hard protocol ceiling on paid storage per operation (§4.7).
pub const HARD_STORAGE_LIMIT_PER_OPERATION: u64 = 60_000;
/// Fixed safety margin, in gas units, added on top of the measured consumption (§4.7).
pub const BASE_SAFETY_MARGIN_GAS: u64 = 100;

/// Default per-request timeout for the RPC client, in seconds (§5).
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;
/// Default number of idle HTTP connections the RPC client keeps warm per host.
pub const DEFAULT_RPC_POOL_IDLE_PER_HOST: usize = 8;
