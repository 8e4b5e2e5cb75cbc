//! Binary forging/unforging of Micheline expressions, addresses, public
//! keys and operation groups (spec §4.3).

pub mod address;
pub mod error;
pub mod micheline;
pub mod operation;
pub mod prim;

pub use address::{forge_address, forge_public_key, unforge_address, unforge_public_key};
pub use error::ForgeError;
pub use micheline::{forge_micheline, unforge_micheline, Expr};
pub use operation::{forge_operation, forge_operation_group, unforge_operation, Operation, OperationGroup};

use crate::crypto::base58::{self, Prefix};

/// Decodes a Base58 string of any known kind into its raw payload bytes
/// (spec §6's `forge.forge_base58`, kind inferred from the prefix).
pub fn forge_base58(s: &str) -> Result<Vec<u8>, ForgeError> {
    let (_, payload) = base58::decode_any(s)?;
    Ok(payload)
}

/// Encodes raw signature bytes as the generic `sig`-prefixed Base58 string
/// (spec §8 scenario 6's `forge.unforge_signature`).
pub fn unforge_signature(raw_hex: &str) -> Result<String, ForgeError> {
    let raw = hex::decode(raw_hex).map_err(|_| ForgeError::Truncated)?;
    Ok(base58::encode(Prefix::Sig, &raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_4_forge_base58() {
        let bytes = forge_base58("BKpLvH3E3bUa5Z2nb3RkH2p6EKLfymvxUAEgtRJnu4m9UX1TWUb").unwrap();
        assert_eq!(
            hex::encode(&bytes),
            "0dc397b7865779d87bd47d406e8b4eee84498f22ab01dff124433c7f057af5ae"
        );
    }

    #[test]
    fn scenario_6_unforge_signature() {
        let s = unforge_signature(
            "49d47dba27bd76208b092f3e500f64818920c817491b8b9094f28c2c2b9c6721b257b8878ce47182122b8ea84aeacd84a8aa28cb1f1fe48a26355a7bca4b8306",
        )
        .unwrap();
        assert_eq!(
            s,
            "sigXeXB5JD5TaLb3xgTPKjgf9W45judiCmNP9UBdZBdmtHSGBxL1M8ZSUb6LpjGP2MdfUBTB4WHs5APnvyRV1LooU6QHJuDe"
        );
    }
}
