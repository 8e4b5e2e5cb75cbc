//! HMAC-DRBG per NIST SP 800-90A, instantiated with HMAC-SHA-256 (spec §4.5).
//!
//! Used to derive the deterministic ECDSA nonce `k` (RFC 6979 §3.2) so that
//! two signatures over the same `(secret key, message hash)` are byte-for-byte
//! identical, without depending on an OS RNG. State is stack-local — never a
//! process-global singleton — so the generator stays referentially
//! transparent (spec §9).

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// `(V, K)` working state of the generator.
pub struct HmacDrbg {
    k: [u8; 32],
    v: [u8; 32],
}

impl HmacDrbg {
    /// Initializes the generator from `entropy || nonce || personalization`.
    pub fn new(entropy: &[u8], nonce: &[u8], personalization: &[u8]) -> Self {
        let mut drbg = Self {
            k: [0x00; 32],
            v: [0x01; 32],
        };
        let mut seed = Vec::with_capacity(entropy.len() + nonce.len() + personalization.len());
        seed.extend_from_slice(entropy);
        seed.extend_from_slice(nonce);
        seed.extend_from_slice(personalization);
        drbg.update(Some(&seed));
        drbg
    }

    fn hmac(key: &[u8; 32], data: &[&[u8]]) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
        for chunk in data {
            mac.update(chunk);
        }
        mac.finalize().into_bytes().into()
    }

    fn update(&mut self, provided: Option<&[u8]>) {
        self.k = Self::hmac(&self.k, &[&self.v, &[0x00], provided.unwrap_or(&[])]);
        self.v = Self::hmac(&self.k, &[&self.v]);

        if let Some(provided) = provided {
            self.k = Self::hmac(&self.k, &[&self.v, &[0x01], provided]);
            self.v = Self::hmac(&self.k, &[&self.v]);
        }
    }

    /// Produces `n` pseudorandom bytes and advances the internal state.
    pub fn generate(&mut self, n: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(n + 32);
        while out.len() < n {
            self.v = Self::hmac(&self.k, &[&self.v]);
            out.extend_from_slice(&self.v);
        }
        out.truncate(n);
        self.update(None);
        out
    }
}
