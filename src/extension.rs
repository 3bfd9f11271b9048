//! Length-extension demonstration against the unkeyed SM3 Merkle–Damgård
//! construction.
//!
//! A published digest equals the chaining state after the victim's final
//! padded block. Re-seeding compression with that state therefore lets an
//! attacker compute `sm3(message ‖ standard_padding(message) ‖ suffix)`
//! from the digest and the message *length* alone, never the message
//! bytes.
//!
//! The attack presumes the victim applies plain SM3 directly to the secret
//! with no key wrapping or randomization (an HMAC construction defeats
//! it). That precondition is documented, not checked at runtime.

use crate::sm3::{standard_padding, Digest, Sm3Error, Sm3Optimized};

/// Outcome of a length-extension forgery.
///
/// The digest verifies against the preimage `original ‖ glue ‖ suffix`,
/// where `glue` is the padding the unknown original message received and
/// `suffix` is the attacker-chosen tail passed to [`length_extend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    /// Digest of the extended message.
    pub digest: Digest,
    /// Padding bytes standing between the original message and the suffix
    /// in the forged preimage.
    pub glue: Vec<u8>,
}

/// Forges the digest of `original ‖ standard_padding(original) ‖ suffix`
/// from the original's digest and bit length.
///
/// `known_bit_length` covers everything the victim hashed (a secret prefix
/// included), must describe whole bytes and, together with the suffix, must
/// stay inside the 64-bit length-field domain.
pub fn length_extend(
    known_digest: Digest,
    known_bit_length: u64,
    suffix: &[u8],
) -> Result<Extension, Sm3Error> {
    let glue = standard_padding(known_bit_length)?;

    // The resumed state sits after the victim's last padded block.
    let resumed_bits = known_bit_length
        .checked_add(glue.len() as u64 * 8)
        .ok_or(Sm3Error::LengthOverflow)?;
    let suffix_bits = (suffix.len() as u64)
        .checked_mul(8)
        .ok_or(Sm3Error::LengthOverflow)?;
    resumed_bits
        .checked_add(suffix_bits)
        .ok_or(Sm3Error::LengthOverflow)?;

    let mut hasher = Sm3Optimized::from_state(known_digest.to_words(), resumed_bits)?;
    hasher.update(suffix);
    Ok(Extension {
        digest: hasher.finalize(),
        glue,
    })
}

/// Builds the forged preimage `original ‖ standard_padding(original) ‖
/// suffix` for verifying an extension against a direct hash.
pub fn forged_preimage(original: &[u8], suffix: &[u8]) -> Result<Vec<u8>, Sm3Error> {
    let bit_length = (original.len() as u64)
        .checked_mul(8)
        .ok_or(Sm3Error::LengthOverflow)?;
    let glue = standard_padding(bit_length)?;

    let mut preimage = Vec::with_capacity(original.len() + glue.len() + suffix.len());
    preimage.extend_from_slice(original);
    preimage.extend_from_slice(&glue);
    preimage.extend_from_slice(suffix);
    Ok(preimage)
}
