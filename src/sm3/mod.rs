//! SM3 cryptographic hash primitive (GB/T 32905-2016).
//!
//! The engine is a Merkle–Damgård construction over 512-bit blocks with a
//! 256-bit digest. Two compression backends are exposed behind one
//! streaming front-end:
//!
//! * [`Sm3Core`] – the reference round schedule, a direct transliteration
//!   of the standard.
//! * [`Sm3Optimized`] – the scheduled variant with batched message
//!   expansion and regime-split round loops; byte-identical output.
//!
//! [`Sm3::from_state`] deliberately re-opens the chaining state for the
//! length-extension demonstration in [`crate::extension`]; ordinary callers
//! use [`sm3`] or the `new`/`update`/`finalize` cycle and never touch it.

mod core;
mod digest;
mod scheduled;

pub use self::core::{
    standard_padding, CompressionBackend, Reference, Sm3, Sm3Error, BLOCK_SIZE, IV,
};
pub use digest::{Digest, HexOutput, DIGEST_SIZE};
pub use scheduled::Scheduled;

/// Reference hasher: the standard written out one round at a time.
pub type Sm3Core = Sm3<Reference>;

/// Throughput variant with an identical input/output contract.
pub type Sm3Optimized = Sm3<Scheduled>;

/// Computes the SM3 digest of `message` using the scheduled backend.
pub fn sm3(message: &[u8]) -> Digest {
    Sm3Optimized::hash(message)
}
