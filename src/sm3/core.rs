//! Reference SM3 engine: padding, message expansion and the 64-round
//! compression function, per GB/T 32905-2016.
//!
//! All multi-byte quantities are big-endian: the sixteen block words, the
//! 64-bit bit-length trailer appended by padding and the digest
//! serialization. The streaming [`Sm3`] hasher is generic over a
//! [`CompressionBackend`] so the reference and scheduled round
//! implementations share identical padding and chaining logic.

use core::convert::TryInto;
use core::fmt;
use core::marker::PhantomData;

use super::digest::{Digest, DIGEST_SIZE};
use super::scheduled::Scheduled;

/// Size in bytes of one compression block (512 bits).
pub const BLOCK_SIZE: usize = 64;

/// Standard initialization vector. Not caller-configurable; resuming from a
/// non-standard chaining value goes through [`Sm3::from_state`].
pub const IV: [u32; 8] = [
    0x7380166F, 0x4914B2B9, 0x172442D7, 0xDA8A0600, 0xA96F30BC, 0x163138AA, 0xE38DEE4D, 0xB0FB0E4E,
];

/// Round constant for rounds 0..16.
pub(super) const T_EARLY: u32 = 0x79CC4519;

/// Round constant for rounds 16..64.
pub(super) const T_LATE: u32 = 0x7A879D8A;

/// Permutation applied to `TT2` once per round.
#[inline(always)]
pub(super) fn p0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

/// Permutation used by the message-expansion recurrence.
#[inline(always)]
pub(super) fn p1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

/// Errors surfaced by the non-standard entry points of the hash engine.
///
/// The default one-shot path never fails for well-formed byte input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sm3Error {
    /// A bit-length computation left the 64-bit length-field domain.
    LengthOverflow,
    /// A bit length that must describe whole bytes did not.
    UnalignedBitLength { bits: u64 },
    /// A resumed chaining state must sit on a 512-bit block boundary.
    UnalignedResume { bits: u64 },
}

impl fmt::Display for Sm3Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sm3Error::LengthOverflow => {
                write!(f, "message bit length exceeds the 64-bit length field")
            }
            Sm3Error::UnalignedBitLength { bits } => {
                write!(f, "bit length {} is not a whole number of bytes", bits)
            }
            Sm3Error::UnalignedResume { bits } => {
                write!(f, "resume point {} is not a 512-bit block boundary", bits)
            }
        }
    }
}

impl std::error::Error for Sm3Error {}

/// Compression backend interface shared by the reference and scheduled
/// round implementations. A backend folds exactly one block into the
/// chaining state, feed-forward included.
pub trait CompressionBackend {
    fn compress(state: &mut [u32; 8], block: &[u8; BLOCK_SIZE]);
}

/// Splits a block into its sixteen big-endian words and runs the expansion
/// recurrence, yielding `W[0..68]`. `W'[j]` is `W[j] ^ W[j + 4]`.
pub(super) fn expand(block: &[u8; BLOCK_SIZE]) -> [u32; 68] {
    let mut w = [0u32; 68];
    for (word, chunk) in w[..16].iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    for j in 16..68 {
        w[j] = p1(w[j - 16] ^ w[j - 9] ^ w[j - 3].rotate_left(15))
            ^ w[j - 13].rotate_left(7)
            ^ w[j - 6];
    }
    w
}

/// Straightforward transliteration of the standard's round schedule: one
/// branchy 64-round loop with the round functions selected by the round
/// index. [`Scheduled`] produces byte-identical state transitions.
pub struct Reference;

impl CompressionBackend for Reference {
    fn compress(state: &mut [u32; 8], block: &[u8; BLOCK_SIZE]) {
        let w = expand(block);
        let mut w_prime = [0u32; 64];
        for j in 0..64 {
            w_prime[j] = w[j] ^ w[j + 4];
        }

        let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;
        for j in 0..64 {
            let t = if j < 16 { T_EARLY } else { T_LATE };
            let ss1 = a
                .rotate_left(12)
                .wrapping_add(e)
                .wrapping_add(t.rotate_left(j as u32))
                .rotate_left(7);
            let ss2 = ss1 ^ a.rotate_left(12);
            let ff = if j < 16 {
                a ^ b ^ c
            } else {
                (a & b) | (a & c) | (b & c)
            };
            let gg = if j < 16 { e ^ f ^ g } else { (e & f) | (!e & g) };
            let tt1 = ff.wrapping_add(d).wrapping_add(ss2).wrapping_add(w_prime[j]);
            let tt2 = gg.wrapping_add(h).wrapping_add(ss1).wrapping_add(w[j]);
            d = c;
            c = b.rotate_left(9);
            b = a;
            a = tt1;
            h = g;
            g = f.rotate_left(19);
            f = e;
            e = p0(tt2);
        }

        let worked = [a, b, c, d, e, f, g, h];
        for (chained, value) in state.iter_mut().zip(worked) {
            *chained ^= value;
        }
    }
}

/// Streaming SM3 hasher, generic over the compression backend.
///
/// The type parameter defaults to the scheduled backend; [`Sm3Core`](super::Sm3Core) and
/// [`Sm3Optimized`](super::Sm3Optimized) are the two concrete aliases.
pub struct Sm3<B: CompressionBackend = Scheduled> {
    state: [u32; 8],
    buffer: [u8; BLOCK_SIZE],
    buffered: usize,
    bits: u64,
    marker: PhantomData<B>,
}

impl<B: CompressionBackend> fmt::Debug for Sm3<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sm3")
            .field("buffered", &self.buffered)
            .field("bits", &self.bits)
            .finish_non_exhaustive()
    }
}

impl<B: CompressionBackend> Clone for Sm3<B> {
    fn clone(&self) -> Self {
        Self {
            state: self.state,
            buffer: self.buffer,
            buffered: self.buffered,
            bits: self.bits,
            marker: PhantomData,
        }
    }
}

impl<B: CompressionBackend> Sm3<B> {
    /// Creates a hasher initialized with the standard IV.
    pub fn new() -> Self {
        Self {
            state: IV,
            buffer: [0u8; BLOCK_SIZE],
            buffered: 0,
            bits: 0,
            marker: PhantomData,
        }
    }

    /// Resumes compression from an arbitrary chaining state after
    /// `total_bits` bits of (unknown) preceding input.
    ///
    /// `total_bits` must sit on a block boundary; the bits already absorbed
    /// count toward the length trailer emitted by [`finalize`](Self::finalize).
    /// This is the extension point the length-extension demonstration uses;
    /// it does not alter the default one-shot behaviour.
    pub fn from_state(words: [u32; 8], total_bits: u64) -> Result<Self, Sm3Error> {
        if total_bits % (BLOCK_SIZE as u64 * 8) != 0 {
            return Err(Sm3Error::UnalignedResume { bits: total_bits });
        }
        Ok(Self {
            state: words,
            buffer: [0u8; BLOCK_SIZE],
            buffered: 0,
            bits: total_bits,
            marker: PhantomData,
        })
    }

    /// Absorbs additional bytes into the hasher state.
    pub fn update(&mut self, mut bytes: &[u8]) {
        self.bits = (bytes.len() as u64)
            .checked_mul(8)
            .and_then(|added| self.bits.checked_add(added))
            .expect("message length exceeds the 64-bit bit-length field");

        if self.buffered > 0 {
            let take = (BLOCK_SIZE - self.buffered).min(bytes.len());
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&bytes[..take]);
            self.buffered += take;
            bytes = &bytes[take..];
            if self.buffered == BLOCK_SIZE {
                let block = self.buffer;
                B::compress(&mut self.state, &block);
                self.buffered = 0;
            }
        }
        if bytes.is_empty() {
            return;
        }

        // The buffer is drained here; the trailing partial chunk below
        // restarts it from offset zero.
        let mut chunks = bytes.chunks_exact(BLOCK_SIZE);
        for chunk in &mut chunks {
            let block: &[u8; BLOCK_SIZE] = chunk.try_into().expect("chunk spans one block");
            B::compress(&mut self.state, block);
        }
        let rest = chunks.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.buffered = rest.len();
    }

    /// Pads the absorbed input and returns the final digest.
    pub fn finalize(mut self) -> Digest {
        let bit_length = self.bits;
        let buffered = self.buffered;

        self.buffer[buffered] = 0x80;
        if buffered + 1 > BLOCK_SIZE - 8 {
            // No room for the length trailer: close this block with zeros
            // and emit a second, all-padding block.
            for byte in &mut self.buffer[buffered + 1..] {
                *byte = 0;
            }
            let block = self.buffer;
            B::compress(&mut self.state, &block);
            self.buffer = [0u8; BLOCK_SIZE];
        } else {
            for byte in &mut self.buffer[buffered + 1..BLOCK_SIZE - 8] {
                *byte = 0;
            }
        }
        self.buffer[BLOCK_SIZE - 8..].copy_from_slice(&bit_length.to_be_bytes());
        let block = self.buffer;
        B::compress(&mut self.state, &block);

        let mut out = [0u8; DIGEST_SIZE];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.state.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        Digest::from_bytes(out)
    }

    /// One-shot convenience over `new` / `update` / `finalize`.
    pub fn hash(message: &[u8]) -> Digest {
        let mut hasher = Self::new();
        hasher.update(message);
        hasher.finalize()
    }
}

impl<B: CompressionBackend> Default for Sm3<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Padding bytes the standard appends to a message of `bit_length` bits.
///
/// Only byte-aligned messages are supported; the result always extends the
/// message to a multiple of [`BLOCK_SIZE`].
pub fn standard_padding(bit_length: u64) -> Result<Vec<u8>, Sm3Error> {
    if bit_length % 8 != 0 {
        return Err(Sm3Error::UnalignedBitLength { bits: bit_length });
    }
    let message_bytes = bit_length / 8;
    let zero_run = (55u64.wrapping_sub(message_bytes)) % BLOCK_SIZE as u64;

    let mut padding = Vec::with_capacity(1 + zero_run as usize + 8);
    padding.push(0x80);
    padding.resize(1 + zero_run as usize, 0);
    padding.extend_from_slice(&bit_length.to_be_bytes());
    Ok(padding)
}

#[cfg(test)]
mod tests {
    use super::*;

    type Core = Sm3<Reference>;

    #[test]
    fn streaming_matches_one_shot_across_block_boundaries() {
        for len in [0usize, 1, 55, 56, 63, 64, 65, 127, 128, 1000] {
            let message: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            let one_shot = Core::hash(&message);

            for split in [0, len / 3, len / 2, len] {
                let mut hasher = Core::new();
                hasher.update(&message[..split]);
                hasher.update(&message[split..]);
                assert_eq!(hasher.finalize(), one_shot, "len {} split {}", len, split);
            }
        }
    }

    #[test]
    fn byte_at_a_time_updates_match_one_shot() {
        let message: Vec<u8> = (0..200u8).collect();
        let mut hasher = Core::new();
        for byte in &message {
            hasher.update(std::slice::from_ref(byte));
        }
        assert_eq!(hasher.finalize(), Core::hash(&message));
    }

    #[test]
    fn padding_length_is_always_a_block_multiple() {
        for message_bytes in 0u64..300 {
            let padding = standard_padding(message_bytes * 8).unwrap();
            assert_eq!((message_bytes as usize + padding.len()) % BLOCK_SIZE, 0);
            assert_eq!(padding[0], 0x80);
            assert_eq!(
                &padding[padding.len() - 8..],
                &(message_bytes * 8).to_be_bytes()
            );
        }
    }

    #[test]
    fn padding_rejects_fractional_bytes() {
        assert_eq!(
            standard_padding(13),
            Err(Sm3Error::UnalignedBitLength { bits: 13 })
        );
    }

    #[test]
    fn resume_requires_block_alignment() {
        assert!(Core::from_state(IV, 512).is_ok());
        assert_eq!(
            Core::from_state(IV, 8).unwrap_err(),
            Sm3Error::UnalignedResume { bits: 8 }
        );
    }

    #[test]
    fn hasher_debug_reports_progress_not_state() {
        let mut hasher = Core::new();
        hasher.update(b"abc");
        let rendered = format!("{:?}", hasher);
        assert!(rendered.contains("buffered: 3"), "{}", rendered);
        assert!(rendered.contains("bits: 24"), "{}", rendered);

        // Results over the hasher must format too.
        let rendered = format!("{:?}", Core::from_state(IV, 0));
        assert!(rendered.starts_with("Ok("), "{}", rendered);
    }

    #[test]
    fn resume_from_iv_at_zero_matches_fresh_hasher() {
        let mut resumed = Core::from_state(IV, 0).unwrap();
        resumed.update(b"abc");
        assert_eq!(resumed.finalize(), Core::hash(b"abc"));
    }

    #[test]
    fn digest_words_round_trip() {
        let digest = Core::hash(b"abc");
        let words = digest.to_words();
        let mut bytes = [0u8; DIGEST_SIZE];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(words.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        assert_eq!(Digest::from_bytes(bytes), digest);
    }
}
