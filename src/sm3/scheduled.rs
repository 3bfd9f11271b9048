//! Scheduled compression backend: the throughput variant of the round
//! function. Digests are byte-identical to [`Reference`](super::core::Reference)
//! for every input; only the work scheduling differs.
//!
//! Three reorderings relative to the reference backend:
//!
//! * The full message schedule is materialized before the round loop and
//!   `W'[j]` is read as `W[j] ^ W[j + 4]` instead of a second array.
//! * The 0..16 and 16..64 regimes run as separate loops with the regime's
//!   boolean functions inlined, removing the per-round branches.
//! * `A <<< 12` is computed once per round and reused across `SS1`/`SS2`,
//!   and the rotating round constant is carried forward by one extra
//!   rotation per round instead of being rotated from scratch.

use super::core::{expand, p0, CompressionBackend, BLOCK_SIZE, T_EARLY, T_LATE};

/// Optimized round schedule. See the module docs for the strategy.
pub struct Scheduled;

impl CompressionBackend for Scheduled {
    fn compress(state: &mut [u32; 8], block: &[u8; BLOCK_SIZE]) {
        let w = expand(block);

        let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;

        let mut t = T_EARLY;
        for j in 0..16 {
            let a12 = a.rotate_left(12);
            let ss1 = a12.wrapping_add(e).wrapping_add(t).rotate_left(7);
            let ss2 = ss1 ^ a12;
            let tt1 = (a ^ b ^ c)
                .wrapping_add(d)
                .wrapping_add(ss2)
                .wrapping_add(w[j] ^ w[j + 4]);
            let tt2 = (e ^ f ^ g).wrapping_add(h).wrapping_add(ss1).wrapping_add(w[j]);
            d = c;
            c = b.rotate_left(9);
            b = a;
            a = tt1;
            h = g;
            g = f.rotate_left(19);
            f = e;
            e = p0(tt2);
            t = t.rotate_left(1);
        }

        let mut t = T_LATE.rotate_left(16);
        for j in 16..64 {
            let a12 = a.rotate_left(12);
            let ss1 = a12.wrapping_add(e).wrapping_add(t).rotate_left(7);
            let ss2 = ss1 ^ a12;
            let tt1 = ((a & b) | (a & c) | (b & c))
                .wrapping_add(d)
                .wrapping_add(ss2)
                .wrapping_add(w[j] ^ w[j + 4]);
            let tt2 = ((e & f) | (!e & g))
                .wrapping_add(h)
                .wrapping_add(ss1)
                .wrapping_add(w[j]);
            d = c;
            c = b.rotate_left(9);
            b = a;
            a = tt1;
            h = g;
            g = f.rotate_left(19);
            f = e;
            e = p0(tt2);
            t = t.rotate_left(1);
        }

        state[0] ^= a;
        state[1] ^= b;
        state[2] ^= c;
        state[3] ^= d;
        state[4] ^= e;
        state[5] ^= f;
        state[6] ^= g;
        state[7] ^= h;
    }
}
