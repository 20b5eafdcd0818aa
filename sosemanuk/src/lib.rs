//! Implementation of the [Sosemanuk] stream cipher.
//!
//! Cipher functionality is accessed using traits from re-exported [`cipher`] crate.
//!
//! # ⚠️ Security Warning: Hazmat!
//!
//! This crate does not ensure ciphertexts are authentic! Thus ciphertext integrity
//! is not verified, which can lead to serious vulnerabilities!
//!
//! USE AT YOUR OWN RISK!
//!
//! # Example
//! ```
//! use sosemanuk::Sosemanuk;
//! // Import relevant traits
//! use sosemanuk::cipher::{KeyIvInit, StreamCipher};
//! use hex_literal::hex;
//!
//! let key = [0x42; 32];
//! let nonce = [0x24; 16];
//! let plaintext = hex!("00010203 04050607 08090A0B 0C0D0E0F");
//! let ciphertext = hex!("393c6d76 92f45a53 75bd7843 38801290");
//!
//! let mut cipher = Sosemanuk::new(&key.into(), &nonce.into());
//!
//! let mut buffer = plaintext.clone();
//!
//! // apply keystream (encrypt)
//! cipher.apply_keystream(&mut buffer);
//! assert_eq!(buffer, ciphertext);
//!
//! // decrypt ciphertext by applying keystream again
//! let mut cipher = Sosemanuk::new(&key.into(), &nonce.into());
//! cipher.apply_keystream(&mut buffer);
//! assert_eq!(buffer, plaintext);
//! ```
//!
//! Keys of 1..=32 bytes and nonces of 1..=16 bytes are accepted through
//! [`SosemanukCore::new_var`] and are zero-extended to the full width.
//!
//! [Sosemanuk]: https://www.ecrypt.eu.org/stream/sosemanukp3.html

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub use cipher;

use cipher::{
    consts::{U1, U16, U32, U80},
    Block, BlockSizeUser, InvalidLength, IvSizeUser, KeyIvInit, KeySizeUser, ParBlocksSizeUser,
    StreamBackend, StreamCipherCore, StreamCipherCoreWrapper, StreamClosure,
};

#[cfg(feature = "zeroize")]
use cipher::zeroize::{Zeroize, ZeroizeOnDrop};

mod tables;
use tables::{MUL_A, MUL_IA};

/// Maximum key length in bytes.
pub const KEY_MAX_LEN: usize = 32;
/// Maximum IV length in bytes.
pub const IV_MAX_LEN: usize = 16;

/// Sosemanuk stream cipher key.
pub type Key = cipher::Key<SosemanukCore>;

/// Sosemanuk stream cipher initialization vector.
pub type Iv = cipher::Iv<SosemanukCore>;

/// The Sosemanuk stream cipher.
pub type Sosemanuk = StreamCipherCoreWrapper<SosemanukCore>;

/// Serpent round constant.
const PHI: u32 = 0x9E37_79B9;

/// S-box applied in each round of the key schedule, repeating over the
/// 25 rounds.
const SCHEDULE_SBOX: [usize; 8] = [3, 2, 1, 0, 7, 6, 5, 4];

/// Which S-box outputs become subkey words, per S-box.
const SCHEDULE_OUT: [[usize; 4]; 8] = [
    [1, 4, 2, 0],
    [2, 0, 3, 1],
    [2, 3, 1, 4],
    [1, 2, 3, 4],
    [1, 4, 0, 3],
    [1, 3, 0, 2],
    [0, 1, 4, 2],
    [4, 3, 1, 0],
];

/// Register permutations of the 24 Serpent24 rounds used for IV injection.
/// Per round: the registers fed to the S-box (last one is the temporary)
/// and the registers run through the linear transform.
const IV_ROUNDS: [([usize; 5], [usize; 4]); 24] = [
    ([0, 1, 2, 3, 4], [1, 4, 2, 0]),
    ([1, 4, 2, 0, 3], [2, 1, 0, 4]),
    ([2, 1, 0, 4, 3], [0, 4, 1, 3]),
    ([0, 4, 1, 3, 2], [4, 1, 3, 2]),
    ([4, 1, 3, 2, 0], [1, 0, 4, 2]),
    ([1, 0, 4, 2, 3], [0, 2, 1, 4]),
    ([0, 2, 1, 4, 3], [0, 2, 3, 1]),
    ([0, 2, 3, 1, 4], [4, 1, 2, 0]),
    ([4, 1, 2, 0, 3], [1, 3, 2, 4]),
    ([1, 3, 2, 4, 0], [2, 1, 4, 3]),
    ([2, 1, 4, 3, 0], [4, 3, 1, 0]),
    ([4, 3, 1, 0, 2], [3, 1, 0, 2]),
    ([3, 1, 0, 2, 4], [1, 4, 3, 2]),
    ([1, 4, 3, 2, 0], [4, 2, 1, 3]),
    ([4, 2, 1, 3, 0], [4, 2, 0, 1]),
    ([4, 2, 0, 1, 3], [3, 1, 2, 4]),
    ([3, 1, 2, 4, 0], [1, 0, 2, 3]),
    ([1, 0, 2, 3, 4], [2, 1, 3, 0]),
    ([2, 1, 3, 0, 4], [3, 0, 1, 4]),
    ([3, 0, 1, 4, 2], [0, 1, 4, 2]),
    ([0, 1, 4, 2, 3], [1, 3, 0, 2]),
    ([1, 3, 0, 2, 4], [3, 2, 1, 0]),
    ([3, 2, 1, 0, 4], [3, 2, 4, 1]),
    ([3, 2, 4, 1, 0], [0, 1, 2, 3]),
];

/// LFSR cell indices per generator step: the updated cell, the two FSM
/// taps, the feedback tap and the output tap.
const STEPS: [[usize; 5]; 20] = [
    [0, 1, 3, 8, 9],
    [1, 2, 4, 9, 0],
    [2, 3, 5, 0, 1],
    [3, 4, 6, 1, 2],
    [4, 5, 7, 2, 3],
    [5, 6, 8, 3, 4],
    [6, 7, 9, 4, 5],
    [7, 8, 0, 5, 6],
    [8, 9, 1, 6, 7],
    [9, 0, 2, 7, 8],
    [0, 1, 3, 8, 9],
    [1, 2, 4, 9, 0],
    [2, 3, 5, 0, 1],
    [3, 4, 6, 1, 2],
    [4, 5, 7, 2, 3],
    [5, 6, 8, 3, 4],
    [6, 7, 9, 4, 5],
    [7, 8, 0, 5, 6],
    [8, 9, 1, 6, 7],
    [9, 0, 2, 7, 8],
];

/// Bitsliced Serpent S-box. The last register is a scratch slot and is
/// always written before it is read.
fn sbox(n: usize, r: [u32; 5]) -> [u32; 5] {
    let [mut r0, mut r1, mut r2, mut r3, mut r4] = r;
    match n {
        0 => {
            r3 ^= r0; r4 = r1; r1 &= r3; r4 ^= r2; r1 ^= r0; r0 |= r3; r0 ^= r4;
            r4 ^= r3; r3 ^= r2; r2 |= r1; r2 ^= r4; r4 = !r4; r4 |= r1;
            r1 ^= r3; r1 ^= r4; r3 |= r0; r1 ^= r3; r4 ^= r3;
        }
        1 => {
            r0 = !r0; r2 = !r2; r4 = r0; r0 &= r1; r2 ^= r0; r0 |= r3;
            r3 ^= r2; r1 ^= r0; r0 ^= r4; r4 |= r1; r1 ^= r3; r2 |= r0; r2 &= r4;
            r0 ^= r1; r1 &= r2; r1 ^= r0; r0 &= r2; r0 ^= r4;
        }
        2 => {
            r4 = r0; r0 &= r2; r0 ^= r3; r2 ^= r1; r2 ^= r0; r3 |= r4; r3 ^= r1;
            r4 ^= r2; r1 = r3; r3 |= r4; r3 ^= r0; r0 &= r1; r4 ^= r0; r1 ^= r3;
            r1 ^= r4; r4 = !r4;
        }
        3 => {
            r4 = r0; r0 |= r3; r3 ^= r1; r1 &= r4; r4 ^= r2; r2 ^= r3; r3 &= r0;
            r4 |= r1; r3 ^= r4; r0 ^= r1; r4 &= r0; r1 ^= r3; r4 ^= r2; r1 |= r0;
            r1 ^= r2; r0 ^= r3; r2 = r1; r1 |= r3; r1 ^= r0;
        }
        4 => {
            r1 ^= r3; r3 = !r3; r2 ^= r3; r3 ^= r0; r4 = r1; r1 &= r3;
            r1 ^= r2; r4 ^= r3; r0 ^= r4; r2 &= r4; r2 ^= r0; r0 &= r1; r3 ^= r0;
            r4 |= r1; r4 ^= r0; r0 |= r3; r0 ^= r2; r2 &= r3; r0 = !r0; r4 ^= r2;
        }
        5 => {
            r0 ^= r1; r1 ^= r3; r3 = !r3; r4 = r1; r1 &= r0; r2 ^= r3;
            r1 ^= r2; r2 |= r4; r4 ^= r3; r3 &= r1; r3 ^= r0; r4 ^= r1; r4 ^= r2;
            r2 ^= r0; r0 &= r3; r2 = !r2; r0 ^= r4; r4 |= r3; r2 ^= r4;
        }
        6 => {
            r2 = !r2; r4 = r3; r3 &= r0; r0 ^= r4; r3 ^= r2; r2 |= r4;
            r1 ^= r3; r2 ^= r0; r0 |= r1; r2 ^= r1; r4 ^= r0; r0 |= r3; r0 ^= r2;
            r4 ^= r3; r4 ^= r0; r3 = !r3; r2 &= r4; r2 ^= r3;
        }
        _ => {
            r4 = r1; r1 |= r2; r1 ^= r3; r4 ^= r2; r2 ^= r1; r3 |= r4; r3 &= r0;
            r4 ^= r2; r3 ^= r1; r1 |= r4; r1 ^= r0; r0 |= r4; r0 ^= r2; r1 ^= r4;
            r2 ^= r1; r1 &= r0; r1 ^= r4; r2 = !r2; r2 |= r0; r4 ^= r2;
        }
    }
    [r0, r1, r2, r3, r4]
}

/// Serpent linear transform.
fn serpent_lt(x: [u32; 4]) -> [u32; 4] {
    let [mut x0, mut x1, mut x2, mut x3] = x;
    x0 = x0.rotate_left(13);
    x2 = x2.rotate_left(3);
    x1 ^= x0 ^ x2;
    x3 ^= x2 ^ (x0 << 3);
    x1 = x1.rotate_left(1);
    x3 = x3.rotate_left(7);
    x0 ^= x1 ^ x3;
    x2 ^= x3 ^ (x1 << 7);
    x0 = x0.rotate_left(5);
    x2 = x2.rotate_left(22);
    [x0, x1, x2, x3]
}

#[inline(always)]
fn mul_alpha(x: u32) -> u32 {
    (x << 8) ^ MUL_A[(x >> 24) as usize]
}

#[inline(always)]
fn mul_inv_alpha(x: u32) -> u32 {
    (x >> 8) ^ MUL_IA[(x & 0xFF) as usize]
}

#[inline(always)]
fn load_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

/// The ten-cell LFSR over GF(2^32) and the two FSM registers.
#[derive(Debug)]
struct State {
    s: [u32; 10],
    r1: u32,
    r2: u32,
}

impl State {
    fn setup(key: &[u8; KEY_MAX_LEN], iv: &[u8; IV_MAX_LEN]) -> Self {
        let sk = Self::key_schedule(key);

        // Serpent24 encryption of the IV; the state after rounds 12, 18
        // and 24 seeds the LFSR cells and the FSM registers.
        let mut r = [
            load_u32(&iv[0..4]),
            load_u32(&iv[4..8]),
            load_u32(&iv[8..12]),
            load_u32(&iv[12..16]),
            0,
        ];
        let mut state = Self {
            s: [0; 10],
            r1: 0,
            r2: 0,
        };

        for (rnd, (inp, out)) in IV_ROUNDS.iter().enumerate() {
            let zc = rnd * 4;
            for n in 0..4 {
                r[inp[n]] ^= sk[zc + n];
            }
            let t = sbox(
                rnd % 8,
                [r[inp[0]], r[inp[1]], r[inp[2]], r[inp[3]], r[inp[4]]],
            );
            for n in 0..5 {
                r[inp[n]] = t[n];
            }
            let lt = serpent_lt([r[out[0]], r[out[1]], r[out[2]], r[out[3]]]);
            for n in 0..4 {
                r[out[n]] = lt[n];
            }
            match rnd {
                11 => {
                    state.s[9] = r[3];
                    state.s[8] = r[1];
                    state.s[7] = r[0];
                    state.s[6] = r[2];
                }
                17 => {
                    state.r1 = r[2];
                    state.s[4] = r[1];
                    state.r2 = r[3];
                    state.s[5] = r[0];
                }
                23 => {
                    // last round keeps its linear transform and absorbs the
                    // final subkey
                    for n in 0..4 {
                        r[out[n]] ^= sk[96 + n];
                    }
                    state.s[3] = r[0];
                    state.s[2] = r[1];
                    state.s[1] = r[2];
                    state.s[0] = r[3];
                }
                _ => {}
            }
        }

        state
    }

    /// Serpent24 key schedule: 25 rounds, four subkey words each.
    fn key_schedule(key: &[u8; KEY_MAX_LEN]) -> [u32; 100] {
        let mut w = [0u32; 8];
        for (n, word) in w.iter_mut().enumerate() {
            *word = load_u32(&key[n * 4..]);
        }

        let mut sk = [0u32; 100];
        let mut i = 0;
        for rnd in 0..25 {
            // even rounds refresh w0..w3, odd rounds w4..w7
            let base = if rnd % 2 == 0 { 0 } else { 4 };
            let cc = (rnd * 4) as u32;
            for j in base..base + 4 {
                let tt = w[j]
                    ^ w[(j + 3) % 8]
                    ^ w[(j + 5) % 8]
                    ^ w[(j + 7) % 8]
                    ^ PHI
                    ^ (cc + (j - base) as u32);
                w[j] = tt.rotate_left(11);
            }
            let sb = SCHEDULE_SBOX[rnd % 8];
            let t = sbox(sb, [w[base], w[base + 1], w[base + 2], w[base + 3], 0]);
            for &x in &SCHEDULE_OUT[sb] {
                sk[i] = t[x];
                i += 1;
            }
        }
        sk
    }

    fn next_block(&mut self) -> [u8; 80] {
        let mut out = [0u8; 80];
        let mut u = [0u32; 5];
        let mut v = [0u32; 4];

        for (q, quad) in STEPS.chunks(4).enumerate() {
            for (n, &[x0, x1, x2, x3, x4]) in quad.iter().enumerate() {
                // FSM update
                let tt = if self.r1 & 1 != 0 {
                    self.s[x1] ^ self.s[x3]
                } else {
                    self.s[x1]
                };
                let or1 = self.r1;
                self.r1 = self.r2.wrapping_add(tt);
                self.r2 = or1.wrapping_mul(0x5465_5307).rotate_left(7);

                // LFSR update
                v[n] = self.s[x0];
                self.s[x0] = mul_alpha(self.s[x0]) ^ mul_inv_alpha(self.s[x2]) ^ self.s[x4];
                u[n] = self.s[x4].wrapping_add(self.r1) ^ self.r2;
            }

            // S2 over the FSM outputs, masked by the dropped LFSR values
            u = sbox(2, u);
            let ks = [u[2] ^ v[0], u[3] ^ v[1], u[1] ^ v[2], u[4] ^ v[3]];
            for (n, word) in ks.iter().enumerate() {
                out[(q * 4 + n) * 4..][..4].copy_from_slice(&word.to_le_bytes());
            }
        }

        out
    }
}

#[cfg(feature = "zeroize")]
impl Drop for State {
    fn drop(&mut self) {
        self.s.zeroize();
        self.r1.zeroize();
        self.r2.zeroize();
    }
}

/// Core state of the Sosemanuk stream cipher.
#[derive(Debug)]
pub struct SosemanukCore {
    state: State,
}

impl SosemanukCore {
    /// Initializes the cipher with a 1..=32 byte key and a 1..=16 byte IV.
    ///
    /// The key length is checked first.
    pub fn new_var(key: &[u8], iv: &[u8]) -> Result<Self, InvalidLength> {
        if key.is_empty() || key.len() > KEY_MAX_LEN {
            return Err(InvalidLength);
        }
        if iv.is_empty() || iv.len() > IV_MAX_LEN {
            return Err(InvalidLength);
        }
        let mut k = [0u8; KEY_MAX_LEN];
        k[..key.len()].copy_from_slice(key);
        let mut v = [0u8; IV_MAX_LEN];
        v[..iv.len()].copy_from_slice(iv);

        Ok(Self {
            state: State::setup(&k, &v),
        })
    }
}

impl KeySizeUser for SosemanukCore {
    type KeySize = U32;
}

impl IvSizeUser for SosemanukCore {
    type IvSize = U16;
}

impl KeyIvInit for SosemanukCore {
    fn new(key: &Key, iv: &Iv) -> Self {
        let mut k = [0u8; KEY_MAX_LEN];
        k.copy_from_slice(key);
        let mut v = [0u8; IV_MAX_LEN];
        v.copy_from_slice(iv);

        Self {
            state: State::setup(&k, &v),
        }
    }
}

impl BlockSizeUser for SosemanukCore {
    type BlockSize = U80;
}

impl StreamCipherCore for SosemanukCore {
    #[inline(always)]
    fn remaining_blocks(&self) -> Option<usize> {
        None
    }

    fn process_with_backend(&mut self, f: impl StreamClosure<BlockSize = Self::BlockSize>) {
        f.call(&mut Backend(&mut self.state));
    }
}

#[cfg(feature = "zeroize")]
impl ZeroizeOnDrop for SosemanukCore {}

struct Backend<'a>(&'a mut State);

impl BlockSizeUser for Backend<'_> {
    type BlockSize = U80;
}

impl ParBlocksSizeUser for Backend<'_> {
    type ParBlocksSize = U1;
}

impl StreamBackend for Backend<'_> {
    #[inline(always)]
    fn gen_ks_block(&mut self, block: &mut Block<Self>) {
        block.copy_from_slice(&self.0.next_block());
    }
}
