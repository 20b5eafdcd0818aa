//! Implementation of the [HC-128] stream cipher.
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
//! use hc_128::Hc128;
//! // Import relevant traits
//! use hc_128::cipher::{KeyIvInit, StreamCipher};
//! use hex_literal::hex;
//!
//! let key = [0x42; 16];
//! let nonce = [0x24; 16];
//! let plaintext = hex!("00010203 04050607 08090A0B 0C0D0E0F");
//! let ciphertext = hex!("f63fc2eb a11dba62 4f2a05f8 70cd5e8b");
//!
//! let mut cipher = Hc128::new(&key.into(), &nonce.into());
//!
//! let mut buffer = plaintext.clone();
//!
//! // apply keystream (encrypt)
//! cipher.apply_keystream(&mut buffer);
//! assert_eq!(buffer, ciphertext);
//!
//! // decrypt ciphertext by applying keystream again
//! let mut cipher = Hc128::new(&key.into(), &nonce.into());
//! cipher.apply_keystream(&mut buffer);
//! assert_eq!(buffer, plaintext);
//! ```
//!
//! Keys and nonces of 1..=16 bytes are accepted through
//! [`Hc128Core::new_var`]; missing trailing bytes are taken as zero.
//!
//! [HC-128]: https://www.ecrypt.eu.org/stream/hcp3.html

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub use cipher;

use cipher::{
    consts::{U1, U16, U64},
    Block, BlockSizeUser, InvalidLength, IvSizeUser, KeyIvInit, KeySizeUser, ParBlocksSizeUser,
    StreamBackend, StreamCipherCore, StreamCipherCoreWrapper, StreamClosure,
};

#[cfg(feature = "zeroize")]
use cipher::zeroize::{Zeroize, ZeroizeOnDrop};

/// Maximum key length in bytes.
pub const KEY_MAX_LEN: usize = 16;
/// Maximum IV length in bytes.
pub const IV_MAX_LEN: usize = 16;

/// P and Q table size in words.
const TABLE_WORDS: usize = 512;

/// HC-128 stream cipher key.
pub type Key = cipher::Key<Hc128Core>;

/// HC-128 stream cipher initialization vector.
pub type Iv = cipher::Iv<Hc128Core>;

/// The HC-128 stream cipher.
pub type Hc128 = StreamCipherCoreWrapper<Hc128Core>;

#[inline(always)]
fn load_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

#[inline(always)]
fn f1(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline(always)]
fn f2(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

#[inline(always)]
fn g1(x: u32, y: u32, z: u32) -> u32 {
    (x.rotate_right(10) ^ z.rotate_right(23)).wrapping_add(y.rotate_right(8))
}

#[inline(always)]
fn g2(x: u32, y: u32, z: u32) -> u32 {
    (x.rotate_left(10) ^ z.rotate_left(23)).wrapping_add(y.rotate_left(8))
}

/// The P table in `w[..512]`, the Q table in `w[512..]`, the 16-word
/// working windows of each, and the 10-bit step counter.
#[derive(Debug)]
struct State {
    w: [u32; 2 * TABLE_WORDS],
    x: [u32; 16],
    y: [u32; 16],
    counter: u16,
}

impl State {
    fn setup(key: &[u8; KEY_MAX_LEN], iv: &[u8; IV_MAX_LEN]) -> Self {
        let mut w = [0u32; 2 * TABLE_WORDS];

        for i in 0..8 {
            w[i] = load_u32(&key[(i * 4) % 16..]);
            w[i + 8] = load_u32(&iv[(i * 4) % 16..]);
        }

        // Expansion recurrence; the first 256 results are discarded by
        // rebasing the table window.
        for i in 16..272 {
            w[i] = f2(w[i - 2])
                .wrapping_add(w[i - 7])
                .wrapping_add(f1(w[i - 15]))
                .wrapping_add(w[i - 16])
                .wrapping_add(i as u32);
        }
        for i in 0..16 {
            w[i] = w[256 + i];
        }
        for i in 16..1024 {
            w[i] = f2(w[i - 2])
                .wrapping_add(w[i - 7])
                .wrapping_add(f1(w[i - 15]))
                .wrapping_add(w[i - 16])
                .wrapping_add(256 + i as u32);
        }

        let mut x = [0u32; 16];
        let mut y = [0u32; 16];
        x.copy_from_slice(&w[496..512]);
        y.copy_from_slice(&w[1008..1024]);

        let mut state = Self { w, x, y, counter: 0 };

        // 64 x 16 = 1024 warm-up steps run the generator with its output
        // folded back into the tables.
        for _ in 0..64 {
            state.warmup_step();
        }

        state
    }

    #[inline(always)]
    fn h1(&self, x: u32) -> u32 {
        let a = (x & 0xFF) as usize;
        let b = ((x >> 16) & 0xFF) as usize;
        self.w[512 + a].wrapping_add(self.w[512 + 256 + b])
    }

    #[inline(always)]
    fn h2(&self, x: u32) -> u32 {
        let a = (x & 0xFF) as usize;
        let b = ((x >> 16) & 0xFF) as usize;
        self.w[a].wrapping_add(self.w[256 + b])
    }

    /// One batch of 16 update steps with the output word XORed back into
    /// the active table.
    fn warmup_step(&mut self) {
        let a = (self.counter & 0x1FF) as usize;
        let in_p = self.counter < 512;
        for k in 0..16 {
            let aa = a + k;
            let bb = (a + k + 1) & 0x1FF;
            let (e, d, f) = ((k + 13) % 16, (k + 6) % 16, (k + 4) % 16);
            if in_p {
                let r1 = g1(self.x[e], self.x[d], self.w[bb]);
                let r2 = self.h1(self.x[f]);
                self.w[aa] = self.w[aa].wrapping_add(r1) ^ r2;
                self.x[k] = self.w[aa];
            } else {
                let r1 = g2(self.y[e], self.y[d], self.w[512 + bb]);
                let r2 = self.h2(self.y[f]);
                self.w[512 + aa] = self.w[512 + aa].wrapping_add(r1) ^ r2;
                self.y[k] = self.w[512 + aa];
            }
        }
        self.counter = (self.counter + 16) & 0x3FF;
    }

    /// One batch of 16 update steps emitting 16 keystream words.
    fn next_block(&mut self) -> [u8; 64] {
        let mut ks = [0u32; 16];
        let a = (self.counter & 0x1FF) as usize;
        let in_p = self.counter < 512;
        for k in 0..16 {
            let aa = a + k;
            let bb = (a + k + 1) & 0x1FF;
            let (e, d, f) = ((k + 13) % 16, (k + 6) % 16, (k + 4) % 16);
            if in_p {
                let r1 = g1(self.x[e], self.x[d], self.w[bb]);
                let r2 = self.h1(self.x[f]);
                self.w[aa] = self.w[aa].wrapping_add(r1);
                self.x[k] = self.w[aa];
                ks[k] = r2 ^ self.w[aa];
            } else {
                let r1 = g2(self.y[e], self.y[d], self.w[512 + bb]);
                let r2 = self.h2(self.y[f]);
                self.w[512 + aa] = self.w[512 + aa].wrapping_add(r1);
                self.y[k] = self.w[512 + aa];
                ks[k] = r2 ^ self.w[512 + aa];
            }
        }
        self.counter = (self.counter + 16) & 0x3FF;

        let mut block = [0u8; 64];
        for (chunk, word) in block.chunks_exact_mut(4).zip(ks) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        block
    }
}

#[cfg(feature = "zeroize")]
impl Drop for State {
    fn drop(&mut self) {
        self.w.zeroize();
        self.x.zeroize();
        self.y.zeroize();
        self.counter.zeroize();
    }
}

/// Core state of the HC-128 stream cipher.
#[derive(Debug)]
pub struct Hc128Core {
    state: State,
}

impl Hc128Core {
    /// Initializes the cipher with a 1..=16 byte key and a 1..=16 byte IV.
    ///
    /// Shorter inputs occupy the low-order bytes of the full-width key/IV;
    /// the remaining bytes are zero. The key length is checked first.
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

impl KeySizeUser for Hc128Core {
    type KeySize = U16;
}

impl IvSizeUser for Hc128Core {
    type IvSize = U16;
}

impl KeyIvInit for Hc128Core {
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

impl BlockSizeUser for Hc128Core {
    type BlockSize = U64;
}

impl StreamCipherCore for Hc128Core {
    #[inline(always)]
    fn remaining_blocks(&self) -> Option<usize> {
        None
    }

    fn process_with_backend(&mut self, f: impl StreamClosure<BlockSize = Self::BlockSize>) {
        f.call(&mut Backend(&mut self.state));
    }
}

#[cfg(feature = "zeroize")]
impl ZeroizeOnDrop for Hc128Core {}

struct Backend<'a>(&'a mut State);

impl BlockSizeUser for Backend<'_> {
    type BlockSize = U64;
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
