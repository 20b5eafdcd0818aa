//! Implementation of the [Trivium] stream cipher.
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
//! use trivium::Trivium;
//! // Import relevant traits
//! use trivium::cipher::{KeyIvInit, StreamCipher};
//! use hex_literal::hex;
//!
//! let key = [0x42; 10];
//! let nonce = [0x24; 10];
//! let plaintext = hex!("00010203 04050607 08090A0B 0C0D0E0F");
//! let ciphertext = hex!("f8ec1edf d74b4c6c 22e360d0 9938f9a6");
//!
//! let mut cipher = Trivium::new(&key.into(), &nonce.into());
//!
//! let mut buffer = plaintext.clone();
//!
//! // apply keystream (encrypt)
//! cipher.apply_keystream(&mut buffer);
//! assert_eq!(buffer, ciphertext);
//!
//! // decrypt ciphertext by applying keystream again
//! let mut cipher = Trivium::new(&key.into(), &nonce.into());
//! cipher.apply_keystream(&mut buffer);
//! assert_eq!(buffer, plaintext);
//! ```
//!
//! Keys and nonces of 1..=10 bytes are accepted through
//! [`TriviumCore::new_var`]; missing trailing bytes are taken as zero.
//!
//! [Trivium]: https://www.ecrypt.eu.org/stream/triviump3.html

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub use cipher;

use cipher::{
    consts::{U1, U4, U10},
    Block, BlockSizeUser, InvalidLength, IvSizeUser, KeyIvInit, KeySizeUser, ParBlocksSizeUser,
    StreamBackend, StreamCipherCore, StreamCipherCoreWrapper, StreamClosure,
};

#[cfg(feature = "zeroize")]
use cipher::zeroize::{Zeroize, ZeroizeOnDrop};

/// Maximum key length in bytes.
pub const KEY_MAX_LEN: usize = 10;
/// Maximum IV length in bytes.
pub const IV_MAX_LEN: usize = 10;

/// Trivium stream cipher key.
pub type Key = cipher::Key<TriviumCore>;

/// Trivium stream cipher initialization vector.
pub type Iv = cipher::Iv<TriviumCore>;

/// The Trivium stream cipher.
pub type Trivium = StreamCipherCoreWrapper<TriviumCore>;

/// Tap at bit position `c` (64..96) of the register pair `a:b`.
#[inline(always)]
fn s64(a: u32, b: u32, c: u32) -> u32 {
    (a << (96 - c)) | (b >> (c - 64))
}

/// Tap at bit position `c` (96..128) of the register pair `a:b`.
#[inline(always)]
fn s96(a: u32, b: u32, c: u32) -> u32 {
    (a << (128 - c)) | (b >> (c - 96))
}

/// The 288-bit register triple packed into ten 32-bit words:
/// `w[0..3]` holds register A, `w[3..6]` register B, `w[6..10]` register C.
#[derive(Debug)]
struct State {
    w: [u32; 10],
}

impl State {
    fn setup(key: &[u8; KEY_MAX_LEN], iv: &[u8; IV_MAX_LEN]) -> Self {
        let mut s = [0u8; 40];
        s[..KEY_MAX_LEN].copy_from_slice(key);
        s[12..12 + IV_MAX_LEN].copy_from_slice(iv);
        s[37] = 0x70;

        let mut w = [0u32; 10];
        for (word, chunk) in w.iter_mut().zip(s.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        let mut state = Self { w };
        // 4 x 288 / 32 = 36 warm-up iterations before the first output
        for _ in 0..4 * 9 {
            state.step();
        }
        state
    }

    /// Advances all three registers by 32 bit positions, returning the
    /// 32 output bits.
    fn step(&mut self) -> u32 {
        let w = &self.w;

        let mut t1 = s64(w[2], w[1], 66) ^ s64(w[2], w[1], 93);
        let mut t2 = s64(w[5], w[4], 69) ^ s64(w[5], w[4], 84);
        let mut t3 = s64(w[8], w[7], 66) ^ s96(w[9], w[8], 111);
        let z = t1 ^ t2 ^ t3;

        t1 ^= (s64(w[2], w[1], 91) & s64(w[2], w[1], 92)) ^ s64(w[5], w[4], 78);
        t2 ^= (s64(w[5], w[4], 82) & s64(w[5], w[4], 83)) ^ s64(w[8], w[7], 87);
        t3 ^= (s96(w[9], w[8], 109) & s96(w[9], w[8], 110)) ^ s64(w[2], w[1], 69);

        let w = &mut self.w;
        w[2] = w[1];
        w[1] = w[0];
        w[0] = t3;
        w[5] = w[4];
        w[4] = w[3];
        w[3] = t1;
        w[9] = w[8];
        w[8] = w[7];
        w[7] = w[6];
        w[6] = t2;

        z
    }

    fn next_block(&mut self) -> [u8; 4] {
        self.step().to_le_bytes()
    }
}

#[cfg(feature = "zeroize")]
impl Drop for State {
    fn drop(&mut self) {
        self.w.zeroize();
    }
}

/// Core state of the Trivium stream cipher.
#[derive(Debug)]
pub struct TriviumCore {
    state: State,
}

impl TriviumCore {
    /// Initializes the cipher with a 1..=10 byte key and a 1..=10 byte IV.
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

impl KeySizeUser for TriviumCore {
    type KeySize = U10;
}

impl IvSizeUser for TriviumCore {
    type IvSize = U10;
}

impl KeyIvInit for TriviumCore {
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

impl BlockSizeUser for TriviumCore {
    type BlockSize = U4;
}

impl StreamCipherCore for TriviumCore {
    #[inline(always)]
    fn remaining_blocks(&self) -> Option<usize> {
        None
    }

    fn process_with_backend(&mut self, f: impl StreamClosure<BlockSize = Self::BlockSize>) {
        f.call(&mut Backend(&mut self.state));
    }
}

#[cfg(feature = "zeroize")]
impl ZeroizeOnDrop for TriviumCore {}

struct Backend<'a>(&'a mut State);

impl BlockSizeUser for Backend<'_> {
    type BlockSize = U4;
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
