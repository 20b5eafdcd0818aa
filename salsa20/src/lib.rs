//! Implementation of the [Salsa20] stream cipher.
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
//! use salsa20::Salsa20;
//! // Import relevant traits
//! use salsa20::cipher::{KeyIvInit, StreamCipher};
//! use hex_literal::hex;
//!
//! let key = [0x42; 32];
//! let nonce = [0x24; 8];
//! let plaintext = hex!("00010203 04050607 08090A0B 0C0D0E0F");
//! let ciphertext = hex!("85843cc5 d58cce7b 5dd3dd04 fa005ded");
//!
//! let mut cipher = Salsa20::new(&key.into(), &nonce.into());
//!
//! let mut buffer = plaintext.clone();
//!
//! // apply keystream (encrypt)
//! cipher.apply_keystream(&mut buffer);
//! assert_eq!(buffer, ciphertext);
//!
//! // decrypt ciphertext by applying keystream again
//! let mut cipher = Salsa20::new(&key.into(), &nonce.into());
//! cipher.apply_keystream(&mut buffer);
//! assert_eq!(buffer, plaintext);
//! ```
//!
//! Keys of 1..=32 bytes and nonces of 1..=8 bytes are accepted through
//! [`Salsa20Core::new_var`]. An exactly 32-byte key uses the "expand 32-byte k"
//! constants; any shorter key uses "expand 16-byte k" with its zero-extended
//! first 16 bytes occupying both key sections of the matrix.
//!
//! [Salsa20]: https://cr.yp.to/snuffle.html

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub use cipher;

use cipher::{
    consts::{U1, U8, U32, U64},
    Block, BlockSizeUser, InvalidLength, IvSizeUser, KeyIvInit, KeySizeUser, ParBlocksSizeUser,
    StreamBackend, StreamCipherCore, StreamCipherCoreWrapper, StreamClosure,
};

#[cfg(feature = "zeroize")]
use cipher::zeroize::{Zeroize, ZeroizeOnDrop};

/// Maximum key length in bytes.
pub const KEY_MAX_LEN: usize = 32;
/// Maximum IV length in bytes.
pub const IV_MAX_LEN: usize = 8;

/// Number of 32-bit words in the Salsa20 state.
const STATE_WORDS: usize = 16;

/// "expand 32-byte k"
const SIGMA: [u32; 4] = [0x6170_7865, 0x3320_646E, 0x7962_2D32, 0x6B20_6574];
/// "expand 16-byte k"
const TAU: [u32; 4] = [0x6170_7865, 0x3120_646E, 0x7962_2D36, 0x6B20_6574];

/// Salsa20 stream cipher key.
pub type Key = cipher::Key<Salsa20Core>;

/// Salsa20 stream cipher initialization vector.
pub type Iv = cipher::Iv<Salsa20Core>;

/// The Salsa20/20 stream cipher.
pub type Salsa20 = StreamCipherCoreWrapper<Salsa20Core>;

#[inline(always)]
fn load_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

/// 4x4 word matrix: constants on the diagonal, key, IV and the 64-bit
/// block counter in words 8 and 9.
#[derive(Debug)]
struct State {
    x: [u32; STATE_WORDS],
}

impl State {
    fn setup(key: &[u8; KEY_MAX_LEN], short_key: bool, iv: &[u8; IV_MAX_LEN]) -> Self {
        // A short key selects tau and reuses its first half for both key
        // sections of the matrix.
        let (constants, second_half) = if short_key { (TAU, 0) } else { (SIGMA, 16) };

        let mut x = [0u32; STATE_WORDS];
        for i in 0..4 {
            x[i * 5] = constants[i];
            x[i + 1] = load_u32(&key[i * 4..]);
            x[i + 11] = load_u32(&key[second_half + i * 4..]);
        }
        x[6] = load_u32(&iv[0..4]);
        x[7] = load_u32(&iv[4..8]);
        // x[8], x[9] hold the block counter, starting at zero

        Self { x }
    }

    fn next_block(&mut self) -> [u8; 64] {
        let mut z = self.x;
        for _ in 0..10 {
            // column round
            quarter_round(0, 4, 8, 12, &mut z);
            quarter_round(5, 9, 13, 1, &mut z);
            quarter_round(10, 14, 2, 6, &mut z);
            quarter_round(15, 3, 7, 11, &mut z);
            // diagonal round
            quarter_round(0, 1, 2, 3, &mut z);
            quarter_round(5, 6, 7, 4, &mut z);
            quarter_round(10, 11, 8, 9, &mut z);
            quarter_round(15, 12, 13, 14, &mut z);
        }

        let mut block = [0u8; 64];
        for (i, chunk) in block.chunks_exact_mut(4).enumerate() {
            chunk.copy_from_slice(&z[i].wrapping_add(self.x[i]).to_le_bytes());
        }

        self.x[8] = self.x[8].wrapping_add(1);
        if self.x[8] == 0 {
            self.x[9] = self.x[9].wrapping_add(1);
        }

        block
    }
}

#[inline(always)]
fn quarter_round(a: usize, b: usize, c: usize, d: usize, state: &mut [u32; STATE_WORDS]) {
    state[b] ^= state[a].wrapping_add(state[d]).rotate_left(7);
    state[c] ^= state[b].wrapping_add(state[a]).rotate_left(9);
    state[d] ^= state[c].wrapping_add(state[b]).rotate_left(13);
    state[a] ^= state[d].wrapping_add(state[c]).rotate_left(18);
}

#[cfg(feature = "zeroize")]
impl Drop for State {
    fn drop(&mut self) {
        self.x.zeroize();
    }
}

/// Core state of the Salsa20 stream cipher.
#[derive(Debug)]
pub struct Salsa20Core {
    state: State,
}

impl Salsa20Core {
    /// Initializes the cipher with a 1..=32 byte key and a 1..=8 byte IV.
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
            state: State::setup(&k, key.len() < KEY_MAX_LEN, &v),
        })
    }
}

impl KeySizeUser for Salsa20Core {
    type KeySize = U32;
}

impl IvSizeUser for Salsa20Core {
    type IvSize = U8;
}

impl KeyIvInit for Salsa20Core {
    fn new(key: &Key, iv: &Iv) -> Self {
        let mut k = [0u8; KEY_MAX_LEN];
        k.copy_from_slice(key);
        let mut v = [0u8; IV_MAX_LEN];
        v.copy_from_slice(iv);

        Self {
            state: State::setup(&k, false, &v),
        }
    }
}

impl BlockSizeUser for Salsa20Core {
    type BlockSize = U64;
}

impl StreamCipherCore for Salsa20Core {
    #[inline(always)]
    fn remaining_blocks(&self) -> Option<usize> {
        // 64-bit block counter; not exhaustible in practice.
        None
    }

    fn process_with_backend(&mut self, f: impl StreamClosure<BlockSize = Self::BlockSize>) {
        f.call(&mut Backend(&mut self.state));
    }
}

#[cfg(feature = "zeroize")]
impl ZeroizeOnDrop for Salsa20Core {}

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
