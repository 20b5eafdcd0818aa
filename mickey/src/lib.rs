//! Implementation of the [Mickey 2.0] stream cipher.
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
//! use mickey::Mickey;
//! // Import relevant traits
//! use mickey::cipher::{KeyIvInit, StreamCipher};
//! use hex_literal::hex;
//!
//! let key = [0x42; 10];
//! let nonce = [0x24; 10];
//! let plaintext = hex!("00010203 04050607 08090A0B 0C0D0E0F");
//! let ciphertext = hex!("aa818b10 c94a5c29 7aebb71d d0a1cd9f");
//!
//! let mut cipher = Mickey::new(&key.into(), &nonce.into());
//!
//! let mut buffer = plaintext.clone();
//!
//! // apply keystream (encrypt)
//! cipher.apply_keystream(&mut buffer);
//! assert_eq!(buffer, ciphertext);
//!
//! // decrypt ciphertext by applying keystream again
//! let mut cipher = Mickey::new(&key.into(), &nonce.into());
//! cipher.apply_keystream(&mut buffer);
//! assert_eq!(buffer, plaintext);
//! ```
//!
//! Keys and nonces of 1..=10 bytes are accepted through
//! [`MickeyCore::new_var`]. A short key is zero-extended to the 80 loaded
//! key bits; a short IV loads fewer IV bits.
//!
//! [Mickey 2.0]: https://www.ecrypt.eu.org/stream/mickeyp3.html

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub use cipher;

use cipher::{
    consts::{U1, U10},
    Block, BlockSizeUser, InvalidLength, IvSizeUser, KeyIvInit, KeySizeUser, ParBlocksSizeUser,
    StreamBackend, StreamCipherCore, StreamCipherCoreWrapper, StreamClosure,
};

#[cfg(feature = "zeroize")]
use cipher::zeroize::{Zeroize, ZeroizeOnDrop};

/// Maximum key length in bytes.
pub const KEY_MAX_LEN: usize = 10;
/// Maximum IV length in bytes.
pub const IV_MAX_LEN: usize = 10;

/// Feedback mask of the linear register R.
const R_MASK: [u32; 4] = [0x1279_327B, 0xB554_6660, 0xDF87_818F, 0x0000_0003];
/// Comparison constants of the nonlinear register S.
const COMP0: [u32; 4] = [0x6AA9_7A30, 0x7942_A809, 0x057E_BFEA, 0x0000_0006];
const COMP1: [u32; 4] = [0xDD62_9E9A, 0xE3A2_1D63, 0x91C2_3DD7, 0x0000_0001];
/// Feedback masks of S for control bit 0 and 1.
const S_MASK0: [u32; 4] = [0x9FFA_7FAF, 0xAF4A_9381, 0x9CEC_5802, 0x0000_0001];
const S_MASK1: [u32; 4] = [0x4C8C_B877, 0x4911_B063, 0x40FB_C52B, 0x0000_0008];

/// Mickey stream cipher key.
pub type Key = cipher::Key<MickeyCore>;

/// Mickey stream cipher initialization vector.
pub type Iv = cipher::Iv<MickeyCore>;

/// The Mickey 2.0 stream cipher.
pub type Mickey = StreamCipherCoreWrapper<MickeyCore>;

/// The two 100-bit registers, each packed into four 32-bit words.
#[derive(Debug)]
struct State {
    r: [u32; 4],
    s: [u32; 4],
}

impl State {
    fn setup(key: &[u8; KEY_MAX_LEN], iv: &[u8; IV_MAX_LEN], iv_len: usize) -> Self {
        let mut state = Self {
            r: [0; 4],
            s: [0; 4],
        };

        // IV bits, then the 80 key bits, all MSB first, loaded with mixing
        // enabled; then 100 preclock steps.
        for i in 0..iv_len * 8 {
            let bit = (iv[i / 8] >> (7 - (i & 7))) & 1;
            state.clock_kg(true, bit);
        }
        for i in 0..80 {
            let bit = (key[i / 8] >> (7 - (i & 7))) & 1;
            state.clock_kg(true, bit);
        }
        for _ in 0..100 {
            state.clock_kg(true, 0);
        }

        state
    }

    fn clock_r(&mut self, input_bit: u8, control_bit: u8) {
        let r = &mut self.r;
        let feedback = ((r[3] >> 3) & 1) as u8 ^ input_bit;
        let carry0 = r[0] >> 31;
        let carry1 = r[1] >> 31;
        let carry2 = r[2] >> 31;

        if control_bit != 0 {
            r[0] ^= r[0] << 1;
            r[1] ^= (r[1] << 1) ^ carry0;
            r[2] ^= (r[2] << 1) ^ carry1;
            r[3] ^= (r[3] << 1) ^ carry2;
        } else {
            r[0] <<= 1;
            r[1] = (r[1] << 1) ^ carry0;
            r[2] = (r[2] << 1) ^ carry1;
            r[3] = (r[3] << 1) ^ carry2;
        }

        if feedback != 0 {
            for (w, m) in r.iter_mut().zip(R_MASK) {
                *w ^= m;
            }
        }
    }

    fn clock_s(&mut self, input_bit: u8, control_bit: u8) {
        let s = &mut self.s;
        let feedback = ((s[3] >> 3) & 1) as u8 ^ input_bit;
        let carry0 = s[0] >> 31;
        let carry1 = s[1] >> 31;
        let carry2 = s[2] >> 31;

        s[0] = (s[0] << 1) ^ ((s[0] ^ COMP0[0]) & ((s[0] >> 1) ^ (s[1] << 31) ^ COMP1[0]) & 0xFFFF_FFFE);
        s[1] = (s[1] << 1) ^ ((s[1] ^ COMP0[1]) & ((s[1] >> 1) ^ (s[2] << 31) ^ COMP1[1])) ^ carry0;
        s[2] = (s[2] << 1) ^ ((s[2] ^ COMP0[2]) & ((s[2] >> 1) ^ (s[3] << 31) ^ COMP1[2])) ^ carry1;
        s[3] = (s[3] << 1) ^ ((s[3] ^ COMP0[3]) & ((s[3] >> 1) ^ COMP1[3]) & 0x7) ^ carry2;

        if feedback != 0 {
            let mask = if control_bit != 0 { S_MASK1 } else { S_MASK0 };
            for (w, m) in s.iter_mut().zip(mask) {
                *w ^= m;
            }
        }
    }

    fn clock_kg(&mut self, mixing: bool, input_bit: u8) {
        let control_r = (((self.s[1] >> 2) ^ (self.r[2] >> 3)) & 1) as u8;
        let control_s = (((self.r[1] >> 1) ^ (self.s[2] >> 3)) & 1) as u8;

        if mixing {
            self.clock_r(((self.s[1] >> 18) & 1) as u8 ^ input_bit, control_r);
        } else {
            self.clock_r(input_bit, control_r);
        }
        self.clock_s(input_bit, control_s);
    }

    fn next_block(&mut self) -> [u8; 1] {
        let mut byte = 0u8;
        for j in 0..8 {
            // output bit before the clock, MSB first
            byte ^= (((self.r[0] ^ self.s[0]) & 1) as u8) << (7 - j);
            self.clock_kg(false, 0);
        }
        [byte]
    }
}

#[cfg(feature = "zeroize")]
impl Drop for State {
    fn drop(&mut self) {
        self.r.zeroize();
        self.s.zeroize();
    }
}

/// Core state of the Mickey 2.0 stream cipher.
#[derive(Debug)]
pub struct MickeyCore {
    state: State,
}

impl MickeyCore {
    /// Initializes the cipher with a 1..=10 byte key and a 1..=10 byte IV.
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
            state: State::setup(&k, &v, iv.len()),
        })
    }
}

impl KeySizeUser for MickeyCore {
    type KeySize = U10;
}

impl IvSizeUser for MickeyCore {
    type IvSize = U10;
}

impl KeyIvInit for MickeyCore {
    fn new(key: &Key, iv: &Iv) -> Self {
        let mut k = [0u8; KEY_MAX_LEN];
        k.copy_from_slice(key);
        let mut v = [0u8; IV_MAX_LEN];
        v.copy_from_slice(iv);

        Self {
            state: State::setup(&k, &v, IV_MAX_LEN),
        }
    }
}

impl BlockSizeUser for MickeyCore {
    type BlockSize = U1;
}

impl StreamCipherCore for MickeyCore {
    #[inline(always)]
    fn remaining_blocks(&self) -> Option<usize> {
        None
    }

    fn process_with_backend(&mut self, f: impl StreamClosure<BlockSize = Self::BlockSize>) {
        f.call(&mut Backend(&mut self.state));
    }
}

#[cfg(feature = "zeroize")]
impl ZeroizeOnDrop for MickeyCore {}

struct Backend<'a>(&'a mut State);

impl BlockSizeUser for Backend<'_> {
    type BlockSize = U1;
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
