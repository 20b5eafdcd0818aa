//! Implementation of the [Grain-128] stream cipher.
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
//! use grain::Grain;
//! // Import relevant traits
//! use grain::cipher::{KeyIvInit, StreamCipher};
//! use hex_literal::hex;
//!
//! let key = [0x42; 16];
//! let nonce = [0x24; 12];
//! let plaintext = hex!("00010203 04050607 08090A0B 0C0D0E0F");
//! let ciphertext = hex!("7488a42f af3ea8d0 23a1d465 0355d51c");
//!
//! let mut cipher = Grain::new(&key.into(), &nonce.into());
//!
//! let mut buffer = plaintext.clone();
//!
//! // apply keystream (encrypt)
//! cipher.apply_keystream(&mut buffer);
//! assert_eq!(buffer, ciphertext);
//!
//! // decrypt ciphertext by applying keystream again
//! let mut cipher = Grain::new(&key.into(), &nonce.into());
//! cipher.apply_keystream(&mut buffer);
//! assert_eq!(buffer, plaintext);
//! ```
//!
//! Keys of 1..=16 bytes and nonces of 1..=12 bytes are accepted through
//! [`GrainCore::new_var`]. Shorter keys shrink the clocked register span
//! accordingly; only the full 16-byte key is standard Grain-128.
//!
//! [Grain-128]: https://www.ecrypt.eu.org/stream/grainp3.html

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub use cipher;

use cipher::{
    consts::{U1, U12, U16},
    Block, BlockSizeUser, InvalidLength, IvSizeUser, KeyIvInit, KeySizeUser, ParBlocksSizeUser,
    StreamBackend, StreamCipherCore, StreamCipherCoreWrapper, StreamClosure,
};

#[cfg(feature = "zeroize")]
use cipher::zeroize::{Zeroize, ZeroizeOnDrop};

/// Maximum key length in bytes.
pub const KEY_MAX_LEN: usize = 16;
/// Maximum IV length in bytes.
pub const IV_MAX_LEN: usize = 12;

/// Register width in bits.
const REG_BITS: usize = 128;

/// Grain stream cipher key.
pub type Key = cipher::Key<GrainCore>;

/// Grain stream cipher initialization vector.
pub type Iv = cipher::Iv<GrainCore>;

/// The Grain-128 stream cipher.
pub type Grain = StreamCipherCoreWrapper<GrainCore>;

/// NFSR (`b`) and LFSR (`s`), one bit per cell. `span` is the clocked
/// register length in bits and equals the key length in bits.
#[derive(Debug)]
struct State {
    b: [u8; REG_BITS],
    s: [u8; REG_BITS],
    span: usize,
}

impl State {
    fn setup(key: &[u8; KEY_MAX_LEN], key_len: usize, iv: &[u8; IV_MAX_LEN], iv_len: usize) -> Self {
        let key_bits = key_len * 8;
        let iv_bits = iv_len * 8;

        let mut b = [0u8; REG_BITS];
        let mut s = [0u8; REG_BITS];

        // Bits are loaded LSB first: key into the NFSR, IV into the LFSR,
        // the LFSR positions past the IV filled with ones.
        for i in 0..iv_bits {
            b[i] = (key[i / 8] >> (i & 7)) & 1;
            s[i] = (iv[i / 8] >> (i & 7)) & 1;
        }
        for i in iv_bits..key_bits {
            b[i] = (key[i / 8] >> (i & 7)) & 1;
            s[i] = 1;
        }

        let mut state = Self {
            b,
            s,
            span: key_bits,
        };

        // 256 initialization clocks with the output fed back into both
        // registers.
        for _ in 0..256 {
            let out = state.clock();
            state.b[REG_BITS - 1] ^= out;
            state.s[REG_BITS - 1] ^= out;
        }

        state
    }

    /// One generator clock: emits the output bit and shifts both registers.
    fn clock(&mut self) -> u8 {
        let b = &self.b;
        let s = &self.s;

        let h = (b[12] & s[8])
            ^ (s[13] & s[20])
            ^ (b[95] & s[42])
            ^ (s[60] & s[79])
            ^ (b[12] & b[95] & s[95]);
        let out = b[2] ^ b[15] ^ b[36] ^ b[45] ^ b[64] ^ b[73] ^ b[89] ^ h ^ s[93];

        let nfsr_bit = s[0]
            ^ b[0]
            ^ b[26]
            ^ b[56]
            ^ b[91]
            ^ b[96]
            ^ (b[3] & b[67])
            ^ (b[11] & b[13])
            ^ (b[17] & b[18])
            ^ (b[27] & b[59])
            ^ (b[40] & b[48])
            ^ (b[61] & b[65])
            ^ (b[68] & b[84]);
        let lfsr_bit = s[0] ^ s[7] ^ s[38] ^ s[70] ^ s[81] ^ s[96];

        let n = self.span;
        self.b.copy_within(1..n, 0);
        self.s.copy_within(1..n, 0);
        self.b[n - 1] = nfsr_bit;
        self.s[n - 1] = lfsr_bit;

        out
    }

    fn next_block(&mut self) -> [u8; 1] {
        let mut byte = 0u8;
        for j in 0..8 {
            byte |= self.clock() << j;
        }
        [byte]
    }
}

#[cfg(feature = "zeroize")]
impl Drop for State {
    fn drop(&mut self) {
        self.b.zeroize();
        self.s.zeroize();
    }
}

/// Core state of the Grain-128 stream cipher.
#[derive(Debug)]
pub struct GrainCore {
    state: State,
}

impl GrainCore {
    /// Initializes the cipher with a 1..=16 byte key and a 1..=12 byte IV.
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
            state: State::setup(&k, key.len(), &v, iv.len()),
        })
    }
}

impl KeySizeUser for GrainCore {
    type KeySize = U16;
}

impl IvSizeUser for GrainCore {
    type IvSize = U12;
}

impl KeyIvInit for GrainCore {
    fn new(key: &Key, iv: &Iv) -> Self {
        let mut k = [0u8; KEY_MAX_LEN];
        k.copy_from_slice(key);
        let mut v = [0u8; IV_MAX_LEN];
        v.copy_from_slice(iv);

        Self {
            state: State::setup(&k, KEY_MAX_LEN, &v, IV_MAX_LEN),
        }
    }
}

impl BlockSizeUser for GrainCore {
    type BlockSize = U1;
}

impl StreamCipherCore for GrainCore {
    #[inline(always)]
    fn remaining_blocks(&self) -> Option<usize> {
        None
    }

    fn process_with_backend(&mut self, f: impl StreamClosure<BlockSize = Self::BlockSize>) {
        f.call(&mut Backend(&mut self.state));
    }
}

#[cfg(feature = "zeroize")]
impl ZeroizeOnDrop for GrainCore {}

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
