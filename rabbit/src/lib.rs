//! Implementation of the [Rabbit] stream cipher.
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
//! use rabbit::Rabbit;
//! // Import relevant traits
//! use rabbit::cipher::{KeyIvInit, StreamCipher};
//! use hex_literal::hex;
//!
//! let key = [0x42; 16];
//! let nonce = [0x24; 8];
//! let plaintext = hex!("00010203 04050607 08090A0B 0C0D0E0F");
//! let ciphertext = hex!("10298496 ceda18ee 0e257cbb 1ab43bcc");
//!
//! let mut cipher = Rabbit::new(&key.into(), &nonce.into());
//!
//! let mut buffer = plaintext.clone();
//!
//! // apply keystream (encrypt)
//! cipher.apply_keystream(&mut buffer);
//! assert_eq!(buffer, ciphertext);
//!
//! // decrypt ciphertext by applying keystream again
//! let mut cipher = Rabbit::new(&key.into(), &nonce.into());
//! cipher.apply_keystream(&mut buffer);
//! assert_eq!(buffer, plaintext);
//! ```
//!
//! Keys shorter than 16 bytes and nonces shorter than 8 bytes are accepted
//! through [`RabbitCore::new_var`]; missing trailing bytes are taken as zero.
//!
//! [Rabbit]: https://tools.ietf.org/html/rfc4503

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub use cipher;

use cipher::{
    consts::{U1, U8, U16},
    Block, BlockSizeUser, InvalidLength, IvSizeUser, KeyIvInit, KeySizeUser, ParBlocksSizeUser,
    StreamBackend, StreamCipherCore, StreamCipherCoreWrapper, StreamClosure,
};

#[cfg(feature = "zeroize")]
use cipher::zeroize::{Zeroize, ZeroizeOnDrop};

/// Maximum key length in bytes.
pub const KEY_MAX_LEN: usize = 16;
/// Maximum IV length in bytes.
pub const IV_MAX_LEN: usize = 8;

/// RFC 4503 2.5. Counter System (page 3).
const A: [u32; 8] = [
    0x4D34_D34D,
    0xD34D_34D3,
    0x34D3_4D34,
    0x4D34_D34D,
    0xD34D_34D3,
    0x34D3_4D34,
    0x4D34_D34D,
    0xD34D_34D3,
];

/// Rabbit stream cipher key.
pub type Key = cipher::Key<RabbitCore>;

/// Rabbit stream cipher initialization vector.
pub type Iv = cipher::Iv<RabbitCore>;

/// The Rabbit stream cipher.
pub type Rabbit = StreamCipherCoreWrapper<RabbitCore>;

#[inline(always)]
fn load_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

/// RFC 4503 2.2. Inner State (page 2).
#[derive(Debug)]
struct State {
    /// State variables
    x: [u32; 8],
    /// Counter variables
    c: [u32; 8],
    carry: u8,
}

impl State {
    /// RFC 4503 2.3. Key Setup Scheme (page 2).
    fn setup_key(key: &[u8; KEY_MAX_LEN]) -> Self {
        let k0 = load_u32(&key[0..4]);
        let k1 = load_u32(&key[4..8]);
        let k2 = load_u32(&key[8..12]);
        let k3 = load_u32(&key[12..16]);

        let x = [
            k0,
            (k3 << 16) | (k2 >> 16),
            k1,
            (k0 << 16) | (k3 >> 16),
            k2,
            (k1 << 16) | (k0 >> 16),
            k3,
            (k2 << 16) | (k1 >> 16),
        ];
        let c = [
            (k2 << 16) | (k2 >> 16),
            (k0 >> 16) | (k1 << 16),
            (k3 << 16) | (k3 >> 16),
            (k1 >> 16) | (k2 << 16),
            (k0 << 16) | (k0 >> 16),
            (k2 >> 16) | (k3 << 16),
            (k1 << 16) | (k1 >> 16),
            (k3 >> 16) | (k0 << 16),
        ];

        let mut state = Self { x, c, carry: 0 };

        for _ in 0..4 {
            state.next_state();
        }

        for j in 0..8 {
            state.c[j] ^= state.x[(j + 4) % 8];
        }

        state
    }

    /// RFC 4503 2.4. IV Setup Scheme (page 2-3).
    fn setup_iv(&mut self, iv: &[u8; IV_MAX_LEN]) {
        let i0 = load_u32(&iv[0..4]);
        let i2 = load_u32(&iv[4..8]);
        let i1 = (i0 >> 16) | (i2 & 0xFFFF_0000);
        let i3 = (i2 << 16) | (i0 & 0x0000_FFFF);

        for (c, i) in self.c.iter_mut().zip([i0, i1, i2, i3, i0, i1, i2, i3]) {
            *c ^= i;
        }

        for _ in 0..4 {
            self.next_state();
        }
    }

    /// RFC 4503 2.5. Counter System (page 3).
    fn counter_update(&mut self) {
        let mut carry = self.carry as u64;
        for (c, a) in self.c.iter_mut().zip(A) {
            let t = *c as u64 + a as u64 + carry;
            carry = t >> 32;
            *c = t as u32;
        }
        self.carry = carry as u8;
    }

    /// RFC 4503 2.6. Next-State Function (page 3-4).
    fn next_state(&mut self) {
        self.counter_update();

        let mut g = [0u32; 8];
        for j in 0..8 {
            // g-function: square a 32-bit sum and fold the 64-bit result
            let uv = self.x[j].wrapping_add(self.c[j]) as u64;
            let square = uv * uv;
            g[j] = (square ^ (square >> 32)) as u32;
        }

        let x = &mut self.x;
        x[0] = g[0]
            .wrapping_add(g[7].rotate_left(16))
            .wrapping_add(g[6].rotate_left(16));
        x[1] = g[1].wrapping_add(g[0].rotate_left(8)).wrapping_add(g[7]);
        x[2] = g[2]
            .wrapping_add(g[1].rotate_left(16))
            .wrapping_add(g[0].rotate_left(16));
        x[3] = g[3].wrapping_add(g[2].rotate_left(8)).wrapping_add(g[1]);
        x[4] = g[4]
            .wrapping_add(g[3].rotate_left(16))
            .wrapping_add(g[2].rotate_left(16));
        x[5] = g[5].wrapping_add(g[4].rotate_left(8)).wrapping_add(g[3]);
        x[6] = g[6]
            .wrapping_add(g[5].rotate_left(16))
            .wrapping_add(g[4].rotate_left(16));
        x[7] = g[7].wrapping_add(g[6].rotate_left(8)).wrapping_add(g[5]);
    }

    /// RFC 4503 2.7. Extraction Scheme (page 4).
    fn next_block(&mut self) -> [u8; 16] {
        self.next_state();

        let x = &self.x;
        let s = [
            x[0] ^ (x[5] >> 16) ^ (x[3] << 16),
            x[2] ^ (x[7] >> 16) ^ (x[5] << 16),
            x[4] ^ (x[1] >> 16) ^ (x[7] << 16),
            x[6] ^ (x[3] >> 16) ^ (x[1] << 16),
        ];

        let mut block = [0u8; 16];
        for (chunk, word) in block.chunks_exact_mut(4).zip(s) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        block
    }
}

#[cfg(feature = "zeroize")]
impl Drop for State {
    fn drop(&mut self) {
        self.x.zeroize();
        self.c.zeroize();
        self.carry.zeroize();
    }
}

/// Core state of the Rabbit stream cipher.
#[derive(Debug)]
pub struct RabbitCore {
    state: State,
}

impl RabbitCore {
    /// Initializes the cipher with a 1..=16 byte key and a 1..=8 byte IV.
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

        let mut state = State::setup_key(&k);
        state.setup_iv(&v);
        Ok(Self { state })
    }
}

impl KeySizeUser for RabbitCore {
    type KeySize = U16;
}

impl IvSizeUser for RabbitCore {
    type IvSize = U8;
}

impl KeyIvInit for RabbitCore {
    fn new(key: &Key, iv: &Iv) -> Self {
        let mut k = [0u8; KEY_MAX_LEN];
        k.copy_from_slice(key);
        let mut v = [0u8; IV_MAX_LEN];
        v.copy_from_slice(iv);

        let mut state = State::setup_key(&k);
        state.setup_iv(&v);
        Self { state }
    }
}

impl BlockSizeUser for RabbitCore {
    type BlockSize = U16;
}

impl StreamCipherCore for RabbitCore {
    #[inline(always)]
    fn remaining_blocks(&self) -> Option<usize> {
        // Rabbit can generate 2^64 blocks; the counter system will not be
        // exhausted by any realistic stream.
        None
    }

    fn process_with_backend(&mut self, f: impl StreamClosure<BlockSize = Self::BlockSize>) {
        f.call(&mut Backend(&mut self.state));
    }
}

#[cfg(feature = "zeroize")]
impl ZeroizeOnDrop for RabbitCore {}

struct Backend<'a>(&'a mut State);

impl BlockSizeUser for Backend<'_> {
    type BlockSize = U16;
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
