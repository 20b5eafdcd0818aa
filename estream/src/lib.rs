//! Unified interface over the eSTREAM stream cipher suite.
//!
//! Seven software profile ciphers are exposed behind a single context
//! type: [Salsa20], [Rabbit], [HC-128], [Sosemanuk], [Grain-128],
//! [Mickey 2.0] and [Trivium]. An [`Algorithm`] is selected by value or
//! by its numeric identifier, a key and IV of any length within the
//! cipher's bounds are installed, and plaintext is combined with the
//! keystream in place. Applying the keystream twice restores the input.
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
//! use estream::{Algorithm, Estream};
//! use hex_literal::hex;
//!
//! let algorithm = Algorithm::try_from(1)?; // Rabbit
//! let key = [0x42; 16];
//! let nonce = [0x24; 8];
//! let plaintext = hex!("00010203 04050607 08090A0B 0C0D0E0F");
//! let ciphertext = hex!("10298496 ceda18ee 0e257cbb 1ab43bcc");
//!
//! let mut cipher = Estream::new(algorithm, &key, &nonce)?;
//!
//! let mut buffer = plaintext.clone();
//!
//! // apply keystream (encrypt)
//! cipher.crypt(&mut buffer);
//! assert_eq!(buffer, ciphertext);
//!
//! // decrypt ciphertext by applying keystream again
//! cipher.set_key_and_iv(&key, &nonce)?;
//! cipher.crypt(&mut buffer);
//! assert_eq!(buffer, plaintext);
//! # Ok::<(), estream::Error>(())
//! ```
//!
//! [Salsa20]: https://www.ecrypt.eu.org/stream/salsa20p3.html
//! [Rabbit]: https://www.ecrypt.eu.org/stream/rabbitp3.html
//! [HC-128]: https://www.ecrypt.eu.org/stream/hcp3.html
//! [Sosemanuk]: https://www.ecrypt.eu.org/stream/sosemanukp3.html
//! [Grain-128]: https://www.ecrypt.eu.org/stream/grainp3.html
//! [Mickey 2.0]: https://www.ecrypt.eu.org/stream/mickeyp3.html
//! [Trivium]: https://www.ecrypt.eu.org/stream/triviump3.html

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub use cipher;

use core::fmt;

use cipher::{Block, StreamCipherCore};
use grain::GrainCore;
use hc_128::Hc128Core;
use mickey::MickeyCore;
use rabbit::RabbitCore;
use salsa20::Salsa20Core;
use sosemanuk::SosemanukCore;
use trivium::TriviumCore;

/// Largest key accepted by any cipher of the suite, in bytes.
pub const KEY_BUF_LEN: usize = 32;
/// Largest IV accepted by any cipher of the suite, in bytes.
pub const IV_BUF_LEN: usize = 16;

/// Longest keystream sample emitted by [`Estream::test_vectors`].
const DUMP_BUF_LEN: usize = 80;

/// The cipher suite errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The numeric algorithm identifier is out of range.
    UnknownAlgorithm(u8),
    /// The key is empty or longer than the cipher allows.
    InvalidKeyLength,
    /// The IV is empty or longer than the cipher allows.
    InvalidIvLength,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownAlgorithm(id) => write!(f, "unknown algorithm identifier: {}", id),
            Error::InvalidKeyLength => f.write_str("invalid key length"),
            Error::InvalidIvLength => f.write_str("invalid IV length"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// The stream ciphers of the suite.
///
/// Discriminants double as the numeric identifiers used for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Algorithm {
    /// Salsa20
    Salsa20 = 0,
    /// Rabbit
    Rabbit = 1,
    /// HC-128
    Hc128 = 2,
    /// Sosemanuk
    Sosemanuk = 3,
    /// Grain-128
    Grain = 4,
    /// Mickey 2.0
    Mickey = 5,
    /// Trivium
    Trivium = 6,
}

impl Algorithm {
    /// All suite members, in identifier order.
    pub const ALL: [Algorithm; 7] = [
        Algorithm::Salsa20,
        Algorithm::Rabbit,
        Algorithm::Hc128,
        Algorithm::Sosemanuk,
        Algorithm::Grain,
        Algorithm::Mickey,
        Algorithm::Trivium,
    ];

    /// Human readable cipher name.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Salsa20 => "Salsa20",
            Algorithm::Rabbit => "Rabbit",
            Algorithm::Hc128 => "HC-128",
            Algorithm::Sosemanuk => "Sosemanuk",
            Algorithm::Grain => "Grain-128",
            Algorithm::Mickey => "Mickey 2.0",
            Algorithm::Trivium => "Trivium",
        }
    }

    /// Largest accepted key length in bytes. Any length from one byte
    /// up to this bound is valid.
    pub fn key_max_len(self) -> usize {
        match self {
            Algorithm::Salsa20 | Algorithm::Sosemanuk => 32,
            Algorithm::Rabbit | Algorithm::Hc128 | Algorithm::Grain => 16,
            Algorithm::Mickey | Algorithm::Trivium => 10,
        }
    }

    /// Largest accepted IV length in bytes. Any length from one byte
    /// up to this bound is valid.
    pub fn iv_max_len(self) -> usize {
        match self {
            Algorithm::Salsa20 | Algorithm::Rabbit => 8,
            Algorithm::Hc128 | Algorithm::Sosemanuk => 16,
            Algorithm::Grain => 12,
            Algorithm::Mickey | Algorithm::Trivium => 10,
        }
    }

    /// Keystream sample length of the test vector dump in bytes.
    fn dump_len(self) -> usize {
        match self {
            Algorithm::Salsa20 | Algorithm::Hc128 => 64,
            Algorithm::Sosemanuk => 80,
            Algorithm::Trivium => 40,
            Algorithm::Rabbit | Algorithm::Grain | Algorithm::Mickey => 16,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Algorithm {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        Ok(match value {
            0 => Algorithm::Salsa20,
            1 => Algorithm::Rabbit,
            2 => Algorithm::Hc128,
            3 => Algorithm::Sosemanuk,
            4 => Algorithm::Grain,
            5 => Algorithm::Mickey,
            6 => Algorithm::Trivium,
            _ => return Err(Error::UnknownAlgorithm(value)),
        })
    }
}

/// Combines a byte stream with the keystream of a block oriented core.
///
/// Keystream blocks are produced on demand and the tail of a partially
/// consumed block is kept for the next call, so arbitrary chunking of
/// the data does not change the result.
#[derive(Debug)]
struct Combiner<C: StreamCipherCore> {
    core: C,
    buffer: Block<C>,
    pos: usize,
}

impl<C: StreamCipherCore> Combiner<C> {
    fn new(core: C) -> Self {
        Self {
            core,
            buffer: Block::<C>::default(),
            pos: 0,
        }
    }

    fn apply(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            if self.pos == 0 {
                self.core.write_keystream_block(&mut self.buffer);
            }
            *byte ^= self.buffer[self.pos];
            self.pos = (self.pos + 1) % self.buffer.len();
        }
    }
}

#[derive(Debug)]
enum CipherState {
    Salsa20(Combiner<Salsa20Core>),
    Rabbit(Combiner<RabbitCore>),
    Hc128(Combiner<Hc128Core>),
    Sosemanuk(Combiner<SosemanukCore>),
    Grain(Combiner<GrainCore>),
    Mickey(Combiner<MickeyCore>),
    Trivium(Combiner<TriviumCore>),
}

impl CipherState {
    fn build(algorithm: Algorithm, key: &[u8], iv: &[u8]) -> Result<Self, Error> {
        if key.is_empty() || key.len() > algorithm.key_max_len() {
            return Err(Error::InvalidKeyLength);
        }
        if iv.is_empty() || iv.len() > algorithm.iv_max_len() {
            return Err(Error::InvalidIvLength);
        }
        // lengths were checked above, so the constructors cannot fail
        Ok(match algorithm {
            Algorithm::Salsa20 => {
                let core = Salsa20Core::new_var(key, iv).map_err(|_| Error::InvalidKeyLength)?;
                CipherState::Salsa20(Combiner::new(core))
            }
            Algorithm::Rabbit => {
                let core = RabbitCore::new_var(key, iv).map_err(|_| Error::InvalidKeyLength)?;
                CipherState::Rabbit(Combiner::new(core))
            }
            Algorithm::Hc128 => {
                let core = Hc128Core::new_var(key, iv).map_err(|_| Error::InvalidKeyLength)?;
                CipherState::Hc128(Combiner::new(core))
            }
            Algorithm::Sosemanuk => {
                let core = SosemanukCore::new_var(key, iv).map_err(|_| Error::InvalidKeyLength)?;
                CipherState::Sosemanuk(Combiner::new(core))
            }
            Algorithm::Grain => {
                let core = GrainCore::new_var(key, iv).map_err(|_| Error::InvalidKeyLength)?;
                CipherState::Grain(Combiner::new(core))
            }
            Algorithm::Mickey => {
                let core = MickeyCore::new_var(key, iv).map_err(|_| Error::InvalidKeyLength)?;
                CipherState::Mickey(Combiner::new(core))
            }
            Algorithm::Trivium => {
                let core = TriviumCore::new_var(key, iv).map_err(|_| Error::InvalidKeyLength)?;
                CipherState::Trivium(Combiner::new(core))
            }
        })
    }

    fn apply(&mut self, data: &mut [u8]) {
        match self {
            CipherState::Salsa20(c) => c.apply(data),
            CipherState::Rabbit(c) => c.apply(data),
            CipherState::Hc128(c) => c.apply(data),
            CipherState::Sosemanuk(c) => c.apply(data),
            CipherState::Grain(c) => c.apply(data),
            CipherState::Mickey(c) => c.apply(data),
            CipherState::Trivium(c) => c.apply(data),
        }
    }
}

/// A keyed stream cipher context.
///
/// Created with [`Estream::new`]; [`Estream::crypt`] combines data with
/// the keystream in place. Encryption and decryption are the same
/// operation.
#[derive(Debug)]
pub struct Estream {
    algorithm: Algorithm,
    key: [u8; KEY_BUF_LEN],
    key_len: usize,
    iv: [u8; IV_BUF_LEN],
    iv_len: usize,
    cipher: CipherState,
}

impl Estream {
    /// Creates a context for `algorithm` keyed with `key` and `iv`.
    ///
    /// Both lengths are validated against the cipher's bounds before
    /// any state is touched.
    pub fn new(algorithm: Algorithm, key: &[u8], iv: &[u8]) -> Result<Self, Error> {
        let cipher = CipherState::build(algorithm, key, iv)?;

        let mut ctx = Self {
            algorithm,
            key: [0; KEY_BUF_LEN],
            key_len: key.len(),
            iv: [0; IV_BUF_LEN],
            iv_len: iv.len(),
            cipher,
        };
        ctx.key[..key.len()].copy_from_slice(key);
        ctx.iv[..iv.len()].copy_from_slice(iv);
        Ok(ctx)
    }

    /// Rekeys the context and restarts the keystream from the beginning.
    ///
    /// On error the context is left exactly as it was: the new state is
    /// built in full before the old one is replaced.
    pub fn set_key_and_iv(&mut self, key: &[u8], iv: &[u8]) -> Result<(), Error> {
        let cipher = CipherState::build(self.algorithm, key, iv)?;

        self.cipher = cipher;
        self.key = [0; KEY_BUF_LEN];
        self.key[..key.len()].copy_from_slice(key);
        self.key_len = key.len();
        self.iv = [0; IV_BUF_LEN];
        self.iv[..iv.len()].copy_from_slice(iv);
        self.iv_len = iv.len();
        Ok(())
    }

    /// Combines `data` with the keystream in place, continuing from the
    /// current stream position.
    pub fn crypt(&mut self, data: &mut [u8]) {
        self.cipher.apply(data);
    }

    /// The selected cipher.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The installed key.
    pub fn key(&self) -> &[u8] {
        &self.key[..self.key_len]
    }

    /// The installed IV.
    pub fn iv(&self) -> &[u8] {
        &self.iv[..self.iv_len]
    }

    /// Produces a printable key, IV and keystream sample for the current
    /// keying material.
    ///
    /// The sample is taken from a fresh keystream; the position of this
    /// context is not disturbed. Key and IV are shown zero-extended to
    /// the cipher's full width.
    pub fn test_vectors(&self) -> TestVectors {
        let mut keystream = [0u8; DUMP_BUF_LEN];
        let len = self.algorithm.dump_len();
        // applying a fresh keystream to zeros leaves the raw keystream
        if let Ok(mut fresh) = CipherState::build(self.algorithm, self.key(), self.iv()) {
            fresh.apply(&mut keystream[..len]);
        }

        let mut key = [0u8; KEY_BUF_LEN];
        key[..self.key_len].copy_from_slice(self.key());
        let mut iv = [0u8; IV_BUF_LEN];
        iv[..self.iv_len].copy_from_slice(self.iv());

        TestVectors {
            algorithm: self.algorithm,
            key,
            iv,
            keystream,
        }
    }
}

/// Printable test vector dump of a cipher context.
///
/// The [`Display`](fmt::Display) output holds one line per item:
///
/// ```text
/// Test vectors for the Rabbit:
/// Key:       ...
/// IV:        ...
/// Keystream: ...
/// ```
pub struct TestVectors {
    algorithm: Algorithm,
    key: [u8; KEY_BUF_LEN],
    iv: [u8; IV_BUF_LEN],
    keystream: [u8; DUMP_BUF_LEN],
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for b in bytes {
        write!(f, "{:02x} ", b)?;
    }
    writeln!(f)
}

impl fmt::Display for TestVectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Test vectors for the {}:", self.algorithm)?;
        f.write_str("Key:       ")?;
        write_hex(f, &self.key[..self.algorithm.key_max_len()])?;
        f.write_str("IV:        ")?;
        write_hex(f, &self.iv[..self.algorithm.iv_max_len()])?;
        f.write_str("Keystream: ")?;
        write_hex(f, &self.keystream[..self.algorithm.dump_len()])
    }
}
