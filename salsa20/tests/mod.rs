//! Salsa20 tests

use cipher::{KeyIvInit, StreamCipher};
use hex_literal::hex;
use salsa20::{Salsa20, Salsa20Core};

const KEY_BYTES: usize = 32;

const IV_BYTES: usize = 8;

const KEY0: [u8; KEY_BYTES] = [0; KEY_BYTES];

const KEY1: [u8; KEY_BYTES] = hex!(
    "80000000000000000000000000000000"
    "00000000000000000000000000000000"
);

const KEY_LONG: [u8; KEY_BYTES] = hex!(
    "0102030405060708090A0B0C0D0E0F10"
    "1112131415161718191A1B1C1D1E1F20"
);

const IV0: [u8; IV_BYTES] = [0; IV_BYTES];

const IV1: [u8; IV_BYTES] = hex!("8000000000000000");

const IVHI: [u8; IV_BYTES] = hex!("0000000000000001");

const IV_LONG: [u8; IV_BYTES] = hex!("0301040105090206");

const EXPECTED_KEY1_IV0: [u8; 64] = hex!(
    "e3be8fdd8beca2e3ea8ef9475b29a6e7"
    "003951e1097a5c38d23b7a5fad9f6844"
    "b22c97559e2723c7cbbd3fe4fc8d9a07"
    "44652a83e72a9c461876af4d7ef1a117"
);

const EXPECTED_KEY0_IV1: [u8; 64] = hex!(
    "2aba3dc45b4947007b14c851cd694456"
    "b303ad59a465662803006705673d6c3e"
    "29f1d3510dfc0405463c03414e0e07e3"
    "59f1f1816c68b2434a19d3eee0464873"
);

const EXPECTED_KEY0_IVHI: [u8; 64] = hex!(
    "b47f96aa96786135297a3c4ec56a613d"
    "0b80095324ff43239d684c57ffe42e1c"
    "44f3cc011613db6cdc880999a1e65aed"
    "1287fcb11c839c37120765afa73e5075"
);

const EXPECTED_LONG: [u8; 256] = hex!(
    "6ebcbdbf76fccc64ab05542bee8a67cb"
    "c28fa2e141fbefbb3a2f9b221909c8d7"
    "d4295258cb539770dd24d7ac3443769f"
    "fa27a50e60644264dc8b6b612683372e"
    "085d0a12bf240b189ce2b78289862b56"
    "fdc9fcffc33bef9325a2e81b98fb3fb9"
    "aa04cf434615ceffeb985c1cb08d8440"
    "e90b1d56ddeaea16d9e15affff1f698c"
    "483c7a466af1fe062574adfd2b06a62b"
    "4d98440719ea776385c470349a7ed696"
    "9583463ed5d26b8fefccb205da0f5bfa"
    "98c77812fe756b09eacc282aa42f4baf"
    "a79633189046e2b20f35b3e0e54aa3b9"
    "29e23c0f47dc7bcd4f928b2a9764be7d"
    "4b8a50f980a50b35ad8087375e0c556e"
    "cbe6a7161e8653ce9391e1e6710ed4f1"
);

// 16-byte key selecting the "expand 16-byte k" constants.
const KEY_TAU: [u8; 16] = hex!("00112233445566778899AABBCCDDEEFF");

const IV_TAU: [u8; IV_BYTES] = hex!("0123456789ABCDEF");

const EXPECTED_TAU: [u8; 64] = hex!(
    "4ba926310dbb2aed07061e5848658251"
    "9575e39bdbf22d370284d510cfdfd6a7"
    "75fc5f8d1ef20cc0e3aadde31c2d196e"
    "935218f561ea721127a711f60eb215bf"
);

#[test]
fn salsa20_key1_iv0() {
    let mut cipher = Salsa20::new(&KEY1.into(), &IV0.into());
    let mut buf = [0; 64];

    cipher.apply_keystream(&mut buf);

    assert_eq!(buf, EXPECTED_KEY1_IV0);
}

#[test]
fn salsa20_key0_iv1() {
    let mut cipher = Salsa20::new(&KEY0.into(), &IV1.into());
    let mut buf = [0; 64];

    cipher.apply_keystream(&mut buf);

    assert_eq!(buf, EXPECTED_KEY0_IV1);
}

#[test]
fn salsa20_key0_ivhi() {
    let mut cipher = Salsa20::new(&KEY0.into(), &IVHI.into());
    let mut buf = [0; 64];

    cipher.apply_keystream(&mut buf);

    assert_eq!(buf, EXPECTED_KEY0_IVHI);
}

#[test]
fn salsa20_long() {
    let mut cipher = Salsa20::new(&KEY_LONG.into(), &IV_LONG.into());
    let mut buf = [0; 256];

    cipher.apply_keystream(&mut buf);

    for i in 0..256 {
        assert_eq!(buf[i], EXPECTED_LONG[i])
    }
}

// Counter carry and chunked processing agree with the one-shot stream.
#[test]
fn salsa20_chunked() {
    for n in 1..EXPECTED_LONG.len() {
        let mut cipher = Salsa20::new(&KEY_LONG.into(), &IV_LONG.into());
        let mut buf = EXPECTED_LONG;
        for chunk in buf.chunks_mut(n) {
            cipher.apply_keystream(chunk);
        }
        assert!(buf.iter().all(|&v| v == 0));
    }
}

#[test]
fn salsa20_short_key_tau() {
    let mut core = Salsa20Core::new_var(&KEY_TAU, &IV_TAU).unwrap();
    let mut block = Default::default();
    use cipher::StreamCipherCore;
    core.write_keystream_block(&mut block);
    assert_eq!(block[..], EXPECTED_TAU[..]);
}

#[test]
fn salsa20_length_bounds() {
    assert!(Salsa20Core::new_var(&[0; 1], &[0; 1]).is_ok());
    assert!(Salsa20Core::new_var(&[0; 32], &[0; 8]).is_ok());
    assert!(Salsa20Core::new_var(&[], &[0; 8]).is_err());
    assert!(Salsa20Core::new_var(&[0; 33], &[0; 8]).is_err());
    assert!(Salsa20Core::new_var(&[0; 32], &[]).is_err());
    assert!(Salsa20Core::new_var(&[0; 32], &[0; 9]).is_err());
}
