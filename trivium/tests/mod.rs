use cipher::{KeyIvInit, StreamCipher, StreamCipherCore};
use hex_literal::hex;
use trivium::{Trivium, TriviumCore};

#[test]
fn test_trivium_zero_key_iv() {
    let key = [0u8; 10];
    let iv = [0u8; 10];
    let expected = hex!(
        "64fd07dfd8a09a1a72745e8afe93f9c4"
        "68c04c6ab4f3e098f09e15e7b3974d85"
        "c0494aef1ced1640ae5832d4599a4559"
        "1992aa149a012e76325801c04f2ba5ad"
    );

    for n in 1..expected.len() {
        let mut cipher = Trivium::new(&key.into(), &iv.into());
        let mut d = expected;
        for chunk in d.chunks_mut(n) {
            cipher.apply_keystream(chunk);
        }
        assert!(d.iter().all(|&v| v == 0));
    }
}

#[test]
fn test_trivium_key_iv() {
    let tests = [
        (
            hex!("00112233445566778899"),
            hex!("0123456789ABCDEF0123"),
            hex!(
                "e1b5bbaaec186bca4f2a875bd46711f7"
                "99cd64a50b97eb4345c97fe2bed7c070"
            ),
        ),
        (
            hex!("10101010101010101010"),
            hex!("0f0f0f0f0f0f0f0f0f0f"),
            hex!(
                "d542e9446e5f31a58d44d3b2db5f3908"
                "18a63bd3a10d95adb5fbd4ac551d76ee"
            ),
        ),
    ];
    for (key, iv, ks) in tests.iter() {
        let mut cipher = Trivium::new(key.into(), iv.into());
        let mut buf = [0u8; 32];
        cipher.apply_keystream(&mut buf);
        assert_eq!(buf, *ks);
    }
}

#[test]
fn test_trivium_var_lengths() {
    let key = hex!("001122");
    let iv = hex!("0123");
    let expected = hex!("956113b064bc518aae281963625e8789");

    let mut core = TriviumCore::new_var(&key, &iv).unwrap();
    let mut out = [0u8; 16];
    for chunk in out.chunks_exact_mut(4) {
        let mut block = Default::default();
        core.write_keystream_block(&mut block);
        chunk.copy_from_slice(&block);
    }
    assert_eq!(out, expected);
}

#[test]
fn test_trivium_length_bounds() {
    assert!(TriviumCore::new_var(&[0; 1], &[0; 1]).is_ok());
    assert!(TriviumCore::new_var(&[0; 10], &[0; 10]).is_ok());
    assert!(TriviumCore::new_var(&[], &[0; 10]).is_err());
    assert!(TriviumCore::new_var(&[0; 11], &[0; 10]).is_err());
    assert!(TriviumCore::new_var(&[0; 10], &[]).is_err());
    assert!(TriviumCore::new_var(&[0; 10], &[0; 11]).is_err());
}
