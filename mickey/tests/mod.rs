use cipher::{KeyIvInit, StreamCipher, StreamCipherCore};
use hex_literal::hex;
use mickey::{Mickey, MickeyCore};

#[test]
fn test_mickey_key_iv() {
    let tests = [
        (
            hex!("00000000000000000000"),
            hex!("00000000000000000000"),
            hex!(
                "bc5de7db0b931fc99bd5f021fda49657"
                "0590c7e319c2263cdc67e8789ab57524"
            ),
        ),
        (
            hex!("00112233445566778899"),
            hex!("0123456789ABCDEF0123"),
            hex!(
                "7c925c22b6b6484c77d63d4941c834ca"
                "bdb12f501c071ceececfe3901a1efa2c"
            ),
        ),
    ];
    for (key, iv, ks) in tests.iter() {
        for n in 1..ks.len() {
            let mut cipher = Mickey::new(key.into(), iv.into());
            let mut d = *ks;
            for chunk in d.chunks_mut(n) {
                cipher.apply_keystream(chunk);
            }
            assert!(d.iter().all(|&v| v == 0));
        }
    }
}

// A short IV loads fewer IV bits; a short key still loads 80 zero-extended
// key bits.
#[test]
fn test_mickey_var_lengths() {
    let key = hex!("00112233");
    let iv = hex!("0123456789AB");
    let expected = hex!(
        "da543827a362ba039e65f0add8d202f6"
        "6db7b8ca318ceedf93b678d893b3ed61"
    );

    let mut core = MickeyCore::new_var(&key, &iv).unwrap();
    let mut out = [0u8; 32];
    for byte in out.iter_mut() {
        let mut block = Default::default();
        core.write_keystream_block(&mut block);
        *byte = block[0];
    }
    assert_eq!(out, expected);
}

#[test]
fn test_mickey_length_bounds() {
    assert!(MickeyCore::new_var(&[0; 1], &[0; 1]).is_ok());
    assert!(MickeyCore::new_var(&[0; 10], &[0; 10]).is_ok());
    assert!(MickeyCore::new_var(&[], &[0; 10]).is_err());
    assert!(MickeyCore::new_var(&[0; 11], &[0; 10]).is_err());
    assert!(MickeyCore::new_var(&[0; 10], &[]).is_err());
    assert!(MickeyCore::new_var(&[0; 10], &[0; 11]).is_err());
}
