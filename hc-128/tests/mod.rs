use cipher::{KeyIvInit, StreamCipher, StreamCipherCore};
use hc_128::{Hc128, Hc128Core};
use hex_literal::hex;

// First two vectors from the HC-128 specification (all-zero key with
// all-zero and word-one IVs).
#[test]
fn test_hc128_reference_vectors() {
    let key = &hex!("00000000000000000000000000000000");
    let tests = [
        (
            hex!("00000000000000000000000000000000"),
            hex!(
                "82001573a003fd3b7fd72ffb0eaf63aa"
                "c62f12deb629dca72785a66268ec758b"
                "1edb36900560898178e0ad009abf1f49"
                "1330dc1c246e3d6cb264f6900271d59c"
            ),
        ),
        (
            hex!("01000000000000000000000000000000"),
            hex!(
                "d59318c058e9dbb798ec658f04661764"
                "2467fc36ec6e2cc8a7381c1b952ab4c9"
                "23f13e328b906a0a687b75cebbf7149f"
                "11e0cde43f17b5ae948c6089ca46cfb5"
            ),
        ),
    ];
    for (iv, ks) in tests.iter() {
        for n in 1..ks.len() {
            let mut cipher = Hc128::new_from_slices(key, iv).unwrap();
            let mut d = *ks;
            for chunk in d.chunks_mut(n) {
                cipher.apply_keystream(chunk);
            }
            assert!(d.iter().all(|&v| v == 0));
        }
    }
}

#[test]
fn test_hc128_full_key_iv() {
    let key = hex!("00112233445566778899AABBCCDDEEFF");
    let iv = hex!("0123456789ABCDEF0123456789ABCDEF");
    let expected = hex!(
        "b8fc5dbbfa941927b8b7d2ba09e17503"
        "148670df7d60814f8bb4b4f4a9f9c1f7"
        "0b28344fbce900cdbc4bfe4f704fb073"
        "e8f00b5ae39b3edd1702ccbb98590ea9"
    );

    let mut cipher = Hc128::new(&key.into(), &iv.into());
    let mut buf = [0u8; 64];
    cipher.apply_keystream(&mut buf);
    assert_eq!(buf, expected);
}

#[test]
fn test_hc128_var_lengths() {
    let key = hex!("00112233445566");
    let iv = hex!("01234567");
    let expected = hex!(
        "a70f83f9707e0363d6f507bbc3e4c279"
        "852ad3ed5e7da386b9157d5741bee161"
        "b38e8fd806ed7f5ecd8f88980408d434"
        "363277a74398705d71b5f44cb761588c"
    );

    let mut core = Hc128Core::new_var(&key, &iv).unwrap();
    let mut block = Default::default();
    core.write_keystream_block(&mut block);
    assert_eq!(block[..], expected[..]);
}

#[test]
fn test_hc128_length_bounds() {
    assert!(Hc128Core::new_var(&[0; 1], &[0; 1]).is_ok());
    assert!(Hc128Core::new_var(&[0; 16], &[0; 16]).is_ok());
    assert!(Hc128Core::new_var(&[], &[0; 16]).is_err());
    assert!(Hc128Core::new_var(&[0; 17], &[0; 16]).is_err());
    assert!(Hc128Core::new_var(&[0; 16], &[]).is_err());
    assert!(Hc128Core::new_var(&[0; 16], &[0; 17]).is_err());
}
