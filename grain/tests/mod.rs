use cipher::{KeyIvInit, StreamCipher, StreamCipherCore};
use grain::{Grain, GrainCore};
use hex_literal::hex;

// Vectors from the Grain-128 specification.
#[test]
fn test_grain128_reference_vectors() {
    let tests = [
        (
            hex!("00000000000000000000000000000000"),
            hex!("000000000000000000000000"),
            hex!(
                "f09b7bf7d7f6b5c2de2ffc73ac21397f"
                "ea66170f7c41a0b5c41b835f495537ee"
            ),
        ),
        (
            hex!("0123456789abcdef123456789abcdef0"),
            hex!("0123456789abcdef12345678"),
            hex!(
                "afb5babfa8de896b4b9c6acaf7c4fbfd"
                "ff4448f2ab76859c9832d35679c850d8"
            ),
        ),
    ];
    for (key, iv, ks) in tests.iter() {
        for n in 1..ks.len() {
            let mut cipher = Grain::new(key.into(), iv.into());
            let mut d = *ks;
            for chunk in d.chunks_mut(n) {
                cipher.apply_keystream(chunk);
            }
            assert!(d.iter().all(|&v| v == 0));
        }
    }
}

#[test]
fn test_grain128_full_key_iv() {
    let key = hex!("00112233445566778899AABBCCDDEEFF");
    let iv = hex!("0123456789ABCDEF01234567");
    let expected = hex!(
        "8a009ceb989cd375827b3fe4d32ed08d"
        "16dcc97deee3aab193a29eec12e8f4f0"
    );

    let mut cipher = Grain::new(&key.into(), &iv.into());
    let mut buf = [0u8; 32];
    cipher.apply_keystream(&mut buf);
    assert_eq!(buf, expected);
}

// A short key shrinks the register span; the keystream still has to be
// reproducible.
#[test]
fn test_grain_var_lengths() {
    let key = hex!("001122334455667788");
    let iv = hex!("0123456789");
    let expected = hex!(
        "b383a3903b40e9944eb3b5e8729f9551"
        "ca919922bfe09c1f6493caf2c3e3b85b"
    );

    let mut core = GrainCore::new_var(&key, &iv).unwrap();
    let mut out = [0u8; 32];
    for byte in out.iter_mut() {
        let mut block = Default::default();
        core.write_keystream_block(&mut block);
        *byte = block[0];
    }
    assert_eq!(out, expected);
}

#[test]
fn test_grain_length_bounds() {
    assert!(GrainCore::new_var(&[0; 1], &[0; 1]).is_ok());
    assert!(GrainCore::new_var(&[0; 16], &[0; 12]).is_ok());
    assert!(GrainCore::new_var(&[], &[0; 12]).is_err());
    assert!(GrainCore::new_var(&[0; 17], &[0; 12]).is_err());
    assert!(GrainCore::new_var(&[0; 16], &[]).is_err());
    assert!(GrainCore::new_var(&[0; 16], &[0; 13]).is_err());
}
