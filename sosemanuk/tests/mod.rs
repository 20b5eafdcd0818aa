use cipher::{KeyIvInit, StreamCipher, StreamCipherCore};
use hex_literal::hex;
use sosemanuk::{Sosemanuk, SosemanukCore};

#[test]
fn test_sosemanuk_key_iv() {
    let tests = [
        (
            hex!("0000000000000000000000000000000000000000000000000000000000000000"),
            hex!("00000000000000000000000000000000"),
            hex!(
                "494e66132da70c4797448e14af376091"
                "352ac66e108621e9e175551f05625f8b"
                "746ef28310acda67c0cc0121a2196dd4"
                "3544570e73fc80700e9cd307a2cf704f"
                "0a4c2afac966d71629f8a129caf6a3c0"
                "62417085b6e6ff45a31d12b79f9d12ad"
                "6ba0a9df8ff861c227447f749e27c146"
                "2d529cf694a35d6ac5218ad348d68a3c"
                "864380030efbea34c11efa3d13334b56"
                "b07f47b440d5b1f743064a0a15eb00f6"
            ),
        ),
        (
            hex!("00112233445566778899AABBCCDDEEFF00112233445566778899AABBCCDDEEFF"),
            hex!("0123456789ABCDEF0123456789ABCDEF"),
            hex!(
                "acc648527e68fbc9493d3ba9c4aa0c38"
                "bbfcf4b6b5a42f85606ed5a0bd89178d"
                "09da96c0e5a19412d29ac41cce01eba3"
                "10da5d8d70d33b73be076a50392e379b"
                "f0ad436a66f8b5ffcb4e605dd3fcfee0"
                "2d8a4873b262eada27da7d131d11b7df"
                "116ecad6f2919e0a07948db3b78645e1"
                "b9e496c25de6e8227aa3f1690f9f679a"
                "b4fdd9b1327ec9876649359753dabb39"
                "25528c6672e255cbf8aabf4b9ea11abc"
            ),
        ),
    ];
    for (key, iv, ks) in tests.iter() {
        for n in 1..ks.len() {
            let mut cipher = Sosemanuk::new(key.into(), iv.into());
            let mut d = *ks;
            for chunk in d.chunks_mut(n) {
                cipher.apply_keystream(chunk);
            }
            assert!(d.iter().all(|&v| v == 0));
        }
    }
}

// A short key is zero-extended to 32 bytes before the key schedule, a
// short IV to 16 bytes before the IV injection.
#[test]
fn test_sosemanuk_var_lengths() {
    let key = hex!("00112233445566778899aabbcc");
    let iv = hex!("0123456789abcdef01");
    let expected = hex!(
        "b380948d361d6b632a661bdc8a902544"
        "0a23e63f24c560d2a5512aa9ec917ca2"
        "87ba06d64cd281592a6d94e476394f96"
        "8b2bfb1d1809ed6c0033b99817be1a89"
    );

    let mut core = SosemanukCore::new_var(&key, &iv).unwrap();
    let mut block = Default::default();
    core.write_keystream_block(&mut block);
    assert_eq!(block[..], expected[..]);

    // explicit zero padding has to produce the same keystream
    let mut padded_key = [0u8; 32];
    padded_key[..key.len()].copy_from_slice(&key);
    let mut padded_iv = [0u8; 16];
    padded_iv[..iv.len()].copy_from_slice(&iv);
    let mut core = SosemanukCore::new_var(&padded_key, &padded_iv).unwrap();
    let mut block2 = Default::default();
    core.write_keystream_block(&mut block2);
    assert_eq!(block, block2);
}

// Splits straddling the 80-byte block boundary must not change the
// keystream.
#[test]
fn test_sosemanuk_irregular_chunks() {
    let key = hex!("00112233445566778899AABBCCDDEEFF00112233445566778899AABBCCDDEEFF");
    let iv = hex!("0123456789ABCDEF0123456789ABCDEF");

    let mut one_shot = Sosemanuk::new(&key.into(), &iv.into());
    let mut expected = [0u8; 200];
    one_shot.apply_keystream(&mut expected);

    let mut cipher = Sosemanuk::new(&key.into(), &iv.into());
    let mut buf = [0u8; 200];
    let mut rest = &mut buf[..];
    for len in [1usize, 79, 80, 3, 37] {
        let (head, tail) = rest.split_at_mut(len);
        cipher.apply_keystream(head);
        rest = tail;
    }
    cipher.apply_keystream(rest);
    assert_eq!(buf, expected);
}

#[test]
fn test_sosemanuk_length_bounds() {
    assert!(SosemanukCore::new_var(&[0; 1], &[0; 1]).is_ok());
    assert!(SosemanukCore::new_var(&[0; 32], &[0; 16]).is_ok());
    assert!(SosemanukCore::new_var(&[], &[0; 16]).is_err());
    assert!(SosemanukCore::new_var(&[0; 33], &[0; 16]).is_err());
    assert!(SosemanukCore::new_var(&[0; 32], &[]).is_err());
    assert!(SosemanukCore::new_var(&[0; 32], &[0; 17]).is_err());
}
