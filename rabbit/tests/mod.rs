use cipher::{KeyIvInit, StreamCipher, StreamCipherCore};
use hex_literal::hex;
use rabbit::{Rabbit, RabbitCore};

// RFC4503 Appendix A. A.2. Testing with IV Setup (page 7)
#[test]
fn test_rabbit_key_iv() {
    let key = &hex!("00000000000000000000000000000000");
    let tests = [
        (
            hex!("0000000000000000"),
            hex!(
                "EDB70567375DCD7CD89554F85E27A7C6"
                "8D4ADC7032298F7BD4EFF504ACA6295F"
                "668FBF478ADB2BE51E6CDE292B82DE2A"
            ),
        ),
        (
            hex!("597E26C175F573C3"),
            hex!(
                "6D7D012292CCDCE0E2120058B94ECD1F"
                "2E6F93EDFF99247B012521D1104E5FA7"
                "A79B0212D0BD56233938E793C312C1EB"
            ),
        ),
        (
            hex!("2717F4D21A56EBA6"),
            hex!(
                "4D1051A123AFB670BF8D8505C8D85A44"
                "035BC3ACC667AEAE5B2CF44779F2C896"
                "CB5115F034F03D31171CA75F89FCCB9F"
            ),
        ),
    ];
    for (iv, ks) in tests.iter() {
        for n in 1..ks.len() {
            let mut rabbit = Rabbit::new_from_slices(key, iv).unwrap();
            let mut d = *ks;
            for chunk in d.chunks_mut(n) {
                rabbit.apply_keystream(chunk);
            }
            assert!(d.iter().all(|&v| v == 0));
        }
    }
}

// Short key and IV are equivalent to zero-extended full-width ones.
#[test]
fn test_rabbit_var_lengths() {
    let key = hex!("0011223344");
    let iv = hex!("ABCDEF");
    let expected = hex!(
        "3B723C5995D9169FCFEF2416D128DDA8"
        "F830E8F957C11EBDCEF57A2776B41C2F"
        "A58FECB41830E068312A91ECBD1B372B"
    );

    let mut core = RabbitCore::new_var(&key, &iv).unwrap();
    let mut buf = [Default::default(); 3];
    core.write_keystream_blocks(&mut buf);
    let out: Vec<u8> = buf.iter().flatten().copied().collect();
    assert_eq!(out, expected);

    let padded_key = hex!("00112233440000000000000000000000");
    let padded_iv = hex!("ABCDEF0000000000");
    let mut core = RabbitCore::new_var(&padded_key, &padded_iv).unwrap();
    let mut buf2 = [Default::default(); 3];
    core.write_keystream_blocks(&mut buf2);
    assert_eq!(buf, buf2);
}

#[test]
fn test_rabbit_length_bounds() {
    assert!(RabbitCore::new_var(&[0; 1], &[0; 1]).is_ok());
    assert!(RabbitCore::new_var(&[0; 16], &[0; 8]).is_ok());
    assert!(RabbitCore::new_var(&[], &[0; 8]).is_err());
    assert!(RabbitCore::new_var(&[0; 17], &[0; 8]).is_err());
    assert!(RabbitCore::new_var(&[0; 16], &[]).is_err());
    assert!(RabbitCore::new_var(&[0; 16], &[0; 9]).is_err());
}
