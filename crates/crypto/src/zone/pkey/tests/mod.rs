use hex_literal::hex;

use super::*;
use crate::kdf::derive_h;

const D: [u8; 32] = hex!("7450f71def6411e0ab0e6a1dfd1d9ccd0eaf71952494ccf51b85ffac5db093c8");
const PUB: [u8; 32] = hex!("23d89a29da0f6808c6b6d5e59cdd6a6fcf3e2bb006f466d5423a935d6b4d7e10");

#[test]
fn test_public_derivation_vector() {
    let public = PkeyScheme.public_from_private(&D).unwrap();
    assert_eq!(public, PUB.to_vec());
}

#[test]
fn test_derive_public_vector() {
    let h = derive_h(&PUB, "home", "gns");
    let (derived, h_be) = PkeyScheme.derive_public(&PUB, &h).unwrap();
    assert_eq!(
        h_be,
        hex!("071efca7db2850bd6f354ebfe38c5bbfd6ba2f805cd8d3b54edd7f3dd0730d1a")
    );
    assert_eq!(
        derived,
        hex!("9f27ad25b5954a467bc65a676b7a6d23b2ef300f7fc70058059e7f29e594b5c1").to_vec()
    );
}

#[test]
fn test_private_derivation_commutes_with_public() {
    let h = derive_h(&PUB, "home", "gns");
    let (derived_public, h_pub) = PkeyScheme.derive_public(&PUB, &h).unwrap();
    let (derived_private, h_priv) = PkeyScheme.derive_private(&D, &h).unwrap();
    assert_eq!(h_pub, h_priv);
    assert_eq!(
        PkeyScheme.public_from_private(&derived_private).unwrap(),
        derived_public
    );
}

#[test]
fn test_block_key_vector() {
    // Key and nonce derivation for ("home", 1643714700060589us).
    let expiration = AbsoluteTime::from_micros(1_643_714_700_060_589);
    let material = PkeyScheme.block_key(&PUB, "home", expiration);
    assert_eq!(material.len(), 48);
    assert_eq!(
        material[..32],
        hex!("0cf74d4419e4ac523d14f49b096c52b6b3f506689826a5ea0693fd4d80abf044")
    );
    // IV = nonce(4) || expiration_be(8) || counter(4).
    assert_eq!(material[32..], hex!("0441fcfc0005d6f326cf27ad00000001"));
}

#[test]
fn test_sign_verify_roundtrip() {
    let signature = PkeyScheme.sign(&D, b"zone record data").unwrap();
    assert_eq!(signature.len(), 64);
    assert!(PkeyScheme.verify(&PUB, b"zone record data", &signature).unwrap());
    assert!(!PkeyScheme.verify(&PUB, b"other data", &signature).unwrap());
}

#[test]
fn test_verify_with_derived_key() {
    let h = derive_h(&PUB, "home", "gns");
    let (derived_private, _) = PkeyScheme.derive_private(&D, &h).unwrap();
    let (derived_public, _) = PkeyScheme.derive_public(&PUB, &h).unwrap();

    let signature = PkeyScheme.sign(&derived_private, b"blinded record").unwrap();
    assert!(PkeyScheme
        .verify(&derived_public, b"blinded record", &signature)
        .unwrap());
    // The base key must not verify what the blinded key signed.
    assert!(!PkeyScheme.verify(&PUB, b"blinded record", &signature).unwrap());
}

#[test]
fn test_malformed_signature_is_ok_false() {
    assert!(!PkeyScheme.verify(&PUB, b"data", &[0u8; 64]).unwrap());
    assert!(!PkeyScheme.verify(&PUB, b"data", &[0u8; 63]).unwrap());
    // A public key that is not a curve point also verifies false.
    assert!(!PkeyScheme
        .verify(&[0xffu8; 32], b"data", &[0u8; 64])
        .unwrap());
}

#[test]
fn test_encrypt_decrypt_roundtrip_preserves_length() {
    let expiration = AbsoluteTime::from_micros(1_643_714_700_060_589);
    for len in [0usize, 1, 15, 16, 17, 100] {
        let plaintext: Vec<u8> = (0..len).map(|i| i as u8).collect();
        let ciphertext = PkeyScheme
            .encrypt(&PUB, &plaintext, "home", expiration)
            .unwrap();
        assert_eq!(ciphertext.len(), plaintext.len());
        let decrypted = PkeyScheme
            .decrypt(&PUB, &ciphertext, "home", expiration)
            .unwrap();
        assert_eq!(decrypted, plaintext);
    }
}

#[test]
fn test_cipher_is_scoped_by_label_and_expiration() {
    let expiration = AbsoluteTime::from_micros(1_643_714_700_060_589);
    let ciphertext = PkeyScheme.encrypt(&PUB, b"payload", "home", expiration).unwrap();

    let wrong_label = PkeyScheme.decrypt(&PUB, &ciphertext, "www", expiration).unwrap();
    assert_ne!(wrong_label, b"payload".to_vec());

    let wrong_expiration = PkeyScheme
        .decrypt(&PUB, &ciphertext, "home", AbsoluteTime::NEVER)
        .unwrap();
    assert_ne!(wrong_expiration, b"payload".to_vec());
}

#[test]
fn test_prepare_leaves_random_bytes_untouched() {
    let rnd: Vec<u8> = (0..32).collect();
    assert_eq!(PkeyScheme.prepare(rnd.clone()), rnd);
}
