use hex_literal::hex;

use super::*;

#[test]
fn test_keypair_sign_verify() {
    let keypair = Ed25519KeyPair::generate();
    let message = b"Test message";

    let signature = keypair.sign(message);
    assert!(verify(&keypair.public_bytes(), message, &signature));
}

#[test]
fn test_seed_roundtrip_is_deterministic() {
    let keypair = Ed25519KeyPair::generate();
    let reloaded = Ed25519KeyPair::from_seed(&keypair.seed());

    assert_eq!(keypair.public_bytes(), reloaded.public_bytes());
    // EdDSA is deterministic: same key, same message, same signature.
    assert_eq!(keypair.sign(b"persist"), reloaded.sign(b"persist"));
}

#[test]
fn test_rfc8032_public_key_vector() {
    // RFC 8032 test 1: seed -> public key.
    let keypair = Ed25519KeyPair::from_seed(&hex!(
        "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60"
    ));
    assert_eq!(
        keypair.public_bytes(),
        hex!("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a")
    );
}

#[test]
fn test_rfc8032_signature_vector() {
    // RFC 8032 test 2: one-byte message.
    let keypair = Ed25519KeyPair::from_seed(&hex!(
        "4ccd089b28ff96da9db6c346ec114e0f5b8a319f35aba624da8cf6ed4fb8a6fb"
    ));
    let signature = keypair.sign(&hex!("72"));
    assert_eq!(
        signature,
        hex!(
            "92a009a9f0d4cab8720e820b5f642540a2b27b5416503f8fb3762223ebdb69da"
            "085ac1e43e15996e458f3613d0f11d8c387b2eaeb4302aeeb00d291612bb0c00"
        )
    );
}

#[test]
fn test_wrong_signer_fails() {
    let keypair1 = Ed25519KeyPair::generate();
    let keypair2 = Ed25519KeyPair::generate();

    let signature = keypair1.sign(b"Test message");
    assert!(!verify(&keypair2.public_bytes(), b"Test message", &signature));
}

#[test]
fn test_tampered_message_fails() {
    let keypair = Ed25519KeyPair::generate();
    let signature = keypair.sign(b"Original message");

    assert!(verify(&keypair.public_bytes(), b"Original message", &signature));
    assert!(!verify(&keypair.public_bytes(), b"Tampered message", &signature));
}

#[test]
fn test_invalid_public_key_verifies_false() {
    let keypair = Ed25519KeyPair::generate();
    let signature = keypair.sign(b"msg");
    // Not a valid compressed point.
    let bogus = [0xffu8; 32];
    assert!(!verify(&bogus, b"msg", &signature));
}

#[test]
fn test_expanded_path_matches_seed_path() {
    // Signing with the expanded (scalar, prefix) pair of a seed key must
    // agree with the standard seed path byte-for-byte.
    let keypair = Ed25519KeyPair::generate();
    let (scalar_bytes, prefix) = expand_seed(&keypair.seed());
    let scalar = curve25519_dalek::scalar::Scalar::from_bytes_mod_order(scalar_bytes);

    let expanded_sig = sign_expanded(scalar, prefix, b"both paths").unwrap();
    assert_eq!(expanded_sig, keypair.sign(b"both paths"));
}
