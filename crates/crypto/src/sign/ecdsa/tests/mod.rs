use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use rand::RngCore;

use super::*;

fn test_key() -> (Scalar, EdwardsPoint) {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    let d = Scalar::from_bytes_mod_order(bytes);
    (d, EdwardsPoint::mul_base(&d))
}

#[test]
fn test_sign_verify_roundtrip() {
    let (d, public) = test_key();
    let signature = sign(&d, b"records ahead").unwrap();
    assert!(verify(&public, b"records ahead", &signature));
}

#[test]
fn test_signing_is_deterministic() {
    let (d, _) = test_key();
    assert_eq!(sign(&d, b"same").unwrap(), sign(&d, b"same").unwrap());
    assert_ne!(sign(&d, b"same").unwrap(), sign(&d, b"other").unwrap());
}

#[test]
fn test_wrong_key_fails() {
    let (d, _) = test_key();
    let (_, other_public) = test_key();
    let signature = sign(&d, b"msg").unwrap();
    assert!(!verify(&other_public, b"msg", &signature));
}

#[test]
fn test_tampered_message_fails() {
    let (d, public) = test_key();
    let signature = sign(&d, b"msg").unwrap();
    assert!(!verify(&public, b"msG", &signature));
}

#[test]
fn test_malformed_signatures_verify_false() {
    let (d, public) = test_key();
    let signature = sign(&d, b"msg").unwrap();

    // Wrong length.
    assert!(!verify(&public, b"msg", &signature[..63]));
    assert!(!verify(&public, b"msg", &[]));

    // Zero components.
    assert!(!verify(&public, b"msg", &[0u8; 64]));

    // Non-canonical component: 2^256 - 1 is far above the group order.
    let mut huge = signature;
    huge[..32].copy_from_slice(&[0xff; 32]);
    assert!(!verify(&public, b"msg", &huge));
}

#[test]
fn test_component_byte_order_is_big_endian() {
    let two = Scalar::from(2u64);
    let be = scalar_to_be(&two);
    assert_eq!(be[31], 2);
    assert!(be[..31].iter().all(|&b| b == 0));
    assert_eq!(scalar_from_be_canonical(&be).unwrap(), two);
    assert_eq!(scalar_from_be_reduced(&be), two);
}
