use gnsp_crypto::sign::eddsa::Ed25519KeyPair;

use super::*;

/// Builds a fully signed route with `n` completed entries plus the
/// out-of-line newest hop, ending at the returned local peer.
fn build_chain(n: usize) -> (Path, Vec<Ed25519KeyPair>, Ed25519KeyPair) {
    let local_key = Ed25519KeyPair::generate();
    let keys: Vec<Ed25519KeyPair> = (0..=n).map(|_| Ed25519KeyPair::generate()).collect();

    let mut path = Path::new(HashCode::digest(b"block under test"), AbsoluteTime::NEVER);
    for (i, key) in keys.iter().enumerate() {
        let predecessor = if i == 0 {
            PeerId::ZERO
        } else {
            keys[i - 1].peer_id()
        };
        let successor = keys
            .get(i + 1)
            .map(|k| k.peer_id())
            .unwrap_or(local_key.peer_id());
        let mut element = PathElement::new(&path, predecessor, key.peer_id(), successor);
        element.sign(key);
        path.add(&element).unwrap();
    }
    assert_eq!(path.entries().len(), n);
    (path, keys, local_key)
}

fn bogus_signature() -> PeerSignature {
    PeerSignature::from_bytes([0x5a; 64])
}

#[test]
fn test_signed_data_layout() {
    let expiration = AbsoluteTime::from_micros(0x0102_0304_0506_0708);
    let hash = HashCode::digest(b"x");
    let pred = PeerId::from_bytes([1; 32]);
    let succ = PeerId::from_bytes([2; 32]);

    let data = signed_data(expiration, &hash, &pred, &succ);
    assert_eq!(data.len(), SIGNED_DATA_SIZE);
    // size field covers expiration + hash + predecessor + successor.
    assert_eq!(data[0..2], [0x00, 0x88]);
    // purpose tag.
    assert_eq!(data[2..4], [0x00, 28]);
    assert_eq!(data[4..12], expiration.to_be_bytes());
    assert_eq!(data[12..76], hash.as_bytes()[..]);
    assert_eq!(data[76..108], [1u8; 32]);
    assert_eq!(data[108..140], [2u8; 32]);
}

#[test]
fn test_first_add_populates_only_the_last_pair() {
    let key = Ed25519KeyPair::generate();
    let next = Ed25519KeyPair::generate().peer_id();
    let mut path = Path::new(HashCode::digest(b"b"), AbsoluteTime::NEVER);

    let mut element = PathElement::new(&path, PeerId::ZERO, key.peer_id(), next);
    element.sign(&key);
    path.add(&element).unwrap();

    assert!(path.entries().is_empty());
    assert_eq!(path.last_hop(), Some(key.peer_id()));
    assert!(path.last_sig().is_some());
    assert!(path.flags().contains(PathFlags::RECORD_ROUTE));
}

#[test]
fn test_add_without_signature_fails() {
    let mut path = Path::new(HashCode::digest(b"b"), AbsoluteTime::NEVER);
    let element = PathElement::new(
        &path,
        PeerId::ZERO,
        PeerId::from_bytes([1; 32]),
        PeerId::from_bytes([2; 32]),
    );
    assert_eq!(path.add(&element), Err(PathError::NoSignature));
}

#[test]
fn test_verify_accepts_intact_path() {
    let (mut path, _, local) = build_chain(6);
    let before = path.clone();
    path.verify(&local.peer_id());
    assert_eq!(path, before);
    assert!(!path.flags().contains(PathFlags::TRUNCATED));
}

#[test]
fn test_verify_of_empty_path_is_a_noop() {
    let mut path = Path::new(HashCode::digest(b"b"), AbsoluteTime::NEVER);
    let before = path.clone();
    path.verify(&PeerId::from_bytes([9; 32]));
    assert_eq!(path, before);
}

#[test]
fn test_verify_truncates_at_bad_signature() {
    // Ten completed entries; corrupt the fourth. Verification must keep the
    // five newest entries, record entry 4's signer as the unverified
    // origin, and set the truncation flag.
    let (mut path, _, local) = build_chain(10);
    let original = path.entries().to_vec();

    path.entries[3].signature = bogus_signature();
    path.verify(&local.peer_id());

    assert!(path.flags().contains(PathFlags::TRUNCATED));
    assert!(path.flags().contains(PathFlags::RECORD_ROUTE));
    assert_eq!(path.trunc_origin(), Some(original[4].signer));
    assert_eq!(path.entries(), &original[5..]);
    assert_eq!(path.entries().len(), 5);

    // A second verification changes nothing.
    let after_first = path.clone();
    path.verify(&local.peer_id());
    assert_eq!(path, after_first);
}

#[test]
fn test_verify_resets_when_newest_hop_fails() {
    let (mut path, _, local) = build_chain(4);
    path.last_sig = Some(bogus_signature());
    path.verify(&local.peer_id());

    assert!(path.entries().is_empty());
    assert_eq!(path.last_sig(), None);
    assert_eq!(path.last_hop(), None);
    assert_eq!(path.trunc_origin(), None);
    assert!(path.flags().is_empty());

    let after_first = path.clone();
    path.verify(&local.peer_id());
    assert_eq!(path, after_first);
}

#[test]
fn test_verify_wrong_local_peer_resets() {
    // The newest signature binds the successor; verifying from a different
    // local peer must reset the route.
    let (mut path, _, _) = build_chain(3);
    path.verify(&PeerId::from_bytes([0x77; 32]));
    assert!(path.entries().is_empty());
    assert!(path.flags().is_empty());
}

#[test]
fn test_verify_truncates_at_oldest_entry() {
    let (mut path, _, local) = build_chain(3);
    let original = path.entries().to_vec();

    path.entries[0].signature = bogus_signature();
    path.verify(&local.peer_id());

    assert!(path.flags().contains(PathFlags::TRUNCATED));
    assert_eq!(path.trunc_origin(), Some(original[1].signer));
    assert_eq!(path.entries(), &original[2..]);

    let after_first = path.clone();
    path.verify(&local.peer_id());
    assert_eq!(path, after_first);
}

#[test]
fn test_verify_truncates_at_newest_entry() {
    // Corrupting the newest completed entry leaves only the out-of-line
    // hop, anchored at the dropped entry's signer.
    let (mut path, _, local) = build_chain(4);
    let original = path.entries().to_vec();

    path.entries[3].signature = bogus_signature();
    path.verify(&local.peer_id());

    assert!(path.flags().contains(PathFlags::TRUNCATED));
    assert!(path.entries().is_empty());
    assert_eq!(path.trunc_origin(), Some(original[3].signer));
    assert!(path.last_sig().is_some());

    let after_first = path.clone();
    path.verify(&local.peer_id());
    assert_eq!(path, after_first);
}

#[test]
fn test_truncated_path_keeps_verifying_through_origin() {
    // After truncation the origin substitutes for the dropped predecessor;
    // growing the path from here must still verify.
    let (mut path, keys, local) = build_chain(5);
    path.entries[1].signature = bogus_signature();
    path.verify(&local.peer_id());
    assert_eq!(path.entries().len(), 2);

    // The local peer forwards onward, adding its own hop.
    let next = Ed25519KeyPair::generate().peer_id();
    let mut element = PathElement::new(&path, keys[5].peer_id(), local.peer_id(), next);
    element.sign(&local);
    path.add(&element).unwrap();

    let mut received = path.clone();
    received.verify(&next);
    assert_eq!(received, path);
}

#[test]
fn test_wire_roundtrip_plain() {
    let (path, _, _) = build_chain(3);
    let wire = path.to_bytes();
    // flags + hash + expiration + counts + 3 entries + last pair.
    assert_eq!(wire.len(), 2 + 64 + 8 + 2 + 2 + 3 * 96 + 96);
    assert_eq!(Path::from_bytes(&wire).unwrap(), path);
}

#[test]
fn test_wire_roundtrip_truncated() {
    let (mut path, _, local) = build_chain(6);
    path.entries[2].signature = bogus_signature();
    path.set_split_pos(2);
    path.verify(&local.peer_id());
    assert!(path.flags().contains(PathFlags::TRUNCATED));

    let wire = path.to_bytes();
    let restored = Path::from_bytes(&wire).unwrap();
    assert_eq!(restored, path);

    // The restored path still verifies without further changes.
    let mut reverified = restored.clone();
    reverified.verify(&local.peer_id());
    assert_eq!(reverified, path);
}

#[test]
fn test_wire_short_image_is_rejected() {
    let (path, _, _) = build_chain(2);
    let wire = path.to_bytes();
    let err = Path::from_bytes(&wire[..wire.len() - 1]).unwrap_err();
    assert!(matches!(err, PathError::ShortWireImage { .. }));
    assert!(Path::from_bytes(&[]).is_err());
}

#[test]
fn test_wire_image_from_foreign_peer_verifies() {
    // Serialize on one peer, parse and verify on another.
    let (path, _, local) = build_chain(4);
    let mut received = Path::from_bytes(&path.to_bytes()).unwrap();
    received.verify(&local.peer_id());
    assert_eq!(received, path);
}
