use pgo_rpc::hash::{
    hash32, hash64, location_hash, location_hex, location_only_hash, request_hash, HASH_SEED,
    LOCATION_HEX_LEN,
};

#[test]
fn test_seeded_empty_input_digests() {
    assert_eq!(hash32(HASH_SEED, b""), 0x1310_122a);
    assert_eq!(hash64(u64::from(HASH_SEED), b""), 0xeb67_a859_a802_47bb);
}

#[test]
fn test_location_hashes_for_known_fix() {
    let hex = location_hex(37.7749, -122.4194, 5.0);
    assert_eq!(hex.len(), LOCATION_HEX_LEN);

    // Bound to the credentials.
    assert_eq!(location_hash(b"auth-ticket", &hex), 0x7f6c_1769);
    // Location only.
    assert_eq!(location_only_hash(&hex), 0x949f_27cf);
}

#[test]
fn test_location_hash_changes_with_credentials() {
    let hex = location_hex(37.7749, -122.4194, 5.0);
    assert_ne!(location_hash(b"auth-ticket", &hex), location_hash(b"other-ticket", &hex));
    assert_eq!(location_only_hash(&hex), location_only_hash(&hex));
}

#[test]
fn test_location_hash_sees_accuracy() {
    let a = location_hex(37.7749, -122.4194, 5.0);
    let b = location_hex(37.7749, -122.4194, 6.0);
    assert_eq!(a[..16], b[..16]);
    assert_ne!(location_only_hash(&a), location_only_hash(&b));
}

#[test]
fn test_both_location_hashes_track_every_coordinate() {
    let auth = b"auth-ticket";
    let base = location_hex(37.7749, -122.4194, 5.0);
    let moved = [
        location_hex(37.7750, -122.4194, 5.0),
        location_hex(37.7749, -122.4195, 5.0),
        location_hex(37.7749, -122.4194, 5.5),
    ];
    for hex in moved {
        assert_ne!(location_hash(auth, &hex), location_hash(auth, &base));
        assert_ne!(location_only_hash(&hex), location_only_hash(&base));
    }

    // Same coordinates, same auth: same hashes.
    let again = location_hex(37.7749, -122.4194, 5.0);
    assert_eq!(location_hash(auth, &again), location_hash(auth, &base));
    assert_eq!(location_only_hash(&again), location_only_hash(&base));
}

#[test]
fn test_request_hash_known_vector() {
    // Encoded `Request { request_type: 2 }`.
    assert_eq!(request_hash(b"auth-ticket", &[0x08, 0x02]), 0xb46f_ba6f_a915_f051);
    assert_ne!(request_hash(b"auth-ticket", &[0x08, 0x03]), 0xb46f_ba6f_a915_f051);
}
