use cdmi_kernel::SAFE_ALPHABET;
use cdmi_kernel::domain::constants::OBJECT_ID_LENGTH;
use cdmi_kernel::safe_nanoid;

#[test]
fn generates_expected_length_and_charset() {
    let id = safe_nanoid!();
    assert_eq!(id.len(), 12);

    for ch in id.chars() {
        assert!(SAFE_ALPHABET.contains(&ch), "unexpected character in nanoid: {ch}");
    }
}

#[test]
fn object_id_length() {
    let id = safe_nanoid!(OBJECT_ID_LENGTH);
    assert_eq!(id.len(), 8);
    assert_ne!(id, safe_nanoid!(OBJECT_ID_LENGTH), "consecutive ids should differ");
}
