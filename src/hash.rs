//! BLAKE3-based publisher identity hashing
//!
//! Package full and family names embed a short publisher id instead of the
//! raw publisher string: the leading 8 bytes of the BLAKE3 hash of the
//! publisher, rendered as 13 characters of Crockford base32.

/// Crockford base32 alphabet, lowercased (no i, l, o, u)
const ALPHABET: &[u8; 32] = b"0123456789abcdefghjkmnpqrstvwxyz";

/// Number of characters in a publisher id (65 bits cover the 64-bit digest
/// prefix, with an implicit leading zero bit)
const PUBLISHER_ID_LEN: usize = 13;

/// Derive the short publisher id used in package full/family names
pub fn publisher_id(publisher: &str) -> String {
    let digest = blake3::hash(publisher.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest.as_bytes()[..8]);
    crockford32(u64::from_be_bytes(prefix))
}

fn crockford32(value: u64) -> String {
    let mut out = String::with_capacity(PUBLISHER_ID_LEN);
    for i in (0..PUBLISHER_ID_LEN).rev() {
        let index = ((value >> (i * 5)) & 0x1f) as usize;
        out.push(ALPHABET[index] as char);
    }
    out
}
