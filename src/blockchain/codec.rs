use sha2::{Digest, Sha256};

/// The block fields committed to by the block hash, in payload order.
#[derive(Debug, Clone, Copy)]
pub struct HashFields<'a> {
    pub height: u64,
    pub previous_hash: &'a str,
    pub timestamp: u64,
    pub difficulty: u32,
    pub nonce: u64,
    pub data: &'a str,
}

/// Build the canonical payload:
///
/// `hex(height) || previous_hash || hex(timestamp) || hex(difficulty) || hex(nonce) || hex(data)`
///
/// Numbers are written in base 16 without padding. The concatenated text is
/// then decoded as hex, pair by pair. Decoding stops at the first pair that is
/// not valid hex and a trailing odd nibble is dropped.
pub fn canonical_payload(fields: &HashFields<'_>) -> Vec<u8> {
    let text = format!(
        "{:x}{}{:x}{:x}{:x}{}",
        fields.height,
        fields.previous_hash,
        fields.timestamp,
        fields.difficulty,
        fields.nonce,
        hex::encode(fields.data.as_bytes()),
    );
    decode_hex_prefix(&text)
}

/// SHA-256 of the canonical payload as 64 lowercase hex characters.
pub fn hash_fields(fields: &HashFields<'_>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_payload(fields));
    hex::encode(hasher.finalize())
}

/// True when `hash` starts with `difficulty` hex zeros.
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let difficulty = difficulty as usize;
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|c| c == b'0')
}

fn decode_hex_prefix(text: &str) -> Vec<u8> {
    let valid = text
        .bytes()
        .position(|c| !c.is_ascii_hexdigit())
        .unwrap_or(text.len());
    // Even length and only hex digits, so this cannot fail.
    hex::decode(&text[..valid & !1]).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

    fn sample() -> HashFields<'static> {
        HashFields {
            height: 1,
            previous_hash: ZERO_HASH,
            timestamp: 1_620_000_000_000,
            difficulty: 2,
            nonce: 10,
            data: "hi",
        }
    }

    #[test]
    fn payload_concatenates_hex_fields_in_order() {
        // "1" + 64 zeros + "1792f864800" + "2" + "a" + "6869"
        let payload = canonical_payload(&sample());
        let mut expected = String::from("1");
        expected.push_str(ZERO_HASH);
        expected.push_str("1792f864800");
        expected.push_str("2a6869");
        assert_eq!(expected.len() % 2, 0);
        assert_eq!(payload, hex::decode(expected).unwrap());
    }

    #[test]
    fn odd_length_payload_drops_last_nibble() {
        let fields = HashFields {
            height: 0,
            previous_hash: ZERO_HASH,
            timestamp: 0,
            difficulty: 0,
            nonce: 0,
            data: "",
        };
        // "0" + 64 zeros + "000" = 68 chars -> 34 bytes; add one more nibble via nonce
        assert_eq!(canonical_payload(&fields).len(), 34);
        let odd = HashFields { nonce: 16, ..fields };
        // nonce "10" adds two chars -> 69 chars -> 34 bytes, last nibble dropped
        assert_eq!(canonical_payload(&odd).len(), 34);
    }

    #[test]
    fn decoding_stops_at_first_invalid_pair() {
        let fields = HashFields {
            previous_hash: "zz",
            ..sample()
        };
        // only "1" precedes the invalid characters, which is a lone nibble
        assert!(canonical_payload(&fields).is_empty());
    }

    #[test]
    fn digest_is_deterministic_lowercase_hex() {
        let a = hash_fields(&sample());
        let b = hash_fields(&sample());
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn digest_matches_known_vector() {
        assert_eq!(
            hash_fields(&sample()),
            "009e32f0a73f08ed62b9afe1d56b6e9cf6c6e361edab60cd5fc40ab487193b7a"
        );
    }

    #[test]
    fn multi_byte_data_is_hashed_as_utf8() {
        let fields = HashFields {
            height: 3,
            previous_hash: ZERO_HASH,
            timestamp: 1_620_000_000_001,
            difficulty: 17,
            nonce: 255,
            data: "héllo ✓",
        };
        assert!(hex::encode(canonical_payload(&fields)).ends_with("68c3a96c6c6f20e29c93"));
        assert_eq!(
            hash_fields(&fields),
            "9d670c08db4a852355eb3b98c339083ea604fcbcfa32be1ae95131bc52238774"
        );
    }

    #[test]
    fn odd_length_digest_matches_known_vector() {
        // "10" shifts every later nibble by one, leaving a dangling final nibble.
        let fields = HashFields {
            height: 16,
            ..sample()
        };
        assert_eq!(
            hash_fields(&fields),
            "f80eaa040654177b96b54f6057cc61614ac6cead2115ebda0880182b18f50f92"
        );
    }

    #[test]
    fn digest_depends_on_every_field() {
        let base = hash_fields(&sample());
        assert_ne!(base, hash_fields(&HashFields { height: 2, ..sample() }));
        assert_ne!(base, hash_fields(&HashFields { timestamp: 7, ..sample() }));
        assert_ne!(base, hash_fields(&HashFields { difficulty: 3, ..sample() }));
        assert_ne!(base, hash_fields(&HashFields { nonce: 11, ..sample() }));
        assert_ne!(base, hash_fields(&HashFields { data: "ho", ..sample() }));
    }

    #[test]
    fn difficulty_prefix_check() {
        assert!(meets_difficulty("00ab", 2));
        assert!(meets_difficulty("00ab", 0));
        assert!(!meets_difficulty("0a0b", 2));
        assert!(!meets_difficulty("00", 3));
    }
}
