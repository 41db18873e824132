//! Identifier validation for the document store's native `ObjectId` type.
//!
//! An identifier is well formed when it is exactly 24 hexadecimal characters.
//! Parse failures are reported as `None`/`false`, never as errors.

use bson::oid::ObjectId;

/// Parses a 24-character hexadecimal string into an `ObjectId`.
pub fn parse_object_id(candidate: &str) -> Option<ObjectId> {
    ObjectId::parse_str(candidate).ok()
}

/// Returns `true` iff `candidate` is a well-formed `ObjectId` string.
pub fn is_valid_object_id(candidate: &str) -> bool {
    parse_object_id(candidate).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_generated_ids() {
        let id = ObjectId::new();
        assert!(is_valid_object_id(&id.to_hex()));
        assert_eq!(parse_object_id(&id.to_hex()), Some(id));
    }

    #[test]
    fn test_accepts_uppercase_hex() {
        assert!(is_valid_object_id("65A1B2C3D4E5F60718293A4B"));
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(!is_valid_object_id(""));
        assert!(!is_valid_object_id("abc"));
        // 23 and 25 characters
        assert!(!is_valid_object_id("65a1b2c3d4e5f60718293a4"));
        assert!(!is_valid_object_id("65a1b2c3d4e5f60718293a4bc"));
        // right length, non-hex
        assert!(!is_valid_object_id("65a1b2c3d4e5f60718293a4z"));
        assert!(!is_valid_object_id(" 65a1b2c3d4e5f60718293a4"));
    }
}
