//! Identifier generation for users and tasks.

use uuid::{Uuid, Variant};

/// Length of the canonical hyphenated text form.
const HYPHENATED_LEN: usize = 36;

/// Generate a fresh random (version 4) identifier.
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Parse `raw` as a random (version 4, RFC 4122 variant) UUID.
///
/// Only the canonical hyphenated form is accepted; simple, braced and
/// `urn:uuid:` forms are rejected.
pub fn parse_v4(raw: &str) -> Option<Uuid> {
    if raw.len() != HYPHENATED_LEN {
        return None;
    }
    Uuid::parse_str(raw)
        .ok()
        .filter(|id| id.get_version_num() == 4 && id.get_variant() == Variant::RFC4122)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_v4_and_distinct() {
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
        assert_eq!(parse_v4(&a.to_string()), Some(a));
    }

    #[test]
    fn test_parse_v4_rejects_other_shapes() {
        assert_eq!(parse_v4("not-a-uuid"), None);
        assert_eq!(parse_v4(""), None);
        // Well-formed, but version 1.
        assert_eq!(parse_v4("c232ab00-9414-11ec-b3c8-9f6bdeced846"), None);
        assert_eq!(parse_v4("00000000-0000-0000-0000-000000000000"), None);
    }

    #[test]
    fn test_parse_v4_requires_canonical_rfc4122_form() {
        let canonical = "febc1dd7-801d-4b9a-8512-7f392be55ad1";
        assert!(parse_v4(canonical).is_some());
        assert!(parse_v4(&canonical.to_uppercase()).is_some());

        assert_eq!(parse_v4("febc1dd7801d4b9a85127f392be55ad1"), None);
        assert_eq!(parse_v4("urn:uuid:febc1dd7-801d-4b9a-8512-7f392be55ad1"), None);
        assert_eq!(parse_v4("{febc1dd7-801d-4b9a-8512-7f392be55ad1}"), None);
        // Version 4, but the variant bits are not 10xx.
        assert_eq!(parse_v4("3b241101-e2bb-4255-ccaf-0123456789ab"), None);
        assert_eq!(parse_v4("3b241101-e2bb-4255-0caf-0123456789ab"), None);
    }
}
