use subtle::ConstantTimeEq;

/// Check a presented admin key against the configured one in constant time.
///
/// With no key configured, nothing is accepted.
pub fn verify_admin_key(configured: Option<&str>, presented: Option<&str>) -> bool {
    match (configured, presented) {
        (Some(expected), Some(presented)) => {
            expected.len() == presented.len()
                && bool::from(expected.as_bytes().ct_eq(presented.as_bytes()))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_admin_key() {
        assert!(verify_admin_key(Some("secret123"), Some("secret123")));
        assert!(!verify_admin_key(Some("secret123"), Some("secret124")));
        assert!(!verify_admin_key(Some("secret123"), Some("secret12")));
        assert!(!verify_admin_key(Some("secret123"), None));
    }

    #[test]
    fn test_unconfigured_key_rejects_everything() {
        assert!(!verify_admin_key(None, Some("")));
        assert!(!verify_admin_key(None, Some("anything")));
        assert!(!verify_admin_key(None, None));
    }
}
