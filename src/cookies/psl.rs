//! Public Suffix List (PSL) validation for cookie domain security.
//!
//! Prevents supercookie attacks by rejecting cookies set on public
//! suffixes like `.com`, `.co.uk`, etc.
//!
//! The jar consults a [`PublicSuffixList`]; [`MozillaPsl`] is the default
//! and uses Mozilla's list via the `psl` crate.

use psl::{List, Psl};

/// Source of public suffix information for a jar.
pub trait PublicSuffixList: Send + Sync {
    /// The public suffix of `domain` (e.g. `"co.uk"` for `"www.bbc.co.uk"`),
    /// or `None` if unknown.
    fn public_suffix(&self, domain: &str) -> Option<String>;
}

/// Mozilla's Public Suffix List, compiled into the `psl` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct MozillaPsl;

impl PublicSuffixList for MozillaPsl {
    fn public_suffix(&self, domain: &str) -> Option<String> {
        let domain_lower = domain.to_lowercase();
        List.suffix(domain_lower.as_bytes())
            .and_then(|s| std::str::from_utf8(s.as_bytes()).ok())
            .map(|s| s.to_string())
    }
}

/// Check if a domain is a public suffix (e.g., "com", "co.uk").
/// Returns true if the domain itself is a public suffix.
pub fn is_public_suffix(domain: &str) -> bool {
    is_public_suffix_in(&MozillaPsl, domain)
}

/// Same as [`is_public_suffix`] against an arbitrary list.
pub fn is_public_suffix_in(list: &dyn PublicSuffixList, domain: &str) -> bool {
    let domain_lower = domain.to_lowercase();
    list.public_suffix(&domain_lower)
        .is_some_and(|suffix| suffix == domain_lower)
}

/// Get the registrable domain (eTLD+1) for a domain.
/// For "sub.example.com", returns "example.com".
/// For "example.com", returns "example.com".
/// For "com" (public suffix), returns None.
pub fn registrable_domain(domain: &str) -> Option<String> {
    let domain_lower = domain.to_lowercase();
    psl::domain(domain_lower.as_bytes())
        .and_then(|d| std::str::from_utf8(d.as_bytes()).ok())
        .map(|s| s.to_string())
}

/// Check if `host` equals `domain` or is a subdomain of it.
pub fn domain_matches(host: &str, domain: &str) -> bool {
    let host = host.to_lowercase();
    let domain = domain.to_lowercase();
    host == domain || host.ends_with(&format!(".{}", domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedList(&'static str);

    impl PublicSuffixList for FixedList {
        fn public_suffix(&self, domain: &str) -> Option<String> {
            domain.ends_with(self.0).then(|| self.0.to_string())
        }
    }

    #[test]
    fn test_is_public_suffix_com() {
        assert!(is_public_suffix("com"));
        assert!(is_public_suffix("COM"));
    }

    #[test]
    fn test_is_public_suffix_co_uk() {
        assert!(is_public_suffix("co.uk"));
        assert!(is_public_suffix("CO.UK"));
    }

    #[test]
    fn test_not_public_suffix() {
        assert!(!is_public_suffix("example.com"));
        assert!(!is_public_suffix("sub.example.com"));
    }

    #[test]
    fn test_custom_list() {
        let list = FixedList("example.test");
        assert!(is_public_suffix_in(&list, "example.test"));
        assert!(!is_public_suffix_in(&list, "a.example.test"));
        assert!(!is_public_suffix_in(&list, "com"));
    }

    #[test]
    fn test_mozilla_suffix_lookup() {
        assert_eq!(
            MozillaPsl.public_suffix("www.bbc.co.uk").as_deref(),
            Some("co.uk")
        );
    }

    #[test]
    fn test_registrable_domain_public_suffix() {
        assert_eq!(registrable_domain("com"), None);
        assert_eq!(registrable_domain("co.uk"), None);
    }

    #[test]
    fn test_domain_matches_requires_dot_boundary() {
        assert!(domain_matches("a.example.com", "example.com"));
        assert!(domain_matches("EXAMPLE.com", "example.com"));
        assert!(!domain_matches("badexample.com", "example.com"));
    }
}
