//! Turning free-form organization input into a bare domain.

use regex::Regex;
use std::sync::LazyLock;

/// A dotted token ending in a suffix of at least two letters.
static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_.-]+\.[A-Za-z]{2,}").expect("domain regex")
});

/// Resolve an organization name or URL to a domain.
///
/// The first domain-like token is returned verbatim. Input without one is
/// treated as a name: whitespace removed, lower-cased, `.com` appended.
/// Never fails, though the guess for a bare name may be wrong.
pub fn resolve_domain(input: &str) -> String {
    if let Some(m) = DOMAIN_RE.find(input) {
        return m.as_str().to_string();
    }

    let squashed: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    format!("{}.com", squashed.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_domain_is_returned_verbatim() {
        assert_eq!(resolve_domain("example.com"), "example.com");
        assert_eq!(resolve_domain("news.bbc.co.uk"), "news.bbc.co.uk");
    }

    #[test]
    fn url_yields_its_host() {
        assert_eq!(
            resolve_domain("https://www.rust-lang.org/learn"),
            "www.rust-lang.org"
        );
        assert_eq!(resolve_domain("http://sub.example.io:8080/x"), "sub.example.io");
    }

    #[test]
    fn upper_case_domain_is_kept_as_written() {
        assert_eq!(resolve_domain("Visit Example.COM today"), "Example.COM");
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(resolve_domain("see acme.com or acme.net"), "acme.com");
    }

    #[test]
    fn names_become_dot_com() {
        assert_eq!(resolve_domain("The Guardian"), "theguardian.com");
        assert_eq!(resolve_domain("  Acme   Corp "), "acmecorp.com");
        assert_eq!(resolve_domain("NYTimes"), "nytimes.com");
    }

    #[test]
    fn single_letter_suffix_is_not_a_domain() {
        assert_eq!(resolve_domain("Version 2.x"), "version2.x.com");
    }

    #[test]
    fn ip_literal_is_treated_as_a_name() {
        assert_eq!(resolve_domain("127.0.0.1"), "127.0.0.1.com");
    }
}
