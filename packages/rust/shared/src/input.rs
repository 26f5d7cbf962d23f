//! Reading the organization list.

use std::path::Path;

use crate::error::{LogoCrawlerError, Result};

/// Read organization identifiers, one per line.
///
/// Lines are whitespace-trimmed and blank lines are skipped; order is kept.
pub fn read_organizations(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| LogoCrawlerError::io(path, e))?;
    Ok(parse_organizations(&content))
}

/// Split raw list content into organization identifiers.
pub fn parse_organizations(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_skips_blank_lines() {
        let orgs =
            parse_organizations("  Acme Corp \n\n example.com\n   \nhttps://www.rust-lang.org/\n");
        assert_eq!(
            orgs,
            vec!["Acme Corp", "example.com", "https://www.rust-lang.org/"]
        );
    }

    #[test]
    fn handles_crlf() {
        let orgs = parse_organizations("a.com\r\nb.com\r\n");
        assert_eq!(orgs, vec!["a.com", "b.com"]);
    }

    #[test]
    fn missing_file_errors() {
        assert!(read_organizations(Path::new("/no/such/publishers.txt")).is_err());
    }
}
