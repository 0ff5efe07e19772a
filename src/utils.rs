//! # Utility Functions Module
//!
//! Piccole funzioni di supporto condivise tra CLI e modalità interattiva.

use std::path::PathBuf;

/// Split a comma-separated list of paths as typed by the user.
///
/// Entries are trimmed and empty ones dropped, so `"a.png, ,b/"` gives
/// two paths.
///
/// # Example
/// ```rust
/// use webp_converter::utils::parse_input_list;
///
/// let inputs = parse_input_list("photos/, logo.png");
/// assert_eq!(inputs.len(), 2);
/// ```
pub fn parse_input_list(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(unquote)
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Strip one pair of matching surrounding quotes, as left by drag-and-drop
/// into a terminal.
pub fn unquote(raw: &str) -> &str {
    let trimmed = raw.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_list() {
        let result = parse_input_list(" a.png , photos/ ,, ");
        assert_eq!(result, vec![PathBuf::from("a.png"), PathBuf::from("photos/")]);
    }

    #[test]
    fn test_parse_input_list_empty() {
        assert!(parse_input_list("").is_empty());
        assert!(parse_input_list(" , ").is_empty());
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'/tmp/my photos'"), "/tmp/my photos");
        assert_eq!(unquote("\"a.png\""), "a.png");
        assert_eq!(unquote("'unbalanced"), "'unbalanced");
        assert_eq!(unquote("  plain "), "plain");
    }
}
