//! Slug generation and validation.
//!
//! A slug is the URL-safe public identifier of a profile: lowercase ASCII
//! letters, digits, and hyphens. Generation is pure and total; the same input
//! always yields the same slug and empty input yields an empty slug.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Derive a slug from free text.
///
/// Lowercases, decomposes accented characters and drops their combining
/// marks, turns whitespace runs into single hyphens, removes everything
/// outside `[a-z0-9-]`, collapses hyphen runs, and trims hyphens at both
/// ends.
///
/// ```
/// use linkfolio_profiles::slug::generate_slug;
///
/// assert_eq!(generate_slug("Café Löve!"), "cafe-love");
/// assert_eq!(generate_slug("  Ana   Pérez  "), "ana-perez");
/// assert_eq!(generate_slug(""), "");
/// ```
#[must_use]
pub fn generate_slug(text: &str) -> String {
    let lowered = text.to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    let mut last_was_hyphen = false;

    for c in lowered.nfd() {
        if is_combining_mark(c) {
            continue;
        }

        let mapped = if c.is_whitespace() { '-' } else { c };

        match mapped {
            '-' => {
                if !last_was_hyphen {
                    out.push('-');
                    last_was_hyphen = true;
                }
            }
            'a'..='z' | '0'..='9' => {
                out.push(mapped);
                last_was_hyphen = false;
            }
            _ => {}
        }
    }

    out.trim_matches('-').to_string()
}

/// Check whether a slug is syntactically valid.
///
/// Valid slugs are at least 3 characters long and contain only lowercase
/// ASCII letters, digits, and hyphens.
///
/// ```
/// use linkfolio_profiles::slug::validate_slug;
///
/// assert!(validate_slug("ana-perez"));
/// assert!(!validate_slug("ab"));
/// assert!(!validate_slug("Ana"));
/// ```
#[must_use]
pub fn validate_slug(slug: &str) -> bool {
    slug.len() >= 3
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics() {
        assert_eq!(generate_slug("Café Löve!"), "cafe-love");
        assert_eq!(generate_slug("José Ñandú"), "jose-nandu");
    }

    #[test]
    fn collapses_whitespace_and_hyphens() {
        assert_eq!(generate_slug("a   b"), "a-b");
        assert_eq!(generate_slug("a - - b"), "a-b");
        assert_eq!(generate_slug("--edge--case--"), "edge-case");
    }

    #[test]
    fn drops_disallowed_characters() {
        assert_eq!(generate_slug("Rock & Roll!"), "rock-roll");
        assert_eq!(generate_slug("100% juice"), "100-juice");
    }

    #[test]
    fn is_pure_and_total() {
        assert_eq!(generate_slug(""), "");
        assert_eq!(generate_slug("!!!"), "");
        assert_eq!(generate_slug("Ana Pérez"), generate_slug("Ana Pérez"));
    }

    #[test]
    fn generation_is_idempotent() {
        let once = generate_slug("Café Löve!");
        assert_eq!(generate_slug(&once), once);
    }

    #[test]
    fn validation_boundaries() {
        assert!(validate_slug("abc"));
        assert!(validate_slug("a-1"));
        assert!(!validate_slug("ab"));
        assert!(!validate_slug(""));
        assert!(!validate_slug("has space"));
        assert!(!validate_slug("Upper"));
        assert!(!validate_slug("ünïcode"));
    }

    #[test]
    fn generated_slugs_validate_when_long_enough() {
        assert!(validate_slug(&generate_slug("Ana Pérez")));
        // Too-short output is possible and callers must check
        assert!(!validate_slug(&generate_slug("Jo")));
    }
}
