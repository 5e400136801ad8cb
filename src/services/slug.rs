use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const MAX_SLUG_LENGTH: usize = 200;

/// Derives a URL-safe identifier from a human-entered title.
///
/// Lowercases, decomposes accented characters and strips their
/// combining marks, drops everything that is not a lowercase ASCII
/// letter, digit, whitespace, or hyphen, then collapses whitespace and
/// hyphen runs into single hyphens with none leading or trailing.
///
/// Deterministic and pure; an empty or whitespace-only title yields an
/// empty string, which callers must reject before writing. Uniqueness
/// is not guaranteed here.
pub fn derive_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.to_lowercase().nfd() {
        if is_combining_mark(c) {
            continue;
        }
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
    }

    slug
}

pub fn validate_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > MAX_SLUG_LENGTH {
        return false;
    }
    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
}
