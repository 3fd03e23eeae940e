use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Turn an arbitrary title into a URL-safe slug: NFKD-decompose, drop
/// accents, lowercase, collapse anything non-alphanumeric into single dashes.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut prev_dash = true; // suppress leading dashes

    for c in input.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}
