//! URL slugs for categories and products.
//!
//! `slugify` produces a lowercase kebab-case key. Letters outside ASCII are
//! kept as-is rather than transliterated.

use std::future::Future;

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::error::Result;

lazy_static! {
    static ref UNDERSCORES: Regex = Regex::new(r"_+").unwrap();
    static ref DISALLOWED: Regex = Regex::new(r"[^\-\p{L}\p{N}\s]+").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[\-\s]+").unwrap();
}

/// Lowercase kebab-case slug of `text`.
///
/// ```ignore
/// assert_eq!(slugify("Sunset over Bali!"), "sunset-over-bali");
/// ```
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let lowered = UNDERSCORES.replace_all(&lowered, "-");
    let lowered = lowered.replace('@', "-at-");
    let cleaned = DISALLOWED.replace_all(&lowered, "");
    let joined = SEPARATORS.replace_all(&cleaned, "-");
    joined.trim_matches('-').to_string()
}

/// Find the first free slug among `base`, `base-2`, `base-3`, ...
///
/// `exists` reports whether a candidate is already taken. An empty base is
/// replaced by `fallback`.
pub async fn unique_slug<F, Fut>(base: &str, fallback: &str, mut exists: F) -> Result<String>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let base = if base.is_empty() { fallback } else { base };

    let mut candidate = base.to_string();
    let mut counter = 2;

    while exists(candidate.clone()).await? {
        candidate = format!("{}-{}", base, counter);
        counter += 1;
    }

    Ok(candidate)
}
