//! Name normalization shared by catalog lookups and selection matching.

/// Normalize a display name for comparison: lower-cased with apostrophes removed.
///
/// Catalog sheets are authored by hand, so `"Fairy's Flight"`, `"fairys flight"`
/// and `"Fairy's flight"` all have to land on the same key.
#[must_use]
pub fn clean_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '\'')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether two display names refer to the same entry after normalization.
#[must_use]
pub fn names_match(a: &str, b: &str) -> bool {
    clean_name(a) == clean_name(b)
}
