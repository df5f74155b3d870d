//! Recipe name → slug → URL path derivation.
//!
//! Recipe names are the display key *and* the routing key. Two different
//! derivations exist and must not be confused:
//!
//! - **Detail pages** use a slug: spaces become hyphens, then the result is
//!   percent-encoded as one path segment.
//!   `"Pasta Carbonara"` → `/recipe/Pasta-Carbonara`
//! - **Action endpoints** (`/delete-recipe/…`, `/toggle-cookbook/…`, …) take
//!   the raw name, percent-encoded as one path segment, spaces included.
//!   `"Pasta Carbonara"` → `/toggle-cookbook/Pasta%20Carbonara`
//!
//! Encoding uses `urlencoding`, which leaves only `A-Z a-z 0-9 - _ . ~`
//! unescaped. The browser's `encodeURIComponent` additionally leaves
//! `! ' ( ) *` alone; the server decodes both forms identically.

/// Replace every space with a hyphen. No other normalization is applied:
/// case, punctuation and existing hyphens are preserved.
pub fn recipe_slug(name: &str) -> String {
    name.replace(' ', "-")
}

/// Percent-encode a value for use as a single URL path segment.
pub fn encode_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Detail page path for a recipe: `/recipe/<encoded slug>`.
pub fn recipe_detail_path(name: &str) -> String {
    format!("/recipe/{}", encode_segment(&recipe_slug(name)))
}

/// Path for an action endpoint keyed by recipe name, e.g.
/// `action_path("/toggle-cookbook", "Tofu Bowl")` → `/toggle-cookbook/Tofu%20Bowl`.
pub fn action_path(prefix: &str, name: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), encode_segment(name))
}
