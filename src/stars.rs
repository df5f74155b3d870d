//! Fixed-width star rating strings.
//!
//! A rating always renders as exactly [`STAR_COUNT`] glyphs. Position `i`
//! (1-based) is filled when `i <= round(rating)`.
//!
//! ## Rounding
//!
//! [`f64::round`] rounds half away from zero, so `2.5` shows three filled
//! stars and `0.5` shows one. Inside the 0–5 range this agrees with
//! JavaScript's `Math.round`, which the server-rendered pages use for the
//! same display.
//!
//! Input is not validated. Anything that rounds below 1 (including negative
//! values and NaN) yields no filled stars; anything above 5 fills all five.

pub const STAR_COUNT: usize = 5;
pub const FILLED: char = '★';
pub const EMPTY: char = '☆';

/// Number of filled positions for a rating, in `0..=STAR_COUNT`.
pub fn filled_count(rating: f64) -> usize {
    let rounded = rating.round();
    (1..=STAR_COUNT).filter(|&i| i as f64 <= rounded).count()
}

/// Render a rating as a five-glyph string, e.g. `3.6` → `★★★★☆`.
pub fn render_stars(rating: f64) -> String {
    let filled = filled_count(rating);
    (1..=STAR_COUNT)
        .map(|i| if i <= filled { FILLED } else { EMPTY })
        .collect()
}
