// SPDX-License-Identifier: Apache-2.0

//! Weaponization keyword detection.
//!
//! A binary flag over the advisory summary: 1 if any configured keyword
//! occurs as a case-insensitive substring, else 0. No partial credit for
//! multiple matches.

/// Returns true if `summary` contains any of `keywords` (case-insensitive).
#[must_use]
pub fn is_weaponizable(summary: &str, keywords: &[String]) -> bool {
    let haystack = summary.to_lowercase();
    keywords
        .iter()
        .any(|kw| !kw.is_empty() && haystack.contains(&kw.to_lowercase()))
}

/// The weaponization flag as a scoring axis value (0.0 or 1.0).
#[must_use]
pub fn weapon_flag(summary: &str, keywords: &[String]) -> f64 {
    if is_weaponizable(summary, keywords) {
        1.0
    } else {
        0.0
    }
}
