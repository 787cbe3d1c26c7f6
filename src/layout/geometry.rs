use crate::{foundation::math::px_at_least_one, model::config::AspectRatioPolicy};

/// Height-per-width used when an image's native ratio is unknown (4:3).
pub const FALLBACK_INVERSE_RATIO: f64 = 0.75;

/// Height-per-width factor for a policy.
///
/// `native_ratio` is the image's width / height and is only consulted for
/// [`AspectRatioPolicy::Auto`].
pub fn inverse_ratio(policy: AspectRatioPolicy, native_ratio: Option<f64>) -> f64 {
    match policy {
        AspectRatioPolicy::Square => 1.0,
        AspectRatioPolicy::Landscape4x3 => 0.75,
        AspectRatioPolicy::Widescreen16x9 => 0.5625,
        AspectRatioPolicy::Portrait3x4 => 1.333,
        AspectRatioPolicy::Tall9x16 => 1.778,
        AspectRatioPolicy::Auto => match native_ratio {
            Some(r) if r.is_finite() && r > 0.0 => 1.0 / r,
            _ => FALLBACK_INVERSE_RATIO,
        },
    }
}

/// Panel height for a panel of `width` pixels; always >= 1.
pub fn panel_height(width: u32, policy: AspectRatioPolicy, native_ratio: Option<f64>) -> u32 {
    px_at_least_one(f64::from(width) * inverse_ratio(policy, native_ratio))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
