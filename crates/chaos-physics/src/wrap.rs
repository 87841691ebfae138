// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — Angle Wrapping
// ─────────────────────────────────────────────────────────────────────
//! Two independent wraps:
//!   - [`normalize_angle`] keeps the integrated angles in `[0, 2π)` so they
//!     never drift over long runs.
//!   - [`fold_signed`] maps an angle into `(−π, π]` for the angle outputs.

use std::f64::consts::{PI, TAU};

/// Modular phase reduction: θ ∈ [0, 2π).
///
/// Non-finite angles pass through unchanged in kind (NaN stays NaN).
#[inline]
pub fn normalize_angle(theta: f64) -> f64 {
    let r = theta.rem_euclid(TAU);
    // rem_euclid may round up to exactly TAU for tiny negative inputs.
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// Fold θ into (−π, π], differing from θ by an integer number of turns.
#[inline]
pub fn fold_signed(theta: f64) -> f64 {
    let r = PI - (PI - theta).rem_euclid(TAU);
    if r <= -PI {
        r + TAU
    } else {
        r
    }
}
