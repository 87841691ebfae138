// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — Canonical Physical Parameters
// ─────────────────────────────────────────────────────────────────────
//! Fixed constants of the double-pendulum model.
//!
//! Runtime-tunable copies of these live in `ChaosConfig`; the constants
//! here are the calibrated defaults and the state-vector layout.

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Arm mass per unit of normalised length.
pub const MASS_PER_LENGTH: f64 = 10.0;

/// Dimension of the integrated state `[θ0, ω0, θ1, ω1]`.
pub const STATE_DIM: usize = 4;

/// Indices into the state vector.
pub const THETA0: usize = 0;
pub const OMEGA0: usize = 1;
pub const THETA1: usize = 2;
pub const OMEGA1: usize = 3;

#[cfg(test)]
mod tests {
    use super::*;
    use chaos_types::ChaosConfig;

    #[test]
    fn test_constants_match_default_config() {
        let cfg = ChaosConfig::default();
        assert_eq!(cfg.gravity, GRAVITY);
        assert_eq!(cfg.mass_per_length, MASS_PER_LENGTH);
    }

    #[test]
    fn test_state_layout() {
        assert_eq!(STATE_DIM, 4);
        let idx = [THETA0, OMEGA0, THETA1, OMEGA1];
        for (i, &k) in idx.iter().enumerate() {
            assert_eq!(i, k);
        }
    }
}
