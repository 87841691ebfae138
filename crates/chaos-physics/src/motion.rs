// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — Double-Pendulum Equations of Motion
// ─────────────────────────────────────────────────────────────────────
//! Angular accelerations of the coupled two-arm system:
//!
//!   D  = 2(m0 + m1) − m1·cos(2θ0 − 2θ1)
//!   α0 = [−g·2(m0+m1)·sin θ0 − m1·g·sin(θ0 − 2θ1)
//!         − 2·sin(θ0−θ1)·m1·(ω1²·L1 + ω0²·L0·cos(θ0−θ1))] / (L0·D)
//!   α1 = [2·sin(θ0−θ1)·(ω0²·L0·(m0+m1) + g·(m0+m1)·cos θ0
//!         + ω1²·L1·m1·cos(θ0−θ1))] / (L1·D)
//!
//! Stateless: the integrator evaluates it on intermediate stage states.
//! A vanishing `D` is not guarded; the resulting non-finite accelerations
//! are part of the chaotic regime the voice exposes.

use chaos_types::ArmState;

/// Angular accelerations `(α0, α1)` of both arms.
#[inline]
pub fn angular_accelerations(p0: &ArmState, p1: &ArmState, gravity: f64) -> (f64, f64) {
    let g = gravity;
    let delta = p0.angle - p1.angle;
    let (sin_delta, cos_delta) = delta.sin_cos();
    let mass_sum = p0.mass + p1.mass;
    let shared = 2.0 * mass_sum - p1.mass * (2.0 * p0.angle - 2.0 * p1.angle).cos();

    let w0_sq = p0.angular_velocity * p0.angular_velocity;
    let w1_sq = p1.angular_velocity * p1.angular_velocity;

    let num0 = -g * (2.0 * mass_sum) * p0.angle.sin()
        - p1.mass * g * (p0.angle - 2.0 * p1.angle).sin()
        - 2.0 * sin_delta * p1.mass * (w1_sq * p1.length + w0_sq * p0.length * cos_delta);
    let alpha0 = num0 / (p0.length * shared);

    let num1 = 2.0
        * sin_delta
        * (w0_sq * p0.length * mass_sum
            + g * mass_sum * p0.angle.cos()
            + w1_sq * p1.length * p1.mass * cos_delta);
    let alpha1 = num1 / (p1.length * shared);

    (alpha0, alpha1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::GRAVITY;
    use chaos_types::PhysicalState;

    fn arms(theta0: f64, omega0: f64, theta1: f64, omega1: f64) -> PhysicalState {
        let mut s = PhysicalState::at_rest();
        s.p0.angle = theta0;
        s.p0.angular_velocity = omega0;
        s.p1.angle = theta1;
        s.p1.angular_velocity = omega1;
        s
    }

    #[test]
    fn test_rest_has_zero_acceleration() {
        let s = arms(0.0, 0.0, 0.0, 0.0);
        let (a0, a1) = angular_accelerations(&s.p0, &s.p1, GRAVITY);
        assert_eq!(a0, 0.0);
        assert_eq!(a1, 0.0);
    }

    #[test]
    fn test_colinear_arms_swing_as_simple_pendulum() {
        // Aligned, motionless arms: the top arm feels −g·sin θ / L0,
        // the bottom arm no relative torque.
        let theta = 0.4;
        let s = arms(theta, 0.0, theta, 0.0);
        let (a0, a1) = angular_accelerations(&s.p0, &s.p1, GRAVITY);
        let expected = -GRAVITY * theta.sin() / s.p0.length;
        assert!((a0 - expected).abs() < 1e-9, "a0={a0}, expected={expected}");
        assert!(a1.abs() < 1e-12, "a1={a1}");
    }

    #[test]
    fn test_mirror_symmetry() {
        let s = arms(0.7, 1.3, -0.4, 0.2);
        let m = arms(-0.7, -1.3, 0.4, -0.2);
        let (a0, a1) = angular_accelerations(&s.p0, &s.p1, GRAVITY);
        let (b0, b1) = angular_accelerations(&m.p0, &m.p1, GRAVITY);
        assert!((a0 + b0).abs() < 1e-9);
        assert!((a1 + b1).abs() < 1e-9);
    }

    #[test]
    fn test_gravity_restores_displaced_top_arm() {
        let s = arms(0.3, 0.0, 0.0, 0.0);
        let (a0, _) = angular_accelerations(&s.p0, &s.p1, GRAVITY);
        assert!(a0 < 0.0, "a0={a0} should pull back toward vertical");
    }

    #[test]
    fn test_singularity_passes_through() {
        // Massless distal arm with massless proximal arm: D = 0.
        let mut s = arms(0.5, 1.0, 0.1, 1.0);
        s.p0.mass = 0.0;
        s.p1.mass = 0.0;
        let (a0, a1) = angular_accelerations(&s.p0, &s.p1, GRAVITY);
        assert!(!a0.is_finite());
        assert!(!a1.is_finite());
    }
}
