// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — RK4 / Euler Integrator
// ─────────────────────────────────────────────────────────────────────
//! Advances `x = [θ0, ω0, θ1, ω1]` by one step, with
//! `dx/dt = [ω0, α0, ω1, α1]` and `α` from [`angular_accelerations`].
//!
//! Lengths and masses stay fixed for the duration of a step. Damping is
//! applied to both velocities after the step, outside the scheme itself.
//! No allocation: every stage lives on the stack.

use chaos_types::{IntegrationScheme, PhysicalState};

use crate::motion::angular_accelerations;
use crate::params::{OMEGA0, OMEGA1, STATE_DIM, THETA0, THETA1};

pub type StateVector = [f64; STATE_DIM];

/// One classic Runge-Kutta step of `dx/dt = f(t, x)`, in place.
///
/// Stages are combined with weights 1, 2, 2, 1 over 6.
#[allow(clippy::needless_range_loop)]
pub fn step_rk4<F>(t: f64, dt: f64, x: &mut StateVector, mut f: F)
where
    F: FnMut(f64, &StateVector) -> StateVector,
{
    let half = 0.5 * dt;
    let mut stage = [0.0; STATE_DIM];

    let k1 = f(t, x);
    for i in 0..STATE_DIM {
        stage[i] = x[i] + half * k1[i];
    }
    let k2 = f(t + half, &stage);
    for i in 0..STATE_DIM {
        stage[i] = x[i] + half * k2[i];
    }
    let k3 = f(t + half, &stage);
    for i in 0..STATE_DIM {
        stage[i] = x[i] + dt * k3[i];
    }
    let k4 = f(t + dt, &stage);

    for i in 0..STATE_DIM {
        x[i] += dt * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]) / 6.0;
    }
}

/// Time derivative of the state vector, holding `base`'s lengths and masses.
#[inline]
pub fn pendulum_derivative(base: &PhysicalState, x: &StateVector, gravity: f64) -> StateVector {
    let stage = base.with_vector(x);
    let (alpha0, alpha1) = angular_accelerations(&stage.p0, &stage.p1, gravity);
    [x[OMEGA0], alpha0, x[OMEGA1], alpha1]
}

/// Double-pendulum stepper.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    pub gravity: f64,
}

impl Integrator {
    pub fn new(gravity: f64) -> Self {
        Self { gravity }
    }

    /// Advance `state` by `dt` with the chosen scheme, then damp velocities.
    pub fn advance(
        &self,
        state: &mut PhysicalState,
        scheme: IntegrationScheme,
        dt: f64,
        damping: f64,
    ) {
        match scheme {
            IntegrationScheme::Rk4 => self.step_rk4(state, dt),
            IntegrationScheme::Euler => self.step_euler(state, dt),
        }
        state.p0.angular_velocity *= damping;
        state.p1.angular_velocity *= damping;
    }

    /// Runge-Kutta path. Intermediate accelerations are not persisted.
    pub fn step_rk4(&self, state: &mut PhysicalState, dt: f64) {
        let base = *state;
        let gravity = self.gravity;
        let mut x = state.to_vector();
        step_rk4(0.0, dt, &mut x, |_t, s| pendulum_derivative(&base, s, gravity));

        state.p0.angle = x[THETA0];
        state.p0.angular_velocity = x[OMEGA0];
        state.p1.angle = x[THETA1];
        state.p1.angular_velocity = x[OMEGA1];
    }

    /// Semi-implicit Euler: velocities first, then angles from the new velocities.
    pub fn step_euler(&self, state: &mut PhysicalState, dt: f64) {
        let (alpha0, alpha1) = angular_accelerations(&state.p0, &state.p1, self.gravity);
        state.p0.angular_acceleration = alpha0;
        state.p1.angular_acceleration = alpha1;

        state.p0.angular_velocity += alpha0 * dt;
        state.p1.angular_velocity += alpha1 * dt;
        state.p0.angle += state.p0.angular_velocity * dt;
        state.p1.angle += state.p1.angular_velocity * dt;
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new(crate::params::GRAVITY)
    }
}
