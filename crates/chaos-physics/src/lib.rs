// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — Double-Pendulum Physics Engine
// (C) 2026 Chaos Pendulum contributors. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Double-pendulum physics: coupled equations of motion, RK4 and
//! semi-implicit Euler steppers, and angle wrapping.

pub mod integrator;
pub mod motion;
pub mod params;
pub mod wrap;

pub use integrator::{pendulum_derivative, step_rk4, Integrator, StateVector};
pub use motion::angular_accelerations;
pub use params::{GRAVITY, MASS_PER_LENGTH, STATE_DIM};
pub use wrap::{fold_signed, normalize_angle};
