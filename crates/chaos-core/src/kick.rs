// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — Kick Trigger and Re-Randomisation
// ─────────────────────────────────────────────────────────────────────
//! A kick throws both arms to new random angles:
//!   - p0: uniform over a half turn starting a quarter turn in, [π/2, 3π/2)
//!   - p1: uniform over a full turn, [0, 2π)
//!
//! Under `ClearVelocity` both arms also lose their velocity and
//! acceleration. Randomise is a separate, policy-independent operation
//! that also draws new velocities.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use rand::Rng;

use chaos_types::{ChaosConfig, KickPolicy, PhysicalState};

/// Rising-edge detector with hysteresis.
///
/// Fires once when the input reaches `high`; re-arms only after the input
/// falls to `low` or below.
#[derive(Debug, Clone, Copy)]
pub struct SchmittTrigger {
    low: f64,
    high: f64,
    is_high: bool,
}

impl SchmittTrigger {
    pub fn new(low: f64, high: f64) -> Self {
        Self {
            low,
            high,
            is_high: false,
        }
    }

    /// Returns `true` on a rising edge.
    #[inline]
    pub fn process(&mut self, input: f64) -> bool {
        if self.is_high {
            if input <= self.low {
                self.is_high = false;
            }
            false
        } else if input >= self.high {
            self.is_high = true;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.is_high = false;
    }

    pub fn is_high(&self) -> bool {
        self.is_high
    }
}

impl Default for SchmittTrigger {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// Throw both arms to new random angles.
pub fn kick<R: Rng + ?Sized>(state: &mut PhysicalState, policy: KickPolicy, rng: &mut R) {
    state.p0.angle = FRAC_PI_2 + rng.random::<f64>() * PI;
    state.p1.angle = rng.random::<f64>() * TAU;
    if policy == KickPolicy::ClearVelocity {
        state.p0.angular_velocity = 0.0;
        state.p1.angular_velocity = 0.0;
        state.p0.angular_acceleration = 0.0;
        state.p1.angular_acceleration = 0.0;
    }
}

/// Randomise angles over a full turn and velocities over `[-span/2, span/2)`.
pub fn randomize<R: Rng + ?Sized>(state: &mut PhysicalState, velocity_span: f64, rng: &mut R) {
    state.p0.angle = rng.random::<f64>() * TAU;
    state.p1.angle = rng.random::<f64>() * TAU;
    state.p0.angular_velocity = (rng.random::<f64>() - 0.5) * velocity_span;
    state.p1.angular_velocity = (rng.random::<f64>() - 0.5) * velocity_span;
}

/// Trigger input → kick.
#[derive(Debug, Clone, Copy, Default)]
pub struct KickController {
    trigger: SchmittTrigger,
}

impl KickController {
    pub fn from_config(config: &ChaosConfig) -> Self {
        Self {
            trigger: SchmittTrigger::new(config.trigger_low, config.trigger_high),
        }
    }

    /// Feed the summed trigger voltage; kicks on a rising edge.
    ///
    /// Returns whether a kick happened.
    pub fn process<R: Rng + ?Sized>(
        &mut self,
        trigger_voltage: f64,
        state: &mut PhysicalState,
        policy: KickPolicy,
        rng: &mut R,
    ) -> bool {
        if self.trigger.process(trigger_voltage) {
            kick(state, policy, rng);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.trigger.reset();
    }

    pub fn is_armed(&self) -> bool {
        !self.trigger.is_high()
    }
}
