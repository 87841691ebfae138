// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — Kernel Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{ChaosError, ChaosResult};

/// Tunable constants of the pendulum voice.
///
/// The defaults are the calibrated panel behaviour; a host only overrides
/// them for offline experiments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaosConfig {
    /// Gravitational constant used by the equations of motion.
    /// Default: 9.81.
    pub gravity: f64,

    /// Arm mass per unit of normalised length.
    /// Default: 10.0 (a 0.5 arm weighs 5).
    pub mass_per_length: f64,

    /// Simulation runs once every `control_rate_divisor` host calls.
    /// Default: 4.
    pub control_rate_divisor: u32,

    /// Voltage corresponding to a full-scale control value.
    /// Default: 10 V.
    pub full_scale_voltage: f64,

    /// Peak voltage of the bipolar position and angle outputs.
    /// Default: 5 V.
    pub peak_voltage: f64,

    /// Lower clamp of the proximal length ratio.
    /// Default: 0.1.
    pub min_length_ratio: f64,

    /// Upper clamp of the proximal length ratio.
    /// Default: 0.9.
    pub max_length_ratio: f64,

    /// Upper clamp of the integration time step.
    /// Default: 6.0.
    pub max_dt: f64,

    /// Velocity multiplier applied after each step while damping is engaged.
    /// Default: 0.99999.
    pub damping_factor: f64,

    /// Damping engages when control + CV exceeds this.
    /// Default: 0.1.
    pub damping_threshold: f64,

    /// Kick trigger re-arms at or below this voltage.
    /// Default: 0 V.
    pub trigger_low: f64,

    /// Kick trigger fires at or above this voltage.
    /// Default: 1 V.
    pub trigger_high: f64,

    /// Randomised velocities are drawn from `[-span/2, span/2)`.
    /// Default: 5.0.
    pub randomize_velocity_span: f64,
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            mass_per_length: 10.0,
            control_rate_divisor: 4,
            full_scale_voltage: 10.0,
            peak_voltage: 5.0,
            min_length_ratio: 0.1,
            max_length_ratio: 0.9,
            max_dt: 6.0,
            damping_factor: 0.99999,
            damping_threshold: 0.1,
            trigger_low: 0.0,
            trigger_high: 1.0,
            randomize_velocity_span: 5.0,
        }
    }
}

impl ChaosConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> ChaosResult<()> {
        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            return Err(ChaosError::Config(format!(
                "gravity must be finite and > 0, got {}",
                self.gravity
            )));
        }
        if !(self.mass_per_length.is_finite() && self.mass_per_length > 0.0) {
            return Err(ChaosError::Config(format!(
                "mass_per_length must be finite and > 0, got {}",
                self.mass_per_length
            )));
        }
        if self.control_rate_divisor == 0 {
            return Err(ChaosError::Config(
                "control_rate_divisor must be >= 1".to_string(),
            ));
        }
        if self.full_scale_voltage <= 0.0 {
            return Err(ChaosError::Config(format!(
                "full_scale_voltage must be > 0, got {}",
                self.full_scale_voltage
            )));
        }
        if !(0.0 < self.min_length_ratio
            && self.min_length_ratio <= self.max_length_ratio
            && self.max_length_ratio < 1.0)
        {
            return Err(ChaosError::Config(format!(
                "length ratio bounds must satisfy 0 < min <= max < 1, got [{}, {}]",
                self.min_length_ratio, self.max_length_ratio
            )));
        }
        if (self.min_length_ratio + self.max_length_ratio - 1.0).abs() > 1e-9 {
            return Err(ChaosError::Config(format!(
                "length ratio bounds must be symmetric about 0.5, got [{}, {}]",
                self.min_length_ratio, self.max_length_ratio
            )));
        }
        if self.max_dt < 0.0 {
            return Err(ChaosError::Config(format!(
                "max_dt must be >= 0, got {}",
                self.max_dt
            )));
        }
        if !(0.0..=1.0).contains(&self.damping_factor) {
            return Err(ChaosError::Config(format!(
                "damping_factor must be in [0, 1], got {}",
                self.damping_factor
            )));
        }
        if self.trigger_low >= self.trigger_high {
            return Err(ChaosError::Config(format!(
                "trigger_low must be below trigger_high, got {} >= {}",
                self.trigger_low, self.trigger_high
            )));
        }
        if self.randomize_velocity_span < 0.0 {
            return Err(ChaosError::Config(format!(
                "randomize_velocity_span must be >= 0, got {}",
                self.randomize_velocity_span
            )));
        }
        Ok(())
    }

    /// Load from JSON string. Missing keys take their defaults.
    pub fn from_json(json: &str) -> ChaosResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ChaosError::Config(format!("JSON parse error: {e}")))
    }
}
