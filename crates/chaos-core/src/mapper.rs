// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — Control-to-Parameter Mapping
// ─────────────────────────────────────────────────────────────────────
//! Panel values plus summed CV → simulation parameters.
//!
//!   length_ratio = clamp(ratio + ratio_cv / full_scale, 0.1, 0.9)
//!   dt           = clamp(sample_time · (timewarp + timewarp_cv / full_scale), 0, 6)
//!   damping      = 0.99999 if damp + damp_cv > 0.1 else 1.0
//!
//! Damping is a binary switch, not a curve. Out-of-range and NaN sums are
//! clamped silently; nothing here logs.

use chaos_types::{ChaosConfig, PhysicalState};

use crate::ports::{HostIo, InputId, ParamId};

/// Raw control values for one control tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInputs {
    pub timewarp: f64,
    pub timewarp_cv: f64,
    pub length_ratio: f64,
    pub ratio_cv: f64,
    pub damping: f64,
    pub damping_cv: f64,
}

impl ControlInputs {
    pub fn read<H: HostIo + ?Sized>(io: &H) -> Self {
        Self {
            timewarp: io.param(ParamId::Timewarp),
            timewarp_cv: io.input_sum(InputId::TimewarpCv),
            length_ratio: io.param(ParamId::LengthRatio),
            ratio_cv: io.input_sum(InputId::RatioCv),
            damping: io.param(ParamId::Damping),
            damping_cv: io.input_sum(InputId::DampingCv),
        }
    }
}

/// Simulation parameters derived from the controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlParams {
    pub dt: f64,
    pub length_ratio: f64,
    pub damping: f64,
}

/// Clamp, sending NaN to the lower bound.
#[inline]
fn clamp_control(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        lo
    } else {
        value.clamp(lo, hi)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParameterMapper {
    full_scale: f64,
    min_ratio: f64,
    max_ratio: f64,
    max_dt: f64,
    damping_factor: f64,
    damping_threshold: f64,
    mass_per_length: f64,
}

impl ParameterMapper {
    pub fn from_config(config: &ChaosConfig) -> Self {
        Self {
            full_scale: config.full_scale_voltage,
            min_ratio: config.min_length_ratio,
            max_ratio: config.max_length_ratio,
            max_dt: config.max_dt,
            damping_factor: config.damping_factor,
            damping_threshold: config.damping_threshold,
            mass_per_length: config.mass_per_length,
        }
    }

    pub fn map(&self, controls: &ControlInputs, sample_time: f64) -> ControlParams {
        let length_ratio = clamp_control(
            controls.length_ratio + controls.ratio_cv / self.full_scale,
            self.min_ratio,
            self.max_ratio,
        );
        let dt = clamp_control(
            sample_time * (controls.timewarp + controls.timewarp_cv / self.full_scale),
            0.0,
            self.max_dt,
        );
        // CV is added unscaled here: any patched voltage above the
        // threshold engages damping.
        let damping = if controls.damping + controls.damping_cv > self.damping_threshold {
            self.damping_factor
        } else {
            1.0
        };
        ControlParams {
            dt,
            length_ratio,
            damping,
        }
    }

    /// Write the length split and masses into `state`.
    pub fn apply(&self, params: &ControlParams, state: &mut PhysicalState) {
        state.set_length_ratio(
            params.length_ratio,
            self.min_ratio,
            self.max_ratio,
            self.mass_per_length,
        );
    }
}

impl Default for ParameterMapper {
    fn default() -> Self {
        Self::from_config(&ChaosConfig::default())
    }
}
