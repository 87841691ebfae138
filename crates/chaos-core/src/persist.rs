// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — Saved State Format
// ─────────────────────────────────────────────────────────────────────
//! Flat key → value document:
//!
//! ```json
//! { "mode": 0, "kick_mode": 1,
//!   "p0_theta": 1.23, "p0_vel": -0.4, "p1_theta": 5.0, "p1_vel": 0.7 }
//! ```
//!
//! Every key is written on save. On load each key is independent: a
//! missing key, a wrongly-typed value or an unknown mode tag leaves that
//! field alone. Extra keys are ignored.

use serde::Serialize;
use serde_json::{Map, Value};

use chaos_types::{
    ChaosError, ChaosResult, IntegrationScheme, KickPolicy, PhysicalState, SimulationConfig,
};

pub const KEY_MODE: &str = "mode";
pub const KEY_KICK_MODE: &str = "kick_mode";
pub const KEY_P0_THETA: &str = "p0_theta";
pub const KEY_P0_VEL: &str = "p0_vel";
pub const KEY_P1_THETA: &str = "p1_theta";
pub const KEY_P1_VEL: &str = "p1_vel";

/// The persisted fields, in save order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SavedState {
    pub mode: u8,
    pub kick_mode: u8,
    pub p0_theta: f64,
    pub p0_vel: f64,
    pub p1_theta: f64,
    pub p1_vel: f64,
}

impl SavedState {
    pub fn capture(state: &PhysicalState, modes: &SimulationConfig) -> Self {
        Self {
            mode: modes.integration_scheme.tag(),
            kick_mode: modes.kick_policy.tag(),
            p0_theta: state.p0.angle,
            p0_vel: state.p0.angular_velocity,
            p1_theta: state.p1.angle,
            p1_vel: state.p1.angular_velocity,
        }
    }

    pub fn to_value(&self) -> ChaosResult<Value> {
        serde_json::to_value(self)
            .map_err(|e| ChaosError::Persist(format!("serialise failed: {e}")))
    }

    pub fn to_json(&self) -> ChaosResult<String> {
        serde_json::to_string(self)
            .map_err(|e| ChaosError::Persist(format!("serialise failed: {e}")))
    }
}

/// Which fields a load actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub mode: bool,
    pub kick_mode: bool,
    pub p0_theta: bool,
    pub p0_vel: bool,
    pub p1_theta: bool,
    pub p1_vel: bool,
}

impl LoadReport {
    pub fn applied(&self) -> usize {
        [
            self.mode,
            self.kick_mode,
            self.p0_theta,
            self.p0_vel,
            self.p1_theta,
            self.p1_vel,
        ]
        .iter()
        .filter(|&&b| b)
        .count()
    }
}

fn read_f64(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = obj.get(key)?;
    let parsed = value.as_f64();
    if parsed.is_none() {
        log::warn!("saved state: '{key}' is not a number ({value}), keeping current value");
    }
    parsed
}

fn read_tag<T>(obj: &Map<String, Value>, key: &str, decode: fn(i64) -> Option<T>) -> Option<T> {
    let value = obj.get(key)?;
    let decoded = value.as_i64().and_then(decode);
    if decoded.is_none() {
        log::warn!("saved state: '{key}' has unrecognised value {value}, keeping current mode");
    }
    decoded
}

/// Apply a saved document onto `state` and `modes`, field by field.
///
/// Fails only when `value` is not an object; nothing is touched then.
pub fn load_value(
    value: &Value,
    state: &mut PhysicalState,
    modes: &mut SimulationConfig,
) -> ChaosResult<LoadReport> {
    let obj = value.as_object().ok_or_else(|| {
        ChaosError::Persist(format!("saved state must be an object, got {value}"))
    })?;
    let mut report = LoadReport::default();

    if let Some(scheme) = read_tag(obj, KEY_MODE, IntegrationScheme::from_tag) {
        modes.integration_scheme = scheme;
        report.mode = true;
    }
    if let Some(policy) = read_tag(obj, KEY_KICK_MODE, KickPolicy::from_tag) {
        modes.kick_policy = policy;
        report.kick_mode = true;
    }
    if let Some(v) = read_f64(obj, KEY_P0_THETA) {
        state.p0.angle = v;
        report.p0_theta = true;
    }
    if let Some(v) = read_f64(obj, KEY_P0_VEL) {
        state.p0.angular_velocity = v;
        report.p0_vel = true;
    }
    if let Some(v) = read_f64(obj, KEY_P1_THETA) {
        state.p1.angle = v;
        report.p1_theta = true;
    }
    if let Some(v) = read_f64(obj, KEY_P1_VEL) {
        state.p1.angular_velocity = v;
        report.p1_vel = true;
    }
    state.update_positions();

    log::debug!("saved state: applied {} of 6 fields", report.applied());
    Ok(report)
}

/// Parse JSON text and apply it with [`load_value`].
pub fn load_json(
    json: &str,
    state: &mut PhysicalState,
    modes: &mut SimulationConfig,
) -> ChaosResult<LoadReport> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| ChaosError::Persist(format!("JSON parse error: {e}")))?;
    load_value(&value, state, modes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> (PhysicalState, SimulationConfig) {
        let mut state = PhysicalState::at_rest();
        state.p0.angle = 1.23;
        state.p0.angular_velocity = -0.4;
        state.p1.angle = 5.0;
        state.p1.angular_velocity = 0.7;
        let modes = SimulationConfig {
            integration_scheme: IntegrationScheme::Euler,
            kick_policy: KickPolicy::KeepVelocity,
        };
        (state, modes)
    }

    #[test]
    fn test_save_writes_every_key() {
        let (state, modes) = sample();
        let value = SavedState::capture(&state, &modes).to_value().unwrap();
        let obj = value.as_object().unwrap();
        for key in [KEY_MODE, KEY_KICK_MODE, KEY_P0_THETA, KEY_P0_VEL, KEY_P1_THETA, KEY_P1_VEL] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj[KEY_MODE], json!(1));
        assert_eq!(obj[KEY_KICK_MODE], json!(0));
    }

    #[test]
    fn test_round_trip_into_fresh_state() {
        let (state, modes) = sample();
        let text = SavedState::capture(&state, &modes).to_json().unwrap();

        let mut fresh = PhysicalState::at_rest();
        let mut fresh_modes = SimulationConfig::default();
        let report = load_json(&text, &mut fresh, &mut fresh_modes).unwrap();

        assert_eq!(report.applied(), 6);
        assert_eq!(fresh.p0.angle, 1.23);
        assert_eq!(fresh.p0.angular_velocity, -0.4);
        assert_eq!(fresh.p1.angle, 5.0);
        assert_eq!(fresh.p1.angular_velocity, 0.7);
        assert_eq!(fresh_modes, modes);
    }

    #[test]
    fn test_partial_load_leaves_other_fields() {
        let (mut state, mut modes) = sample();
        let before = state;
        let before_modes = modes;
        let report = load_value(&json!({ "p0_theta": 2.5 }), &mut state, &mut modes).unwrap();

        assert_eq!(report.applied(), 1);
        assert_eq!(state.p0.angle, 2.5);
        assert_eq!(state.p0.angular_velocity, before.p0.angular_velocity);
        assert_eq!(state.p1.angle, before.p1.angle);
        assert_eq!(state.p1.angular_velocity, before.p1.angular_velocity);
        assert_eq!(modes, before_modes);
    }

    #[test]
    fn test_malformed_fields_degrade_independently() {
        let (mut state, mut modes) = sample();
        let doc = json!({
            "mode": 9,
            "kick_mode": "clear",
            "p0_theta": "fast",
            "p0_vel": null,
            "p1_theta": 0.5,
            "unrelated": [1, 2, 3]
        });
        let report = load_value(&doc, &mut state, &mut modes).unwrap();

        assert_eq!(report.applied(), 1);
        assert!(report.p1_theta);
        assert_eq!(modes.integration_scheme, IntegrationScheme::Euler);
        assert_eq!(modes.kick_policy, KickPolicy::KeepVelocity);
        assert_eq!(state.p0.angle, 1.23);
        assert_eq!(state.p0.angular_velocity, -0.4);
        assert_eq!(state.p1.angle, 0.5);
    }

    #[test]
    fn test_integer_angles_accepted() {
        let (mut state, mut modes) = sample();
        load_value(&json!({ "p1_vel": 2 }), &mut state, &mut modes).unwrap();
        assert_eq!(state.p1.angular_velocity, 2.0);
    }

    #[test]
    fn test_non_object_rejected_without_changes() {
        let (mut state, mut modes) = sample();
        let before = state;
        assert!(matches!(
            load_value(&json!([1.0, 2.0]), &mut state, &mut modes),
            Err(ChaosError::Persist(_))
        ));
        assert!(load_json("{ not json", &mut state, &mut modes).is_err());
        assert_eq!(state, before);
    }
}
