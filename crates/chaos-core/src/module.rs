// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — Voice Engine
// ─────────────────────────────────────────────────────────────────────
//! The per-sample entry point and the command interface of one chaos
//! voice.
//!
//! `process` runs the simulation on every `control_rate_divisor`-th call
//! only: map controls → detect kick → integrate → wrap angles → write the
//! seven output channels. Between ticks the outputs hold their last value.
//!
//! # Real-time invariants
//!
//! 1. **No allocation, I/O, logging or locking in `process`.** All state
//!    is a fixed-size value owned by the module.
//! 2. **Mode flags are single atomic stores.** A UI thread may switch the
//!    integration scheme or kick policy through [`ModeFlags`] at any time;
//!    the callback reads each flag once per tick.
//! 3. **Non-finite physics is not masked.** A blow-up shows on the outputs
//!    until a kick, randomise, load or reset replaces the state.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_json::Value;

use chaos_physics::{normalize_angle, Integrator};
use chaos_types::{
    ChaosConfig, ChaosResult, IntegrationScheme, KickPolicy, PhysicalState, SimulationConfig,
};

use crate::kick::{self, KickController};
use crate::mapper::{ControlInputs, ParameterMapper};
use crate::persist::{self, LoadReport, SavedState};
use crate::ports::{HostIo, InputId, ParamId};
use crate::signals::{SignalFrame, SignalMapper, OUTPUT_CHANNELS};

/// A user action, as raised by a context menu or a remote control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Kick now, same effect as a trigger edge.
    Kick,
    SetIntegration(IntegrationScheme),
    SetKickPolicy(KickPolicy),
    /// Random angles and velocities, regardless of kick policy.
    Randomize,
    /// Back to rest with default modes.
    Reset,
}

/// Scheme and policy as atomic tags, shareable with a UI thread.
#[derive(Debug)]
pub struct ModeFlags {
    scheme: AtomicU8,
    kick_policy: AtomicU8,
}

impl ModeFlags {
    pub fn new(modes: SimulationConfig) -> Self {
        Self {
            scheme: AtomicU8::new(modes.integration_scheme.tag()),
            kick_policy: AtomicU8::new(modes.kick_policy.tag()),
        }
    }

    pub fn scheme(&self) -> IntegrationScheme {
        IntegrationScheme::from_tag(i64::from(self.scheme.load(Ordering::SeqCst)))
            .unwrap_or_default()
    }

    pub fn kick_policy(&self) -> KickPolicy {
        KickPolicy::from_tag(i64::from(self.kick_policy.load(Ordering::SeqCst)))
            .unwrap_or_default()
    }

    pub fn set_scheme(&self, scheme: IntegrationScheme) {
        self.scheme.store(scheme.tag(), Ordering::SeqCst);
    }

    pub fn set_kick_policy(&self, policy: KickPolicy) {
        self.kick_policy.store(policy.tag(), Ordering::SeqCst);
    }

    pub fn load(&self) -> SimulationConfig {
        SimulationConfig {
            integration_scheme: self.scheme(),
            kick_policy: self.kick_policy(),
        }
    }

    pub fn store(&self, modes: SimulationConfig) {
        self.set_scheme(modes.integration_scheme);
        self.set_kick_policy(modes.kick_policy);
    }
}

impl Default for ModeFlags {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

/// One double-pendulum voice.
pub struct ChaosModule {
    config: ChaosConfig,
    mapper: ParameterMapper,
    integrator: Integrator,
    kick: KickController,
    signals: SignalMapper,
    modes: Arc<ModeFlags>,
    state: PhysicalState,
    calls: u64,
    ticks: u64,
    last_frame: SignalFrame,
    rng: SmallRng,
}

impl ChaosModule {
    /// Validated construction, seeded from the thread RNG.
    pub fn new(config: ChaosConfig) -> ChaosResult<Self> {
        config.validate()?;
        Ok(Self::with_rng(config, SmallRng::from_rng(&mut rand::rng())))
    }

    /// Deterministic construction for reproducible renders and tests.
    pub fn with_seed(config: ChaosConfig, seed: u64) -> ChaosResult<Self> {
        config.validate()?;
        Ok(Self::with_rng(config, SmallRng::seed_from_u64(seed)))
    }

    fn with_rng(config: ChaosConfig, rng: SmallRng) -> Self {
        Self {
            mapper: ParameterMapper::from_config(&config),
            integrator: Integrator::new(config.gravity),
            kick: KickController::from_config(&config),
            signals: SignalMapper::from_config(&config),
            modes: Arc::new(ModeFlags::default()),
            state: PhysicalState::at_rest(),
            calls: 0,
            ticks: 0,
            last_frame: [0.0; OUTPUT_CHANNELS],
            rng,
            config,
        }
    }

    /// Per-sample entry point. Returns `true` when this call was a
    /// control tick and the outputs were rewritten.
    pub fn process<H: HostIo + ?Sized>(&mut self, io: &mut H, sample_time: f64) -> bool {
        self.calls = self.calls.wrapping_add(1);
        if self.calls % u64::from(self.config.control_rate_divisor) != 0 {
            return false;
        }
        self.ticks = self.ticks.wrapping_add(1);

        let controls = ControlInputs::read(io);
        let params = self.mapper.map(&controls, sample_time);
        let modes = self.modes.load();

        let trigger = io.input_sum(InputId::KickTrigger) + io.param(ParamId::Kick);
        self.kick
            .process(trigger, &mut self.state, modes.kick_policy, &mut self.rng);

        self.mapper.apply(&params, &mut self.state);
        self.integrator.advance(
            &mut self.state,
            modes.integration_scheme,
            params.dt,
            params.damping,
        );
        self.state.p0.angle = normalize_angle(self.state.p0.angle);
        self.state.p1.angle = normalize_angle(self.state.p1.angle);
        self.state.update_positions();

        self.last_frame = self.signals.map(&self.state);
        self.signals.write(&self.last_frame, io);
        true
    }

    /// Apply a user action. Off the real-time path.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Kick => {
                let policy = self.modes.kick_policy();
                kick::kick(&mut self.state, policy, &mut self.rng);
                self.state.update_positions();
                log::info!("pendulums kicked ({policy:?})");
            }
            Command::SetIntegration(scheme) => {
                self.modes.set_scheme(scheme);
                log::info!("integrator: {}", scheme.label());
            }
            Command::SetKickPolicy(policy) => {
                self.modes.set_kick_policy(policy);
                log::info!("kick policy: {}", policy.label());
            }
            Command::Randomize => {
                kick::randomize(
                    &mut self.state,
                    self.config.randomize_velocity_span,
                    &mut self.rng,
                );
                self.state.update_positions();
                log::info!("pendulums randomised");
            }
            Command::Reset => {
                self.state = PhysicalState::at_rest();
                self.modes.store(SimulationConfig::default());
                self.kick.reset();
                self.calls = 0;
                self.ticks = 0;
                self.last_frame = [0.0; OUTPUT_CHANNELS];
                log::info!("chaos module reset");
            }
        }
    }

    /// Persisted document with every key present.
    pub fn save(&self) -> ChaosResult<Value> {
        SavedState::capture(&self.state, &self.modes.load()).to_value()
    }

    pub fn save_json(&self) -> ChaosResult<String> {
        SavedState::capture(&self.state, &self.modes.load()).to_json()
    }

    /// Field-by-field load; see [`persist::load_value`].
    pub fn load(&mut self, value: &Value) -> ChaosResult<LoadReport> {
        let mut modes = self.modes.load();
        let report = persist::load_value(value, &mut self.state, &mut modes)?;
        self.modes.store(modes);
        Ok(report)
    }

    pub fn load_json(&mut self, json: &str) -> ChaosResult<LoadReport> {
        let mut modes = self.modes.load();
        let report = persist::load_json(json, &mut self.state, &mut modes)?;
        self.modes.store(modes);
        Ok(report)
    }

    /// Handle for switching modes from another thread without locking.
    pub fn mode_flags(&self) -> Arc<ModeFlags> {
        Arc::clone(&self.modes)
    }

    pub fn simulation_config(&self) -> SimulationConfig {
        self.modes.load()
    }

    /// Current arm state, positions included, for drawing.
    pub fn state(&self) -> &PhysicalState {
        &self.state
    }

    /// Replace the arm state wholesale, e.g. to restore a snapshot.
    pub fn set_state(&mut self, state: PhysicalState) {
        self.state = state;
        self.state.update_positions();
    }

    pub fn config(&self) -> &ChaosConfig {
        &self.config
    }

    /// Output voltages of the latest control tick.
    pub fn last_frame(&self) -> &SignalFrame {
        &self.last_frame
    }

    /// Host calls since construction or reset.
    pub fn call_count(&self) -> u64 {
        self.calls
    }

    /// Control ticks since construction or reset.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }
}

impl Default for ChaosModule {
    fn default() -> Self {
        Self::with_rng(ChaosConfig::default(), SmallRng::from_rng(&mut rand::rng()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FrameIo;
    use crate::signals::{CH_VELOCITY0, CH_VELOCITY1};
    use std::f64::consts::TAU;

    const SAMPLE_TIME: f64 = 1.0 / 48_000.0;

    fn module() -> ChaosModule {
        ChaosModule::with_seed(ChaosConfig::default(), 1234).unwrap()
    }

    fn swinging(m: &mut ChaosModule) {
        let mut s = PhysicalState::at_rest();
        s.p0.angle = 1.0;
        s.p1.angle = 2.0;
        m.set_state(s);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = ChaosConfig {
            gravity: -1.0,
            ..Default::default()
        };
        assert!(ChaosModule::new(cfg).is_err());
    }

    #[test]
    fn test_decimation_every_fourth_call() {
        let mut m = module();
        swinging(&mut m);
        let mut io = FrameIo::new();
        let mut changes = 0;
        let mut ticked_on = Vec::new();
        for call in 1..=12 {
            let before = *m.state();
            let ticked = m.process(&mut io, SAMPLE_TIME);
            if *m.state() != before {
                changes += 1;
            }
            if ticked {
                ticked_on.push(call);
            }
        }
        assert_eq!(changes, 3);
        assert_eq!(ticked_on, vec![4, 8, 12]);
        assert_eq!(m.call_count(), 12);
        assert_eq!(m.tick_count(), 3);
    }

    #[test]
    fn test_outputs_only_after_first_tick() {
        let mut m = module();
        swinging(&mut m);
        let mut io = FrameIo::new();
        for _ in 0..3 {
            m.process(&mut io, SAMPLE_TIME);
        }
        assert_eq!(io.channels, 0);
        m.process(&mut io, SAMPLE_TIME);
        assert_eq!(io.channels, 7);
        assert_eq!(io.active_outputs(), &m.last_frame()[..]);
    }

    #[test]
    fn test_trigger_kick_clear_velocity() {
        let mut m = module();
        let mut s = PhysicalState::at_rest();
        s.p0.angular_velocity = 3.0;
        s.p1.angular_velocity = -1.0;
        m.set_state(s);
        let mut io = FrameIo::new();
        // Freeze time so the step after the kick cannot add velocity.
        io.set_param(ParamId::Timewarp, 0.0);
        io.set_input(InputId::KickTrigger, 10.0);
        for _ in 0..4 {
            m.process(&mut io, SAMPLE_TIME);
        }
        assert_eq!(m.state().p0.angular_velocity, 0.0);
        assert_eq!(m.state().p1.angular_velocity, 0.0);
        assert_eq!(m.last_frame()[CH_VELOCITY0], 0.0);
        assert_eq!(m.last_frame()[CH_VELOCITY1], 0.0);
    }

    #[test]
    fn test_kick_is_followed_by_a_step_on_the_same_tick() {
        let mut m = module();
        let mut s = PhysicalState::at_rest();
        s.p0.angular_velocity = 3.0;
        s.p1.angular_velocity = -1.0;
        m.set_state(s);
        let mut io = FrameIo::new();
        io.set_input(InputId::KickTrigger, 10.0);
        for _ in 0..4 {
            m.process(&mut io, SAMPLE_TIME);
        }
        // Velocities restart from zero and carry one step of gravity.
        let v0 = m.state().p0.angular_velocity;
        let v1 = m.state().p1.angular_velocity;
        assert!(v0.abs() < 1e-2 && v1.abs() < 1e-2, "v0={v0} v1={v1}");
        assert!(v0 != 0.0 || v1 != 0.0);
    }

    #[test]
    fn test_trigger_kick_keep_velocity() {
        let mut m = module();
        m.apply(Command::SetKickPolicy(KickPolicy::KeepVelocity));
        let mut s = PhysicalState::at_rest();
        s.p0.angular_velocity = 3.0;
        s.p1.angular_velocity = -1.0;
        m.set_state(s);
        let mut io = FrameIo::new();
        io.set_param(ParamId::Timewarp, 0.0);
        io.set_param(ParamId::Kick, 1.0);
        for _ in 0..4 {
            m.process(&mut io, SAMPLE_TIME);
        }
        assert_eq!(m.state().p0.angular_velocity, 3.0);
        assert_eq!(m.state().p1.angular_velocity, -1.0);
        assert_ne!(m.state().p0.angle, 0.0);
    }

    #[test]
    fn test_held_trigger_kicks_once() {
        let mut m = module();
        let mut io = FrameIo::new();
        io.set_param(ParamId::Timewarp, 0.0);
        io.set_input(InputId::KickTrigger, 5.0);
        for _ in 0..4 {
            m.process(&mut io, SAMPLE_TIME);
        }
        let after_kick = *m.state();
        for _ in 0..16 {
            m.process(&mut io, SAMPLE_TIME);
        }
        assert_eq!(m.state().p0.angle, after_kick.p0.angle);
        assert_eq!(m.state().p1.angle, after_kick.p1.angle);
    }

    #[test]
    fn test_angles_stay_normalised() {
        let mut m = module();
        let mut io = FrameIo::new();
        io.set_param(ParamId::Timewarp, 6.0);
        m.apply(Command::Randomize);
        for _ in 0..4000 {
            m.process(&mut io, SAMPLE_TIME);
        }
        let s = m.state();
        if s.p0.angle.is_finite() && s.p1.angle.is_finite() {
            assert!((0.0..TAU).contains(&s.p0.angle), "θ0 = {}", s.p0.angle);
            assert!((0.0..TAU).contains(&s.p1.angle), "θ1 = {}", s.p1.angle);
        }
    }

    #[test]
    fn test_euler_mode_runs() {
        let mut m = module();
        swinging(&mut m);
        m.apply(Command::SetIntegration(IntegrationScheme::Euler));
        let mut io = FrameIo::new();
        for _ in 0..4 {
            m.process(&mut io, SAMPLE_TIME);
        }
        assert_ne!(m.state().p0.angular_acceleration, 0.0);
        assert_eq!(m.simulation_config().integration_scheme, IntegrationScheme::Euler);
    }

    #[test]
    fn test_command_kick_matches_policy() {
        let mut m = module();
        let mut s = PhysicalState::at_rest();
        s.p0.angular_velocity = 2.0;
        m.set_state(s);
        m.apply(Command::Kick);
        assert_eq!(m.state().p0.angular_velocity, 0.0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut m = module();
        m.apply(Command::SetIntegration(IntegrationScheme::Euler));
        m.apply(Command::SetKickPolicy(KickPolicy::KeepVelocity));
        m.apply(Command::Randomize);
        let mut io = FrameIo::new();
        for _ in 0..6 {
            m.process(&mut io, SAMPLE_TIME);
        }
        m.apply(Command::Reset);
        assert_eq!(*m.state(), PhysicalState::at_rest());
        assert_eq!(m.simulation_config(), SimulationConfig::default());
        assert_eq!(m.call_count(), 0);
        assert_eq!(m.last_frame(), &[0.0; OUTPUT_CHANNELS]);
    }

    #[test]
    fn test_save_load_between_modules() {
        let mut a = module();
        swinging(&mut a);
        a.apply(Command::SetIntegration(IntegrationScheme::Euler));
        let saved = a.save().unwrap();

        let mut b = module();
        let report = b.load(&saved).unwrap();
        assert_eq!(report.applied(), 6);
        assert_eq!(b.state().p0.angle, 1.0);
        assert_eq!(b.state().p1.angle, 2.0);
        assert_eq!(b.simulation_config().integration_scheme, IntegrationScheme::Euler);
        // Loaded positions are current for drawing.
        assert_eq!(b.state().p1.position, a.state().p1.position);
    }

    #[test]
    fn test_ui_thread_mode_switch() {
        let m = module();
        let flags = m.mode_flags();
        std::thread::spawn(move || flags.set_scheme(IntegrationScheme::Euler))
            .join()
            .unwrap();
        assert_eq!(m.simulation_config().integration_scheme, IntegrationScheme::Euler);
    }

    #[test]
    fn test_rest_with_zero_dt_is_fixed_point() {
        let mut m = module();
        let mut io = FrameIo::new();
        io.set_param(ParamId::Timewarp, 0.0);
        for _ in 0..8 {
            m.process(&mut io, SAMPLE_TIME);
        }
        assert_eq!(m.state().to_vector(), [0.0; 4]);
    }
}
