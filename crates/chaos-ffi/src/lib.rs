// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — PyO3 FFI Bindings
// (C) 2026 Chaos Pendulum contributors. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied — PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the Rust chaos pendulum voice.
//!
//! Exposes `ChaosConfig` and `RustChaosModule` to Python via PyO3, for
//! offline rendering, plotting and regression checks of the CV outputs.
//!
//! # FFI Safety
//!
//! - Config validated before storage (`ChaosConfig::validate()`).
//! - Unknown knob, jack or mode names raise `ValueError`; nothing is
//!   silently ignored.
//! - Each `RustChaosModule` owns its voice; no state is shared across
//!   Python objects.
//!
//! Install: `pip install -e crates/chaos-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from chaos_kernel import RustChaosModule
//!
//! voice = RustChaosModule(seed=7)
//! voice.set_param("Timewarp", 2.0)
//! voice.randomize()
//! frames = voice.render(48_000, 1.0 / 48_000)
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use chaos_core::{ChaosModule, Command, FrameIo, InputId, ParamId, CHAOS_MODULE};
use chaos_types::{ArmState, ChaosConfig, ChaosError, IntegrationScheme, KickPolicy};

fn to_py_err(e: ChaosError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// ─── PyChaosConfig ──────────────────────────────────────────────────

/// Python-visible configuration for a pendulum voice.
#[pyclass(name = "ChaosConfig")]
#[derive(Clone)]
struct PyChaosConfig {
    inner: ChaosConfig,
}

#[pymethods]
impl PyChaosConfig {
    #[new]
    #[pyo3(signature = (
        gravity = 9.81,
        mass_per_length = 10.0,
        control_rate_divisor = 4,
        full_scale_voltage = 10.0,
        peak_voltage = 5.0,
        min_length_ratio = 0.1,
        max_length_ratio = 0.9,
        max_dt = 6.0,
        damping_factor = 0.99999,
        damping_threshold = 0.1,
        trigger_low = 0.0,
        trigger_high = 1.0,
        randomize_velocity_span = 5.0,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        gravity: f64,
        mass_per_length: f64,
        control_rate_divisor: u32,
        full_scale_voltage: f64,
        peak_voltage: f64,
        min_length_ratio: f64,
        max_length_ratio: f64,
        max_dt: f64,
        damping_factor: f64,
        damping_threshold: f64,
        trigger_low: f64,
        trigger_high: f64,
        randomize_velocity_span: f64,
    ) -> PyResult<Self> {
        let config = ChaosConfig {
            gravity,
            mass_per_length,
            control_rate_divisor,
            full_scale_voltage,
            peak_voltage,
            min_length_ratio,
            max_length_ratio,
            max_dt,
            damping_factor,
            damping_threshold,
            trigger_low,
            trigger_high,
            randomize_velocity_span,
        };
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string. Missing keys take their defaults.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = ChaosConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    #[getter]
    fn control_rate_divisor(&self) -> u32 {
        self.inner.control_rate_divisor
    }

    #[getter]
    fn gravity(&self) -> f64 {
        self.inner.gravity
    }

    fn __repr__(&self) -> String {
        format!(
            "ChaosConfig(gravity={}, divisor={}, peak_voltage={}, max_dt={})",
            self.inner.gravity,
            self.inner.control_rate_divisor,
            self.inner.peak_voltage,
            self.inner.max_dt
        )
    }
}

// ─── RustChaosModule ────────────────────────────────────────────────

fn arm_dict<'py>(py: Python<'py>, arm: &ArmState) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("angle", arm.angle)?;
    dict.set_item("angular_velocity", arm.angular_velocity)?;
    dict.set_item("angular_acceleration", arm.angular_acceleration)?;
    dict.set_item("length", arm.length)?;
    dict.set_item("mass", arm.mass)?;
    dict.set_item("x", arm.position.x)?;
    dict.set_item("y", arm.position.y)?;
    Ok(dict)
}

/// One double-pendulum voice with its own panel and jacks.
#[pyclass(name = "RustChaosModule")]
struct PyChaosModule {
    inner: ChaosModule,
    io: FrameIo,
}

#[pymethods]
impl PyChaosModule {
    #[new]
    #[pyo3(signature = (config = None, seed = None))]
    fn new(config: Option<PyChaosConfig>, seed: Option<u64>) -> PyResult<Self> {
        let config = config.map(|c| c.inner).unwrap_or_default();
        let inner = match seed {
            Some(seed) => ChaosModule::with_seed(config, seed),
            None => ChaosModule::new(config),
        }
        .map_err(to_py_err)?;
        Ok(Self {
            inner,
            io: FrameIo::new(),
        })
    }

    /// Knob names accepted by `set_param`, in panel order.
    #[staticmethod]
    fn param_names() -> Vec<&'static str> {
        ParamId::ALL
            .iter()
            .map(|&id| CHAOS_MODULE.param(id).name)
            .collect()
    }

    /// Jack names accepted by `set_input`, in panel order.
    #[staticmethod]
    fn input_names() -> Vec<&'static str> {
        InputId::ALL
            .iter()
            .map(|&id| CHAOS_MODULE.input(id).name)
            .collect()
    }

    /// Set a panel knob by name ("Timewarp", "Ratio", "Dampen", "Kick").
    fn set_param(&mut self, name: &str, value: f64) -> PyResult<()> {
        let id = CHAOS_MODULE.param_by_name(name).map_err(to_py_err)?.id;
        self.io.set_param(id, value);
        Ok(())
    }

    /// Set the summed voltage on an input jack.
    fn set_input(&mut self, name: &str, voltage: f64) -> PyResult<()> {
        let id = CHAOS_MODULE.input_by_name(name).map_err(to_py_err)?;
        self.io.set_input(id, voltage);
        Ok(())
    }

    /// One host call. Returns True when it was a control tick.
    fn process(&mut self, sample_time: f64) -> bool {
        self.inner.process(&mut self.io, sample_time)
    }

    /// Run `n_samples` host calls. Returns the output frame of every tick.
    fn render(&mut self, n_samples: usize, sample_time: f64) -> Vec<Vec<f64>> {
        let divisor = self.inner.config().control_rate_divisor.max(1) as usize;
        let mut frames = Vec::with_capacity(n_samples / divisor + 1);
        for _ in 0..n_samples {
            if self.inner.process(&mut self.io, sample_time) {
                frames.push(self.inner.last_frame().to_vec());
            }
        }
        frames
    }

    /// Current voltages on the poly output.
    fn outputs(&self) -> Vec<f64> {
        self.io.active_outputs().to_vec()
    }

    fn last_frame(&self) -> Vec<f64> {
        self.inner.last_frame().to_vec()
    }

    fn kick(&mut self) {
        self.inner.apply(Command::Kick);
    }

    fn randomize(&mut self) {
        self.inner.apply(Command::Randomize);
    }

    fn reset(&mut self) {
        self.inner.apply(Command::Reset);
        self.io = FrameIo::new();
    }

    /// 0 = Runge-Kutta, 1 = Euler.
    fn set_integration(&mut self, mode: i64) -> PyResult<()> {
        let scheme = IntegrationScheme::from_tag(mode)
            .ok_or_else(|| PyValueError::new_err(format!("unknown integration mode {mode}")))?;
        self.inner.apply(Command::SetIntegration(scheme));
        Ok(())
    }

    /// 0 = keep velocity, 1 = clear velocity.
    fn set_kick_policy(&mut self, mode: i64) -> PyResult<()> {
        let policy = KickPolicy::from_tag(mode)
            .ok_or_else(|| PyValueError::new_err(format!("unknown kick mode {mode}")))?;
        self.inner.apply(Command::SetKickPolicy(policy));
        Ok(())
    }

    #[getter]
    fn integration(&self) -> &'static str {
        self.inner.simulation_config().integration_scheme.label()
    }

    #[getter]
    fn kick_policy(&self) -> &'static str {
        self.inner.simulation_config().kick_policy.label()
    }

    #[getter]
    fn call_count(&self) -> u64 {
        self.inner.call_count()
    }

    #[getter]
    fn tick_count(&self) -> u64 {
        self.inner.tick_count()
    }

    fn save_json(&self) -> PyResult<String> {
        self.inner.save_json().map_err(to_py_err)
    }

    /// Apply a saved document. Returns how many fields were taken.
    fn load_json(&mut self, json: &str) -> PyResult<usize> {
        let report = self.inner.load_json(json).map_err(to_py_err)?;
        Ok(report.applied())
    }

    /// Both arms, for plotting. Keys: "p0", "p1", each a dict.
    fn state<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let s = self.inner.state();
        let dict = PyDict::new(py);
        dict.set_item("p0", arm_dict(py, &s.p0)?)?;
        dict.set_item("p1", arm_dict(py, &s.p1)?)?;
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        let s = self.inner.state();
        format!(
            "RustChaosModule(theta0={:.4}, theta1={:.4}, ticks={}, mode={:?})",
            s.p0.angle,
            s.p1.angle,
            self.inner.tick_count(),
            self.inner.simulation_config().integration_scheme
        )
    }
}

// ─── Module Registration ────────────────────────────────────────────

/// Chaos kernel: Rust double-pendulum CV generator.
///
/// - `ChaosConfig`: configuration
/// - `RustChaosModule`: one voice with panel, jacks and poly output
#[pymodule]
fn chaos_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyChaosConfig>()?;
    m.add_class::<PyChaosModule>()?;
    m.add("OUTPUT_CHANNELS", chaos_core::OUTPUT_CHANNELS)?;
    Ok(())
}
