// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — Cross-Thread Module Handle
// ─────────────────────────────────────────────────────────────────────
//! `SharedChaos` lets a host drive one voice from its audio callback while
//! a UI thread saves, loads, kicks or randomises it.
//!
//! Whole-module operations take a `parking_lot::Mutex` around the full
//! state, so a save never observes half of a step. Mode switches bypass
//! the lock and go straight to the atomic [`ModeFlags`].

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use chaos_types::{ChaosConfig, ChaosResult, PhysicalState, SimulationConfig};

use crate::module::{ChaosModule, Command, ModeFlags};
use crate::persist::LoadReport;
use crate::ports::HostIo;
use crate::signals::SignalFrame;

/// Thread-safe handle to a [`ChaosModule`]. Cloning shares the same voice.
#[derive(Clone)]
pub struct SharedChaos {
    inner: Arc<Mutex<ChaosModule>>,
    modes: Arc<ModeFlags>,
}

impl SharedChaos {
    pub fn new(module: ChaosModule) -> Self {
        let modes = module.mode_flags();
        Self {
            inner: Arc::new(Mutex::new(module)),
            modes,
        }
    }

    pub fn from_config(config: ChaosConfig) -> ChaosResult<Self> {
        Ok(Self::new(ChaosModule::new(config)?))
    }

    /// Audio-thread entry point. Contends only with whole-module UI
    /// operations, which may delay a single callback.
    pub fn process<H: HostIo + ?Sized>(&self, io: &mut H, sample_time: f64) -> bool {
        self.inner.lock().process(io, sample_time)
    }

    /// Mode switches are lock-free; everything else is applied under the lock.
    pub fn apply(&self, command: Command) {
        match command {
            Command::SetIntegration(scheme) => self.modes.set_scheme(scheme),
            Command::SetKickPolicy(policy) => self.modes.set_kick_policy(policy),
            _ => self.inner.lock().apply(command),
        }
    }

    pub fn save(&self) -> ChaosResult<Value> {
        self.inner.lock().save()
    }

    pub fn load(&self, value: &Value) -> ChaosResult<LoadReport> {
        self.inner.lock().load(value)
    }

    pub fn load_json(&self, json: &str) -> ChaosResult<LoadReport> {
        self.inner.lock().load_json(json)
    }

    /// Consistent copy of the arm state for a drawing layer.
    pub fn snapshot(&self) -> PhysicalState {
        *self.inner.lock().state()
    }

    pub fn last_frame(&self) -> SignalFrame {
        *self.inner.lock().last_frame()
    }

    pub fn simulation_config(&self) -> SimulationConfig {
        self.modes.load()
    }

    /// Run `f` with exclusive access to the module.
    pub fn with_module<T>(&self, f: impl FnOnce(&mut ChaosModule) -> T) -> T {
        f(&mut *self.inner.lock())
    }
}
