// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — Module Engine
// (C) 2026 Chaos Pendulum contributors. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Control-rate double-pendulum voice: reads knobs and CVs from a host,
//! advances the pendulum, and writes seven correlated CV channels.
//!
//! # Real-Time Invariants
//!
//! 1. **Decimated control rate**: the physics advances once every
//!    `control_rate_divisor` calls to [`ChaosModule::process`]. Inputs are
//!    sampled and outputs rewritten only on those ticks; in between the
//!    host keeps the previous voltages.
//!
//! 2. **No allocation, no locks, no logging in `process`**: the tick path
//!    performs arithmetic, one RNG draw pair per kick, and `SeqCst` atomic
//!    loads of the mode flags.
//!
//! 3. **Arm lengths always sum to one metre** and masses stay proportional
//!    to length. Only the ratio control moves them.
//!
//! 4. **Angles are stored in `[0, 2π)`** after every tick. Output angles
//!    are folded into `(−π, π]` before scaling.
//!
//! 5. **Mode switches are atomic**: a UI thread may change the integration
//!    scheme or kick policy at any time; the next tick observes the new
//!    value in full.

pub mod kick;
pub mod mapper;
pub mod module;
pub mod persist;
pub mod ports;
pub mod shared;
pub mod signals;

pub use kick::{KickController, SchmittTrigger};
pub use mapper::{ControlInputs, ControlParams, ParameterMapper};
pub use module::{ChaosModule, Command, ModeFlags};
pub use persist::{LoadReport, SavedState};
pub use ports::{FrameIo, HostIo, InputId, OutputId, ParamId, CHAOS_MODULE, MAX_CHANNELS};
pub use shared::SharedChaos;
pub use signals::{SignalFrame, SignalMapper, OUTPUT_CHANNELS};
