// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — Kernel Types
// (C) 2026 Chaos Pendulum contributors. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! State, configuration, and error types for the chaos pendulum kernel.

pub mod config;
pub mod error;
pub mod state;

pub use config::ChaosConfig;
pub use error::{ChaosError, ChaosResult};
pub use state::{ArmState, IntegrationScheme, KickPolicy, PhysicalState, Position, SimulationConfig};
