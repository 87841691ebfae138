// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — Kernel Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all chaos kernel failures.
///
/// None of these are raised on the per-sample path: out-of-range controls
/// are clamped there and numerical blow-ups are passed through.
#[derive(Error, Debug)]
pub enum ChaosError {
    /// Persisted state could not be read as a key/value document.
    #[error("persistence error: {0}")]
    Persist(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Unknown parameter, input or output name.
    #[error("port error: {0}")]
    Port(String),
}

pub type ChaosResult<T> = Result<T, ChaosError>;
