// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — Physical State Types
// ─────────────────────────────────────────────────────────────────────
//! Arm states, the two-arm physical state and the persisted mode enums.

use serde::{Deserialize, Serialize};

/// Cartesian point in normalised arm-length units.
///
/// `y` grows downward: a pendulum hanging at rest sits at positive `y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Euclidean distance from the pivot.
    #[inline]
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// State of a single pendulum arm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmState {
    /// Angular displacement from vertical (rad).
    pub angle: f64,
    /// Angular velocity (rad / time unit).
    pub angular_velocity: f64,
    /// Last angular acceleration written by the Euler path.
    pub angular_acceleration: f64,
    /// Fraction of the total arm length, in [0.1, 0.9].
    pub length: f64,
    /// Always `length * mass_per_length`; see [`PhysicalState::set_length_ratio`].
    pub mass: f64,
    /// Derived from angle and length, never persisted.
    #[serde(skip)]
    pub position: Position,
}

impl ArmState {
    pub const REST_LENGTH: f64 = 0.5;
    pub const REST_MASS: f64 = 5.0;
}

impl Default for ArmState {
    fn default() -> Self {
        Self {
            angle: 0.0,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
            length: Self::REST_LENGTH,
            mass: Self::REST_MASS,
            position: Position::default(),
        }
    }
}

/// Both arms of the double pendulum: `p0` hangs from the pivot,
/// `p1` hangs from the tip of `p0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalState {
    pub p0: ArmState,
    pub p1: ArmState,
}

impl PhysicalState {
    /// Both arms at rest, lengths split evenly.
    pub fn at_rest() -> Self {
        let mut state = Self::default();
        state.update_positions();
        state
    }

    /// Assign the proximal length ratio and recompute both masses.
    ///
    /// Both lengths land in `[min_length, max_length]` and sum to 1 within
    /// one ulp. The bounds must be symmetric about 0.5.
    pub fn set_length_ratio(
        &mut self,
        ratio: f64,
        min_length: f64,
        max_length: f64,
        mass_per_length: f64,
    ) {
        self.p0.length = ratio.clamp(min_length, max_length);
        // 1 − 0.9 rounds to just under 0.1, so the complement is clamped too.
        self.p1.length = (1.0 - self.p0.length).clamp(min_length, max_length);
        self.p0.mass = self.p0.length * mass_per_length;
        self.p1.mass = self.p1.length * mass_per_length;
    }

    /// Recompute both arm positions from angles and lengths.
    pub fn update_positions(&mut self) {
        let p0 = Position {
            x: self.p0.length * self.p0.angle.sin(),
            y: self.p0.length * self.p0.angle.cos(),
        };
        let p1 = Position {
            x: p0.x + self.p1.length * self.p1.angle.sin(),
            y: p0.y + self.p1.length * self.p1.angle.cos(),
        };
        self.p0.position = p0;
        self.p1.position = p1;
    }

    /// `[θ0, ω0, θ1, ω1]`.
    #[inline]
    pub fn to_vector(&self) -> [f64; 4] {
        [
            self.p0.angle,
            self.p0.angular_velocity,
            self.p1.angle,
            self.p1.angular_velocity,
        ]
    }

    /// Copy angles and velocities from `[θ0, ω0, θ1, ω1]`, keeping lengths and masses.
    #[inline]
    pub fn with_vector(&self, x: &[f64; 4]) -> Self {
        let mut s = *self;
        s.p0.angle = x[0];
        s.p0.angular_velocity = x[1];
        s.p1.angle = x[2];
        s.p1.angular_velocity = x[3];
        s
    }
}

/// Numerical scheme used to advance the state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntegrationScheme {
    /// Classic 4th-order Runge-Kutta (accurate, four derivative calls).
    #[default]
    Rk4,
    /// Semi-implicit explicit Euler (cheap, one derivative call).
    Euler,
}

impl IntegrationScheme {
    pub const fn tag(self) -> u8 {
        match self {
            Self::Rk4 => 0,
            Self::Euler => 1,
        }
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            0 => Some(Self::Rk4),
            1 => Some(Self::Euler),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Rk4 => "Runge Kutta (expensive)",
            Self::Euler => "Euler (cheap)",
        }
    }
}

/// What a kick does to the arm velocities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KickPolicy {
    KeepVelocity,
    #[default]
    ClearVelocity,
}

impl KickPolicy {
    pub const fn tag(self) -> u8 {
        match self {
            Self::KeepVelocity => 0,
            Self::ClearVelocity => 1,
        }
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            0 => Some(Self::KeepVelocity),
            1 => Some(Self::ClearVelocity),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::KeepVelocity => "Keep Velocity on Kick",
            Self::ClearVelocity => "Clear Velocity on Kick",
        }
    }
}

/// Persisted mode selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub integration_scheme: IntegrationScheme,
    pub kick_policy: KickPolicy,
}
