// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — Output Signal Mapping
// ─────────────────────────────────────────────────────────────────────
//! Seven correlated CV channels on one poly output:
//!
//! | ch | signal                              | scale          |
//! |----|-------------------------------------|----------------|
//! | 0  | tip x                               | ±peak          |
//! | 1  | tip y, inverted (up is positive)    | ±peak          |
//! | 2  | θ0 folded into (−π, π]              | ±peak          |
//! | 3  | θ1 folded into (−π, π]              | ±peak          |
//! | 4  | ω0                                  | raw            |
//! | 5  | ω1                                  | raw            |
//! | 6  | tip distance from the pivot         | 0..full scale  |
//!
//! Non-finite state yields non-finite voltages; no recovery is attempted.

use std::f64::consts::PI;

use chaos_physics::fold_signed;
use chaos_types::{ChaosConfig, PhysicalState};

use crate::ports::{HostIo, OutputId};

pub const OUTPUT_CHANNELS: usize = 7;

pub const CH_TIP_X: usize = 0;
pub const CH_TIP_Y: usize = 1;
pub const CH_ANGLE0: usize = 2;
pub const CH_ANGLE1: usize = 3;
pub const CH_VELOCITY0: usize = 4;
pub const CH_VELOCITY1: usize = 5;
pub const CH_DISTANCE: usize = 6;

pub type SignalFrame = [f64; OUTPUT_CHANNELS];

#[derive(Debug, Clone, Copy)]
pub struct SignalMapper {
    peak_voltage: f64,
    full_scale_voltage: f64,
}

impl SignalMapper {
    pub fn from_config(config: &ChaosConfig) -> Self {
        Self {
            peak_voltage: config.peak_voltage,
            full_scale_voltage: config.full_scale_voltage,
        }
    }

    /// Positions in `state` must be current.
    pub fn map(&self, state: &PhysicalState) -> SignalFrame {
        let tip = state.p1.position;
        let mut frame = [0.0; OUTPUT_CHANNELS];
        frame[CH_TIP_X] = tip.x * self.peak_voltage;
        frame[CH_TIP_Y] = -tip.y * self.peak_voltage;
        frame[CH_ANGLE0] = fold_signed(state.p0.angle) / PI * self.peak_voltage;
        frame[CH_ANGLE1] = fold_signed(state.p1.angle) / PI * self.peak_voltage;
        frame[CH_VELOCITY0] = state.p0.angular_velocity;
        frame[CH_VELOCITY1] = state.p1.angular_velocity;
        frame[CH_DISTANCE] = tip.norm() * self.full_scale_voltage;
        frame
    }

    pub fn write<H: HostIo + ?Sized>(&self, frame: &SignalFrame, io: &mut H) {
        for (channel, &voltage) in frame.iter().enumerate() {
            io.set_output(OutputId::PolyChaos, channel, voltage);
        }
        io.set_channels(OutputId::PolyChaos, OUTPUT_CHANNELS);
    }
}

impl Default for SignalMapper {
    fn default() -> Self {
        Self::from_config(&ChaosConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FrameIo;
    use std::f64::consts::FRAC_PI_2;

    fn posed(theta0: f64, theta1: f64) -> PhysicalState {
        let mut s = PhysicalState::at_rest();
        s.p0.angle = theta0;
        s.p1.angle = theta1;
        s.p0.angular_velocity = 0.75;
        s.p1.angular_velocity = -3.0;
        s.update_positions();
        s
    }

    #[test]
    fn test_hanging_at_rest() {
        let frame = SignalMapper::default().map(&posed(0.0, 0.0));
        assert!(frame[CH_TIP_X].abs() < 1e-12);
        assert!((frame[CH_TIP_Y] + 5.0).abs() < 1e-12, "tip y = {}", frame[CH_TIP_Y]);
        assert_eq!(frame[CH_ANGLE0], 0.0);
        assert!((frame[CH_DISTANCE] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverted_pendulum_points_up() {
        let frame = SignalMapper::default().map(&posed(PI, PI));
        assert!((frame[CH_TIP_Y] - 5.0).abs() < 1e-9);
        assert!((frame[CH_ANGLE0] - 5.0).abs() < 1e-12);
        assert!((frame[CH_ANGLE1] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_angles_fold_before_scaling() {
        let frame = SignalMapper::default().map(&posed(3.0 * FRAC_PI_2, FRAC_PI_2));
        // 3π/2 folds to −π/2.
        assert!((frame[CH_ANGLE0] + 2.5).abs() < 1e-9);
        assert!((frame[CH_ANGLE1] - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_velocities_pass_unscaled() {
        let frame = SignalMapper::default().map(&posed(0.3, 0.1));
        assert_eq!(frame[CH_VELOCITY0], 0.75);
        assert_eq!(frame[CH_VELOCITY1], -3.0);
    }

    #[test]
    fn test_write_sets_seven_channels() {
        let mapper = SignalMapper::default();
        let frame = mapper.map(&posed(0.3, 0.1));
        let mut io = FrameIo::new();
        mapper.write(&frame, &mut io);
        assert_eq!(io.channels, OUTPUT_CHANNELS);
        assert_eq!(io.active_outputs(), &frame[..]);
    }

    #[test]
    fn test_non_finite_state_is_not_masked() {
        let mut s = posed(0.0, 0.0);
        s.p1.angle = f64::NAN;
        s.update_positions();
        let frame = SignalMapper::default().map(&s);
        assert!(frame[CH_TIP_X].is_nan());
        assert!(frame[CH_DISTANCE].is_nan());
    }
}
