// ─────────────────────────────────────────────────────────────────────
// Chaos Pendulum — Port Declarations and Host Interface
// ─────────────────────────────────────────────────────────────────────
//! Declarative description of the panel (params, inputs, outputs) and the
//! `HostIo` trait through which the host hands over one sample's worth of
//! control values and receives the output voltages.

use chaos_types::{ChaosError, ChaosResult};

/// Maximum polyphony a host output port can carry.
pub const MAX_CHANNELS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    Timewarp = 0,
    LengthRatio = 1,
    Damping = 2,
    Kick = 3,
}

impl ParamId {
    pub const COUNT: usize = 4;
    pub const ALL: [ParamId; Self::COUNT] =
        [Self::Timewarp, Self::LengthRatio, Self::Damping, Self::Kick];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputId {
    TimewarpCv = 0,
    RatioCv = 1,
    DampingCv = 2,
    KickTrigger = 3,
}

impl InputId {
    pub const COUNT: usize = 4;
    pub const ALL: [InputId; Self::COUNT] = [
        Self::TimewarpCv,
        Self::RatioCv,
        Self::DampingCv,
        Self::KickTrigger,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputId {
    PolyChaos = 0,
}

impl OutputId {
    pub const COUNT: usize = 1;

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A front-panel control with its range and default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    pub id: ParamId,
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub unit: &'static str,
}

/// A jack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortDescriptor<I> {
    pub id: I,
    pub name: &'static str,
}

/// Everything the host needs to lay out the module, enumerated once.
#[derive(Debug, Clone, Copy)]
pub struct ModuleDescriptor {
    pub slug: &'static str,
    pub params: [ParamDescriptor; ParamId::COUNT],
    pub inputs: [PortDescriptor<InputId>; InputId::COUNT],
    pub outputs: [PortDescriptor<OutputId>; OutputId::COUNT],
    /// Channels carried by the poly output while running.
    pub output_channels: usize,
}

pub const CHAOS_MODULE: ModuleDescriptor = ModuleDescriptor {
    slug: "Chaos",
    params: [
        ParamDescriptor {
            id: ParamId::Timewarp,
            name: "Timewarp",
            min: 0.01,
            max: 6.0,
            default: 1.0,
            unit: "x",
        },
        ParamDescriptor {
            id: ParamId::LengthRatio,
            name: "Ratio",
            min: 0.1,
            max: 0.9,
            default: 0.5,
            unit: "",
        },
        ParamDescriptor {
            id: ParamId::Damping,
            name: "Dampen",
            min: 0.0,
            max: 1.0,
            default: 0.0,
            unit: "",
        },
        ParamDescriptor {
            id: ParamId::Kick,
            name: "Kick",
            min: 0.0,
            max: 1.0,
            default: 0.0,
            unit: "",
        },
    ],
    inputs: [
        PortDescriptor {
            id: InputId::TimewarpCv,
            name: "Timewarp CV",
        },
        PortDescriptor {
            id: InputId::RatioCv,
            name: "Ratio CV",
        },
        PortDescriptor {
            id: InputId::DampingCv,
            name: "Damping CV",
        },
        PortDescriptor {
            id: InputId::KickTrigger,
            name: "Kick trigger",
        },
    ],
    outputs: [PortDescriptor {
        id: OutputId::PolyChaos,
        name: "Poly chaos",
    }],
    output_channels: crate::signals::OUTPUT_CHANNELS,
};

impl ModuleDescriptor {
    #[inline]
    pub fn param(&self, id: ParamId) -> &ParamDescriptor {
        &self.params[id.index()]
    }

    pub fn param_by_name(&self, name: &str) -> ChaosResult<&ParamDescriptor> {
        self.params
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ChaosError::Port(format!("unknown param '{name}'")))
    }

    #[inline]
    pub fn input(&self, id: InputId) -> &PortDescriptor<InputId> {
        &self.inputs[id.index()]
    }

    pub fn input_by_name(&self, name: &str) -> ChaosResult<InputId> {
        InputId::ALL
            .into_iter()
            .find(|&id| self.input(id).name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ChaosError::Port(format!("unknown input '{name}'")))
    }

    /// Panel defaults, indexed by [`ParamId::index`].
    pub fn default_params(&self) -> [f64; ParamId::COUNT] {
        ParamId::ALL.map(|id| self.param(id).default)
    }
}

/// The host side of one `process` call.
///
/// Inputs are read as the sum of every cable connected to the jack.
/// Implementations must not allocate or block.
pub trait HostIo {
    fn param(&self, id: ParamId) -> f64;
    fn input_sum(&self, id: InputId) -> f64;
    fn set_output(&mut self, id: OutputId, channel: usize, voltage: f64);
    fn set_channels(&mut self, id: OutputId, channels: usize);
}

/// Fixed-size, stack-only `HostIo` used by tests, benchmarks and the
/// Python bindings.
#[derive(Debug, Clone)]
pub struct FrameIo {
    pub params: [f64; ParamId::COUNT],
    pub inputs: [f64; InputId::COUNT],
    pub outputs: [f64; MAX_CHANNELS],
    pub channels: usize,
}

impl FrameIo {
    /// Panel at its defaults, nothing patched.
    pub fn new() -> Self {
        Self {
            params: CHAOS_MODULE.default_params(),
            inputs: [0.0; InputId::COUNT],
            outputs: [0.0; MAX_CHANNELS],
            channels: 0,
        }
    }

    pub fn set_param(&mut self, id: ParamId, value: f64) {
        self.params[id.index()] = value;
    }

    pub fn set_input(&mut self, id: InputId, voltage: f64) {
        self.inputs[id.index()] = voltage;
    }

    /// The active channels of the poly output.
    pub fn active_outputs(&self) -> &[f64] {
        &self.outputs[..self.channels.min(MAX_CHANNELS)]
    }
}

impl Default for FrameIo {
    fn default() -> Self {
        Self::new()
    }
}

impl HostIo for FrameIo {
    #[inline]
    fn param(&self, id: ParamId) -> f64 {
        self.params[id.index()]
    }

    #[inline]
    fn input_sum(&self, id: InputId) -> f64 {
        self.inputs[id.index()]
    }

    #[inline]
    fn set_output(&mut self, _id: OutputId, channel: usize, voltage: f64) {
        if let Some(slot) = self.outputs.get_mut(channel) {
            *slot = voltage;
        }
    }

    #[inline]
    fn set_channels(&mut self, _id: OutputId, channels: usize) {
        self.channels = channels.min(MAX_CHANNELS);
    }
}
