//! Per-tick input model
//!
//! A [`FrameInput`] is the complete, immutable description of one
//! simulation step: the time delta plus every signal produced by every
//! device. The shape is deliberately a plain nested structure with no
//! handles and no cycles, so networking and replay collaborators can
//! serialize it directly; it is the wire contract of the kernel.
//!
//! Hierarchy: a frame holds [`DeviceBucket`]s (device 0 is the local host,
//! device N a remote peer), a bucket holds named [`SignalSource`]s (for
//! example a keyboard adaptor or a network channel), and a source holds
//! `(tag, value)` [`ActionSignal`] pairs. Sequencing across ticks is
//! implicit in call order; frames carry no timestamps.

pub mod adaptor;
pub mod binder;

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Typed payload of a single input signal
///
/// Producers pick the variant by convention per tag: buttons are `Bool`,
/// axes are `Scalar`, sticks and pointers are `Vector`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SignalValue {
    /// A button-like on/off state
    Bool(bool),
    /// A one-dimensional axis value
    Scalar(f32),
    /// A two-dimensional axis pair
    Vector(Vec2),
}

impl SignalValue {
    /// Boolean coercion: `Bool` as-is, `Scalar` is true when nonzero,
    /// `Vector` is always true
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Scalar(s) => *s != 0.0,
            Self::Vector(_) => true,
        }
    }

    /// The scalar payload, if this is a `Scalar`
    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Self::Scalar(s) => Some(*s),
            _ => None,
        }
    }

    /// The vector payload, if this is a `Vector`
    pub fn as_vector(&self) -> Option<Vec2> {
        match self {
            Self::Vector(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for SignalValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f32> for SignalValue {
    fn from(value: f32) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec2> for SignalValue {
    fn from(value: Vec2) -> Self {
        Self::Vector(value)
    }
}

/// A single `(tag, value)` signal within a source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSignal {
    /// Action name, e.g. `"Jump"`
    pub tag: String,
    /// Signal payload
    pub value: SignalValue,
}

impl ActionSignal {
    /// Create a signal
    pub fn new(tag: impl Into<String>, value: impl Into<SignalValue>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }
}

/// A named producer of signals within one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSource {
    /// Source identifier, e.g. `"Keyboard"` or `"Gamepad0"`
    pub id: String,
    /// Signals emitted this tick, in emission order
    pub signals: Vec<ActionSignal>,
}

impl SignalSource {
    /// Create an empty source
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            signals: Vec::new(),
        }
    }

    /// Find the signal with the given tag
    pub fn signal(&self, tag: &str) -> Option<&SignalValue> {
        self.signals.iter().find(|s| s.tag == tag).map(|s| &s.value)
    }

    /// Append a signal
    pub fn push(&mut self, tag: impl Into<String>, value: impl Into<SignalValue>) {
        self.signals.push(ActionSignal::new(tag, value));
    }
}

/// All input attributed to one machine for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceBucket {
    /// Which machine produced this input: 0 is the local host, N is remote
    /// peer N
    pub device_index: u32,
    /// Sources in append order
    pub sources: Vec<SignalSource>,
}

impl DeviceBucket {
    /// Create an empty bucket for a device
    pub fn new(device_index: u32) -> Self {
        Self {
            device_index,
            sources: Vec::new(),
        }
    }

    /// Find the source with the given id
    pub fn source(&self, id: &str) -> Option<&SignalSource> {
        self.sources.iter().find(|s| s.id == id)
    }

    /// Find the source with the given id, appending an empty one if absent
    pub fn source_mut(&mut self, id: &str) -> &mut SignalSource {
        let pos = match self.sources.iter().position(|s| s.id == id) {
            Some(pos) => pos,
            None => {
                self.sources.push(SignalSource::new(id));
                self.sources.len() - 1
            }
        };
        &mut self.sources[pos]
    }
}

/// Immutable input description for one simulation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Delta time for this step, in seconds
    pub dt: f32,

    /// Per-device input, in append order
    pub devices: Vec<DeviceBucket>,
}

impl FrameInput {
    /// Create an input frame with no signals
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            devices: Vec::new(),
        }
    }

    /// Find the bucket for a device index
    pub fn device(&self, device_index: u32) -> Option<&DeviceBucket> {
        self.devices.iter().find(|d| d.device_index == device_index)
    }

    /// Find the bucket for a device index, appending an empty one if absent
    ///
    /// This is the append half of the additive composition contract: every
    /// input producer merges into the existing bucket instead of replacing
    /// it, so later producers see and extend what earlier ones wrote.
    pub fn device_mut(&mut self, device_index: u32) -> &mut DeviceBucket {
        let pos = match self
            .devices
            .iter()
            .position(|d| d.device_index == device_index)
        {
            Some(pos) => pos,
            None => {
                self.devices.push(DeviceBucket::new(device_index));
                self.devices.len() - 1
            }
        };
        &mut self.devices[pos]
    }
}

/// The current and previous input frames, as seen by simulation hooks
///
/// Edge detection needs one tick of history; everything else reads only
/// `current`. Either side is `None` before the corresponding tick exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputWindow<'a> {
    /// Input for the tick being simulated
    pub current: Option<&'a FrameInput>,
    /// Input for the previous tick
    pub previous: Option<&'a FrameInput>,
}

impl InputWindow<'_> {
    /// A window with no frames on either side
    pub const EMPTY: InputWindow<'static> = InputWindow {
        current: None,
        previous: None,
    };
}
