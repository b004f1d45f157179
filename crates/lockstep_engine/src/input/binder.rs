//! Typed queries over the per-tick input
//!
//! An [`ActionBinder`] is a tuner dialed to one `(device, source)` pair. It
//! owns no input; every query resolves against the [`InputWindow`] the
//! caller passes in, so the same binder works in any hook and never holds a
//! stale frame.

use crate::input::{FrameInput, InputWindow, SignalValue};
use crate::math::Vec2;

/// How a binder picks the device bucket to read
pub enum DeviceSelector {
    /// Always read this device index
    Fixed(u32),
    /// Re-evaluate on every query; supports handing a binder to another
    /// player at runtime
    Dynamic(Box<dyn Fn() -> u32>),
}

impl DeviceSelector {
    fn resolve(&self) -> u32 {
        match self {
            Self::Fixed(index) => *index,
            Self::Dynamic(f) => f(),
        }
    }
}

impl std::fmt::Debug for DeviceSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(index) => f.debug_tuple("Fixed").field(index).finish(),
            Self::Dynamic(_) => f.debug_tuple("Dynamic").finish(),
        }
    }
}

/// Query facade over one signal source of one device
///
/// Resolution walks the chain device → source → tag; a missing link at any
/// step reads as "no signal", never as an error.
#[derive(Debug)]
pub struct ActionBinder {
    source_id: String,
    device: DeviceSelector,
}

impl ActionBinder {
    /// Bind to a source on the local host device
    pub fn new(source_id: impl Into<String>) -> Self {
        Self::for_device(source_id, 0)
    }

    /// Bind to a source on a fixed device index
    pub fn for_device(source_id: impl Into<String>, device_index: u32) -> Self {
        Self {
            source_id: source_id.into(),
            device: DeviceSelector::Fixed(device_index),
        }
    }

    /// Bind to a source on a device chosen per query
    pub fn with_selector(source_id: impl Into<String>, selector: impl Fn() -> u32 + 'static) -> Self {
        Self {
            source_id: source_id.into(),
            device: DeviceSelector::Dynamic(Box::new(selector)),
        }
    }

    /// The source id this binder reads
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Replace the device selection, keeping the source id
    pub fn rebind_device(&mut self, device: DeviceSelector) {
        self.device = device;
    }

    /// Replace the source id, keeping the device selection
    pub fn rebind_source(&mut self, source_id: impl Into<String>) {
        self.source_id = source_id.into();
    }

    fn signal_in<'a>(&self, frame: &'a FrameInput, tag: &str) -> Option<&'a SignalValue> {
        frame
            .device(self.device.resolve())?
            .source(&self.source_id)?
            .signal(tag)
    }

    /// Look up a signal in the current frame
    pub fn signal<'a>(&self, window: InputWindow<'a>, tag: &str) -> Option<&'a SignalValue> {
        self.signal_in(window.current?, tag)
    }

    /// Whether the signal reads as held this frame
    pub fn is_action(&self, window: InputWindow<'_>, tag: &str) -> bool {
        self.signal(window, tag).is_some_and(SignalValue::as_bool)
    }

    /// Rising-edge detection: held this frame, not held (or absent) last
    /// frame
    ///
    /// A missing previous frame always counts as not held, so a press on
    /// the very first tick registers.
    pub fn is_action_just_pressed(&self, window: InputWindow<'_>, tag: &str) -> bool {
        let current = self.is_action(window, tag);
        let previous = window
            .previous
            .and_then(|frame| self.signal_in(frame, tag))
            .is_some_and(SignalValue::as_bool);
        current && !previous
    }

    /// Scalar value of the signal, or 0.0 for anything that is not a scalar
    pub fn axis(&self, window: InputWindow<'_>, tag: &str) -> f32 {
        self.signal(window, tag)
            .and_then(SignalValue::as_scalar)
            .unwrap_or(0.0)
    }

    /// Vector value of the signal, or zeros for anything that is not a
    /// vector
    pub fn vector(&self, window: InputWindow<'_>, tag: &str) -> Vec2 {
        self.signal(window, tag)
            .and_then(SignalValue::as_vector)
            .unwrap_or_else(Vec2::zeros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(device_index: u32, source: &str, signals: &[(&str, SignalValue)]) -> FrameInput {
        let mut input = FrameInput::new(0.016);
        let src = input.device_mut(device_index).source_mut(source);
        for (tag, value) in signals {
            src.push(*tag, *value);
        }
        input
    }

    fn window<'a>(current: &'a FrameInput, previous: Option<&'a FrameInput>) -> InputWindow<'a> {
        InputWindow {
            current: Some(current),
            previous,
        }
    }

    #[test]
    fn missing_links_resolve_to_no_signal() {
        let binder = ActionBinder::new("Keyboard");
        let current = frame(1, "Keyboard", &[("Fire", SignalValue::Bool(true))]);

        // Wrong device, then wrong source, then wrong tag.
        assert!(binder.signal(window(&current, None), "Fire").is_none());
        let current = frame(0, "Gamepad", &[("Fire", SignalValue::Bool(true))]);
        assert!(binder.signal(window(&current, None), "Fire").is_none());
        let current = frame(0, "Keyboard", &[("Jump", SignalValue::Bool(true))]);
        assert!(binder.signal(window(&current, None), "Fire").is_none());
        assert!(!binder.is_action(window(&current, None), "Fire"));
        assert!(binder.signal(InputWindow::EMPTY, "Fire").is_none());
    }

    #[test]
    fn held_signal_is_not_just_pressed() {
        let binder = ActionBinder::new("Keyboard");
        let held = frame(0, "Keyboard", &[("Fire", SignalValue::Bool(true))]);
        let previous = held.clone();
        assert!(binder.is_action(window(&held, Some(&previous)), "Fire"));
        assert!(!binder.is_action_just_pressed(window(&held, Some(&previous)), "Fire"));
    }

    #[test]
    fn press_on_first_frame_registers_as_edge() {
        let binder = ActionBinder::new("Keyboard");
        let current = frame(0, "Keyboard", &[("Fire", SignalValue::Bool(true))]);
        assert!(binder.is_action_just_pressed(window(&current, None), "Fire"));

        let released = frame(0, "Keyboard", &[("Fire", SignalValue::Bool(false))]);
        assert!(binder.is_action_just_pressed(window(&current, Some(&released)), "Fire"));

        let absent = frame(0, "Keyboard", &[]);
        assert!(binder.is_action_just_pressed(window(&current, Some(&absent)), "Fire"));
    }

    #[test]
    fn axis_and_vector_default_on_shape_mismatch() {
        let binder = ActionBinder::new("Keyboard");
        let current = frame(
            0,
            "Keyboard",
            &[
                ("Throttle", SignalValue::Scalar(0.5)),
                ("Jump", SignalValue::Bool(true)),
                ("Aim", SignalValue::Vector(Vec2::new(1.0, 2.0))),
            ],
        );
        let w = window(&current, None);
        assert_eq!(binder.axis(w, "Throttle"), 0.5);
        assert_eq!(binder.axis(w, "Jump"), 0.0);
        assert_eq!(binder.axis(w, "Missing"), 0.0);
        assert_eq!(binder.vector(w, "Aim"), Vec2::new(1.0, 2.0));
        assert_eq!(binder.vector(w, "Throttle"), Vec2::zeros());
    }

    #[test]
    fn dynamic_selector_is_reevaluated_every_query() {
        use std::cell::Cell;
        use std::rc::Rc;

        let assigned = Rc::new(Cell::new(0_u32));
        let seen = Rc::clone(&assigned);
        let binder = ActionBinder::with_selector("Pad", move || seen.get());

        let mut current = frame(0, "Pad", &[("Fire", SignalValue::Bool(true))]);
        current.device_mut(1).source_mut("Pad").push("Fire", false);

        assert!(binder.is_action(window(&current, None), "Fire"));
        assigned.set(1);
        assert!(!binder.is_action(window(&current, None), "Fire"));
    }

    #[test]
    fn rebinding_switches_device_and_source() {
        let mut binder = ActionBinder::new("Keyboard");
        let mut current = frame(0, "Keyboard", &[("Fire", SignalValue::Bool(false))]);
        current.device_mut(1).source_mut("Pad").push("Fire", true);

        assert!(!binder.is_action(window(&current, None), "Fire"));
        binder.rebind_device(DeviceSelector::Fixed(1));
        binder.rebind_source("Pad");
        assert!(binder.is_action(window(&current, None), "Fire"));
    }
}
