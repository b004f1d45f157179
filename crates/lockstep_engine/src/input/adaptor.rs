//! Signal queue for input-producing editor systems
//!
//! External event sources (keyboard handlers, network receives, UI
//! buttons) fire between ticks. An [`ActionAdaptor`] buffers those events
//! as signals and flushes them into the frame being prepared, under one
//! source id, into the bucket of the device it represents. Editor systems
//! embed one and delegate their `prepare_frame_input` to
//! [`ActionAdaptor::flush_into`].

use crate::input::{ActionSignal, FrameInput, SignalSource, SignalValue};

/// Buffers action signals between ticks and appends them to the next frame
#[derive(Debug)]
pub struct ActionAdaptor {
    source_id: String,
    device_index: u32,
    pending: Vec<ActionSignal>,
}

impl ActionAdaptor {
    /// Create an adaptor that writes to the local host bucket
    pub fn new(source_id: impl Into<String>) -> Self {
        Self::for_device(source_id, 0)
    }

    /// Create an adaptor that writes to a specific device bucket, e.g. a
    /// remote peer fed by a network transport
    pub fn for_device(source_id: impl Into<String>, device_index: u32) -> Self {
        Self {
            source_id: source_id.into(),
            device_index,
            pending: Vec::new(),
        }
    }

    /// The source id this adaptor emits under
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Queue a signal for the next flush
    pub fn queue(&mut self, tag: impl Into<String>, value: impl Into<SignalValue>) {
        self.pending.push(ActionSignal::new(tag, value));
    }

    /// Number of signals waiting to be flushed
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop any queued signals without emitting them
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Append the queued signals to `input` and clear the queue
    ///
    /// Appends a new source to the target device bucket, creating the
    /// bucket if this is the first producer to touch it. Nothing already
    /// in the frame is overwritten, so any number of adaptors compose.
    /// Does nothing when the queue is empty.
    pub fn flush_into(&mut self, input: &mut FrameInput) {
        if self.pending.is_empty() {
            return;
        }
        let source = SignalSource {
            id: self.source_id.clone(),
            signals: std::mem::take(&mut self.pending),
        };
        input.device_mut(self.device_index).sources.push(source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_creates_the_host_bucket_when_absent() {
        let mut adaptor = ActionAdaptor::new("Keyboard");
        adaptor.queue("Jump", true);
        adaptor.queue("Throttle", 0.5);

        let mut input = FrameInput::new(0.016);
        adaptor.flush_into(&mut input);

        let source = input.device(0).unwrap().source("Keyboard").unwrap();
        assert_eq!(source.signals.len(), 2);
        assert_eq!(adaptor.pending_len(), 0);
    }

    #[test]
    fn empty_queue_flushes_nothing() {
        let mut adaptor = ActionAdaptor::new("Keyboard");
        let mut input = FrameInput::new(0.016);
        adaptor.flush_into(&mut input);
        assert!(input.devices.is_empty());
    }

    #[test]
    fn two_adaptors_compose_additively_in_one_bucket() {
        let mut keys = ActionAdaptor::new("Keyboard");
        let mut pad = ActionAdaptor::new("Gamepad");
        keys.queue("Jump", true);
        pad.queue("Fire", true);

        let mut input = FrameInput::new(0.016);
        keys.flush_into(&mut input);
        pad.flush_into(&mut input);

        assert_eq!(input.devices.len(), 1);
        let host = input.device(0).unwrap();
        assert_eq!(host.sources.len(), 2);
        assert!(host.source("Keyboard").is_some());
        assert!(host.source("Gamepad").is_some());
    }

    #[test]
    fn remote_adaptor_writes_its_own_bucket() {
        let mut remote = ActionAdaptor::for_device("Net", 2);
        remote.queue("Jump", true);

        let mut input = FrameInput::new(0.016);
        input.device_mut(0).source_mut("Keyboard").push("Fire", true);
        remote.flush_into(&mut input);

        assert_eq!(input.devices.len(), 2);
        assert!(input.device(2).unwrap().source("Net").is_some());
    }
}
