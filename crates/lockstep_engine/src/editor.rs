//! The boundary between the nondeterministic outside world and the kernel
//!
//! Editor systems are the filter at the edge of the simulation: they soak
//! up hardware events, network packets, and UI intent, and express all of
//! it as plain [`FrameInput`] data before the deterministic step runs.
//! Once `prepare_frame_input` has returned, nothing nondeterministic is
//! left in the frame.

use crate::bridge::ScopedGameBridge;
use crate::engine::GameEngine;
use crate::input::FrameInput;

/// An external collaborator that turns captured input into frame data
///
/// Registered with the engine once; re-initialized with a fresh bridge on
/// every scene install, and stepped once per engine tick in registration
/// order. A system that cannot find the contexts it needs should log a
/// warning and stay inert for the session rather than fail the install.
#[allow(unused_variables)]
pub trait EditorSystem {
    /// Display name used by instrumentation; defaults to the type name
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Called once per scene install with the bridge that is valid for
    /// that scene's lifetime
    ///
    /// Any handle resolved from an earlier bridge is stale after this is
    /// called; re-resolve everything from the new one.
    fn initialize_with_scene(&mut self, bridge: ScopedGameBridge, engine: &GameEngine) {}

    /// Called once per engine tick; append this system's input and return
    /// the frame
    ///
    /// Producers append to the existing device buckets rather than
    /// replacing them, so every registered system contributes to the same
    /// frame.
    fn prepare_frame_input(&mut self, input: FrameInput) -> FrameInput;

    /// Called when the engine is disposed; release external resources
    fn cleanup(&mut self) {}
}

/// Optional observer of the frame pipeline
///
/// Attached to the engine by tooling that wants to watch input flow
/// (inspectors, recorders). Purely observational; the kernel behaves
/// identically with or without one.
#[allow(unused_variables)]
pub trait EngineInstrumentation {
    /// A frame is about to be prepared; `input` is the raw frame before
    /// any editor system ran
    fn on_begin_frame(&mut self, tick: u64, input: &FrameInput) {}

    /// One editor system finished its preparation step; `input` is the
    /// frame as that system left it
    fn on_system_executed(&mut self, system: &str, input: &FrameInput) {}

    /// A scene was installed or reloaded
    fn on_scene_reset(&mut self) {}
}
