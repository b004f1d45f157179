//! Scripted input for headless deterministic runs
//!
//! A real build would register an editor system that captures keyboard or
//! touch events here. The headless demo replaces it with a script: a list
//! of tick numbers on which the hop action fires. Same script, same run.

use lockstep_engine::prelude::*;
use lockstep_engine::GameEngine;

/// Source id the game's controls are emitted under
pub const CONTROLS_SOURCE: &str = "Controls";

/// Names the action tags the game listens for
#[derive(Debug, Clone)]
pub struct ControlScheme {
    /// Tag of the hop/flap/restart action
    pub hop_action: String,
}

impl Default for ControlScheme {
    fn default() -> Self {
        Self {
            hop_action: "Hop".into(),
        }
    }
}

impl EngineContext for ControlScheme {}

/// Editor system that replays a fixed hop script
pub struct ScriptedControls {
    adaptor: ActionAdaptor,
    hop_ticks: Vec<u64>,
    tick: u64,
    hop_tag: Option<String>,
}

impl ScriptedControls {
    /// Create a script that hops on the given prepare ticks
    pub fn new(hop_ticks: Vec<u64>) -> Self {
        Self {
            adaptor: ActionAdaptor::new(CONTROLS_SOURCE),
            hop_ticks,
            tick: 0,
            hop_tag: None,
        }
    }
}

impl EditorSystem for ScriptedControls {
    fn initialize_with_scene(&mut self, bridge: ScopedGameBridge, engine: &GameEngine) {
        // Rebind to the new scene: restart the script and re-resolve the
        // control scheme through the fresh bridge.
        self.tick = 0;
        self.adaptor.clear();
        match bridge.context::<ControlScheme>(engine) {
            Ok(Some(scheme)) => self.hop_tag = Some(scheme.hop_action.clone()),
            Ok(None) => {
                log::warn!("ScriptedControls: no ControlScheme context, staying inert");
                self.hop_tag = None;
            }
            Err(err) => {
                log::warn!("ScriptedControls: bridge refused initialization: {err}");
                self.hop_tag = None;
            }
        }
    }

    fn prepare_frame_input(&mut self, mut input: FrameInput) -> FrameInput {
        if let Some(tag) = &self.hop_tag {
            if self.hop_ticks.contains(&self.tick) {
                self.adaptor.queue(tag.clone(), true);
            }
        }
        self.tick += 1;
        self.adaptor.flush_into(&mut input);
        input
    }

    fn cleanup(&mut self) {
        log::info!("ScriptedControls: released after {} prepared ticks", self.tick);
    }
}
