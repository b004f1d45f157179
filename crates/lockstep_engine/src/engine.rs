//! Top-level orchestrator separating the external world from the
//! deterministic simulation
//!
//! The engine is the barrier: editor systems and contexts live on the
//! nondeterministic outside, the scene lives on the deterministic inside,
//! and the only things that cross are immutable [`FrameInput`] frames
//! going in and render observations coming out. Given the same ordered
//! frames, the simulation advances identically on every run; that
//! property is what lockstep networking and replay debugging build on.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::bridge::ScopedGameBridge;
use crate::context::{ContextSet, EngineContext};
use crate::editor::{EditorSystem, EngineInstrumentation};
use crate::input::{FrameInput, InputWindow};
use crate::scene::{GameSystem, Scene};

static NEXT_ENGINE_ID: AtomicU64 = AtomicU64::new(1);

/// Orchestrator owning the active scene, the external collaborators, and
/// the per-tick input buffers
///
/// Driving protocol per displayed frame: [`GameEngine::tick`] composes
/// input preparation, one simulation step, and a render. A network
/// catch-up path may call [`GameEngine::simulate`] any number of times
/// between renders; rendering always reflects the latest simulated state.
pub struct GameEngine {
    id: u64,
    scene: Option<Scene>,
    scene_factory: Option<Box<dyn Fn() -> Scene>>,
    contexts: ContextSet,
    editor_systems: Vec<Box<dyn EditorSystem>>,
    instrumentation: Option<Box<dyn EngineInstrumentation>>,
    current_input: Option<FrameInput>,
    previous_input: Option<FrameInput>,
    tick_count: u64,
    game_time: f64,
    scene_started: bool,
    bridge_epoch: u64,
    frame_time: Duration,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine {
    /// Create an engine with no scene, contexts, or collaborators
    pub fn new() -> Self {
        Self {
            id: NEXT_ENGINE_ID.fetch_add(1, Ordering::Relaxed),
            scene: None,
            scene_factory: None,
            contexts: ContextSet::new(),
            editor_systems: Vec::new(),
            instrumentation: None,
            current_input: None,
            previous_input: None,
            tick_count: 0,
            game_time: 0.0,
            scene_started: false,
            bridge_epoch: 0,
            frame_time: Duration::ZERO,
        }
    }

    /// Register an external resource object, retrievable by type
    ///
    /// Register everything before the first scene install; scenes see the
    /// context set as it was when they were installed.
    pub fn add_context(&mut self, context: impl EngineContext) {
        self.contexts.insert(Rc::new(context));
    }

    /// Register an editor system; preparation steps run in registration
    /// order
    pub fn add_editor_system(&mut self, system: impl EditorSystem + 'static) {
        self.editor_systems.push(Box::new(system));
    }

    /// Attach an observer of the frame pipeline
    pub fn set_instrumentation(&mut self, instrumentation: impl EngineInstrumentation + 'static) {
        self.instrumentation = Some(Box::new(instrumentation));
    }

    /// Look up a registered context by type
    pub fn context<T: EngineContext>(&self) -> Option<Rc<T>> {
        self.contexts.get::<T>()
    }

    /// Look up a game system of the active scene by type
    pub fn system<S: GameSystem>(&self) -> Option<&S> {
        self.scene.as_ref().and_then(Scene::system)
    }

    /// The active scene
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// The active scene, mutably
    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    /// Input of the tick currently or most recently simulated
    pub fn current_input(&self) -> Option<&FrameInput> {
        self.current_input.as_ref()
    }

    /// Input of the tick before that
    pub fn previous_input(&self) -> Option<&FrameInput> {
        self.previous_input.as_ref()
    }

    /// Number of simulation steps taken since construction
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Accumulated simulated time in seconds; resets on scene install
    pub fn game_time(&self) -> f64 {
        self.game_time
    }

    /// Wall-clock duration of the last composed tick; observational only
    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// The bridge that is currently valid for this engine
    pub fn current_bridge(&self) -> ScopedGameBridge {
        ScopedGameBridge::new(self.id, self.bridge_epoch)
    }

    pub(crate) fn instance_id(&self) -> u64 {
        self.id
    }

    pub(crate) fn bridge_epoch(&self) -> u64 {
        self.bridge_epoch
    }

    /// Install a scene, ending the previous one
    ///
    /// No factory is retained, so a later [`GameEngine::reload_scene`]
    /// becomes a logged no-op.
    pub fn set_scene(&mut self, scene: Scene) {
        self.scene_factory = None;
        self.install_scene(scene);
    }

    /// Install a scene built by `factory`, retaining the factory so the
    /// scene can be rebuilt from scratch on reload
    pub fn set_scene_with(&mut self, factory: impl Fn() -> Scene + 'static) {
        let scene = factory();
        self.scene_factory = Some(Box::new(factory));
        self.install_scene(scene);
    }

    /// Rebuild the scene from the retained factory
    ///
    /// Logged no-op when the scene was installed directly.
    pub fn reload_scene(&mut self) {
        match self.scene_factory.take() {
            Some(factory) => {
                log::info!("reloading scene from retained factory");
                let scene = factory();
                self.install_scene(scene);
                self.scene_factory = Some(factory);
            }
            None => {
                log::warn!("cannot reload scene: it was installed without a factory");
            }
        }
    }

    fn install_scene(&mut self, mut scene: Scene) {
        // Revoke outstanding bridges before anything else, so a
        // collaborator holding one starts failing the moment the old
        // scene is no longer the world it believes in.
        self.bridge_epoch += 1;

        if let Some(mut old) = self.scene.take() {
            let window = InputWindow {
                current: self.current_input.as_ref(),
                previous: self.previous_input.as_ref(),
            };
            old.end_play(window);
        }

        log::info!("installing scene");
        scene.attach_contexts(self.contexts.clone());
        self.scene = Some(scene);
        self.scene_started = false;
        self.game_time = 0.0;

        // Fresh bridge, then rebind every collaborator to the new world.
        let bridge = self.current_bridge();
        let mut systems = std::mem::take(&mut self.editor_systems);
        for system in &mut systems {
            system.initialize_with_scene(bridge, self);
        }
        self.editor_systems = systems;

        if let Some(instrumentation) = &mut self.instrumentation {
            instrumentation.on_scene_reset();
        }
    }

    /// Run every editor system's preparation step over `input`, in
    /// registration order, and return the completed frame
    pub fn prepare_frame_input(&mut self, input: FrameInput) -> FrameInput {
        if let Some(instrumentation) = &mut self.instrumentation {
            instrumentation.on_begin_frame(self.tick_count, &input);
        }

        let mut processed = input;
        for index in 0..self.editor_systems.len() {
            processed = self.editor_systems[index].prepare_frame_input(processed);
            if let Some(instrumentation) = &mut self.instrumentation {
                instrumentation.on_system_executed(self.editor_systems[index].name(), &processed);
            }
        }
        processed
    }

    /// Run one deterministic simulation step
    ///
    /// Shifts the input buffers, counts the tick, lazily begins scene play
    /// on the first step, accrues simulated time, and runs the scene's
    /// phase orchestration. May be called several times before the next
    /// render to replay buffered ticks.
    pub fn simulate(&mut self, input: FrameInput) {
        let dt = input.dt;
        self.previous_input = self.current_input.take();
        self.current_input = Some(input);
        self.tick_count += 1;

        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let window = InputWindow {
            current: self.current_input.as_ref(),
            previous: self.previous_input.as_ref(),
        };
        if !self.scene_started {
            scene.begin_play(window);
            self.scene_started = true;
        }
        self.game_time += f64::from(dt);
        scene.tick(window, dt);
    }

    /// Render the latest simulated state; a no-op without a scene
    pub fn render(&mut self, dt: f32) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let window = InputWindow {
            current: self.current_input.as_ref(),
            previous: self.previous_input.as_ref(),
        };
        scene.render(window, dt);
    }

    /// One full engine tick: prepare input, simulate once, render once
    ///
    /// The method an external driving loop calls once per displayed
    /// frame. A prepared frame with `dt <= 0` is rejected and nothing
    /// runs.
    pub fn tick(&mut self, input: FrameInput) {
        let started = Instant::now();

        let processed = self.prepare_frame_input(input);
        if processed.dt <= 0.0 {
            return;
        }
        let dt = processed.dt;
        self.simulate(processed);
        self.render(dt);

        self.frame_time = started.elapsed();
    }

    /// Shut the engine down, consuming it
    ///
    /// Ends scene play and lets every editor system release its
    /// resources. Dropping the engine does the same; taking `self` by
    /// value just makes reuse a compile error.
    pub fn dispose(self) {}
}

impl Drop for GameEngine {
    fn drop(&mut self) {
        if let Some(mut scene) = self.scene.take() {
            let window = InputWindow {
                current: self.current_input.as_ref(),
                previous: self.previous_input.as_ref(),
            };
            scene.end_play(window);
        }
        for system in &mut self.editor_systems {
            system.cleanup();
        }
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("tick_count", &self.tick_count)
            .field("game_time", &self.game_time)
            .field("scene", &self.scene)
            .field("editor_systems", &self.editor_systems.len())
            .finish()
    }
}
