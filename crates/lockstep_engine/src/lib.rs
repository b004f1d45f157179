//! # Lockstep Engine
//!
//! A deterministic simulation kernel: given the same ordered sequence of
//! input frames, the simulation advances identically on every run. That
//! reproducibility is the foundation both lockstep multiplayer and
//! replay/debugging tooling stand on.
//!
//! ## Architecture
//!
//! - **Scene graph**: [`Actor`]s own a transform, components, and their
//!   own behavior; [`GameSystem`]s carry scene-level rules. The
//!   [`Scene`] drives both through a fixed per-tick phase order.
//! - **Input**: everything nondeterministic is flattened into a plain
//!   [`FrameInput`] before the step runs; simulation code queries it
//!   through [`ActionBinder`]s.
//! - **The barrier**: [`GameEngine`] keeps external collaborators
//!   ([`EditorSystem`]s, [`EngineContext`]s) outside the deterministic
//!   core, reachable only through a revocable [`ScopedGameBridge`].
//! - **Randomness**: every scene carries a seeded [`DeterministicRng`]
//!   whose stream is bit-identical across platforms.
//!
//! ## Quick Start
//!
//! ```rust
//! use lockstep_engine::prelude::*;
//!
//! struct Spinner;
//!
//! impl ActorBehavior for Spinner {
//!     fn update(&mut self, cx: &mut ActorScope<'_>, dt: f32) {
//!         cx.transform_mut().rotation.z += dt;
//!     }
//! }
//!
//! let mut engine = GameEngine::new();
//! engine.set_scene_with(|| {
//!     let mut scene = Scene::new();
//!     scene.add_actor(Actor::with_behavior("Spinner", Spinner));
//!     scene
//! });
//!
//! for _ in 0..60 {
//!     engine.tick(FrameInput::new(1.0 / 60.0));
//! }
//! assert_eq!(engine.tick_count(), 60);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod bridge;
pub mod context;
pub mod editor;
pub mod input;
pub mod math;
pub mod scene;

mod engine;

pub use engine::GameEngine;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        bridge::{BridgeError, ScopedGameBridge},
        context::EngineContext,
        editor::{EditorSystem, EngineInstrumentation},
        input::{
            adaptor::ActionAdaptor,
            binder::{ActionBinder, DeviceSelector},
            ActionSignal, DeviceBucket, FrameInput, InputWindow, SignalSource, SignalValue,
        },
        math::{Bounds, DeterministicRng, Transform, Vec2, Vec3},
        scene::{
            Actor, ActorBehavior, ActorComponent, ActorKey, ActorScope, GameSystem, Scene,
            SceneScope,
        },
        GameEngine,
    };
}
