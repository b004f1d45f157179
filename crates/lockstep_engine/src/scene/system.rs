//! Scene-scoped systems
//!
//! A [`GameSystem`] is behavior that belongs to the scene rather than to
//! any one actor: spawning waves, resolving game rules, feeding draw lists
//! to a render context. Systems are privileged; their hooks receive a
//! [`SceneScope`] with the whole scene, the engine contexts, sibling
//! systems, and the tick's input.

use std::any::{Any, TypeId};
use std::rc::Rc;

use crate::context::EngineContext;
use crate::input::InputWindow;
use crate::scene::actor::Actor;
use crate::scene::component::ActorComponent;
use crate::scene::{ActorKey, Scene};

/// Scene-scoped behavior with privileged access
///
/// Hook order within a tick is fixed: every system's `tick` runs before
/// any actor updates, and every system's `post_tick` runs after all actors
/// finished both update sweeps. All hooks default to no-ops.
#[allow(unused_variables)]
pub trait GameSystem: Any {
    /// Called when the scene begins play, or immediately when added to a
    /// live scene
    fn begin_play(&mut self, cx: &mut SceneScope<'_>) {}

    /// Called first in every simulation tick, in system insertion order
    fn tick(&mut self, cx: &mut SceneScope<'_>, dt: f32) {}

    /// Called last in every simulation tick, after all actor sweeps
    fn post_tick(&mut self, cx: &mut SceneScope<'_>, dt: f32) {}

    /// Called once per rendered frame, after actor render hooks; purely
    /// observational
    fn render(&mut self, cx: &mut SceneScope<'_>, dt: f32) {}

    /// Called when the scene ends play or the system is removed
    fn end_play(&mut self, cx: &mut SceneScope<'_>) {}
}

pub(crate) struct SystemSlot {
    pub(crate) sys: Option<Box<dyn GameSystem>>,
    pub(crate) type_id: TypeId,
    pub(crate) began: bool,
    pub(crate) dead: bool,
}

impl SystemSlot {
    pub(crate) fn new(sys: Box<dyn GameSystem>) -> Self {
        let type_id = (sys.as_ref() as &dyn Any).type_id();
        Self {
            sys: Some(sys),
            type_id,
            began: false,
            dead: false,
        }
    }
}

/// The privileged view handed to system hooks
pub struct SceneScope<'a> {
    /// The scene this system belongs to
    pub scene: &'a mut Scene,
    window: InputWindow<'a>,
}

impl<'a> SceneScope<'a> {
    pub(crate) fn new(scene: &'a mut Scene, window: InputWindow<'a>) -> Self {
        Self { scene, window }
    }

    /// The tick's current and previous input
    pub fn input(&self) -> InputWindow<'a> {
        self.window
    }

    /// Look up an engine context by type
    pub fn context<T: EngineContext>(&self) -> Option<Rc<T>> {
        self.scene.context::<T>()
    }

    /// Add an actor to the scene; it begins play before this returns
    pub fn spawn_actor(&mut self, actor: Actor) -> ActorKey {
        self.scene.add_actor_with(actor, self.window)
    }

    /// Synchronously destroy an actor; its end hook fires before this
    /// returns. Returns whether the key referred to a live actor.
    pub fn destroy_actor(&mut self, key: ActorKey) -> bool {
        let present = self.scene.contains_actor(key);
        self.scene.remove_actor_with(key, self.window);
        present
    }

    /// Attach a component to an actor; on a live actor its begin hook runs
    /// before this returns. Returns false for a stale key.
    pub fn add_component<C: ActorComponent>(&mut self, key: ActorKey, component: C) -> bool {
        self.scene
            .add_component_to(key, Box::new(component), self.window)
    }

    /// Add a system behind the one currently running; on a live scene its
    /// begin hook runs before this returns
    pub fn add_system(&mut self, system: impl GameSystem) {
        self.scene.add_system_with(Box::new(system), self.window);
    }

    /// Remove the first system of the given type; its end hook fires
    /// before it is unlinked. A system may remove itself, in which case
    /// the end hook runs when its current hook returns.
    pub fn remove_system<S: GameSystem>(&mut self) -> bool {
        self.scene.remove_system_with::<S>(self.window)
    }
}
