//! Actors: the entities of a scene
//!
//! An [`Actor`] owns a transform, an ordered component list, and a boxed
//! [`ActorBehavior`] carrying its own logic. User code builds actors by
//! value and moves them into a scene; the returned [`ActorKey`] is the only
//! long-lived way to refer to one. Inside hooks, the current actor is
//! presented as an [`ActorScope`], which bundles the actor's state with
//! scene access and the tick's input window.

use std::any::Any;
use std::rc::Rc;

use crate::context::EngineContext;
use crate::input::InputWindow;
use crate::math::{Bounds, Transform, Vec3};
use crate::scene::component::{aggregate_bounds, ActorComponent, ComponentSlot};
use crate::scene::{ActorKey, Phase, Scene};

/// An actor's own lifecycle hooks
///
/// Implemented by the type that carries an actor's identity-level logic;
/// plain container actors use the unit behavior. Within every phase the
/// actor's own hook runs before its components' hooks.
#[allow(unused_variables)]
pub trait ActorBehavior: Any {
    /// Called when play begins, or immediately on attachment to a live
    /// scene
    fn begin_play(&mut self, cx: &mut ActorScope<'_>) {}

    /// Called every simulation tick during the update phase
    fn update(&mut self, cx: &mut ActorScope<'_>, dt: f32) {}

    /// Called every simulation tick after all actors updated
    fn post_update(&mut self, cx: &mut ActorScope<'_>, dt: f32) {}

    /// Called once per rendered frame; purely observational
    fn render(&mut self, cx: &mut ActorScope<'_>, dt: f32) {}

    /// Called on removal from the scene or when the scene ends play
    fn end_play(&mut self, cx: &mut ActorScope<'_>) {}
}

/// The inert behavior used by plain container actors (and as the
/// stand-in while a real behavior's hook is on the stack).
impl ActorBehavior for () {}

pub(crate) struct ActorState {
    pub(crate) name: String,
    pub(crate) transform: Transform,
    pub(crate) has_begun_play: bool,
}

/// A simulation entity: transform, components, and its own behavior
pub struct Actor {
    state: ActorState,
    behavior: Box<dyn ActorBehavior>,
    components: Vec<ComponentSlot>,
}

impl Actor {
    /// Create a plain actor with no behavior of its own
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_behavior(name, ())
    }

    /// Create an actor driven by `behavior`
    pub fn with_behavior(name: impl Into<String>, behavior: impl ActorBehavior) -> Self {
        Self {
            state: ActorState {
                name: name.into(),
                transform: Transform::identity(),
                has_begun_play: false,
            },
            behavior: Box::new(behavior),
            components: Vec::new(),
        }
    }

    /// Builder: start at a position
    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.state.transform.position = position;
        self
    }

    /// Builder: attach a component
    ///
    /// Only callable while the actor is still owned by the builder, which
    /// is what guarantees the component cannot miss its begin hook: either
    /// the actor has not been attached yet, or (once in a scene) additions
    /// go through a scope and begin immediately.
    #[must_use]
    pub fn with_component(mut self, component: impl ActorComponent) -> Self {
        self.components.push(ComponentSlot::new(Box::new(component)));
        self
    }

    /// The actor's name
    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Rename the actor
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.state.name = name.into();
    }

    /// The actor's transform
    pub fn transform(&self) -> &Transform {
        &self.state.transform
    }

    /// Mutable access to the actor's transform
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.state.transform
    }

    /// Whether the begin hook has run and the end hook has not
    pub fn has_begun_play(&self) -> bool {
        self.state.has_begun_play
    }

    /// Downcast the actor's behavior
    pub fn behavior_as<B: ActorBehavior>(&self) -> Option<&B> {
        (self.behavior.as_ref() as &dyn Any).downcast_ref::<B>()
    }

    /// Downcast the actor's behavior mutably
    pub fn behavior_as_mut<B: ActorBehavior>(&mut self) -> Option<&mut B> {
        (self.behavior.as_mut() as &mut dyn Any).downcast_mut::<B>()
    }

    /// First component of the given type
    pub fn component<C: ActorComponent>(&self) -> Option<&C> {
        self.components
            .iter()
            .filter(|slot| !slot.dead)
            .filter_map(|slot| slot.comp.as_deref())
            .find_map(|comp| (comp as &dyn Any).downcast_ref::<C>())
    }

    /// First component of the given type, mutably
    pub fn component_mut<C: ActorComponent>(&mut self) -> Option<&mut C> {
        self.components
            .iter_mut()
            .filter(|slot| !slot.dead)
            .filter_map(|slot| slot.comp.as_deref_mut())
            .find_map(|comp| (comp as &mut dyn Any).downcast_mut::<C>())
    }

    /// Aggregated world-space bounds of all components
    pub fn bounds(&self) -> Bounds {
        aggregate_bounds(&self.components, &self.state.transform)
    }

    /// Run one phase over the actor: its own hook first, then each
    /// component's, with the list mutable underneath.
    ///
    /// Begin snapshots the component count so components added during a
    /// begin hook (which begin at add time) are not begun twice. The other
    /// phases walk the live list, so additions join the current sweep.
    pub(crate) fn dispatch(
        &mut self,
        phase: Phase,
        key: ActorKey,
        scene: &mut Scene,
        window: InputWindow<'_>,
        dt: f32,
    ) {
        match phase {
            Phase::Begin => {
                if self.state.has_begun_play {
                    return;
                }
                self.state.has_begun_play = true;
            }
            Phase::Update | Phase::PostUpdate | Phase::Render => {
                if !self.state.has_begun_play {
                    return;
                }
            }
            Phase::End => {}
        }

        let begin_snapshot = if matches!(phase, Phase::Begin) {
            Some(self.components.len())
        } else {
            None
        };

        let mut behavior = std::mem::replace(&mut self.behavior, Box::new(()));
        {
            let mut cx = ActorScope::new(key, &mut self.state, &mut self.components, scene, window);
            run_behavior(behavior.as_mut(), phase, &mut cx, dt);
        }
        self.behavior = behavior;

        let mut index = 0;
        loop {
            let limit = begin_snapshot.unwrap_or(self.components.len());
            if index >= limit {
                break;
            }

            let run = {
                let slot = &self.components[index];
                let phase_ok = match phase {
                    Phase::Begin => !slot.began,
                    Phase::End => true,
                    _ => slot.began,
                };
                !slot.dead && slot.comp.is_some() && phase_ok
            };

            if run {
                match phase {
                    Phase::Begin => self.components[index].began = true,
                    Phase::End => self.components[index].began = false,
                    _ => {}
                }
                if let Some(mut comp) = self.components[index].comp.take() {
                    {
                        let mut cx = ActorScope::new(
                            key,
                            &mut self.state,
                            &mut self.components,
                            scene,
                            window,
                        );
                        run_component(comp.as_mut(), phase, &mut cx, dt);
                    }
                    if self.components[index].dead {
                        // Removed itself while its hook ran; finish its
                        // lifecycle before it drops.
                        if !matches!(phase, Phase::End) {
                            let mut cx = ActorScope::new(
                                key,
                                &mut self.state,
                                &mut self.components,
                                scene,
                                window,
                            );
                            comp.end_play(&mut cx);
                        }
                    } else {
                        self.components[index].comp = Some(comp);
                    }
                }
            }
            index += 1;
        }

        if matches!(phase, Phase::End) {
            self.state.has_begun_play = false;
        }
        self.components.retain(|slot| !slot.dead);
    }

    /// Attach a boxed component and, on a live actor, begin it immediately.
    pub(crate) fn attach_component(
        &mut self,
        component: Box<dyn ActorComponent>,
        key: ActorKey,
        scene: &mut Scene,
        window: InputWindow<'_>,
    ) {
        self.components.push(ComponentSlot::new(component));
        if self.state.has_begun_play {
            let index = self.components.len() - 1;
            self.begin_component_at(index, key, scene, window);
        }
    }

    fn begin_component_at(
        &mut self,
        index: usize,
        key: ActorKey,
        scene: &mut Scene,
        window: InputWindow<'_>,
    ) {
        if self.components[index].dead || self.components[index].began {
            return;
        }
        self.components[index].began = true;
        if let Some(mut comp) = self.components[index].comp.take() {
            {
                let mut cx =
                    ActorScope::new(key, &mut self.state, &mut self.components, scene, window);
                comp.begin_play(&mut cx);
            }
            if self.components[index].dead {
                let mut cx =
                    ActorScope::new(key, &mut self.state, &mut self.components, scene, window);
                comp.end_play(&mut cx);
            } else {
                self.components[index].comp = Some(comp);
            }
        }
    }
}

impl std::fmt::Debug for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actor")
            .field("name", &self.state.name)
            .field("has_begun_play", &self.state.has_begun_play)
            .field("components", &self.components.len())
            .finish()
    }
}

fn run_behavior(behavior: &mut dyn ActorBehavior, phase: Phase, cx: &mut ActorScope<'_>, dt: f32) {
    match phase {
        Phase::Begin => behavior.begin_play(cx),
        Phase::Update => behavior.update(cx, dt),
        Phase::PostUpdate => behavior.post_update(cx, dt),
        Phase::Render => behavior.render(cx, dt),
        Phase::End => behavior.end_play(cx),
    }
}

fn run_component(comp: &mut dyn ActorComponent, phase: Phase, cx: &mut ActorScope<'_>, dt: f32) {
    match phase {
        Phase::Begin => comp.begin_play(cx),
        Phase::Update => comp.update(cx, dt),
        Phase::PostUpdate => comp.post_update(cx, dt),
        Phase::Render => comp.render(cx, dt),
        Phase::End => comp.end_play(cx),
    }
}

/// The view of an actor handed to its hooks
///
/// Bundles the actor's own state, its component list, full scene access,
/// and the tick's input window. The scope is the actor's "self" while a
/// hook runs; it is also the capability through which the hook may mutate
/// the scene, including destroying actors (itself included) mid-phase.
pub struct ActorScope<'a> {
    key: ActorKey,
    state: &'a mut ActorState,
    components: &'a mut Vec<ComponentSlot>,
    /// The scene owning this actor
    pub scene: &'a mut Scene,
    window: InputWindow<'a>,
}

impl<'a> ActorScope<'a> {
    pub(crate) fn new(
        key: ActorKey,
        state: &'a mut ActorState,
        components: &'a mut Vec<ComponentSlot>,
        scene: &'a mut Scene,
        window: InputWindow<'a>,
    ) -> Self {
        Self {
            key,
            state,
            components,
            scene,
            window,
        }
    }

    fn reborrow(&mut self) -> ActorScope<'_> {
        ActorScope {
            key: self.key,
            state: &mut *self.state,
            components: &mut *self.components,
            scene: &mut *self.scene,
            window: self.window,
        }
    }

    /// This actor's key
    pub fn key(&self) -> ActorKey {
        self.key
    }

    /// This actor's name
    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Rename this actor
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.state.name = name.into();
    }

    /// This actor's transform
    pub fn transform(&self) -> &Transform {
        &self.state.transform
    }

    /// Mutable access to this actor's transform
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.state.transform
    }

    /// Whether this actor has begun play
    pub fn has_begun_play(&self) -> bool {
        self.state.has_begun_play
    }

    /// The tick's current and previous input
    pub fn input(&self) -> InputWindow<'a> {
        self.window
    }

    /// Look up an engine context by type
    pub fn context<T: EngineContext>(&self) -> Option<Rc<T>> {
        self.scene.context::<T>()
    }

    /// First component of the given type on this actor
    pub fn component<C: ActorComponent>(&self) -> Option<&C> {
        self.components
            .iter()
            .filter(|slot| !slot.dead)
            .filter_map(|slot| slot.comp.as_deref())
            .find_map(|comp| (comp as &dyn Any).downcast_ref::<C>())
    }

    /// First component of the given type on this actor, mutably
    pub fn component_mut<C: ActorComponent>(&mut self) -> Option<&mut C> {
        self.components
            .iter_mut()
            .filter(|slot| !slot.dead)
            .filter_map(|slot| slot.comp.as_deref_mut())
            .find_map(|comp| (comp as &mut dyn Any).downcast_mut::<C>())
    }

    /// Attach a component to this actor; on a live actor its begin hook
    /// runs before this returns
    pub fn add_component(&mut self, component: impl ActorComponent) {
        self.components
            .push(ComponentSlot::new(Box::new(component)));
        if self.state.has_begun_play {
            let index = self.components.len() - 1;
            self.components[index].began = true;
            if let Some(mut comp) = self.components[index].comp.take() {
                {
                    let mut cx = self.reborrow();
                    comp.begin_play(&mut cx);
                }
                if self.components[index].dead {
                    let mut cx = self.reborrow();
                    comp.end_play(&mut cx);
                } else {
                    self.components[index].comp = Some(comp);
                }
            }
        }
    }

    /// Remove the first component of the given type
    ///
    /// The end hook fires before the component is unlinked. Removing the
    /// component whose hook is currently on the stack is allowed; its end
    /// hook then runs as soon as that hook returns.
    pub fn remove_component<C: ActorComponent>(&mut self) -> bool {
        let target = std::any::TypeId::of::<C>();
        for index in 0..self.components.len() {
            let slot = &self.components[index];
            if slot.dead || slot.type_id != target {
                continue;
            }
            self.components[index].dead = true;
            self.components[index].began = false;
            if let Some(mut comp) = self.components[index].comp.take() {
                let mut cx = self.reborrow();
                comp.end_play(&mut cx);
            }
            return true;
        }
        false
    }

    /// Aggregated world-space bounds of this actor's components
    pub fn bounds(&self) -> Bounds {
        aggregate_bounds(self.components, &self.state.transform)
    }

    /// Add an actor to the scene; it begins play before this returns
    pub fn spawn_actor(&mut self, actor: Actor) -> ActorKey {
        self.scene.add_actor_with(actor, self.window)
    }

    /// Synchronously destroy another actor
    ///
    /// Its end hook fires and it is unlinked before this returns; later
    /// phases of the current tick will skip it. Returns whether the key
    /// referred to a live actor.
    pub fn destroy_actor(&mut self, key: ActorKey) -> bool {
        let present = self.scene.contains_actor(key);
        self.scene.remove_actor_with(key, self.window);
        present
    }

    /// Destroy this actor
    ///
    /// It is unlinked immediately; the end hook runs when the current hook
    /// returns, since this actor's state is on the stack right now.
    pub fn destroy(&mut self) {
        self.scene.remove_actor_with(self.key, self.window);
    }
}
