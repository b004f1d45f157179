//! Scene ownership and phase orchestration
//!
//! A [`Scene`] owns every actor and system of one simulation session and
//! drives them through a fixed phase order each tick. The ordering rules
//! are exact and load-bearing for determinism:
//!
//! 1. every system's `tick`, in insertion order;
//! 2. every actor's update hooks, over a snapshot of the actor order taken
//!    at tick start;
//! 3. every actor's post-update hooks, over the same snapshot;
//! 4. every system's `post_tick`, in insertion order.
//!
//! Before each actor hook fires, the actor's key is checked against the
//! live map. Actors destroyed earlier in the same phase are skipped
//! without error and never receive a hook twice; actors added mid-phase
//! begin play immediately but first appear in the sweeps of the next tick.
//! Actor storage is a generational slot map, so a stale key can never
//! reach a recycled slot.

pub mod actor;
pub mod component;
pub mod system;

pub use actor::{Actor, ActorBehavior, ActorScope};
pub use component::ActorComponent;
pub use system::{GameSystem, SceneScope};

use std::any::{Any, TypeId};
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

use crate::context::{ContextSet, EngineContext};
use crate::input::InputWindow;
use crate::math::DeterministicRng;
use crate::scene::system::SystemSlot;

new_key_type! {
    /// Stable, generational handle to an actor in a scene
    ///
    /// Holding a key never keeps an actor alive; once the actor is
    /// destroyed every copy of the key simply stops resolving.
    pub struct ActorKey;
}

/// Lifecycle phase being dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Begin,
    Update,
    PostUpdate,
    Render,
    End,
}

/// Default seed of every scene's random source
///
/// Fixed so that two peers constructing the same scene get the same
/// stream without exchanging seeds.
pub const DEFAULT_SEED: u32 = 1337;

/// Owner of all actors and systems for one simulation session
///
/// Exactly one scene is active in an engine at a time. The engine injects
/// its context set on install and is the only caller of the phase entry
/// points; user code reaches a live scene through hook scopes.
pub struct Scene {
    actors: SlotMap<ActorKey, Option<Actor>>,
    order: Vec<ActorKey>,
    systems: Vec<SystemSlot>,
    contexts: ContextSet,
    rng: DeterministicRng,
    has_begun: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with the default random seed
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create an empty scene with a specific random seed
    pub fn with_seed(seed: u32) -> Self {
        Self {
            actors: SlotMap::with_key(),
            order: Vec::new(),
            systems: Vec::new(),
            contexts: ContextSet::new(),
            rng: DeterministicRng::new(seed),
            has_begun: false,
        }
    }

    /// Whether `begin_play` has run and `end_play` has not
    pub fn has_begun(&self) -> bool {
        self.has_begun
    }

    /// The scene's deterministic random source
    ///
    /// All simulation code must draw randomness here; the draw order is
    /// part of the deterministic state.
    pub fn rng(&mut self) -> &mut DeterministicRng {
        &mut self.rng
    }

    /// Look up an engine context by type
    ///
    /// Resolves nothing until the engine installs the scene.
    pub fn context<T: EngineContext>(&self) -> Option<Rc<T>> {
        self.contexts.get::<T>()
    }

    /// Engine-only: share the engine's context set with this scene.
    pub(crate) fn attach_contexts(&mut self, contexts: ContextSet) {
        self.contexts = contexts;
    }

    // ---- actors ------------------------------------------------------

    /// Add an actor; on a scene that has begun play it begins immediately
    pub fn add_actor(&mut self, actor: Actor) -> ActorKey {
        self.add_actor_with(actor, InputWindow::EMPTY)
    }

    pub(crate) fn add_actor_with(&mut self, actor: Actor, window: InputWindow<'_>) -> ActorKey {
        let key = self.actors.insert(Some(actor));
        self.order.push(key);
        if self.has_begun {
            self.dispatch_actor(key, Phase::Begin, window, 0.0);
        }
        key
    }

    /// Remove an actor, firing its end hooks before unlinking
    ///
    /// Returns the detached actor so it can be attached again later;
    /// `None` for a stale key.
    pub fn remove_actor(&mut self, key: ActorKey) -> Option<Actor> {
        self.remove_actor_with(key, InputWindow::EMPTY)
    }

    pub(crate) fn remove_actor_with(
        &mut self,
        key: ActorKey,
        window: InputWindow<'_>,
    ) -> Option<Actor> {
        let slot = self.actors.get_mut(key)?;
        match slot.take() {
            Some(mut taken) => {
                taken.dispatch(Phase::End, key, self, window, 0.0);
                self.actors.remove(key);
                self.order.retain(|k| *k != key);
                Some(taken)
            }
            None => {
                // The actor's own hook is on the stack right now. Unlink
                // here; the dispatcher finishes its lifecycle on return.
                self.actors.remove(key);
                self.order.retain(|k| *k != key);
                None
            }
        }
    }

    /// Whether the key refers to an actor of this scene
    pub fn contains_actor(&self, key: ActorKey) -> bool {
        self.actors.contains_key(key)
    }

    /// Borrow an actor
    ///
    /// `None` for a stale key and for the actor whose hooks are currently
    /// running (its state is on the stack).
    pub fn actor(&self, key: ActorKey) -> Option<&Actor> {
        self.actors.get(key)?.as_ref()
    }

    /// Borrow an actor mutably; same resolution rules as [`Scene::actor`]
    pub fn actor_mut(&mut self, key: ActorKey) -> Option<&mut Actor> {
        self.actors.get_mut(key)?.as_mut()
    }

    /// Number of actors in the scene
    pub fn actor_count(&self) -> usize {
        self.order.len()
    }

    /// Iterate actors in attachment order
    pub fn actors(&self) -> impl Iterator<Item = (ActorKey, &Actor)> {
        self.order
            .iter()
            .filter_map(|key| Some((*key, self.actors.get(*key)?.as_ref()?)))
    }

    /// Key of the first actor with the given name
    pub fn find_actor(&self, name: &str) -> Option<ActorKey> {
        self.actors()
            .find(|(_, actor)| actor.name() == name)
            .map(|(key, _)| key)
    }

    pub(crate) fn add_component_to(
        &mut self,
        key: ActorKey,
        component: Box<dyn ActorComponent>,
        window: InputWindow<'_>,
    ) -> bool {
        let Some(slot) = self.actors.get_mut(key) else {
            log::warn!("add_component_to: stale actor key");
            return false;
        };
        let Some(mut taken) = slot.take() else {
            // The target's hooks are running; it must attach through its
            // own scope instead.
            log::warn!("add_component_to: actor is mid-dispatch; use the actor scope");
            return false;
        };
        taken.attach_component(component, key, self, window);
        if let Some(slot) = self.actors.get_mut(key) {
            *slot = Some(taken);
        } else {
            // Destroyed itself during the component's begin hook; it is
            // already unlinked, so close out its lifecycle here.
            taken.dispatch(Phase::End, key, self, window, 0.0);
        }
        true
    }

    // ---- systems -----------------------------------------------------

    /// Add a system; on a scene that has begun play it begins immediately
    pub fn add_system(&mut self, system: impl GameSystem) {
        self.add_system_with(Box::new(system), InputWindow::EMPTY);
    }

    pub(crate) fn add_system_with(&mut self, system: Box<dyn GameSystem>, window: InputWindow<'_>) {
        self.systems.push(SystemSlot::new(system));
        if self.has_begun {
            let index = self.systems.len() - 1;
            self.begin_system_at(index, window);
        }
    }

    /// Remove the first system of the given type, firing its end hook
    pub fn remove_system<S: GameSystem>(&mut self) -> bool {
        self.remove_system_with::<S>(InputWindow::EMPTY)
    }

    pub(crate) fn remove_system_with<S: GameSystem>(&mut self, window: InputWindow<'_>) -> bool {
        let target = TypeId::of::<S>();
        for index in 0..self.systems.len() {
            if self.systems[index].dead || self.systems[index].type_id != target {
                continue;
            }
            self.systems[index].dead = true;
            self.systems[index].began = false;
            if let Some(mut sys) = self.systems[index].sys.take() {
                let mut cx = SceneScope::new(self, window);
                sys.end_play(&mut cx);
            }
            // If the system is removing itself its slot is empty; the
            // dispatcher runs the end hook when the current hook returns.
            return true;
        }
        false
    }

    /// First system of the given type
    pub fn system<S: GameSystem>(&self) -> Option<&S> {
        self.systems
            .iter()
            .filter(|slot| !slot.dead)
            .filter_map(|slot| slot.sys.as_deref())
            .find_map(|sys| (sys as &dyn Any).downcast_ref::<S>())
    }

    /// First system of the given type, mutably
    pub fn system_mut<S: GameSystem>(&mut self) -> Option<&mut S> {
        self.systems
            .iter_mut()
            .filter(|slot| !slot.dead)
            .filter_map(|slot| slot.sys.as_deref_mut())
            .find_map(|sys| (sys as &mut dyn Any).downcast_mut::<S>())
    }

    // ---- phase orchestration (engine-only entry points) --------------

    pub(crate) fn begin_play(&mut self, window: InputWindow<'_>) {
        if self.has_begun {
            return;
        }
        log::debug!(
            "scene begin_play: {} systems, {} actors",
            self.systems.len(),
            self.order.len()
        );
        self.has_begun = true;
        self.dispatch_systems(Phase::Begin, window, 0.0);
        let snapshot = self.order.clone();
        for key in snapshot {
            self.dispatch_actor(key, Phase::Begin, window, 0.0);
        }
    }

    pub(crate) fn tick(&mut self, window: InputWindow<'_>, dt: f32) {
        self.dispatch_systems(Phase::Update, window, dt);

        let snapshot = self.order.clone();
        for key in &snapshot {
            self.dispatch_actor(*key, Phase::Update, window, dt);
        }
        for key in &snapshot {
            self.dispatch_actor(*key, Phase::PostUpdate, window, dt);
        }

        self.dispatch_systems(Phase::PostUpdate, window, dt);
    }

    pub(crate) fn render(&mut self, window: InputWindow<'_>, dt: f32) {
        let snapshot = self.order.clone();
        for key in snapshot {
            self.dispatch_actor(key, Phase::Render, window, dt);
        }
        self.dispatch_systems(Phase::Render, window, dt);
    }

    pub(crate) fn end_play(&mut self, window: InputWindow<'_>) {
        let snapshot = self.order.clone();
        for key in snapshot {
            self.dispatch_actor(key, Phase::End, window, 0.0);
        }
        self.dispatch_systems(Phase::End, window, 0.0);
        self.has_begun = false;
    }

    /// Run one phase of one actor, tolerating destruction underneath.
    fn dispatch_actor(&mut self, key: ActorKey, phase: Phase, window: InputWindow<'_>, dt: f32) {
        let Some(slot) = self.actors.get_mut(key) else {
            // Destroyed earlier in this phase; skipped without error.
            return;
        };
        let Some(mut taken) = slot.take() else {
            return;
        };
        taken.dispatch(phase, key, self, window, dt);
        if let Some(slot) = self.actors.get_mut(key) {
            *slot = Some(taken);
        } else if !matches!(phase, Phase::End) {
            // The actor destroyed itself during its own hook; it is
            // already unlinked, so close out its lifecycle here.
            taken.dispatch(Phase::End, key, self, window, 0.0);
        }
    }

    fn dispatch_systems(&mut self, phase: Phase, window: InputWindow<'_>, dt: f32) {
        let mut index = 0;
        while index < self.systems.len() {
            let run = {
                let slot = &self.systems[index];
                let phase_ok = match phase {
                    Phase::Begin => !slot.began,
                    Phase::End => true,
                    _ => slot.began,
                };
                !slot.dead && slot.sys.is_some() && phase_ok
            };
            if run {
                match phase {
                    Phase::Begin => self.systems[index].began = true,
                    Phase::End => self.systems[index].began = false,
                    _ => {}
                }
                if let Some(mut sys) = self.systems[index].sys.take() {
                    {
                        let mut cx = SceneScope::new(self, window);
                        match phase {
                            Phase::Begin => sys.begin_play(&mut cx),
                            Phase::Update => sys.tick(&mut cx, dt),
                            Phase::PostUpdate => sys.post_tick(&mut cx, dt),
                            Phase::Render => sys.render(&mut cx, dt),
                            Phase::End => sys.end_play(&mut cx),
                        }
                    }
                    if self.systems[index].dead {
                        if !matches!(phase, Phase::End) {
                            let mut cx = SceneScope::new(self, window);
                            sys.end_play(&mut cx);
                        }
                    } else {
                        self.systems[index].sys = Some(sys);
                    }
                }
            }
            index += 1;
        }
        self.systems.retain(|slot| !slot.dead);
    }

    fn begin_system_at(&mut self, index: usize, window: InputWindow<'_>) {
        if self.systems[index].dead || self.systems[index].began {
            return;
        }
        self.systems[index].began = true;
        if let Some(mut sys) = self.systems[index].sys.take() {
            {
                let mut cx = SceneScope::new(self, window);
                sys.begin_play(&mut cx);
            }
            if self.systems[index].dead {
                let mut cx = SceneScope::new(self, window);
                sys.end_play(&mut cx);
            } else {
                self.systems[index].sys = Some(sys);
            }
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("actors", &self.order.len())
            .field("systems", &self.systems.len())
            .field("has_begun", &self.has_begun)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    type CallLog = Rc<RefCell<Vec<String>>>;

    fn new_log() -> CallLog {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn record(log: &CallLog, entry: impl Into<String>) {
        log.borrow_mut().push(entry.into());
    }

    fn entries(log: &CallLog) -> Vec<String> {
        log.borrow().clone()
    }

    struct ProbeSystem {
        name: &'static str,
        log: CallLog,
    }

    impl GameSystem for ProbeSystem {
        fn begin_play(&mut self, _cx: &mut SceneScope<'_>) {
            record(&self.log, format!("{}.begin", self.name));
        }
        fn tick(&mut self, _cx: &mut SceneScope<'_>, _dt: f32) {
            record(&self.log, format!("{}.tick", self.name));
        }
        fn post_tick(&mut self, _cx: &mut SceneScope<'_>, _dt: f32) {
            record(&self.log, format!("{}.post_tick", self.name));
        }
        fn render(&mut self, _cx: &mut SceneScope<'_>, _dt: f32) {
            record(&self.log, format!("{}.render", self.name));
        }
        fn end_play(&mut self, _cx: &mut SceneScope<'_>) {
            record(&self.log, format!("{}.end", self.name));
        }
    }

    struct ProbeBehavior {
        name: &'static str,
        log: CallLog,
    }

    impl ActorBehavior for ProbeBehavior {
        fn begin_play(&mut self, _cx: &mut ActorScope<'_>) {
            record(&self.log, format!("{}.begin", self.name));
        }
        fn update(&mut self, _cx: &mut ActorScope<'_>, _dt: f32) {
            record(&self.log, format!("{}.update", self.name));
        }
        fn post_update(&mut self, _cx: &mut ActorScope<'_>, _dt: f32) {
            record(&self.log, format!("{}.post_update", self.name));
        }
        fn render(&mut self, _cx: &mut ActorScope<'_>, _dt: f32) {
            record(&self.log, format!("{}.render", self.name));
        }
        fn end_play(&mut self, _cx: &mut ActorScope<'_>) {
            record(&self.log, format!("{}.end", self.name));
        }
    }

    struct ProbeComponent {
        name: &'static str,
        log: CallLog,
    }

    impl ActorComponent for ProbeComponent {
        fn begin_play(&mut self, _cx: &mut ActorScope<'_>) {
            record(&self.log, format!("{}.begin", self.name));
        }
        fn update(&mut self, _cx: &mut ActorScope<'_>, _dt: f32) {
            record(&self.log, format!("{}.update", self.name));
        }
        fn end_play(&mut self, _cx: &mut ActorScope<'_>) {
            record(&self.log, format!("{}.end", self.name));
        }
    }

    fn probe_actor(name: &'static str, log: &CallLog) -> Actor {
        Actor::with_behavior(
            name,
            ProbeBehavior {
                name,
                log: Rc::clone(log),
            },
        )
    }

    #[test]
    fn tick_phases_run_in_exact_order() {
        let log = new_log();
        let mut scene = Scene::new();
        scene.add_system(ProbeSystem {
            name: "sys",
            log: Rc::clone(&log),
        });
        scene.add_actor(probe_actor("a1", &log));
        scene.add_actor(probe_actor("a2", &log));

        scene.begin_play(InputWindow::EMPTY);
        log.borrow_mut().clear();
        scene.tick(InputWindow::EMPTY, 0.016);

        assert_eq!(
            entries(&log),
            vec![
                "sys.tick",
                "a1.update",
                "a2.update",
                "a1.post_update",
                "a2.post_update",
                "sys.post_tick",
            ]
        );
    }

    #[test]
    fn begin_play_runs_systems_then_actors_in_insertion_order() {
        let log = new_log();
        let mut scene = Scene::new();
        scene.add_actor(probe_actor("a1", &log));
        scene.add_system(ProbeSystem {
            name: "s1",
            log: Rc::clone(&log),
        });
        scene.add_system(ProbeSystem {
            name: "s2",
            log: Rc::clone(&log),
        });
        scene.add_actor(probe_actor("a2", &log));

        scene.begin_play(InputWindow::EMPTY);
        assert_eq!(entries(&log), vec!["s1.begin", "s2.begin", "a1.begin", "a2.begin"]);
        assert!(scene.has_begun());
    }

    #[test]
    fn end_play_runs_actors_then_systems_and_clears_flags() {
        let log = new_log();
        let mut scene = Scene::new();
        scene.add_system(ProbeSystem {
            name: "sys",
            log: Rc::clone(&log),
        });
        let key = scene.add_actor(probe_actor("a1", &log));

        scene.begin_play(InputWindow::EMPTY);
        log.borrow_mut().clear();
        scene.end_play(InputWindow::EMPTY);

        assert_eq!(entries(&log), vec!["a1.end", "sys.end"]);
        assert!(!scene.has_begun());
        assert!(!scene.actor(key).unwrap().has_begun_play());
    }

    #[test]
    fn render_runs_actors_then_systems() {
        let log = new_log();
        let mut scene = Scene::new();
        scene.add_system(ProbeSystem {
            name: "sys",
            log: Rc::clone(&log),
        });
        scene.add_actor(probe_actor("a1", &log));

        scene.begin_play(InputWindow::EMPTY);
        log.borrow_mut().clear();
        scene.render(InputWindow::EMPTY, 0.016);

        assert_eq!(entries(&log), vec!["a1.render", "sys.render"]);
    }

    struct Killer {
        victim: Rc<Cell<Option<ActorKey>>>,
        log: CallLog,
    }

    impl ActorBehavior for Killer {
        fn update(&mut self, cx: &mut ActorScope<'_>, _dt: f32) {
            record(&self.log, "killer.update");
            if let Some(victim) = self.victim.take() {
                assert!(cx.destroy_actor(victim));
            }
        }
        fn post_update(&mut self, _cx: &mut ActorScope<'_>, _dt: f32) {
            record(&self.log, "killer.post_update");
        }
    }

    #[test]
    fn actor_destroyed_mid_update_skips_its_remaining_hooks() {
        let log = new_log();
        let victim_cell = Rc::new(Cell::new(None));
        let mut scene = Scene::new();
        scene.add_actor(Actor::with_behavior(
            "killer",
            Killer {
                victim: Rc::clone(&victim_cell),
                log: Rc::clone(&log),
            },
        ));
        let victim = scene.add_actor(probe_actor("victim", &log));
        victim_cell.set(Some(victim));

        scene.begin_play(InputWindow::EMPTY);
        log.borrow_mut().clear();
        scene.tick(InputWindow::EMPTY, 0.016);

        // The victim's end hook fires inside the killer's update; the
        // victim then never updates or post-updates this tick.
        assert_eq!(
            entries(&log),
            vec!["killer.update", "victim.end", "killer.post_update"]
        );
        assert!(!scene.contains_actor(victim));
        assert_eq!(scene.actor_count(), 1);
    }

    struct SelfDestruct {
        log: CallLog,
    }

    impl ActorBehavior for SelfDestruct {
        fn update(&mut self, cx: &mut ActorScope<'_>, _dt: f32) {
            record(&self.log, "doomed.update");
            cx.destroy();
        }
        fn post_update(&mut self, _cx: &mut ActorScope<'_>, _dt: f32) {
            record(&self.log, "doomed.post_update");
        }
        fn end_play(&mut self, _cx: &mut ActorScope<'_>) {
            record(&self.log, "doomed.end");
        }
    }

    #[test]
    fn actor_may_destroy_itself_during_its_own_update() {
        let log = new_log();
        let mut scene = Scene::new();
        let key = scene.add_actor(Actor::with_behavior(
            "doomed",
            SelfDestruct {
                log: Rc::clone(&log),
            },
        ));

        scene.begin_play(InputWindow::EMPTY);
        log.borrow_mut().clear();
        scene.tick(InputWindow::EMPTY, 0.016);

        assert_eq!(entries(&log), vec!["doomed.update", "doomed.end"]);
        assert!(!scene.contains_actor(key));
        assert_eq!(scene.actor_count(), 0);
    }

    struct SpawnOnce {
        log: CallLog,
        spawned: bool,
    }

    impl ActorBehavior for SpawnOnce {
        fn update(&mut self, cx: &mut ActorScope<'_>, _dt: f32) {
            record(&self.log, "spawner.update");
            if !self.spawned {
                self.spawned = true;
                cx.spawn_actor(Actor::with_behavior(
                    "late",
                    ProbeBehavior {
                        name: "late",
                        log: Rc::clone(&self.log),
                    },
                ));
            }
        }
    }

    #[test]
    fn actor_spawned_mid_phase_begins_now_but_ticks_next_frame() {
        let log = new_log();
        let mut scene = Scene::new();
        scene.add_actor(Actor::with_behavior(
            "spawner",
            SpawnOnce {
                log: Rc::clone(&log),
                spawned: false,
            },
        ));

        scene.begin_play(InputWindow::EMPTY);
        log.borrow_mut().clear();
        scene.tick(InputWindow::EMPTY, 0.016);
        assert_eq!(entries(&log), vec!["spawner.update", "late.begin"]);

        log.borrow_mut().clear();
        scene.tick(InputWindow::EMPTY, 0.016);
        assert_eq!(
            entries(&log),
            vec!["spawner.update", "late.update", "late.post_update"]
        );
    }

    #[test]
    fn actor_added_to_begun_scene_starts_at_attach_time() {
        let log = new_log();
        let mut scene = Scene::new();
        scene.begin_play(InputWindow::EMPTY);

        let key = scene.add_actor(
            probe_actor("late", &log).with_component(ProbeComponent {
                name: "late_comp",
                log: Rc::clone(&log),
            }),
        );

        assert_eq!(entries(&log), vec!["late.begin", "late_comp.begin"]);
        assert!(scene.actor(key).unwrap().has_begun_play());
    }

    #[test]
    fn removed_actor_is_returned_detached_and_reattachable() {
        let log = new_log();
        let mut scene = Scene::new();
        let key = scene.add_actor(probe_actor("roamer", &log));
        scene.begin_play(InputWindow::EMPTY);
        log.borrow_mut().clear();

        let actor = scene.remove_actor(key).unwrap();
        assert_eq!(entries(&log), vec!["roamer.end"]);
        assert!(!actor.has_begun_play());
        assert!(!scene.contains_actor(key));

        log.borrow_mut().clear();
        let rekey = scene.add_actor(actor);
        assert_ne!(key, rekey);
        assert_eq!(entries(&log), vec!["roamer.begin"]);
    }

    struct ComponentAdder {
        log: CallLog,
        added: bool,
    }

    impl ActorBehavior for ComponentAdder {
        fn update(&mut self, cx: &mut ActorScope<'_>, _dt: f32) {
            if !self.added {
                self.added = true;
                cx.add_component(ProbeComponent {
                    name: "live_comp",
                    log: Rc::clone(&self.log),
                });
            }
        }
    }

    #[test]
    fn component_added_to_live_actor_begins_immediately() {
        let log = new_log();
        let mut scene = Scene::new();
        scene.add_actor(Actor::with_behavior(
            "host",
            ComponentAdder {
                log: Rc::clone(&log),
                added: false,
            },
        ));

        scene.begin_play(InputWindow::EMPTY);
        log.borrow_mut().clear();
        scene.tick(InputWindow::EMPTY, 0.016);

        // Begun inside the behavior's update; the live component sweep
        // then reaches the new component within the same tick.
        assert_eq!(entries(&log), vec!["live_comp.begin", "live_comp.update"]);
    }

    struct ChainComponent {
        log: CallLog,
    }

    impl ActorComponent for ChainComponent {
        fn begin_play(&mut self, cx: &mut ActorScope<'_>) {
            record(&self.log, "chain.begin");
            cx.add_component(ProbeComponent {
                name: "chained",
                log: Rc::clone(&self.log),
            });
        }
    }

    #[test]
    fn component_added_during_begin_hook_starts_exactly_once() {
        let log = new_log();
        let mut scene = Scene::new();
        scene.add_actor(Actor::new("host").with_component(ChainComponent {
            log: Rc::clone(&log),
        }));

        scene.begin_play(InputWindow::EMPTY);
        assert_eq!(entries(&log), vec!["chain.begin", "chained.begin"]);
    }

    struct ComponentRemover;

    impl ActorBehavior for ComponentRemover {
        fn update(&mut self, cx: &mut ActorScope<'_>, _dt: f32) {
            cx.remove_component::<ProbeComponent>();
        }
    }

    #[test]
    fn removing_a_component_fires_its_end_hook_and_unlinks() {
        let log = new_log();
        let mut scene = Scene::new();
        let key = scene.add_actor(
            Actor::with_behavior("host", ComponentRemover).with_component(ProbeComponent {
                name: "comp",
                log: Rc::clone(&log),
            }),
        );

        scene.begin_play(InputWindow::EMPTY);
        log.borrow_mut().clear();
        scene.tick(InputWindow::EMPTY, 0.016);

        assert_eq!(entries(&log), vec!["comp.end"]);
        assert!(scene.actor(key).unwrap().component::<ProbeComponent>().is_none());
    }

    struct TagSystem {
        value: u32,
    }

    impl GameSystem for TagSystem {}

    #[test]
    fn systems_and_actors_resolve_by_type_and_name() {
        let mut scene = Scene::new();
        scene.add_system(TagSystem { value: 9 });
        let key = scene.add_actor(Actor::new("Player"));
        scene.add_actor(Actor::new("Camera"));

        assert_eq!(scene.system::<TagSystem>().unwrap().value, 9);
        assert!(scene.system::<ProbeSystem>().is_none());
        assert_eq!(scene.find_actor("Player"), Some(key));
        assert!(scene.find_actor("Ghost").is_none());

        scene.system_mut::<TagSystem>().unwrap().value = 11;
        assert_eq!(scene.system::<TagSystem>().unwrap().value, 11);
    }

    #[test]
    fn removed_system_stops_ticking_after_its_end_hook() {
        let log = new_log();
        let mut scene = Scene::new();
        scene.add_system(ProbeSystem {
            name: "sys",
            log: Rc::clone(&log),
        });
        scene.begin_play(InputWindow::EMPTY);
        log.borrow_mut().clear();

        assert!(scene.remove_system::<ProbeSystem>());
        assert_eq!(entries(&log), vec!["sys.end"]);
        assert!(scene.system::<ProbeSystem>().is_none());

        log.borrow_mut().clear();
        scene.tick(InputWindow::EMPTY, 0.016);
        assert!(entries(&log).is_empty());
        assert!(!scene.remove_system::<ProbeSystem>());
    }

    #[test]
    fn scene_rng_uses_the_fixed_default_seed() {
        let mut scene = Scene::new();
        let mut reference = DeterministicRng::new(DEFAULT_SEED);
        assert_eq!(scene.rng().next(), reference.next());
    }

    #[test]
    fn stale_keys_resolve_to_nothing_everywhere() {
        let mut scene = Scene::new();
        let key = scene.add_actor(Actor::new("gone"));
        scene.remove_actor(key);

        assert!(scene.actor(key).is_none());
        assert!(scene.actor_mut(key).is_none());
        assert!(!scene.contains_actor(key));
        assert!(scene.remove_actor(key).is_none());
    }
}
