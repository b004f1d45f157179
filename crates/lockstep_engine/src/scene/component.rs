//! Units of behavior attached to actors

use std::any::{Any, TypeId};

use crate::math::{Bounds, Transform};
use crate::scene::actor::ActorScope;

/// A unit of behavior owned by exactly one actor
///
/// Hooks receive the [`ActorScope`] of the owning actor, which is the only
/// way to reach the actor's state or the scene from inside a component;
/// a component can therefore never observe itself detached. All hooks
/// default to no-ops, so a component implements only the phases it cares
/// about.
///
/// Lifecycle mirrors the owning actor's, with one addition: a component
/// added to an actor that has already begun play receives its begin hook
/// immediately. The end hook may run on a component whose begin hook never
/// ran (removal in degenerate flows), and must tolerate that.
#[allow(unused_variables)]
pub trait ActorComponent: Any {
    /// Called when play begins, or immediately when added to a live actor
    fn begin_play(&mut self, cx: &mut ActorScope<'_>) {}

    /// Called every simulation tick during the update phase
    fn update(&mut self, cx: &mut ActorScope<'_>, dt: f32) {}

    /// Called every simulation tick after all actors updated
    fn post_update(&mut self, cx: &mut ActorScope<'_>, dt: f32) {}

    /// Called once per rendered frame; purely observational
    fn render(&mut self, cx: &mut ActorScope<'_>, dt: f32) {}

    /// Called when the component is removed or the actor leaves the scene
    fn end_play(&mut self, cx: &mut ActorScope<'_>) {}

    /// World-space extent of this component given the owner's transform
    ///
    /// The default is an invalid (empty) box, which aggregation skips.
    fn bounds(&self, transform: &Transform) -> Bounds {
        let _ = transform;
        Bounds::default()
    }
}

/// Storage cell for one component within an actor
///
/// `comp` is taken out while the component's own hook runs, so hook code
/// can borrow the rest of the actor freely. `dead` marks removal; dead
/// slots are skipped by lookups and swept once the current dispatch is
/// done, which keeps slot indices stable while hooks mutate the list.
pub(crate) struct ComponentSlot {
    pub(crate) comp: Option<Box<dyn ActorComponent>>,
    pub(crate) type_id: TypeId,
    pub(crate) began: bool,
    pub(crate) dead: bool,
}

impl ComponentSlot {
    pub(crate) fn new(comp: Box<dyn ActorComponent>) -> Self {
        let type_id = (comp.as_ref() as &dyn Any).type_id();
        Self {
            comp: Some(comp),
            type_id,
            began: false,
            dead: false,
        }
    }
}

/// Fold the bounds of every live component into one box
pub(crate) fn aggregate_bounds(slots: &[ComponentSlot], transform: &Transform) -> Bounds {
    let mut bounds = Bounds::default();
    for slot in slots {
        if slot.dead {
            continue;
        }
        if let Some(comp) = &slot.comp {
            bounds.encapsulate_bounds(&comp.bounds(transform));
        }
    }
    bounds
}
