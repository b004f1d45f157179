//! Engine-provided resource objects, looked up by type
//!
//! An [`EngineContext`] is an opaque resource the surrounding platform
//! registers with the engine before play: a window handle, an input
//! mapping table, a scoreboard, a network session. The kernel neither
//! creates, mutates, nor destroys them; it only hands them out by concrete
//! type. Contexts that want to be written through shared handles own their
//! interior mutability (`Cell`/`RefCell` fields).

use std::any::Any;
use std::rc::Rc;

/// Marker trait for engine-registered resource objects
///
/// Lookup is by concrete type, so each context type should be registered
/// at most once; with duplicates, the first registration wins.
pub trait EngineContext: Any {}

/// Insertion-ordered set of shared context handles
///
/// The engine owns one; the installed scene holds the same set, so systems
/// can reach contexts without a path back to the engine.
#[derive(Default, Clone)]
pub struct ContextSet {
    entries: Vec<Rc<dyn EngineContext>>,
}

impl ContextSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered contexts
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no contexts are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a context
    pub fn insert(&mut self, context: Rc<dyn EngineContext>) {
        self.entries.push(context);
    }

    /// Look up a context by concrete type
    pub fn get<T: EngineContext>(&self) -> Option<Rc<T>> {
        self.entries.iter().find_map(|entry| {
            let any: Rc<dyn Any> = entry.clone();
            any.downcast::<T>().ok()
        })
    }
}

impl std::fmt::Debug for ContextSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextSet")
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct WindowInfo {
        width: u32,
    }
    impl EngineContext for WindowInfo {}

    struct Scorecard {
        best: Cell<u32>,
    }
    impl EngineContext for Scorecard {}

    #[test]
    fn lookup_is_by_concrete_type() {
        let mut set = ContextSet::new();
        set.insert(Rc::new(WindowInfo { width: 640 }));
        set.insert(Rc::new(Scorecard { best: Cell::new(0) }));

        assert_eq!(set.get::<WindowInfo>().unwrap().width, 640);
        assert!(set.get::<Scorecard>().is_some());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn missing_type_reads_as_none() {
        let set = ContextSet::new();
        assert!(set.get::<WindowInfo>().is_none());
    }

    #[test]
    fn clones_share_the_same_context_objects() {
        let mut set = ContextSet::new();
        set.insert(Rc::new(Scorecard { best: Cell::new(0) }));
        let cloned = set.clone();

        set.get::<Scorecard>().unwrap().best.set(7);
        assert_eq!(cloned.get::<Scorecard>().unwrap().best.get(), 7);
    }
}
