use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::item::{GeometryUpdate, ItemPhase, LayoutController};
use crate::geometry::{FitPolicy, LayoutBox, Orientation, RenderGeometry, Size};

/// Reference to one registration of an item.
///
/// Registering the same identity again (or after a discard) starts a new
/// generation; events carrying an older handle are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemHandle {
    pub key: PathBuf,
    pub generation: u64,
}

/// An input for one item, in a form that can cross threads.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutEvent {
    Measured { handle: ItemHandle, native: Size },
    BoxChanged { handle: ItemHandle, target: LayoutBox },
}

impl LayoutEvent {
    pub fn handle(&self) -> &ItemHandle {
        match self {
            Self::Measured { handle, .. } | Self::BoxChanged { handle, .. } => handle,
        }
    }
}

type Listener = Box<dyn FnMut(&Path, &GeometryUpdate)>;

struct Slot {
    generation: u64,
    controller: LayoutController,
}

/// Registry of per-item controllers for one presentation context.
pub struct LayoutEngine {
    slots: HashMap<PathBuf, Slot>,
    next_generation: u64,
    listener: Option<Listener>,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            next_generation: 0,
            listener: None,
        }
    }

    /// Install the callback that receives every geometry update. Replaces
    /// any previous listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&Path, &GeometryUpdate) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn unsubscribe(&mut self) {
        self.listener = None;
    }

    pub fn register(
        &mut self,
        key: impl Into<PathBuf>,
        orientation: Orientation,
        policy: FitPolicy,
    ) -> ItemHandle {
        let key = key.into();
        self.next_generation = self.next_generation.wrapping_add(1);
        let generation = self.next_generation;

        let controller = LayoutController::new(key.clone(), orientation, policy);
        if self
            .slots
            .insert(key.clone(), Slot { generation, controller })
            .is_some()
        {
            tracing::debug!(path = %key.display(), generation, "Re-registered item");
        }

        ItemHandle { key, generation }
    }

    /// Current handle for `key`, if registered.
    pub fn handle(&self, key: &Path) -> Option<ItemHandle> {
        self.slots.get(key).map(|slot| ItemHandle {
            key: key.to_path_buf(),
            generation: slot.generation,
        })
    }

    pub fn is_live(&self, handle: &ItemHandle) -> bool {
        self.slots
            .get(&handle.key)
            .is_some_and(|slot| slot.generation == handle.generation)
    }

    pub fn on_measured(&mut self, handle: &ItemHandle, native: Size) -> Option<GeometryUpdate> {
        let update = self.live_mut(handle)?.on_measured(native)?;
        self.publish(&handle.key, &update);
        Some(update)
    }

    pub fn on_box_changed(&mut self, handle: &ItemHandle, target: LayoutBox) -> Option<GeometryUpdate> {
        let update = self.live_mut(handle)?.on_box_changed(target)?;
        self.publish(&handle.key, &update);
        Some(update)
    }

    pub fn apply(&mut self, event: LayoutEvent) -> Option<GeometryUpdate> {
        match event {
            LayoutEvent::Measured { handle, native } => self.on_measured(&handle, native),
            LayoutEvent::BoxChanged { handle, target } => self.on_box_changed(&handle, target),
        }
    }

    /// Destroy the controller behind `handle`. Returns false when the handle
    /// was already stale.
    pub fn discard(&mut self, handle: &ItemHandle) -> bool {
        if !self.is_live(handle) {
            return false;
        }
        self.slots.remove(&handle.key);
        tracing::trace!(path = %handle.key.display(), "Discarded item");
        true
    }

    /// Keep only the items for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&Path, &LayoutController) -> bool) {
        let before = self.slots.len();
        self.slots.retain(|key, slot| keep(key, &slot.controller));
        let removed = before - self.slots.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = self.slots.len(), "Discarded items");
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn controller(&self, key: &Path) -> Option<&LayoutController> {
        self.slots.get(key).map(|slot| &slot.controller)
    }

    pub fn geometry(&self, key: &Path) -> Option<&RenderGeometry> {
        self.controller(key).and_then(LayoutController::geometry)
    }

    pub fn phase(&self, key: &Path) -> Option<ItemPhase> {
        self.controller(key).map(LayoutController::phase)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn live_mut(&mut self, handle: &ItemHandle) -> Option<&mut LayoutController> {
        match self.slots.get_mut(&handle.key) {
            Some(slot) if slot.generation == handle.generation => Some(&mut slot.controller),
            _ => {
                tracing::trace!(
                    path = %handle.key.display(),
                    generation = handle.generation,
                    "Dropping event for stale handle"
                );
                None
            }
        }
    }

    fn publish(&mut self, key: &Path, update: &GeometryUpdate) {
        if let Some(listener) = self.listener.as_mut() {
            listener(key, update);
        }
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(engine: &mut LayoutEngine) -> Rc<RefCell<Vec<(PathBuf, GeometryUpdate)>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        engine.subscribe(move |key, update| sink.borrow_mut().push((key.to_path_buf(), *update)));
        seen
    }

    #[test]
    fn test_listener_receives_updates() {
        let mut engine = LayoutEngine::new();
        let seen = recorder(&mut engine);
        let h = engine.register("a.jpg", Orientation::Rotate90, FitPolicy::Contain);

        assert_eq!(engine.on_box_changed(&h, LayoutBox::new(800.0, 800.0)), None);
        assert!(seen.borrow().is_empty());

        engine.on_measured(&h, Size::new(4000, 3000));
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, PathBuf::from("a.jpg"));
        assert_eq!(seen[0].1.geometry().map(|g| g.scale), Some(0.2));
        assert_eq!(engine.phase(Path::new("a.jpg")), Some(ItemPhase::Geometrized));
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut engine = LayoutEngine::new();
        let seen = recorder(&mut engine);
        let a = engine.register("a.jpg", Orientation::Normal, FitPolicy::Contain);
        let b = engine.register("b.jpg", Orientation::Normal, FitPolicy::Contain);
        engine.on_box_changed(&a, LayoutBox::new(800.0, 800.0));
        engine.on_box_changed(&b, LayoutBox::new(800.0, 800.0));

        engine.on_measured(&a, Size::new(4000, 3000));
        assert_eq!(seen.borrow().len(), 1);

        engine.unsubscribe();
        let update = engine.on_measured(&b, Size::new(4000, 3000));
        assert!(update.is_some_and(|u| u.geometry().is_some()));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_late_event_after_discard_is_noop() {
        let mut engine = LayoutEngine::new();
        let seen = recorder(&mut engine);
        let h = engine.register("a.jpg", Orientation::Normal, FitPolicy::Cover);
        engine.on_box_changed(&h, LayoutBox::new(330.0, 220.0));

        assert!(engine.discard(&h));
        assert!(!engine.discard(&h));
        assert_eq!(engine.on_measured(&h, Size::new(3000, 2000)), None);
        assert!(seen.borrow().is_empty());
        assert!(engine.is_empty());
    }

    #[test]
    fn test_reregistration_invalidates_old_handle() {
        let mut engine = LayoutEngine::new();
        let old = engine.register("a.jpg", Orientation::Normal, FitPolicy::Cover);
        let new = engine.register("a.jpg", Orientation::Rotate90, FitPolicy::Cover);
        assert_ne!(old, new);
        assert!(!engine.is_live(&old));
        assert!(engine.is_live(&new));

        // A stale measurement must not land on the new registration.
        assert_eq!(engine.on_measured(&old, Size::new(10, 20)), None);
        assert_eq!(engine.phase(Path::new("a.jpg")), Some(ItemPhase::Pending));

        // And discarding with the stale handle leaves the new one alone.
        assert!(!engine.discard(&old));
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_apply_routes_events() {
        let mut engine = LayoutEngine::new();
        let h = engine.register("a.jpg", Orientation::Normal, FitPolicy::Contain);
        engine.apply(LayoutEvent::BoxChanged {
            handle: h.clone(),
            target: LayoutBox::new(500.0, 500.0),
        });
        let update = engine.apply(LayoutEvent::Measured {
            handle: h,
            native: Size::new(1000, 1000),
        });
        assert_eq!(update.and_then(|u| u.geometry().map(|g| g.scale)), Some(0.5));
        assert_eq!(engine.geometry(Path::new("a.jpg")).map(|g| g.scale), Some(0.5));
    }

    #[test]
    fn test_events_cross_threads() {
        let mut engine = LayoutEngine::new();
        let h = engine.register("a.jpg", Orientation::Normal, FitPolicy::Contain);
        engine.on_box_changed(&h, LayoutBox::new(100.0, 100.0));

        let (tx, rx) = flume::unbounded();
        std::thread::spawn(move || {
            let _ = tx.send(LayoutEvent::Measured {
                handle: h,
                native: Size::new(200, 400),
            });
        });
        for event in rx.iter() {
            engine.apply(event);
        }
        assert_eq!(engine.geometry(Path::new("a.jpg")).map(|g| g.scale), Some(0.25));
    }

    #[test]
    fn test_retain() {
        let mut engine = LayoutEngine::new();
        let a = engine.register("a.jpg", Orientation::Normal, FitPolicy::Cover);
        let b = engine.register("b.jpg", Orientation::Normal, FitPolicy::Cover);
        engine.retain(|key, _| key != Path::new("a.jpg"));
        assert!(!engine.is_live(&a));
        assert!(engine.is_live(&b));
        assert_eq!(engine.handle(Path::new("b.jpg")), Some(b));
    }
}
