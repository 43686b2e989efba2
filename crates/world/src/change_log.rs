use crate::action::Action;
use crate::object::Object;
use crate::observer::ObserverHandle;
use crate::world::World;
use collision_common::Transform;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// One recorded change notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldChange {
    pub id: String,
    pub action: Action,
    /// Shape count of the notified snapshot (pre-removal state for `DESTROY`).
    pub shape_count: usize,
    pub pose: Transform,
}

/// Append-only record of world notifications, fed by an observer.
///
/// Cheap to clone; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    changes: Arc<Mutex<Vec<WorldChange>>>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log and register it as an observer of `world`.
    pub fn attach(world: &mut World) -> (Self, ObserverHandle) {
        let log = Self::new();
        let sink = log.clone();
        let handle = world.add_observer(move |object, action| sink.record(object, action));
        (log, handle)
    }

    pub fn record(&self, object: &Object, action: Action) {
        self.lock().push(WorldChange {
            id: object.id.clone(),
            action,
            shape_count: object.shape_count(),
            pose: object.pose,
        });
    }

    /// Copy of all recorded changes, oldest first.
    pub fn events(&self) -> Vec<WorldChange> {
        self.lock().clone()
    }

    /// Drain and return the recorded changes.
    pub fn drain_events(&self) -> Vec<WorldChange> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panicking observer elsewhere must not make the log unreadable.
    fn lock(&self) -> MutexGuard<'_, Vec<WorldChange>> {
        self.changes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
