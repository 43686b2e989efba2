use crate::action::Action;
use crate::object::ObjectPtr;
use std::fmt;
use uuid::Uuid;

/// Callback invoked with the affected snapshot and the action bits.
pub type ObserverCallback = Box<dyn FnMut(&ObjectPtr, Action) + Send>;

/// Opaque token identifying one observer registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(Uuid);

impl ObserverHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Ordered list of observers. Dispatch follows registration order.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<(ObserverHandle, ObserverCallback)>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&mut self, callback: F) -> ObserverHandle
    where
        F: FnMut(&ObjectPtr, Action) + Send + 'static,
    {
        let handle = ObserverHandle::new();
        self.observers.push((handle, Box::new(callback)));
        handle
    }

    /// Deregister. Returns false if the handle was unknown (or already removed).
    pub fn remove(&mut self, handle: ObserverHandle) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(h, _)| *h != handle);
        self.observers.len() != before
    }

    pub fn contains(&self, handle: ObserverHandle) -> bool {
        self.observers.iter().any(|(h, _)| *h == handle)
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver one change to every observer, in registration order.
    pub fn notify(&mut self, object: &ObjectPtr, action: Action) {
        for (_, callback) in &mut self.observers {
            callback(object, action);
        }
    }

    /// Deliver a sequence of changes to a single observer.
    pub fn notify_one<'a>(
        &mut self,
        handle: ObserverHandle,
        objects: impl IntoIterator<Item = &'a ObjectPtr>,
        action: Action,
    ) -> bool {
        let Some((_, callback)) = self.observers.iter_mut().find(|(h, _)| *h == handle) else {
            return false;
        };
        for object in objects {
            callback(object, action);
        }
        true
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.observers.iter().map(|(h, _)| h))
            .finish()
    }
}
