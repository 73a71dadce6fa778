// Handle Management System: integer handles over owned matrices
//
// Callers that prefer a handle-based contract (allocate / operate / release)
// address matrices by integer handles that index into a registry. Handles are
// issued in increasing order and never reused, so an issued handle with no
// live object behind it has been released. A later use or a second release is
// reported as `UseAfterRelease` instead of being confused with an unknown handle.

use crate::core::error::{Result, SparseError};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Live objects plus the next handle to issue
struct Slots<T> {
    live: HashMap<usize, T>,
    next_handle: usize,
}

impl<T> Slots<T> {
    /// Error for a handle with no live object behind it
    fn missing(&self, handle: usize) -> SparseError {
        if handle != 0 && handle < self.next_handle {
            SparseError::UseAfterRelease
        } else {
            SparseError::NullPointer
        }
    }

    fn get(&self, handle: usize) -> Result<&T> {
        self.live.get(&handle).ok_or_else(|| self.missing(handle))
    }
}

/// Generic handle registry for a specific object type
pub struct HandleRegistry<T> {
    slots: Mutex<Slots<T>>,
}

impl<T> HandleRegistry<T> {
    /// Create a new handle registry
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Slots {
                live: HashMap::new(),
                next_handle: 1, // Start at 1 (NULL is 0)
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slots<T>> {
        // A panic while holding the lock cannot leave a slot half-written
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a new object and return its handle
    pub fn insert(&self, object: T) -> usize {
        let mut slots = self.lock();
        let handle = slots.next_handle;
        slots.next_handle += 1;
        slots.live.insert(handle, object);
        handle
    }

    /// Run `f` with a shared reference to the object behind `handle`
    pub fn with<R>(&self, handle: usize, f: impl FnOnce(&T) -> R) -> Result<R> {
        let slots = self.lock();
        Ok(f(slots.get(handle)?))
    }

    /// Run `f` with shared references to two (possibly identical) objects
    pub fn with_pair<R>(
        &self,
        first: usize,
        second: usize,
        f: impl FnOnce(&T, &T) -> R,
    ) -> Result<R> {
        let slots = self.lock();
        let a = slots.get(first)?;
        let b = slots.get(second)?;
        Ok(f(a, b))
    }

    /// Run `f` with a mutable reference to the object behind `handle`
    pub fn with_mut<R>(&self, handle: usize, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut slots = self.lock();
        if let Some(object) = slots.live.get_mut(&handle) {
            return Ok(f(object));
        }
        Err(slots.missing(handle))
    }

    /// Remove an object by its handle
    ///
    /// Returns the object so the caller decides how to dispose of it.
    /// Removing twice fails with `UseAfterRelease`.
    pub fn remove(&self, handle: usize) -> Result<T> {
        let mut slots = self.lock();
        match slots.live.remove(&handle) {
            Some(object) => Ok(object),
            None => Err(slots.missing(handle)),
        }
    }

    /// Check if a handle refers to a live object
    pub fn contains(&self, handle: usize) -> bool {
        self.lock().live.contains_key(&handle)
    }

    /// Check if a handle has been released
    pub fn is_released(&self, handle: usize) -> bool {
        self.with(handle, |_| ()) == Err(SparseError::UseAfterRelease)
    }

    /// Get the number of live handles
    pub fn len(&self) -> usize {
        self.lock().live.len()
    }

    /// Check if the registry has no live handles
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for HandleRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Macro to create a global handle registry for a specific type
#[macro_export]
macro_rules! define_handle_registry {
    ($registry_name:ident, $type:ty) => {
        lazy_static::lazy_static! {
            static ref $registry_name: $crate::core::handles::HandleRegistry<$type> =
                $crate::core::handles::HandleRegistry::new();
        }
    };
}
