use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use tracing::{debug, warn};

/// Name and value type of one session entry.
///
/// Declare keys as constants next to the app that owns them:
///
/// ```
/// use dayboard_core::session::Key;
/// const COUNTER: Key<u32> = Key::new("counter");
/// ```
pub struct Key<T> {
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.name)
    }
}

/// Keyed values belonging to one session.
///
/// There is no locking: the host runs at most one callback or render pass
/// per session at a time.
#[derive(Default)]
pub struct SessionStore {
    entries: HashMap<&'static str, Box<dyn Any + Send>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value, installing `default()` first if the key is
    /// absent.
    ///
    /// A value stored under the same name with a different type is treated as
    /// absent and replaced.
    pub fn get_or_init<T, F>(&mut self, key: Key<T>, default: F) -> &mut T
    where
        T: Any + Send,
        F: FnOnce() -> T,
    {
        let present = self.entries.get(key.name).map(|v| v.is::<T>());
        match present {
            Some(true) => {}
            Some(false) => {
                warn!(key = key.name, "session value has unexpected type, resetting to default");
                self.entries.insert(key.name, Box::new(default()));
            }
            None => {
                debug!(key = key.name, "initializing session value");
                self.entries.insert(key.name, Box::new(default()));
            }
        }
        match self.entries.get_mut(key.name).and_then(|v| v.downcast_mut::<T>()) {
            Some(value) => value,
            None => unreachable!("session value for `{}` was just installed", key.name),
        }
    }

    pub fn get<T: Any + Send>(&self, key: Key<T>) -> Option<&T> {
        self.entries.get(key.name)?.downcast_ref::<T>()
    }

    /// Unconditional overwrite.
    pub fn set<T: Any + Send>(&mut self, key: Key<T>, value: T) {
        self.entries.insert(key.name, Box::new(value));
    }

    /// Applies `f` to the value in place, initializing it first if needed.
    pub fn mutate<T, D, F, R>(&mut self, key: Key<T>, default: D, f: F) -> R
    where
        T: Any + Send,
        D: FnOnce() -> T,
        F: FnOnce(&mut T) -> R,
    {
        f(self.get_or_init(key, default))
    }

    pub fn remove<T: Any + Send>(&mut self, key: Key<T>) -> Option<T> {
        let boxed = self.entries.remove(key.name)?;
        boxed.downcast::<T>().ok().map(|v| *v)
    }

    pub fn contains<T: Any + Send>(&self, key: Key<T>) -> bool {
        self.entries.get(key.name).is_some_and(|v| v.is::<T>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("SessionStore").field("keys", &keys).finish()
    }
}
