//! Property bags carried by components and connections.

use std::sync::Arc;

use eko_foundation::Value;

/// Snapshot of a property bag.
///
/// Persistent map: cloning is O(1) and shares structure with the bag it was
/// taken from.
pub type PropertyMap = im::OrdMap<Arc<str>, Value>;

/// Builds a [`PropertyMap`] from key/value pairs.
///
/// `Nil` values are dropped, matching [`PropertyBag::set`].
pub fn props<K, V, I>(entries: I) -> PropertyMap
where
    K: Into<Arc<str>>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut bag = PropertyBag::new();
    bag.set_all(entries);
    bag.get_all()
}

/// Mutable key/value store.
///
/// Storing [`Value::Nil`] deletes the key: a bag never holds a nil.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyBag {
    values: PropertyMap,
}

impl PropertyBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads one key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Writes one key; `Nil` deletes it.
    pub fn set(&mut self, key: impl Into<Arc<str>>, value: impl Into<Value>) {
        let key = key.into();
        let value: Value = value.into();
        match value {
            Value::Nil => {
                self.values.remove(&key);
            }
            value => {
                self.values.insert(key, value);
            }
        }
    }

    /// Deletes one key, returning the old value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// True if the key holds a value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Snapshot of every live key.
    #[must_use]
    pub fn get_all(&self) -> PropertyMap {
        self.values.clone()
    }

    /// Applies each entry with [`set`](Self::set) semantics, in order.
    pub fn set_all<K, V, I>(&mut self, entries: I)
    where
        K: Into<Arc<str>>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.set(key, value);
        }
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(AsRef::as_ref)
    }

    /// Number of live keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no key is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
