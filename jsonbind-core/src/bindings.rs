//! The structural binding container.
//!
//! Every synthesized object instance is backed by exactly one [`Bindings`]:
//! an ordered, string-keyed map of [`Value`]s. Generated getters and setters
//! are sugar over [`Bindings::get`] and [`Bindings::put`].
//!
//! A `Bindings` is a handle. Cloning it, or storing it inside another
//! binding, aliases the same storage, so mutations through one handle are
//! observed by every other. Use [`Bindings::deep_copy`] for a detached copy.
//!
//! A key holding a union value may also carry an alternative tag: the index
//! of the alternative it was last written as. Tags travel with the storage,
//! so every handle sees them, but they are not part of equality or text.
//!
//! A binding may contain itself through a nested handle. [`Bindings::deep_copy`]
//! and `==` handle such cycles; the JSON text conversions and `Debug` do not
//! terminate on them.
//!
//! The container is not synchronized and is neither `Send` nor `Sync`.

use crate::value::Value;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

#[derive(Default)]
struct Storage {
    entries: IndexMap<String, Value>,
    alternatives: HashMap<String, usize>,
}

/// Ordered key/value container backing synthesized instances.
#[derive(Clone, Default)]
pub struct Bindings {
    inner: Rc<RefCell<Storage>>,
}

thread_local! {
    // Pairs of storages under comparison; a pair seen again compares equal.
    static COMPARING: RefCell<HashSet<(usize, usize)>> = RefCell::new(HashSet::new());
}

impl Bindings {
    /// Creates an empty binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty binding with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Storage {
                entries: IndexMap::with_capacity(capacity),
                alternatives: HashMap::new(),
            })),
        }
    }

    /// Returns the value stored under `key`.
    ///
    /// Nested objects come back as handles to the same storage.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.borrow().entries.get(key).cloned()
    }

    /// Stores `value` under `key`, returning the previous value.
    ///
    /// Re-inserting an existing key keeps its original position. Any
    /// alternative tag on the key is cleared.
    pub fn put(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let mut storage = self.inner.borrow_mut();
        storage.alternatives.remove(&key);
        storage.entries.insert(key, value.into())
    }

    /// Stores `value` under `key` as union alternative `index`, returning the
    /// previous value.
    pub fn put_alternative(
        &self,
        key: impl Into<String>,
        value: impl Into<Value>,
        index: usize,
    ) -> Option<Value> {
        let key = key.into();
        let mut storage = self.inner.borrow_mut();
        storage.alternatives.insert(key.clone(), index);
        storage.entries.insert(key, value.into())
    }

    /// Returns the alternative `key` was last written as, if it was written
    /// through [`Bindings::put_alternative`] and not overwritten since.
    #[must_use]
    pub fn alternative(&self, key: &str) -> Option<usize> {
        let storage = self.inner.borrow();
        if storage.entries.contains_key(key) {
            storage.alternatives.get(key).copied()
        } else {
            None
        }
    }

    /// Removes `key`, preserving the order of the remaining entries.
    pub fn remove(&self, key: &str) -> Option<Value> {
        let mut storage = self.inner.borrow_mut();
        storage.alternatives.remove(key);
        storage.entries.shift_remove(key)
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.borrow().entries.contains_key(key)
    }

    /// Returns a snapshot of all entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Returns the keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().entries.keys().cloned().collect()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Returns true if both handles point at the same storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn address(&self) -> usize {
        Rc::as_ptr(&self.inner) as usize
    }

    /// Returns a copy that shares no storage with `self`.
    ///
    /// Nested bindings, including those inside arrays, are copied as well,
    /// along with alternative tags. A handle that appears twice is copied
    /// once, so shared children stay shared and cycles stay cycles.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        self.deep_copy_with(&mut HashMap::new())
    }

    fn deep_copy_with(&self, copies: &mut HashMap<usize, Bindings>) -> Self {
        if let Some(copy) = copies.get(&self.address()) {
            return copy.clone();
        }
        let copy = Self::with_capacity(self.len());
        copies.insert(self.address(), copy.clone());
        let (entries, alternatives) = {
            let storage = self.inner.borrow();
            (storage.entries.clone(), storage.alternatives.clone())
        };
        for (key, value) in &entries {
            let value = deep_copy_value(value, copies);
            copy.inner.borrow_mut().entries.insert(key.clone(), value);
        }
        copy.inner.borrow_mut().alternatives = alternatives;
        copy
    }
}

fn deep_copy_value(value: &Value, copies: &mut HashMap<usize, Bindings>) -> Value {
    match value {
        Value::Object(b) => Value::Object(b.deep_copy_with(copies)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| deep_copy_value(item, copies))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Deep equality, insensitive to key order and sensitive to sequence order.
impl PartialEq for Bindings {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let pair = (self.address(), other.address());
        if !COMPARING.with(|pairs| pairs.borrow_mut().insert(pair)) {
            return true;
        }
        let left = self.inner.borrow().entries.clone();
        let right = other.inner.borrow().entries.clone();
        let equal = left.len() == right.len()
            && left.iter().all(|(key, value)| right.get(key) == Some(value));
        COMPARING.with(|pairs| pairs.borrow_mut().remove(&pair));
        equal
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_text())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let bindings = Self::new();
        for (k, v) in iter {
            bindings.put(k, v);
        }
        bindings
    }
}
