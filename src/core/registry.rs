use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Entities stored in a [`Registry`] are addressed by a key
/// they carry themselves.
pub trait Keyed {
    type Key: Eq + Hash + Clone;
    fn key(&self) -> &Self::Key;
}

/// Identifier index over a set of entities. Lookups and replacements
/// are O(1); iteration follows insertion order, so dumps are deterministic.
///
/// The key of a stored entity must not change while it is stored.
pub struct Registry<V: Keyed> {
    slots: HashMap<V::Key, usize>,
    entries: Vec<V>,
}

impl<V: Keyed> Registry<V> {
    pub fn new() -> Registry<V> {
        Registry { slots: HashMap::new(), entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        V::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.slots.contains_key(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        V::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.slots.get(key).map(|&slot| &self.entries[slot])
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        V::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.slots.get(key) {
            Some(&slot) => Some(&mut self.entries[slot]),
            None => None
        }
    }

    /// Appends `value`, or replaces the entity with the same key
    /// in place, keeping its position.
    pub fn insert(&mut self, value: V) -> &mut V {
        let slot = match self.slots.get(value.key()) {
            Some(&slot) => {
                self.entries[slot] = value;
                slot
            },
            None => {
                let slot = self.entries.len();
                self.slots.insert(value.key().clone(), slot);
                self.entries.push(value);
                slot
            }
        };
        &mut self.entries[slot]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.entries.iter()
    }
}

impl<V: Keyed> Default for Registry<V> {
    fn default() -> Self {
        Registry::new()
    }
}

impl<'a, V: Keyed> IntoIterator for &'a Registry<V> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
