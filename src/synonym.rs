use std::{borrow::Borrow, fmt::Debug, hash::Hash};

use ahash::AHashMap;

/// A map whose values can also be reached through synonyms of their keys.
///
/// Synonyms are one level deep: a synonym always points at a real key.
#[derive(Clone)]
pub struct SynonymMap<K, V> {
    vals: AHashMap<K, V>,
    syns: AHashMap<K, K>,
}

impl<K: Eq + Hash, V> Default for SynonymMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> SynonymMap<K, V> {
    pub fn new() -> SynonymMap<K, V> {
        SynonymMap {
            vals: AHashMap::new(),
            syns: AHashMap::new(),
        }
    }

    /// Makes `from` another name for `to`. Returns `false` (and does
    /// nothing) if `to` is not a key, or if `from` already is one.
    pub fn insert_synonym(&mut self, from: K, to: K) -> bool {
        if !self.vals.contains_key(&to) || self.vals.contains_key(&from) {
            return false;
        }
        self.syns.insert(from, to);
        true
    }

    #[inline]
    pub fn insert(&mut self, k: K, v: V) -> Option<V> {
        self.vals.insert(k, v)
    }

    #[inline]
    pub fn find<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.syns.get(k) {
            Some(to) => self.vals.get::<K>(to),
            None => self.vals.get(k),
        }
    }

    #[inline]
    pub fn find_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.syns.get(k) {
            Some(to) => self.vals.get_mut::<K>(to),
            None => self.vals.get_mut(k),
        }
    }

    #[cfg(test)]
    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(k).is_some()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.vals.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }
}

impl<K: Eq + Hash + Debug, V: Debug> Debug for SynonymMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.vals.fmt(f)?;
        write!(f, " (synonyms: {:?})", self.syns)
    }
}
