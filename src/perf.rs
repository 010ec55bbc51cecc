use std::borrow::Borrow;
use std::fmt;

/// Problem size -> mean sequential seconds.
pub type SequentialTimes = KeyedTable<String, f64>;

/// Thread count -> value, for one problem size.
pub type ThreadTable = KeyedTable<usize, f64>;

/// Problem size -> thread count -> mean parallel seconds.
pub type ParallelTimes = KeyedTable<String, ThreadTable>;

/// Problem size -> thread count -> sequential / parallel.
pub type Speedups = KeyedTable<String, ThreadTable>;

/// A small map that keeps entries in insertion order.
///
/// The tables here hold a handful of problem sizes and thread counts, so a
/// linear scan is fine and iteration order stays the order the run was
/// configured in.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedTable<K, V> {
    entries: Vec<(K, V)>,
}

impl<K: PartialEq, V> KeyedTable<K, V> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Replaces the value in place if the key is already present.
    pub fn insert(&mut self, key: K, value: V) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K: PartialEq, V> Default for KeyedTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq, V> FromIterator<(K, V)> for KeyedTable<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for KeyedTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        write!(f, "}}")
    }
}
