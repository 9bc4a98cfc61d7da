//! Growable row lists backing the ingredient, instruction and image URL editors.
//!
//! Rows are addressed by a [`RowKey`] handed out when the row is created. Keys
//! are never reused within a list, so removing a row cannot shift another
//! row's error or touched state onto its neighbour.

use std::fmt;

/// Stable identifier of a row inside one [`RowList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(u64);

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row-{}", self.0)
    }
}

/// Ordered list of rows where the first row can never be removed.
#[derive(Debug, Clone)]
pub struct RowList<T> {
    rows: Vec<(RowKey, T)>,
    next_key: u64,
}

impl<T> RowList<T> {
    /// Create a list holding a single initial row.
    pub fn with_first(value: T) -> Self {
        let mut list = RowList {
            rows: Vec::new(),
            next_key: 0,
        };
        list.append(value);
        list
    }

    /// Build a list from existing values. An empty iterator yields an empty
    /// list, which validation reports as missing rows.
    pub fn from_values(values: impl IntoIterator<Item = T>) -> Self {
        let mut list = RowList {
            rows: Vec::new(),
            next_key: 0,
        };
        for value in values {
            list.append(value);
        }
        list
    }

    /// Add a row at the end and return its key.
    pub fn append(&mut self, value: T) -> RowKey {
        let key = RowKey(self.next_key);
        self.next_key += 1;
        self.rows.push((key, value));
        key
    }

    /// Remove the row with `key`. The first row is always retained; returns
    /// whether a row was removed.
    pub fn remove(&mut self, key: RowKey) -> bool {
        match self.position(key) {
            Some(0) | None => false,
            Some(index) => {
                self.rows.remove(index);
                true
            }
        }
    }

    /// Whether the row exists and is not the first one.
    pub fn is_removable(&self, key: RowKey) -> bool {
        matches!(self.position(key), Some(index) if index > 0)
    }

    pub fn get(&self, key: RowKey) -> Option<&T> {
        self.rows.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: RowKey) -> Option<&mut T> {
        self.rows
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Key of the row currently displayed at `index`.
    pub fn key_at(&self, index: usize) -> Option<RowKey> {
        self.rows.get(index).map(|(k, _)| *k)
    }

    pub fn position(&self, key: RowKey) -> Option<usize> {
        self.rows.iter().position(|(k, _)| *k == key)
    }

    pub fn first_key(&self) -> Option<RowKey> {
        self.key_at(0)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RowKey, &T)> {
        self.rows.iter().map(|(k, v)| (*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = RowKey> + '_ {
        self.rows.iter().map(|(k, _)| *k)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.iter().map(|(_, v)| v)
    }
}

impl<T: Default> Default for RowList<T> {
    fn default() -> Self {
        RowList::with_first(T::default())
    }
}
