//! The shared, immutable row collection.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::row::{Row, RowId};

/// Counter for generating collection generations.
static GENERATION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// An ordered, immutable sequence of rows.
///
/// A collection is never edited in place. Each refresh from the fetch
/// collaborator builds a new one, which receives a fresh `generation`. The
/// generation is the collection's identity for memoization: clones share it,
/// rebuilt collections never do.
///
/// Cloning is cheap and shares the underlying rows, which is what makes
/// snapshots for export free.
pub struct Collection<R> {
    rows: Arc<[R]>,
    generation: u64,
}

impl<R> Collection<R> {
    /// Creates a new collection with a fresh generation.
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows: rows.into(),
            generation: GENERATION_COUNTER.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Creates an empty collection.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Returns the generation (identity) of this collection.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the rows as a slice.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Gets a row by position.
    pub fn get(&self, index: usize) -> Option<&R> {
        self.rows.get(index)
    }

    /// Returns an iterator over the rows.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }
}

impl<R: Row> Collection<R> {
    /// Returns the identifiers of all rows, in collection order.
    pub fn ids(&self) -> Vec<RowId> {
        self.rows.iter().map(Row::id).collect()
    }

    /// Returns the identifiers of all rows as a set.
    pub fn id_set(&self) -> HashSet<RowId> {
        self.rows.iter().map(Row::id).collect()
    }
}

impl<R> Clone for Collection<R> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            generation: self.generation,
        }
    }
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<R> From<Vec<R>> for Collection<R> {
    fn from(rows: Vec<R>) -> Self {
        Self::new(rows)
    }
}

impl<R> std::fmt::Debug for Collection<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("len", &self.rows.len())
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Record;

    #[test]
    fn test_generation_is_unique_per_collection() {
        let a = Collection::new(vec![Record::new(1)]);
        let b = Collection::new(vec![Record::new(1)]);
        assert_ne!(a.generation(), b.generation());
    }

    #[test]
    fn test_clone_shares_generation_and_rows() {
        let a = Collection::new(vec![Record::new(1), Record::new(2)]);
        let b = a.clone();
        assert_eq!(a.generation(), b.generation());
        assert!(std::ptr::eq(a.rows().as_ptr(), b.rows().as_ptr()));
    }

    #[test]
    fn test_ids() {
        let c = Collection::new(vec![Record::new("x"), Record::new("y")]);
        assert_eq!(c.ids(), vec![RowId::from("x"), RowId::from("y")]);
        assert!(c.id_set().contains(&RowId::from("y")));
    }
}
