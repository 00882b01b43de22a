//! # Table: Primary Arena plus Secondary Indices
//!
//! ```text
//! primary:   id ──▶ record
//! secondary: index name ──▶ field value ──▶ {id, id, ...}
//! ```
//!
//! The secondary layout is the composite key `(field value, id)` grouped by
//! field value, so "all proofs by prover X" is one ordered lookup instead of
//! a scan of the arena.
//!
//! A record declares which index entries it needs through
//! [`Record::index_entries`]. On every write the table removes the entries
//! derived from the previous version of the record and inserts the entries
//! derived from the new one, in the same call as the primary write.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use crate::error::StoreError;
use crate::sequence::Sequence;

/// One secondary index entry derived from a record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct IndexEntry {
    /// Index name; must appear in [`Record::INDICES`].
    pub index: &'static str,
    /// Indexed field value.
    pub value: String,
}

impl IndexEntry {
    /// Build an entry for `index` with the given field value.
    pub fn new(index: &'static str, value: impl Display) -> Self {
        Self {
            index,
            value: value.to_string(),
        }
    }
}

/// A record that can live in a [`Table`].
pub trait Record: Clone {
    /// Primary key type.
    type Id: Ord + Clone + Display + std::fmt::Debug;

    /// Table name used in errors and logs.
    const TABLE: &'static str;

    /// Names of the secondary indices this record type maintains.
    const INDICES: &'static [&'static str];

    /// Primary key.
    fn id(&self) -> &Self::Id;

    /// Every secondary index entry this record requires.
    fn index_entries(&self) -> Vec<IndexEntry>;
}

/// An index entry that disagrees with the primary arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexDiscrepancy {
    /// A record requires this entry but the index lacks it.
    Missing {
        /// Index name.
        index: &'static str,
        /// Field value.
        value: String,
        /// Record id.
        id: String,
    },
    /// The index holds an entry no record derives.
    Orphan {
        /// Index name.
        index: &'static str,
        /// Field value.
        value: String,
        /// Record id.
        id: String,
    },
}

type Buckets<K> = BTreeMap<String, BTreeSet<K>>;

/// Primary arena with derived secondary indices and an id sequence.
#[derive(Debug, Clone)]
pub struct Table<R: Record> {
    primary: BTreeMap<R::Id, R>,
    secondary: BTreeMap<&'static str, Buckets<R::Id>>,
    sequence: Sequence,
}

impl<R: Record> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Table<R> {
    /// An empty table with every declared index present.
    pub fn new() -> Self {
        let secondary = R::INDICES.iter().map(|name| (*name, Buckets::new())).collect();
        Self {
            primary: BTreeMap::new(),
            secondary,
            sequence: Sequence::default(),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Look up a record by id.
    pub fn get(&self, id: &R::Id) -> Option<&R> {
        self.primary.get(id)
    }

    /// Whether a record with `id` exists.
    pub fn contains(&self, id: &R::Id) -> bool {
        self.primary.contains_key(id)
    }

    /// All records in id order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.primary.values()
    }

    /// Number of records in the arena.
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Current sequence state.
    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    /// The id number the next sequenced insert should use.
    pub fn next_sequence(&self) -> Result<u64, StoreError> {
        self.sequence
            .peek_next()
            .ok_or(StoreError::SequenceOverflow { table: R::TABLE })
    }

    /// Records whose `index` entry equals `value`, in id order.
    ///
    /// Unknown index names yield nothing.
    pub fn scan<'a>(&'a self, index: &str, value: &str) -> impl Iterator<Item = &'a R> + 'a {
        self.secondary
            .get(index)
            .and_then(|buckets| buckets.get(value))
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(move |id| self.primary.get(id))
    }

    /// Number of ids under `value` in `index`.
    pub fn count_in(&self, index: &str, value: &str) -> usize {
        self.secondary
            .get(index)
            .and_then(|buckets| buckets.get(value))
            .map_or(0, BTreeSet::len)
    }

    /// Whether `index` holds the entry `(value, id)`.
    pub fn index_contains(&self, index: &str, value: &str, id: &R::Id) -> bool {
        self.secondary
            .get(index)
            .and_then(|buckets| buckets.get(value))
            .is_some_and(|ids| ids.contains(id))
    }

    /// Total number of entries in `index`.
    pub fn index_len(&self, index: &str) -> usize {
        self.secondary
            .get(index)
            .map_or(0, |buckets| buckets.values().map(BTreeSet::len).sum())
    }

    /// Compare `index` against the entries the arena derives.
    pub fn index_discrepancies(&self, index: &'static str) -> Vec<IndexDiscrepancy> {
        let mut expected: BTreeSet<(String, R::Id)> = BTreeSet::new();
        for record in self.primary.values() {
            for entry in record.index_entries() {
                if entry.index == index {
                    expected.insert((entry.value, record.id().clone()));
                }
            }
        }

        let mut actual: BTreeSet<(String, R::Id)> = BTreeSet::new();
        if let Some(buckets) = self.secondary.get(index) {
            for (value, ids) in buckets {
                for id in ids {
                    actual.insert((value.clone(), id.clone()));
                }
            }
        }

        let missing = expected.difference(&actual).map(|(value, id)| IndexDiscrepancy::Missing {
            index,
            value: value.clone(),
            id: id.to_string(),
        });
        let orphan = actual.difference(&expected).map(|(value, id)| IndexDiscrepancy::Orphan {
            index,
            value: value.clone(),
            id: id.to_string(),
        });
        missing.chain(orphan).collect()
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Insert a record that does not consume a sequence number.
    pub fn insert(&mut self, record: R) -> Result<(), StoreError> {
        self.insert_inner(record, None)
    }

    /// Insert a record whose id was generated from sequence number `n`.
    pub fn insert_sequenced(&mut self, n: u64, record: R) -> Result<(), StoreError> {
        self.insert_inner(record, Some(n))
    }

    /// Replace an existing record, re-deriving its index entries. Returns
    /// the previous version.
    pub fn update(&mut self, record: R) -> Result<R, StoreError> {
        let id = record.id().clone();
        if !self.primary.contains_key(&id) {
            return Err(StoreError::NotFound {
                table: R::TABLE,
                id: id.to_string(),
            });
        }
        let entries = self.checked_entries(&record)?;
        let previous = self
            .primary
            .insert(id.clone(), record)
            .ok_or_else(|| StoreError::NotFound {
                table: R::TABLE,
                id: id.to_string(),
            })?;
        self.deindex(&previous.index_entries(), &id);
        self.index(entries, &id);
        Ok(previous)
    }

    /// Regenerate every secondary index from the arena.
    pub fn rebuild_indices(&mut self) {
        for buckets in self.secondary.values_mut() {
            buckets.clear();
        }
        let derived: Vec<(Vec<IndexEntry>, R::Id)> = self
            .primary
            .values()
            .map(|r| (r.index_entries(), r.id().clone()))
            .collect();
        for (entries, id) in derived {
            self.index(entries, &id);
        }
    }

    /// Replace the whole table with `records` and a persisted sequence.
    ///
    /// Indices are rebuilt from the records; nothing index-related is
    /// taken from the caller. On error the table is left untouched.
    pub fn restore(&mut self, records: Vec<R>, sequence: Sequence) -> Result<(), StoreError> {
        let mut fresh = Self::new();
        for record in records {
            let id = record.id().clone();
            fresh.checked_entries(&record)?;
            if fresh.primary.insert(id.clone(), record).is_some() {
                return Err(StoreError::Duplicate {
                    table: R::TABLE,
                    id: id.to_string(),
                });
            }
        }
        fresh.rebuild_indices();
        fresh.sequence = sequence;
        *self = fresh;
        Ok(())
    }

    fn insert_inner(&mut self, record: R, issued: Option<u64>) -> Result<(), StoreError> {
        let id = record.id().clone();
        if self.primary.contains_key(&id) {
            return Err(StoreError::Duplicate {
                table: R::TABLE,
                id: id.to_string(),
            });
        }
        let entries = self.checked_entries(&record)?;
        self.primary.insert(id.clone(), record);
        self.index(entries, &id);
        self.sequence.record_insert(issued);
        Ok(())
    }

    fn checked_entries(&self, record: &R) -> Result<Vec<IndexEntry>, StoreError> {
        let entries = record.index_entries();
        if let Some(bad) = entries.iter().find(|e| !R::INDICES.contains(&e.index)) {
            return Err(StoreError::UnknownIndex {
                table: R::TABLE,
                index: bad.index,
            });
        }
        Ok(entries)
    }

    fn index(&mut self, entries: Vec<IndexEntry>, id: &R::Id) {
        for entry in entries {
            self.secondary
                .entry(entry.index)
                .or_default()
                .entry(entry.value)
                .or_default()
                .insert(id.clone());
        }
    }

    fn deindex(&mut self, entries: &[IndexEntry], id: &R::Id) {
        for entry in entries {
            if let Some(buckets) = self.secondary.get_mut(entry.index) {
                if let Some(ids) = buckets.get_mut(&entry.value) {
                    ids.remove(id);
                    if ids.is_empty() {
                        buckets.remove(&entry.value);
                    }
                }
            }
        }
    }
}
