//! Storage errors.

use thiserror::Error;

/// Error from a table operation. A returned error means the table is
/// unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A record with this id already exists.
    #[error("{table}: record {id} already exists")]
    Duplicate {
        /// Table name.
        table: &'static str,
        /// Offending id.
        id: String,
    },

    /// No record with this id exists.
    #[error("{table}: record {id} not found")]
    NotFound {
        /// Table name.
        table: &'static str,
        /// Missing id.
        id: String,
    },

    /// A record produced an entry for an index the table does not declare.
    #[error("{table}: undeclared index {index}")]
    UnknownIndex {
        /// Table name.
        table: &'static str,
        /// Index name.
        index: &'static str,
    },

    /// The id sequence is exhausted.
    #[error("{table}: sequence overflow")]
    SequenceOverflow {
        /// Table name.
        table: &'static str,
    },
}
