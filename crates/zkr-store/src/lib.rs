//! # zkr-store: Indexed Storage
//!
//! Generic keyed storage with no business logic.
//!
//! - **Table** (`table.rs`): a primary arena `id → record` plus named
//!   secondary indices `(field value, id)`. Index entries are derived from
//!   the record on every write and can be regenerated from the arena at any
//!   time; they are never a source of truth.
//! - **Sequence** (`sequence.rs`): the per-table counter pair (last issued
//!   id number, committed record count), mutated only by the table in the
//!   same call as the insert it accounts for.
//!
//! ## Atomicity
//!
//! Every mutating method validates fully before touching any map, so a
//! returned error means nothing changed.

pub mod error;
pub mod sequence;
pub mod table;

pub use error::StoreError;
pub use sequence::Sequence;
pub use table::{IndexDiscrepancy, IndexEntry, Record, Table};
