// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Genealogical data model and the database contract consumed by the card-view
//! navigation core.
//!
//! Primary records own a [`Handle`]; sub-records live inside them either as
//! reference edges (pointing at another primary by handle) or as secondaries
//! with no identity beyond their canonical serialization.

pub mod bookmarks;
pub mod canonical;
pub mod db;
pub mod list_history;
pub mod memory;
pub mod primary;
pub mod records;
pub mod types;

pub use canonical::canonical_string;
pub use db::{fetch_primary, Database, DbError, DbSignal, Transaction};
pub use memory::MemoryDb;
pub use primary::PrimaryRecord;
pub use records::{Reference, Secondary, SubRecordHolder};
pub use types::{Handle, ObjectType};
