// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Record Storage
//!
//! Records are persisted in an embedded redb database, one table per variant,
//! keyed by identity and holding the JSON encoding of the record.
//!
//! ## Layout
//!
//! ```text
//! labdb.redb
//!   plasmids      u64 -> {"id":1,"created_at":...,"alias":"pUC19",...}
//!   oligos        u64 -> {...}
//!   ...
//!   seq_libs      u64 -> {...}
//! ```
//!
//! Callers work against the [`RecordStore`] trait and describe reads with a
//! [`Query`]; [`EntityQueryIterator`] pages through a query lazily.

pub mod iterator;
pub mod record_db;

use serde_json::Value;

use crate::models::{Entity, Kind};

pub use iterator::{EntityQueryIterator, DEFAULT_PAGE_SIZE};
pub use record_db::RedbStore;

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("record has no registered variant")]
    Unregistered,
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Query description
// =============================================================================

/// Row filter applied by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Physical attribute equals the given JSON value.
    FieldEq { field: String, value: Value },
    /// Identity strictly greater than the bound.
    IdAbove(u64),
    /// Identity strictly less than the bound.
    IdBelow(u64),
}

impl Filter {
    pub fn field_eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::FieldEq {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    IdAsc,
    IdDesc,
}

/// Filtered, ordered read over the records of one variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub kind: Kind,
    pub filters: Vec<Filter>,
    pub order: Order,
}

impl Query {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            filters: Vec::new(),
            order: Order::IdAsc,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// Tightest exclusive identity bounds implied by the filters.
    pub fn id_bounds(&self) -> (Option<u64>, Option<u64>) {
        let mut above: Option<u64> = None;
        let mut below: Option<u64> = None;
        for filter in &self.filters {
            match *filter {
                Filter::IdAbove(n) => above = Some(above.map_or(n, |a| a.max(n))),
                Filter::IdBelow(n) => below = Some(below.map_or(n, |b| b.min(n))),
                Filter::FieldEq { .. } => {}
            }
        }
        (above, below)
    }

    /// True when the record's JSON form satisfies every attribute filter.
    pub fn matches_fields(&self, record: &Value) -> bool {
        self.filters.iter().all(|filter| match filter {
            Filter::FieldEq { field, value } => record.get(field) == Some(value),
            _ => true,
        })
    }

    pub fn has_field_filters(&self) -> bool {
        self.filters
            .iter()
            .any(|f| matches!(f, Filter::FieldEq { .. }))
    }
}

// =============================================================================
// Store contract
// =============================================================================

/// Abstract record store shared by every request.
pub trait RecordStore: Send + Sync {
    /// Populate `entity` in place. On no match its identity stays 0.
    fn get_by_id(&self, entity: &mut dyn Entity, id: u64) -> StoreResult<()>;

    /// Insert a new record, assigning identity and timestamps.
    fn create(&self, entity: &mut dyn Entity) -> StoreResult<()>;

    /// Up to `limit` records of `query`, skipping the first `offset` matches.
    fn fetch(&self, query: &Query, offset: usize, limit: usize)
        -> StoreResult<Vec<Box<dyn Entity>>>;

    /// Cheap reachability check for health reporting.
    fn ping(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_bounds_take_tightest_filter() {
        let query = Query::new(Kind::Plasmid)
            .filter(Filter::IdAbove(3))
            .filter(Filter::IdAbove(7))
            .filter(Filter::IdBelow(20))
            .filter(Filter::IdBelow(12));
        assert_eq!(query.id_bounds(), (Some(7), Some(12)));
        assert_eq!(Query::new(Kind::Oligo).id_bounds(), (None, None));
    }

    #[test]
    fn field_filters_compare_json_values() {
        let query = Query::new(Kind::Plasmid).filter(Filter::field_eq("creator", "Alice"));
        assert!(query.has_field_filters());
        assert!(query.matches_fields(&json!({"creator": "Alice", "alias": "x"})));
        assert!(!query.matches_fields(&json!({"creator": "Bob"})));
        assert!(!query.matches_fields(&json!({"alias": "x"})));
    }
}
