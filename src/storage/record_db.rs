// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded record database backed by redb (pure Rust, ACID).
//!
//! Tables:
//! - one per variant, named after [`Variant::table`](crate::models::Variant),
//!   mapping `id -> JSON record`.

use std::ops::Bound;
use std::path::Path;

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{Order, Query, RecordStore, StoreError, StoreResult};
use crate::models::{Entity, Kind};

fn table_for(kind: Kind) -> TableDefinition<'static, u64, &'static [u8]> {
    TableDefinition::new(kind.variant().table)
}

// =============================================================================
// RedbStore
// =============================================================================

/// Record store over a single redb file.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(
                    path = %parent.display(),
                    error = %e,
                    "Failed to create store directory"
                );
            }
        }
        let db = Database::create(path)?;

        // Pre-create every variant table so read transactions never miss one
        let write_txn = db.begin_write()?;
        for kind in Kind::ALL {
            let _ = write_txn.open_table(table_for(kind))?;
        }
        write_txn.commit()?;

        tracing::debug!(path = %path.display(), "Record store opened");
        Ok(Self { db })
    }

    fn insert_new(&self, kind: Kind, entity: &mut dyn Entity) -> StoreResult<u64> {
        let write_txn = self.db.begin_write()?;
        let id = {
            let mut table = write_txn.open_table(table_for(kind))?;
            let id = match table.last()? {
                Some((key, _)) => key.value() + 1,
                None => 1,
            };

            let now = Utc::now();
            let meta = entity.meta_mut();
            meta.id = id;
            meta.created_at = now;
            meta.updated_at = now;

            let json = entity.encode()?;
            table.insert(id, json.as_slice())?;
            id
        };
        write_txn.commit()?;
        Ok(id)
    }
}

impl RecordStore for RedbStore {
    fn get_by_id(&self, entity: &mut dyn Entity, id: u64) -> StoreResult<()> {
        let Some(kind) = entity.kind() else {
            return Ok(());
        };
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_for(kind))?;
        if let Some(value) = table.get(id)? {
            entity.decode_into(value.value())?;
        }
        Ok(())
    }

    fn create(&self, entity: &mut dyn Entity) -> StoreResult<()> {
        let kind = entity.kind().ok_or(StoreError::Unregistered)?;
        match self.insert_new(kind, entity) {
            Ok(id) => {
                tracing::debug!(table = kind.variant().table, id, "Record created");
                Ok(())
            }
            Err(e) => {
                entity.meta_mut().id = 0;
                Err(e)
            }
        }
    }

    fn fetch(
        &self,
        query: &Query,
        offset: usize,
        limit: usize,
    ) -> StoreResult<Vec<Box<dyn Entity>>> {
        let mut page: Vec<Box<dyn Entity>> = Vec::new();
        if limit == 0 {
            return Ok(page);
        }

        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_for(query.kind))?;

        let (above, below) = query.id_bounds();
        let lower = above.map_or(Bound::Unbounded, Bound::Excluded);
        let upper = below.map_or(Bound::Unbounded, Bound::Excluded);
        if let (Some(a), Some(b)) = (above, below) {
            if a.saturating_add(1) >= b {
                return Ok(page);
            }
        }
        let range = table.range((lower, upper))?;

        let check_fields = query.has_field_filters();
        let mut skipped = 0usize;

        // Returns true once the page is full.
        let mut visit = |bytes: &[u8]| -> StoreResult<bool> {
            if check_fields {
                let value: serde_json::Value = serde_json::from_slice(bytes)?;
                if !query.matches_fields(&value) {
                    return Ok(false);
                }
            }
            if skipped < offset {
                skipped += 1;
                return Ok(false);
            }
            let mut entity = query.kind.empty();
            entity.decode_into(bytes)?;
            page.push(entity);
            Ok(page.len() >= limit)
        };

        match query.order {
            Order::IdAsc => {
                for row in range {
                    let (_, value) = row?;
                    if visit(value.value())? {
                        break;
                    }
                }
            }
            Order::IdDesc => {
                for row in range.rev() {
                    let (_, value) = row?;
                    if visit(value.value())? {
                        break;
                    }
                }
            }
        }

        Ok(page)
    }

    fn ping(&self) -> StoreResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(table_for(Kind::User))?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
