// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Store-backed operations over the [`Entity`] contract.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use super::{registry, AutoFill, Entity, Kind};
use crate::storage::{Filter, Order, Query, RecordStore, StoreResult};

/// Populate `entity` with the record `id`. On no match its identity stays 0.
pub fn get_by_id(store: &dyn RecordStore, entity: &mut dyn Entity, id: u64) -> StoreResult<()> {
    store.get_by_id(entity, id)
}

/// Insert `entity`; the store assigns identity and timestamps.
pub fn create(store: &dyn RecordStore, entity: &mut dyn Entity) -> StoreResult<()> {
    store.create(entity)
}

/// Highest per-type number in the store plus one.
///
/// Two concurrent creations of the same variant can read the same last
/// number and collide. Use [`create_numbered`] to serialize assignment.
pub fn next_available_number(store: &dyn RecordStore, entity: &dyn Entity) -> StoreResult<u64> {
    let Some(kind) = entity.kind() else {
        return Ok(1);
    };
    let query = Query::new(kind).order(Order::IdDesc);
    let last = store.fetch(&query, 0, 1)?;
    Ok(last.first().map_or(0, |e| e.number()) + 1)
}

/// Apply the variant's defaults for a record about to be created.
pub fn auto_fill(
    store: &dyn RecordStore,
    entity: &mut dyn Entity,
    user_name: &str,
) -> StoreResult<()> {
    let next_number = next_available_number(store, entity)?;
    entity.auto_fill(&AutoFill {
        user_name,
        next_number,
    });
    Ok(())
}

static NUMBERING_LOCKS: LazyLock<HashMap<Kind, Mutex<()>>> =
    LazyLock::new(|| Kind::ALL.into_iter().map(|k| (k, Mutex::new(()))).collect());

/// Auto-fill and create under a per-variant lock, so numbers are unique
/// among callers that go through this path.
pub fn create_numbered(
    store: &dyn RecordStore,
    entity: &mut dyn Entity,
    user_name: &str,
) -> StoreResult<()> {
    let _guard = entity
        .kind()
        .and_then(|kind| NUMBERING_LOCKS.get(&kind))
        .map(|lock| lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner()));
    auto_fill(store, entity, user_name)?;
    store.create(entity)
}

/// Populate `entity` with the first record of its variant after `id`.
pub fn next(store: &dyn RecordStore, entity: &mut dyn Entity, id: u64) -> StoreResult<()> {
    neighbor(store, entity, Filter::IdAbove(id), Order::IdAsc)
}

/// Populate `entity` with the last record of its variant before `id`.
pub fn prev(store: &dyn RecordStore, entity: &mut dyn Entity, id: u64) -> StoreResult<()> {
    neighbor(store, entity, Filter::IdBelow(id), Order::IdDesc)
}

fn neighbor(
    store: &dyn RecordStore,
    entity: &mut dyn Entity,
    bound: Filter,
    order: Order,
) -> StoreResult<()> {
    let Some(kind) = entity.kind() else {
        return Ok(());
    };
    let query = Query::new(kind).filter(bound).order(order);
    if let Some(found) = store.fetch(&query, 0, 1)?.into_iter().next() {
        entity.decode_into(&found.encode()?)?;
    }
    Ok(())
}

/// Identity following `id` for the named variant, or `id` itself if none.
pub fn next_id(store: &dyn RecordStore, type_name: &str, id: u64) -> StoreResult<u64> {
    let mut entity = registry::empty(type_name);
    next(store, entity.as_mut(), id)?;
    Ok(neighbor_or_current(entity.id(), id))
}

/// Identity preceding `id` for the named variant, or `id` itself if none.
pub fn prev_id(store: &dyn RecordStore, type_name: &str, id: u64) -> StoreResult<u64> {
    let mut entity = registry::empty(type_name);
    prev(store, entity.as_mut(), id)?;
    Ok(neighbor_or_current(entity.id(), id))
}

fn neighbor_or_current(found: u64, current: u64) -> u64 {
    if found != 0 {
        found
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Oligo, Plasmid, RnaiClone, SeqLib};
    use crate::storage::RedbStore;
    use std::sync::Arc;

    fn temp_store() -> (RedbStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("ops.redb")).unwrap();
        (store, dir)
    }

    fn seed_plasmids(store: &RedbStore, count: usize) {
        for i in 0..count {
            let mut p = Plasmid {
                alias: format!("p{i}"),
                ..Default::default()
            };
            create(store, &mut p).unwrap();
        }
    }

    #[test]
    fn next_walks_up_then_stays_put() {
        let (store, _dir) = temp_store();
        seed_plasmids(&store, 4);

        let mut walked = vec![1];
        let mut current = 1;
        loop {
            let following = next_id(&store, "plasmid", current).unwrap();
            if following == current {
                break;
            }
            assert!(following > current);
            walked.push(following);
            current = following;
        }
        assert_eq!(walked, vec![1, 2, 3, 4]);
        assert_eq!(next_id(&store, "plasmids", 4).unwrap(), 4);
    }

    #[test]
    fn prev_walks_down_then_stays_put() {
        let (store, _dir) = temp_store();
        seed_plasmids(&store, 3);

        assert_eq!(prev_id(&store, "plasmid", 3).unwrap(), 2);
        assert_eq!(prev_id(&store, "plasmid", 2).unwrap(), 1);
        assert_eq!(prev_id(&store, "plasmid", 1).unwrap(), 1);
    }

    #[test]
    fn next_populates_entity_in_place() {
        let (store, _dir) = temp_store();
        seed_plasmids(&store, 2);

        let mut p = Plasmid::default();
        next(&store, &mut p, 1).unwrap();
        assert_eq!(p.id(), 2);
        assert_eq!(p.alias, "p1");

        let mut none = Plasmid::default();
        next(&store, &mut none, 2).unwrap();
        assert_eq!(none.id(), 0);
    }

    #[test]
    fn navigation_is_scoped_to_the_variant() {
        let (store, _dir) = temp_store();
        seed_plasmids(&store, 3);
        create(&store, &mut Oligo::default()).unwrap();

        assert_eq!(next_id(&store, "oligo", 1).unwrap(), 1);
        assert_eq!(next_id(&store, "widget", 1).unwrap(), 1);
    }

    #[test]
    fn next_available_number_follows_last_record() {
        let (store, _dir) = temp_store();
        assert_eq!(next_available_number(&store, &RnaiClone::default()).unwrap(), 1);

        let mut clone = RnaiClone::default();
        auto_fill(&store, &mut clone, "Alice").unwrap();
        assert_eq!(clone.number, 1);
        create(&store, &mut clone).unwrap();

        assert_eq!(next_available_number(&store, &RnaiClone::default()).unwrap(), 2);
        // Variants without explicit numbering count by identity.
        seed_plasmids(&store, 2);
        assert_eq!(next_available_number(&store, &Plasmid::default()).unwrap(), 3);
    }

    #[test]
    fn create_numbered_fills_and_persists() {
        let (store, _dir) = temp_store();
        let mut lib = SeqLib::default();
        create_numbered(&store, &mut lib, "Bob").unwrap();

        let mut stored = SeqLib::default();
        get_by_id(&store, &mut stored, lib.id()).unwrap();
        assert_eq!(stored.number, 1);
        assert_eq!(stored.entered_by, "Bob");
    }

    #[test]
    fn create_numbered_is_unique_under_contention() {
        let (store, _dir) = temp_store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let mut clone = RnaiClone::default();
                    create_numbered(store.as_ref(), &mut clone, &format!("user{i}")).unwrap();
                    clone.number
                })
            })
            .collect();

        let mut numbers: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=8).collect::<Vec<u64>>());
    }
}
