// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Lab members and their access flags.

use serde::{Deserialize, Serialize};

use super::{Entity, EntityCodec, Kind, RecordMeta};
use crate::storage::{Filter, Query, RecordStore, StoreResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub email: String,
    pub name: String,
    pub auth_read: bool,
    pub auth_write: bool,
    pub auth_admin: bool,
    pub notes: String,
}

impl User {
    /// Look up the user registered under `email` (exact match).
    pub fn find_by_email(store: &dyn RecordStore, email: &str) -> StoreResult<Option<User>> {
        let query = Query::new(Kind::User).filter(Filter::field_eq("email", email));
        let Some(found) = store.fetch(&query, 0, 1)?.into_iter().next() else {
            return Ok(None);
        };
        let mut user = User::default();
        user.decode_into(&found.encode()?)?;
        Ok(Some(user))
    }

    pub fn can_read(&self) -> bool {
        self.auth_read || self.auth_write
    }

    pub fn can_write(&self) -> bool {
        self.auth_write
    }
}

impl Entity for User {
    record_meta!(Kind::User);

    fn short_desc(&self) -> &str {
        &self.email
    }

    fn description(&self) -> &str {
        &self.notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RedbStore;

    #[test]
    fn find_by_email_matches_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("users.redb")).unwrap();
        let mut alice = User {
            email: "alice@example.org".into(),
            name: "Alice".into(),
            auth_read: true,
            ..Default::default()
        };
        store.create(&mut alice).unwrap();

        let found = User::find_by_email(&store, "alice@example.org")
            .unwrap()
            .unwrap();
        assert_eq!(found.id(), alice.id());
        assert_eq!(found.name, "Alice");
        assert!(found.can_read());
        assert!(!found.can_write());

        assert!(User::find_by_email(&store, "ALICE@example.org")
            .unwrap()
            .is_none());
        assert!(User::find_by_email(&store, "").unwrap().is_none());
    }
}
