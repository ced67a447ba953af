// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Cross-type Search
//!
//! A search term is compiled into a single [`Regex`]:
//!
//! | Term | Meaning |
//! |------|---------|
//! | `/re/` | case-sensitive regular expression `re` |
//! | `/re/i` | case-insensitive regular expression `re` |
//! | `pUC*` | glob: `*` matches any run of characters, whole-string match |
//!
//! Each requested type is scanned lazily in identity-descending order. A record
//! is checked against its short label, then its description, then (on request)
//! its sequence; the first hit adds it once.

use regex::{Regex, RegexBuilder};

use crate::models::{lookup, Entity, Kind};
use crate::storage::{EntityQueryIterator, Filter, Order, Query, RecordStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("empty search term")]
    EmptyTerm,

    #[error("malformed regular expression query")]
    Malformed,

    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("no record types requested")]
    NoTypes,

    #[error("unknown record type: {0}")]
    UnknownType(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Compile a user search term.
pub fn compile_term(term: &str) -> Result<Regex, SearchError> {
    if let Some(body) = term.strip_prefix('/') {
        if let Some(pattern) = body.strip_suffix("/i") {
            return Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?);
        }
        if let Some(pattern) = body.strip_suffix('/') {
            return Ok(Regex::new(pattern)?);
        }
        return Err(SearchError::Malformed);
    }
    Ok(Regex::new(&format!("^{}$", term.replace('*', ".*")))?)
}

/// Parameters of one search.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub term: String,
    pub include_sequence: bool,
    /// Restrict to records owned by this user name.
    pub owner: Option<String>,
    /// Type names in the order results should be grouped.
    pub types: Vec<String>,
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub items: Vec<Box<dyn Entity>>,
    /// The raw term, so callers can check it against direct identity lookups.
    pub term: String,
}

fn matches_record(regex: &Regex, record: &dyn Entity, include_sequence: bool) -> bool {
    if regex.is_match(record.short_desc()) || regex.is_match(record.description()) {
        return true;
    }
    include_sequence && record.sequence().is_some_and(|seq| regex.is_match(seq))
}

fn resolve_types(names: &[String]) -> Result<Vec<Kind>, SearchError> {
    if names.is_empty() {
        return Err(SearchError::NoTypes);
    }
    names
        .iter()
        .map(|name| {
            lookup(&name.to_lowercase())
                .map(|variant| variant.kind)
                .ok_or_else(|| SearchError::UnknownType(name.clone()))
        })
        .collect()
}

/// Run a search against `store`.
pub fn search(
    store: &dyn RecordStore,
    request: &SearchRequest,
) -> Result<SearchOutcome, SearchError> {
    if request.term.is_empty() {
        return Err(SearchError::EmptyTerm);
    }
    let regex = compile_term(&request.term)?;
    let kinds = resolve_types(&request.types)?;
    let owner = request.owner.as_deref().filter(|o| !o.is_empty());

    let mut items = Vec::new();
    for kind in kinds {
        let mut query = Query::new(kind).order(Order::IdDesc);
        if let Some(owner) = owner {
            query = query.filter(Filter::field_eq(kind.variant().owner_field, owner));
        }

        let before = items.len();
        for record in EntityQueryIterator::new(store, query) {
            let record = record?;
            if matches_record(&regex, record.as_ref(), request.include_sequence) {
                items.push(record);
            }
        }
        tracing::debug!(?kind, hits = items.len() - before, "Searched record type");
    }

    Ok(SearchOutcome {
        items,
        term: request.term.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Oligo, Plasmid, SeqLib};
    use crate::storage::RedbStore;

    #[test]
    fn literal_terms_match_whole_string() {
        let re = compile_term("foo").unwrap();
        assert!(re.is_match("foo"));
        assert!(!re.is_match("food"));
        assert!(!re.is_match("a foo"));
        assert!(!re.is_match("FOO"));
    }

    #[test]
    fn glob_terms() {
        let re = compile_term("fo*").unwrap();
        for hit in ["foo", "fo", "fox"] {
            assert!(re.is_match(hit), "{hit}");
        }
        assert!(!re.is_match("bar"));
        assert!(!re.is_match("afo"));

        let inner = compile_term("p*19").unwrap();
        assert!(inner.is_match("pUC19"));
        assert!(!inner.is_match("pUC18"));
    }

    #[test]
    fn regex_terms() {
        let re = compile_term("/^a.*z$/").unwrap();
        assert!(re.is_match("abcz"));
        assert!(!re.is_match("Abcz"));

        let re = compile_term("/abc/i").unwrap();
        assert!(re.is_match("ABC"));
        assert!(re.is_match("xxabcxx"));

        let re = compile_term("/abc/").unwrap();
        assert!(!re.is_match("ABC"));
    }

    #[test]
    fn malformed_terms() {
        for term in ["/abc", "/abc/x", "/", "/i"] {
            assert!(
                matches!(compile_term(term), Err(SearchError::Malformed)),
                "{term}"
            );
        }
        assert!(matches!(compile_term("/(/"), Err(SearchError::Pattern(_))));
        assert!(matches!(compile_term("pUC("), Err(SearchError::Pattern(_))));
    }

    fn seeded() -> (RedbStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("search.redb")).unwrap();

        let plasmids = [
            ("pUC19", "cloning vector", "GATTACA", "Alice"),
            ("pET28", "pUC19 derivative", "TTTT", "Bob"),
            ("pGEX", "expression", "GATTACA", "Alice"),
        ];
        for (alias, description, sequence, creator) in plasmids {
            let mut p = Plasmid {
                alias: alias.into(),
                description: description.into(),
                sequence: sequence.into(),
                creator: creator.into(),
                ..Default::default()
            };
            store.create(&mut p).unwrap();
        }

        let mut oligo = Oligo {
            oligoalias: "pUC19-fwd".into(),
            entered_by: "Alice".into(),
            ..Default::default()
        };
        store.create(&mut oligo).unwrap();

        let mut lib = SeqLib {
            alias: "lib1".into(),
            index_seq: "GATTACA".into(),
            ..Default::default()
        };
        store.create(&mut lib).unwrap();
        (store, dir)
    }

    fn hits(outcome: &SearchOutcome) -> Vec<(&'static str, u64)> {
        outcome
            .items
            .iter()
            .map(|e| (e.model_name(), e.id()))
            .collect()
    }

    fn request(term: &str, types: &[&str]) -> SearchRequest {
        SearchRequest {
            term: term.into(),
            types: types.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn matches_short_then_description_without_duplicates() {
        let (store, _dir) = seeded();
        let outcome = search(&store, &request("/pUC19/", &["plasmids"])).unwrap();
        // id 2 matches on description, id 1 on alias; descending order
        assert_eq!(hits(&outcome), vec![("Plasmid", 2), ("Plasmid", 1)]);
        assert_eq!(outcome.term, "/pUC19/");
    }

    #[test]
    fn sequence_only_when_requested() {
        let (store, _dir) = seeded();
        let without = search(&store, &request("GATTACA", &["plasmid", "seqlib"])).unwrap();
        assert!(without.items.is_empty());

        let mut with_seq = request("GATTACA", &["plasmid", "seqlib"]);
        with_seq.include_sequence = true;
        let outcome = search(&store, &with_seq).unwrap();
        assert_eq!(
            hits(&outcome),
            vec![("Plasmid", 3), ("Plasmid", 1), ("SeqLib", 1)]
        );
    }

    #[test]
    fn results_follow_requested_type_order() {
        let (store, _dir) = seeded();
        let outcome = search(&store, &request("/pUC/", &["oligo", "plasmid"])).unwrap();
        assert_eq!(
            hits(&outcome),
            vec![("Oligo", 1), ("Plasmid", 2), ("Plasmid", 1)]
        );
    }

    #[test]
    fn owner_filter_uses_variant_owner_field() {
        let (store, _dir) = seeded();
        let mut req = request("/p/", &["plasmid", "oligo"]);
        req.owner = Some("Alice".into());
        let outcome = search(&store, &req).unwrap();
        assert_eq!(
            hits(&outcome),
            vec![("Plasmid", 3), ("Plasmid", 1), ("Oligo", 1)]
        );

        req.owner = Some(String::new());
        let outcome = search(&store, &req).unwrap();
        assert_eq!(outcome.items.len(), 4);
    }

    #[test]
    fn type_names_are_case_folded() {
        let (store, _dir) = seeded();
        let outcome = search(&store, &request("pGEX", &["Plasmids"])).unwrap();
        assert_eq!(hits(&outcome), vec![("Plasmid", 3)]);
    }

    #[test]
    fn bad_requests_are_client_errors() {
        let (store, _dir) = seeded();
        let err = search(&store, &request("", &["plasmid"])).unwrap_err();
        assert!(matches!(err, SearchError::EmptyTerm));

        let err = search(&store, &request("x", &[])).unwrap_err();
        assert!(matches!(err, SearchError::NoTypes));

        let err = search(&store, &request("x", &["widgets"])).unwrap_err();
        assert!(matches!(err, SearchError::UnknownType(ref t) if t == "widgets"));

        let err = search(&store, &request("/x", &["plasmid"])).unwrap_err();
        assert!(matches!(err, SearchError::Malformed));
    }
}
