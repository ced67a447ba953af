// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Lazy, paginated cursor over a [`Query`].
//!
//! Pages are fetched in the query's declared order, so a scan never holds
//! more than one page in memory. The cursor is single-pass and owned by one
//! request; dropping it releases nothing beyond its buffered page.

use std::collections::VecDeque;

use super::{Query, RecordStore, StoreResult};
use crate::models::Entity;

pub const DEFAULT_PAGE_SIZE: usize = 100;

pub struct EntityQueryIterator<'a> {
    store: &'a dyn RecordStore,
    query: Query,
    buffer: VecDeque<Box<dyn Entity>>,
    /// Absolute offset of the next record to hand out.
    position: usize,
    page_size: usize,
    failed: bool,
}

impl<'a> EntityQueryIterator<'a> {
    pub fn new(store: &'a dyn RecordStore, query: Query) -> Self {
        Self::with_page_size(store, query, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(store: &'a dyn RecordStore, query: Query, page_size: usize) -> Self {
        Self {
            store,
            query,
            buffer: VecDeque::new(),
            position: 0,
            page_size: page_size.max(1),
            failed: false,
        }
    }

    /// Whether another record exists, without consuming it.
    ///
    /// Once the buffered page is exhausted this probes the store for a single
    /// row at the next offset.
    pub fn has_next(&mut self) -> StoreResult<bool> {
        if !self.buffer.is_empty() {
            return Ok(true);
        }
        let probe = self.store.fetch(&self.query, self.position, 1)?;
        Ok(!probe.is_empty())
    }

    fn load_page(&mut self) -> StoreResult<()> {
        let page = self
            .store
            .fetch(&self.query, self.position, self.page_size)?;
        tracing::trace!(
            kind = ?self.query.kind,
            offset = self.position,
            rows = page.len(),
            "Loaded query page"
        );
        self.buffer = page.into();
        Ok(())
    }
}

impl Iterator for EntityQueryIterator<'_> {
    type Item = StoreResult<Box<dyn Entity>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if self.buffer.is_empty() {
            if let Err(e) = self.load_page() {
                self.failed = true;
                return Some(Err(e));
            }
        }
        let entity = self.buffer.pop_front()?;
        self.position += 1;
        Some(Ok(entity))
    }
}
