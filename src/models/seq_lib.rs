// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sequencing library records. The index sequence is the searchable sequence.

use serde::{Deserialize, Serialize};

use super::{AutoFill, Entity, Kind, RecordMeta};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeqLib {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub number: u64,
    pub genome: String,
    pub method: String,
    pub entered_by: String,
    pub project: String,
    pub storage_location: String,
    pub concentration: f64,
    pub size_distribution: String,
    pub index_id: String,
    pub index_seq: String,
    pub description: String,
    pub linked_items: String,
    pub alias: String,
    pub notebook: String,
}

impl Entity for SeqLib {
    record_meta!(Kind::SeqLib);

    fn short_desc(&self) -> &str {
        &self.alias
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn sequence(&self) -> Option<&str> {
        Some(&self.index_seq)
    }

    fn number(&self) -> u64 {
        self.number
    }

    fn auto_fill(&mut self, fill: &AutoFill<'_>) {
        self.entered_by = fill.user_name.to_string();
        self.number = fill.next_number;
    }
}
