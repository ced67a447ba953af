// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RNAi clone records.
//!
//! Clones are numbered per type and named `RNAiC<number>`. New clones default
//! to the standard feeding-library setup (HT115 host, L4440 backbone, Amp).

use serde::{Deserialize, Serialize};

use super::{AutoFill, Entity, Kind, RecordMeta};

pub const DEFAULT_HOST_STRAIN: &str = "HT115";
pub const DEFAULT_PLASMID_BACKBONE: &str = "L4440";
pub const DEFAULT_ANTIBIOTIC: &str = "Amp";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RnaiClone {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub number: u64,
    pub alias: String,
    pub notebook: String,
    pub description: String,
    pub entered_by: String,
    pub sequence_name: String,
    pub library: String,
    pub host_strain: String,
    pub plasmid_backbone: String,
    pub antibiotic: String,
    pub location: String,
    pub sequenced: bool,
}

impl Entity for RnaiClone {
    record_meta!(Kind::RnaiClone);

    fn short_desc(&self) -> &str {
        &self.alias
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn number(&self) -> u64 {
        self.number
    }

    fn display_name(&self) -> Option<String> {
        Some(format!("RNAiC{}", self.number))
    }

    fn auto_fill(&mut self, fill: &AutoFill<'_>) {
        self.entered_by = fill.user_name.to_string();
        self.host_strain = DEFAULT_HOST_STRAIN.to_string();
        self.plasmid_backbone = DEFAULT_PLASMID_BACKBONE.to_string();
        self.antibiotic = DEFAULT_ANTIBIOTIC.to_string();
        self.number = fill.next_number;
    }
}
