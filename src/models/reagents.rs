// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Reagent records: plasmids, oligos, antibodies and samples.

use serde::{Deserialize, Serialize};

use super::{Entity, Kind, RecordMeta};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plasmid {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub alias: String,
    pub description: String,
    pub sequence: String,
    pub creator: String,
}

impl Entity for Plasmid {
    record_meta!(Kind::Plasmid);

    fn short_desc(&self) -> &str {
        &self.alias
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn sequence(&self) -> Option<&str> {
        Some(&self.sequence)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Oligo {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub entered_by: String,
    pub oligoalias: String,
    pub purpose: String,
    pub sequence: String,
}

impl Entity for Oligo {
    record_meta!(Kind::Oligo);

    fn short_desc(&self) -> &str {
        &self.oligoalias
    }

    fn description(&self) -> &str {
        &self.purpose
    }

    fn sequence(&self) -> Option<&str> {
        Some(&self.sequence)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Antibody {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub entered_by: String,
    pub alias: String,
    pub comments: String,
}

impl Entity for Antibody {
    record_meta!(Kind::Antibody);

    fn short_desc(&self) -> &str {
        &self.alias
    }

    fn description(&self) -> &str {
        &self.comments
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sample {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub entered_by: String,
    pub description: String,
    pub sample_alias: String,
}

impl Entity for Sample {
    record_meta!(Kind::Sample);

    fn short_desc(&self) -> &str {
        &self.sample_alias
    }

    fn description(&self) -> &str {
        &self.description
    }
}
