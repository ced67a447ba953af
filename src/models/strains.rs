// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Strain records: bacteria, yeast strains and cell lines.

use serde::{Deserialize, Serialize};

use super::{Entity, Kind, RecordMeta};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bacterium {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub entered_by: String,
    pub comments: String,
    pub strainalias: String,
    pub sequence: String,
}

impl Entity for Bacterium {
    record_meta!(Kind::Bacterium);

    fn short_desc(&self) -> &str {
        &self.strainalias
    }

    fn description(&self) -> &str {
        &self.comments
    }

    fn sequence(&self) -> Option<&str> {
        Some(&self.sequence)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YeastStrain {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub entered_by: String,
    pub comments: String,
    pub strainalias: String,
    pub sequence: String,
}

impl Entity for YeastStrain {
    record_meta!(Kind::YeastStrain);

    fn short_desc(&self) -> &str {
        &self.strainalias
    }

    fn description(&self) -> &str {
        &self.comments
    }

    fn sequence(&self) -> Option<&str> {
        Some(&self.sequence)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellLine {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub entered_by: String,
    pub description: String,
    pub line_alias: String,
    pub sequence: String,
}

impl Entity for CellLine {
    record_meta!(Kind::Line);

    fn short_desc(&self) -> &str {
        &self.line_alias
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn sequence(&self) -> Option<&str> {
        Some(&self.sequence)
    }
}
