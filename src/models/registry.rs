// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Type-name → variant registry.
//!
//! Each [`Variant`] describes one record type: how to build an empty
//! instance, which table holds it, which attribute names its owner, and the
//! spellings accepted in URLs and search requests.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::{
    Antibody, Bacterium, BaseRecord, CellLine, Entity, Oligo, Plasmid, RnaiClone, Sample, SeqLib,
    User, YeastStrain,
};

/// Closed set of record variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Plasmid,
    Oligo,
    Line,
    Sample,
    Bacterium,
    YeastStrain,
    User,
    Antibody,
    RnaiClone,
    SeqLib,
}

/// Static description of a record variant.
#[derive(Debug)]
pub struct Variant {
    pub kind: Kind,
    /// Name reported in search results.
    pub model_name: &'static str,
    /// Store table holding records of this variant.
    pub table: &'static str,
    /// Accepted type-name spellings (case-sensitive).
    pub names: &'static [&'static str],
    /// Attribute designating the creating user.
    pub owner_field: &'static str,
    pub empty: fn() -> Box<dyn Entity>,
}

fn empty_of<T: Entity + Default + 'static>() -> Box<dyn Entity> {
    Box::new(T::default())
}

static VARIANTS: [Variant; 10] = [
    Variant {
        kind: Kind::Plasmid,
        model_name: "Plasmid",
        table: "plasmids",
        names: &["plasmid", "plasmids"],
        owner_field: "creator",
        empty: empty_of::<Plasmid>,
    },
    Variant {
        kind: Kind::Oligo,
        model_name: "Oligo",
        table: "oligos",
        names: &["oligo", "oligos"],
        owner_field: "entered_by",
        empty: empty_of::<Oligo>,
    },
    Variant {
        kind: Kind::Line,
        model_name: "Line",
        table: "lines",
        names: &["line", "lines"],
        owner_field: "entered_by",
        empty: empty_of::<CellLine>,
    },
    Variant {
        kind: Kind::Sample,
        model_name: "Sample",
        table: "samples",
        names: &["sample", "samples"],
        owner_field: "entered_by",
        empty: empty_of::<Sample>,
    },
    Variant {
        kind: Kind::Bacterium,
        model_name: "Bacterium",
        table: "bacteria",
        names: &["bacterium", "bacteria"],
        owner_field: "entered_by",
        empty: empty_of::<Bacterium>,
    },
    Variant {
        kind: Kind::YeastStrain,
        model_name: "Yeaststrain",
        table: "yeaststrains",
        names: &["yeaststrain", "yeaststrains"],
        owner_field: "entered_by",
        empty: empty_of::<YeastStrain>,
    },
    Variant {
        kind: Kind::User,
        model_name: "User",
        table: "users",
        names: &["user", "users"],
        owner_field: "name",
        empty: empty_of::<User>,
    },
    Variant {
        kind: Kind::Antibody,
        model_name: "Antibody",
        table: "antibodies",
        names: &["antibody", "antibodies"],
        owner_field: "entered_by",
        empty: empty_of::<Antibody>,
    },
    Variant {
        kind: Kind::RnaiClone,
        model_name: "RNAiClone",
        table: "rnai_clones",
        names: &["rnaiclone", "rnaiclones", "rnai_clone", "rnai_clones"],
        owner_field: "entered_by",
        empty: empty_of::<RnaiClone>,
    },
    Variant {
        kind: Kind::SeqLib,
        model_name: "SeqLib",
        table: "seq_libs",
        names: &["seqlib", "seqlibs", "seq_lib", "seq_libs"],
        owner_field: "entered_by",
        empty: empty_of::<SeqLib>,
    },
];

static BY_NAME: LazyLock<HashMap<&'static str, &'static Variant>> = LazyLock::new(|| {
    VARIANTS
        .iter()
        .flat_map(|v| v.names.iter().map(move |name| (*name, v)))
        .collect()
});

impl Kind {
    pub const ALL: [Kind; 10] = [
        Kind::Plasmid,
        Kind::Oligo,
        Kind::Line,
        Kind::Sample,
        Kind::Bacterium,
        Kind::YeastStrain,
        Kind::User,
        Kind::Antibody,
        Kind::RnaiClone,
        Kind::SeqLib,
    ];

    pub fn variant(self) -> &'static Variant {
        // VARIANTS is declared in the same order as the enum.
        &VARIANTS[self as usize]
    }

    pub fn empty(self) -> Box<dyn Entity> {
        (self.variant().empty)()
    }
}

/// Resolve a type name (singular or plural) to its variant.
pub fn lookup(name: &str) -> Option<&'static Variant> {
    BY_NAME.get(name).copied()
}

/// Zero-valued record for a type name; unknown names yield a [`BaseRecord`].
pub fn empty(name: &str) -> Box<dyn Entity> {
    match lookup(name) {
        Some(variant) => (variant.empty)(),
        None => Box::new(BaseRecord::default()),
    }
}
