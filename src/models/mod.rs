// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Entity Model
//!
//! Inventory records (plasmids, oligos, strains, ...) form a closed set of
//! variants sharing the [`Entity`] contract: identity, ownership, descriptive
//! text, optional sequence text and per-type numbering.
//!
//! Variants are resolved by type name through the [`registry`]; unknown names
//! yield a [`BaseRecord`] that carries only identity and timestamps.
//!
//! ## Variant Categories
//!
//! - **Reagents**: plasmids, oligos, antibodies, samples
//! - **Strains**: bacteria, yeast strains, cell lines
//! - **Numbered**: RNAi clones, sequencing libraries
//! - **Users**: lab members and their access flags

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Implements `kind`, `meta` and `meta_mut` for a variant with a `meta` field.
macro_rules! record_meta {
    ($kind:expr) => {
        fn kind(&self) -> Option<$crate::models::Kind> {
            Some($kind)
        }

        fn meta(&self) -> &$crate::models::RecordMeta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut $crate::models::RecordMeta {
            &mut self.meta
        }
    };
}

pub mod operations;
pub mod reagents;
pub mod registry;
pub mod rnai_clone;
pub mod seq_lib;
pub mod strains;
pub mod user;

pub use operations::{
    create, create_numbered, get_by_id, next, next_available_number, next_id, prev, prev_id,
};
pub use reagents::{Antibody, Oligo, Plasmid, Sample};
pub use registry::{empty, lookup, Kind, Variant};
pub use rnai_clone::RnaiClone;
pub use seq_lib::SeqLib;
pub use strains::{Bacterium, CellLine, YeastStrain};
pub use user::User;

// =============================================================================
// Shared record fields
// =============================================================================

/// Identity and timestamps common to every record.
///
/// An `id` of 0 means "unset" (never stored, or lookup found nothing).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordMeta {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values available to [`Entity::auto_fill`] before a record is created.
#[derive(Debug, Clone, Copy)]
pub struct AutoFill<'a> {
    /// Display name of the acting user.
    pub user_name: &'a str,
    /// Next free per-type number, as computed by `next_available_number`.
    pub next_number: u64,
}

// =============================================================================
// Entity contract
// =============================================================================

/// Object-safe JSON encoding of a record, used by the store.
pub trait EntityCodec {
    fn encode(&self) -> serde_json::Result<Vec<u8>>;

    /// Replace `self` with the decoded record.
    fn decode_into(&mut self, bytes: &[u8]) -> serde_json::Result<()>;
}

impl<T: Serialize + DeserializeOwned> EntityCodec for T {
    fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    fn decode_into(&mut self, bytes: &[u8]) -> serde_json::Result<()> {
        *self = serde_json::from_slice(bytes)?;
        Ok(())
    }
}

/// Capability contract shared by all record variants.
pub trait Entity: EntityCodec + fmt::Debug + Send + Sync {
    /// Variant of this record, `None` for the base record.
    fn kind(&self) -> Option<Kind>;

    fn meta(&self) -> &RecordMeta;

    fn meta_mut(&mut self) -> &mut RecordMeta;

    fn id(&self) -> u64 {
        self.meta().id
    }

    /// Name used for this variant in search results (e.g. `Plasmid`).
    fn model_name(&self) -> &'static str {
        self.kind().map(|k| k.variant().model_name).unwrap_or("")
    }

    /// Physical attribute naming the record's creator.
    fn owner_field_name(&self) -> &'static str {
        self.kind().map(|k| k.variant().owner_field).unwrap_or("name")
    }

    fn short_desc(&self) -> &str {
        ""
    }

    fn description(&self) -> &str {
        ""
    }

    fn sequence(&self) -> Option<&str> {
        None
    }

    /// Per-type sequence number. Variants without explicit numbering use the id.
    fn number(&self) -> u64 {
        self.id()
    }

    /// Human-facing name derived from the number, for variants that have one.
    fn display_name(&self) -> Option<String> {
        None
    }

    /// Apply variant defaults before creation.
    fn auto_fill(&mut self, _fill: &AutoFill<'_>) {}
}

/// Fallback record for unrecognized type names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRecord {
    #[serde(flatten)]
    pub meta: RecordMeta,
}

impl Entity for BaseRecord {
    fn kind(&self) -> Option<Kind> {
        None
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }
}
