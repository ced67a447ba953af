// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! LabDB Gateway - Authenticated Relay for the Lab Inventory
//!
//! This crate fronts the LabDB web application: it verifies identity tokens,
//! keeps browser sessions, authorizes every request against the user table
//! and relays it downstream with a signed identity assertion. It also answers
//! record search and sequential navigation directly from the record store.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers and router (Axum)
//! - `auth` - Sessions, token verification, relay signing, authorization
//! - `models` - Entity variants and the type-name registry
//! - `proxy` - Downstream forwarding
//! - `search` - Term compilation and cross-type search
//! - `storage` - Record store (redb) and lazy query iteration

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;
pub mod search;
pub mod state;
pub mod storage;
