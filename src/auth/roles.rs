// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Method-level permissions.

use axum::http::Method;

use crate::models::User;

/// Access level a request needs.
///
/// - `Read` - safe reads (`GET` only)
/// - `Write` - every other method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Read,
    Write,
}

impl Permission {
    pub fn required_for(method: &Method) -> Permission {
        if method == Method::GET {
            Permission::Read
        } else {
            Permission::Write
        }
    }

    /// Write access implies read access.
    pub fn granted_to(self, user: &User) -> bool {
        match self {
            Permission::Read => user.can_read(),
            Permission::Write => user.can_write(),
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::Read => write!(f, "read"),
            Permission::Write => write!(f, "write"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(read: bool, write: bool) -> User {
        User {
            auth_read: read,
            auth_write: write,
            ..Default::default()
        }
    }

    #[test]
    fn only_get_is_a_read() {
        assert_eq!(Permission::required_for(&Method::GET), Permission::Read);
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH, Method::HEAD] {
            assert_eq!(Permission::required_for(&method), Permission::Write);
        }
    }

    #[test]
    fn permissions_display_as_log_labels() {
        assert_eq!(Permission::Read.to_string(), "read");
        assert_eq!(Permission::Write.to_string(), "write");
    }

    #[test]
    fn writers_can_do_everything() {
        let writer = user(false, true);
        assert!(Permission::Read.granted_to(&writer));
        assert!(Permission::Write.granted_to(&writer));
    }

    #[test]
    fn readers_cannot_write() {
        let reader = user(true, false);
        assert!(Permission::Read.granted_to(&reader));
        assert!(!Permission::Write.granted_to(&reader));
    }

    #[test]
    fn admin_flag_alone_grants_nothing() {
        let admin = User {
            auth_admin: true,
            ..Default::default()
        };
        assert!(!Permission::Read.granted_to(&admin));
        assert!(!Permission::Write.granted_to(&admin));
    }
}
