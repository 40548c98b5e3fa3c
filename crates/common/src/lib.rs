// ================
// common/src/lib.rs
// ================
//! Common types shared between the journal backend, its binary and the test suite.
//! This module defines the domain identifiers, the entry record and the HTML form payloads.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest username accepted at registration
pub const MAX_USERNAME_LEN: usize = 150;

/// Stable identifier of a registered user
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a journal entry
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single timestamped journal record owned by exactly one user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Row identifier
    pub id: EntryId,
    /// Owning user
    pub user_id: UserId,
    /// Free text, never empty
    pub content: String,
    /// Server clock at insertion
    pub created_at: DateTime<Utc>,
}

/// Username/password pair posted by the register and login forms.
///
/// Missing fields deserialize to empty strings so that the handlers can
/// report them as validation failures instead of a form rejection.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /add`
#[derive(Deserialize, Debug, Clone, Default)]
pub struct EntryForm {
    #[serde(default)]
    pub content: String,
}
