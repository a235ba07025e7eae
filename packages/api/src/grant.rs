//! Grant types: `POST /grant`, `DELETE /grant/…`, `GET /repository/{id}/grants`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Extra;

/// Permission level a grant confers on a repository.
///
/// Serialises exactly as the API spells it: `"Admin"`, `"Read"`, `"Write"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GrantType {
    Admin,
    Read,
    Write,
}

impl GrantType {
    pub const ALL: [GrantType; 3] = [GrantType::Admin, GrantType::Read, GrantType::Write];

    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::Admin => "Admin",
            GrantType::Read => "Read",
            GrantType::Write => "Write",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the recognised grant types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown grant type {0:?}; expected one of: Admin, Read, Write")]
pub struct GrantTypeError(pub String);

/// Parses a [`GrantType`] from its wire spelling. Matching is case-sensitive.
impl std::str::FromStr for GrantType {
    type Err = GrantTypeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(GrantType::Admin),
            "Read" => Ok(GrantType::Read),
            "Write" => Ok(GrantType::Write),
            _ => Err(GrantTypeError(s.to_string())),
        }
    }
}

/// Request body for `POST /grant`.
///
/// ```json
/// {
///   "uuid":        "<repository uuid>",
///   "grantee":     "<user uuid>",
///   "resource":    "repository",
///   "permissions": ["Read"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrantRequest {
    /// UUID of the resource being shared.
    pub uuid: String,

    /// UUID of the user or group receiving the permission.
    pub grantee: String,

    /// Resource kind; always `"repository"` for grants made by this client.
    pub resource: String,

    pub permissions: Vec<GrantType>,
}

impl GrantRequest {
    pub fn repository(
        repository_uuid: impl Into<String>,
        grantee: impl Into<String>,
        grant: GrantType,
    ) -> Self {
        Self {
            uuid: repository_uuid.into(),
            grantee: grantee.into(),
            resource: "repository".into(),
            permissions: vec![grant],
        }
    }
}

/// One access-control entry, as listed by `GET /repository/{id}/grants`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Grant {
    /// UUID of the user or group holding the permissions.
    pub subject: String,

    /// UUID of the resource the permissions apply to.
    pub resource: String,

    #[serde(default)]
    pub permissions: Vec<GrantType>,

    #[serde(flatten)]
    pub extra: Extra,
}
