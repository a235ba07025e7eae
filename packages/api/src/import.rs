//! Import and fileset types: `/import`, `/import/{id}/…`, `/fileset/{id}/…`.

use serde::{Deserialize, Serialize};

use crate::Extra;

/// An import: one upload session of raw files into a repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Import {
    pub uuid: String,

    #[serde(default)]
    pub name: String,

    /// UUID of the repository the import belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// `false` until the uploader has marked the import finished.
    #[serde(default)]
    pub complete: bool,

    #[serde(flatten)]
    pub extra: Extra,
}

/// Request body for `POST /import`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewImport {
    pub name: String,

    /// UUID of the target repository.
    pub repository: String,
}

impl NewImport {
    pub fn new(name: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repository: repository.into(),
        }
    }
}

/// Request body for `PUT /import/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImportUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
}

/// Short-lived storage credentials for uploading an import's raw files.
///
/// The API returns these in the identity provider's PascalCase form; the
/// snake_case spelling is accepted too.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportCredentials {
    #[serde(alias = "AccessKeyId")]
    pub access_key_id: String,

    #[serde(alias = "SecretAccessKey")]
    pub secret_access_key: String,

    #[serde(alias = "SessionToken")]
    pub session_token: String,

    /// Storage bucket the raw files go into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,

    /// Key prefix under `bucket` reserved for this import.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// A fileset: one logical image source (possibly many files) within an import.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fileset {
    pub uuid: String,

    #[serde(default)]
    pub name: String,

    #[serde(flatten)]
    pub extra: Extra,
}
