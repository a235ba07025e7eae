//! User and group lookup results: `/user/find/{q}` and `/group/find/{q}`.

use serde::{Deserialize, Serialize};

use crate::Extra;

/// A user directory entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub uuid: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// A group directory entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    pub uuid: String,

    #[serde(default)]
    pub name: String,

    #[serde(flatten)]
    pub extra: Extra,
}
