//! Repository types: `/repository` and `/repository/{id}`.

use serde::{Deserialize, Serialize};

use crate::Extra;

/// A repository record as returned by `GET /repository/{id}`.
///
/// # Example
///
/// ```json
/// {
///   "uuid":        "3a1c2b8e-5d7f-4e2a-9b61-0c4d8e2f1a37",
///   "name":        "confocal-2024",
///   "raw_storage": "Destroy",
///   "access":      "Private"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repository {
    pub uuid: String,

    pub name: String,

    /// What happens to the raw uploaded files once an import completes
    /// (e.g. `"Destroy"`, `"Archive"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_storage: Option<String>,

    /// Access level of the repository (e.g. `"Private"`, `"Public"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// Request body for `POST /repository`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewRepository {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_storage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
}

impl NewRepository {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Request body for `PUT /repository/{id}`.
///
/// Only the mutable fields are sent; `uuid` travels in the path and any
/// server-side extras are never echoed back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositoryUpdate {
    pub name: String,
    pub raw_storage: Option<String>,
    pub access: Option<String>,
}

impl From<&Repository> for RepositoryUpdate {
    fn from(repo: &Repository) -> Self {
        Self {
            name: repo.name.clone(),
            raw_storage: repo.raw_storage.clone(),
            access: repo.access.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_are_kept() {
        let json = r#"{"uuid":"r1","name":"demo","access":"Private","owner":"u1"}"#;
        let repo: Repository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.access.as_deref(), Some("Private"));
        assert!(repo.raw_storage.is_none());
        assert_eq!(repo.extra["owner"], "u1");

        let back = serde_json::to_value(&repo).unwrap();
        assert_eq!(back["owner"], "u1");
    }

    #[test]
    fn update_sends_nulls_for_missing_fields() {
        let repo = Repository {
            uuid: "r1".into(),
            name: "demo".into(),
            raw_storage: None,
            access: Some("Public".into()),
            extra: Extra::new(),
        };
        let body = serde_json::to_value(RepositoryUpdate::from(&repo)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"name": "demo", "raw_storage": null, "access": "Public"})
        );
    }

    #[test]
    fn new_repository_omits_absent_options() {
        let body = serde_json::to_string(&NewRepository::new("demo")).unwrap();
        assert_eq!(body, r#"{"name":"demo"}"#);
    }
}
