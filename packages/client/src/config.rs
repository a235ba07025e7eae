//! Client configuration, loaded once at startup.

use minerva_api::CognitoDetails;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or validating a [`ClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },

    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

fn default_region() -> String {
    "us-east-1".into()
}

fn default_stage() -> String {
    "dev".into()
}

/// Connection settings for a Minerva deployment.
///
/// Only the options listed here are recognised; unknown keys in a JSON
/// config are rejected.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `MINERVA_REGION` | `us-east-1` | Region hosting the API and identity provider |
/// | `MINERVA_BASE_URL` | (required) | API gateway URL, without the stage |
/// | `MINERVA_STAGE` | `dev` | Deployment stage path segment (`dev`, `test`, `prod`) |
/// | `MINERVA_USER_POOL_ID` | (absent) | Identity-provider user pool |
/// | `MINERVA_CLIENT_ID` | (absent) | Identity-provider app client |
/// | `MINERVA_IDENTITY_POOL_ID` | (absent) | Identity-provider identity pool |
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default = "default_region")]
    pub region: String,

    /// Example: `"https://3v21j4dh1d.execute-api.us-east-1.amazonaws.com"`.
    #[serde(alias = "minervaBaseUrl", alias = "baseUrl")]
    pub base_url: String,

    #[serde(default = "default_stage", alias = "minervaStage")]
    pub stage: String,

    #[serde(default, alias = "CognitoUserPoolId", alias = "userPoolId")]
    pub user_pool_id: Option<String>,

    #[serde(default, alias = "CognitoClientId", alias = "clientId")]
    pub client_id: Option<String>,

    #[serde(default, alias = "IdentityPoolId", alias = "identityPoolId")]
    pub identity_pool_id: Option<String>,
}

impl ClientConfig {
    /// Minimal config for `base_url` with default region and stage.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            region: default_region(),
            base_url: base_url.into(),
            stage: default_stage(),
            user_pool_id: None,
            client_id: None,
            identity_pool_id: None,
        }
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = stage.into();
        self
    }

    /// Populate config from `MINERVA_*` environment variables and validate it.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            region: lookup("MINERVA_REGION").unwrap_or_else(default_region),
            base_url: lookup("MINERVA_BASE_URL").ok_or(ConfigError::Missing("MINERVA_BASE_URL"))?,
            stage: lookup("MINERVA_STAGE").unwrap_or_else(default_stage),
            user_pool_id: lookup("MINERVA_USER_POOL_ID"),
            client_id: lookup("MINERVA_CLIENT_ID"),
            identity_pool_id: lookup("MINERVA_IDENTITY_POOL_ID"),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON config. Accepts both snake_case keys and
    /// the legacy `AppConfig` spelling (`minervaBaseUrl`, `CognitoClientId`, …).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ConfigError::Invalid {
                field: "base_url",
                reason: format!("{:?} must start with http:// or https://", self.base_url),
            });
        }
        if self.stage.is_empty() || self.stage.contains('/') {
            return Err(ConfigError::Invalid {
                field: "stage",
                reason: format!("{:?} must be a single non-empty path segment", self.stage),
            });
        }
        if self.region.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "region",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// `{base_url}/{stage}`: the prefix every request path is appended to.
    pub fn api_base(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.stage)
    }

    /// Overwrite the identity-provider settings with those the API reports.
    /// Fields the API leaves out keep their current value.
    pub fn with_cognito_details(mut self, details: &CognitoDetails) -> Self {
        if let Some(region) = &details.region {
            self.region = region.clone();
        }
        if details.user_pool_id.is_some() {
            self.user_pool_id = details.user_pool_id.clone();
        }
        if details.client_id.is_some() {
            self.client_id = details.client_id.clone();
        }
        if details.identity_pool_id.is_some() {
            self.identity_pool_id = details.identity_pool_id.clone();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn api_base_joins_stage() {
        let config = ClientConfig::new("https://api.example.com/").with_stage("prod");
        assert_eq!(config.api_base(), "https://api.example.com/prod");
    }

    #[test]
    fn env_defaults() {
        let config =
            ClientConfig::from_lookup(lookup_from(&[("MINERVA_BASE_URL", "https://api.example.com")]))
                .unwrap();
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.stage, "dev");
        assert!(config.client_id.is_none());
    }

    #[test]
    fn env_requires_base_url() {
        let err = ClientConfig::from_lookup(lookup_from(&[("MINERVA_STAGE", "prod")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("MINERVA_BASE_URL")));
    }

    #[test]
    fn legacy_app_config_keys() {
        let json = r#"{
            "region": "us-east-1",
            "minervaBaseUrl": "https://3v21j4dh1d.execute-api.us-east-1.amazonaws.com",
            "minervaStage": "dev",
            "CognitoUserPoolId": "us-east-1_d3Wusx6qp",
            "CognitoClientId": "cvuuuuogh6nmqm8491iiu1lh5",
            "IdentityPoolId": "us-east-1:ce515980-6251-4cd1-ac59-68d09d97cefc"
        }"#;
        let config = ClientConfig::from_json(json).unwrap();
        assert_eq!(
            config.api_base(),
            "https://3v21j4dh1d.execute-api.us-east-1.amazonaws.com/dev"
        );
        assert_eq!(config.client_id.as_deref(), Some("cvuuuuogh6nmqm8491iiu1lh5"));
    }

    #[test]
    fn unknown_keys_rejected() {
        let json = r#"{"base_url":"https://api.example.com","debug":true}"#;
        assert!(matches!(
            ClientConfig::from_json(json),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_bad_base_url_and_stage() {
        assert!(ClientConfig::new("ftp://api.example.com").validate().is_err());
        assert!(ClientConfig::new("https://api.example.com")
            .with_stage("dev/v2")
            .validate()
            .is_err());
        assert!(ClientConfig::new("https://api.example.com")
            .with_stage("")
            .validate()
            .is_err());
    }

    #[test]
    fn cognito_details_fill_identity_settings() {
        let details = CognitoDetails {
            client_id: Some("client-1".into()),
            user_pool_id: Some("pool-1".into()),
            ..Default::default()
        };
        let config = ClientConfig::new("https://api.example.com").with_cognito_details(&details);
        assert_eq!(config.client_id.as_deref(), Some("client-1"));
        assert_eq!(config.user_pool_id.as_deref(), Some("pool-1"));
        assert_eq!(config.region, "us-east-1");
    }
}
