//! Identity-provider metadata: `GET /cognito_details`.

use serde::{Deserialize, Serialize};

use crate::Extra;

/// Identifiers a client needs to sign users in against the API's identity
/// provider.
///
/// ```json
/// {
///   "region":           "us-east-1",
///   "user_pool_id":     "us-east-1_d3Wusx6qp",
///   "client_id":        "cvuuuuogh6nmqm8491iiu1lh5",
///   "identity_pool_id": "us-east-1:ce515980-6251-4cd1-ac59-68d09d97cefc"
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CognitoDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_pool_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_pool_id: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,
}
