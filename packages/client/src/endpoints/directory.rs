//! User and group lookup, and identity-provider metadata.

use minerva_api::{CognitoDetails, Group, User};

use crate::client::MinervaClient;
use crate::error::ClientError;
use crate::request::ApiRequest;

/// `GET /user/find/{search}`
pub fn find_user(search: &str) -> ApiRequest {
    ApiRequest::get(format!("/user/find/{search}"))
}

/// `GET /group/find/{search}`
pub fn find_group(search: &str) -> ApiRequest {
    ApiRequest::get(format!("/group/find/{search}"))
}

/// `GET /cognito_details`
pub fn cognito_details() -> ApiRequest {
    ApiRequest::get("/cognito_details")
}

impl MinervaClient {
    pub async fn find_user(&self, search: &str) -> Result<Vec<User>, ClientError> {
        self.fetch_json(find_user(search)).await
    }

    pub async fn find_group(&self, search: &str) -> Result<Vec<Group>, ClientError> {
        self.fetch_json(find_group(search)).await
    }

    pub async fn get_cognito_details(&self) -> Result<CognitoDetails, ClientError> {
        self.fetch_json(cognito_details()).await
    }
}
