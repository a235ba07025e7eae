//! `/grant` endpoints and repository grant listing.

use minerva_api::{Grant, GrantRequest, GrantType};
use tracing::error;

use crate::client::MinervaClient;
use crate::error::ClientError;
use crate::request::ApiRequest;

/// `POST /grant` giving `user_uuid` the `grant_type` permission on a repository.
///
/// `grant_type` must be exactly `Admin`, `Read` or `Write`; anything else
/// fails with [`ClientError::InvalidGrant`].
pub fn grant_repository(
    user_uuid: &str,
    repository_uuid: &str,
    grant_type: &str,
) -> Result<ApiRequest, ClientError> {
    let grant: GrantType = grant_type.parse().map_err(|e| {
        error!("invalid grant: {e}");
        ClientError::InvalidGrant(grant_type.to_string())
    })?;
    ApiRequest::post("/grant").with_json(&GrantRequest::repository(repository_uuid, user_uuid, grant))
}

/// `DELETE /grant/resource/{resource}/subject/{subject}`
pub fn delete(resource_uuid: &str, subject_uuid: &str) -> ApiRequest {
    ApiRequest::delete(format!(
        "/grant/resource/{resource_uuid}/subject/{subject_uuid}"
    ))
}

/// `GET /repository/{uuid}/grants`
pub fn list_for_repository(uuid: &str) -> ApiRequest {
    ApiRequest::get(format!("/repository/{uuid}/grants"))
}

impl MinervaClient {
    /// Grant a user a permission on a repository. The grant type is checked
    /// before anything else, so an invalid one fails even without a session.
    pub async fn grant_permission_to_repository(
        &self,
        user_uuid: &str,
        repository_uuid: &str,
        grant_type: &str,
    ) -> Result<(), ClientError> {
        let request = grant_repository(user_uuid, repository_uuid, grant_type)?;
        self.dispatch(request).await.map(drop)
    }

    pub async fn delete_grant(&self, resource_uuid: &str, subject_uuid: &str) -> Result<(), ClientError> {
        self.dispatch(delete(resource_uuid, subject_uuid)).await.map(drop)
    }

    pub async fn list_grants_for_repository(&self, uuid: &str) -> Result<Vec<Grant>, ClientError> {
        self.fetch_json(list_for_repository(uuid)).await
    }
}
