//! `/repository` endpoints.

use minerva_api::{Image, Import, NewRepository, Repository, RepositoryUpdate};

use crate::client::MinervaClient;
use crate::error::ClientError;
use crate::request::ApiRequest;

/// `GET /repository`
pub fn list() -> ApiRequest {
    ApiRequest::get("/repository")
}

/// `GET /repository/{uuid}`
pub fn get(uuid: &str) -> ApiRequest {
    ApiRequest::get(format!("/repository/{uuid}"))
}

/// `POST /repository`
pub fn create(data: &NewRepository) -> Result<ApiRequest, ClientError> {
    ApiRequest::post("/repository").with_json(data)
}

/// `PUT /repository/{uuid}` with only the mutable fields in the body.
pub fn update(repository: &Repository) -> Result<ApiRequest, ClientError> {
    ApiRequest::put(format!("/repository/{}", repository.uuid))
        .with_json(&RepositoryUpdate::from(repository))
}

/// `DELETE /repository/{uuid}`
pub fn delete(uuid: &str) -> ApiRequest {
    ApiRequest::delete(format!("/repository/{uuid}"))
}

/// `GET /repository/{uuid}/imports`
pub fn imports(uuid: &str) -> ApiRequest {
    ApiRequest::get(format!("/repository/{uuid}/imports"))
}

/// `GET /repository/{uuid}/images`
pub fn images(uuid: &str) -> ApiRequest {
    ApiRequest::get(format!("/repository/{uuid}/images"))
}

impl MinervaClient {
    pub async fn get_repositories(&self) -> Result<Vec<Repository>, ClientError> {
        self.fetch_json(list()).await
    }

    pub async fn get_repository(&self, uuid: &str) -> Result<Repository, ClientError> {
        self.fetch_json(get(uuid)).await
    }

    /// Create a repository. `None` when the API answers `204 No Content`.
    pub async fn create_repository(
        &self,
        data: &NewRepository,
    ) -> Result<Option<Repository>, ClientError> {
        self.fetch_json(create(data)?).await
    }

    /// Save a repository's mutable fields. `None` when the API answers
    /// `204 No Content`.
    pub async fn update_repository(
        &self,
        repository: &Repository,
    ) -> Result<Option<Repository>, ClientError> {
        self.fetch_json(update(repository)?).await
    }

    pub async fn delete_repository(&self, uuid: &str) -> Result<(), ClientError> {
        self.dispatch(delete(uuid)).await.map(drop)
    }

    /// Imports belonging to a repository.
    pub async fn get_imports(&self, repository_uuid: &str) -> Result<Vec<Import>, ClientError> {
        self.fetch_json(imports(repository_uuid)).await
    }

    /// Same call as [`get_imports`](Self::get_imports).
    pub async fn list_imports_in_repository(&self, uuid: &str) -> Result<Vec<Import>, ClientError> {
        self.get_imports(uuid).await
    }

    pub async fn list_images_in_repository(&self, uuid: &str) -> Result<Vec<Image>, ClientError> {
        self.fetch_json(images(uuid)).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::request::Method;

    #[test]
    fn request_shapes() {
        assert_eq!(list().method, Method::Get);
        assert_eq!(list().path, "/repository");
        assert_eq!(get("r1").path, "/repository/r1");
        assert_eq!(delete("r1").method, Method::Delete);
        assert_eq!(imports("r1").path, "/repository/r1/imports");
        assert_eq!(images("r1").path, "/repository/r1/images");
        assert!(list().body.is_none());
    }

    #[test]
    fn update_sends_mutable_fields_only() {
        let repo: Repository = serde_json::from_value(json!({
            "uuid": "r1",
            "name": "demo",
            "raw_storage": "Destroy",
            "access": "Private",
            "owner": "someone"
        }))
        .unwrap();
        let req = update(&repo).unwrap();
        assert_eq!(req.method, Method::Put);
        assert_eq!(req.path, "/repository/r1");
        assert_eq!(
            req.body,
            Some(json!({"name": "demo", "raw_storage": "Destroy", "access": "Private"}))
        );
    }

    #[test]
    fn create_posts_data() {
        let req = create(&NewRepository::new("demo")).unwrap();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.body, Some(json!({"name": "demo"})));
    }
}
