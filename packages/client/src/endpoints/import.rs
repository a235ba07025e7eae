//! `/import` and `/fileset` endpoints.

use minerva_api::{Fileset, Image, Import, ImportCredentials, ImportUpdate, NewImport};

use crate::client::MinervaClient;
use crate::error::ClientError;
use crate::request::ApiRequest;

/// `POST /import`
pub fn create(data: &NewImport) -> Result<ApiRequest, ClientError> {
    ApiRequest::post("/import").with_json(data)
}

/// `PUT /import/{uuid}`
pub fn update(uuid: &str, data: &ImportUpdate) -> Result<ApiRequest, ClientError> {
    ApiRequest::put(format!("/import/{uuid}")).with_json(data)
}

/// `GET /import/{uuid}/credentials`
pub fn credentials(uuid: &str) -> ApiRequest {
    ApiRequest::get(format!("/import/{uuid}/credentials"))
}

/// `GET /import/{uuid}/filesets`
pub fn filesets(uuid: &str) -> ApiRequest {
    ApiRequest::get(format!("/import/{uuid}/filesets"))
}

/// `GET /import/incomplete`
pub fn incomplete() -> ApiRequest {
    ApiRequest::get("/import/incomplete")
}

/// `GET /fileset/{uuid}/images`
pub fn fileset_images(uuid: &str) -> ApiRequest {
    ApiRequest::get(format!("/fileset/{uuid}/images"))
}

impl MinervaClient {
    /// Start an import. Write calls yield `None` on `204 No Content`.
    pub async fn create_import(&self, data: &NewImport) -> Result<Option<Import>, ClientError> {
        self.fetch_json(create(data)?).await
    }

    pub async fn update_import(
        &self,
        uuid: &str,
        data: &ImportUpdate,
    ) -> Result<Option<Import>, ClientError> {
        self.fetch_json(update(uuid, data)?).await
    }

    /// Temporary storage credentials for uploading the import's raw files.
    pub async fn get_import_credentials(&self, uuid: &str) -> Result<ImportCredentials, ClientError> {
        self.fetch_json(credentials(uuid)).await
    }

    pub async fn list_filesets_in_import(&self, uuid: &str) -> Result<Vec<Fileset>, ClientError> {
        self.fetch_json(filesets(uuid)).await
    }

    /// The caller's imports that have not been marked complete.
    pub async fn list_incomplete_imports(&self) -> Result<Vec<Import>, ClientError> {
        self.fetch_json(incomplete()).await
    }

    pub async fn list_images_in_fileset(&self, uuid: &str) -> Result<Vec<Image>, ClientError> {
        self.fetch_json(fileset_images(uuid)).await
    }
}
