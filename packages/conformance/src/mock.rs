//! In-memory stand-in for the Minerva REST API.
//!
//! Serves every endpoint the client knows about under `/{stage}`, keeps its
//! data in RAM behind a [`RwLock`], and records each request it receives
//! (before auth is checked) so tests can assert on exactly what went over the
//! wire, or that nothing did.
//!
//! Auth only checks the header shape: any `Authorization: Bearer <token>` is
//! accepted, except that the guest token `Anonymous` may only `GET`.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use axum::{
    body::{to_bytes, Body},
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use minerva_api::{
    CognitoDetails, Extra, Fileset, Grant, GrantRequest, Group, Image, ImageDimensions, Import,
    ImportCredentials, ImportUpdate, NewImport, NewRepository, Repository, RepositoryUpdate, User,
};
use serde_json::Value;
use uuid::Uuid;

/// Stage prefix the mock mounts its routes under.
pub const STAGE: &str = "dev";

/// A minimal JPEG (SOI … EOI) returned for every tile.
pub const TILE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0xFF, 0xD9];

// ---------------------------------------------------------------------------
// Recorded requests
// ---------------------------------------------------------------------------

/// One request as the mock saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the stage prefix, e.g. `/dev/repository`.
    pub path: String,
    pub query: Option<String>,
    /// Header names lower-cased.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Inner {
    repositories: BTreeMap<String, Repository>,
    imports: BTreeMap<String, Import>,
    /// import uuid → filesets
    filesets: HashMap<String, Vec<Fileset>>,
    images: BTreeMap<String, Image>,
    dimensions: HashMap<String, ImageDimensions>,
    grants: Vec<Grant>,
    users: Vec<User>,
    groups: Vec<Group>,
    rendering_settings: HashMap<String, Vec<Value>>,
    requests: Vec<RecordedRequest>,
}

/// Shared state of a running mock API.
#[derive(Default)]
pub struct MockApi {
    inner: RwLock<Inner>,
    cognito: CognitoDetails,
}

impl MockApi {
    pub fn new(cognito: CognitoDetails) -> Self {
        Self {
            inner: RwLock::default(),
            cognito,
        }
    }

    // --- Inspection ----------------------------------------------------------

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.read().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.read().unwrap().requests.len()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.inner.read().unwrap().requests.last().cloned()
    }

    pub fn repository(&self, uuid: &str) -> Option<Repository> {
        self.inner.read().unwrap().repositories.get(uuid).cloned()
    }

    pub fn grants(&self) -> Vec<Grant> {
        self.inner.read().unwrap().grants.clone()
    }

    pub fn rendering_settings(&self, image_uuid: &str) -> Vec<Value> {
        self.inner
            .read()
            .unwrap()
            .rendering_settings
            .get(image_uuid)
            .cloned()
            .unwrap_or_default()
    }

    // --- Seeding -------------------------------------------------------------

    pub fn seed_repository(&self, repo: Repository) {
        self.inner
            .write()
            .unwrap()
            .repositories
            .insert(repo.uuid.clone(), repo);
    }

    pub fn seed_import(&self, import: Import) {
        self.inner
            .write()
            .unwrap()
            .imports
            .insert(import.uuid.clone(), import);
    }

    pub fn seed_fileset(&self, import_uuid: &str, fileset: Fileset) {
        self.inner
            .write()
            .unwrap()
            .filesets
            .entry(import_uuid.to_string())
            .or_default()
            .push(fileset);
    }

    /// Store an image together with its dimensions. `image.fileset` and the
    /// `repository` extra field drive the listing endpoints.
    pub fn seed_image(&self, image: Image, dimensions: ImageDimensions) {
        let mut inner = self.inner.write().unwrap();
        inner.dimensions.insert(image.uuid.clone(), dimensions);
        inner.images.insert(image.uuid.clone(), image);
    }

    pub fn seed_user(&self, user: User) {
        self.inner.write().unwrap().users.push(user);
    }

    pub fn seed_group(&self, group: Group) {
        self.inner.write().unwrap().groups.push(group);
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors the mock answers with. Bodies are plain text, as the real API's are.
#[derive(Debug)]
enum MockError {
    NotFound,
    Unauthorized,
    Forbidden(&'static str),
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        match self {
            MockError::NotFound => (StatusCode::NOT_FOUND, "not found").into_response(),
            MockError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "missing bearer token").into_response()
            }
            MockError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg).into_response(),
        }
    }
}

type Shared = Arc<MockApi>;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the mock's router, mounted under `/{STAGE}`.
pub fn build_router(api: Shared) -> Router {
    let routes = Router::new()
        // Repositories
        .route("/repository", get(list_repositories).post(create_repository))
        .route(
            "/repository/{id}",
            get(get_repository)
                .put(update_repository)
                .delete(delete_repository),
        )
        .route("/repository/{id}/imports", get(repository_imports))
        .route("/repository/{id}/images", get(repository_images))
        .route("/repository/{id}/grants", get(repository_grants))
        // Imports and filesets
        .route("/import", post(create_import))
        .route("/import/incomplete", get(incomplete_imports))
        .route("/import/{id}", put(update_import))
        .route("/import/{id}/credentials", get(import_credentials))
        .route("/import/{id}/filesets", get(import_filesets))
        .route("/fileset/{id}/images", get(fileset_images))
        // Images
        .route("/image/{id}", get(get_image).delete(delete_image))
        .route("/image/{id}/dimensions", get(image_dimensions))
        .route(
            "/image/{id}/render-tile/{x}/{y}/{z}/{t}/{level}/{channels}",
            get(render_tile),
        )
        .route(
            "/image/{id}/prerendered-tile/{x}/{y}/{z}/{t}/{level}/{settings}",
            get(prerendered_tile),
        )
        .route("/image/{id}/rendering_settings", post(create_rendering_settings))
        // Grants
        .route("/grant", post(create_grant))
        .route(
            "/grant/resource/{resource}/subject/{subject}",
            axum::routing::delete(delete_grant),
        )
        // Directory
        .route("/user/find/{q}", get(find_user))
        .route("/group/find/{q}", get(find_group))
        .route("/cognito_details", get(cognito_details));

    Router::new()
        .nest(&format!("/{STAGE}"), routes)
        .with_state(Arc::clone(&api))
        .layer(middleware::from_fn_with_state(api, record_and_authorize))
}

/// Record the request, then enforce the bearer-token rules.
async fn record_and_authorize(State(api): State<Shared>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();

    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
        })
        .collect::<HashMap<_, _>>();
    let authorization = headers.get("authorization").cloned();

    api.inner.write().unwrap().requests.push(RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    });

    let token = match authorization.as_deref().and_then(|v| v.strip_prefix("Bearer ")) {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => return MockError::Unauthorized.into_response(),
    };
    if token == "Anonymous" && parts.method != axum::http::Method::GET {
        return MockError::Forbidden("guests are read-only").into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn new_id() -> String {
    Uuid::now_v7().to_string()
}

// ---------------------------------------------------------------------------
// Repository handlers
// ---------------------------------------------------------------------------

async fn list_repositories(State(api): State<Shared>) -> Json<Vec<Repository>> {
    Json(api.inner.read().unwrap().repositories.values().cloned().collect())
}

async fn create_repository(
    State(api): State<Shared>,
    Json(data): Json<NewRepository>,
) -> impl IntoResponse {
    let repo = Repository {
        uuid: new_id(),
        name: data.name,
        raw_storage: data.raw_storage.or_else(|| Some("Destroy".into())),
        access: data.access.or_else(|| Some("Private".into())),
        extra: Extra::new(),
    };
    api.seed_repository(repo.clone());
    (StatusCode::CREATED, Json(repo))
}

async fn get_repository(
    State(api): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Repository>, MockError> {
    api.repository(&id).map(Json).ok_or(MockError::NotFound)
}

async fn update_repository(
    State(api): State<Shared>,
    Path(id): Path<String>,
    Json(update): Json<RepositoryUpdate>,
) -> Result<Json<Repository>, MockError> {
    let mut inner = api.inner.write().unwrap();
    let repo = inner.repositories.get_mut(&id).ok_or(MockError::NotFound)?;
    repo.name = update.name;
    repo.raw_storage = update.raw_storage;
    repo.access = update.access;
    Ok(Json(repo.clone()))
}

async fn delete_repository(
    State(api): State<Shared>,
    Path(id): Path<String>,
) -> Result<StatusCode, MockError> {
    let mut inner = api.inner.write().unwrap();
    inner.repositories.remove(&id).ok_or(MockError::NotFound)?;
    inner.grants.retain(|g| g.resource != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn repository_imports(
    State(api): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Import>>, MockError> {
    let inner = api.inner.read().unwrap();
    if !inner.repositories.contains_key(&id) {
        return Err(MockError::NotFound);
    }
    Ok(Json(
        inner
            .imports
            .values()
            .filter(|i| i.repository.as_deref() == Some(id.as_str()))
            .cloned()
            .collect(),
    ))
}

async fn repository_images(
    State(api): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Image>>, MockError> {
    let inner = api.inner.read().unwrap();
    if !inner.repositories.contains_key(&id) {
        return Err(MockError::NotFound);
    }
    Ok(Json(
        inner
            .images
            .values()
            .filter(|img| img.extra.get("repository").and_then(Value::as_str) == Some(id.as_str()))
            .cloned()
            .collect(),
    ))
}

async fn repository_grants(
    State(api): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Grant>>, MockError> {
    let inner = api.inner.read().unwrap();
    if !inner.repositories.contains_key(&id) {
        return Err(MockError::NotFound);
    }
    Ok(Json(
        inner
            .grants
            .iter()
            .filter(|g| g.resource == id)
            .cloned()
            .collect(),
    ))
}

// ---------------------------------------------------------------------------
// Import handlers
// ---------------------------------------------------------------------------

async fn create_import(
    State(api): State<Shared>,
    Json(data): Json<NewImport>,
) -> Result<impl IntoResponse, MockError> {
    if api.repository(&data.repository).is_none() {
        return Err(MockError::NotFound);
    }
    let import = Import {
        uuid: new_id(),
        name: data.name,
        repository: Some(data.repository),
        complete: false,
        extra: Extra::new(),
    };
    api.seed_import(import.clone());
    Ok((StatusCode::CREATED, Json(import)))
}

async fn update_import(
    State(api): State<Shared>,
    Path(id): Path<String>,
    Json(update): Json<ImportUpdate>,
) -> Result<Json<Import>, MockError> {
    let mut inner = api.inner.write().unwrap();
    let import = inner.imports.get_mut(&id).ok_or(MockError::NotFound)?;
    if let Some(name) = update.name {
        import.name = name;
    }
    if let Some(complete) = update.complete {
        import.complete = complete;
    }
    Ok(Json(import.clone()))
}

async fn incomplete_imports(State(api): State<Shared>) -> Json<Vec<Import>> {
    Json(
        api.inner
            .read()
            .unwrap()
            .imports
            .values()
            .filter(|i| !i.complete)
            .cloned()
            .collect(),
    )
}

async fn import_credentials(
    State(api): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<ImportCredentials>, MockError> {
    if !api.inner.read().unwrap().imports.contains_key(&id) {
        return Err(MockError::NotFound);
    }
    Ok(Json(ImportCredentials {
        access_key_id: "AKIAMOCK".into(),
        secret_access_key: "mock-secret".into(),
        session_token: format!("session-{id}"),
        bucket: Some("minerva-raw".into()),
        prefix: Some(id),
        extra: Extra::new(),
    }))
}

async fn import_filesets(
    State(api): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Fileset>>, MockError> {
    let inner = api.inner.read().unwrap();
    if !inner.imports.contains_key(&id) {
        return Err(MockError::NotFound);
    }
    Ok(Json(inner.filesets.get(&id).cloned().unwrap_or_default()))
}

async fn fileset_images(State(api): State<Shared>, Path(id): Path<String>) -> Json<Vec<Image>> {
    Json(
        api.inner
            .read()
            .unwrap()
            .images
            .values()
            .filter(|img| img.fileset.as_deref() == Some(id.as_str()))
            .cloned()
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Image handlers
// ---------------------------------------------------------------------------

async fn get_image(State(api): State<Shared>, Path(id): Path<String>) -> Result<Json<Image>, MockError> {
    api.inner
        .read()
        .unwrap()
        .images
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(MockError::NotFound)
}

async fn delete_image(State(api): State<Shared>, Path(id): Path<String>) -> Result<StatusCode, MockError> {
    let mut inner = api.inner.write().unwrap();
    inner.images.remove(&id).ok_or(MockError::NotFound)?;
    inner.dimensions.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

async fn image_dimensions(
    State(api): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<ImageDimensions>, MockError> {
    api.inner
        .read()
        .unwrap()
        .dimensions
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(MockError::NotFound)
}

type TilePath = (String, u32, u32, u32, u32, u32, String);

fn tile_response(api: &MockApi, id: &str) -> Result<Response, MockError> {
    if !api.inner.read().unwrap().images.contains_key(id) {
        return Err(MockError::NotFound);
    }
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], TILE_JPEG).into_response())
}

async fn render_tile(
    State(api): State<Shared>,
    Path((id, _x, _y, _z, _t, _level, _channels)): Path<TilePath>,
) -> Result<Response, MockError> {
    tile_response(&api, &id)
}

async fn prerendered_tile(
    State(api): State<Shared>,
    Path((id, _x, _y, _z, _t, _level, settings)): Path<TilePath>,
) -> Result<Response, MockError> {
    let known = api
        .inner
        .read()
        .unwrap()
        .rendering_settings
        .get(&id)
        .is_some_and(|all| all.iter().any(|s| s["uuid"] == settings.as_str()));
    if !known {
        return Err(MockError::NotFound);
    }
    tile_response(&api, &id)
}

async fn create_rendering_settings(
    State(api): State<Shared>,
    Path(id): Path<String>,
    Json(settings): Json<Value>,
) -> Result<Json<Value>, MockError> {
    let mut inner = api.inner.write().unwrap();
    if !inner.images.contains_key(&id) {
        return Err(MockError::NotFound);
    }
    let mut stored = match settings {
        Value::Object(map) => map,
        other => {
            let mut map = Extra::new();
            map.insert("settings".into(), other);
            map
        }
    };
    stored.insert("uuid".into(), Value::String(new_id()));
    let stored = Value::Object(stored);
    inner
        .rendering_settings
        .entry(id)
        .or_default()
        .push(stored.clone());
    Ok(Json(stored))
}

// ---------------------------------------------------------------------------
// Grant handlers
// ---------------------------------------------------------------------------

async fn create_grant(
    State(api): State<Shared>,
    Json(req): Json<GrantRequest>,
) -> Result<StatusCode, MockError> {
    let mut inner = api.inner.write().unwrap();
    if !inner.repositories.contains_key(&req.uuid) {
        return Err(MockError::NotFound);
    }
    match inner
        .grants
        .iter_mut()
        .find(|g| g.resource == req.uuid && g.subject == req.grantee)
    {
        Some(existing) => {
            for p in req.permissions {
                if !existing.permissions.contains(&p) {
                    existing.permissions.push(p);
                }
            }
        }
        None => inner.grants.push(Grant {
            subject: req.grantee,
            resource: req.uuid,
            permissions: req.permissions,
            extra: Extra::new(),
        }),
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_grant(
    State(api): State<Shared>,
    Path((resource, subject)): Path<(String, String)>,
) -> Result<StatusCode, MockError> {
    let mut inner = api.inner.write().unwrap();
    let before = inner.grants.len();
    inner
        .grants
        .retain(|g| !(g.resource == resource && g.subject == subject));
    if inner.grants.len() == before {
        return Err(MockError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Directory handlers
// ---------------------------------------------------------------------------

async fn find_user(State(api): State<Shared>, Path(q): Path<String>) -> Json<Vec<User>> {
    let q = q.to_lowercase();
    Json(
        api.inner
            .read()
            .unwrap()
            .users
            .iter()
            .filter(|u| {
                u.name.to_lowercase().contains(&q)
                    || u.email.as_deref().is_some_and(|e| e.to_lowercase().contains(&q))
            })
            .cloned()
            .collect(),
    )
}

async fn find_group(State(api): State<Shared>, Path(q): Path<String>) -> Json<Vec<Group>> {
    let q = q.to_lowercase();
    Json(
        api.inner
            .read()
            .unwrap()
            .groups
            .iter()
            .filter(|g| g.name.to_lowercase().contains(&q))
            .cloned()
            .collect(),
    )
}

async fn cognito_details(State(api): State<Shared>) -> Json<CognitoDetails> {
    Json(api.cognito.clone())
}
