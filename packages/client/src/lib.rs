//! Async client for the Minerva image-repository API.
//!
//! The crate wraps the REST API behind one method per endpoint. All of them
//! go through a single dispatcher that attaches the caller's bearer token,
//! sends the request, and turns the response into a typed value or a
//! [`ClientError`].
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | [`ClientConfig`]: base URL, stage, identity-provider ids |
//! | [`session`] | [`SessionHolder`]: no identity, a signed-in user, or guest |
//! | [`credential`] | [`CredentialSource`] and the `Authorization` resolver |
//! | [`request`] | [`ApiRequest`] descriptors and URL/header/body preparation |
//! | [`response`] | [`ApiResponse`] and status/body normalization |
//! | [`client`] | [`MinervaClient`]: the dispatcher |
//! | [`endpoints`] | Per-resource request constructors and typed methods |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use minerva_client::{ClientConfig, MinervaClient, StaticCredential};
//!
//! let config = ClientConfig::from_env()?;
//! let client = MinervaClient::new(&config)?;
//! client.set_identity(Arc::new(StaticCredential::new(id_token)));
//!
//! for repo in client.get_repositories().await? {
//!     println!("{} {}", repo.uuid, repo.name);
//! }
//! ```

pub mod client;
pub mod config;
pub mod credential;
pub mod endpoints;
pub mod error;
pub mod request;
pub mod response;
pub mod session;

pub use client::MinervaClient;
pub use config::{ClientConfig, ConfigError};
pub use credential::{CredentialError, CredentialSource, FnCredential, StaticCredential};
pub use error::ClientError;
pub use request::{ApiRequest, Method, PreparedRequest};
pub use response::ApiResponse;
pub use session::{Identity, SessionHolder, GUEST_TOKEN};

pub use minerva_api as api;
