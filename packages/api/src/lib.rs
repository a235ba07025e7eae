//! Request and response types for the Minerva image-repository API.
//!
//! This crate encodes the JSON bodies exchanged with the Minerva REST API as
//! Rust types. It has no I/O; the `minerva-client` crate sends and receives
//! these types, and the conformance crate serves them from its mock API.
//!
//! Every response type carries an `extra` map so that fields this crate
//! does not model survive a decode/encode cycle unchanged.
//!
//! # Endpoints covered
//!
//! | Method | Path | Type |
//! |--------|------|------|
//! | GET | `/repository` | → `Vec<`[`Repository`]`>` |
//! | POST | `/repository` | [`NewRepository`] → [`Repository`] |
//! | GET | `/repository/{id}` | → [`Repository`] |
//! | PUT | `/repository/{id}` | [`RepositoryUpdate`] → [`Repository`] |
//! | GET | `/repository/{id}/imports` | → `Vec<`[`Import`]`>` |
//! | GET | `/repository/{id}/images` | → `Vec<`[`Image`]`>` |
//! | GET | `/repository/{id}/grants` | → `Vec<`[`Grant`]`>` |
//! | POST | `/import` | [`NewImport`] → [`Import`] |
//! | PUT | `/import/{id}` | [`ImportUpdate`] → [`Import`] |
//! | GET | `/import/{id}/credentials` | → [`ImportCredentials`] |
//! | GET | `/import/{id}/filesets` | → `Vec<`[`Fileset`]`>` |
//! | GET | `/import/incomplete` | → `Vec<`[`Import`]`>` |
//! | GET | `/fileset/{id}/images` | → `Vec<`[`Image`]`>` |
//! | GET | `/image/{id}` | → [`Image`] |
//! | GET | `/image/{id}/dimensions` | → [`ImageDimensions`] |
//! | GET | `/image/{id}/render-tile/…` | [`TileCoord`] + [`ChannelParams`] → JPEG bytes |
//! | GET | `/image/{id}/prerendered-tile/…` | [`TileCoord`] → JPEG bytes |
//! | POST | `/image/{id}/rendering_settings` | JSON → [`RenderingSettings`] |
//! | POST | `/grant` | [`GrantRequest`] → `204` |
//! | DELETE | `/grant/resource/{id}/subject/{id}` | → `204` |
//! | GET | `/user/find/{q}` | → `Vec<`[`User`]`>` |
//! | GET | `/group/find/{q}` | → `Vec<`[`Group`]`>` |
//! | GET | `/cognito_details` | → [`CognitoDetails`] |

pub mod cognito;
pub mod directory;
pub mod grant;
pub mod image;
pub mod import;
pub mod repository;

pub use cognito::CognitoDetails;
pub use directory::{Group, User};
pub use grant::{Grant, GrantRequest, GrantType, GrantTypeError};
pub use image::{ChannelParams, Image, ImageDimensions, RenderingSettings, TileCoord};
pub use import::{Fileset, Import, ImportCredentials, ImportUpdate, NewImport};
pub use repository::{NewRepository, Repository, RepositoryUpdate};

/// Fields the server sent that no typed model names.
pub type Extra = serde_json::Map<String, serde_json::Value>;
