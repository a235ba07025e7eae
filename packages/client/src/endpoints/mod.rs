//! Per-endpoint convenience methods.
//!
//! Each submodule holds two layers for one resource:
//!
//! - pure request constructors (`repository::get(uuid)` → [`ApiRequest`]),
//!   which fix the method, path template and body shape; and
//! - `impl MinervaClient` methods that dispatch them and decode typed results.
//!
//! Identifiers are substituted into paths as given.
//!
//! [`ApiRequest`]: crate::request::ApiRequest

pub mod directory;
pub mod grant;
pub mod image;
pub mod import;
pub mod repository;
