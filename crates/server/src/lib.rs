//! Administration of the protected APIs registered with an OAuth2 / OpenID
//! Connect identity provider.
//!
//! This library manages API resources together with the scopes, secrets and
//! properties they own, and exposes them over an HTTP admin API.

pub mod api;
pub mod client;
pub mod config;
pub mod dto;
pub mod entity;
pub mod error;
pub mod localization;
pub mod mapper;
pub mod repository;
pub mod schema;
pub mod service;
