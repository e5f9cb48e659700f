//! Request middleware and the extractors they feed.

pub mod access;
pub mod auth;

pub use access::{CurrentRole, access_middleware};
pub use auth::{AuthUser, ClientIp, auth_middleware};
