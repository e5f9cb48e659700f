//! Shared errors, configuration, and token handling for ShootLogix.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - JWT access token issuance and validation
//! - Authentication request and response payloads

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;


pub use auth::{Claims, TokenType};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
