//! Core logistics logic for ShootLogix.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Roles, credential rules and password hashing
//! - `schedule` - Working-day counting with day overrides
//! - `resource` - Resource kinds (boats, vehicles, helpers, guards)
//! - `budget` - Assignment costing, FNB totals and the department rollup
//! - `rbac` - Route to tab mapping and role access checks

pub mod auth;
pub mod budget;
pub mod rbac;
pub mod resource;
pub mod schedule;
