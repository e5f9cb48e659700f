//! `SeaORM` entity definitions.

pub mod assignments;
pub mod budget_lines;
pub mod departments;
pub mod fnb_categories;
pub mod fnb_entries;
pub mod fnb_items;
pub mod functions;
pub mod guard_location_schedules;
pub mod guard_posts;
pub mod history;
pub mod location_schedules;
pub mod locations;
pub mod productions;
pub mod project_memberships;
pub mod refresh_tokens;
pub mod resources;
pub mod shooting_days;
pub mod users;
