//! Initial database migration.
//!
//! Creates every ShootLogix table on SQLite. Dates are stored as ISO
//! `YYYY-MM-DD` text and money as REAL.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ACCOUNTS & PROJECTS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(PRODUCTIONS_SQL).await?;
        db.execute_unprepared(PROJECT_MEMBERSHIPS_SQL).await?;
        db.execute_unprepared(REFRESH_TOKENS_SQL).await?;
        db.execute_unprepared(DEPARTMENTS_SQL).await?;

        // ============================================================
        // PART 2: SCHEDULE
        // ============================================================
        db.execute_unprepared(SHOOTING_DAYS_SQL).await?;

        // ============================================================
        // PART 3: FUNCTIONS, RESOURCES & ASSIGNMENTS
        // ============================================================
        db.execute_unprepared(FUNCTIONS_SQL).await?;
        db.execute_unprepared(RESOURCES_SQL).await?;
        db.execute_unprepared(ASSIGNMENTS_SQL).await?;
        db.execute_unprepared(HISTORY_SQL).await?;

        // ============================================================
        // PART 4: LOCATIONS & GUARDS
        // ============================================================
        db.execute_unprepared(LOCATIONS_SQL).await?;
        db.execute_unprepared(LOCATION_SCHEDULES_SQL).await?;
        db.execute_unprepared(GUARD_POSTS_SQL).await?;
        db.execute_unprepared(GUARD_LOCATION_SCHEDULES_SQL).await?;

        // ============================================================
        // PART 5: FNB & BUDGET
        // ============================================================
        db.execute_unprepared(FNB_SQL).await?;
        db.execute_unprepared(BUDGET_LINES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const USERS_SQL: &str = r"
CREATE TABLE users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    nickname      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    is_admin      INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL DEFAULT (datetime('now'))
);
";

const PRODUCTIONS_SQL: &str = r"
CREATE TABLE productions (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL UNIQUE,
    start_date TEXT,
    end_date   TEXT,
    site       TEXT,
    status     TEXT NOT NULL DEFAULT 'draft',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
";

const PROJECT_MEMBERSHIPS_SQL: &str = r"
CREATE TABLE project_memberships (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id       INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    production_id INTEGER NOT NULL REFERENCES productions(id) ON DELETE CASCADE,
    role          TEXT NOT NULL DEFAULT 'READER',
    created_at    TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE (user_id, production_id)
);

CREATE INDEX idx_project_memberships_user ON project_memberships(user_id);
CREATE INDEX idx_project_memberships_production ON project_memberships(production_id);
";

const REFRESH_TOKENS_SQL: &str = r"
CREATE TABLE refresh_tokens (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    token_hash TEXT NOT NULL UNIQUE,
    expires_at TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_refresh_tokens_user ON refresh_tokens(user_id);
";

const DEPARTMENTS_SQL: &str = r"
CREATE TABLE departments (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    production_id INTEGER NOT NULL REFERENCES productions(id) ON DELETE CASCADE,
    name          TEXT NOT NULL,
    status_global TEXT NOT NULL DEFAULT 'to_complete',
    UNIQUE (production_id, name)
);
";

const SHOOTING_DAYS_SQL: &str = r"
CREATE TABLE shooting_days (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    production_id INTEGER NOT NULL REFERENCES productions(id) ON DELETE CASCADE,
    date          TEXT NOT NULL,
    day_number    INTEGER,
    location      TEXT,
    game_name     TEXT,
    notes         TEXT,
    status        TEXT NOT NULL DEFAULT 'draft'
);

CREATE INDEX idx_shooting_days_production ON shooting_days(production_id, date);
";

const FUNCTIONS_SQL: &str = r"
CREATE TABLE functions (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    production_id  INTEGER NOT NULL REFERENCES productions(id) ON DELETE CASCADE,
    name           TEXT NOT NULL,
    function_group TEXT NOT NULL DEFAULT 'Special',
    color          TEXT NOT NULL DEFAULT '#EF4444',
    sort_order     INTEGER NOT NULL DEFAULT 0,
    default_start  TEXT,
    default_end    TEXT,
    specs          TEXT,
    context        TEXT NOT NULL DEFAULT 'boats'
);

CREATE INDEX idx_functions_production ON functions(production_id, context);
";

const RESOURCES_SQL: &str = r"
CREATE TABLE resources (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    production_id       INTEGER NOT NULL REFERENCES productions(id) ON DELETE CASCADE,
    kind                TEXT NOT NULL,
    name                TEXT NOT NULL,
    category            TEXT,
    capacity            TEXT,
    vendor              TEXT,
    contact             TEXT,
    group_name          TEXT,
    notes               TEXT,
    daily_rate_estimate REAL NOT NULL DEFAULT 0,
    daily_rate_actual   REAL,
    created_at          TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_resources_production_kind ON resources(production_id, kind);
";

const ASSIGNMENTS_SQL: &str = r"
CREATE TABLE assignments (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    production_id     INTEGER NOT NULL REFERENCES productions(id) ON DELETE CASCADE,
    kind              TEXT NOT NULL,
    function_id       INTEGER NOT NULL REFERENCES functions(id) ON DELETE CASCADE,
    resource_id       INTEGER REFERENCES resources(id) ON DELETE CASCADE,
    name_override     TEXT,
    start_date        TEXT,
    end_date          TEXT,
    price_override    REAL,
    notes             TEXT,
    assignment_status TEXT NOT NULL DEFAULT 'confirmed',
    day_overrides     TEXT NOT NULL DEFAULT '{}',
    created_at        TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at        TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_assignments_production_kind ON assignments(production_id, kind);
CREATE INDEX idx_assignments_function ON assignments(function_id);
";

const HISTORY_SQL: &str = r"
CREATE TABLE history (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    production_id INTEGER NOT NULL REFERENCES productions(id) ON DELETE CASCADE,
    table_name    TEXT NOT NULL,
    record_id     INTEGER,
    action        TEXT NOT NULL,
    old_data      TEXT,
    new_data      TEXT,
    user_id       INTEGER REFERENCES users(id) ON DELETE SET NULL,
    created_at    TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_history_production ON history(production_id, id);
";

const LOCATIONS_SQL: &str = r"
CREATE TABLE locations (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    production_id INTEGER NOT NULL REFERENCES productions(id) ON DELETE CASCADE,
    name          TEXT NOT NULL,
    location_type TEXT NOT NULL DEFAULT 'game',
    access_note   TEXT,
    price_p       REAL,
    price_f       REAL,
    price_w       REAL,
    global_deal   REAL
);
";

const LOCATION_SCHEDULES_SQL: &str = r"
CREATE TABLE location_schedules (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    production_id INTEGER NOT NULL REFERENCES productions(id) ON DELETE CASCADE,
    location_name TEXT NOT NULL,
    location_type TEXT NOT NULL DEFAULT 'game',
    date          TEXT NOT NULL,
    status        TEXT NOT NULL,
    locked        INTEGER NOT NULL DEFAULT 0,
    notes         TEXT,
    UNIQUE (production_id, location_name, date)
);
";

const GUARD_POSTS_SQL: &str = r"
CREATE TABLE guard_posts (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    production_id INTEGER NOT NULL REFERENCES productions(id) ON DELETE CASCADE,
    name          TEXT NOT NULL,
    daily_rate    REAL NOT NULL DEFAULT 45,
    notes         TEXT
);
";

const GUARD_LOCATION_SCHEDULES_SQL: &str = r"
CREATE TABLE guard_location_schedules (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    production_id INTEGER NOT NULL REFERENCES productions(id) ON DELETE CASCADE,
    location_name TEXT NOT NULL,
    date          TEXT NOT NULL,
    status        TEXT NOT NULL,
    nb_guards     INTEGER NOT NULL DEFAULT 1,
    locked        INTEGER NOT NULL DEFAULT 0,
    UNIQUE (production_id, location_name, date)
);
";

const FNB_SQL: &str = r"
CREATE TABLE fnb_categories (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    production_id INTEGER NOT NULL REFERENCES productions(id) ON DELETE CASCADE,
    name          TEXT NOT NULL,
    color         TEXT NOT NULL DEFAULT '#F97316',
    sort_order    INTEGER NOT NULL DEFAULT 0,
    UNIQUE (production_id, name)
);

CREATE TABLE fnb_items (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    category_id   INTEGER NOT NULL REFERENCES fnb_categories(id) ON DELETE CASCADE,
    production_id INTEGER NOT NULL REFERENCES productions(id) ON DELETE CASCADE,
    name          TEXT NOT NULL,
    unit          TEXT NOT NULL DEFAULT 'unit',
    unit_price    REAL NOT NULL DEFAULT 0,
    notes         TEXT,
    sort_order    INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE fnb_entries (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    item_id       INTEGER NOT NULL REFERENCES fnb_items(id) ON DELETE CASCADE,
    production_id INTEGER NOT NULL REFERENCES productions(id) ON DELETE CASCADE,
    entry_type    TEXT NOT NULL CHECK (entry_type IN ('purchase', 'consumption')),
    date          TEXT NOT NULL,
    quantity      REAL NOT NULL DEFAULT 0,
    notes         TEXT,
    UNIQUE (item_id, entry_type, date)
);
";

const BUDGET_LINES_SQL: &str = r"
CREATE TABLE budget_lines (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    production_id       INTEGER NOT NULL REFERENCES productions(id) ON DELETE CASCADE,
    department_id       INTEGER REFERENCES departments(id) ON DELETE SET NULL,
    name                TEXT NOT NULL,
    unit                TEXT NOT NULL DEFAULT 'day',
    qty_estimate        REAL NOT NULL DEFAULT 0,
    unit_price_estimate REAL NOT NULL DEFAULT 0,
    amount_estimate     REAL NOT NULL DEFAULT 0,
    qty_actual          REAL,
    unit_price_actual   REAL,
    amount_actual       REAL,
    source              TEXT NOT NULL DEFAULT 'manual',
    notes               TEXT
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS budget_lines;
DROP TABLE IF EXISTS fnb_entries;
DROP TABLE IF EXISTS fnb_items;
DROP TABLE IF EXISTS fnb_categories;
DROP TABLE IF EXISTS guard_location_schedules;
DROP TABLE IF EXISTS guard_posts;
DROP TABLE IF EXISTS location_schedules;
DROP TABLE IF EXISTS locations;
DROP TABLE IF EXISTS history;
DROP TABLE IF EXISTS assignments;
DROP TABLE IF EXISTS resources;
DROP TABLE IF EXISTS functions;
DROP TABLE IF EXISTS shooting_days;
DROP TABLE IF EXISTS departments;
DROP TABLE IF EXISTS refresh_tokens;
DROP TABLE IF EXISTS project_memberships;
DROP TABLE IF EXISTS productions;
DROP TABLE IF EXISTS users;
";
