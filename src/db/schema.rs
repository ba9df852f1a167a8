//! SQL DDL for initializing the drink storage.
//! Executed on every boot; idempotent, never drops existing data.

/// SQLite schema:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT — AUTOINCREMENT keeps deleted
///   ids from ever being reassigned
/// - `title` UNIQUE
/// - `recipe` JSON array, serialized as text
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS drinks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL UNIQUE,
    recipe TEXT NOT NULL
);
"#;
