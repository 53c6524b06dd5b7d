use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// Name of the SQL function used for case-insensitive matching.
pub const FOLD_CASE_FN: &str = "fold_case";

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    register_fold_case(&conn)?;
    Ok(conn)
}

/// SQLite's own `lower()` only folds ASCII, so lower-casing is done in Rust.
fn register_fold_case(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        FOLD_CASE_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|value| value.to_lowercase()))
        },
    )
    .context("failed to register fold_case function")
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS place (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            place_type   TEXT NOT NULL DEFAULT 'COMMON',
            place_name   TEXT NOT NULL,
            address      TEXT NOT NULL,
            phone_number TEXT NOT NULL,
            capacity     INTEGER NOT NULL DEFAULT 0,
            memo         TEXT,
            created_at   TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            modified_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS event (
            id                       INTEGER PRIMARY KEY AUTOINCREMENT,
            place_id                 INTEGER NOT NULL,
            event_name               TEXT NOT NULL,
            event_status             TEXT NOT NULL DEFAULT 'OPENED',
            event_start_datetime     TEXT NOT NULL,
            event_end_datetime       TEXT NOT NULL,
            current_number_of_people INTEGER NOT NULL DEFAULT 0,
            capacity                 INTEGER NOT NULL,
            memo                     TEXT,
            created_at               TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            modified_at              TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (place_id) REFERENCES place(id)
        );

        CREATE INDEX IF NOT EXISTS idx_place_name ON place(place_name);
        CREATE INDEX IF NOT EXISTS idx_place_address ON place(address);
        CREATE INDEX IF NOT EXISTS idx_place_phone_number ON place(phone_number);
        CREATE INDEX IF NOT EXISTS idx_place_created_at ON place(created_at);
        CREATE INDEX IF NOT EXISTS idx_place_modified_at ON place(modified_at);

        CREATE INDEX IF NOT EXISTS idx_event_place_id ON event(place_id);
        CREATE INDEX IF NOT EXISTS idx_event_name ON event(event_name);
        CREATE INDEX IF NOT EXISTS idx_event_start ON event(event_start_datetime);
        CREATE INDEX IF NOT EXISTS idx_event_end ON event(event_end_datetime);
        CREATE INDEX IF NOT EXISTS idx_event_created_at ON event(created_at);
        CREATE INDEX IF NOT EXISTS idx_event_modified_at ON event(modified_at);

        CREATE TRIGGER IF NOT EXISTS trg_place_modified_at
            AFTER UPDATE ON place
        BEGIN
            UPDATE place SET modified_at = CURRENT_TIMESTAMP WHERE id = NEW.id;
        END;

        CREATE TRIGGER IF NOT EXISTS trg_event_modified_at
            AFTER UPDATE ON event
        BEGIN
            UPDATE event SET modified_at = CURRENT_TIMESTAMP WHERE id = NEW.id;
        END;
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}
