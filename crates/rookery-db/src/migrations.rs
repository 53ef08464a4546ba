use rusqlite::Connection;
use tracing::info;

pub const LATEST_VERSION: i64 = 1;

pub fn run(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);",
    )?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (users, games, auth_tokens)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE users (
                username    TEXT PRIMARY KEY,
                password    TEXT NOT NULL,
                email       TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            -- AUTOINCREMENT keeps ids from being reused while rows exist;
            -- clearing sqlite_sequence restarts numbering on reset.
            CREATE TABLE games (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                white_username  TEXT,
                black_username  TEXT,
                name            TEXT NOT NULL,
                rules           TEXT NOT NULL,
                created_at      TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE auth_tokens (
                token       TEXT PRIMARY KEY,
                username    TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_auth_tokens_username ON auth_tokens(username);

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
