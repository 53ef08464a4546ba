use rookery_types::{AuthData, Color, LobbyError, Result, RulesState, Table, TableId, User};
use rusqlite::{Connection, ErrorCode, ffi};
use tracing::info;

use crate::backend::{TableBackend, TokenBackend, UserBackend};
use crate::models::GameRow;
use crate::{Database, StorageResultExt, storage_error};

impl UserBackend for Database {
    fn insert_user(&self, user: &User) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, password, email) VALUES (?1, ?2, ?3)",
                (&user.username, &user.password, &user.email),
            )
            .map_err(|e| match constraint_code(&e) {
                Some(ffi::SQLITE_CONSTRAINT_PRIMARYKEY) => {
                    LobbyError::AlreadyExists(user.username.clone())
                }
                _ => storage_error(e),
            })?;
            Ok(())
        })
    }

    fn get_user(&self, username: &str) -> Result<Option<User>> {
        self.with_conn(|conn| query_user(conn, username))
    }

    fn delete_user(&self, username: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn
                .execute("DELETE FROM users WHERE username = ?1", [username])
                .or_unavailable()?;
            Ok(removed > 0)
        })
    }

    fn clear_users(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM users", []).or_unavailable()?;
            Ok(())
        })
    }
}

impl TokenBackend for Database {
    fn insert_token(&self, auth: &AuthData) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO auth_tokens (token, username) VALUES (?1, ?2)",
                (&auth.token, &auth.username),
            )
            .map_err(|e| match constraint_code(&e) {
                Some(ffi::SQLITE_CONSTRAINT_PRIMARYKEY) => {
                    LobbyError::AlreadyExists("auth token".into())
                }
                Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
                    LobbyError::invalid(format!("no such user '{}'", auth.username))
                }
                _ => storage_error(e),
            })?;
            Ok(())
        })
    }

    fn get_token(&self, token: &str) -> Result<Option<AuthData>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT token, username FROM auth_tokens WHERE token = ?1",
                [token],
                |row| {
                    Ok(AuthData {
                        token: row.get(0)?,
                        username: row.get(1)?,
                    })
                },
            )
            .optional()
        })
    }

    fn delete_token(&self, token: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn
                .execute("DELETE FROM auth_tokens WHERE token = ?1", [token])
                .or_unavailable()?;
            Ok(removed > 0)
        })
    }

    fn clear_tokens(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM auth_tokens", []).or_unavailable()?;
            Ok(())
        })
    }
}

impl TableBackend for Database {
    fn insert_table(&self, name: &str, rules: &RulesState) -> Result<Table> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO games (name, rules) VALUES (?1, ?2)",
                (name, rules.as_str()),
            )
            .or_unavailable()?;
            let id = conn.last_insert_rowid();
            Ok(Table::new(id, name, rules.clone()))
        })
    }

    fn get_table(&self, id: TableId) -> Result<Option<Table>> {
        self.with_conn(|conn| query_game(conn, id))
    }

    fn list_tables(&self) -> Result<Vec<Table>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM games ORDER BY id", GameRow::COLUMNS);
            let mut stmt = conn.prepare(&sql).or_unavailable()?;
            let rows = stmt
                .query_map([], GameRow::from_row)
                .or_unavailable()?
                .collect::<std::result::Result<Vec<_>, _>>()
                .or_unavailable()?;
            Ok(rows.into_iter().map(Table::from).collect())
        })
    }

    fn update_table(&self, table: &Table) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn
                .execute(
                    "UPDATE games SET white_username = ?1, black_username = ?2, name = ?3, rules = ?4
                     WHERE id = ?5",
                    rusqlite::params![
                        table.white,
                        table.black,
                        table.name,
                        table.rules.as_str(),
                        table.id
                    ],
                )
                .or_unavailable()?;
            Ok(changed > 0)
        })
    }

    fn claim_seat(&self, id: TableId, color: Color, username: &str) -> Result<Table> {
        let column = seat_column(color);
        self.with_conn(|conn| {
            // Single conditional statement: the seat is only written while NULL.
            let sql = format!("UPDATE games SET {column} = ?1 WHERE id = ?2 AND {column} IS NULL");
            let changed = conn
                .execute(&sql, rusqlite::params![username, id])
                .or_unavailable()?;

            let table = query_game(conn, id)?.ok_or(LobbyError::NotFound(id))?;
            if changed == 0 {
                return Err(LobbyError::AlreadyTaken(color));
            }

            info!(game_id = id, %color, %username, "Seat claimed");
            Ok(table)
        })
    }

    fn clear_tables(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(
                "DELETE FROM games;
                 DELETE FROM sqlite_sequence WHERE name = 'games';",
            )
            .or_unavailable()
        })
    }
}

fn seat_column(color: Color) -> &'static str {
    match color {
        Color::White => "white_username",
        Color::Black => "black_username",
    }
}

fn constraint_code(e: &rusqlite::Error) -> Option<i32> {
    match e {
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
            Some(err.extended_code)
        }
        _ => None,
    }
}

fn query_user(conn: &Connection, username: &str) -> Result<Option<User>> {
    let mut stmt = conn
        .prepare("SELECT username, password, email FROM users WHERE username = ?1")
        .or_unavailable()?;

    stmt.query_row([username], |row| {
        Ok(User {
            username: row.get(0)?,
            password: row.get(1)?,
            email: row.get(2)?,
        })
    })
    .optional()
}

fn query_game(conn: &Connection, id: TableId) -> Result<Option<Table>> {
    let sql = format!("SELECT {} FROM games WHERE id = ?1", GameRow::COLUMNS);
    let mut stmt = conn.prepare(&sql).or_unavailable()?;

    let row = stmt.query_row([id], GameRow::from_row).optional()?;
    Ok(row.map(Table::from))
}
