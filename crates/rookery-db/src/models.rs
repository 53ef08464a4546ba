//! Database row types. These map directly to SQLite rows.
//! Distinct from rookery-types models to keep the DB layer's column layout
//! out of the domain types.

use rookery_types::{RulesState, Table, TableId};

pub struct GameRow {
    pub id: TableId,
    pub white_username: Option<String>,
    pub black_username: Option<String>,
    pub name: String,
    pub rules: String,
}

impl GameRow {
    pub const COLUMNS: &'static str = "id, white_username, black_username, name, rules";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            white_username: row.get(1)?,
            black_username: row.get(2)?,
            name: row.get(3)?,
            rules: row.get(4)?,
        })
    }
}

impl From<GameRow> for Table {
    fn from(row: GameRow) -> Self {
        Table {
            id: row.id,
            name: row.name,
            white: row.white_username,
            black: row.black_username,
            rules: RulesState::from_serialized(row.rules),
        }
    }
}
