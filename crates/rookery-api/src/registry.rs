use std::sync::Arc;

use rookery_db::TableBackend;
use rookery_types::{Color, LobbyError, Result, RulesEngine, Table, TableId, require};
use tracing::info;

/// Lobby tables and the rules engine that seeds them.
pub struct GameRegistry {
    backend: Arc<dyn TableBackend>,
    engine: Arc<dyn RulesEngine>,
}

impl GameRegistry {
    pub fn new(backend: Arc<dyn TableBackend>, engine: Arc<dyn RulesEngine>) -> Self {
        Self { backend, engine }
    }

    pub fn create(&self, name: &str) -> Result<Table> {
        require(name, "game name")?;

        let table = self.backend.insert_table(name, &self.engine.new_game())?;
        info!(game_id = table.id, name, "Table created");
        Ok(table)
    }

    pub fn get(&self, id: TableId) -> Result<Table> {
        self.backend.get_table(id)?.ok_or(LobbyError::NotFound(id))
    }

    pub fn list(&self) -> Result<Vec<Table>> {
        self.backend.list_tables()
    }

    /// Replaces the whole record. Seat changes should go through
    /// [`claim_seat`](Self::claim_seat) instead, which cannot lose a
    /// concurrent assignment.
    pub fn update(&self, table: &Table) -> Result<()> {
        if self.backend.update_table(table)? {
            Ok(())
        } else {
            Err(LobbyError::NotFound(table.id))
        }
    }

    /// Atomically seats `username`; fails `AlreadyTaken` if someone got there first.
    pub fn claim_seat(&self, id: TableId, color: Color, username: &str) -> Result<Table> {
        self.backend.claim_seat(id, color, username)
    }

    pub fn clear(&self) -> Result<()> {
        self.backend.clear_tables()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rookery_db::MemoryStore;
    use rookery_types::{RulesState, StandardChess};

    struct FixedRules;

    impl RulesEngine for FixedRules {
        fn new_game(&self) -> RulesState {
            RulesState::from_serialized("fixed")
        }
    }

    fn registry() -> GameRegistry {
        GameRegistry::new(Arc::new(MemoryStore::new()), Arc::new(StandardChess))
    }

    #[test]
    fn create_assigns_sequential_ids_and_open_seats() {
        let registry = registry();
        let first = registry.create("Match1").unwrap();
        let second = registry.create("Match2").unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.white, None);
        assert_eq!(first.black, None);
        assert_eq!(first.rules, StandardChess.new_game());
    }

    #[test]
    fn create_rejects_blank_name() {
        assert!(matches!(
            registry().create("  "),
            Err(LobbyError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rules_state_comes_from_engine_unchanged() {
        let registry = GameRegistry::new(Arc::new(MemoryStore::new()), Arc::new(FixedRules));
        let table = registry.create("Match1").unwrap();

        assert_eq!(registry.get(table.id).unwrap().rules.as_str(), "fixed");
    }

    #[test]
    fn get_and_update_unknown_id_are_not_found() {
        let registry = registry();
        assert_eq!(registry.get(9), Err(LobbyError::NotFound(9)));

        let ghost = Table::new(9, "ghost", RulesState::from_serialized("x"));
        assert_eq!(registry.update(&ghost), Err(LobbyError::NotFound(9)));
    }

    #[test]
    fn update_passes_rules_through() {
        let registry = registry();
        let mut table = registry.create("Match1").unwrap();
        table.rules = RulesState::from_serialized("after e4");

        registry.update(&table).unwrap();
        assert_eq!(registry.get(table.id).unwrap(), table);
    }

    #[test]
    fn list_is_in_id_order() {
        let registry = registry();
        registry.create("a").unwrap();
        registry.create("b").unwrap();
        registry.create("c").unwrap();

        let names: Vec<_> = registry.list().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn clear_restarts_numbering() {
        let registry = registry();
        registry.create("a").unwrap();
        registry.clear().unwrap();

        assert!(registry.list().unwrap().is_empty());
        assert_eq!(registry.create("b").unwrap().id, 1);
    }
}
