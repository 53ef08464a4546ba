//! Lobby behavior, run once per storage backend.

use std::sync::Arc;
use std::thread;

use rookery_api::{Lobby, PasswordScheme};
use rookery_db::{Backends, Database};
use rookery_types::{AuthData, Color, ErrorKind, LobbyError, StandardChess};

fn lobbies() -> Vec<(&'static str, Lobby)> {
    let sqlite = Database::open_in_memory().expect("open in-memory sqlite");
    [
        ("memory", Backends::memory()),
        ("sqlite", Backends::sqlite(sqlite)),
    ]
    .into_iter()
    .map(|(name, backends)| {
        let lobby = Lobby::new(backends, Arc::new(StandardChess), PasswordScheme::Plaintext);
        (name, lobby)
    })
    .collect()
}

#[test]
fn second_register_of_same_name_fails() {
    for (backend, lobby) in lobbies() {
        lobby.register("alice", "pw", "a@x").unwrap();
        let err = lobby.register("alice", "other", "b@x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists, "{backend}");

        // The original record is untouched
        let user = lobby.credentials().get("alice").unwrap().unwrap();
        assert_eq!(user.email, "a@x", "{backend}");
    }
}

#[test]
fn register_then_login_yields_token_for_user() {
    for (backend, lobby) in lobbies() {
        let registered = lobby.register("alice", "pw", "a@x").unwrap();
        let logged_in = lobby.login("alice", "pw").unwrap();

        assert_eq!(logged_in.username, "alice", "{backend}");
        assert_ne!(registered.token, logged_in.token, "{backend}");
        assert_eq!(lobby.tokens().validate(&logged_in.token).unwrap(), "alice");
        // Earlier sessions stay live
        assert_eq!(lobby.tokens().validate(&registered.token).unwrap(), "alice");
    }
}

#[test]
fn wrong_password_is_unauthorized_and_changes_nothing() {
    for (backend, lobby) in lobbies() {
        lobby.register("alice", "pw", "a@x").unwrap();
        let before = lobby.credentials().get("alice").unwrap();

        assert_eq!(lobby.login("alice", "wrong"), Err(LobbyError::Unauthorized), "{backend}");
        assert_eq!(lobby.credentials().get("alice").unwrap(), before, "{backend}");
    }
}

#[test]
fn missing_fields_are_invalid() {
    for (backend, lobby) in lobbies() {
        for (u, p, e) in [("", "pw", "a@x"), ("alice", "", "a@x"), ("alice", "pw", "  ")] {
            let err = lobby.register(u, p, e).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{backend}: {u:?} {p:?} {e:?}");
        }
        assert_eq!(lobby.login("", "pw").unwrap_err().kind(), ErrorKind::InvalidArgument);

        let auth = lobby.register("alice", "pw", "a@x").unwrap();
        let err = lobby.create_table(&auth.token, "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{backend}");
    }
}

#[test]
fn table_ids_increase_and_seats_start_empty() {
    for (backend, lobby) in lobbies() {
        let auth = lobby.register("alice", "pw", "a@x").unwrap();

        let first = lobby.create_table(&auth.token, "Match1").unwrap();
        let second = lobby.create_table(&auth.token, "Match2").unwrap();
        assert_eq!((first, second), (1, 2), "{backend}");

        let tables = lobby.list_tables(&auth.token).unwrap();
        assert_eq!(tables.len(), 2, "{backend}");
        assert_eq!(tables[0].name, "Match1");
        assert!(tables.iter().all(|t| t.white.is_none() && t.black.is_none()));
    }
}

#[test]
fn new_table_carries_initial_rules_state() {
    for (backend, lobby) in lobbies() {
        let auth = lobby.register("alice", "pw", "a@x").unwrap();
        let id = lobby.create_table(&auth.token, "Match1").unwrap();

        let table = lobby.registry().get(id).unwrap();
        let state: serde_json::Value = serde_json::from_str(table.rules.as_str()).unwrap();
        assert_eq!(state["turn"], "WHITE", "{backend}");
    }
}

#[test]
fn seats_fill_once_per_color() {
    for (backend, lobby) in lobbies() {
        let alice = lobby.register("alice", "pw", "a@x").unwrap();
        let bob = lobby.register("bob", "pw", "b@x").unwrap();
        let id = lobby.create_table(&alice.token, "Match1").unwrap();

        lobby.join_table(&alice.token, id, "WHITE").unwrap();
        assert_eq!(
            lobby.join_table(&bob.token, id, "WHITE"),
            Err(LobbyError::AlreadyTaken(Color::White)),
            "{backend}"
        );
        lobby.join_table(&bob.token, id, "BLACK").unwrap();

        let table = lobby.registry().get(id).unwrap();
        assert_eq!(table.white.as_deref(), Some("alice"), "{backend}");
        assert_eq!(table.black.as_deref(), Some("bob"), "{backend}");
        assert!(table.is_full());
    }
}

#[test]
fn join_unknown_table_is_not_found() {
    for (backend, lobby) in lobbies() {
        let auth = lobby.register("alice", "pw", "a@x").unwrap();
        assert_eq!(
            lobby.join_table(&auth.token, 42, "WHITE"),
            Err(LobbyError::NotFound(42)),
            "{backend}"
        );
    }
}

#[test]
fn bad_token_is_unauthorized_regardless_of_table() {
    for (backend, lobby) in lobbies() {
        let auth = lobby.register("alice", "pw", "a@x").unwrap();
        let id = lobby.create_table(&auth.token, "Match1").unwrap();
        lobby.join_table(&auth.token, id, "WHITE").unwrap();

        for token in ["", "not-a-token"] {
            // Existing table with a taken seat, existing table with a free seat, missing table
            for (table, color) in [(id, "WHITE"), (id, "BLACK"), (99, "WHITE"), (id, "GREEN")] {
                assert_eq!(
                    lobby.join_table(token, table, color),
                    Err(LobbyError::Unauthorized),
                    "{backend}: {token:?} {table} {color}"
                );
            }
            assert_eq!(lobby.list_tables(token), Err(LobbyError::Unauthorized));
            assert_eq!(lobby.create_table(token, "Match2"), Err(LobbyError::Unauthorized));
        }
    }
}

#[test]
fn logout_revokes_only_that_token() {
    for (backend, lobby) in lobbies() {
        let first = lobby.register("alice", "pw", "a@x").unwrap();
        let second = lobby.login("alice", "pw").unwrap();

        lobby.logout(&first.token).unwrap();
        assert_eq!(lobby.list_tables(&first.token), Err(LobbyError::Unauthorized), "{backend}");
        assert!(lobby.list_tables(&second.token).is_ok(), "{backend}");
    }
}

#[test]
fn reset_wipes_everything_and_restarts_ids() {
    for (backend, lobby) in lobbies() {
        let auth = lobby.register("alice", "pw", "a@x").unwrap();
        let id = lobby.create_table(&auth.token, "Match1").unwrap();
        lobby.join_table(&auth.token, id, "WHITE").unwrap();

        lobby.reset_all().unwrap();

        assert_eq!(lobby.tokens().validate(&auth.token), Err(LobbyError::Unauthorized), "{backend}");
        assert_eq!(lobby.credentials().get("alice").unwrap(), None, "{backend}");
        assert!(lobby.registry().list().unwrap().is_empty(), "{backend}");

        let again = lobby.register("alice", "pw", "a@x").unwrap();
        assert!(lobby.list_tables(&again.token).unwrap().is_empty());
        assert_eq!(lobby.create_table(&again.token, "Match1").unwrap(), 1, "{backend}");
    }
}

#[test]
fn reset_on_empty_lobby_is_fine() {
    for (_, lobby) in lobbies() {
        lobby.reset_all().unwrap();
        lobby.reset_all().unwrap();
    }
}

#[test]
fn racing_joins_for_one_seat_have_one_winner() {
    const PLAYERS: usize = 12;

    for (backend, lobby) in lobbies() {
        let tokens: Vec<(String, String)> = (0..PLAYERS)
            .map(|i| {
                let name = format!("player{i}");
                let auth = lobby.register(&name, "pw", "p@x").unwrap();
                (name, auth.token)
            })
            .collect();
        let id = lobby.create_table(&tokens[0].1, "Contested").unwrap();

        let results: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = tokens
                .iter()
                .map(|(name, token)| {
                    let lobby = &lobby;
                    s.spawn(move || (name.clone(), lobby.join_table(token, id, "WHITE")))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let winners: Vec<_> = results.iter().filter(|(_, r)| r.is_ok()).collect();
        assert_eq!(winners.len(), 1, "{backend}");
        for (_, result) in results.iter().filter(|(_, r)| r.is_err()) {
            assert_eq!(result, &Err(LobbyError::AlreadyTaken(Color::White)), "{backend}");
        }

        let table = lobby.registry().get(id).unwrap();
        assert_eq!(table.white.as_deref(), Some(winners[0].0.as_str()), "{backend}");
        assert_eq!(table.black, None, "{backend}");
    }
}

#[test]
fn racing_joins_for_both_colors_both_land() {
    for (backend, lobby) in lobbies() {
        let alice = lobby.register("alice", "pw", "a@x").unwrap();
        let bob = lobby.register("bob", "pw", "b@x").unwrap();

        for round in 0..20 {
            let id = lobby.create_table(&alice.token, &format!("Match{round}")).unwrap();
            thread::scope(|s| {
                let lobby = &lobby;
                let white = s.spawn(|| lobby.join_table(&alice.token, id, "WHITE"));
                let black = s.spawn(|| lobby.join_table(&bob.token, id, "BLACK"));
                white.join().unwrap().unwrap();
                black.join().unwrap().unwrap();
            });

            let table = lobby.registry().get(id).unwrap();
            assert_eq!(table.white.as_deref(), Some("alice"), "{backend} round {round}");
            assert_eq!(table.black.as_deref(), Some("bob"), "{backend} round {round}");
        }
    }
}

#[test]
fn racing_registrations_of_one_name_have_one_winner() {
    for (backend, lobby) in lobbies() {
        let results: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let lobby = &lobby;
                    s.spawn(move || lobby.register("alice", "pw", &format!("a{i}@x")))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let ok = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(ok, 1, "{backend}");
        assert!(
            results
                .iter()
                .filter_map(|r| r.as_ref().err())
                .all(|e| e.kind() == ErrorKind::AlreadyExists),
            "{backend}"
        );
    }
}

#[test]
fn reset_racing_mutations_leaves_no_orphans() {
    const WORKERS: usize = 4;
    const ROUNDS: usize = 25;

    for (backend, lobby) in lobbies() {
        let issued: Vec<AuthData> = thread::scope(|s| {
            let lobby = &lobby;
            let workers: Vec<_> = (0..WORKERS)
                .map(|w| {
                    s.spawn(move || {
                        let mut issued = Vec::new();
                        for round in 0..ROUNDS {
                            let name = format!("w{w}r{round}");
                            let auth = lobby.register(&name, "pw", "p@x").unwrap();
                            if let Ok(id) = lobby.create_table(&auth.token, &name) {
                                let color = if round % 2 == 0 { "WHITE" } else { "BLACK" };
                                match lobby.join_table(&auth.token, id, color) {
                                    Ok(())
                                    | Err(LobbyError::Unauthorized)
                                    | Err(LobbyError::NotFound(_))
                                    | Err(LobbyError::AlreadyTaken(_)) => {}
                                    Err(e) => panic!("{backend}: unexpected join failure: {e}"),
                                }
                            }
                            issued.push(auth);
                        }
                        issued
                    })
                })
                .collect();

            let resetter = s.spawn(move || {
                for _ in 0..10 {
                    lobby.reset_all().unwrap();
                    thread::yield_now();
                }
            });

            resetter.join().unwrap();
            workers.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(issued.len(), WORKERS * ROUNDS, "{backend}");
        for auth in &issued {
            if let Ok(owner) = lobby.tokens().validate(&auth.token) {
                assert!(
                    lobby.credentials().get(&owner).unwrap().is_some(),
                    "{backend}: token for missing user {owner}"
                );
            }
        }
        for table in lobby.registry().list().unwrap() {
            for seated in [table.white.as_deref(), table.black.as_deref()].into_iter().flatten() {
                assert!(
                    lobby.credentials().get(seated).unwrap().is_some(),
                    "{backend}: table {} seats missing user {seated}",
                    table.id
                );
            }
        }
    }
}

#[test]
fn issuing_races_revoking_other_tokens() {
    const ISSUERS: usize = 4;
    const PER_ISSUER: usize = 10;

    for (backend, lobby) in lobbies() {
        lobby.register("alice", "pw", "a@x").unwrap();
        let doomed: Vec<String> = (0..20)
            .map(|_| lobby.login("alice", "pw").unwrap().token)
            .collect();

        let fresh: Vec<AuthData> = thread::scope(|s| {
            let lobby = &lobby;
            let doomed = &doomed;
            let revoker = s.spawn(move || {
                for token in doomed {
                    lobby.logout(token).unwrap();
                }
            });
            let issuers: Vec<_> = (0..ISSUERS)
                .map(|_| {
                    s.spawn(move || {
                        (0..PER_ISSUER)
                            .map(|_| lobby.login("alice", "pw").unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            revoker.join().unwrap();
            issuers.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(fresh.len(), ISSUERS * PER_ISSUER, "{backend}");
        for auth in &fresh {
            assert_eq!(lobby.tokens().validate(&auth.token).unwrap(), "alice", "{backend}");
        }
        for token in &doomed {
            assert_eq!(lobby.tokens().validate(token), Err(LobbyError::Unauthorized), "{backend}");
        }
    }
}

#[test]
fn argon2_lobby_still_logs_in() {
    let lobby = Lobby::new(Backends::memory(), Arc::new(StandardChess), PasswordScheme::Argon2);
    lobby.register("alice", "pw", "a@x").unwrap();

    let stored = lobby.credentials().get("alice").unwrap().unwrap();
    assert_ne!(stored.password, "pw");
    assert!(lobby.login("alice", "pw").is_ok());
    assert_eq!(lobby.login("alice", "nope"), Err(LobbyError::Unauthorized));
}
