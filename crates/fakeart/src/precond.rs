//! Named preconditions checked by the dispatcher before any mutation.
//!
//! Each check fails with a [`GameError`] whose client message is sent back
//! on the request's event name. Checks that locate something (the session's
//! binding, the user's room) return it so the handler doesn't look it up
//! twice.

use fakeart_game::{GameError, Room};
use fakeart_protocol::RoomCode;
use fakeart_session::{Binding, Session};

use crate::Lobby;

pub fn session_does_not_have_user(session: &Session) -> Result<(), GameError> {
    match session.binding() {
        Some(binding) => Err(GameError::AlreadyHasUser(binding.username.clone())),
        None => Ok(()),
    }
}

pub fn session_has_user(session: &Session) -> Result<Binding, GameError> {
    session.binding().cloned().ok_or(GameError::NoUser)
}

/// The bound user's room, provided it still exists and still lists them.
pub fn user_is_in_a_room<'a>(
    lobby: &'a mut Lobby,
    binding: &Binding,
) -> Result<&'a mut Room, GameError> {
    lobby
        .get_mut(&binding.room_code)
        .filter(|room| room.find_user(&binding.username).is_some())
        .ok_or_else(|| GameError::NotInRoom(binding.username.clone()))
}

pub fn lobby_is_not_full(lobby: &Lobby) -> Result<(), GameError> {
    if lobby.is_full() {
        return Err(GameError::LobbyFull);
    }
    Ok(())
}

pub fn room_exists<'a>(lobby: &'a mut Lobby, code: &RoomCode) -> Result<&'a mut Room, GameError> {
    lobby
        .get_mut(code)
        .ok_or_else(|| GameError::RoomNotFound(code.clone()))
}

pub fn room_is_not_full(room: &Room) -> Result<(), GameError> {
    if room.is_full() {
        return Err(GameError::RoomFull(room.code().clone()));
    }
    Ok(())
}

/// Used by rejoin: the name must already be on the roster.
pub fn name_is_taken_in_room(room: &Room, name: &str) -> Result<(), GameError> {
    if room.find_user(name).is_none() {
        return Err(GameError::NameNotInRoom {
            name: name.to_owned(),
            room: room.code().clone(),
        });
    }
    Ok(())
}

pub fn name_is_not_taken_in_room(room: &Room, name: &str) -> Result<(), GameError> {
    if room.find_user(name).is_some() {
        return Err(GameError::NameTaken {
            name: name.to_owned(),
            room: room.code().clone(),
        });
    }
    Ok(())
}

pub fn game_in_progress(room: &Room) -> Result<(), GameError> {
    if !room.is_game_in_progress() {
        return Err(GameError::GameNotInProgress(room.code().clone()));
    }
    Ok(())
}

pub fn game_not_in_progress(room: &Room) -> Result<(), GameError> {
    if room.is_game_in_progress() {
        return Err(GameError::GameInProgress(room.code().clone()));
    }
    Ok(())
}

/// Only `PLAY` has a turn; in any other phase nobody's turn it is.
pub fn is_users_turn(room: &Room, name: &str) -> Result<(), GameError> {
    match room.whose_turn() {
        Some(user) if user.name() == name => Ok(()),
        _ => Err(GameError::NotYourTurn(name.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fakeart_game::{Prompt, PromptPool, Role, RoomConfig, User};
    use fakeart_transport::ConnectionId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn lobby_with_room() -> (Lobby, RoomCode) {
        let mut lobby = Lobby::default();
        let code = lobby
            .create(RoomConfig::default(), &mut StdRng::seed_from_u64(1))
            .unwrap();
        let room = lobby.get_mut(&code).unwrap();
        room.add_user(User::new("ann", Role::Player, ConnectionId::new(1)));
        room.add_user(User::new("bob", Role::Player, ConnectionId::new(2)));
        (lobby, code)
    }

    #[test]
    fn test_user_is_in_a_room_missing_room_fails() {
        let (mut lobby, _) = lobby_with_room();
        let binding = Binding {
            room_code: RoomCode::new("NOPE"),
            username: "ann".into(),
        };
        assert_eq!(
            user_is_in_a_room(&mut lobby, &binding).unwrap_err(),
            GameError::NotInRoom("ann".into())
        );
    }

    #[test]
    fn test_user_is_in_a_room_dropped_user_fails() {
        let (mut lobby, code) = lobby_with_room();
        lobby.get_mut(&code).unwrap().drop_user("bob");
        let binding = Binding {
            room_code: code,
            username: "bob".into(),
        };
        assert!(user_is_in_a_room(&mut lobby, &binding).is_err());
    }

    #[test]
    fn test_room_exists_unknown_code_fails() {
        let (mut lobby, _) = lobby_with_room();
        let err = room_exists(&mut lobby, &RoomCode::new("zzzz")).unwrap_err();
        assert_eq!(err, GameError::RoomNotFound(RoomCode::new("ZZZZ")));
    }

    #[test]
    fn test_name_checks_are_exact_opposites() {
        let (lobby, code) = lobby_with_room();
        let room = lobby.get(&code).unwrap();
        assert!(name_is_taken_in_room(room, "ann").is_ok());
        assert!(name_is_not_taken_in_room(room, "ann").is_err());
        assert!(name_is_taken_in_room(room, "cy").is_err());
        assert!(name_is_not_taken_in_room(room, "cy").is_ok());
    }

    #[test]
    fn test_game_progress_checks_follow_phase() {
        let (mut lobby, code) = lobby_with_room();
        let room = lobby.get_mut(&code).unwrap();
        assert!(game_not_in_progress(room).is_ok());
        assert!(game_in_progress(room).is_err());

        let prompts = PromptPool::new(vec![Prompt::new("Kite", "Toy")]).unwrap();
        room.start_new_round(&prompts, &mut StdRng::seed_from_u64(2))
            .unwrap();
        assert!(game_in_progress(room).is_ok());
        assert!(matches!(
            game_not_in_progress(room),
            Err(GameError::GameInProgress(_))
        ));
    }

    #[test]
    fn test_is_users_turn_only_for_current_drawer() {
        let (mut lobby, code) = lobby_with_room();
        let room = lobby.get_mut(&code).unwrap();
        assert!(is_users_turn(room, "ann").is_err());

        let prompts = PromptPool::new(vec![Prompt::new("Kite", "Toy")]).unwrap();
        room.start_new_round(&prompts, &mut StdRng::seed_from_u64(2))
            .unwrap();
        let current = room.whose_turn().unwrap().name().to_owned();
        let other = if current == "ann" { "bob" } else { "ann" };
        assert!(is_users_turn(room, &current).is_ok());
        assert_eq!(
            is_users_turn(room, other),
            Err(GameError::NotYourTurn(other.into()))
        );
    }

    #[test]
    fn test_room_is_not_full_at_capacity_fails() {
        let mut lobby = Lobby::default();
        let config = RoomConfig {
            max_users: 1,
            ..RoomConfig::default()
        };
        let code = lobby.create(config, &mut StdRng::seed_from_u64(3)).unwrap();
        let room = lobby.get_mut(&code).unwrap();
        assert!(room_is_not_full(room).is_ok());
        room.add_user(User::new("ann", Role::Player, ConnectionId::new(1)));
        assert!(matches!(room_is_not_full(room), Err(GameError::RoomFull(_))));
    }
}
