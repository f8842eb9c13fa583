//! Per-recipient snapshots of a room.
//!
//! Three projections exist:
//!
//! - **full**: everything. Only used in `SETUP`, where there is nothing to
//!   hide.
//! - **artist**: the faker's name blanked. Sent to everyone except the
//!   faker.
//! - **faker**: the keyword replaced with a placeholder. Sent to the faker
//!   only.
//!
//! All of this is pure: nothing here mutates the room or touches the
//! network.

use fakeart_protocol::{Phase, RoomView, UserView};
use fakeart_transport::ConnectionId;

use crate::Room;

/// The unfiltered snapshot.
pub fn full_view(room: &Room) -> RoomView {
    let users: Vec<UserView> = room.users().iter().map(|u| u.view()).collect();
    let users_without_admin = room.players().map(|u| u.view()).collect();
    RoomView {
        room_code: room.code().clone(),
        users,
        users_without_admin,
        round: room.round(),
        phase: room.phase(),
        turn: room.turn().map_or(-1, i64::from),
        whose_turn: room.whose_turn().map(|u| u.name().to_owned()),
        keyword: room.keyword().map(str::to_owned),
        hint: room.hint().map(str::to_owned),
        faker_name: room.faker().map(str::to_owned),
        strokes: room.strokes().to_vec(),
    }
}

/// What every non-faker sees during a round.
pub fn artist_view(full: &RoomView) -> RoomView {
    RoomView {
        faker_name: None,
        ..full.clone()
    }
}

/// What the faker sees during a round.
pub fn faker_view(full: &RoomView, placeholder: &str) -> RoomView {
    RoomView {
        keyword: full.keyword.as_ref().map(|_| placeholder.to_owned()),
        ..full.clone()
    }
}

/// The projections of one room state, computed once per broadcast.
#[derive(Debug, Clone)]
pub enum Projections {
    /// `SETUP`: everybody gets the same snapshot.
    Setup(RoomView),
    /// A round is running: two audiences.
    Round {
        faker: Option<String>,
        artist: RoomView,
        faker_view: RoomView,
    },
}

impl Projections {
    pub fn of(room: &Room) -> Self {
        let full = full_view(room);
        if room.phase() == Phase::Setup {
            return Self::Setup(full);
        }
        Self::Round {
            faker: room.faker().map(str::to_owned),
            artist: artist_view(&full),
            faker_view: faker_view(&full, &room.config().keyword_placeholder),
        }
    }

    /// The projection a given user is allowed to see.
    pub fn for_user(&self, name: &str) -> &RoomView {
        match self {
            Self::Setup(view) => view,
            Self::Round {
                faker,
                artist,
                faker_view,
            } => {
                if faker.as_deref() == Some(name) {
                    faker_view
                } else {
                    artist
                }
            }
        }
    }

    /// Pairs every connected user's connection with its projection.
    /// Disconnected users are skipped.
    pub fn recipients<'a>(
        &'a self,
        room: &'a Room,
    ) -> impl Iterator<Item = (ConnectionId, &'a RoomView)> + 'a {
        room.users()
            .iter()
            .filter_map(move |u| u.connection().map(|c| (c, self.for_user(u.name()))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Prompt, PromptPool, Role, RoomConfig, User};
    use fakeart_protocol::RoomCode;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn conn(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    fn room_with_admin() -> Room {
        let mut room = Room::new(RoomCode::new("WXYZ"), RoomConfig::default());
        room.add_user(User::new("admin", Role::Spectator, conn(1)));
        room.add_user(User::new("ann", Role::Player, conn(2)));
        room.add_user(User::new("bob", Role::Player, conn(3)));
        room.add_user(User::new("cy", Role::Player, conn(4)));
        room
    }

    fn start(room: &mut Room, seed: u64) {
        let prompts = PromptPool::new(vec![Prompt::new("Kite", "Toy")]).unwrap();
        room.start_new_round(&prompts, &mut StdRng::seed_from_u64(seed))
            .unwrap();
    }

    #[test]
    fn test_full_view_in_setup() {
        let room = room_with_admin();
        let view = full_view(&room);
        assert_eq!(view.phase, Phase::Setup);
        assert_eq!(view.turn, -1);
        assert_eq!(view.whose_turn, None);
        assert_eq!(view.users.len(), 4);
        assert_eq!(view.users_without_admin.len(), 3);
        assert!(view.users_without_admin.iter().all(|u| u.name != "admin"));
    }

    #[test]
    fn test_setup_projection_is_shared() {
        let room = room_with_admin();
        let projections = Projections::of(&room);
        let views: Vec<_> = projections.recipients(&room).collect();
        assert_eq!(views.len(), 4);
        assert!(views.iter().all(|(_, v)| **v == full_view(&room)));
    }

    #[test]
    fn test_round_projections_hide_secrets() {
        for seed in 0..10 {
            let mut room = room_with_admin();
            start(&mut room, seed);
            let faker = room.faker().unwrap().to_owned();
            let projections = Projections::of(&room);

            for user in room.users() {
                let view = projections.for_user(user.name());
                if user.name() == faker {
                    assert_eq!(view.keyword.as_deref(), Some("???"));
                    assert_eq!(view.faker_name.as_deref(), Some(faker.as_str()));
                } else {
                    assert_eq!(view.keyword.as_deref(), Some("Kite"));
                    assert_eq!(view.faker_name, None);
                }
                assert_eq!(view.hint.as_deref(), Some("Toy"));
            }
        }
    }

    #[test]
    fn test_whose_turn_is_named_in_play() {
        let mut room = room_with_admin();
        start(&mut room, 3);
        let view = full_view(&room);
        assert_eq!(view.turn, 1);
        assert_eq!(
            view.whose_turn.as_deref(),
            Some(room.whose_turn().unwrap().name())
        );
    }

    #[test]
    fn test_recipients_skip_disconnected() {
        let mut room = room_with_admin();
        start(&mut room, 1);
        room.disconnect_user("bob");
        let projections = Projections::of(&room);
        let conns: Vec<ConnectionId> = projections.recipients(&room).map(|(c, _)| c).collect();
        assert_eq!(conns.len(), 3);
        assert!(!conns.contains(&conn(3)));
    }

    #[test]
    fn test_projection_does_not_mutate_room() {
        let mut room = room_with_admin();
        start(&mut room, 5);
        let before = full_view(&room);
        let _ = Projections::of(&room);
        assert_eq!(full_view(&room), before);
    }
}
