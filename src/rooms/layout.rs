use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

use crate::math::Transform;

use super::{LiteraryRoom, Lobby, MusicRoom, PainterRoom, Room};

pub const MUSIC_ROOM_OFFSET: Vec3 = Vec3::new(-202.0, 0.0, 140.5);
pub const LITERARY_ROOM_OFFSET: Vec3 = Vec3::new(-201.0, 0.0, -70.0);
pub const PAINTER_ROOM_OFFSET: Vec3 = Vec3::new(202.0, 0.0, 140.5);

/// A room and where it goes in the world
pub struct RoomPlacement {
    pub room: Box<dyn Room>,
    pub transform: Transform,
}

impl RoomPlacement {
    pub fn new(room: Box<dyn Room>, transform: Transform) -> Self {
        Self { room, transform }
    }

    pub fn origin(room: Box<dyn Room>) -> Self {
        Self::new(room, Transform::IDENTITY)
    }
}

/// Every room around the lobby. The music and painter room doors line up
/// with the lobby's side doors.
pub fn museum_layout() -> Vec<RoomPlacement> {
    vec![
        RoomPlacement::origin(Box::new(Lobby::connected())),
        RoomPlacement::new(Box::new(MusicRoom), Transform::from_translation(MUSIC_ROOM_OFFSET)),
        RoomPlacement::new(
            Box::new(LiteraryRoom),
            Transform::from_translation(LITERARY_ROOM_OFFSET).with_rotation_y(FRAC_PI_2),
        ),
        RoomPlacement::new(Box::new(PainterRoom), Transform::from_translation(PAINTER_ROOM_OFFSET)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::lobby::SIDE_DOOR_Z;

    #[test]
    fn side_room_doors_meet_the_lobby() {
        // Both door walls put their door at local z = -90.5
        let door_local_z = -(100.0 - 19.0 / 2.0);
        assert_eq!(MUSIC_ROOM_OFFSET.z + door_local_z, SIDE_DOOR_Z);
        assert_eq!(PAINTER_ROOM_OFFSET.z + door_local_z, SIDE_DOOR_Z);
    }

    #[test]
    fn lobby_comes_first() {
        let layout = museum_layout();
        assert_eq!(layout.len(), 4);
        assert_eq!(layout[0].room.name(), "Lobby");
        assert_eq!(layout[0].transform, Transform::IDENTITY);
    }
}
