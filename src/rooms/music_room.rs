use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::geometry::WallOpening;

use super::{ModelSpec, Room, RoomContext, WallSpec};

/// Instruments on display. Plain walls, the door sits in the right corner of
/// the +x wall.
#[derive(Debug, Clone, Copy, Default)]
pub struct MusicRoom;

impl Room for MusicRoom {
    fn name(&self) -> &str {
        "MusicRoom"
    }

    fn build_walls(&self, ctx: &mut RoomContext) {
        let dims = *ctx.dimensions();
        let half = dims.half_length();
        let material = ctx.surface_material();

        let solid = [
            ("back", Vec3::new(0.0, 0.0, -half), 0.0),
            ("front", Vec3::new(0.0, 0.0, half), 0.0),
            ("left", Vec3::new(-half, 0.0, 0.0), FRAC_PI_2),
        ];
        for (name, foot, rotation) in solid {
            ctx.add_wall(
                WallSpec::new(name, dims.wall_length, dims.wall_height).placed(foot, rotation),
                material.clone(),
            );
        }

        // Local +x of this wall points to -z
        let door_x = dims.wall_length * 0.5 - dims.door_width * 0.5;
        ctx.add_wall(
            WallSpec::new("doorWall", dims.wall_length, dims.wall_height)
                .with_opening(WallOpening::door(door_x, dims.door_width, dims.door_height))
                .placed(Vec3::new(half, 0.0, 0.0), FRAC_PI_2),
            material,
        );
    }

    fn models(&self) -> Vec<ModelSpec> {
        const DIR: &str = "models/musicRoom";
        let model = |file: &str, name: &str| ModelSpec::new(format!("{}/{}", DIR, file), name);
        vec![
            model("electric_guitar_lowpoly_model.glb", "red_guitar")
                .placed([-20.0, 30.0, 100.0], 6.0, [0.0, PI, 3.0 * PI / 8.0]),
            model("piano_ukraine.glb", "piano")
                .placed([86.0, 0.0, 10.0], 20.0, [0.0, 3.0 * FRAC_PI_2, 0.0])
                .solid(),
            model("marimba.glb", "marimba").placed([5.0, 10.0, 30.0], 7.0, [0.0; 3]),
            model("harmonium.glb", "harmonium")
                .placed([-80.0, 0.0, 50.0], 1.8, [0.0, FRAC_PI_2, 0.0])
                .solid(),
            model("guitar.glb", "guitar2").placed([-50.0, 40.0, 96.0], 6.0, [-FRAC_PI_2, PI, FRAC_PI_2]),
            model("guitar_hero_guitar.glb", "guitar_hero").placed([-20.0, 40.0, 90.0], 6.0, [0.0, PI, 0.0]),
            model("drum.glb", "drum")
                .placed([-70.0, 0.0, -20.0], 30.0, [0.0, 3.0 * FRAC_PI_2, 0.0])
                .solid(),
            model("krishna.glb", "krishna").placed([-66.0, -10.0, -66.0], 20.0, [0.0, FRAC_PI_2, 0.0]),
            model("speaker.glb", "speaker").placed([-70.0, 0.0, 80.0], 0.12, [0.0, PI, 0.0]),
        ]
    }
}
