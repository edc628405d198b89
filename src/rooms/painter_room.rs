use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::geometry::WallOpening;

use super::{ModelSpec, Room, RoomContext, WallSpec};

/// Painter's studio. Box walls of the base thickness; the door sits in the
/// right corner of the -x wall.
#[derive(Debug, Clone, Copy, Default)]
pub struct PainterRoom;

impl Room for PainterRoom {
    fn name(&self) -> &str {
        "PainterRoom"
    }

    fn build_walls(&self, ctx: &mut RoomContext) {
        let dims = *ctx.dimensions();
        let half = dims.half_length();
        let material = ctx.surface_material();

        let solid = [
            ("back", Vec3::new(0.0, 0.0, -half), 0.0),
            ("front", Vec3::new(0.0, 0.0, half), 0.0),
            ("right", Vec3::new(half, 0.0, 0.0), FRAC_PI_2),
        ];
        for (name, foot, rotation) in solid {
            ctx.add_wall(
                WallSpec::new(name, dims.wall_length, dims.wall_height)
                    .with_thickness(dims.wall_thickness)
                    .placed(foot, rotation),
                material.clone(),
            );
        }

        let door_x = dims.wall_length * 0.5 - dims.door_width * 0.5;
        ctx.add_wall(
            WallSpec::new("doorWall", dims.wall_length, dims.wall_height)
                .with_thickness(dims.wall_thickness)
                .with_opening(WallOpening::door(door_x, dims.door_width, dims.door_height))
                .placed(Vec3::new(-half, 0.0, 0.0), FRAC_PI_2),
            material,
        );
    }

    fn models(&self) -> Vec<ModelSpec> {
        const DIR: &str = "models/painterRoom";
        let model = |file: &str, name: &str| ModelSpec::new(format!("{}/{}", DIR, file), name);
        vec![
            model("my_desk.glb", "mydesk")
                .placed([86.0, 30.0, 10.0], 32.0, [0.0, 3.0 * PI / 2.0, 0.0])
                .solid(),
            model("paintcan.glb", "paintcan").placed([40.0, 0.0, 0.0], 4.0, [0.0; 3]),
            model("colorspot.glb", "colorspot").placed([40.0, 0.0, 0.0], 2000.0, [0.0; 3]),
            model("caterpillar.glb", "caterpillar").placed([-90.0, 48.0, 90.0], 80.0, [0.0; 3]),
            model("Lantern.glb", "lantern").placed([-90.0, 0.0, 90.0], 2.0, [0.0; 3]),
            model("canvas.glb", "canvas").placed([-90.0, 40.0, 60.0], 20.0, [0.0; 3]),
            model("collage_wall.glb", "collage_wall").placed([0.0, 50.0, 94.0], 80.0, [-FRAC_PI_2, 0.0, 0.0]),
            model("SheenWoodLeatherSofa.glb", "sheenwood")
                .placed([-20.0, 0.0, -84.0], 40.0, [0.0; 3])
                .solid(),
        ]
    }
}
