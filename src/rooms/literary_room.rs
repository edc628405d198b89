use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

use crate::geometry::WallOpening;
use crate::math::Transform;
use crate::scene_graph::{AmbientLight, Material};

use super::{ModelSpec, Room, RoomContext, SurfaceTextures, WallSpec};

const WALL_COLOR: u32 = 0xa0522d;
const FLOOR_COLOR: u32 = 0xf1c27d;
const ROUGHNESS: f32 = 0.8;

const WINDOW_WIDTH: f32 = 32.0;
const WINDOW_HEIGHT: f32 = 55.0;
/// World z of the windows in the +x wall
pub const WINDOW_Z: [f32; 3] = [-50.0, 0.0, 50.0];

/// Reading room: untextured wooden walls, three windows on the +x wall, no
/// door and no wall lamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteraryRoom;

impl LiteraryRoom {
    fn material(name: &str, color: u32) -> Arc<Material> {
        Arc::new(Material::color(name, color).with_roughness(ROUGHNESS).double_sided())
    }
}

impl Room for LiteraryRoom {
    fn name(&self) -> &str {
        "LiteraryRoom"
    }

    fn surface_textures(&self) -> Option<SurfaceTextures> {
        None
    }

    fn build_floor(&self, ctx: &mut RoomContext) {
        let length = ctx.dimensions().wall_length;
        ctx.add_floor(length, length, Self::material("LiteraryRoom/floor", FLOOR_COLOR));
    }

    fn build_walls(&self, ctx: &mut RoomContext) {
        let dims = *ctx.dimensions();
        let half = dims.half_length();
        let material = Self::material("LiteraryRoom/wall", WALL_COLOR);

        let solid = [
            ("front", Vec3::new(0.0, 0.0, -half), 0.0),
            ("back", Vec3::new(0.0, 0.0, half), 0.0),
            ("left", Vec3::new(-half, 0.0, 0.0), FRAC_PI_2),
        ];
        for (name, foot, rotation) in solid {
            ctx.add_wall(
                WallSpec::new(name, dims.wall_length, dims.wall_height)
                    .with_thickness(0.1)
                    .placed(foot, rotation),
                Arc::clone(&material),
            );
        }

        // Local +x of this wall points to -z
        let mut windows = WallSpec::new("windowWall", dims.wall_length, dims.wall_height)
            .with_thickness(0.5)
            .placed(Vec3::new(half, 0.0, 0.0), FRAC_PI_2);
        for z in WINDOW_Z {
            windows = windows.with_opening(WallOpening::window(
                -z,
                dims.wall_height * 0.5,
                WINDOW_WIDTH,
                WINDOW_HEIGHT,
            ));
        }
        ctx.add_wall(windows, material);
    }

    fn build_ceiling(&self, ctx: &mut RoomContext) {
        let dims = *ctx.dimensions();
        ctx.add_ceiling(
            dims.wall_length,
            dims.wall_length,
            dims.wall_height,
            Self::material("LiteraryRoom/roof", FLOOR_COLOR),
        );
    }

    fn build_lighting(&self, _ctx: &mut RoomContext) {}

    fn ambient_light(&self) -> Option<AmbientLight> {
        Some(AmbientLight::new(0x404040, 2.0))
    }

    fn models(&self) -> Vec<ModelSpec> {
        const DIR: &str = "models/literaryRoom";
        let facing = 3.0 * PI / 2.0;
        let half = self.dimensions().half_length();

        let mut windows = ModelSpec::new(format!("{}/wild_west_theme_small_window_no_glass.glb", DIR), "window");
        for z in WINDOW_Z {
            windows = windows.placed([half, self.dimensions().wall_height * 0.5, z], 0.3, [0.0, FRAC_PI_2, 0.0]);
        }

        vec![
            windows,
            ModelSpec::new(format!("{}/victorian_bookshelf.glb", DIR), "bookshelf")
                .placed([0.0, 0.0, -85.0], 30.0, [0.0, facing, 0.0])
                .solid(),
            ModelSpec::new(format!("{}/dusty_old_bookshelf_free.glb", DIR), "bookshelf1")
                .placed([-90.0, 0.0, -60.0], 35.0, [0.0, facing, 0.0])
                .solid(),
            ModelSpec::new(format!("{}/old_desk_scene.glb", DIR), "desk")
                .at(
                    Transform::from_translation(Vec3::new(-90.0, 20.0, 0.0))
                        .with_scale(Vec3::new(39.0, 30.0, 30.0))
                        .with_rotation_y(facing),
                )
                .solid(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::wall_panels;
    use crate::loaders::AssetLoader;
    use crate::rooms::assemble;

    #[test]
    fn window_wall_has_three_holes_but_stays_solid() {
        let mut loader = AssetLoader::new("no-such-asset-root");
        let room = assemble(&LiteraryRoom, &mut loader);

        let window_centre = Vec3::new(100.0, 50.0, 0.0);
        assert!(room.colliders.iter().any(|c| c.bounds.contains_point(window_centre)));

        let openings: Vec<_> = WINDOW_Z
            .iter()
            .map(|z| WallOpening::window(-z, 50.0, WINDOW_WIDTH, WINDOW_HEIGHT))
            .collect();
        let panels = wall_panels(200.0, 100.0, &openings);
        for z in WINDOW_Z {
            assert!(panels.iter().all(|p| !p.contains(-z, 50.0)));
        }
    }

    #[test]
    fn ambient_only_lighting() {
        let mut loader = AssetLoader::new("no-such-asset-root");
        let room = assemble(&LiteraryRoom, &mut loader);
        // The ambient light is the only light
        assert_eq!(room.group.light_count(), 1);
        // No texture sets, four model requests
        assert_eq!(room.pending.len(), 4);
    }
}
