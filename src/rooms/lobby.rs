use glam::Vec3;
use std::f32::consts::PI;

use crate::geometry::WallOpening;
use crate::math::Transform;
use crate::scene_graph::PointLight;

use super::{
    add_wall_lamps, square_room_walls, ModelSpec, Room, RoomContext, SurfaceTextures, WallSpec,
    LAMP_COLOR, LAMP_INTENSITY,
};

/// Height of the torch flame above the torch's foot
const FLAME_HEIGHT: f32 = 43.5;
const TORCH_LIGHT_RANGE: f32 = 40.0;
const LOBBY_LAMP_RANGE: f32 = 40.0;
/// Distance of the torches from the two walls of their corner
const TORCH_INSET: f32 = 5.0;
/// Distance of the door models in front of their wall
const DOOR_INSET: f32 = 3.0;
/// Side doors line up with the music and painter room doors
pub const SIDE_DOOR_Z: f32 = 50.0;

/// Entrance hall: four doors on the back and front walls, torches in the
/// corners.
///
/// A connected lobby also opens its side walls so the music and painter
/// rooms can be walked into when every room is shown at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lobby {
    pub side_doors: bool,
}

impl Lobby {
    pub fn connected() -> Self {
        Self { side_doors: true }
    }

    /// x positions of the doors on the back and front walls
    pub fn door_positions(&self, length: f32) -> [f32; 2] {
        [length / 3.0, -length / 3.0]
    }

    /// Openings of one wall, in that wall's local frame
    pub fn wall_openings(&self, wall: &str) -> Vec<WallOpening> {
        let dims = self.dimensions();
        let door = |center_x: f32| WallOpening::door(center_x, dims.door_width, dims.door_height);
        match wall {
            "back" | "front" => self
                .door_positions(dims.wall_length)
                .into_iter()
                .map(door)
                .collect(),
            // Local x of the left wall points to -z, of the right wall to +z
            "left" if self.side_doors => vec![door(-SIDE_DOOR_Z)],
            "right" if self.side_doors => vec![door(SIDE_DOOR_Z)],
            _ => Vec::new(),
        }
    }
}

impl Room for Lobby {
    fn name(&self) -> &str {
        "Lobby"
    }

    fn surface_textures(&self) -> Option<SurfaceTextures> {
        None
    }

    fn build_floor(&self, ctx: &mut RoomContext) {
        let length = ctx.dimensions().wall_length;
        let material = ctx.textured_material(
            "Lobby/floor",
            SurfaceTextures::from_prefix("textures/Fabric029_1K-JPG", [20.0, 20.0], 0x6b4a3a),
            false,
        );
        ctx.add_floor(length, length, material);
    }

    fn build_walls(&self, ctx: &mut RoomContext) {
        let dims = *ctx.dimensions();
        let material = ctx.textured_material(
            "Lobby/walls",
            SurfaceTextures::from_prefix("textures/Ground078_1K-JPG", [8.0, 4.0], 0x7a6a58),
            false,
        );

        for (name, foot, rotation) in square_room_walls(&dims) {
            let mut wall = WallSpec::new(name, dims.wall_length, dims.ceiling_height).placed(foot, rotation);
            for opening in self.wall_openings(name) {
                wall = wall.with_opening(opening);
            }
            ctx.add_wall(wall, material.clone());
        }
    }

    fn build_lighting(&self, ctx: &mut RoomContext) {
        let half = ctx.dimensions().half_length() - TORCH_INSET;
        let mut torches = ModelSpec::new("models/torch_stick.glb", "torch");
        for (index, (x, z)) in [(half, half), (-half, half), (half, -half), (-half, -half)]
            .into_iter()
            .enumerate()
        {
            let foot = Vec3::new(x, 0.0, z);
            ctx.add_point_light(
                &format!("torch_flame/{}", index),
                PointLight::new(LAMP_COLOR, LAMP_INTENSITY, TORCH_LIGHT_RANGE),
                foot + Vec3::Y * FLAME_HEIGHT,
            );
            torches = torches.at(Transform::from_translation(foot).with_uniform_scale(30.0));
        }
        ctx.request_model(torches);

        add_wall_lamps(ctx, "models/low_poly_psx_wall_lamp.glb", LOBBY_LAMP_RANGE);
    }

    fn models(&self) -> Vec<ModelSpec> {
        let dims = self.dimensions();
        let z = dims.half_length() - DOOR_INSET;
        let mut doors = ModelSpec::new("models/medieval_door.glb", "door");
        for x in self.door_positions(dims.wall_length) {
            doors = doors.at(Transform::from_translation(Vec3::new(x, 0.0, -z)).with_uniform_scale(0.06));
        }
        for x in self.door_positions(dims.wall_length) {
            doors = doors.at(
                Transform::from_translation(Vec3::new(x, 0.0, z))
                    .with_uniform_scale(0.06)
                    .with_rotation_y(PI),
            );
        }
        vec![doors]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::AssetLoader;
    use crate::rooms::assemble;

    #[test]
    fn plain_lobby_has_doors_only_front_and_back() {
        let lobby = Lobby::default();
        assert_eq!(lobby.wall_openings("back").len(), 2);
        assert_eq!(lobby.wall_openings("front").len(), 2);
        assert!(lobby.wall_openings("left").is_empty());
        assert_eq!(Lobby::connected().wall_openings("left").len(), 1);
    }

    #[test]
    fn lobby_lights_and_requests() {
        let mut loader = AssetLoader::new("no-such-asset-root");
        let instance = assemble(&Lobby::default(), &mut loader);

        // 4 torch flames + 4 wall lamps
        assert_eq!(instance.group.light_count(), 8);
        // floor, 4 walls, ceiling
        assert_eq!(instance.group.mesh_count(), 6);
        // 2 texture sets, torches, lamps, doors
        assert_eq!(instance.pending.len(), 5);
    }
}
