//! Room composition: static geometry, lights and furnishing requests.
//!
//! A room is described by the [`Room`] trait and turned into a
//! [`RoomInstance`] by [`assemble`]. Geometry, colliders and lights exist as
//! soon as the instance does; textures and models arrive later through the
//! [`AssetLoader`].

mod layout;
mod literary_room;
mod lobby;
mod music_room;
mod painter_room;

use glam::{Mat4, Vec3};
use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::collision::Collider;
use crate::error::UnknownScene;
use crate::geometry::{wall_panels, wall_with_openings, MeshData, OpeningKind, WallOpening};
use crate::loaders::{AssetLoader, AssetRequest, RequestId};
use crate::math::{Transform, AABB};
use crate::scene_graph::{AmbientLight, Material, Node, PointLight};

pub use layout::{museum_layout, RoomPlacement};
pub use literary_room::LiteraryRoom;
pub use lobby::Lobby;
pub use music_room::MusicRoom;
pub use painter_room::PainterRoom;

/// Measurements shared by every room
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomDimensions {
    pub door_width: f32,
    pub door_height: f32,
    pub wall_height: f32,
    pub wall_length: f32,
    pub ceiling_height: f32,
    pub wall_thickness: f32,
}

impl RoomDimensions {
    pub const BASE: Self = Self {
        door_width: 19.0,
        door_height: 45.0,
        wall_height: 100.0,
        wall_length: 200.0,
        ceiling_height: 100.0,
        wall_thickness: 1.0,
    };

    pub fn half_length(&self) -> f32 {
        self.wall_length * 0.5
    }

    /// Height of the wall lamps
    pub fn lamp_height(&self) -> f32 {
        2.0 * self.ceiling_height / 3.0
    }
}

impl Default for RoomDimensions {
    fn default() -> Self {
        Self::BASE
    }
}

/// Colour + roughness maps of a surface and how often they tile
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceTextures {
    pub color: PathBuf,
    pub roughness: PathBuf,
    pub repeat: [f32; 2],
    /// Shown until the maps are loaded
    pub placeholder: u32,
}

impl SurfaceTextures {
    /// `<prefix>_Color.jpg` / `<prefix>_Roughness.jpg`
    pub fn from_prefix(prefix: &str, repeat: [f32; 2], placeholder: u32) -> Self {
        Self {
            color: PathBuf::from(format!("{}_Color.jpg", prefix)),
            roughness: PathBuf::from(format!("{}_Roughness.jpg", prefix)),
            repeat,
            placeholder,
        }
    }

    pub fn painted_plaster() -> Self {
        Self::from_prefix(
            "textures/musicRoom/PaintedPlaster013_1K-JPG",
            [8.0, 4.0],
            0xb8b0a8,
        )
    }
}

/// A glTF model loaded once and cloned into every placement
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    pub path: PathBuf,
    pub name: String,
    pub placements: Vec<Transform>,
    /// Adds a collider around every placed copy
    pub solid: bool,
}

impl ModelSpec {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            placements: Vec::new(),
            solid: false,
        }
    }

    pub fn at(mut self, placement: Transform) -> Self {
        self.placements.push(placement);
        self
    }

    /// Position, uniform scale and XYZ euler rotation in one go
    pub fn placed(self, position: [f32; 3], scale: f32, rotation: [f32; 3]) -> Self {
        self.at(
            Transform::from_translation(Vec3::from_array(position))
                .with_uniform_scale(scale)
                .with_euler(rotation),
        )
    }

    pub fn solid(mut self) -> Self {
        self.solid = true;
        self
    }
}

/// A wall with its openings, placed in room space.
///
/// The wall's local frame is the one used by [`crate::geometry::wall`]: the
/// bottom edge sits on the local origin.
#[derive(Debug, Clone)]
pub struct WallSpec {
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub thickness: f32,
    pub openings: Vec<WallOpening>,
    pub transform: Transform,
}

impl WallSpec {
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            thickness: 0.0,
            openings: Vec::new(),
            transform: Transform::IDENTITY,
        }
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_opening(mut self, opening: WallOpening) -> Self {
        self.openings.push(opening);
        self
    }

    /// Foot of the wall at `position`, turned `rotation_y` about Y
    pub fn placed(mut self, position: Vec3, rotation_y: f32) -> Self {
        self.transform = Transform::from_translation(position).with_rotation_y(rotation_y);
        self
    }
}

/// Wall positions of a square room: back, front, left, right.
///
/// Each wall faces the room centre.
pub fn square_room_walls(dims: &RoomDimensions) -> [(&'static str, Vec3, f32); 4] {
    let half = dims.half_length();
    [
        ("back", Vec3::new(0.0, 0.0, -half), 0.0),
        ("front", Vec3::new(0.0, 0.0, half), PI),
        ("left", Vec3::new(-half, 0.0, 0.0), FRAC_PI_2),
        ("right", Vec3::new(half, 0.0, 0.0), -FRAC_PI_2),
    ]
}

/// What an outstanding asset request will be used for
#[derive(Debug, Clone)]
pub enum PendingAsset {
    Model(ModelSpec),
    Textures { label: String, material: Arc<Material> },
}

/// Minimum depth given to colliders of flat walls
const MIN_COLLIDER_DEPTH: f32 = 1.0;

/// Collects nodes, colliders and asset requests while a room is built
pub struct RoomContext {
    name: String,
    dims: RoomDimensions,
    group: Node,
    colliders: Vec<Collider>,
    surface: Option<SurfaceTextures>,
    surface_material: Option<Arc<Material>>,
    texture_requests: Vec<(SurfaceTextures, Arc<Material>, String)>,
    model_requests: Vec<ModelSpec>,
}

impl RoomContext {
    pub fn new(name: impl Into<String>, dims: RoomDimensions, surface: Option<SurfaceTextures>) -> Self {
        let name = name.into();
        Self {
            group: Node::group(name.clone()),
            name,
            dims,
            colliders: Vec::new(),
            surface,
            surface_material: None,
            texture_requests: Vec::new(),
            model_requests: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensions(&self) -> &RoomDimensions {
        &self.dims
    }

    pub fn group(&self) -> &Node {
        &self.group
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Double-sided material of the room's surface textures, shared by the
    /// floor and walls. Plain grey when the room has no surface textures.
    pub fn surface_material(&mut self) -> Arc<Material> {
        if let Some(material) = &self.surface_material {
            return Arc::clone(material);
        }
        let material = match self.surface.clone() {
            Some(textures) => {
                let label = format!("{}/surface", self.name);
                self.textured_material(&label, textures, true)
            }
            None => Arc::new(Material::color(format!("{}/surface", self.name), 0x808080).double_sided()),
        };
        self.surface_material = Some(Arc::clone(&material));
        material
    }

    /// Material whose colour and roughness maps are requested when the room
    /// is assembled
    pub fn textured_material(&mut self, label: &str, textures: SurfaceTextures, double_sided: bool) -> Arc<Material> {
        let mut material = Material::textured(label, textures.placeholder, textures.repeat);
        material.double_sided = double_sided;
        let material = Arc::new(material);
        self.texture_requests
            .push((textures, Arc::clone(&material), label.to_string()));
        material
    }

    pub fn add_mesh(&mut self, name: &str, mesh: MeshData, material: Arc<Material>, transform: Transform) {
        self.group
            .add_child(Node::mesh(name, Arc::new(mesh), material).with_transform(transform));
    }

    /// Floor plane of `width` x `depth` facing up at y = 0
    pub fn add_floor(&mut self, width: f32, depth: f32, material: Arc<Material>) {
        self.add_mesh(
            "floor",
            MeshData::plane(width, depth),
            material,
            Transform::IDENTITY.with_rotation_x(-FRAC_PI_2),
        );
    }

    /// Ceiling plane of `width` x `depth` facing down at `height`
    pub fn add_ceiling(&mut self, width: f32, depth: f32, height: f32, material: Arc<Material>) {
        self.add_mesh(
            "ceiling",
            MeshData::plane(width, depth),
            material,
            Transform::from_translation(Vec3::new(0.0, height, 0.0)).with_rotation_x(FRAC_PI_2),
        );
    }

    /// Adds the wall mesh and one collider per solid panel.
    ///
    /// Door openings are left out of the colliders; window openings are
    /// visual only and stay solid.
    pub fn add_wall(&mut self, wall: WallSpec, material: Arc<Material>) {
        let mesh = wall_with_openings(wall.width, wall.height, wall.thickness, &wall.openings);
        let matrix = wall.transform.matrix();

        let doors: Vec<WallOpening> = wall
            .openings
            .iter()
            .filter(|opening| opening.kind == OpeningKind::Door)
            .copied()
            .collect();
        let depth = wall.thickness.max(MIN_COLLIDER_DEPTH);
        for (index, panel) in wall_panels(wall.width, wall.height, &doors).iter().enumerate() {
            let local = AABB::from_center_size(panel.center(), Vec3::new(panel.width(), panel.height(), depth));
            self.colliders.push(Collider::new(
                local.transformed(&matrix),
                format!("{}/{}/{}", self.name, wall.name, index),
            ));
        }

        self.group.add_child(
            Node::mesh(wall.name.clone(), Arc::new(mesh), material).with_transform(wall.transform),
        );
    }

    pub fn add_point_light(&mut self, name: &str, light: PointLight, position: Vec3) {
        self.group
            .add_child(Node::point_light(name, light).with_transform(Transform::from_translation(position)));
    }

    pub fn add_ambient_light(&mut self, light: AmbientLight) {
        self.group.add_child(Node::ambient_light("ambient", light));
    }

    pub fn request_model(&mut self, spec: ModelSpec) {
        self.model_requests.push(spec);
    }

    /// Issues every collected request and hands over the built room
    pub fn finish(self, loader: &mut AssetLoader) -> RoomInstance {
        let mut pending = HashMap::new();

        for (textures, material, label) in self.texture_requests {
            let id = loader.request(AssetRequest::texture_set(textures.color, textures.roughness));
            pending.insert(id, PendingAsset::Textures { label, material });
        }
        for spec in self.model_requests {
            if spec.placements.is_empty() {
                log::warn!("Model {} has no placements, skipping", spec.name);
                continue;
            }
            let id = loader.request(AssetRequest::model(spec.path.clone(), spec.name.clone()));
            pending.insert(id, PendingAsset::Model(spec));
        }

        log::info!(
            "{}: {} meshes, {} lights, {} colliders, {} assets requested",
            self.name,
            self.group.mesh_count(),
            self.group.light_count(),
            self.colliders.len(),
            pending.len()
        );

        RoomInstance {
            name: self.name,
            group: self.group,
            colliders: self.colliders,
            pending,
            world: Mat4::IDENTITY,
        }
    }
}

/// A built room: its node group, world-space colliders and outstanding loads
#[derive(Debug)]
pub struct RoomInstance {
    pub name: String,
    pub group: Node,
    pub colliders: Vec<Collider>,
    pub pending: HashMap<RequestId, PendingAsset>,
    world: Mat4,
}

impl RoomInstance {
    /// Moves the room (and its colliders) into world space
    pub fn place(mut self, transform: Transform) -> Self {
        let matrix = transform.matrix();
        self.group.transform = transform;
        self.colliders = self
            .colliders
            .iter()
            .map(|collider| collider.transformed(&matrix))
            .collect();
        self.world = matrix;
        self
    }

    /// Room space to world space
    pub fn world_matrix(&self) -> Mat4 {
        self.world
    }

    pub fn is_loaded(&self) -> bool {
        self.pending.is_empty()
    }
}

/// The abstract room every themed room builds on.
///
/// Implementors provide the walls and the furnishing list; floor, ceiling
/// and the four wall lamps come with sensible defaults.
pub trait Room {
    fn name(&self) -> &str;

    fn dimensions(&self) -> RoomDimensions {
        RoomDimensions::BASE
    }

    fn surface_textures(&self) -> Option<SurfaceTextures> {
        Some(SurfaceTextures::painted_plaster())
    }

    fn build_floor(&self, ctx: &mut RoomContext) {
        let length = ctx.dimensions().wall_length;
        let material = ctx.surface_material();
        ctx.add_floor(length, length, material);
    }

    fn build_walls(&self, ctx: &mut RoomContext);

    fn build_ceiling(&self, ctx: &mut RoomContext) {
        let dims = *ctx.dimensions();
        let material = Arc::new(Material::color(format!("{}/ceiling", ctx.name()), 0xaaaaaa).double_sided());
        ctx.add_ceiling(dims.wall_length, dims.wall_length, dims.ceiling_height, material);
    }

    fn build_lighting(&self, ctx: &mut RoomContext) {
        add_wall_lamps(ctx, "models/lobby/low_poly_psx_wall_lamp.glb", 80.0);
    }

    fn models(&self) -> Vec<ModelSpec>;

    fn ambient_light(&self) -> Option<AmbientLight> {
        None
    }
}

pub const LAMP_COLOR: u32 = 0xffa500;
pub const LAMP_INTENSITY: f32 = 500.0;

/// One lamp on the middle of each wall at 2/3 of the ceiling height, each
/// with an orange point light of the given `range`
pub fn add_wall_lamps(ctx: &mut RoomContext, model: &str, range: f32) {
    let dims = *ctx.dimensions();
    let mut lamps = ModelSpec::new(model, "wall_lamp");
    for (wall, foot, rotation) in square_room_walls(&dims) {
        let position = Vec3::new(foot.x, dims.lamp_height(), foot.z);
        ctx.add_point_light(
            &format!("lamp_light/{}", wall),
            PointLight::new(LAMP_COLOR, LAMP_INTENSITY, range),
            position,
        );
        lamps = lamps.at(
            Transform::from_translation(position)
                .with_uniform_scale(30.0)
                .with_rotation_y(rotation),
        );
    }
    ctx.request_model(lamps);
}

/// Runs the build steps of `room` and requests its assets
pub fn assemble(room: &dyn Room, loader: &mut AssetLoader) -> RoomInstance {
    let mut ctx = RoomContext::new(room.name(), room.dimensions(), room.surface_textures());
    room.build_floor(&mut ctx);
    room.build_walls(&mut ctx);
    room.build_ceiling(&mut ctx);
    room.build_lighting(&mut ctx);
    if let Some(ambient) = room.ambient_light() {
        ctx.add_ambient_light(ambient);
    }
    for spec in room.models() {
        ctx.request_model(spec);
    }
    ctx.finish(loader)
}

/// What the scene manager can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    Lobby,
    MusicRoom,
    PainterRoom,
    LiteraryRoom,
    /// Every room at once, connected to the lobby
    Museum,
}

impl SceneKind {
    pub const ALL: [SceneKind; 5] = [
        SceneKind::Lobby,
        SceneKind::MusicRoom,
        SceneKind::PainterRoom,
        SceneKind::LiteraryRoom,
        SceneKind::Museum,
    ];

    /// Keys 1-5
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1..=5 => Some(Self::ALL[(digit - 1) as usize]),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SceneKind::Lobby => "lobby",
            SceneKind::MusicRoom => "music_room",
            SceneKind::PainterRoom => "painter_room",
            SceneKind::LiteraryRoom => "literary_room",
            SceneKind::Museum => "museum",
        }
    }

    /// Rooms making up this scene with their world placement
    pub fn rooms(&self) -> Vec<RoomPlacement> {
        match self {
            SceneKind::Lobby => vec![RoomPlacement::origin(Box::new(Lobby::default()))],
            SceneKind::MusicRoom => vec![RoomPlacement::origin(Box::new(MusicRoom))],
            SceneKind::PainterRoom => vec![RoomPlacement::origin(Box::new(PainterRoom))],
            SceneKind::LiteraryRoom => vec![RoomPlacement::origin(Box::new(LiteraryRoom))],
            SceneKind::Museum => museum_layout(),
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneKind {
    type Err = UnknownScene;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized || kind.as_str().trim_end_matches("_room") == normalized)
            .ok_or_else(|| UnknownScene(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_kind_parses_names_and_digits() {
        assert_eq!("music".parse::<SceneKind>().unwrap(), SceneKind::MusicRoom);
        assert_eq!("painter-room".parse::<SceneKind>().unwrap(), SceneKind::PainterRoom);
        assert_eq!("Museum".parse::<SceneKind>().unwrap(), SceneKind::Museum);
        assert!("attic".parse::<SceneKind>().is_err());

        assert_eq!(SceneKind::from_digit(1), Some(SceneKind::Lobby));
        assert_eq!(SceneKind::from_digit(4), Some(SceneKind::LiteraryRoom));
        assert_eq!(SceneKind::from_digit(0), None);
        assert_eq!(SceneKind::from_digit(6), None);
    }

    #[test]
    fn square_walls_face_the_centre() {
        for (_, foot, rotation) in square_room_walls(&RoomDimensions::BASE) {
            let facing = Transform::IDENTITY.with_rotation_y(rotation).matrix().transform_vector3(Vec3::Z);
            let to_centre = (-foot).normalize();
            assert!(facing.dot(to_centre) > 0.99, "{:?} faces {:?}", foot, facing);
        }
    }

    #[test]
    fn wall_colliders_skip_doors_but_not_windows() {
        let mut ctx = RoomContext::new("test", RoomDimensions::BASE, None);
        let material = ctx.surface_material();
        ctx.add_wall(
            WallSpec::new("door", 200.0, 100.0).with_opening(WallOpening::door(0.0, 19.0, 45.0)),
            Arc::clone(&material),
        );
        assert_eq!(ctx.colliders().len(), 3);

        let mut ctx = RoomContext::new("test", RoomDimensions::BASE, None);
        ctx.add_wall(
            WallSpec::new("window", 200.0, 100.0).with_opening(WallOpening::window(0.0, 50.0, 32.0, 55.0)),
            material,
        );
        assert_eq!(ctx.colliders().len(), 1);
        assert_eq!(ctx.group().mesh_count(), 1);
    }

    #[test]
    fn surface_material_is_shared_and_requested_once() {
        let mut loader = AssetLoader::new("no-such-asset-root");
        let mut ctx = RoomContext::new("test", RoomDimensions::BASE, Some(SurfaceTextures::painted_plaster()));
        let a = ctx.surface_material();
        let b = ctx.surface_material();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.double_sided);

        let instance = ctx.finish(&mut loader);
        assert_eq!(instance.pending.len(), 1);
    }

    #[test]
    fn placing_moves_group_and_colliders() {
        let mut loader = AssetLoader::new("no-such-asset-root");
        let mut ctx = RoomContext::new("test", RoomDimensions::BASE, None);
        let material = ctx.surface_material();
        ctx.add_wall(WallSpec::new("w", 10.0, 10.0), material);
        let local = ctx.colliders()[0].bounds;

        let offset = Vec3::new(202.0, 0.0, 140.5);
        let placed = ctx.finish(&mut loader).place(Transform::from_translation(offset));
        assert_eq!(placed.group.transform.translation, offset);
        assert_eq!(placed.colliders[0].bounds, local.translated(offset));
        assert_eq!(placed.world_matrix(), Mat4::from_translation(offset));
    }
}
