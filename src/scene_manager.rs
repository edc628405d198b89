use glam::Mat4;
use std::collections::HashMap;
use std::sync::Arc;

use crate::collision::Collider;
use crate::loaders::{AssetEvent, AssetLoader, RequestId};
use crate::rooms::{assemble, ModelSpec, PendingAsset, RoomInstance, RoomPlacement, SceneKind};
use crate::scene_graph::{AmbientLight, Node};

const GLOBAL_AMBIENT_COLOR: u32 = 0xffffff;
const GLOBAL_AMBIENT_INTENSITY: f32 = 0.1;

/// Bookkeeping for a room attached under the root
struct ActiveRoom {
    name: String,
    /// Index of the room's group among the root's children
    node: usize,
    world: Mat4,
    pending: HashMap<RequestId, PendingAsset>,
    elapsed: f32,
    announced: bool,
}

/// Owns the scene graph root and swaps which rooms hang below it.
///
/// Switching scenes tears down every child of the root at once. Asset loads
/// still running for the old scene become stale: their results are dropped
/// when they arrive.
pub struct SceneManager {
    loader: AssetLoader,
    root: Node,
    active: Option<SceneKind>,
    rooms: Vec<ActiveRoom>,
    colliders: Vec<Collider>,
    stale_dropped: usize,
}

impl SceneManager {
    pub fn new(loader: AssetLoader) -> Self {
        Self {
            loader,
            root: Node::group("scene"),
            active: None,
            rooms: Vec::new(),
            colliders: Vec::new(),
            stale_dropped: 0,
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn active(&self) -> Option<SceneKind> {
        self.active
    }

    /// World-space colliders of every attached room
    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Asset requests of the current scene that have not completed
    pub fn pending_count(&self) -> usize {
        self.rooms.iter().map(|room| room.pending.len()).sum()
    }

    pub fn room_names(&self) -> impl Iterator<Item = &str> {
        self.rooms.iter().map(|room| room.name.as_str())
    }

    /// Whether every asset request of the named room has completed
    pub fn is_loaded(&self, room: &str) -> bool {
        self.rooms
            .iter()
            .any(|active| active.name == room && active.announced)
    }

    /// Results that arrived for a scene that was already gone
    pub fn stale_dropped(&self) -> usize {
        self.stale_dropped
    }

    pub fn set_scene(&mut self, kind: SceneKind) {
        log::info!("Switching to scene {}", kind);
        self.show_rooms(kind.rooms());
        self.active = Some(kind);
    }

    /// Replaces everything below the root with `placements`
    pub fn show_rooms(&mut self, placements: Vec<RoomPlacement>) {
        let removed = self.root.clear_children();
        self.rooms.clear();
        self.colliders.clear();
        self.active = None;
        if removed > 0 {
            log::debug!("Removed {} nodes from the scene root", removed);
        }

        self.root.add_child(Node::ambient_light(
            "global_ambient",
            AmbientLight::new(GLOBAL_AMBIENT_COLOR, GLOBAL_AMBIENT_INTENSITY),
        ));

        for placement in placements {
            let instance = assemble(placement.room.as_ref(), &mut self.loader).place(placement.transform);
            self.attach(instance);
        }
    }

    fn attach(&mut self, instance: RoomInstance) {
        let world = instance.world_matrix();
        let RoomInstance {
            name,
            group,
            colliders,
            pending,
            ..
        } = instance;

        self.colliders.extend(colliders);
        self.root.add_child(group);
        self.rooms.push(ActiveRoom {
            name,
            node: self.root.children.len() - 1,
            world,
            pending,
            elapsed: 0.0,
            announced: false,
        });
    }

    /// Applies every asset result that arrived since the last frame
    pub fn update(&mut self, dt: f32) {
        for room in &mut self.rooms {
            room.elapsed += dt;
        }
        for event in self.loader.poll() {
            self.handle_event(event);
        }
        self.announce_loaded();
    }

    /// Blocks until every outstanding request, stale ones included, has
    /// reported back
    pub fn finish_loading(&mut self) {
        while let Some(event) = self.loader.poll_blocking() {
            self.handle_event(event);
        }
        self.announce_loaded();
    }

    fn handle_event(&mut self, event: AssetEvent) {
        let id = event.id();
        let Some(index) = self.rooms.iter().position(|room| room.pending.contains_key(&id)) else {
            log::debug!("Dropping stale asset result {}", id);
            self.stale_dropped += 1;
            return;
        };
        let Some(pending) = self.rooms[index].pending.remove(&id) else {
            return;
        };

        match (event, pending) {
            (AssetEvent::ModelLoaded { model, .. }, PendingAsset::Model(spec)) => {
                self.place_model(index, &spec, model);
            }
            (AssetEvent::TextureSetLoaded { set, .. }, PendingAsset::Textures { label, material }) => {
                material.base_color_texture.fill(Arc::new(set.color));
                material.roughness_texture.fill(Arc::new(set.roughness));
                log::debug!("{}: textures applied to {}", self.rooms[index].name, label);
            }
            (AssetEvent::Failed { error, .. }, _) => {
                log::warn!("{}: going on without an asset ({})", self.rooms[index].name, error);
            }
            (event, _) => {
                log::warn!("Asset result {} does not match its request", event.id());
            }
        }
    }

    /// Clones `model` into every placement of `spec`
    fn place_model(&mut self, index: usize, spec: &ModelSpec, model: Node) {
        let room = &self.rooms[index];
        let Some(group) = self.root.children.get_mut(room.node) else {
            return;
        };

        for (i, placement) in spec.placements.iter().enumerate() {
            let mut copy = model.clone().with_transform(*placement);
            copy.name = if spec.placements.len() > 1 {
                format!("{}/{}", spec.name, i)
            } else {
                spec.name.clone()
            };

            if spec.solid {
                if let Some(bounds) = copy.bounds() {
                    self.colliders.push(Collider::new(
                        bounds.transformed(&room.world),
                        format!("{}/{}", room.name, copy.name),
                    ));
                }
            }
            group.add_child(copy);
        }
        log::debug!("{}: placed {} x{}", room.name, spec.name, spec.placements.len());
    }

    fn announce_loaded(&mut self) {
        for room in &mut self.rooms {
            if !room.announced && room.pending.is_empty() {
                room.announced = true;
                log::info!("{} loaded! ({:.1}s)", room.name, room.elapsed);
            }
        }
    }
}
