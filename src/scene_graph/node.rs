use glam::Mat4;
use std::sync::Arc;

use crate::geometry::MeshData;
use crate::math::{Transform, AABB};

use super::light::{AmbientLight, PointLight};
use super::material::Material;

#[derive(Debug, Clone)]
pub enum NodeKind {
    Group,
    Mesh {
        mesh: Arc<MeshData>,
        material: Arc<Material>,
    },
    PointLight(PointLight),
    AmbientLight(AmbientLight),
}

/// Scene graph node. Cloning shares mesh and material data.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            kind,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, mesh: Arc<MeshData>, material: Arc<Material>) -> Self {
        Self::with_kind(name, NodeKind::Mesh { mesh, material })
    }

    pub fn point_light(name: impl Into<String>, light: PointLight) -> Self {
        Self::with_kind(name, NodeKind::PointLight(light))
    }

    pub fn ambient_light(name: impl Into<String>, light: AmbientLight) -> Self {
        Self::with_kind(name, NodeKind::AmbientLight(light))
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Detaches every child, returns how many were removed
    pub fn clear_children(&mut self) -> usize {
        let removed = self.children.len();
        self.children.clear();
        removed
    }

    /// Depth-first search by name, including `self`
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(name))
    }

    /// Visits every node with its world matrix, parents before children
    pub fn traverse<F: FnMut(&Node, &Mat4)>(&self, visit: &mut F) {
        self.traverse_from(&Mat4::IDENTITY, visit);
    }

    fn traverse_from<F: FnMut(&Node, &Mat4)>(&self, parent: &Mat4, visit: &mut F) {
        let world = *parent * self.transform.matrix();
        visit(self, &world);
        for child in &self.children {
            child.traverse_from(&world, visit);
        }
    }

    pub fn mesh_count(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |node, _| {
            if matches!(node.kind, NodeKind::Mesh { .. }) {
                count += 1;
            }
        });
        count
    }

    pub fn light_count(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |node, _| {
            if matches!(node.kind, NodeKind::PointLight(_) | NodeKind::AmbientLight(_)) {
                count += 1;
            }
        });
        count
    }

    /// Bounds of every mesh below this node, in the node's parent space
    pub fn bounds(&self) -> Option<AABB> {
        let mut bounds: Option<AABB> = None;
        self.traverse(&mut |node, world| {
            if let NodeKind::Mesh { mesh, .. } = &node.kind {
                if let Some(local) = mesh.bounds() {
                    let placed = local.transformed(world);
                    bounds = Some(bounds.map_or(placed, |b| b.union(&placed)));
                }
            }
        });
        bounds
    }
}
