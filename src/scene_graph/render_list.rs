use glam::{Mat4, Vec3};
use std::sync::Arc;

use crate::geometry::MeshData;

use super::light::PointLight;
use super::material::Material;
use super::node::{Node, NodeKind};

#[derive(Debug, Clone)]
pub struct DrawItem {
    pub mesh: Arc<MeshData>,
    pub material: Arc<Material>,
    pub world: Mat4,
}

#[derive(Debug, Clone, Copy)]
pub struct LightItem {
    pub position: Vec3,
    pub light: PointLight,
}

/// Flattened view of a scene graph for one frame
#[derive(Debug, Default)]
pub struct RenderList {
    pub draws: Vec<DrawItem>,
    pub point_lights: Vec<LightItem>,
    pub ambient: [f32; 3],
}

impl RenderList {
    pub fn collect(root: &Node) -> Self {
        let mut list = Self::default();
        root.traverse(&mut |node, world| match &node.kind {
            NodeKind::Group => {}
            NodeKind::Mesh { mesh, material } => {
                if !mesh.is_empty() {
                    list.draws.push(DrawItem {
                        mesh: Arc::clone(mesh),
                        material: Arc::clone(material),
                        world: *world,
                    });
                }
            }
            NodeKind::PointLight(light) => list.point_lights.push(LightItem {
                position: world.transform_point3(Vec3::ZERO),
                light: *light,
            }),
            NodeKind::AmbientLight(light) => {
                let radiance = light.radiance();
                for (sum, add) in list.ambient.iter_mut().zip(radiance) {
                    *sum += add;
                }
            }
        });
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Transform;
    use crate::scene_graph::AmbientLight;

    #[test]
    fn collects_meshes_lights_and_ambient() {
        let mut root = Node::group("root");
        let mut room = Node::group("room")
            .with_transform(Transform::from_translation(Vec3::new(-202.0, 0.0, 140.5)));
        room.add_child(Node::mesh(
            "floor",
            Arc::new(MeshData::plane(200.0, 200.0)),
            Arc::new(Material::color("floor", 0xffffff)),
        ));
        room.add_child(
            Node::point_light("lamp", PointLight::new(0xffa500, 500.0, 80.0))
                .with_transform(Transform::from_translation(Vec3::new(0.0, 66.0, -100.0))),
        );
        root.add_child(room);
        root.add_child(Node::ambient_light("ambient", AmbientLight::new(0xffffff, 0.1)));
        root.add_child(Node::ambient_light("ambient2", AmbientLight::new(0xffffff, 0.1)));

        let list = RenderList::collect(&root);
        assert_eq!(list.draws.len(), 1);
        assert_eq!(list.point_lights.len(), 1);
        assert_eq!(list.point_lights[0].position, Vec3::new(-202.0, 66.0, 40.5));
        assert!((list.ambient[0] - 0.2).abs() < 1e-5);
    }

    #[test]
    fn skips_empty_meshes() {
        let mut root = Node::group("root");
        root.add_child(Node::mesh(
            "empty",
            Arc::new(MeshData::new(Vec::new(), Vec::new())),
            Arc::new(Material::color("m", 0xffffff)),
        ));
        assert!(RenderList::collect(&root).draws.is_empty());
    }
}
