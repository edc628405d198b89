use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use crate::geometry::{MeshData, MeshId};
use crate::scene_graph::{DrawItem, Material, MaterialId};

use super::gpu_types::InstanceRaw;

/// Draws sharing one mesh and one material, issued as a single instanced call
#[derive(Debug, Clone)]
pub struct Batch {
    pub mesh: Arc<MeshData>,
    pub material: Arc<Material>,
    pub instances: Range<u32>,
}

impl Batch {
    pub fn mesh_id(&self) -> MeshId {
        self.mesh.id()
    }

    pub fn material_id(&self) -> MaterialId {
        self.material.id()
    }

    pub fn index_count(&self) -> u32 {
        self.mesh.indices.len() as u32
    }
}

/// Groups draws by (mesh, material) in first-seen order.
///
/// Instances of a batch are contiguous in the returned instance array.
pub fn build_batches(draws: &[DrawItem]) -> (Vec<Batch>, Vec<InstanceRaw>) {
    let mut groups: Vec<(&DrawItem, Vec<InstanceRaw>)> = Vec::new();
    let mut index: HashMap<(MeshId, MaterialId), usize> = HashMap::new();

    for draw in draws {
        let key = (draw.mesh.id(), draw.material.id());
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push((draw, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(InstanceRaw::new(&draw.world));
    }

    let mut batches = Vec::with_capacity(groups.len());
    let mut instances = Vec::with_capacity(draws.len());
    for (first, group) in groups {
        let start = instances.len() as u32;
        instances.extend(group);
        batches.push(Batch {
            mesh: Arc::clone(&first.mesh),
            material: Arc::clone(&first.material),
            instances: start..instances.len() as u32,
        });
    }
    (batches, instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    fn draw(mesh: &Arc<MeshData>, material: &Arc<Material>, x: f32) -> DrawItem {
        DrawItem {
            mesh: Arc::clone(mesh),
            material: Arc::clone(material),
            world: Mat4::from_translation(Vec3::new(x, 0.0, 0.0)),
        }
    }

    #[test]
    fn shared_mesh_and_material_collapse() {
        let wall = Arc::new(MeshData::plane(10.0, 10.0));
        let lamp = Arc::new(MeshData::cuboid(1.0, 1.0, 1.0));
        let plaster = Arc::new(Material::color("plaster", 0xffffff));
        let brass = Arc::new(Material::color("brass", 0xffa500));

        let draws = vec![
            draw(&wall, &plaster, 0.0),
            draw(&lamp, &brass, 1.0),
            draw(&wall, &plaster, 2.0),
            draw(&wall, &brass, 3.0),
            draw(&lamp, &brass, 4.0),
        ];
        let (batches, instances) = build_batches(&draws);

        assert_eq!(batches.len(), 3);
        assert_eq!(instances.len(), 5);
        assert_eq!(batches[0].instances, 0..2);
        assert_eq!(batches[1].instances, 2..4);
        assert_eq!(batches[2].instances, 4..5);
        // Wall instances keep their order inside the batch
        assert_eq!(instances[1].model[3][0], 2.0);
        assert_eq!(batches[1].mesh_id(), lamp.id());
    }

    #[test]
    fn empty_input() {
        let (batches, instances) = build_batches(&[]);
        assert!(batches.is_empty());
        assert!(instances.is_empty());
    }
}
