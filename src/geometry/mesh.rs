use glam::{Mat3, Mat4, Vec3};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::math::AABB;

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique mesh identity, used by the renderer to cache GPU buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u64);

impl MeshId {
    fn next() -> Self {
        Self(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Vertex layout shared by every mesh and the GPU pipeline
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }
}

/// Indexed triangle mesh on the CPU side
#[derive(Clone)]
pub struct MeshData {
    id: MeshId,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl fmt::Debug for MeshData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshData")
            .field("id", &self.id)
            .field("vertices", &self.vertices.len())
            .field("triangles", &self.triangle_count())
            .finish()
    }
}

impl MeshData {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            id: MeshId::next(),
            vertices,
            indices,
        }
    }

    pub fn id(&self) -> MeshId {
        self.id
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Flat rectangle in the XY plane centred on the origin, facing +Z
    pub fn plane(width: f32, height: f32) -> Self {
        let mut builder = QuadBuilder::default();
        builder.quad(
            Vec3::ZERO,
            Vec3::new(width * 0.5, 0.0, 0.0),
            Vec3::new(0.0, height * 0.5, 0.0),
        );
        builder.finish()
    }

    /// Axis-aligned box centred on the origin
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);
        let mut builder = QuadBuilder::default();

        builder.quad(Vec3::new(0.0, 0.0, hd), Vec3::X * hw, Vec3::Y * hh);
        builder.quad(Vec3::new(0.0, 0.0, -hd), Vec3::NEG_X * hw, Vec3::Y * hh);
        builder.quad(Vec3::new(hw, 0.0, 0.0), Vec3::NEG_Z * hd, Vec3::Y * hh);
        builder.quad(Vec3::new(-hw, 0.0, 0.0), Vec3::Z * hd, Vec3::Y * hh);
        builder.quad(Vec3::new(0.0, hh, 0.0), Vec3::X * hw, Vec3::NEG_Z * hd);
        builder.quad(Vec3::new(0.0, -hh, 0.0), Vec3::X * hw, Vec3::Z * hd);

        builder.finish()
    }

    /// Copy of the mesh with positions and normals baked through `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let normal_matrix = Mat3::from_mat4(*matrix).inverse().transpose();
        let vertices = self
            .vertices
            .iter()
            .map(|v| {
                let position = matrix.transform_point3(Vec3::from_array(v.position));
                let normal = (normal_matrix * Vec3::from_array(v.normal)).normalize_or_zero();
                Vertex::new(position.to_array(), normal.to_array(), v.uv)
            })
            .collect();

        Self::new(vertices, self.indices.clone())
    }

    /// Concatenate meshes into one, reindexing as needed
    pub fn merge<'a>(meshes: impl IntoIterator<Item = &'a MeshData>) -> Self {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for mesh in meshes {
            let base = vertices.len() as u32;
            vertices.extend_from_slice(&mesh.vertices);
            indices.extend(mesh.indices.iter().map(|i| i + base));
        }

        Self::new(vertices, indices)
    }

    pub fn bounds(&self) -> Option<AABB> {
        AABB::from_points(self.vertices.iter().map(|v| Vec3::from_array(v.position)))
    }
}

/// Accumulates quads given by centre and half-extent axes
#[derive(Default)]
struct QuadBuilder {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl QuadBuilder {
    /// `u` points right, `v` points up; the face normal is `u × v`
    fn quad(&mut self, center: Vec3, u: Vec3, v: Vec3) {
        let normal = u.cross(v).normalize_or_zero().to_array();
        let base = self.vertices.len() as u32;

        let corners = [
            (center - u + v, [0.0, 0.0]),
            (center + u + v, [1.0, 0.0]),
            (center - u - v, [0.0, 1.0]),
            (center + u - v, [1.0, 1.0]),
        ];
        self.vertices.extend(
            corners
                .iter()
                .map(|(p, uv)| Vertex::new(p.to_array(), normal, *uv)),
        );
        self.indices
            .extend_from_slice(&[base, base + 2, base + 1, base + 2, base + 3, base + 1]);
    }

    fn finish(self) -> MeshData {
        MeshData::new(self.vertices, self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(mesh: &MeshData, tri: usize) -> Vec3 {
        let p = |i: usize| Vec3::from_array(mesh.vertices[mesh.indices[tri * 3 + i] as usize].position);
        (p(1) - p(0)).cross(p(2) - p(0)).normalize()
    }

    #[test]
    fn plane_faces_positive_z() {
        let plane = MeshData::plane(4.0, 2.0);
        assert_eq!(plane.vertices.len(), 4);
        assert_eq!(plane.triangle_count(), 2);
        assert!((face_normal(&plane, 0) - Vec3::Z).length() < 1e-5);
        assert!((face_normal(&plane, 1) - Vec3::Z).length() < 1e-5);

        let bounds = plane.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-2.0, -1.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn cuboid_winding_matches_stored_normals() {
        let cube = MeshData::cuboid(2.0, 4.0, 6.0);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.triangle_count(), 12);

        for tri in 0..cube.triangle_count() {
            let stored = Vec3::from_array(cube.vertices[cube.indices[tri * 3] as usize].normal);
            assert!((face_normal(&cube, tri) - stored).length() < 1e-5, "triangle {tri}");
        }

        let bounds = cube.bounds().unwrap();
        assert_eq!(bounds.size(), Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn merge_offsets_indices() {
        let a = MeshData::plane(1.0, 1.0);
        let b = MeshData::plane(1.0, 1.0);
        let merged = MeshData::merge([&a, &b]);

        assert_eq!(merged.vertices.len(), 8);
        assert_eq!(merged.indices.len(), 12);
        assert!(merged.indices[6..].iter().all(|&i| i >= 4));
        assert_ne!(merged.id(), a.id());
    }

    #[test]
    fn transformed_rotates_normals() {
        let plane = MeshData::plane(2.0, 2.0)
            .transformed(&Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2));
        let normal = Vec3::from_array(plane.vertices[0].normal);
        assert!((normal - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn ids_are_unique() {
        let a = MeshData::plane(1.0, 1.0);
        let b = a.clone();
        let c = MeshData::plane(1.0, 1.0);
        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
    }
}
