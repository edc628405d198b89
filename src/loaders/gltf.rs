use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use std::path::Path;
use std::sync::Arc;

use crate::error::AssetError;
use crate::geometry::{MeshData, Vertex};
use crate::math::Transform;
use crate::scene_graph::{Material, Node, Texture, TextureSlot};

const DEFAULT_COLOR: [f32; 4] = [0.7, 0.7, 0.7, 1.0];

/// Loads a glTF/GLB file into a node tree.
///
/// Node transforms are kept as child transforms, every primitive becomes a
/// mesh node, and materials carry the PBR base colour factor and texture.
pub fn load_gltf_model(path: impl AsRef<Path>) -> Result<Node> {
    let path = path.as_ref();
    log::debug!("Loading glTF model {:?}", path);

    let (document, buffers, images) =
        gltf::import(path).context(format!("Failed to load glTF file: {:?}", path))?;

    log::debug!(
        "{:?}: {} nodes, {} meshes, {} materials, {} images",
        path,
        document.nodes().count(),
        document.meshes().count(),
        document.materials().count(),
        images.len()
    );

    let textures: Vec<Arc<Texture>> = images.iter().map(|image| Arc::new(to_rgba(image))).collect();

    let materials: Vec<Arc<Material>> = document
        .materials()
        .enumerate()
        .map(|(index, material)| Arc::new(convert_material(index, &material, &textures)))
        .collect();
    let fallback = Arc::new(Material::from_linear("default", DEFAULT_COLOR));

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| AssetError::EmptyModel {
            path: path.to_path_buf(),
        })?;

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    let mut root = Node::group(name);

    let context = ImportContext {
        buffers: &buffers,
        materials: &materials,
        fallback: &fallback,
    };
    for node in scene.nodes() {
        root.add_child(context.convert_node(&node)?);
    }

    if root.mesh_count() == 0 {
        return Err(AssetError::EmptyModel {
            path: path.to_path_buf(),
        }
        .into());
    }

    log::debug!("{:?}: {} mesh nodes", path, root.mesh_count());
    Ok(root)
}

struct ImportContext<'a> {
    buffers: &'a [gltf::buffer::Data],
    materials: &'a [Arc<Material>],
    fallback: &'a Arc<Material>,
}

impl ImportContext<'_> {
    fn convert_node(&self, node: &gltf::Node) -> Result<Node> {
        let name = node
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("node{}", node.index()));
        let transform = Transform::from(Mat4::from_cols_array_2d(&node.transform().matrix()));
        let mut converted = Node::group(name.clone()).with_transform(transform);

        if let Some(mesh) = node.mesh() {
            for primitive in mesh.primitives() {
                if primitive.mode() != gltf::mesh::Mode::Triangles {
                    log::warn!("Skipping non-triangle primitive in {}", name);
                    continue;
                }
                let data = self.read_primitive(&primitive)?;
                let material = primitive
                    .material()
                    .index()
                    .and_then(|index| self.materials.get(index))
                    .unwrap_or(self.fallback);
                converted.add_child(Node::mesh(
                    format!("{}/{}", name, primitive.index()),
                    Arc::new(data),
                    Arc::clone(material),
                ));
            }
        }

        for child in node.children() {
            converted.add_child(self.convert_node(&child)?);
        }
        Ok(converted)
    }

    fn read_primitive(&self, primitive: &gltf::Primitive) -> Result<MeshData> {
        let reader = primitive.reader(|buffer| self.buffers.get(buffer.index()).map(|d| &d.0[..]));

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .context("Mesh primitive has no positions")?
            .collect();

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let normals: Vec<[f32; 3]> = match reader.read_normals() {
            Some(normals) => normals.collect(),
            None => compute_normals(&positions, &indices),
        };

        let uvs: Vec<[f32; 2]> = match reader.read_tex_coords(0) {
            Some(uvs) => uvs.into_f32().collect(),
            None => vec![[0.0, 0.0]; positions.len()],
        };

        let vertices = positions
            .iter()
            .enumerate()
            .map(|(i, position)| {
                Vertex::new(
                    *position,
                    normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                    uvs.get(i).copied().unwrap_or([0.0, 0.0]),
                )
            })
            .collect();

        Ok(MeshData::new(vertices, indices))
    }
}

fn convert_material(index: usize, material: &gltf::Material, textures: &[Arc<Texture>]) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let name = material
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("material{}", index));

    let mut converted =
        Material::from_linear(name, pbr.base_color_factor()).with_roughness(pbr.roughness_factor());
    converted.double_sided = material.double_sided();

    if let Some(info) = pbr.base_color_texture() {
        let source = info.texture().source().index();
        match textures.get(source) {
            Some(texture) => converted.base_color_texture = TextureSlot::ready(Arc::clone(texture)),
            None => log::warn!("Material {} references missing image {}", index, source),
        }
    }
    converted
}

/// Converts decoded glTF image data to RGBA8
fn to_rgba(image: &gltf::image::Data) -> Texture {
    use gltf::image::Format;

    let data = match image.format {
        Format::R8G8B8A8 => image.pixels.clone(),
        Format::R8G8B8 => image
            .pixels
            .chunks(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
            .collect(),
        Format::R8G8 => image
            .pixels
            .chunks(2)
            .flat_map(|rg| [rg[0], rg[1], 0, 255])
            .collect(),
        Format::R8 => image.pixels.iter().flat_map(|&r| [r, r, r, 255]).collect(),
        other => {
            log::warn!("Unsupported texture format {:?}, using white", other);
            vec![255; (image.width * image.height * 4) as usize]
        }
    };
    Texture::new(image.width, image.height, data)
}

/// Area-weighted vertex normals for primitives that ship without them
fn compute_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let pa = Vec3::from_array(positions[a]);
        let face = (Vec3::from_array(positions[b]) - pa).cross(Vec3::from_array(positions[c]) - pa);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}
