use glam::{Mat3, Mat4};

use crate::geometry::Vertex;
use crate::scene_graph::{Material, RenderList};

/// Point lights past this count in traversal order are not shaded
pub const MAX_POINT_LIGHTS: usize = 32;

/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub _pad: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightData {
    pub position: [f32; 3],
    pub range: f32,
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Ambient term plus a fixed-size array of point lights
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    pub ambient: [f32; 3],
    pub count: u32,
    pub lights: [PointLightData; MAX_POINT_LIGHTS],
}

impl LightsUniform {
    pub fn from_render_list(list: &RenderList) -> Self {
        let mut uniform = Self {
            ambient: list.ambient,
            count: 0,
            lights: [PointLightData::default(); MAX_POINT_LIGHTS],
        };
        if list.point_lights.len() > MAX_POINT_LIGHTS {
            log::warn!(
                "{} point lights in scene, only the first {} are shaded",
                list.point_lights.len(),
                MAX_POINT_LIGHTS
            );
        }
        for (slot, item) in uniform.lights.iter_mut().zip(&list.point_lights) {
            *slot = PointLightData {
                position: item.position.to_array(),
                range: item.light.range,
                color: item.light.color,
                intensity: item.light.intensity,
            };
            uniform.count += 1;
        }
        uniform
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub uv_repeat: [f32; 2],
    pub roughness: f32,
    pub _pad: f32,
}

impl From<&Material> for MaterialUniform {
    fn from(material: &Material) -> Self {
        Self {
            base_color: material.effective_color(),
            uv_repeat: material.uv_repeat,
            roughness: material.roughness,
            _pad: 0.0,
        }
    }
}

/// Per-draw model matrix plus the matching normal matrix
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
}

impl InstanceRaw {
    pub fn new(world: &Mat4) -> Self {
        let normal = Mat3::from_mat4(*world).inverse().transpose();
        Self {
            model: world.to_cols_array_2d(),
            normal: [
                normal.x_axis.extend(0.0).to_array(),
                normal.y_axis.extend(0.0).to_array(),
                normal.z_axis.extend(0.0).to_array(),
            ],
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x4,
        9 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::{LightItem, PointLight};
    use glam::Vec3;

    #[test]
    fn uniform_sizes_match_wgsl() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
        assert_eq!(std::mem::size_of::<PointLightData>(), 32);
        assert_eq!(std::mem::size_of::<LightsUniform>(), 16 + 32 * MAX_POINT_LIGHTS);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 32);
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 112);
    }

    #[test]
    fn lights_are_capped() {
        let mut list = RenderList::default();
        list.ambient = [0.1, 0.1, 0.1];
        for i in 0..40 {
            list.point_lights.push(LightItem {
                position: Vec3::new(i as f32, 66.0, 0.0),
                light: PointLight::new(0xffa500, 500.0, 80.0),
            });
        }
        let uniform = LightsUniform::from_render_list(&list);
        assert_eq!(uniform.count as usize, MAX_POINT_LIGHTS);
        assert_eq!(uniform.lights[31].position, [31.0, 66.0, 0.0]);
        assert_eq!(uniform.ambient, [0.1, 0.1, 0.1]);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let world = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let raw = InstanceRaw::new(&world);
        assert_eq!(raw.normal[0], [0.5, 0.0, 0.0, 0.0]);
        assert_eq!(raw.normal[1], [0.0, 1.0, 0.0, 0.0]);
    }
}
