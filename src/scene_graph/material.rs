use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

static NEXT_MATERIAL_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(u64);

/// RGBA8 image ready for upload
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Texture({}x{})", self.width, self.height)
    }
}

impl Texture {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self { width, height, data }
    }

    /// 1x1 texture of a single colour
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self::new(1, 1, rgba.to_vec())
    }
}

/// Texture that may arrive after the material was created.
///
/// Clones share the slot; it can be filled exactly once.
#[derive(Clone, Default)]
pub struct TextureSlot(Arc<OnceLock<Arc<Texture>>>);

impl fmt::Debug for TextureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(texture) => write!(f, "TextureSlot({:?})", texture),
            None => write!(f, "TextureSlot(pending)"),
        }
    }
}

impl TextureSlot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn ready(texture: Arc<Texture>) -> Self {
        let slot = Self::default();
        slot.fill(texture);
        slot
    }

    /// Returns false when the slot was already filled
    pub fn fill(&self, texture: Arc<Texture>) -> bool {
        self.0.set(texture).is_ok()
    }

    pub fn get(&self) -> Option<&Arc<Texture>> {
        self.0.get()
    }

    pub fn is_ready(&self) -> bool {
        self.0.get().is_some()
    }
}

/// Surface description consumed by the renderer
#[derive(Debug)]
pub struct Material {
    id: MaterialId,
    pub name: String,
    /// Multiplier applied to the base colour texture
    pub base_color: [f32; 4],
    /// Colour shown while the base colour texture is missing
    pub placeholder_color: [f32; 4],
    pub base_color_texture: TextureSlot,
    pub roughness_texture: TextureSlot,
    pub roughness: f32,
    pub uv_repeat: [f32; 2],
    pub double_sided: bool,
}

impl Material {
    /// Untextured material from an sRGB hex colour
    pub fn color(name: impl Into<String>, rgb: u32) -> Self {
        Self::from_linear(name, rgb_to_linear(rgb))
    }

    /// Untextured material from a linear RGBA colour
    pub fn from_linear(name: impl Into<String>, color: [f32; 4]) -> Self {
        Self {
            id: MaterialId(NEXT_MATERIAL_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            base_color: color,
            placeholder_color: color,
            base_color_texture: TextureSlot::empty(),
            roughness_texture: TextureSlot::empty(),
            roughness: 1.0,
            uv_repeat: [1.0, 1.0],
            double_sided: false,
        }
    }

    /// Material whose textures load later; `placeholder` shows until then
    pub fn textured(name: impl Into<String>, placeholder: u32, uv_repeat: [f32; 2]) -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            uv_repeat,
            ..Self::color(name, placeholder)
        }
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }

    pub fn id(&self) -> MaterialId {
        self.id
    }

    /// Colour the renderer should use right now
    pub fn effective_color(&self) -> [f32; 4] {
        if self.base_color_texture.is_ready() {
            self.base_color
        } else {
            self.placeholder_color
        }
    }
}

/// 0xRRGGBB sRGB to linear RGBA
pub fn rgb_to_linear(rgb: u32) -> [f32; 4] {
    let channel = |shift: u32| {
        let c = ((rgb >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0), 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_fills_once_and_is_shared() {
        let slot = TextureSlot::empty();
        let shared = slot.clone();
        assert!(!shared.is_ready());

        assert!(slot.fill(Arc::new(Texture::solid([255, 0, 0, 255]))));
        assert!(!slot.fill(Arc::new(Texture::solid([0, 255, 0, 255]))));

        let texture = shared.get().unwrap();
        assert_eq!(texture.data, vec![255, 0, 0, 255]);
    }

    #[test]
    fn placeholder_until_texture_arrives() {
        let material = Material::textured("plaster", 0x808080, [8.0, 4.0]);
        assert_eq!(material.effective_color(), material.placeholder_color);

        material
            .base_color_texture
            .fill(Arc::new(Texture::solid([255; 4])));
        assert_eq!(material.effective_color(), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn srgb_conversion_endpoints() {
        assert_eq!(rgb_to_linear(0x000000), [0.0, 0.0, 0.0, 1.0]);
        let white = rgb_to_linear(0xffffff);
        assert!(white[..3].iter().all(|c| (c - 1.0).abs() < 1e-5));
    }

    #[test]
    fn materials_get_distinct_ids() {
        let a = Material::color("a", 0xffffff);
        let b = Material::color("b", 0xffffff);
        assert_ne!(a.id(), b.id());
    }
}
