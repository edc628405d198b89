mod light;
mod material;
mod node;
mod render_list;

pub use light::{AmbientLight, PointLight};
pub use material::{rgb_to_linear, Material, MaterialId, Texture, TextureSlot};
pub use node::{Node, NodeKind};
pub use render_list::{DrawItem, LightItem, RenderList};
