mod asset_loader;
pub mod gltf;
pub mod texture;

pub use asset_loader::{AssetEvent, AssetLoader, AssetRequest, RequestId};
pub use gltf::load_gltf_model;
pub use texture::{load_texture, load_texture_set, TextureSet};
