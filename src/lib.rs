pub mod camera;
pub mod cli;
pub mod collision;
pub mod config;
pub mod controls;
pub mod core;
pub mod error;
pub mod geometry;
pub mod loaders;
pub mod math;
pub mod renderer;
pub mod rooms;
pub mod scene_graph;
pub mod scene_manager;

pub use camera::FirstPersonCamera;
pub use collision::{Collider, CollisionOutcome, Player};
pub use config::MuseumConfig;
pub use rooms::SceneKind;
pub use scene_manager::SceneManager;
