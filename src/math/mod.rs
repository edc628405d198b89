mod aabb;
mod transform;

pub use aabb::AABB;
pub use transform::Transform;
