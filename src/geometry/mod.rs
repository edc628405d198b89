mod mesh;
pub mod wall;

pub use mesh::{MeshData, MeshId, Vertex};
pub use wall::{
    wall_panels, wall_with_door_in_center, wall_with_door_in_left_corner,
    wall_with_door_in_right_corner, wall_with_openings, OpeningKind, WallOpening, WallPanel,
};
