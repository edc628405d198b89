use glam::Vec3;

use museum_walk::loaders::AssetLoader;
use museum_walk::rooms::{assemble, Lobby, RoomDimensions};
use museum_walk::scene_graph::NodeKind;

fn triangle_centroids(lobby: &Lobby, wall: &str) -> Vec<Vec3> {
    let mut loader = AssetLoader::new("no-such-asset-root");
    let instance = assemble(lobby, &mut loader);
    let node = instance.group.find(wall).unwrap();
    let NodeKind::Mesh { mesh, .. } = &node.kind else {
        panic!("{} is not a mesh", wall);
    };
    mesh.indices
        .chunks(3)
        .map(|tri| {
            tri.iter()
                .map(|&i| Vec3::from_array(mesh.vertices[i as usize].position))
                .sum::<Vec3>()
                / 3.0
        })
        .collect()
}

fn inside_door(point: Vec3, center_x: f32, dims: &RoomDimensions) -> bool {
    let half = dims.door_width / 2.0;
    point.x > center_x - half + 1e-3
        && point.x < center_x + half - 1e-3
        && point.y < dims.door_height - 1e-3
}

#[test]
fn back_and_front_walls_have_door_holes() {
    let lobby = Lobby::default();
    let dims = RoomDimensions::BASE;

    for wall in ["back", "front"] {
        let centroids = triangle_centroids(&lobby, wall);
        assert!(!centroids.is_empty());
        for door_x in lobby.door_positions(dims.wall_length) {
            assert!(
                centroids.iter().all(|c| !inside_door(*c, door_x, &dims)),
                "{} wall covers the door at x = {}",
                wall,
                door_x
            );
        }
        // The wall between the doors is still there
        assert!(centroids.iter().any(|c| c.x.abs() < 50.0));
    }
}

#[test]
fn connected_lobby_opens_side_walls() {
    let dims = RoomDimensions::BASE;

    let closed = triangle_centroids(&Lobby::default(), "left");
    let open = triangle_centroids(&Lobby::connected(), "left");
    assert!(open.len() > closed.len());

    let door = Lobby::connected().wall_openings("left")[0];
    assert!(open.iter().all(|c| !inside_door(*c, door.center_x, &dims)));
}
