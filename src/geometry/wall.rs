//! Walls with rectangular apertures (doors, windows).
//!
//! Wall-local coordinates: x runs from `-width / 2` to `width / 2`, y from
//! the floor (`0`) to `height`, the wall face lies in the XY plane.

use glam::{Mat4, Vec3};

use super::mesh::MeshData;

const EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpeningKind {
    /// Walkable gap, excluded from colliders
    Door,
    /// Visual hole only, colliders stay solid
    Window,
}

/// Rectangular hole in a wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallOpening {
    pub center_x: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
    pub kind: OpeningKind,
}

impl WallOpening {
    /// Door standing on the floor
    pub fn door(center_x: f32, width: f32, height: f32) -> Self {
        Self {
            center_x,
            bottom: 0.0,
            width,
            height,
            kind: OpeningKind::Door,
        }
    }

    /// Window centred at (`center_x`, `center_y`)
    pub fn window(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        Self {
            center_x,
            bottom: center_y - height * 0.5,
            width,
            height,
            kind: OpeningKind::Window,
        }
    }

    fn x_range(&self) -> (f32, f32) {
        (self.center_x - self.width * 0.5, self.center_x + self.width * 0.5)
    }

    fn y_range(&self) -> (f32, f32) {
        (self.bottom, self.bottom + self.height)
    }
}

/// Solid rectangle of a wall, in wall-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallPanel {
    pub x0: f32,
    pub x1: f32,
    pub y0: f32,
    pub y1: f32,
}

impl WallPanel {
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new((self.x0 + self.x1) * 0.5, (self.y0 + self.y1) * 0.5, 0.0)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x0 - EPSILON && x <= self.x1 + EPSILON && y >= self.y0 - EPSILON && y <= self.y1 + EPSILON
    }
}

/// Covers the wall minus every opening with non-overlapping rectangles.
///
/// The wall is cut into vertical columns at every opening edge; each column
/// keeps the vertical spans not covered by an opening, and neighbouring
/// columns with identical spans are merged back together.
pub fn wall_panels(wall_width: f32, wall_height: f32, openings: &[WallOpening]) -> Vec<WallPanel> {
    let half = wall_width * 0.5;

    let clipped: Vec<(f32, f32, f32, f32)> = openings
        .iter()
        .filter_map(|opening| {
            let (x0, x1) = opening.x_range();
            let (y0, y1) = opening.y_range();
            let (x0, x1) = (x0.max(-half), x1.min(half));
            let (y0, y1) = (y0.max(0.0), y1.min(wall_height));
            (x1 - x0 > EPSILON && y1 - y0 > EPSILON).then_some((x0, x1, y0, y1))
        })
        .collect();

    let mut cuts: Vec<f32> = vec![-half, half];
    cuts.extend(clipped.iter().flat_map(|&(x0, x1, _, _)| [x0, x1]));
    cuts.sort_by(f32::total_cmp);
    cuts.dedup_by(|a, b| (*a - *b).abs() < EPSILON);

    let mut panels: Vec<WallPanel> = Vec::new();
    let mut previous_spans: Vec<(f32, f32)> = Vec::new();
    let mut open_panels: Vec<usize> = Vec::new();

    for column in cuts.windows(2) {
        let (xa, xb) = (column[0], column[1]);
        if xb - xa < EPSILON {
            continue;
        }

        let mut holes: Vec<(f32, f32)> = clipped
            .iter()
            .filter(|&&(x0, x1, _, _)| x0 <= xa + EPSILON && x1 >= xb - EPSILON)
            .map(|&(_, _, y0, y1)| (y0, y1))
            .collect();
        let spans = solid_spans(wall_height, &mut holes);

        let continues = !open_panels.is_empty() && spans_equal(&spans, &previous_spans);
        if continues {
            for &index in &open_panels {
                panels[index].x1 = xb;
            }
        } else {
            open_panels.clear();
            for &(y0, y1) in &spans {
                open_panels.push(panels.len());
                panels.push(WallPanel { x0: xa, x1: xb, y0, y1 });
            }
        }
        previous_spans = spans;
    }

    panels
}

/// Complement of the (possibly overlapping) holes within `0..height`
fn solid_spans(height: f32, holes: &mut [(f32, f32)]) -> Vec<(f32, f32)> {
    holes.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut spans = Vec::new();
    let mut cursor = 0.0_f32;
    for &(y0, y1) in holes.iter() {
        if y0 - cursor > EPSILON {
            spans.push((cursor, y0));
        }
        cursor = cursor.max(y1);
    }
    if height - cursor > EPSILON {
        spans.push((cursor, height));
    }
    spans
}

fn spans_equal(a: &[(f32, f32)], b: &[(f32, f32)]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| (x.0 - y.0).abs() < EPSILON && (x.1 - y.1).abs() < EPSILON)
}

/// Merged wall geometry with the openings cut out.
///
/// A `thickness` of zero yields flat panels, anything else yields boxes
/// centred on the wall plane.
pub fn wall_with_openings(
    width: f32,
    height: f32,
    thickness: f32,
    openings: &[WallOpening],
) -> MeshData {
    let pieces: Vec<MeshData> = wall_panels(width, height, openings)
        .iter()
        .map(|panel| {
            let piece = if thickness > 0.0 {
                MeshData::cuboid(panel.width(), panel.height(), thickness)
            } else {
                MeshData::plane(panel.width(), panel.height())
            };
            piece.transformed(&Mat4::from_translation(panel.center()))
        })
        .collect();

    MeshData::merge(&pieces)
}

pub fn wall_with_door_in_center(
    wall_width: f32,
    wall_height: f32,
    door_width: f32,
    door_height: f32,
) -> MeshData {
    wall_with_openings(
        wall_width,
        wall_height,
        0.0,
        &[WallOpening::door(0.0, door_width, door_height)],
    )
}

pub fn wall_with_door_in_right_corner(
    wall_width: f32,
    wall_height: f32,
    door_width: f32,
    door_height: f32,
) -> MeshData {
    let center_x = wall_width * 0.5 - door_width * 0.5;
    wall_with_openings(
        wall_width,
        wall_height,
        0.0,
        &[WallOpening::door(center_x, door_width, door_height)],
    )
}

pub fn wall_with_door_in_left_corner(
    wall_width: f32,
    wall_height: f32,
    door_width: f32,
    door_height: f32,
) -> MeshData {
    let center_x = -wall_width * 0.5 + door_width * 0.5;
    wall_with_openings(
        wall_width,
        wall_height,
        0.0,
        &[WallOpening::door(center_x, door_width, door_height)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(panels: &[WallPanel]) -> f32 {
        panels.iter().map(|p| p.width() * p.height()).sum()
    }

    #[test]
    fn solid_wall_is_one_panel() {
        let panels = wall_panels(200.0, 100.0, &[]);
        assert_eq!(panels, vec![WallPanel { x0: -100.0, x1: 100.0, y0: 0.0, y1: 100.0 }]);
    }

    #[test]
    fn center_door_leaves_three_panels() {
        let panels = wall_panels(200.0, 100.0, &[WallOpening::door(0.0, 20.0, 40.0)]);
        assert_eq!(panels.len(), 3);
        assert!((area(&panels) - (200.0 * 100.0 - 20.0 * 40.0)).abs() < 1e-2);

        let lintel = panels.iter().find(|p| p.x0 == -10.0).unwrap();
        assert_eq!((lintel.y0, lintel.y1), (40.0, 100.0));
    }

    #[test]
    fn window_leaves_sill_and_lintel() {
        let panels = wall_panels(200.0, 100.0, &[WallOpening::window(0.0, 50.0, 32.0, 55.0)]);
        assert_eq!(panels.len(), 4);
        let column: Vec<_> = panels.iter().filter(|p| p.x0 == -16.0).collect();
        assert_eq!(column.len(), 2);
        assert!(column.iter().any(|p| (p.y1 - 22.5).abs() < 1e-4));
        assert!(column.iter().any(|p| (p.y0 - 77.5).abs() < 1e-4));
    }

    #[test]
    fn opening_past_the_edge_is_clipped() {
        let panels = wall_panels(200.0, 100.0, &[WallOpening::door(100.0, 20.0, 45.0)]);
        assert_eq!(panels.len(), 2);
        assert!((area(&panels) - (200.0 * 100.0 - 10.0 * 45.0)).abs() < 1e-2);
    }

    #[test]
    fn overlapping_openings_merge() {
        let openings = [
            WallOpening::door(0.0, 20.0, 40.0),
            WallOpening::door(5.0, 20.0, 30.0),
        ];
        let panels = wall_panels(200.0, 100.0, &openings);
        let expected = 200.0 * 100.0 - (20.0 * 40.0 + 5.0 * 30.0);
        assert!((area(&panels) - expected).abs() < 1e-2);
    }

    #[test]
    fn right_corner_door_matches_spans() {
        let mesh = wall_with_door_in_right_corner(200.0, 100.0, 19.0, 45.0);
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-100.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(100.0, 100.0, 0.0));
        // two panels: full-height left part and the lintel over the door
        assert_eq!(mesh.vertices.len(), 8);
    }

    #[test]
    fn thick_wall_uses_boxes() {
        let mesh = wall_with_openings(200.0, 100.0, 1.0, &[WallOpening::door(0.0, 19.0, 45.0)]);
        assert_eq!(mesh.vertices.len(), 3 * 24);
        let bounds = mesh.bounds().unwrap();
        assert!((bounds.size().z - 1.0).abs() < 1e-5);
    }
}
