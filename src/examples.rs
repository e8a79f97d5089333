//! A canonical unit-cube fixture used throughout the test suite.
//!
//! Vertices are the eight corners of `[0,1]^3`, indexed by their `(x,y,z)`
//! bit pattern; faces are wound so that `face(0) == [0, 1, 2, 3]` is the
//! `z = 0` bottom face and `face_adjacent` on its four edges lands on faces
//! 2, 4, 3, and 5 respectively.

use ahash::AHashSet;
use nalgebra::Point3;

use crate::mesh::{edge_key, Faces, Mesh, Positions};

const CUBE_POSITIONS: [(f64, f64, f64); 8] = [
    (0.0, 0.0, 0.0),
    (1.0, 0.0, 0.0),
    (1.0, 1.0, 0.0),
    (0.0, 1.0, 0.0),
    (0.0, 0.0, 1.0),
    (1.0, 0.0, 1.0),
    (1.0, 1.0, 1.0),
    (0.0, 1.0, 1.0),
];

const CUBE_FACES: [[u32; 4]; 6] = [
    [0, 1, 2, 3],
    [7, 6, 5, 4],
    [1, 0, 4, 5],
    [3, 2, 6, 7],
    [2, 1, 5, 6],
    [0, 3, 7, 4],
];

fn build_cube(creased: AHashSet<crate::mesh::EdgeKey>) -> Mesh {
    let mut positions = Positions::default();
    for &(x, y, z) in &CUBE_POSITIONS {
        positions.push(Point3::new(x, y, z));
    }
    let mut faces = Faces::default();
    for face in &CUBE_FACES {
        faces.push_face(face);
    }
    Mesh::new(positions, faces, creased)
}

/// The plain unit cube: 8 vertices, 6 quad faces, no creased edges.
pub fn unit_cube() -> Mesh {
    build_cube(AHashSet::default())
}

/// The unit cube with all twelve edges marked sharp, per the Catmull-Clark
/// numeric anchor of spec §4.6.8.
pub fn unit_cube_all_edges_creased() -> Mesh {
    let mut creased = AHashSet::default();
    for face in &CUBE_FACES {
        for i in 0..4 {
            creased.insert(edge_key(face[i], face[(i + 1) % 4]));
        }
    }
    build_cube(creased)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_eight_vertices_and_six_quads() {
        let cube = unit_cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.face_count(), 6);
        for f in 0..6 {
            assert_eq!(cube.face(f).unwrap().degree(), 4);
        }
    }

    #[test]
    fn marks_all_twelve_edges_as_creased() {
        let cube = unit_cube_all_edges_creased();
        assert_eq!(cube.creased_edges().len(), 12);
    }
}
