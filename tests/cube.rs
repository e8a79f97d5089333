//! End-to-end scenarios against the unit-cube fixture (spec §8, i-iv).

use approx::assert_abs_diff_eq;
use nalgebra::Point3;

use meshgraph::catmull_clark::{self, Options};
use meshgraph::examples::{unit_cube, unit_cube_all_edges_creased};
use meshgraph::mesh::FaceEdge;
use meshgraph::topology::face_adjacent;
use meshgraph::triangulate::triangulate;

#[test]
fn cube_face_view() {
    let cube = unit_cube();
    let face = cube.face(0).unwrap();
    assert_eq!(face.degree(), 4);
    assert_eq!(face.vertices, &[0, 1, 2, 3]);
}

#[test]
fn cube_face_adjacency() {
    let cube = unit_cube();
    let expect = |edge: u32, face: u32| {
        let adjacent = face_adjacent(&cube, FaceEdge { face: 0, edge })
            .unwrap()
            .unwrap();
        assert_eq!(adjacent.face_edge.face, face);
        assert_eq!(adjacent.face_edge.edge, 0);
    };
    expect(0, 2);
    expect(1, 4);
    expect(2, 3);
    expect(3, 5);
}

#[test]
fn cube_adjacency_is_symmetric_and_has_no_boundary() {
    let cube = unit_cube();
    for f in 0..6 {
        for e in 0..4 {
            let here = FaceEdge { face: f, edge: e };
            let there = face_adjacent(&cube, here).unwrap().expect("a closed cube has no boundary edges");
            let back = face_adjacent(&cube, there.face_edge).unwrap().unwrap();
            assert_eq!(back.face_edge, here);
        }
    }
}

#[test]
fn cube_triangulation() {
    let cube = unit_cube();
    let (triangulated, _vertex_map, _face_map) = triangulate(&cube).unwrap();
    assert_eq!(triangulated.vertex_count(), 8);
    assert_eq!(triangulated.face_count(), 12);
}

#[test]
fn cube_subdivision_with_all_edges_creased() {
    let cube = unit_cube_all_edges_creased();
    let options = Options {
        boundary_as_crease: true,
    };
    let (subdivided, vertex_map, face_map) = catmull_clark::subdivide_once(&cube, &options).unwrap();
    // 8 original vertices + 6 face points + 12 edge points.
    assert_eq!(subdivided.vertex_count(), 26);
    // Each of the 6 quads becomes 4 quads.
    assert_eq!(subdivided.face_count(), 24);
    assert_eq!(vertex_map.lengths().base, 8);
    assert_eq!(vertex_map.lengths().self_, 26);
    assert_eq!(face_map.lengths().base, 6);
    assert_eq!(face_map.lengths().self_, 24);
}

#[test]
fn cube_subdivision_preserves_a_sharp_edge_midpoint() {
    // All edges are creased, so every edge point is an exact midpoint of
    // its two endpoints, independent of the incident faces' geometry.
    let cube = unit_cube_all_edges_creased();
    let options = Options {
        boundary_as_crease: true,
    };
    let (subdivided, _vertex_map, _face_map) = catmull_clark::subdivide_once(&cube, &options).unwrap();
    let p0 = cube.point(0).unwrap();
    let p1 = cube.point(1).unwrap();
    // Vertex buffer layout is repositioned originals (0..8), then face
    // points (8..14), then edge points (14..26); edge (0,1) is the first
    // edge encountered while walking face 0's ordinals, so it lands at 14.
    let midpoint = subdivided.point(14).unwrap();
    let expected = Point3::from((p0.coords + p1.coords) / 2.0);
    assert_abs_diff_eq!(midpoint, expected, epsilon = 1e-9);
}

#[test]
fn catmull_clark_iterations_retain_creases() {
    // Each of the cube's 12 sharp edges splits into 2 child edges, which
    // must stay creased or a second iteration would smooth them away.
    let cube = unit_cube_all_edges_creased();
    let options = Options {
        boundary_as_crease: true,
    };
    let (level1, _vertex_map, _face_map) = catmull_clark::subdivide_once(&cube, &options).unwrap();
    assert_eq!(level1.creased_edges().len(), 24);

    let (level2, _vertex_map, _face_map) = catmull_clark::subdivide(&cube, &options, 2).unwrap();
    assert!(
        !level2.creased_edges().is_empty(),
        "creases must survive a second subdivision iteration"
    );
}
