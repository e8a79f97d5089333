//! End-to-end scenarios against vertex-neighbor fans (spec §8, properties
//! 3-4): closed-fan closure on the cube, open-fan discontinuity on a
//! two-quad strip.

use ahash::AHashSet;
use nalgebra::Point3;

use meshgraph::examples::unit_cube;
use meshgraph::mesh::{edge_key, Faces, Mesh, Positions};
use meshgraph::topology::{vertex_neighbors, FanEntry};

fn two_quad_strip() -> Mesh {
    // A x [0,2] x [0,1] strip of two unit quads sharing the edge (1, 4).
    // Vertex 1 sits on the shared edge but its two "outer" edges, (0,1) and
    // (1,2), are both boundary: an open fan.
    let corners = [
        (0.0, 0.0, 0.0),
        (1.0, 0.0, 0.0),
        (2.0, 0.0, 0.0),
        (0.0, 1.0, 0.0),
        (1.0, 1.0, 0.0),
        (2.0, 1.0, 0.0),
    ];
    let mut positions = Positions::default();
    for &(x, y, z) in &corners {
        positions.push(Point3::new(x, y, z));
    }
    let mut faces = Faces::default();
    faces.push_face(&[0, 1, 4, 3]);
    faces.push_face(&[1, 2, 5, 4]);
    Mesh::new(positions, faces, AHashSet::default())
}

#[test]
fn closed_cube_vertex_fan_has_no_discontinuity() {
    let cube = unit_cube();
    let fan = vertex_neighbors(&cube, 0, None, false).unwrap();
    assert!(fan.continuous);
    // Vertex 0 touches three cube faces: the bottom and two sides.
    assert_eq!(fan.neighbors.len(), 3);
    // Consecutive neighbors share one oriented edge: the prior's outgoing
    // edge and the next's incoming edge are twins of the same undirected
    // edge (they live on different faces, so compare by undirected key
    // rather than by the raw (face, ordinal) pair).
    for i in 0..fan.neighbors.len() {
        let outgoing = fan.neighbors[i];
        let next = fan.neighbors[(i + 1) % fan.neighbors.len()];
        let outgoing_edge = cube
            .face(outgoing.face)
            .unwrap()
            .directed_edge(outgoing.edges[1].face_edge.edge as usize);
        let incoming_edge = cube
            .face(next.face)
            .unwrap()
            .directed_edge(next.edges[0].face_edge.edge as usize);
        assert_eq!(
            edge_key(outgoing_edge.0, outgoing_edge.1),
            edge_key(incoming_edge.0, incoming_edge.1)
        );
    }
}

#[test]
fn open_strip_vertex_fan_is_discontinuous_with_a_sentinel() {
    let strip = two_quad_strip();
    let fan = vertex_neighbors(&strip, 1, None, true).unwrap();
    assert!(!fan.continuous);
    assert_eq!(fan.neighbors.len(), 2);

    let entries = fan.entries(true);
    let discontinuity_count = entries
        .iter()
        .filter(|e| matches!(e, FanEntry::Discontinuity(false)))
        .count();
    assert_eq!(discontinuity_count, 1);
}
