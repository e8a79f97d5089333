//! Topology queries on packed polygonal meshes (C2). See `spec.md` §4.2.

use smallvec::SmallVec;

use crate::error::MeshError;
use crate::mesh::{edge_key, Direction, FaceEdge, Mesh, OrientedFaceEdge};

/// `face_adjacent` (spec §4.2.1): the oriented face-edge on the other face
/// sharing the same undirected edge, or `None` if `face_edge` is a boundary.
pub fn face_adjacent(
    mesh: &Mesh,
    face_edge: FaceEdge,
) -> Result<Option<OrientedFaceEdge>, MeshError> {
    let face = mesh.face(face_edge.face)?;
    let (i0, i1) = face.directed_edge(face_edge.edge as usize);
    for other in mesh.faces() {
        if other.index == face_edge.face {
            continue;
        }
        for e in 0..other.degree() {
            let (j0, j1) = other.directed_edge(e);
            if (j0, j1) == (i0, i1) {
                return Ok(Some(OrientedFaceEdge::new(
                    other.index,
                    e as u32,
                    Direction::V01,
                )));
            }
            if (j1, j0) == (i0, i1) {
                return Ok(Some(OrientedFaceEdge::new(
                    other.index,
                    e as u32,
                    Direction::V10,
                )));
            }
        }
    }
    Ok(None)
}

/// `edges_with` (spec §4.2.2): every oriented face-edge incident to `v`.
pub fn edges_with(
    mesh: &Mesh,
    v: u32,
) -> Result<SmallVec<[OrientedFaceEdge; 8]>, MeshError> {
    let len = mesh.vertex_count() as u32;
    if v >= len {
        return Err(MeshError::OutOfBounds { index: v, len });
    }
    let mut out = SmallVec::new();
    for face in mesh.faces() {
        for e in 0..face.degree() {
            let (start, end) = face.directed_edge(e);
            if start == v {
                out.push(OrientedFaceEdge::new(face.index, e as u32, Direction::V01));
            }
            if end == v {
                out.push(OrientedFaceEdge::new(face.index, e as u32, Direction::V10));
            }
        }
    }
    Ok(out)
}

/// One face incident to `v`, together with the incoming/outgoing face-edges
/// that touch `v` (spec §3.4).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexNeighbor {
    pub face: u32,
    /// `[incoming, outgoing]` relative to the rotational walk direction.
    pub edges: [OrientedFaceEdge; 2],
}

/// One entry of a notated fan sequence (spec §4.2.3 step 6).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FanEntry {
    Neighbor(VertexNeighbor),
    Discontinuity(bool),
}

/// The ordered fan of faces around a vertex, as produced by
/// [`vertex_neighbors`].
#[derive(Clone, Debug)]
pub struct NeighborFan {
    pub neighbors: Vec<VertexNeighbor>,
    pub continuous: bool,
    /// Index into `neighbors` at which the backward walk ends and the
    /// forward walk begins, for discontinuous fans.
    pub boundary: Option<usize>,
}

impl NeighborFan {
    /// Materializes the sequence with an optional discontinuity sentinel,
    /// per spec §4.2.3 step 6.
    pub fn entries(&self, note_discontinuity: bool) -> Vec<FanEntry> {
        let mut out: Vec<FanEntry> = Vec::with_capacity(self.neighbors.len() + 1);
        if !note_discontinuity {
            out.extend(self.neighbors.iter().copied().map(FanEntry::Neighbor));
            return out;
        }
        match self.boundary {
            Some(boundary) => {
                for n in &self.neighbors[..boundary] {
                    out.push(FanEntry::Neighbor(*n));
                }
                out.push(FanEntry::Discontinuity(false));
                for n in &self.neighbors[boundary..] {
                    out.push(FanEntry::Neighbor(*n));
                }
            }
            None => {
                out.extend(self.neighbors.iter().copied().map(FanEntry::Neighbor));
                out.push(FanEntry::Discontinuity(true));
            }
        }
        out
    }
}

fn undirected_key(mesh: &Mesh, fe: FaceEdge) -> Result<u64, MeshError> {
    let face = mesh.face(fe.face)?;
    let (a, b) = face.directed_edge(fe.edge as usize);
    Ok(edge_key(a, b))
}

fn remove_partner_in_face(
    pool: &mut Vec<OrientedFaceEdge>,
    face: u32,
) -> Option<OrientedFaceEdge> {
    let pos = pool.iter().position(|oe| oe.face_edge.face == face)?;
    Some(pool.remove(pos))
}

fn remove_twin(
    mesh: &Mesh,
    pool: &mut Vec<OrientedFaceEdge>,
    of: FaceEdge,
) -> Result<Option<OrientedFaceEdge>, MeshError> {
    let key = undirected_key(mesh, of)?;
    for i in 0..pool.len() {
        if undirected_key(mesh, pool[i].face_edge)? == key {
            return Ok(Some(pool.remove(i)));
        }
    }
    Ok(None)
}

/// `vertex_neighbors` (spec §4.2.3): the ordered fan of faces around `v`.
///
/// `seed`, if given, must match either edge of some neighbor in the fan (by
/// `(face, ordinal)`); the fan is rotated (and mirrored, if the seed matches
/// the second edge of its neighbor) so that `seed` is first. A mismatch is
/// `SeedMismatch`.
///
/// A fan is closed only if the walk wraps all the way back to the seed's own
/// undirected edge; an open fan whose arbitrary seed happens to be one of
/// its two boundary edges still gets a correct neighbor list, but is
/// detected as open by that wrap-around check rather than by pool
/// emptiness (see the comment at the closure check below).
pub fn vertex_neighbors(
    mesh: &Mesh,
    v: u32,
    seed: Option<FaceEdge>,
    note_discontinuity: bool,
) -> Result<NeighborFan, MeshError> {
    let mut pool: Vec<OrientedFaceEdge> = edges_with(mesh, v)?.into_vec();
    if pool.is_empty() {
        let fan = NeighborFan {
            neighbors: Vec::new(),
            continuous: true,
            boundary: None,
        };
        let _ = note_discontinuity;
        return Ok(fan);
    }

    let seed_edge = pool.remove(0);

    // Forward walk.
    let mut forward = Vec::new();
    let mut cur = seed_edge;
    loop {
        let face = cur.face_edge.face;
        let partner = match remove_partner_in_face(&mut pool, face) {
            Some(p) => p,
            None => break,
        };
        forward.push(VertexNeighbor {
            face,
            edges: [cur, partner],
        });
        match remove_twin(mesh, &mut pool, partner.face_edge)? {
            Some(twin) => cur = twin,
            None => break,
        }
    }

    // `pool.is_empty()` alone is not enough to tell a closed fan from an
    // open one: if the arbitrary seed happens to be one of an open fan's two
    // extreme (boundary) edges, the forward walk consumes every remaining
    // face in a single pass and leaves the pool empty too. The fan is only
    // truly closed if the last step's outgoing edge is the seed's own
    // undirected edge — i.e. the walk wrapped all the way back around.
    let seed_key = undirected_key(mesh, seed_edge.face_edge)?;
    let closed = match forward.last() {
        Some(last) => undirected_key(mesh, last.edges[1].face_edge)? == seed_key,
        None => false,
    };

    let (neighbors, boundary) = if closed {
        (forward, None)
    } else {
        // Discontinuous: backward walk from the twin of the seed.
        let mut backward: Vec<VertexNeighbor> = Vec::new();
        if let Some(mut cur) = remove_twin(mesh, &mut pool, seed_edge.face_edge)? {
            loop {
                let face = cur.face_edge.face;
                let partner = match remove_partner_in_face(&mut pool, face) {
                    Some(p) => p,
                    None => break,
                };
                backward.insert(
                    0,
                    VertexNeighbor {
                        face,
                        edges: [partner, cur],
                    },
                );
                match remove_twin(mesh, &mut pool, partner.face_edge)? {
                    Some(twin) => cur = twin,
                    None => break,
                }
            }
        }
        let boundary = backward.len();
        let mut neighbors = backward;
        neighbors.extend(forward);
        (neighbors, Some(boundary))
    };

    let mut fan = NeighborFan {
        neighbors,
        continuous: boundary.is_none(),
        boundary,
    };

    if let Some(seed) = seed {
        rotate_to_seed(&mut fan, seed)?;
    }

    Ok(fan)
}

// Rotation (and mirroring) only has an unambiguous meaning for a closed
// fan: an open fan's two ends are boundaries, not adjacent neighbors, so
// rotating it would silently stitch them together. For a discontinuous fan
// a seed is only used to validate that it appears somewhere in the walk;
// the forward/backward order discovered in `vertex_neighbors` is kept.
fn rotate_to_seed(fan: &mut NeighborFan, seed: FaceEdge) -> Result<(), MeshError> {
    let len = fan.neighbors.len();
    if len == 0 {
        return Err(MeshError::SeedMismatch {
            face: seed.face,
            edge: seed.edge,
        });
    }
    if !fan.continuous {
        let found = fan
            .neighbors
            .iter()
            .any(|n| n.edges[0].face_edge == seed || n.edges[1].face_edge == seed);
        return if found {
            Ok(())
        } else {
            Err(MeshError::SeedMismatch {
                face: seed.face,
                edge: seed.edge,
            })
        };
    }
    if let Some(i) = fan
        .neighbors
        .iter()
        .position(|n| n.edges[0].face_edge == seed)
    {
        fan.neighbors.rotate_left(i);
        return Ok(());
    }
    if let Some(i) = fan
        .neighbors
        .iter()
        .position(|n| n.edges[1].face_edge == seed)
    {
        fan.neighbors.reverse();
        for n in fan.neighbors.iter_mut() {
            n.edges.swap(0, 1);
        }
        let mirrored = len - 1 - i;
        fan.neighbors.rotate_left(mirrored);
        return Ok(());
    }
    Err(MeshError::SeedMismatch {
        face: seed.face,
        edge: seed.edge,
    })
}
