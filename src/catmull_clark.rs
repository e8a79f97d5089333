//! Catmull-Clark subdivision (C6): one-iteration refinement honoring
//! user-flagged creases and treating boundaries as implicit creases, plus
//! the iteration driver that composes per-level maps back to the original
//! base. See `spec.md` §4.6.

use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use log::{trace, warn};
use nalgebra::{Matrix4, Point3, Vector3};
use smallvec::SmallVec;

use crate::error::MeshError;
use crate::frame::{face_frame, frame_to_matrix, vertex_frame};
use crate::mapping::{ArrayMap, Csr, Mapping, compile};
use crate::mesh::{edge_key, EdgeKey, Faces, Mesh, Positions};

/// Options governing a single Catmull-Clark pass.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// Treat one-sided (boundary) edges as sharp, per `spec.md` §4.6.1.
    pub boundary_as_crease: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            boundary_as_crease: true,
        }
    }
}

struct Adjacency {
    edge_to_faces: AHashMap<EdgeKey, SmallVec<[u32; 2]>>,
    vertex_to_faces: AHashMap<u32, SmallVec<[u32; 8]>>,
    vertex_to_edges: AHashMap<u32, SmallVec<[EdgeKey; 8]>>,
    sharp_edges: AHashSet<EdgeKey>,
    edge_order: Vec<EdgeKey>,
}

fn dedup_push<T: PartialEq + Copy, const N: usize>(v: &mut SmallVec<[T; N]>, item: T) {
    if !v.contains(&item) {
        v.push(item);
    }
}

fn build_adjacency(mesh: &Mesh, options: &Options) -> Result<Adjacency, MeshError> {
    let mut edge_to_faces: AHashMap<EdgeKey, SmallVec<[u32; 2]>> = AHashMap::default();
    let mut vertex_to_faces: AHashMap<u32, SmallVec<[u32; 8]>> = AHashMap::default();
    let mut vertex_to_edges: AHashMap<u32, SmallVec<[EdgeKey; 8]>> = AHashMap::default();
    let mut edge_order = Vec::new();

    for face in mesh.faces() {
        let degree = face.degree();
        for e in 0..degree {
            let (u, w) = face.directed_edge(e);
            let key = edge_key(u, w);
            let entry = edge_to_faces.entry(key).or_insert_with(|| {
                edge_order.push(key);
                SmallVec::new()
            });
            dedup_push(entry, face.index);
            dedup_push(vertex_to_faces.entry(u).or_default(), face.index);
            dedup_push(vertex_to_edges.entry(u).or_default(), key);
            dedup_push(vertex_to_edges.entry(w).or_default(), key);
        }
    }

    let mut sharp_edges = mesh.creased_edges().clone();
    if options.boundary_as_crease {
        for (&key, faces) in edge_to_faces.iter() {
            if faces.len() == 1 {
                sharp_edges.insert(key);
            }
        }
    }

    Ok(Adjacency {
        edge_to_faces,
        vertex_to_faces,
        vertex_to_edges,
        sharp_edges,
        edge_order,
    })
}

/// Runs one iteration of Catmull-Clark refinement on `mesh`.
///
/// Returns the refined mesh, the vertex map (base vertex <-> refined
/// vertex), and the face map (base face <-> refined quad), both relative to
/// `mesh` itself (not any earlier ancestor — see [`subdivide`] for the
/// iterated, ancestor-relative version).
pub fn subdivide_once(mesh: &Mesh, options: &Options) -> Result<(Mesh, Mapping, Mapping), MeshError> {
    mesh.validate()?;
    let adjacency = build_adjacency(mesh, options)?;

    let v_count = mesh.vertex_count() as u32;
    let f_count = mesh.face_count() as u32;

    // Step 1: face points.
    let mut face_points = Vec::with_capacity(f_count as usize);
    for f in mesh.faces() {
        face_points.push(mesh.face_centroid(f.index)?);
    }

    // Step 2: edge points.
    let mut edge_points: AHashMap<EdgeKey, Point3<f64>> = AHashMap::default();
    for &key in &adjacency.edge_order {
        let (u, w) = crate::mesh::edge_key_endpoints(key);
        let pu = mesh.point(u)?;
        let pw = mesh.point(w)?;
        let point = if adjacency.sharp_edges.contains(&key) {
            Point3::from((pu.coords + pw.coords) / 2.0)
        } else {
            let faces = &adjacency.edge_to_faces[&key];
            if faces.len() == 2 {
                let fp0 = face_points[faces[0] as usize];
                let fp1 = face_points[faces[1] as usize];
                Point3::from((pu.coords + pw.coords + fp0.coords + fp1.coords) / 4.0)
            } else {
                warn!("non-manifold edge {key:#x} ({} incident faces): falling back to midpoint", faces.len());
                Point3::from((pu.coords + pw.coords) / 2.0)
            }
        };
        edge_points.insert(key, point);
    }

    // Step 3: reposition original vertices.
    let mut repositioned = Vec::with_capacity(v_count as usize);
    for v in 0..v_count {
        let old = mesh.point(v)?;
        let empty_edges: SmallVec<[EdgeKey; 8]> = SmallVec::new();
        let incident_edges = adjacency.vertex_to_edges.get(&v).unwrap_or(&empty_edges);
        let empty_faces: SmallVec<[u32; 8]> = SmallVec::new();
        let incident_faces = adjacency.vertex_to_faces.get(&v).unwrap_or(&empty_faces);
        let sharp_neighbors: SmallVec<[EdgeKey; 2]> = incident_edges
            .iter()
            .copied()
            .filter(|key| adjacency.sharp_edges.contains(key))
            .collect();
        let k = sharp_neighbors.len();
        let n = incident_edges.len().max(1) as f64;

        let new_position = if k > 2 {
            old
        } else if k == 2 {
            let (a0, b0) = crate::mesh::edge_key_endpoints(sharp_neighbors[0]);
            let (a1, b1) = crate::mesh::edge_key_endpoints(sharp_neighbors[1]);
            let other = |a: u32, b: u32| -> u32 { if a == v { b } else { a } };
            let a = mesh.point(other(a0, b0))?;
            let b = mesh.point(other(a1, b1))?;
            Point3::from((a.coords + 6.0 * old.coords + b.coords) / 8.0)
        } else {
            let mut face_mean = Vector3::zeros();
            for &f in incident_faces {
                face_mean += face_points[f as usize].coords;
            }
            let face_mean = face_mean / incident_faces.len().max(1) as f64;
            let mut edge_mean = Vector3::zeros();
            for &key in incident_edges.iter() {
                let (a, b) = crate::mesh::edge_key_endpoints(key);
                let pa = mesh.point(a)?;
                let pb = mesh.point(b)?;
                edge_mean += (pa.coords + pb.coords) / 2.0;
            }
            let edge_mean = edge_mean / n;
            Point3::from((face_mean + 2.0 * edge_mean + (n - 3.0) * old.coords) / n)
        };
        repositioned.push(new_position);
    }

    // New vertex buffer layout: repositioned originals, then face points,
    // then edge points (in first-encountered / insertion order).
    let mut positions = Positions::default();
    for p in &repositioned {
        positions.push(*p);
    }
    for p in &face_points {
        positions.push(*p);
    }
    let mut edge_point_index: AHashMap<EdgeKey, u32> = AHashMap::default();
    for &key in &adjacency.edge_order {
        let index = positions.push(edge_points[&key]);
        edge_point_index.insert(key, index);
    }

    let face_point_index = |f: u32| v_count + f;

    // Step 4: rebuild faces as quads, one per corner of each base face.
    let mut faces = Faces::default();
    let mut quad_to_base_face = Vec::new();
    let mut base_face_to_quads: Vec<Vec<u32>> = vec![Vec::new(); f_count as usize];
    let mut quad_transforms = Vec::new();

    for base_face in mesh.faces() {
        let degree = base_face.degree();
        let parent_frame = face_frame(mesh, base_face.index)?;
        let fp = face_point_index(base_face.index);
        for i in 0..degree {
            let v_i = base_face.vertex_at(i);
            let v_next = base_face.vertex_at((i + 1) % degree);
            let v_prev = base_face.vertex_at((i + degree - 1) % degree);
            let e_next = edge_point_index[&edge_key(v_i, v_next)];
            let e_prev = edge_point_index[&edge_key(v_prev, v_i)];

            let quad = [v_i, e_next, fp, e_prev];
            let quad_index = faces.len() as u32;
            faces.push_face(&quad);

            let quad_positions: Vec<Point3<f64>> =
                quad.iter().map(|&i| positions.point(i as usize)).collect();
            let quad_frame = quad_frame_from_positions(&quad_positions);
            let transform = frame_to_matrix(&parent_frame, &quad_frame);

            quad_to_base_face.push(base_face.index);
            base_face_to_quads[base_face.index as usize].push(quad_index);
            quad_transforms.push(transform);
        }
    }

    // A sharp base edge (u, v) splits into two child edges at its edge
    // point; both must stay creased so a multi-iteration run keeps honoring
    // it (spec §4.6, iteration). Boundary-derived sharpness is not carried
    // here: it is recomputed from the refined mesh's own topology by the
    // next iteration's `build_adjacency` when `boundary_as_crease` is set.
    let mut refined_creased: AHashSet<EdgeKey> = AHashSet::default();
    for &key in mesh.creased_edges() {
        let (u, w) = crate::mesh::edge_key_endpoints(key);
        let ep = edge_point_index[&key];
        refined_creased.insert(edge_key(u, ep));
        refined_creased.insert(edge_key(ep, w));
    }
    let refined = Mesh::new(positions, faces, refined_creased);

    let self_len = refined.vertex_count() as u32;

    // Vertex map.
    let mut vertex_to_base = Csr::with_capacity(self_len as usize);
    let mut base_vertex_contributions: Vec<Vec<(u32, Matrix4<f64>)>> =
        vec![Vec::new(); v_count as usize];

    for v in 0..v_count {
        let before = vertex_frame_safe(mesh, v, &adjacency)?;
        let after = vertex_frame_safe_at(&refined, v)?;
        let transform = frame_to_matrix(&before, &after);
        vertex_to_base.push_row(vec![v], vec![transform]);
        base_vertex_contributions[v as usize].push((v, transform));
    }
    for f in 0..f_count {
        let base_vertices = mesh.face(f)?.vertices.to_vec();
        let transforms = vec![Matrix4::identity(); base_vertices.len()];
        vertex_to_base.push_row(base_vertices.clone(), transforms);
        let self_index = face_point_index(f);
        for bv in base_vertices {
            base_vertex_contributions[bv as usize].push((self_index, Matrix4::identity()));
        }
    }
    for &key in &adjacency.edge_order {
        let (u, w) = crate::mesh::edge_key_endpoints(key);
        vertex_to_base.push_row(
            vec![u, w],
            vec![Matrix4::identity(), Matrix4::identity()],
        );
        let self_index = edge_point_index[&key];
        base_vertex_contributions[u as usize].push((self_index, Matrix4::identity()));
        base_vertex_contributions[w as usize].push((self_index, Matrix4::identity()));
    }

    let mut base_to_vertex = Csr::with_capacity(v_count as usize);
    for contributions in base_vertex_contributions {
        let indices = contributions.iter().map(|(i, _)| *i).collect();
        let transforms = contributions.iter().map(|(_, t)| *t).collect();
        base_to_vertex.push_row(indices, transforms);
    }

    let vertex_map = Mapping::Array(ArrayMap::new(
        v_count,
        self_len,
        base_to_vertex,
        vertex_to_base,
    ));

    // Face map.
    let mut quad_to_base = Csr::with_capacity(quad_to_base_face.len());
    for (&transform, &base_face) in quad_transforms.iter().zip_eq(quad_to_base_face.iter()) {
        quad_to_base.push_row(vec![base_face], vec![transform]);
    }
    let mut base_to_quads = Csr::with_capacity(f_count as usize);
    for quads in &base_face_to_quads {
        let transforms: Vec<Matrix4<f64>> = quads.iter().map(|&q| quad_transforms[q as usize]).collect();
        base_to_quads.push_row(quads.clone(), transforms);
    }
    let face_map = Mapping::Array(ArrayMap::new(
        f_count,
        quad_to_base_face.len() as u32,
        base_to_quads,
        quad_to_base,
    ));

    trace!(
        "subdivided mesh: {} verts -> {}, {} faces -> {}",
        v_count,
        self_len,
        f_count,
        quad_to_base_face.len()
    );

    Ok((refined, vertex_map, face_map))
}

fn quad_frame_from_positions(p: &[Point3<f64>]) -> crate::frame::Frame {
    let origin = Point3::from(
        (p[0].coords + p[1].coords + p[2].coords + p[3].coords) / 4.0,
    );
    let mut normal = Vector3::zeros();
    for i in 0..4 {
        let a = p[i];
        let b = p[(i + 1) % 4];
        normal += (a - origin).cross(&(b - origin));
    }
    let n = if normal.norm() > 1e-12 {
        normal.normalize()
    } else {
        Vector3::z()
    };
    let edge = p[1] - p[0];
    let projected = edge - n * edge.dot(&n);
    let t = if projected.norm() > 1e-12 {
        projected.normalize()
    } else {
        Vector3::x()
    };
    let b = n.cross(&t);
    crate::frame::Frame { origin, t, b, n }
}

fn vertex_frame_safe(mesh: &Mesh, v: u32, adjacency: &Adjacency) -> Result<crate::frame::Frame, MeshError> {
    let empty: SmallVec<[u32; 8]> = SmallVec::new();
    let faces = adjacency.vertex_to_faces.get(&v).unwrap_or(&empty);
    let empty_edges: SmallVec<[EdgeKey; 8]> = SmallVec::new();
    let edges = adjacency.vertex_to_edges.get(&v).unwrap_or(&empty_edges);
    let neighbor = edges
        .first()
        .map(|&key| {
            let (a, b) = crate::mesh::edge_key_endpoints(key);
            if a == v { b } else { a }
        })
        .unwrap_or(v);
    if faces.is_empty() {
        let origin = mesh.point(v)?;
        return Ok(crate::frame::Frame {
            origin,
            t: Vector3::x(),
            b: Vector3::y(),
            n: Vector3::z(),
        });
    }
    vertex_frame(mesh, v, faces, neighbor)
}

// A repositioned original vertex keeps its index in the refined mesh, but
// its incident-face set changes (each base face becomes 4 quads); recompute
// the post-refinement frame from the refined vertex's own incident quads
// rather than reusing the base adjacency.
fn vertex_frame_safe_at(refined: &Mesh, refined_v: u32) -> Result<crate::frame::Frame, MeshError> {
    let mut incident_quads = Vec::new();
    for face in refined.faces() {
        if face.vertices.contains(&refined_v) {
            incident_quads.push(face.index);
        }
    }
    if incident_quads.is_empty() {
        let origin = refined.point(refined_v)?;
        return Ok(crate::frame::Frame {
            origin,
            t: Vector3::x(),
            b: Vector3::y(),
            n: Vector3::z(),
        });
    }
    let neighbor = refined
        .face(incident_quads[0])?
        .vertices
        .iter()
        .copied()
        .find(|&v| v != refined_v)
        .unwrap_or(refined_v);
    vertex_frame(refined, refined_v, &incident_quads, neighbor)
}

/// Runs `iterations` passes of Catmull-Clark refinement, rebuilding
/// adjacency from the current level's mesh each time, and composing each
/// level's map with the accumulated map so the result stays relative to the
/// original `mesh` (spec §4.6.7).
pub fn subdivide(
    mesh: &Mesh,
    options: &Options,
    iterations: u32,
) -> Result<(Mesh, Mapping, Mapping), MeshError> {
    let mut current = mesh.clone_as(crate::mesh::MeshForm::Modifiable);
    let mut vertex_map = Mapping::Identity(mesh.vertex_count() as u32);
    let mut face_map = Mapping::Identity(mesh.face_count() as u32);

    for i in 0..iterations {
        trace!("catmull-clark iteration {i}");
        let (next, level_vertex, level_face) = subdivide_once(&current, options)?;
        vertex_map = compile(&vertex_map, &level_vertex)?;
        face_map = compile(&face_map, &level_face)?;
        current = next;
    }

    Ok((current.clone_as(crate::mesh::MeshForm::Packed), vertex_map, face_map))
}
