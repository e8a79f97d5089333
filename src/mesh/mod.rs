//! The mesh store (C1): SoA position buffers, a packed face-index buffer,
//! and a creased-edge set. See `spec.md` §3.1 and §4.1.

pub mod edge;
pub mod face_view;

use std::borrow::Cow;

use ahash::AHashSet;
use nalgebra::{Point3, Vector3};

use crate::error::MeshError;
pub use edge::{edge_key, edge_key_endpoints, Direction, EdgeKey, FaceEdge, OrientedFaceEdge};
pub use face_view::FaceView;

/// Which storage flavor a `Mesh` currently uses. Semantically identical;
/// `Packed` is the preferred shape for hot paths and is what `accelerated()`
/// guarantees, while `Modifiable` is used by the subdivision pass while it
/// grows new buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshForm {
    Packed,
    Modifiable,
}

/// Three parallel coordinate sequences. A vertex index `i` selects
/// `(x[i], y[i], z[i])`.
#[derive(Clone, Debug, Default)]
pub struct Positions {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl Positions {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn get(&self, i: usize) -> (f64, f64, f64) {
        (self.x[i], self.y[i], self.z[i])
    }

    pub fn point(&self, i: usize) -> Point3<f64> {
        Point3::new(self.x[i], self.y[i], self.z[i])
    }

    pub fn push(&mut self, p: Point3<f64>) -> u32 {
        let index = self.x.len() as u32;
        self.x.push(p.x);
        self.y.push(p.y);
        self.z.push(p.z);
        index
    }
}

/// A packed vertex-index buffer plus a 1-based end-offset sequence, per
/// `spec.md` §3.1. `offsets[f]` is the end of face `f`'s run in `indices`;
/// the start of face `f` is `offsets[f - 1]` (or `0` for `f == 0`).
#[derive(Clone, Debug, Default)]
pub struct Faces {
    pub indices: Vec<u32>,
    pub offsets: Vec<u32>,
}

impl Faces {
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn range(&self, f: usize) -> (u32, u32) {
        let start = if f == 0 { 0 } else { self.offsets[f - 1] };
        (start, self.offsets[f])
    }

    pub fn degree(&self, f: usize) -> usize {
        let (start, end) = self.range(f);
        (end - start) as usize
    }

    pub fn vertices(&self, f: usize) -> &[u32] {
        let (start, end) = self.range(f);
        &self.indices[start as usize..end as usize]
    }

    /// Appends a face given by its vertex list, extending both buffers.
    pub fn push_face(&mut self, vertices: &[u32]) {
        self.indices.extend_from_slice(vertices);
        self.offsets.push(self.indices.len() as u32);
    }
}

/// The triple ⟨positions, faces, creased-edges⟩ described in `spec.md` §3.1.
#[derive(Clone, Debug)]
pub struct Mesh {
    positions: Positions,
    faces: Faces,
    creased: AHashSet<EdgeKey>,
    form: MeshForm,
}

impl Mesh {
    pub fn new(positions: Positions, faces: Faces, creased: AHashSet<EdgeKey>) -> Self {
        Mesh {
            positions,
            faces,
            creased,
            form: MeshForm::Packed,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn form(&self) -> MeshForm {
        self.form
    }

    pub fn creased_edges(&self) -> &AHashSet<EdgeKey> {
        &self.creased
    }

    pub fn is_creased(&self, u: u32, v: u32) -> bool {
        self.creased.contains(&edge_key(u, v))
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    pub fn faces_buffer(&self) -> &Faces {
        &self.faces
    }

    /// Bounds-checked position lookup.
    pub fn vertex(&self, i: u32) -> Result<(f64, f64, f64), MeshError> {
        let len = self.vertex_count() as u32;
        if i >= len {
            return Err(MeshError::OutOfBounds { index: i, len });
        }
        Ok(self.positions.get(i as usize))
    }

    pub fn point(&self, i: u32) -> Result<Point3<f64>, MeshError> {
        let (x, y, z) = self.vertex(i)?;
        Ok(Point3::new(x, y, z))
    }

    /// Bounds-checked face-view lookup.
    pub fn face(&self, f: u32) -> Result<FaceView<'_>, MeshError> {
        let len = self.face_count() as u32;
        if f >= len {
            return Err(MeshError::OutOfBounds { index: f, len });
        }
        let (start, end) = self.faces.range(f as usize);
        Ok(FaceView {
            index: f,
            start,
            end,
            vertices: self.faces.vertices(f as usize),
        })
    }

    pub fn faces(&self) -> impl Iterator<Item = FaceView<'_>> {
        (0..self.face_count() as u32).map(move |f| self.face(f).unwrap())
    }

    /// Every valid vertex index, in order.
    pub fn vertices(&self) -> impl Iterator<Item = u32> {
        0..self.vertex_count() as u32
    }

    /// Checks the invariants of `spec.md` §3.1: index bounds, no degenerate
    /// consecutive-duplicate vertices within a face, and a strictly
    /// monotonically increasing offset sequence.
    pub fn validate(&self) -> Result<(), MeshError> {
        let v = self.vertex_count() as u32;
        let mut prev_offset = 0u32;
        for f in 0..self.face_count() {
            let (start, end) = self.faces.range(f);
            if end <= prev_offset && f > 0 {
                return Err(MeshError::MalformedMesh(format!(
                    "offsets are not strictly increasing at face {f}"
                )));
            }
            if end <= start {
                return Err(MeshError::MalformedMesh(format!(
                    "face {f} has non-positive degree"
                )));
            }
            prev_offset = end;
            let vertices = self.faces.vertices(f);
            for (i, &vi) in vertices.iter().enumerate() {
                if vi >= v {
                    return Err(MeshError::OutOfBounds { index: vi, len: v });
                }
                let next = vertices[(i + 1) % vertices.len()];
                if vertices.len() > 1 && next == vi {
                    return Err(MeshError::MalformedMesh(format!(
                        "face {f} has a degenerate zero-length edge at ordinal {i}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Deep-copies the mesh into the requested storage flavor.
    pub fn clone_as(&self, form: MeshForm) -> Mesh {
        let mut mesh = self.clone();
        mesh.form = form;
        mesh
    }

    /// Returns a packed view of the mesh: `self` if already packed, else a
    /// freshly packed clone.
    pub fn accelerated(&self) -> Cow<'_, Mesh> {
        match self.form {
            MeshForm::Packed => Cow::Borrowed(self),
            MeshForm::Modifiable => Cow::Owned(self.clone_as(MeshForm::Packed)),
        }
    }

    /// The unnormalized, Newell-like normal of a single face: the cross
    /// product of the edges `v0->v1` and `v0->v2`.
    pub fn face_normal_unnormalized(&self, f: u32) -> Result<Vector3<f64>, MeshError> {
        let face = self.face(f)?;
        if face.degree() < 3 {
            return Ok(Vector3::zeros());
        }
        let p0 = self.point(face.vertex_at(0))?;
        let p1 = self.point(face.vertex_at(1))?;
        let p2 = self.point(face.vertex_at(2))?;
        Ok((p1 - p0).cross(&(p2 - p0)))
    }

    pub fn face_centroid(&self, f: u32) -> Result<Point3<f64>, MeshError> {
        let face = self.face(f)?;
        let mut sum = Vector3::zeros();
        for &vi in face.vertices {
            sum += self.point(vi)?.coords;
        }
        Ok(Point3::from(sum / face.degree() as f64))
    }

    /// Computes the mean centroid and mean (unnormalized) normal over a set
    /// of faces, per `spec.md` §4.1.
    pub fn aggregate(&self, faces: &[u32]) -> Result<(Point3<f64>, Vector3<f64>), MeshError> {
        let mut centroid_sum = Vector3::zeros();
        let mut normal_sum = Vector3::zeros();
        for &f in faces {
            centroid_sum += self.face_centroid(f)?.coords;
            normal_sum += self.face_normal_unnormalized(f)?;
        }
        let n = faces.len().max(1) as f64;
        Ok((Point3::from(centroid_sum / n), normal_sum / n))
    }
}
