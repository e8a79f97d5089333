//! Local orthonormal frames and the frame-to-frame rigid transform used by
//! Catmull-Clark to populate mapping transforms (spec §4.6.6).

use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

use crate::error::MeshError;
use crate::mesh::Mesh;

/// An orthonormal basis `<t, b, n>` attached to an `origin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub origin: Point3<f64>,
    pub t: Vector3<f64>,
    pub b: Vector3<f64>,
    pub n: Vector3<f64>,
}

fn normalize_or(v: Vector3<f64>, fallback: Vector3<f64>) -> Vector3<f64> {
    let norm = v.norm();
    if norm > 1e-12 {
        v / norm
    } else {
        fallback
    }
}

/// The mean of the triangulated-fan normals of a face, normalized. Falls
/// back to `(0, 0, 1)` if the result vanishes.
pub fn fan_normal(mesh: &Mesh, f: u32) -> Result<Vector3<f64>, MeshError> {
    let face = mesh.face(f)?;
    let degree = face.degree();
    let p0 = mesh.point(face.vertex_at(0))?;
    let mut sum = Vector3::zeros();
    for i in 1..degree.saturating_sub(1) {
        let pi = mesh.point(face.vertex_at(i))?;
        let pj = mesh.point(face.vertex_at(i + 1))?;
        sum += (pi - p0).cross(&(pj - p0));
    }
    Ok(normalize_or(sum, Vector3::z()))
}

/// Projects `edge` onto the plane orthogonal to `n` and normalizes it,
/// falling back to `(1, 0, 0)` if the projection vanishes.
fn tangent_orthogonal_to(edge: Vector3<f64>, n: Vector3<f64>) -> Vector3<f64> {
    let projected = edge - n * edge.dot(&n);
    normalize_or(projected, Vector3::x())
}

/// The local frame of a face: origin at the centroid, `n` the mean
/// triangulated-fan normal, `t` the first edge projected orthogonal to `n`,
/// `b = n x t`.
pub fn face_frame(mesh: &Mesh, f: u32) -> Result<Frame, MeshError> {
    let face = mesh.face(f)?;
    let origin = mesh.face_centroid(f)?;
    let n = fan_normal(mesh, f)?;
    let p0 = mesh.point(face.vertex_at(0))?;
    let p1 = mesh.point(face.vertex_at(1))?;
    let t = tangent_orthogonal_to(p1 - p0, n);
    let b = n.cross(&t);
    Ok(Frame { origin, t, b, n })
}

/// The local frame of a vertex: origin at its position, `n` the average of
/// its incident faces' fan normals, `t` its first incident edge projected
/// orthogonal to `n`, `b = n x t`.
pub fn vertex_frame(
    mesh: &Mesh,
    v: u32,
    incident_faces: &[u32],
    an_incident_neighbor: u32,
) -> Result<Frame, MeshError> {
    let origin = mesh.point(v)?;
    let mut n_sum = Vector3::zeros();
    for &f in incident_faces {
        n_sum += fan_normal(mesh, f)?;
    }
    let n = normalize_or(n_sum, Vector3::z());
    let neighbor = mesh.point(an_incident_neighbor)?;
    let t = tangent_orthogonal_to(neighbor - origin, n);
    let b = n.cross(&t);
    Ok(Frame { origin, t, b, n })
}

/// The rigid motion carrying `from`'s basis onto `to`'s basis and `from`'s
/// origin onto `to`'s origin.
pub fn frame_to_matrix(from: &Frame, to: &Frame) -> Matrix4<f64> {
    let basis_from = Matrix3::from_columns(&[from.t, from.b, from.n]);
    let basis_to = Matrix3::from_columns(&[to.t, to.b, to.n]);
    let rotation = basis_to * basis_from.transpose();
    let translation = to.origin.coords - rotation * from.origin.coords;

    let mut m = Matrix4::identity();
    m.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation);
    m.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
    m
}
