//! Fan triangulation (C5): n-gon -> triangle fan, emitting only a face
//! mapping since vertices are preserved. See `spec.md` §4.5.

use itertools::Itertools;
use nalgebra::Matrix4;

use crate::error::MeshError;
use crate::mapping::{ArrayMap, Csr, Mapping};
use crate::mesh::{Faces, Mesh, Positions};

/// Fan-triangulates every face of `mesh`: a face of degree `d` becomes
/// `d - 2` triangles `(v0, v1, v2), (v0, v2, v3), ..., (v0, v_{d-2}, v_{d-1})`.
///
/// Returns the triangulated mesh, an identity vertex map (positions are
/// shared), and an `Array` face map recording, for each base face, the
/// contiguous run of triangle indices it produced, and for each triangle,
/// the single base face it came from. All transforms are identity.
pub fn triangulate(mesh: &Mesh) -> Result<(Mesh, Mapping, Mapping), MeshError> {
    mesh.validate()?;

    let face_count = mesh.face_count();
    // Upper bound on output triangle count: |indices| - F - 1, tight for a
    // single n-gon (spec §4.5).
    let upper_bound = mesh
        .faces_buffer()
        .indices
        .len()
        .saturating_sub(face_count)
        .saturating_sub(1);

    let mut faces = Faces {
        indices: Vec::with_capacity(upper_bound * 3),
        offsets: Vec::with_capacity(upper_bound),
    };

    let mut base_to_self = Csr::with_capacity(face_count);
    let mut self_to_base_indices = Vec::with_capacity(upper_bound);
    let mut self_to_base_transforms = Vec::with_capacity(upper_bound);

    for face in mesh.faces() {
        let degree = face.degree();
        let triangle_count = degree.saturating_sub(2);
        let start_triangle = faces.len() as u32;

        let v0 = face.vertex_at(0);
        for i in 1..degree - 1 {
            let v1 = face.vertex_at(i);
            let v2 = face.vertex_at(i + 1);
            faces.push_face(&[v0, v1, v2]);
        }

        let triangle_range: Vec<u32> =
            (start_triangle..start_triangle + triangle_count as u32).collect();
        let row_transforms = vec![Matrix4::identity(); triangle_range.len()];
        base_to_self.push_row(triangle_range, row_transforms);

        for _ in 0..triangle_count {
            self_to_base_indices.push(face.index);
            self_to_base_transforms.push(Matrix4::identity());
        }
    }

    let mut self_to_base = Csr::with_capacity(faces.len());
    for (&base_face, &transform) in self_to_base_indices.iter().zip_eq(self_to_base_transforms.iter()) {
        self_to_base.push_row(vec![base_face], vec![transform]);
    }

    let triangulated = Mesh::new(
        clone_positions(mesh.positions()),
        faces,
        mesh.creased_edges().clone(),
    );

    let vertex_map = Mapping::Identity(mesh.vertex_count() as u32);
    let face_map = Mapping::Array(ArrayMap::new(
        face_count as u32,
        self_to_base.rows() as u32,
        base_to_self,
        self_to_base,
    ));

    Ok((triangulated, vertex_map, face_map))
}

fn clone_positions(p: &Positions) -> Positions {
    Positions {
        x: p.x.clone(),
        y: p.y.clone(),
        z: p.z.clone(),
    }
}
