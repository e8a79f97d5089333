//! The external indexed-triangle-list boundary (spec §6): ingesting a flat
//! position/index buffer pair, publishing one back out, and the
//! host-facing options struct.

use ahash::AHashSet;

use crate::catmull_clark::Options as CatmullClarkOptions;
use crate::error::MeshError;
use crate::mesh::{Faces, Mesh, Positions};

/// The subdivision method requested by a host. Only `CatmullClark` is
/// implemented; any other name is rejected with `UnknownMethod`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubdivisionMethod {
    CatmullClark,
}

impl SubdivisionMethod {
    /// Resolves a host-supplied method name, case-insensitively.
    pub fn from_name(name: &str) -> Result<Self, MeshError> {
        match name.to_ascii_lowercase().as_str() {
            "catmullclark" | "catmull-clark" | "catmull_clark" => Ok(SubdivisionMethod::CatmullClark),
            other => Err(MeshError::UnknownMethod(other.to_string())),
        }
    }
}

/// Host-facing mesh options (spec §6, "Mesh-level options").
#[derive(Clone, Copy, Debug)]
pub struct MeshOptions {
    pub boundary_as_crease: bool,
    pub iterations: u32,
    pub method: SubdivisionMethod,
}

impl Default for MeshOptions {
    fn default() -> Self {
        MeshOptions {
            boundary_as_crease: true,
            iterations: 1,
            method: SubdivisionMethod::CatmullClark,
        }
    }
}

impl MeshOptions {
    pub fn catmull_clark_options(&self) -> CatmullClarkOptions {
        CatmullClarkOptions {
            boundary_as_crease: self.boundary_as_crease,
        }
    }
}

/// Builds a mesh from a host's indexed triangle list: a contiguous position
/// buffer of `3V` interleaved `x,y,z` floats and an index buffer of `3T`
/// integers. Fails with `ShapeMismatch` if the index buffer length is not a
/// multiple of 3.
pub fn from_triangle_list(positions: &[f64], indices: &[u32]) -> Result<Mesh, MeshError> {
    if indices.len() % 3 != 0 {
        return Err(MeshError::ShapeMismatch { len: indices.len() });
    }
    if positions.len() % 3 != 0 {
        return Err(MeshError::ShapeMismatch {
            len: positions.len(),
        });
    }

    let vertex_count = positions.len() / 3;
    let mut soa = Positions {
        x: Vec::with_capacity(vertex_count),
        y: Vec::with_capacity(vertex_count),
        z: Vec::with_capacity(vertex_count),
    };
    for chunk in positions.chunks_exact(3) {
        soa.x.push(chunk[0]);
        soa.y.push(chunk[1]);
        soa.z.push(chunk[2]);
    }

    let mut faces = Faces {
        indices: Vec::with_capacity(indices.len()),
        offsets: Vec::with_capacity(indices.len() / 3),
    };
    for triangle in indices.chunks_exact(3) {
        faces.push_face(triangle);
    }

    let mesh = Mesh::new(soa, faces, AHashSet::default());
    mesh.validate()?;
    Ok(mesh)
}

/// Flattens `mesh` back into a host-facing indexed triangle list, resizing
/// `positions_out`/`indices_out` in place (spec §6, "a helper allocates
/// fresh position and index buffers and resizes them when required").
/// Faces of degree > 3 are fan-triangulated on the fly; this is a one-way,
/// mapping-free emission, distinct from the tracked [`crate::triangulate`]
/// pass.
pub fn to_triangle_list(mesh: &Mesh, positions_out: &mut Vec<f64>, indices_out: &mut Vec<u32>) {
    let position_len = mesh.vertex_count() * 3;
    ensure_len(positions_out, position_len);
    for (i, p) in positions_out.chunks_exact_mut(3).enumerate() {
        let (x, y, z) = mesh.positions().get(i);
        p[0] = x;
        p[1] = y;
        p[2] = z;
    }

    let triangle_count: usize = mesh
        .faces()
        .map(|f| f.degree().saturating_sub(2))
        .sum();
    ensure_len(indices_out, triangle_count * 3);
    let mut cursor = 0;
    for face in mesh.faces() {
        let degree = face.degree();
        let v0 = face.vertex_at(0);
        for i in 1..degree.saturating_sub(1) {
            indices_out[cursor] = v0;
            indices_out[cursor + 1] = face.vertex_at(i);
            indices_out[cursor + 2] = face.vertex_at(i + 1);
            cursor += 3;
        }
    }
}

fn ensure_len(buf: &mut Vec<impl Default + Clone>, len: usize) {
    if buf.len() < len {
        buf.resize(len, Default::default());
    } else {
        buf.truncate(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_single_triangle() {
        let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices = vec![0u32, 1, 2];
        let mesh = from_triangle_list(&positions, &indices).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);

        let mut out_positions = Vec::new();
        let mut out_indices = Vec::new();
        to_triangle_list(&mesh, &mut out_positions, &mut out_indices);
        assert_eq!(out_positions, positions);
        assert_eq!(out_indices, indices);
    }

    #[test]
    fn rejects_an_index_buffer_not_a_multiple_of_three() {
        let err = from_triangle_list(&[0.0; 9], &[0, 1, 2, 3]).unwrap_err();
        assert_eq!(err, MeshError::ShapeMismatch { len: 4 });
    }

    #[test]
    fn resolves_known_method_names_case_insensitively() {
        assert_eq!(
            SubdivisionMethod::from_name("Catmull-Clark").unwrap(),
            SubdivisionMethod::CatmullClark
        );
        assert!(SubdivisionMethod::from_name("loop").is_err());
    }
}
