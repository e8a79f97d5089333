//! Error kinds reported by the mesh-processing core.
//!
//! The core reports the kind of failure; it is up to the caller to decide how
//! (or whether) to present it. See `spec.md` §7.

use thiserror::Error;

/// An error produced by a mesh, topology, mapping, or subdivision operation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MeshError {
    /// A vertex or face index fell outside its valid range.
    #[error("index {index} out of bounds (len {len})")]
    OutOfBounds { index: u32, len: u32 },

    /// `vertex_neighbors` was given a seed face-edge that is not incident to
    /// the vertex being traversed.
    #[error("seed face-edge {face}:{edge} is not incident to the requested vertex")]
    SeedMismatch { face: u32, edge: u32 },

    /// Two mappings were compiled with incompatible dimensions: the self
    /// length of the upstream map did not match the base length of the
    /// downstream map.
    #[error("cannot compile maps: upstream self length {upstream_self} does not match downstream base length {downstream_base}")]
    LengthMismatch {
        upstream_self: u32,
        downstream_base: u32,
    },

    /// External input whose triangle-index count is not a multiple of 3.
    #[error("index buffer length {len} is not a multiple of 3")]
    ShapeMismatch { len: usize },

    /// A subdivision method outside the supported enumeration was requested.
    #[error("unknown subdivision method: {0}")]
    UnknownMethod(String),

    /// A face or mesh was malformed in a way that the core refuses to
    /// process (e.g. a degenerate face with a repeated consecutive vertex,
    /// or a non-monotonic offset buffer).
    #[error("malformed mesh: {0}")]
    MalformedMesh(String),
}
