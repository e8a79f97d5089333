//! A mesh-processing core for polygonal surfaces: packed structure-of-arrays
//! mesh storage, topology queries (adjacency, vertex-neighbor fans),
//! bidirectional index mappings with per-index 4x4 transforms and an
//! associative `compile` operator, n-gon triangulation, and Catmull-Clark
//! subdivision with creases and boundaries.
//!
//! The crate is organized as a thin root re-exporting a `prelude`, with one
//! topic module per concern. See each module's docs for its slice of the
//! design; `catmull_clark` and `mapping` carry the bulk of the logic.

pub mod catmull_clark;
pub mod error;
pub mod events;
pub mod examples;
pub mod frame;
pub mod geometry;
pub mod io;
pub mod mapping;
pub mod mesh;
pub mod topology;
pub mod triangulate;

/// Re-exports of the types most consumers need.
pub mod prelude {
    pub use crate::catmull_clark::{self, Options as CatmullClarkOptions};
    pub use crate::error::MeshError;
    pub use crate::events::{GeometryEvent, NullSink, Sink};
    pub use crate::geometry::{DerivationMethod, GeometryGraph, GeometryNode};
    pub use crate::io::{from_triangle_list, to_triangle_list, MeshOptions, SubdivisionMethod};
    pub use crate::mapping::{compile, chain_compile, ArrayMap, Csr, Mapping, SymmetricMap};
    pub use crate::mesh::{edge_key, edge_key_endpoints, Direction, FaceEdge, FaceView, Mesh, MeshForm, OrientedFaceEdge};
    pub use crate::topology::{
        face_adjacent, edges_with, vertex_neighbors, FanEntry, NeighborFan, VertexNeighbor,
    };
    pub use crate::triangulate::triangulate;
}
