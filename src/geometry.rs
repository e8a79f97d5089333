//! The geometry graph (C4): a base mesh plus a chain of derived geometries,
//! each holding its own cached mesh and a vertex/face map back to its base.
//! See `spec.md` §4.4.
//!
//! A derived geometry's base is identified by index into the same graph
//! rather than a borrowed reference, so a graph can grow new derivations
//! without running into self-referential borrows; this plays the role of
//! the spec's "base pointer."

use crate::catmull_clark::{self, Options as CatmullClarkOptions};
use crate::error::MeshError;
use crate::mapping::{chain_compile, Mapping};
use crate::mesh::Mesh;
use crate::triangulate;

/// How a node's mesh and maps were produced from its base.
#[derive(Clone, Debug)]
pub enum DerivationMethod {
    /// The root of a graph: no base, identity maps.
    Root,
    Triangulate,
    CatmullClark {
        options: CatmullClarkOptions,
        iterations: u32,
    },
}

/// One mesh in a derivation chain, plus the maps relating it to its
/// immediate base (`spec.md`'s "base, vertex-map, face-map" triple).
pub struct GeometryNode {
    base: Option<usize>,
    method: DerivationMethod,
    mesh: Mesh,
    vertex_map: Mapping,
    face_map: Mapping,
}

impl GeometryNode {
    pub fn base(&self) -> Option<usize> {
        self.base
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn vertex_map(&self) -> &Mapping {
        &self.vertex_map
    }

    pub fn face_map(&self) -> &Mapping {
        &self.face_map
    }
}

/// A graph of meshes connected by derivation steps (triangulation,
/// Catmull-Clark), per `spec.md` §4.4. Index `0` is always the root.
pub struct GeometryGraph {
    nodes: Vec<GeometryNode>,
}

impl GeometryGraph {
    pub fn new(root: Mesh) -> Self {
        let vertex_map = Mapping::Identity(root.vertex_count() as u32);
        let face_map = Mapping::Identity(root.face_count() as u32);
        GeometryGraph {
            nodes: vec![GeometryNode {
                base: None,
                method: DerivationMethod::Root,
                mesh: root,
                vertex_map,
                face_map,
            }],
        }
    }

    pub fn node(&self, index: usize) -> Result<&GeometryNode, MeshError> {
        self.nodes
            .get(index)
            .ok_or(MeshError::OutOfBounds {
                index: index as u32,
                len: self.nodes.len() as u32,
            })
    }

    pub fn root(&self) -> &GeometryNode {
        &self.nodes[0]
    }

    /// Adds a new derived geometry based on `base`, running `method` over
    /// `base`'s current mesh, and returns the new node's index.
    pub fn derive(&mut self, base: usize, method: DerivationMethod) -> Result<usize, MeshError> {
        self.node(base)?;
        let (mesh, vertex_map, face_map) = run_derivation(&self.nodes[base].mesh, &method)?;
        self.nodes.push(GeometryNode {
            base: Some(base),
            method,
            mesh,
            vertex_map,
            face_map,
        });
        Ok(self.nodes.len() - 1)
    }

    /// Re-runs `index`'s derivation method against its base's *current*
    /// mesh, replacing its cached mesh and maps in place (`spec.md` §4.4).
    /// A no-op on the root (there is nothing to re-derive).
    pub fn update(&mut self, index: usize) -> Result<(), MeshError> {
        let node = self.node(index)?;
        let base = match node.base {
            Some(base) => base,
            None => return Ok(()),
        };
        let method = node.method.clone();
        let (mesh, vertex_map, face_map) = run_derivation(&self.nodes[base].mesh, &method)?;
        let node = &mut self.nodes[index];
        node.mesh = mesh;
        node.vertex_map = vertex_map;
        node.face_map = face_map;
        Ok(())
    }

    /// Walks base pointers from `index` up to `ancestor`, compiling every
    /// intermediate vertex map (resp. face map) into one effective map from
    /// `ancestor`'s element space to `index`'s, via `chain_compile`
    /// (`spec.md` §4.3, §4.4).
    pub fn compile_to_ancestor(
        &self,
        index: usize,
        ancestor: usize,
    ) -> Result<(Mapping, Mapping), MeshError> {
        self.node(index)?;
        self.node(ancestor)?;

        let mut vertex_chain = Vec::new();
        let mut face_chain = Vec::new();
        let mut cur = index;
        loop {
            if cur == ancestor {
                break;
            }
            let node = &self.nodes[cur];
            vertex_chain.push(node.vertex_map.clone());
            face_chain.push(node.face_map.clone());
            cur = match node.base {
                Some(base) => base,
                None => {
                    return Err(MeshError::MalformedMesh(format!(
                        "node {index} does not descend from node {ancestor}"
                    )))
                }
            };
        }
        vertex_chain.reverse();
        face_chain.reverse();

        let ancestor_vertex_len = self.nodes[ancestor].mesh.vertex_count() as u32;
        let ancestor_face_len = self.nodes[ancestor].mesh.face_count() as u32;
        let vertex_map = chain_compile(&vertex_chain, ancestor_vertex_len)?;
        let face_map = chain_compile(&face_chain, ancestor_face_len)?;
        Ok((vertex_map, face_map))
    }
}

fn run_derivation(
    base_mesh: &Mesh,
    method: &DerivationMethod,
) -> Result<(Mesh, Mapping, Mapping), MeshError> {
    match method {
        DerivationMethod::Root => Ok((
            base_mesh.clone(),
            Mapping::Identity(base_mesh.vertex_count() as u32),
            Mapping::Identity(base_mesh.face_count() as u32),
        )),
        DerivationMethod::Triangulate => triangulate::triangulate(base_mesh),
        DerivationMethod::CatmullClark { options, iterations } => {
            catmull_clark::subdivide(base_mesh, options, *iterations)
        }
    }
}
