//! Bidirectional index mappings with per-index 4x4 transforms (C3).
//! See `spec.md` §3.5 and §4.3.

mod array;
mod symmetric;

pub use array::{ArrayMap, Csr};
pub use symmetric::SymmetricMap;

use itertools::Itertools;
use nalgebra::Matrix4;

use crate::error::MeshError;

/// `lengths: {base, self}` published by every mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lengths {
    pub base: u32,
    pub self_: u32,
}

/// The result of a `fromBase`/`toBase` query: a set of indices in the
/// opposite space, each paired with the transform that carries the queried
/// element's local frame into that index's.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Correspondence {
    pub indices: Vec<u32>,
    pub transforms: Vec<Matrix4<f64>>,
}

impl Correspondence {
    pub fn single(index: u32, transform: Matrix4<f64>) -> Self {
        Correspondence {
            indices: vec![index],
            transforms: vec![transform],
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// One of the three concrete mapping shapes of `spec.md` §3.5.
#[derive(Clone, Debug)]
pub enum Mapping {
    /// 1-to-1, `i <-> i`, identity transform. O(1) and storage-free beyond
    /// the element count.
    Identity(u32),
    /// 1-to-1 permutation with a transform per index; the inverse direction
    /// is derived once at construction.
    Symmetric(SymmetricMap),
    /// Many-to-many, CSR-style, both directions independently stored.
    Array(ArrayMap),
}

impl Mapping {
    pub fn lengths(&self) -> Lengths {
        match self {
            Mapping::Identity(n) => Lengths {
                base: *n,
                self_: *n,
            },
            Mapping::Symmetric(m) => m.lengths(),
            Mapping::Array(m) => m.lengths(),
        }
    }

    pub fn from_base(&self, i: u32) -> Result<Correspondence, MeshError> {
        match self {
            Mapping::Identity(n) => identity_query(*n, i),
            Mapping::Symmetric(m) => m.from_base(i),
            Mapping::Array(m) => m.from_base(i),
        }
    }

    pub fn to_base(&self, j: u32) -> Result<Correspondence, MeshError> {
        match self {
            Mapping::Identity(n) => identity_query(*n, j),
            Mapping::Symmetric(m) => m.to_base(j),
            Mapping::Array(m) => m.to_base(j),
        }
    }
}

fn identity_query(n: u32, i: u32) -> Result<Correspondence, MeshError> {
    if i >= n {
        return Err(MeshError::OutOfBounds { index: i, len: n });
    }
    Ok(Correspondence::single(i, Matrix4::identity()))
}

/// Fuses two adjacent mappings `a: X -> Y` and `b: Y -> Z` into a single
/// `c: X -> Z`, per `spec.md` §4.3 "Compile". Requires
/// `a.lengths().self_ == b.lengths().base`.
///
/// `fromBase(x) = union_{y in a.fromBase(x)} b.fromBase(y)`, transforms
/// `T_a(x, y) * T_b(y, z)`. `toBase` is computed symmetrically through the
/// two maps' own `toBase` directions.
pub fn compile(a: &Mapping, b: &Mapping) -> Result<Mapping, MeshError> {
    let a_lengths = a.lengths();
    let b_lengths = b.lengths();
    if a_lengths.self_ != b_lengths.base {
        return Err(MeshError::LengthMismatch {
            upstream_self: a_lengths.self_,
            downstream_base: b_lengths.base,
        });
    }
    let base_len = a_lengths.base;
    let self_len = b_lengths.self_;

    let mut from_base = Csr::with_capacity(base_len as usize);
    for x in 0..base_len {
        let via_y = a.from_base(x)?;
        let mut indices = Vec::new();
        let mut transforms = Vec::new();
        for (y, t_ay) in via_y.indices.iter().zip_eq(via_y.transforms.iter()) {
            let via_z = b.from_base(*y)?;
            for (z, t_bz) in via_z.indices.iter().zip_eq(via_z.transforms.iter()) {
                indices.push(*z);
                transforms.push(t_ay * t_bz);
            }
        }
        from_base.push_row(indices, transforms);
    }

    let mut to_base = Csr::with_capacity(self_len as usize);
    for z in 0..self_len {
        let via_y = b.to_base(z)?;
        let mut indices = Vec::new();
        let mut transforms = Vec::new();
        for (y, t_bz) in via_y.indices.iter().zip_eq(via_y.transforms.iter()) {
            let via_x = a.to_base(*y)?;
            for (x, t_ay) in via_x.indices.iter().zip_eq(via_x.transforms.iter()) {
                indices.push(*x);
                transforms.push(t_ay * t_bz);
            }
        }
        to_base.push_row(indices, transforms);
    }

    Ok(Mapping::Array(ArrayMap::new(
        base_len, self_len, from_base, to_base,
    )))
}

/// Folds a list of mappings into a single `Array` mapping via a right-fold
/// composition; an empty list collapses to `Identity(n)` where `n` is
/// supplied by the caller (spec §4.3).
pub fn chain_compile(maps: &[Mapping], identity_len: u32) -> Result<Mapping, MeshError> {
    let mut iter = maps.iter().rev();
    let mut acc = match iter.next() {
        Some(last) => last.clone(),
        None => return Ok(Mapping::Identity(identity_len)),
    };
    for m in iter {
        acc = compile(m, &acc)?;
    }
    Ok(acc)
}
