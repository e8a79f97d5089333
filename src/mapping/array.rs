//! The CSR-style many-to-many mapping (spec §3.5, "Array").

use nalgebra::Matrix4;

use super::{Correspondence, Lengths};
use crate::error::MeshError;

/// A CSR-style row store: `offsets[i]` is the end offset of row `i`'s run in
/// `indices`/`transforms`.
#[derive(Clone, Debug, Default)]
pub struct Csr {
    pub offsets: Vec<u32>,
    pub indices: Vec<u32>,
    pub transforms: Vec<Matrix4<f64>>,
}

impl Csr {
    pub fn with_capacity(rows: usize) -> Self {
        Csr {
            offsets: Vec::with_capacity(rows),
            indices: Vec::new(),
            transforms: Vec::new(),
        }
    }

    pub fn push_row(&mut self, indices: Vec<u32>, transforms: Vec<Matrix4<f64>>) {
        self.indices.extend(indices);
        self.transforms.extend(transforms);
        self.offsets.push(self.indices.len() as u32);
    }

    pub fn rows(&self) -> usize {
        self.offsets.len()
    }

    fn range(&self, row: usize) -> (u32, u32) {
        let start = if row == 0 { 0 } else { self.offsets[row - 1] };
        (start, self.offsets[row])
    }

    fn query(&self, row: u32) -> Result<Correspondence, MeshError> {
        let len = self.rows() as u32;
        if row >= len {
            return Err(MeshError::OutOfBounds { index: row, len });
        }
        let (start, end) = self.range(row as usize);
        let (start, end) = (start as usize, end as usize);
        Ok(Correspondence {
            indices: self.indices[start..end].to_vec(),
            transforms: self.transforms[start..end].to_vec(),
        })
    }
}

/// Many-to-many index correspondence. Both directions are stored
/// independently and supplied by the producer (triangulation, Catmull-Clark,
/// or `compile`); the system does not derive one from the other.
#[derive(Clone, Debug)]
pub struct ArrayMap {
    base_len: u32,
    self_len: u32,
    from_base: Csr,
    to_base: Csr,
}

impl ArrayMap {
    pub fn new(base_len: u32, self_len: u32, from_base: Csr, to_base: Csr) -> Self {
        debug_assert_eq!(from_base.rows() as u32, base_len);
        debug_assert_eq!(to_base.rows() as u32, self_len);
        ArrayMap {
            base_len,
            self_len,
            from_base,
            to_base,
        }
    }

    pub fn lengths(&self) -> Lengths {
        Lengths {
            base: self.base_len,
            self_: self.self_len,
        }
    }

    pub fn from_base(&self, i: u32) -> Result<Correspondence, MeshError> {
        self.from_base.query(i)
    }

    pub fn to_base(&self, j: u32) -> Result<Correspondence, MeshError> {
        self.to_base.query(j)
    }
}
