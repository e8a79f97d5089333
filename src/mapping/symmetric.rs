//! The bijective permutation mapping (spec §3.5, "Symmetric").

use itertools::Itertools;
use nalgebra::Matrix4;

use super::{Correspondence, Lengths};
use crate::error::MeshError;

/// A 1-to-1 permutation mapping with a transform per index. Per the Design
/// Notes' "setter-driven inverse derivation" rule, both directions are
/// produced together at construction time and never mutated afterward: one
/// direction is supplied, the other is derived by inverting the permutation
/// and inverting each transform.
#[derive(Clone, Debug)]
pub struct SymmetricMap {
    self_to_base: Vec<u32>,
    self_to_base_transforms: Vec<Matrix4<f64>>,
    base_to_self: Vec<u32>,
    base_to_self_transforms: Vec<Matrix4<f64>>,
}

impl SymmetricMap {
    /// Builds a mapping from a `self -> base` permutation and per-index
    /// transforms, deriving `base -> self` by inversion.
    pub fn from_self_to_base(permutation: Vec<u32>, transforms: Vec<Matrix4<f64>>) -> Self {
        let n = permutation.len();
        let mut base_to_self = vec![0u32; n];
        let mut base_to_self_transforms = vec![Matrix4::identity(); n];
        for (self_index, (&base_index, transform)) in
            permutation.iter().zip_eq(transforms.iter()).enumerate()
        {
            base_to_self[base_index as usize] = self_index as u32;
            base_to_self_transforms[base_index as usize] =
                transform.try_inverse().unwrap_or_else(Matrix4::identity);
        }
        SymmetricMap {
            self_to_base: permutation,
            self_to_base_transforms: transforms,
            base_to_self,
            base_to_self_transforms,
        }
    }

    /// Builds a mapping from a `base -> self` permutation and per-index
    /// transforms, deriving `self -> base` by inversion.
    pub fn from_base_to_self(permutation: Vec<u32>, transforms: Vec<Matrix4<f64>>) -> Self {
        // Constructing the opposite direction first and re-deriving keeps a
        // single source of truth for the inversion logic.
        let mirrored = SymmetricMap::from_self_to_base(permutation, transforms);
        SymmetricMap {
            self_to_base: mirrored.base_to_self,
            self_to_base_transforms: mirrored.base_to_self_transforms,
            base_to_self: mirrored.self_to_base,
            base_to_self_transforms: mirrored.self_to_base_transforms,
        }
    }

    pub fn lengths(&self) -> Lengths {
        let n = self.self_to_base.len() as u32;
        Lengths { base: n, self_: n }
    }

    pub fn from_base(&self, i: u32) -> Result<Correspondence, MeshError> {
        let len = self.base_to_self.len() as u32;
        if i >= len {
            return Err(MeshError::OutOfBounds { index: i, len });
        }
        let j = self.base_to_self[i as usize];
        let t = self.base_to_self_transforms[i as usize];
        Ok(Correspondence::single(j, t))
    }

    pub fn to_base(&self, j: u32) -> Result<Correspondence, MeshError> {
        let len = self.self_to_base.len() as u32;
        if j >= len {
            return Err(MeshError::OutOfBounds { index: j, len });
        }
        let i = self.self_to_base[j as usize];
        let t = self.self_to_base_transforms[j as usize];
        Ok(Correspondence::single(i, t))
    }
}
