//! End-to-end scenarios against the mapping primitives (spec §8, v-vi, and
//! the associativity/identity-law properties).

use nalgebra::Matrix4;

use meshgraph::mapping::{compile, ArrayMap, Csr, Mapping, SymmetricMap};

fn permutation_map(permutation: &[u32]) -> Mapping {
    // `from_base_to_self` stores `permutation` as the base->self direction
    // verbatim, so `from_base(i) == [permutation[i]]` directly — matching
    // how the test below substitutes `a`/`b` as forward base->self lookups.
    Mapping::Symmetric(SymmetricMap::from_base_to_self(
        permutation.to_vec(),
        vec![Matrix4::identity(); permutation.len()],
    ))
}

#[test]
fn identity_compile() {
    let identity = Mapping::Identity(4);
    let composed = compile(&identity, &identity).unwrap();
    for i in 0..4u32 {
        assert_eq!(composed.from_base(i).unwrap().indices, vec![i]);
    }
}

#[test]
fn symmetric_compile_matches_direct_permutation_composition() {
    // base -> self permutations; composing them should match substituting
    // one permutation's outputs into the other's.
    let a = vec![1u32, 4, 3, 5, 2, 0];
    let b = vec![4u32, 1, 2, 5, 3, 0];
    let map_a = permutation_map(&a);
    let map_b = permutation_map(&b);
    let composed = compile(&map_a, &map_b).unwrap();

    for i in 0..6u32 {
        let via_a = a[i as usize];
        let expected = b[via_a as usize];
        let got = composed.from_base(i).unwrap();
        assert_eq!(got.indices, vec![expected]);
    }
}

#[test]
fn compile_identity_law() {
    let csr_from_base = {
        let mut csr = Csr::with_capacity(3);
        csr.push_row(vec![0, 1], vec![Matrix4::identity(); 2]);
        csr.push_row(vec![1, 2], vec![Matrix4::identity(); 2]);
        csr.push_row(vec![2], vec![Matrix4::identity()]);
        csr
    };
    let csr_to_base = {
        let mut csr = Csr::with_capacity(3);
        csr.push_row(vec![0], vec![Matrix4::identity()]);
        csr.push_row(vec![0, 1], vec![Matrix4::identity(); 2]);
        csr.push_row(vec![1, 2], vec![Matrix4::identity(); 2]);
        csr
    };
    let array = Mapping::Array(ArrayMap::new(3, 3, csr_from_base, csr_to_base));
    let identity = Mapping::Identity(3);

    let composed = compile(&array, &identity).unwrap();
    for i in 0..3u32 {
        let mut original: Vec<u32> = array.from_base(i).unwrap().indices;
        let mut got: Vec<u32> = composed.from_base(i).unwrap().indices;
        original.sort_unstable();
        got.sort_unstable();
        assert_eq!(original, got);
    }
}

#[test]
fn compile_is_associative_on_index_sets() {
    let a = Mapping::Symmetric(SymmetricMap::from_self_to_base(
        vec![2, 0, 1],
        vec![Matrix4::identity(); 3],
    ));
    let b = Mapping::Symmetric(SymmetricMap::from_self_to_base(
        vec![1, 2, 0],
        vec![Matrix4::identity(); 3],
    ));
    let c = Mapping::Symmetric(SymmetricMap::from_self_to_base(
        vec![0, 2, 1],
        vec![Matrix4::identity(); 3],
    ));

    let left = compile(&compile(&a, &b).unwrap(), &c).unwrap();
    let right = compile(&a, &compile(&b, &c).unwrap()).unwrap();

    for x in 0..3u32 {
        let mut l: Vec<u32> = left.from_base(x).unwrap().indices;
        let mut r: Vec<u32> = right.from_base(x).unwrap().indices;
        l.sort_unstable();
        r.sort_unstable();
        assert_eq!(l, r);
    }
}
