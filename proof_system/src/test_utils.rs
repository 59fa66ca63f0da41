//! Fixtures shared by the unit tests of this crate and, through the `test-utils` feature, by the
//! `test_utils` crate.

use crate::{
    graph::{EncodedEdge, EncodedGraph, EncodedVertex},
    keys::{ExtendedKeyPair, GraphEncodingParameters, KeyGenParameters, SignerKeyPair},
};
use ark_std::{
    rand::{Rng, RngCore},
    vec::Vec,
};
use num::BigUint;
use qr_group::prime::random_prime;

/// Certainty of the primes in fixtures
pub const FIXTURE_PRIME_CERTAINTY: usize = 40;

/// Small lengths so that key generation takes milliseconds. Not secure.
pub fn test_key_gen_params() -> KeyGenParameters {
    KeyGenParameters {
        l_n: 256,
        l_m: 64,
        l_v: 400,
        l_r: 400,
        l_statzk: 80,
        l_h: 256,
        l_pt: 40,
    }
}

pub fn test_encoding_params() -> GraphEncodingParameters {
    GraphEncodingParameters {
        l_v_pool: 20,
        l_e_pool: 30,
        l_prime_v: 16,
        l_labels_v: 2,
        l_labels_e: 1,
        l_prime_l: 8,
    }
}

pub fn setup_extended_key_pair<R: RngCore>(rng: &mut R) -> ExtendedKeyPair {
    setup_extended_key_pair_with(rng, &test_key_gen_params(), &test_encoding_params())
}

pub fn setup_extended_key_pair_with<R: RngCore>(
    rng: &mut R,
    params: &KeyGenParameters,
    encoding: &GraphEncodingParameters,
) -> ExtendedKeyPair {
    let key_pair = SignerKeyPair::generate(rng, params).unwrap();
    ExtendedKeyPair::generate(rng, key_pair, encoding).unwrap()
}

fn random_labels<R: RngCore>(rng: &mut R, max_count: usize, bits: usize) -> Vec<BigUint> {
    let count = rng.gen_range(0..=max_count);
    (0..count)
        .map(|_| random_prime(rng, bits, FIXTURE_PRIME_CERTAINTY).unwrap())
        .collect()
}

/// Graph with vertices `1..=vertices` and `edges` distinct random edges. Primes and label counts
/// respect `encoding`.
pub fn random_graph<R: RngCore>(
    rng: &mut R,
    vertices: usize,
    edges: usize,
    encoding: &GraphEncodingParameters,
) -> EncodedGraph {
    assert!(edges <= vertices * vertices.saturating_sub(1));
    let mut graph = EncodedGraph::new();
    for id in 1..=vertices as u64 {
        let representative =
            random_prime(rng, encoding.l_prime_v, FIXTURE_PRIME_CERTAINTY).unwrap();
        let labels = random_labels(rng, encoding.l_labels_v, encoding.l_prime_l);
        graph
            .add_vertex(EncodedVertex::new(id, representative, labels))
            .unwrap();
    }
    while graph.edge_count() < edges {
        let source = rng.gen_range(1..=vertices as u64);
        let target = rng.gen_range(1..=vertices as u64);
        if source == target {
            continue;
        }
        let labels = random_labels(rng, encoding.l_labels_e, encoding.l_prime_l);
        let _ = graph.add_edge(EncodedEdge::new(source, target, labels));
    }
    graph
}
