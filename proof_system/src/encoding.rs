//! Assigns the vertices and edges of an encoded graph to certified bases of an extended public key.
//! Each graph element gets a distinct base drawn uniformly from the bases of its type not yet
//! assigned, and the base's exponent is set to the element's exponent.

use crate::{
    base::{BaseCollection, BaseRepresentation, BaseType},
    error::ProofSystemError,
    graph::EncodedGraph,
    keys::ExtendedPublicKey,
};
use ark_std::{
    collections::BTreeMap,
    end_timer, format,
    rand::{Rng, RngCore},
    start_timer,
    vec::Vec,
};
use gs_crypto_utils::expect_bit_length_at_most;
use num::{BigInt, BigUint};

/// Bases of one graph with exponents set, and which base each vertex and edge was given
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphBases {
    pub bases: BaseCollection,
    vertex_bases: BTreeMap<u64, usize>,
    edge_bases: BTreeMap<(u64, u64), usize>,
}

impl GraphBases {
    /// Index of the base assigned to vertex `id`
    pub fn vertex_base_index(&self, id: u64) -> Option<usize> {
        self.vertex_bases.get(&id).copied()
    }

    /// Index of the base assigned to the edge from `source` to `target`
    pub fn edge_base_index(&self, source: u64, target: u64) -> Option<usize> {
        self.edge_bases.get(&(source, target)).copied()
    }

    pub fn vertex_base(&self, id: u64) -> Option<&BaseRepresentation> {
        self.vertex_base_index(id)
            .and_then(|i| self.bases.get(i, BaseType::Vertex))
    }

    pub fn vertex_base_indices(&self) -> &BTreeMap<u64, usize> {
        &self.vertex_bases
    }
}

/// Certified bases of one type that are still free
struct BasePool<'a> {
    base_type: BaseType,
    size: usize,
    remaining: Vec<&'a BaseRepresentation>,
}

impl<'a> BasePool<'a> {
    fn new(epk: &'a ExtendedPublicKey, base_type: BaseType) -> Self {
        let remaining = epk.bases.create_iterator(base_type).collect::<Vec<_>>();
        Self {
            base_type,
            size: remaining.len(),
            remaining,
        }
    }

    /// Remove a uniformly random base from the pool
    fn draw<R: RngCore + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<&'a BaseRepresentation, ProofSystemError> {
        if self.remaining.is_empty() {
            return Err(ProofSystemError::BasePoolExhausted(
                self.base_type,
                self.size,
            ));
        }
        let i = rng.gen_range(0..self.remaining.len());
        Ok(self.remaining.swap_remove(i))
    }
}

fn assign<R: RngCore + ?Sized>(
    rng: &mut R,
    pool: &mut BasePool<'_>,
    exponent: BigUint,
    max_bits: usize,
    bases: &mut BaseCollection,
) -> Result<usize, ProofSystemError> {
    expect_bit_length_at_most!(exponent, max_bits, ProofSystemError::ExponentTooLarge);
    let mut base = pool.draw(rng)?.without_exponent();
    base.set_exponent(BigInt::from(exponent))?;
    let index = base.base_index();
    bases.add(base)?;
    Ok(index)
}

/// Assign every vertex and then every edge of `graph` to a free base of `epk`. Fails when the graph
/// has more vertices or edges than `epk` has bases of that type, or an element has too many labels
/// or too large an exponent.
pub fn encode_graph<R: RngCore + ?Sized>(
    rng: &mut R,
    graph: &EncodedGraph,
    epk: &ExtendedPublicKey,
) -> Result<GraphBases, ProofSystemError> {
    let timer = start_timer!(|| format!(
        "Encode graph with {} vertices and {} edges",
        graph.vertex_count(),
        graph.edge_count()
    ));
    let encoding = &epk.encoding;
    let l_m = epk.params().l_m;
    let mut bases = BaseCollection::new();

    let mut vertex_pool = BasePool::new(epk, BaseType::Vertex);
    let mut vertex_bases = BTreeMap::new();
    for v in graph.vertices() {
        if v.labels.len() > encoding.l_labels_v {
            return Err(ProofSystemError::TooManyLabels(
                v.labels.len(),
                encoding.l_labels_v,
            ));
        }
        let index = assign(rng, &mut vertex_pool, v.exponent(), l_m, &mut bases)?;
        vertex_bases.insert(v.id, index);
    }

    let mut edge_pool = BasePool::new(epk, BaseType::Edge);
    let mut edge_bases = BTreeMap::new();
    for e in graph.edges() {
        if e.labels.len() > encoding.l_labels_e {
            return Err(ProofSystemError::TooManyLabels(
                e.labels.len(),
                encoding.l_labels_e,
            ));
        }
        let exponent = graph.edge_exponent(e)?;
        let index = assign(rng, &mut edge_pool, exponent, l_m, &mut bases)?;
        edge_bases.insert((e.source, e.target), index);
    }
    end_timer!(timer);
    tracing::debug!(
        vertices = vertex_bases.len(),
        edges = edge_bases.len(),
        "encoded graph"
    );
    Ok(GraphBases {
        bases,
        vertex_bases,
        edge_bases,
    })
}
