//! Graphs whose vertices and labels already carry prime representatives

use crate::error::ProofSystemError;
use ark_std::{
    collections::{BTreeMap, BTreeSet},
    vec::Vec,
};
use num::{BigUint, One};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedVertex {
    pub id: u64,
    /// Prime representing the vertex
    #[serde_as(as = "DisplayFromStr")]
    pub representative: BigUint,
    /// Primes representing the labels of the vertex
    #[serde_as(as = "Vec<DisplayFromStr>")]
    pub labels: Vec<BigUint>,
}

impl EncodedVertex {
    pub fn new(id: u64, representative: BigUint, labels: Vec<BigUint>) -> Self {
        Self {
            id,
            representative,
            labels,
        }
    }

    /// Product of the vertex representative and all label representatives
    pub fn exponent(&self) -> BigUint {
        &self.representative * label_product(&self.labels)
    }
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedEdge {
    pub source: u64,
    pub target: u64,
    #[serde_as(as = "Vec<DisplayFromStr>")]
    pub labels: Vec<BigUint>,
}

impl EncodedEdge {
    pub fn new(source: u64, target: u64, labels: Vec<BigUint>) -> Self {
        Self {
            source,
            target,
            labels,
        }
    }
}

fn label_product(labels: &[BigUint]) -> BigUint {
    labels.iter().fold(BigUint::one(), |acc, l| acc * l)
}

/// Vertices and edges in insertion order. Every edge connects two vertices of the graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GraphRepr", into = "GraphRepr")]
pub struct EncodedGraph {
    vertices: Vec<EncodedVertex>,
    positions: BTreeMap<u64, usize>,
    edges: Vec<EncodedEdge>,
    edge_ids: BTreeSet<(u64, u64)>,
}

#[derive(Serialize, Deserialize)]
struct GraphRepr {
    vertices: Vec<EncodedVertex>,
    edges: Vec<EncodedEdge>,
}

impl TryFrom<GraphRepr> for EncodedGraph {
    type Error = ProofSystemError;

    fn try_from(r: GraphRepr) -> Result<Self, Self::Error> {
        let mut g = Self::new();
        for v in r.vertices {
            g.add_vertex(v)?;
        }
        for e in r.edges {
            g.add_edge(e)?;
        }
        Ok(g)
    }
}

impl From<EncodedGraph> for GraphRepr {
    fn from(g: EncodedGraph) -> Self {
        Self {
            vertices: g.vertices,
            edges: g.edges,
        }
    }
}

impl EncodedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, vertex: EncodedVertex) -> Result<(), ProofSystemError> {
        if self.positions.contains_key(&vertex.id) {
            return Err(ProofSystemError::DuplicateVertex(vertex.id));
        }
        self.positions.insert(vertex.id, self.vertices.len());
        self.vertices.push(vertex);
        Ok(())
    }

    /// Both endpoints must already be in the graph. An edge can be added once per direction.
    pub fn add_edge(&mut self, edge: EncodedEdge) -> Result<(), ProofSystemError> {
        for id in [edge.source, edge.target] {
            if !self.positions.contains_key(&id) {
                return Err(ProofSystemError::UnknownVertex(id));
            }
        }
        if !self.edge_ids.insert((edge.source, edge.target)) {
            return Err(ProofSystemError::DuplicateEdge(edge.source, edge.target));
        }
        self.edges.push(edge);
        Ok(())
    }

    pub fn vertex(&self, id: u64) -> Option<&EncodedVertex> {
        self.positions.get(&id).map(|p| &self.vertices[*p])
    }

    pub fn vertices(&self) -> &[EncodedVertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[EncodedEdge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Product of both endpoint representatives and all label representatives of `edge`
    pub fn edge_exponent(&self, edge: &EncodedEdge) -> Result<BigUint, ProofSystemError> {
        let source = self
            .vertex(edge.source)
            .ok_or(ProofSystemError::UnknownVertex(edge.source))?;
        let target = self
            .vertex(edge.target)
            .ok_or(ProofSystemError::UnknownVertex(edge.target))?;
        Ok(&source.representative * &target.representative * label_product(&edge.labels))
    }
}
