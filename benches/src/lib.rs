use ark_std::rand::RngCore;
use gs_proof_system::prelude::{
    GraphRepresentationProver, GraphRepresentationVerifier, ProofSignature, ProverOrchestrator,
    VerificationOutcome, VerifierOrchestrator,
};
use gs_proof_system::{base::BaseCollection, keys::ExtendedPublicKey};
use sha2::Sha256;

/// Graph sizes benchmarked, as vertex count. Every graph has twice as many edges.
pub const VERTEX_COUNTS: [usize; 4] = [5, 10, 20, 40];

pub fn prove_graph<R: RngCore>(
    rng: &mut R,
    epk: &ExtendedPublicKey,
    bases: &BaseCollection,
) -> ProofSignature {
    let mut prover = ProverOrchestrator::<Sha256>::new(epk);
    let graph = GraphRepresentationProver::commit(rng, "graph", epk, bases.clone()).unwrap();
    prover.add_component(Box::new(graph)).unwrap();
    prover.prove(rng).unwrap()
}

pub fn verify_graph(epk: &ExtendedPublicKey, proof: &ProofSignature) -> VerificationOutcome {
    let mut verifier = VerifierOrchestrator::<Sha256>::new(epk);
    verifier
        .add_component(Box::new(
            GraphRepresentationVerifier::new("graph", epk).unwrap(),
        ))
        .unwrap();
    verifier.verify(proof).unwrap()
}
