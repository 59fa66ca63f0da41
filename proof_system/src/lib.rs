//! Sigma protocol proofs over graphs signed with a Camenisch-Lysyanskaya style graph signature.
//!
//! The signer's [`ExtendedPublicKey`] certifies a pool of vertex and edge bases `R_i` in `QR_N`. A
//! graph is encoded by assigning each vertex and edge a distinct, randomly chosen base and setting
//! that base's exponent to the element's prime encoding ([`encode_graph`]). Proofs are then
//! statements about the resulting [`BaseCollection`].
//!
//! A proof is composed from independent components, each implementing [`SigmaProver`] and
//! [`SigmaVerifier`]. The [`ProverOrchestrator`] runs all prover components through the phases
//! precomputation, pre-challenge (witnesses), challenge (Fiat-Shamir hash over the public context and
//! all witnesses) and post-challenge (responses), and assembles a [`ProofSignature`]. The
//! [`VerifierOrchestrator`] checks every response's bit length and every base, recomputes the
//! witnesses from the responses and accepts iff the recomputed challenge equals the proof's.
//!
//! Components never reference each other. They exchange values through the [`ProofStore`] of a run,
//! under hierarchical [`StoreKey`]s like `gs:graph:randomness:vertex:17`. This is how a commitment
//! component proves its message equals the exponent of a vertex proven by a graph component: it
//! reuses that exponent's witness randomness, so both responses must be equal.
//!
//! Provided components:
//! - [`CommitmentProver`]/[`CommitmentVerifier`] for the opening of `C = R_0^m * S^r`
//! - [`GraphRepresentationProver`]/[`GraphRepresentationVerifier`] for the representation
//!   `U = S^v * prod R_i^e_i` over the bases of an encoded graph
//!
//! See the tests in `tests/` for complete runs.
//!
//! [`ExtendedPublicKey`]: crate::keys::ExtendedPublicKey
//! [`encode_graph`]: crate::encoding::encode_graph
//! [`BaseCollection`]: crate::base::BaseCollection
//! [`SigmaProver`]: crate::sigma::SigmaProver
//! [`SigmaVerifier`]: crate::sigma::SigmaVerifier
//! [`ProverOrchestrator`]: crate::prover::ProverOrchestrator
//! [`VerifierOrchestrator`]: crate::verifier::VerifierOrchestrator
//! [`ProofSignature`]: crate::sigma::ProofSignature
//! [`ProofStore`]: crate::store::ProofStore
//! [`StoreKey`]: crate::store::StoreKey
//! [`CommitmentProver`]: crate::sub_protocols::commitment::CommitmentProver
//! [`CommitmentVerifier`]: crate::sub_protocols::commitment::CommitmentVerifier
//! [`GraphRepresentationProver`]: crate::sub_protocols::graph_representation::GraphRepresentationProver
//! [`GraphRepresentationVerifier`]: crate::sub_protocols::graph_representation::GraphRepresentationVerifier

pub mod base;
pub mod challenge;
pub mod constants;
pub mod encoding;
pub mod error;
pub mod graph;
pub mod keys;
pub mod prover;
pub mod sigma;
pub mod store;
pub mod sub_protocols;
pub mod verifier;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub mod prelude {
    pub use crate::base::*;
    pub use crate::encoding::{encode_graph, GraphBases};
    pub use crate::error::{ProofSystemError, VerificationFailure, VerificationOutcome};
    pub use crate::graph::*;
    pub use crate::keys::*;
    pub use crate::prover::*;
    pub use crate::sigma::*;
    pub use crate::store::*;
    pub use crate::sub_protocols::{commitment::*, graph_representation::*};
    pub use crate::verifier::*;
}
