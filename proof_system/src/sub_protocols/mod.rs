//! Sigma protocol components. Each has a prover and a verifier half implementing
//! [`SigmaProver`](crate::sigma::SigmaProver) and [`SigmaVerifier`](crate::sigma::SigmaVerifier).

pub mod commitment;
pub mod graph_representation;
