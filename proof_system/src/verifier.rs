//! Verifier side orchestration: runs a list of verifier components over a [`ProofSignature`],
//! recomputes the challenge from the recomputed witnesses and compares it to the proof's.

use crate::{
    challenge::compute_challenge,
    error::{ProofSystemError, VerificationFailure, VerificationOutcome},
    keys::ExtendedPublicKey,
    sigma::{ComponentVerification, ProofSignature, SigmaVerifier},
    store::{ProofStore, StoreKey},
};
use ark_std::{boxed::Box, end_timer, fmt, format, marker::PhantomData, start_timer, vec::Vec};
use digest::Digest;
use qr_group::element::QrElementN;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerifierState {
    Init,
    WitnessesRecomputed,
    Accepted,
    Rejected,
}

impl VerifierState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::WitnessesRecomputed => "witnesses-recomputed",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for VerifierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Verifies one proof. Create a new orchestrator for every proof.
pub struct VerifierOrchestrator<'a, D: Digest> {
    epk: &'a ExtendedPublicKey,
    components: Vec<Box<dyn SigmaVerifier + 'a>>,
    store: ProofStore,
    state: VerifierState,
    nonce: Option<Vec<u8>>,
    _digest: PhantomData<D>,
}

impl<'a, D: Digest> VerifierOrchestrator<'a, D> {
    pub fn new(epk: &'a ExtendedPublicKey) -> Self {
        Self {
            epk,
            components: Vec::new(),
            store: ProofStore::new(),
            state: VerifierState::Init,
            nonce: None,
            _digest: PhantomData,
        }
    }

    /// Nonce the prover bound into the challenge
    pub fn with_nonce(mut self, nonce: Vec<u8>) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Add a component. Must mirror the prover's components and their order.
    pub fn add_component(
        &mut self,
        component: Box<dyn SigmaVerifier + 'a>,
    ) -> Result<(), ProofSystemError> {
        if self.state != VerifierState::Init {
            return Err(ProofSystemError::InvalidStateTransition(
                self.state.name(),
                VerifierState::Init.name(),
            ));
        }
        let id = component.component_id();
        if self.components.iter().any(|c| c.component_id() == id) {
            return Err(ProofSystemError::InvalidParameters(format!(
                "component {} added twice",
                id
            )));
        }
        self.components.push(component);
        Ok(())
    }

    pub fn state(&self) -> VerifierState {
        self.state
    }

    pub fn store(&self) -> &ProofStore {
        &self.store
    }

    fn reject(&mut self, failure: VerificationFailure) -> VerificationOutcome {
        tracing::warn!(%failure, "proof rejected");
        self.state = VerifierState::Rejected;
        VerificationOutcome::Rejected(failure)
    }

    /// Verify `proof`. A proof failing any check gives [`VerificationOutcome::Rejected`] and the
    /// remaining components are not run. Errors are reserved for misuse and misconfiguration.
    pub fn verify(
        &mut self,
        proof: &ProofSignature,
    ) -> Result<VerificationOutcome, ProofSystemError> {
        if self.state != VerifierState::Init {
            return Err(ProofSystemError::InvalidStateTransition(
                self.state.name(),
                VerifierState::WitnessesRecomputed.name(),
            ));
        }
        if self.components.is_empty() {
            return Err(ProofSystemError::NoComponents);
        }
        let timer = start_timer!(|| format!("Verify with {} components", self.components.len()));
        let challenge = match proof.challenge() {
            Ok(c) => c.clone(),
            Err(failure) => return Ok(self.reject(failure)),
        };

        let mut context = self.epk.context_strings();
        let mut witnesses: Vec<(StoreKey, QrElementN)> = Vec::new();
        let mut failure = None;
        for c in self.components.iter_mut() {
            match c.public_context(proof) {
                Ok(ctx) => context.extend(ctx),
                Err(f) => {
                    failure = Some(f);
                    break;
                }
            }
            match c.execute_compound_verification(&challenge, proof, &mut self.store)? {
                ComponentVerification::Witnesses(w) => witnesses.extend(w),
                ComponentVerification::Aborted(f) => {
                    failure = Some(f);
                    break;
                }
            }
        }
        if let Some(f) = failure {
            return Ok(self.reject(f));
        }
        self.state = VerifierState::WitnessesRecomputed;
        tracing::debug!(
            components = self.components.len(),
            witnesses = witnesses.len(),
            "verifier recomputed witnesses"
        );

        let recomputed = compute_challenge::<D>(
            &context,
            &witnesses,
            self.nonce.as_deref(),
            self.epk.params().l_h,
        )?;
        end_timer!(timer);
        if recomputed != challenge {
            return Ok(self.reject(VerificationFailure::ChallengeMismatch));
        }
        self.state = VerifierState::Accepted;
        tracing::debug!("proof accepted");
        Ok(VerificationOutcome::Accepted)
    }
}
