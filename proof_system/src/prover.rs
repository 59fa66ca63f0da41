//! Prover side orchestration: runs a list of prover components in lock-step over one
//! [`ProofStore`] and assembles their responses into a [`ProofSignature`].

use crate::{
    challenge::compute_challenge,
    error::ProofSystemError,
    keys::ExtendedPublicKey,
    sigma::{ProofSignature, ResponseMap, SigmaProver},
    store::{ProofStore, StoreKey},
};
use ark_std::{
    boxed::Box, end_timer, fmt, format, marker::PhantomData, rand::RngCore, start_timer,
    string::String, vec::Vec,
};
use digest::Digest;
use num::BigInt;
use qr_group::element::QrElementN;

/// Phase a prover run is in. Phases are passed in order and a failed phase ends the run in
/// `Aborted`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProtocolState {
    Init,
    Precomputed,
    PreChallenge,
    ChallengeComputed,
    PostChallenge,
    SignatureAssembled,
    Aborted,
}

impl ProtocolState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Precomputed => "precomputed",
            Self::PreChallenge => "pre-challenge",
            Self::ChallengeComputed => "challenge-computed",
            Self::PostChallenge => "post-challenge",
            Self::SignatureAssembled => "signature-assembled",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for ProtocolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub struct ProverOrchestrator<'a, D: Digest> {
    epk: &'a ExtendedPublicKey,
    components: Vec<Box<dyn SigmaProver + 'a>>,
    store: ProofStore,
    state: ProtocolState,
    nonce: Option<Vec<u8>>,
    context: Vec<String>,
    /// Witnesses of all components, in component order
    witnesses: Vec<(StoreKey, QrElementN)>,
    challenge: Option<BigInt>,
    responses: ResponseMap,
    _digest: PhantomData<D>,
}

impl<'a, D: Digest> ProverOrchestrator<'a, D> {
    pub fn new(epk: &'a ExtendedPublicKey) -> Self {
        Self {
            epk,
            components: Vec::new(),
            store: ProofStore::new(),
            state: ProtocolState::Init,
            nonce: None,
            context: Vec::new(),
            witnesses: Vec::new(),
            challenge: None,
            responses: ResponseMap::new(),
            _digest: PhantomData,
        }
    }

    /// Bind `nonce` into the challenge. The verifier must use the same nonce.
    pub fn with_nonce(mut self, nonce: Vec<u8>) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Add a component. Components run in the order they are added, so a component reading values
    /// of another from the store must be added after it.
    pub fn add_component(
        &mut self,
        component: Box<dyn SigmaProver + 'a>,
    ) -> Result<(), ProofSystemError> {
        if self.state != ProtocolState::Init {
            return Err(ProofSystemError::InvalidStateTransition(
                self.state.name(),
                ProtocolState::Init.name(),
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

    pub fn state(&self) -> ProtocolState {
        self.state
    }

    pub fn store(&self) -> &ProofStore {
        &self.store
    }

    pub fn challenge(&self) -> Option<&BigInt> {
        self.challenge.as_ref()
    }

    /// Run `phase` if the run is in state `from` and move to `to`. An error from `phase` aborts the
    /// run, calling a phase out of order leaves the state as is.
    fn run_phase<T>(
        &mut self,
        from: ProtocolState,
        to: ProtocolState,
        phase: impl FnOnce(&mut Self) -> Result<T, ProofSystemError>,
    ) -> Result<T, ProofSystemError> {
        if self.state != from {
            return Err(ProofSystemError::InvalidStateTransition(
                self.state.name(),
                to.name(),
            ));
        }
        match phase(self) {
            Ok(t) => {
                tracing::debug!(
                    from = from.name(),
                    to = to.name(),
                    components = self.components.len(),
                    witnesses = self.witnesses.len(),
                    "prover state transition"
                );
                self.state = to;
                Ok(t)
            }
            Err(e) => {
                tracing::debug!(from = from.name(), error = %e, "prover aborted");
                self.state = ProtocolState::Aborted;
                Err(e)
            }
        }
    }

    /// Let every component derive its precomputed values and collect the public context
    pub fn execute_precomputation(&mut self) -> Result<(), ProofSystemError> {
        self.run_phase(ProtocolState::Init, ProtocolState::Precomputed, |this| {
            if this.components.is_empty() {
                return Err(ProofSystemError::NoComponents);
            }
            let timer = start_timer!(|| "Prover precomputation");
            for c in this.components.iter_mut() {
                c.execute_precomputation(&mut this.store)?;
            }
            this.context = this.epk.context_strings();
            for c in this.components.iter() {
                this.context.extend(c.public_context());
            }
            end_timer!(timer);
            Ok(())
        })
    }

    /// Collect the witnesses of all components
    pub fn execute_pre_challenge_phase<R: RngCore>(
        &mut self,
        rng: &mut R,
    ) -> Result<(), ProofSystemError> {
        self.run_phase(
            ProtocolState::Precomputed,
            ProtocolState::PreChallenge,
            |this| {
                let timer = start_timer!(|| "Prover pre-challenge phase");
                for c in this.components.iter_mut() {
                    let witnesses = c.execute_compound_pre_challenge_phase(rng, &mut this.store)?;
                    this.witnesses.extend(witnesses);
                }
                end_timer!(timer);
                Ok(())
            },
        )
    }

    /// Fiat-Shamir challenge over the public context and all witnesses
    pub fn compute_challenge(&mut self) -> Result<BigInt, ProofSystemError> {
        self.run_phase(
            ProtocolState::PreChallenge,
            ProtocolState::ChallengeComputed,
            |this| {
                let challenge = compute_challenge::<D>(
                    &this.context,
                    &this.witnesses,
                    this.nonce.as_deref(),
                    this.epk.params().l_h,
                )?;
                this.store
                    .store(ProofSignature::challenge_key(), challenge.clone())?;
                this.challenge = Some(challenge.clone());
                Ok(challenge)
            },
        )
    }

    /// Collect the responses of all components to the challenge. Every component checks its
    /// responses before the next one runs.
    pub fn execute_post_challenge_phase(&mut self) -> Result<(), ProofSystemError> {
        self.run_phase(
            ProtocolState::ChallengeComputed,
            ProtocolState::PostChallenge,
            |this| {
                let challenge = this.challenge.clone().ok_or(
                    ProofSystemError::InvalidStateTransition(
                        ProtocolState::PreChallenge.name(),
                        ProtocolState::PostChallenge.name(),
                    ),
                )?;
                let timer = start_timer!(|| "Prover post-challenge phase");
                for c in this.components.iter_mut() {
                    let responses = c.execute_post_challenge_phase(&challenge, &mut this.store)?;
                    if !c.verify(&challenge, &this.store)? {
                        return Err(ProofSystemError::SelfCheckFailed(c.component_id().into()));
                    }
                    this.responses.extend(responses);
                }
                end_timer!(timer);
                Ok(())
            },
        )
    }

    /// The challenge, all responses and the public values of all components
    pub fn assemble_signature(&mut self) -> Result<ProofSignature, ProofSystemError> {
        self.run_phase(
            ProtocolState::PostChallenge,
            ProtocolState::SignatureAssembled,
            |this| {
                let challenge = this.challenge.clone().ok_or(
                    ProofSystemError::InvalidStateTransition(
                        ProtocolState::PreChallenge.name(),
                        ProtocolState::SignatureAssembled.name(),
                    ),
                )?;
                let mut entries = this.responses.clone();
                for c in this.components.iter() {
                    entries.extend(c.public_values());
                }
                Ok(ProofSignature::new(challenge, entries))
            },
        )
    }

    /// Run all phases
    pub fn prove<R: RngCore>(&mut self, rng: &mut R) -> Result<ProofSignature, ProofSystemError> {
        let timer = start_timer!(|| format!("Prove with {} components", self.components.len()));
        self.execute_precomputation()?;
        self.execute_pre_challenge_phase(rng)?;
        self.compute_challenge()?;
        self.execute_post_challenge_phase()?;
        let proof = self.assemble_signature()?;
        end_timer!(timer);
        Ok(proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        sub_protocols::commitment::CommitmentProver, test_utils::setup_extended_key_pair,
    };
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use blake2::Blake2b512;
    use sha2::Sha256;

    #[test]
    fn phases_in_order() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let ekp = setup_extended_key_pair(&mut rng);
        let epk = &ekp.public;
        let mut prover = ProverOrchestrator::<Sha256>::new(epk);
        let c = CommitmentProver::commit(&mut rng, "commitment", epk, BigInt::from(5)).unwrap();
        prover.add_component(Box::new(c)).unwrap();

        assert!(matches!(
            prover.compute_challenge(),
            Err(ProofSystemError::InvalidStateTransition("init", "challenge-computed"))
        ));
        assert_eq!(prover.state(), ProtocolState::Init);

        prover.execute_precomputation().unwrap();
        assert_eq!(prover.state(), ProtocolState::Precomputed);
        let late = CommitmentProver::commit(&mut rng, "late", epk, BigInt::from(5)).unwrap();
        assert!(prover.add_component(Box::new(late)).is_err());
        assert!(prover.execute_post_challenge_phase().is_err());

        prover.execute_pre_challenge_phase(&mut rng).unwrap();
        let challenge = prover.compute_challenge().unwrap();
        assert!(challenge.bits() <= 256);
        assert_eq!(
            prover
                .store()
                .retrieve_integer(&ProofSignature::challenge_key())
                .unwrap(),
            &challenge
        );
        prover.execute_post_challenge_phase().unwrap();
        let proof = prover.assemble_signature().unwrap();
        assert_eq!(prover.state(), ProtocolState::SignatureAssembled);
        assert_eq!(proof.challenge().unwrap(), &challenge);
        // challenge, commitment and 2 responses
        assert_eq!(proof.len(), 4);
        assert!(prover.prove(&mut rng).is_err());
    }

    #[test]
    fn no_components() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let ekp = setup_extended_key_pair(&mut rng);
        let mut prover = ProverOrchestrator::<Sha256>::new(&ekp.public);
        assert!(matches!(
            prover.prove(&mut rng),
            Err(ProofSystemError::NoComponents)
        ));
        assert_eq!(prover.state(), ProtocolState::Aborted);
    }

    #[test]
    fn duplicate_component_id() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let ekp = setup_extended_key_pair(&mut rng);
        let epk = &ekp.public;
        let mut prover = ProverOrchestrator::<Sha256>::new(epk);
        for _ in 0..2 {
            let c = CommitmentProver::commit(&mut rng, "c", epk, BigInt::from(1)).unwrap();
            let _ = prover.add_component(Box::new(c));
        }
        assert_eq!(prover.components.len(), 1);
    }

    #[test]
    fn wrong_digest_aborts() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let ekp = setup_extended_key_pair(&mut rng);
        let epk = &ekp.public;
        let mut prover = ProverOrchestrator::<Blake2b512>::new(epk);
        let c = CommitmentProver::commit(&mut rng, "c", epk, BigInt::from(1)).unwrap();
        prover.add_component(Box::new(c)).unwrap();
        assert!(matches!(
            prover.prove(&mut rng),
            Err(ProofSystemError::DigestSizeMismatch(512, 256))
        ));
        assert_eq!(prover.state(), ProtocolState::Aborted);
    }
}
