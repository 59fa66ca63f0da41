//! Three phase contract of Sigma protocol components and the proof they jointly produce.
//!
//! A prover component first produces witnesses `base^randomness`, then, given the challenge
//! computed over the witnesses of all components, the responses `randomness + challenge * secret`
//! over the integers. A verifier component checks the responses are in range and the bases are
//! certified, and recomputes the witnesses from the responses. Components exchange values only
//! through the [`ProofStore`] of the run.

use crate::{
    constants::{CHALLENGE_NAME, PROOF_COMPONENT},
    error::{ProofSystemError, VerificationFailure},
    store::{KeyClass, ProofStore, StoreKey},
};
use ark_std::{collections::BTreeMap, rand::RngCore, string::String, vec::Vec};
use num::{BigInt, BigUint, One};
use qr_group::{element::QrElementN, group::QrGroup};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// Witnesses of one component
pub type WitnessMap = BTreeMap<StoreKey, QrElementN>;

/// Responses or public values of one component
pub type ResponseMap = BTreeMap<StoreKey, SignatureValue>;

/// Value of a proof entry
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureValue {
    Integer(#[serde_as(as = "DisplayFromStr")] BigInt),
    Element(QrElementN),
    /// One integer per base index, like the responses for all vertex bases
    Indexed(#[serde_as(as = "BTreeMap<DisplayFromStr, DisplayFromStr>")] BTreeMap<usize, BigInt>),
}

/// Non-interactive proof: the challenge, the responses and the public values of all components
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofSignature {
    #[serde_as(as = "BTreeMap<DisplayFromStr, _>")]
    entries: BTreeMap<StoreKey, SignatureValue>,
}

impl ProofSignature {
    pub fn new(challenge: BigInt, entries: ResponseMap) -> Self {
        let mut entries = entries;
        entries.insert(Self::challenge_key(), SignatureValue::Integer(challenge));
        Self { entries }
    }

    pub fn from_entries(entries: BTreeMap<StoreKey, SignatureValue>) -> Self {
        Self { entries }
    }

    pub fn into_entries(self) -> BTreeMap<StoreKey, SignatureValue> {
        self.entries
    }

    pub fn challenge_key() -> StoreKey {
        StoreKey::new(PROOF_COMPONENT, KeyClass::Public, CHALLENGE_NAME)
    }

    pub fn challenge(&self) -> Result<&BigInt, VerificationFailure> {
        self.integer(&Self::challenge_key())
    }

    pub fn get(&self, key: &StoreKey) -> Option<&SignatureValue> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> &BTreeMap<StoreKey, SignatureValue> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn integer(&self, key: &StoreKey) -> Result<&BigInt, VerificationFailure> {
        match self.entry(key)? {
            SignatureValue::Integer(i) => Ok(i),
            _ => Err(VerificationFailure::MalformedEntry(key.clone())),
        }
    }

    pub fn element(&self, key: &StoreKey) -> Result<&QrElementN, VerificationFailure> {
        match self.entry(key)? {
            SignatureValue::Element(e) => Ok(e),
            _ => Err(VerificationFailure::MalformedEntry(key.clone())),
        }
    }

    /// Element at `key` that must belong to `group`
    pub fn element_of<G: QrGroup>(
        &self,
        key: &StoreKey,
        group: &G,
    ) -> Result<&QrElementN, VerificationFailure> {
        let e = self.element(key)?;
        if e.group().modulus() != group.modulus() {
            return Err(VerificationFailure::ForeignElement(key.clone()));
        }
        Ok(e)
    }

    pub fn indexed(&self, key: &StoreKey) -> Result<&BTreeMap<usize, BigInt>, VerificationFailure> {
        match self.entry(key)? {
            SignatureValue::Indexed(m) => Ok(m),
            _ => Err(VerificationFailure::MalformedEntry(key.clone())),
        }
    }

    /// Integer at `key`. An indexed key addresses one value of the indexed entry at the key without
    /// the index.
    pub fn response(&self, key: &StoreKey) -> Result<&BigInt, VerificationFailure> {
        match key.index() {
            None => self.integer(key),
            Some(i) => self
                .indexed(&key.unindexed())?
                .get(&i)
                .ok_or_else(|| VerificationFailure::MissingEntry(key.clone())),
        }
    }

    fn entry(&self, key: &StoreKey) -> Result<&SignatureValue, VerificationFailure> {
        self.entries
            .get(key)
            .ok_or_else(|| VerificationFailure::MissingEntry(key.clone()))
    }
}

/// Return `VerificationFailure::ResponseOutOfRange` unless `response` lies in `[-2^max_bits, 2^max_bits]`
pub fn check_response_length(
    key: &StoreKey,
    response: &BigInt,
    max_bits: usize,
) -> Result<(), VerificationFailure> {
    if response.magnitude() > &(BigUint::one() << max_bits) {
        return Err(VerificationFailure::ResponseOutOfRange {
            key: key.clone(),
            bits: response.bits(),
            max_bits: max_bits as u64,
        });
    }
    Ok(())
}

pub trait SigmaProver {
    /// Identifier unique among the components of a proof, first segment of all keys the
    /// component writes
    fn component_id(&self) -> &str;

    /// Derive values needed by this component or its peers before any witness is built
    fn execute_precomputation(&mut self, _store: &mut ProofStore) -> Result<(), ProofSystemError> {
        Ok(())
    }

    /// Canonical strings of the public values and bases this component proves over
    fn public_context(&self) -> Vec<String>;

    /// Values the verifier needs in the clear, like the commitment being opened
    fn public_values(&self) -> ResponseMap;

    /// Sample witness randomness, store it and return the witnesses
    fn execute_compound_pre_challenge_phase(
        &mut self,
        rng: &mut dyn RngCore,
        store: &mut ProofStore,
    ) -> Result<WitnessMap, ProofSystemError>;

    /// Compute, store and return the responses to `challenge`
    fn execute_post_challenge_phase(
        &mut self,
        challenge: &BigInt,
        store: &mut ProofStore,
    ) -> Result<ResponseMap, ProofSystemError>;

    /// Check the responses against the witnesses as a verifier would
    fn verify(&self, _challenge: &BigInt, _store: &ProofStore) -> Result<bool, ProofSystemError> {
        Ok(true)
    }
}

/// Result of running one verifier component
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComponentVerification {
    /// Witnesses recomputed from the responses
    Witnesses(WitnessMap),
    /// The proof failed a check of this component, nothing was recomputed
    Aborted(VerificationFailure),
}

impl ComponentVerification {
    pub fn witnesses(&self) -> Option<&WitnessMap> {
        match self {
            Self::Witnesses(w) => Some(w),
            Self::Aborted(_) => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }
}

pub trait SigmaVerifier {
    fn component_id(&self) -> &str;

    /// Every response of the component is present and within its bound
    fn check_lengths(&self, proof: &ProofSignature) -> Result<(), VerificationFailure>;

    /// Every base the responses refer to is certified in the extended public key
    fn check_bases_legal(&self, proof: &ProofSignature) -> Result<(), VerificationFailure>;

    /// Same strings as [`SigmaProver::public_context`] of the matching prover, rebuilt from the proof
    fn public_context(&self, proof: &ProofSignature) -> Result<Vec<String>, VerificationFailure>;

    /// Recompute the witnesses as `public^-challenge * prod base^response`. Called only after both
    /// checks passed.
    fn execute_verification(
        &mut self,
        challenge: &BigInt,
        proof: &ProofSignature,
        store: &mut ProofStore,
    ) -> Result<WitnessMap, ProofSystemError>;

    /// Run both checks and then the verification. A failed check or a malformed proof gives
    /// [`ComponentVerification::Aborted`] and not an error.
    fn execute_compound_verification(
        &mut self,
        challenge: &BigInt,
        proof: &ProofSignature,
        store: &mut ProofStore,
    ) -> Result<ComponentVerification, ProofSystemError> {
        if let Err(failure) = self
            .check_lengths(proof)
            .and_then(|_| self.check_bases_legal(proof))
        {
            return Ok(ComponentVerification::Aborted(failure));
        }
        match self.execute_verification(challenge, proof, store) {
            Ok(w) => Ok(ComponentVerification::Witnesses(w)),
            Err(ProofSystemError::MalformedProof(failure)) => {
                Ok(ComponentVerification::Aborted(failure))
            }
            Err(e) => Err(e),
        }
    }
}
