//! Proof of knowledge of the opening `(m, r)` of a commitment `C = R_0^m * S^r`.
//!
//! The message can be bound to a vertex or edge exponent proven by a graph component: the prover
//! reuses that exponent's witness randomness from the store as randomness for `m`, so that both
//! responses are equal, and the verifier checks this equality against the graph verifier's
//! response in the store.

use crate::{
    challenge::context_entry,
    constants::{COMMITMENT_NAME, COMMITMENT_RANDOMNESS_NAME, MESSAGE_NAME},
    error::{ProofSystemError, VerificationFailure},
    keys::ExtendedPublicKey,
    sigma::{
        check_response_length, ProofSignature, ResponseMap, SigmaProver, SigmaVerifier,
        SignatureValue, WitnessMap,
    },
    store::{KeyClass, ProofStore, StoreKey},
};
use ark_std::{rand::RngCore, string::String, vec, vec::Vec};
use gs_crypto_utils::{expect_bit_length_at_most, misc::rand_bits_signed};
use num::BigInt;
use qr_group::element::{GroupElement, QrElementN};

fn key(id: &str, class: KeyClass, name: &str) -> StoreKey {
    StoreKey::new(id, class, name)
}

pub struct CommitmentProver<'a> {
    id: String,
    epk: &'a ExtendedPublicKey,
    message: BigInt,
    randomness: BigInt,
    commitment: QrElementN,
    shared_message_randomness: Option<StoreKey>,
}

impl<'a> CommitmentProver<'a> {
    /// Commit to `message` with the given `randomness`. `message` must fit in `l_m` bits and
    /// `randomness` in `l_r` bits.
    pub fn new(
        id: &str,
        epk: &'a ExtendedPublicKey,
        message: BigInt,
        randomness: BigInt,
    ) -> Result<Self, ProofSystemError> {
        StoreKey::check_segment(id)?;
        let params = epk.params();
        expect_bit_length_at_most!(message, params.l_m, ProofSystemError::ExponentTooLarge);
        expect_bit_length_at_most!(randomness, params.l_r, ProofSystemError::ExponentTooLarge);
        let pk = &epk.public_key;
        let commitment = QrElementN::multi_base_exp(
            &[pk.r_0.clone(), pk.s.clone()],
            &[message.clone(), randomness.clone()],
        )?;
        Ok(Self {
            id: id.into(),
            epk,
            message,
            randomness,
            commitment,
            shared_message_randomness: None,
        })
    }

    /// Commit to `message` with fresh randomness of `l_r` bits
    pub fn commit<R: RngCore>(
        rng: &mut R,
        id: &str,
        epk: &'a ExtendedPublicKey,
        message: BigInt,
    ) -> Result<Self, ProofSystemError> {
        let randomness = rand_bits_signed(rng, epk.params().l_r);
        Self::new(id, epk, message, randomness)
    }

    /// Use the witness randomness stored under `key` by another component for the message. The
    /// other component must run its pre-challenge phase first.
    pub fn with_shared_message_randomness(mut self, key: StoreKey) -> Self {
        self.shared_message_randomness = Some(key);
        self
    }

    pub fn commitment(&self) -> &QrElementN {
        &self.commitment
    }

    pub fn randomness(&self) -> &BigInt {
        &self.randomness
    }

    fn bases(&self) -> [QrElementN; 2] {
        let pk = &self.epk.public_key;
        [pk.r_0.clone(), pk.s.clone()]
    }
}

impl<'a> SigmaProver for CommitmentProver<'a> {
    fn component_id(&self) -> &str {
        &self.id
    }

    fn public_context(&self) -> Vec<String> {
        vec![context_entry(
            &key(&self.id, KeyClass::Public, COMMITMENT_NAME),
            &self.commitment,
        )]
    }

    fn public_values(&self) -> ResponseMap {
        let mut values = ResponseMap::new();
        values.insert(
            key(&self.id, KeyClass::Public, COMMITMENT_NAME),
            SignatureValue::Element(self.commitment.clone()),
        );
        values
    }

    fn execute_compound_pre_challenge_phase(
        &mut self,
        rng: &mut dyn RngCore,
        store: &mut ProofStore,
    ) -> Result<WitnessMap, ProofSystemError> {
        let params = self.epk.params();
        let m_tilde = match &self.shared_message_randomness {
            Some(k) => store.retrieve_integer(k)?.clone(),
            None => rand_bits_signed(rng, params.tilde(params.l_m)),
        };
        let r_tilde = rand_bits_signed(rng, params.tilde(params.l_r));
        let witness =
            QrElementN::multi_base_exp(&self.bases(), &[m_tilde.clone(), r_tilde.clone()])?;

        store.store(key(&self.id, KeyClass::Randomness, MESSAGE_NAME), m_tilde)?;
        store.store(
            key(&self.id, KeyClass::Randomness, COMMITMENT_RANDOMNESS_NAME),
            r_tilde,
        )?;
        let witness_key = key(&self.id, KeyClass::Witness, COMMITMENT_NAME);
        store.store(witness_key.clone(), witness.clone())?;

        let mut witnesses = WitnessMap::new();
        witnesses.insert(witness_key, witness);
        Ok(witnesses)
    }

    fn execute_post_challenge_phase(
        &mut self,
        challenge: &BigInt,
        store: &mut ProofStore,
    ) -> Result<ResponseMap, ProofSystemError> {
        let mut responses = ResponseMap::new();
        for (name, secret) in [
            (MESSAGE_NAME, &self.message),
            (COMMITMENT_RANDOMNESS_NAME, &self.randomness),
        ] {
            let tilde = store.retrieve_integer(&key(&self.id, KeyClass::Randomness, name))?;
            let hat = tilde + challenge * secret;
            let response_key = key(&self.id, KeyClass::Response, name);
            store.store(response_key.clone(), hat.clone())?;
            responses.insert(response_key, SignatureValue::Integer(hat));
        }
        Ok(responses)
    }

    fn verify(&self, challenge: &BigInt, store: &ProofStore) -> Result<bool, ProofSystemError> {
        let m_hat = store.retrieve_integer(&key(&self.id, KeyClass::Response, MESSAGE_NAME))?;
        let r_hat = store.retrieve_integer(&key(
            &self.id,
            KeyClass::Response,
            COMMITMENT_RANDOMNESS_NAME,
        ))?;
        let witness = store.retrieve_element(&key(&self.id, KeyClass::Witness, COMMITMENT_NAME))?;
        let pk = &self.epk.public_key;
        let recomputed = QrElementN::multi_base_exp(
            &[self.commitment.clone(), pk.r_0.clone(), pk.s.clone()],
            &[-challenge, m_hat.clone(), r_hat.clone()],
        )?;
        Ok(&recomputed == witness)
    }
}

pub struct CommitmentVerifier<'a> {
    id: String,
    epk: &'a ExtendedPublicKey,
    shared_message_response: Option<StoreKey>,
}

impl<'a> CommitmentVerifier<'a> {
    pub fn new(id: &str, epk: &'a ExtendedPublicKey) -> Result<Self, ProofSystemError> {
        StoreKey::check_segment(id)?;
        Ok(Self {
            id: id.into(),
            epk,
            shared_message_response: None,
        })
    }

    /// Require the message response to equal the response another verifier component stored
    /// under `key`. That component must be verified first.
    pub fn with_shared_message_response(mut self, key: StoreKey) -> Self {
        self.shared_message_response = Some(key);
        self
    }
}

impl<'a> SigmaVerifier for CommitmentVerifier<'a> {
    fn component_id(&self) -> &str {
        &self.id
    }

    fn check_lengths(&self, proof: &ProofSignature) -> Result<(), VerificationFailure> {
        let params = self.epk.params();
        proof.element_of(
            &key(&self.id, KeyClass::Public, COMMITMENT_NAME),
            self.epk.group(),
        )?;
        for (name, max_bits) in [
            (MESSAGE_NAME, params.l_hat_m()),
            (COMMITMENT_RANDOMNESS_NAME, params.l_hat_r()),
        ] {
            let k = key(&self.id, KeyClass::Response, name);
            check_response_length(&k, proof.integer(&k)?, max_bits)?;
        }
        // The response the message is bound to must be in the proof. Its absence from the store
        // later means the verifier components were added in the wrong order.
        if let Some(shared) = &self.shared_message_response {
            proof.response(shared)?;
        }
        Ok(())
    }

    /// Only `R_0` and `S` of the public key are used
    fn check_bases_legal(&self, _proof: &ProofSignature) -> Result<(), VerificationFailure> {
        Ok(())
    }

    fn public_context(&self, proof: &ProofSignature) -> Result<Vec<String>, VerificationFailure> {
        let k = key(&self.id, KeyClass::Public, COMMITMENT_NAME);
        Ok(vec![context_entry(&k, proof.element(&k)?)])
    }

    fn execute_verification(
        &mut self,
        challenge: &BigInt,
        proof: &ProofSignature,
        store: &mut ProofStore,
    ) -> Result<WitnessMap, ProofSystemError> {
        let commitment = proof.element(&key(&self.id, KeyClass::Public, COMMITMENT_NAME))?;
        let m_key = key(&self.id, KeyClass::Response, MESSAGE_NAME);
        let r_key = key(&self.id, KeyClass::Response, COMMITMENT_RANDOMNESS_NAME);
        let m_hat = proof.integer(&m_key)?;
        let r_hat = proof.integer(&r_key)?;
        if let Some(shared) = &self.shared_message_response {
            if store.retrieve_integer(shared)? != m_hat {
                return Err(VerificationFailure::ResponseMismatch(m_key, shared.clone()).into());
            }
        }

        let pk = &self.epk.public_key;
        let witness = QrElementN::multi_base_exp(
            &[commitment.clone(), pk.r_0.clone(), pk.s.clone()],
            &[-challenge, m_hat.clone(), r_hat.clone()],
        )?;
        store.store(m_key, m_hat.clone())?;
        store.store(r_key, r_hat.clone())?;
        let witness_key = key(&self.id, KeyClass::Witness, COMMITMENT_NAME);
        store.store(witness_key.clone(), witness.clone())?;

        let mut witnesses = WitnessMap::new();
        witnesses.insert(witness_key, witness);
        Ok(witnesses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{sigma::ComponentVerification, test_utils::setup_extended_key_pair};
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn completeness() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let ekp = setup_extended_key_pair(&mut rng);
        let epk = &ekp.public;
        let message = BigInt::from(1234567u64);
        let mut prover = CommitmentProver::commit(&mut rng, "commitment", epk, message).unwrap();

        let mut store = ProofStore::new();
        let tilde = prover
            .execute_compound_pre_challenge_phase(&mut rng, &mut store)
            .unwrap();
        let challenge = BigInt::from(0xdead_beef_u64);
        let responses = prover
            .execute_post_challenge_phase(&challenge, &mut store)
            .unwrap();
        assert!(prover.verify(&challenge, &store).unwrap());
        assert_eq!(responses.len(), 2);

        let mut entries = responses;
        entries.extend(prover.public_values());
        let proof = ProofSignature::new(challenge.clone(), entries);

        let mut verifier = CommitmentVerifier::new("commitment", epk).unwrap();
        let mut verifier_store = ProofStore::new();
        let hat = verifier
            .execute_compound_verification(&challenge, &proof, &mut verifier_store)
            .unwrap();
        assert_eq!(hat.witnesses().unwrap(), &tilde);
        assert_eq!(
            verifier.public_context(&proof).unwrap(),
            prover.public_context()
        );
    }

    #[test]
    fn oversized_inputs() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let ekp = setup_extended_key_pair(&mut rng);
        let epk = &ekp.public;
        let l_m = epk.params().l_m;
        let l_r = epk.params().l_r;
        assert!(matches!(
            CommitmentProver::new("c", epk, BigInt::from(1) << l_m, BigInt::from(1)),
            Err(ProofSystemError::ExponentTooLarge(_, _))
        ));
        assert!(matches!(
            CommitmentProver::new("c", epk, BigInt::from(1), BigInt::from(1) << l_r),
            Err(ProofSystemError::ExponentTooLarge(_, _))
        ));
        assert!(CommitmentProver::new("c:d", epk, BigInt::from(1), BigInt::from(1)).is_err());
        assert!(CommitmentVerifier::new("", epk).is_err());
    }

    #[test]
    fn inflated_response_aborts() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let ekp = setup_extended_key_pair(&mut rng);
        let epk = &ekp.public;
        let mut prover =
            CommitmentProver::commit(&mut rng, "commitment", epk, BigInt::from(42)).unwrap();
        let mut store = ProofStore::new();
        prover
            .execute_compound_pre_challenge_phase(&mut rng, &mut store)
            .unwrap();
        let challenge = BigInt::from(77);
        let mut entries = prover
            .execute_post_challenge_phase(&challenge, &mut store)
            .unwrap();
        entries.extend(prover.public_values());

        let m_key = key("commitment", KeyClass::Response, MESSAGE_NAME);
        let inflated = BigInt::from(1) << (epk.params().l_hat_m() + 10);
        if let Some(SignatureValue::Integer(m)) = entries.get_mut(&m_key) {
            *m += inflated;
        }
        let proof = ProofSignature::new(challenge.clone(), entries);
        let mut verifier = CommitmentVerifier::new("commitment", epk).unwrap();
        assert!(verifier.check_lengths(&proof).is_err());
        let result = verifier
            .execute_compound_verification(&challenge, &proof, &mut ProofStore::new())
            .unwrap();
        assert!(matches!(
            result,
            ComponentVerification::Aborted(VerificationFailure::ResponseOutOfRange { key, .. }) if key == m_key
        ));
    }

    #[test]
    fn shared_response_must_be_in_proof() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let ekp = setup_extended_key_pair(&mut rng);
        let epk = &ekp.public;
        let mut prover =
            CommitmentProver::commit(&mut rng, "commitment", epk, BigInt::from(42)).unwrap();
        let mut store = ProofStore::new();
        prover
            .execute_compound_pre_challenge_phase(&mut rng, &mut store)
            .unwrap();
        let challenge = BigInt::from(77);
        let mut entries = prover
            .execute_post_challenge_phase(&challenge, &mut store)
            .unwrap();
        entries.extend(prover.public_values());
        let m_hat = store
            .retrieve_integer(&key("commitment", KeyClass::Response, MESSAGE_NAME))
            .unwrap()
            .clone();

        let shared = StoreKey::indexed("graph", KeyClass::Response, "vertex", 5);
        let verifier = || {
            CommitmentVerifier::new("commitment", epk)
                .unwrap()
                .with_shared_message_response(shared.clone())
        };

        // Proof without the bound response is rejected
        let proof = ProofSignature::new(challenge.clone(), entries.clone());
        assert_eq!(
            verifier()
                .execute_compound_verification(&challenge, &proof, &mut ProofStore::new())
                .unwrap(),
            ComponentVerification::Aborted(VerificationFailure::MissingEntry(shared.unindexed()))
        );
        let mut other_index = entries.clone();
        other_index.insert(
            shared.unindexed(),
            SignatureValue::Indexed([(6, m_hat.clone())].into_iter().collect()),
        );
        let proof = ProofSignature::new(challenge.clone(), other_index);
        assert_eq!(
            verifier()
                .execute_compound_verification(&challenge, &proof, &mut ProofStore::new())
                .unwrap(),
            ComponentVerification::Aborted(VerificationFailure::MissingEntry(shared.clone()))
        );

        // Response in the proof but not yet stored by the component it is bound to
        entries.insert(
            shared.unindexed(),
            SignatureValue::Indexed([(5, m_hat.clone())].into_iter().collect()),
        );
        let proof = ProofSignature::new(challenge.clone(), entries);
        assert!(matches!(
            verifier().execute_compound_verification(&challenge, &proof, &mut ProofStore::new()),
            Err(ProofSystemError::MissingStoreKey(k)) if k == shared
        ));

        let mut verifier_store = ProofStore::new();
        verifier_store.store(shared.clone(), m_hat).unwrap();
        assert!(verifier()
            .execute_compound_verification(&challenge, &proof, &mut verifier_store)
            .unwrap()
            .witnesses()
            .is_some());
    }
}
