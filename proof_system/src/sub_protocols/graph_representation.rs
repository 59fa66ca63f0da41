//! Proof of knowledge of the representation `U = S^v * prod R_i^e_i` of a graph commitment over
//! certified vertex and edge bases `R_i` of an extended public key.
//!
//! The responses for the vertex and edge exponents are filed in the proof as one indexed entry per
//! base type, keyed by base index. The verifier takes the bases from its own copy of the extended
//! public key, so a proof over a base the signer never certified is rejected.

use crate::{
    base::{BaseCollection, BaseRepresentation, BaseType},
    challenge::context_entry,
    constants::{EDGE_NAME, GRAPH_COMMITMENT_NAME, GRAPH_RANDOMNESS_NAME, VERTEX_NAME},
    error::{ProofSystemError, VerificationFailure},
    keys::ExtendedPublicKey,
    sigma::{
        check_response_length, ProofSignature, ResponseMap, SigmaProver, SigmaVerifier,
        SignatureValue, WitnessMap,
    },
    store::{KeyClass, ProofStore, StoreKey},
};
use ark_std::{
    collections::BTreeMap,
    end_timer, format,
    rand::RngCore,
    start_timer,
    string::{String, ToString},
    vec,
    vec::Vec,
};
use gs_crypto_utils::{expect_bit_length_at_most, misc::rand_bits_signed};
use itertools::Itertools;
use num::BigInt;
use qr_group::element::{GroupElement, QrElementN};

/// Base types a graph is encoded over and the names their exponents are filed under
const GRAPH_BASE_TYPES: [(BaseType, &str); 2] =
    [(BaseType::Vertex, VERTEX_NAME), (BaseType::Edge, EDGE_NAME)];

fn exponent_name(base_type: BaseType) -> Result<&'static str, ProofSystemError> {
    GRAPH_BASE_TYPES
        .iter()
        .find(|(t, _)| *t == base_type)
        .map(|(_, name)| *name)
        .ok_or_else(|| {
            ProofSystemError::InvalidParameters(format!(
                "no exponent is proven for bases of type {}",
                base_type
            ))
        })
}

/// Key under which the prover component `id` stores the witness randomness of the exponent of a
/// vertex or edge base. A commitment prover reads it to bind its message to that exponent.
pub fn exponent_randomness_key(
    id: &str,
    base_type: BaseType,
    base_index: usize,
) -> Result<StoreKey, ProofSystemError> {
    Ok(StoreKey::indexed(
        id,
        KeyClass::Randomness,
        exponent_name(base_type)?,
        base_index,
    ))
}

/// Key under which the verifier component `id` stores the response for the exponent of a vertex
/// or edge base
pub fn exponent_response_key(
    id: &str,
    base_type: BaseType,
    base_index: usize,
) -> Result<StoreKey, ProofSystemError> {
    Ok(StoreKey::indexed(
        id,
        KeyClass::Response,
        exponent_name(base_type)?,
        base_index,
    ))
}

fn commitment_key(id: &str) -> StoreKey {
    StoreKey::new(id, KeyClass::Public, GRAPH_COMMITMENT_NAME)
}

fn witness_key(id: &str) -> StoreKey {
    StoreKey::new(id, KeyClass::Witness, GRAPH_COMMITMENT_NAME)
}

/// `U=<value>` followed by every base in the order vertex bases then edge bases, each by index
fn context_of<'b>(
    id: &str,
    commitment: &QrElementN,
    bases: impl Iterator<Item = (BaseType, usize, &'b QrElementN)>,
) -> Vec<String> {
    let mut context = vec![context_entry(&commitment_key(id), commitment)];
    context.extend(bases.map(|(t, i, b)| {
        context_entry(
            &StoreKey::indexed(id, KeyClass::Public, &t.to_string(), i),
            b,
        )
    }));
    context
}

fn set_exponent(base: &BaseRepresentation) -> Result<&BigInt, ProofSystemError> {
    base.exponent().ok_or(ProofSystemError::MissingExponent(
        base.base_index(),
        base.base_type(),
    ))
}

pub struct GraphRepresentationProver<'a> {
    id: String,
    epk: &'a ExtendedPublicKey,
    bases: BaseCollection,
    randomness: BigInt,
    commitment: QrElementN,
}

impl<'a> GraphRepresentationProver<'a> {
    /// Prove over `bases`, certified vertex and edge bases of `epk` with the exponents set, and the
    /// randomness `v` of at most `l_v` bits.
    pub fn new(
        id: &str,
        epk: &'a ExtendedPublicKey,
        bases: BaseCollection,
        randomness: BigInt,
    ) -> Result<Self, ProofSystemError> {
        StoreKey::check_segment(id)?;
        let params = epk.params();
        for b in bases.iter() {
            if exponent_name(b.base_type()).is_err() || !epk.is_certified(b) {
                return Err(ProofSystemError::UncertifiedBase(
                    b.base_index(),
                    b.base_type(),
                ));
            }
            expect_bit_length_at_most!(
                set_exponent(b)?,
                params.l_m,
                ProofSystemError::ExponentTooLarge
            );
        }
        expect_bit_length_at_most!(randomness, params.l_v, ProofSystemError::ExponentTooLarge);

        let timer = start_timer!(|| format!("Commit to graph over {} bases", bases.len()));
        let mut elements = vec![epk.public_key.s.clone()];
        let mut exponents = vec![randomness.clone()];
        for b in bases.iter() {
            elements.push(b.base().clone());
            exponents.push(set_exponent(b)?.clone());
        }
        let commitment = QrElementN::multi_base_exp(&elements, &exponents)?;
        end_timer!(timer);
        Ok(Self {
            id: id.into(),
            epk,
            bases,
            randomness,
            commitment,
        })
    }

    /// Commit with fresh randomness of `l_v` bits
    pub fn commit<R: RngCore>(
        rng: &mut R,
        id: &str,
        epk: &'a ExtendedPublicKey,
        bases: BaseCollection,
    ) -> Result<Self, ProofSystemError> {
        let randomness = rand_bits_signed(rng, epk.params().l_v);
        Self::new(id, epk, bases, randomness)
    }

    pub fn commitment(&self) -> &QrElementN {
        &self.commitment
    }

    pub fn randomness(&self) -> &BigInt {
        &self.randomness
    }

    /// The bases proven over, without their exponents
    pub fn public_bases(&self) -> BaseCollection {
        self.bases.with_forgotten_exponents()
    }

    fn randomness_key(&self) -> StoreKey {
        StoreKey::new(&self.id, KeyClass::Randomness, GRAPH_RANDOMNESS_NAME)
    }

    fn response_key(&self) -> StoreKey {
        StoreKey::new(&self.id, KeyClass::Response, GRAPH_RANDOMNESS_NAME)
    }
}

impl<'a> SigmaProver for GraphRepresentationProver<'a> {
    fn component_id(&self) -> &str {
        &self.id
    }

    fn execute_precomputation(&mut self, store: &mut ProofStore) -> Result<(), ProofSystemError> {
        store.store(commitment_key(&self.id), self.commitment.clone())
    }

    fn public_context(&self) -> Vec<String> {
        let bases = GRAPH_BASE_TYPES.iter().flat_map(|(t, _)| {
            self.bases
                .create_iterator(*t)
                .sorted_by_key(|b| b.base_index())
                .map(|b| (b.base_type(), b.base_index(), b.base()))
        });
        context_of(&self.id, &self.commitment, bases)
    }

    fn public_values(&self) -> ResponseMap {
        let mut values = ResponseMap::new();
        values.insert(
            commitment_key(&self.id),
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
        let v_tilde = rand_bits_signed(rng, params.tilde(params.l_v));
        let mut elements = vec![self.epk.public_key.s.clone()];
        let mut exponents = vec![v_tilde.clone()];
        store.store(self.randomness_key(), v_tilde)?;
        for b in self.bases.iter() {
            let e_tilde = rand_bits_signed(rng, params.tilde(params.l_m));
            store.store(
                exponent_randomness_key(&self.id, b.base_type(), b.base_index())?,
                e_tilde.clone(),
            )?;
            elements.push(b.base().clone());
            exponents.push(e_tilde);
        }
        let witness = QrElementN::multi_base_exp(&elements, &exponents)?;
        store.store(witness_key(&self.id), witness.clone())?;

        let mut witnesses = WitnessMap::new();
        witnesses.insert(witness_key(&self.id), witness);
        Ok(witnesses)
    }

    fn execute_post_challenge_phase(
        &mut self,
        challenge: &BigInt,
        store: &mut ProofStore,
    ) -> Result<ResponseMap, ProofSystemError> {
        let v_hat =
            store.retrieve_integer(&self.randomness_key())? + challenge * &self.randomness;
        store.store(self.response_key(), v_hat.clone())?;

        let mut indexed = GRAPH_BASE_TYPES
            .iter()
            .map(|(_, name)| (*name, BTreeMap::new()))
            .collect::<BTreeMap<_, _>>();
        for b in self.bases.iter() {
            let (t, i) = (b.base_type(), b.base_index());
            let e_hat = store.retrieve_integer(&exponent_randomness_key(&self.id, t, i)?)?
                + challenge * set_exponent(b)?;
            store.store(exponent_response_key(&self.id, t, i)?, e_hat.clone())?;
            if let Some(m) = indexed.get_mut(exponent_name(t)?) {
                m.insert(i, e_hat);
            }
        }

        let mut responses = ResponseMap::new();
        responses.insert(self.response_key(), SignatureValue::Integer(v_hat));
        for (name, m) in indexed {
            responses.insert(
                StoreKey::new(&self.id, KeyClass::Response, name),
                SignatureValue::Indexed(m),
            );
        }
        Ok(responses)
    }

    fn verify(&self, challenge: &BigInt, store: &ProofStore) -> Result<bool, ProofSystemError> {
        let mut elements = vec![self.commitment.clone(), self.epk.public_key.s.clone()];
        let mut exponents = vec![
            -challenge,
            store.retrieve_integer(&self.response_key())?.clone(),
        ];
        for b in self.bases.iter() {
            elements.push(b.base().clone());
            exponents.push(
                store
                    .retrieve_integer(&exponent_response_key(
                        &self.id,
                        b.base_type(),
                        b.base_index(),
                    )?)?
                    .clone(),
            );
        }
        let recomputed = QrElementN::multi_base_exp(&elements, &exponents)?;
        Ok(&recomputed == store.retrieve_element(&witness_key(&self.id))?)
    }
}

pub struct GraphRepresentationVerifier<'a> {
    id: String,
    epk: &'a ExtendedPublicKey,
}

impl<'a> GraphRepresentationVerifier<'a> {
    pub fn new(id: &str, epk: &'a ExtendedPublicKey) -> Result<Self, ProofSystemError> {
        StoreKey::check_segment(id)?;
        Ok(Self { id: id.into(), epk })
    }

    /// Indexed exponent responses filed in the proof under `name`
    fn exponent_responses<'p>(
        &self,
        proof: &'p ProofSignature,
        name: &str,
    ) -> Result<&'p BTreeMap<usize, BigInt>, VerificationFailure> {
        proof.indexed(&StoreKey::new(&self.id, KeyClass::Response, name))
    }

    fn certified(
        &self,
        base_index: usize,
        base_type: BaseType,
    ) -> Result<&'a QrElementN, VerificationFailure> {
        self.epk
            .certified_base(base_index, base_type)
            .map(|b| b.base())
            .ok_or(VerificationFailure::IllegalBase(base_index, base_type))
    }
}

impl<'a> SigmaVerifier for GraphRepresentationVerifier<'a> {
    fn component_id(&self) -> &str {
        &self.id
    }

    fn check_lengths(&self, proof: &ProofSignature) -> Result<(), VerificationFailure> {
        let params = self.epk.params();
        proof.element_of(&commitment_key(&self.id), self.epk.group())?;
        let v_key = StoreKey::new(&self.id, KeyClass::Response, GRAPH_RANDOMNESS_NAME);
        check_response_length(&v_key, proof.integer(&v_key)?, params.l_hat_v())?;
        for (_, name) in GRAPH_BASE_TYPES {
            for (i, e_hat) in self.exponent_responses(proof, name)? {
                let key = StoreKey::indexed(&self.id, KeyClass::Response, name, *i);
                check_response_length(&key, e_hat, params.l_hat_m())?;
            }
        }
        Ok(())
    }

    fn check_bases_legal(&self, proof: &ProofSignature) -> Result<(), VerificationFailure> {
        for (t, name) in GRAPH_BASE_TYPES {
            for i in self.exponent_responses(proof, name)?.keys() {
                self.certified(*i, t)?;
            }
        }
        Ok(())
    }

    fn public_context(&self, proof: &ProofSignature) -> Result<Vec<String>, VerificationFailure> {
        let commitment = proof.element(&commitment_key(&self.id))?;
        let mut bases = Vec::new();
        for (t, name) in GRAPH_BASE_TYPES {
            for i in self.exponent_responses(proof, name)?.keys() {
                bases.push((t, *i, self.certified(*i, t)?));
            }
        }
        Ok(context_of(&self.id, commitment, bases.into_iter()))
    }

    fn execute_verification(
        &mut self,
        challenge: &BigInt,
        proof: &ProofSignature,
        store: &mut ProofStore,
    ) -> Result<WitnessMap, ProofSystemError> {
        let commitment = proof.element(&commitment_key(&self.id))?;
        let v_key = StoreKey::new(&self.id, KeyClass::Response, GRAPH_RANDOMNESS_NAME);
        let v_hat = proof.integer(&v_key)?;

        let mut elements = vec![commitment.clone(), self.epk.public_key.s.clone()];
        let mut exponents = vec![-challenge, v_hat.clone()];
        let mut responses = Vec::new();
        for (t, name) in GRAPH_BASE_TYPES {
            for (i, e_hat) in self.exponent_responses(proof, name)? {
                elements.push(self.certified(*i, t)?.clone());
                exponents.push(e_hat.clone());
                responses.push((StoreKey::indexed(&self.id, KeyClass::Response, name, *i), e_hat.clone()));
            }
        }
        let timer = start_timer!(|| format!(
            "Recompute graph witness over {} bases",
            responses.len()
        ));
        let witness = QrElementN::multi_base_exp(&elements, &exponents)?;
        end_timer!(timer);

        store.store(v_key, v_hat.clone())?;
        for (k, e_hat) in responses {
            store.store(k, e_hat)?;
        }
        store.store(witness_key(&self.id), witness.clone())?;

        let mut witnesses = WitnessMap::new();
        witnesses.insert(witness_key(&self.id), witness);
        Ok(witnesses)
    }
}
