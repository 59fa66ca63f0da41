//! Key generation parameters, the signer's key pair and the extended public key carrying the
//! certified vertex and edge bases.

use crate::{
    base::{BaseCollection, BaseIterator, BaseRepresentation, BaseType},
    error::ProofSystemError,
};
use ark_std::{
    cfg_iter, collections::BTreeMap, end_timer, format, ops::RangeInclusive, rand::RngCore,
    start_timer, string::String, vec::Vec,
};
use gs_crypto_utils::{
    hashing_utils::{canonical_string, canonical_strings},
    misc::rand_exponent_below,
};
use num::{BigInt, BigUint};
use qr_group::{
    element::{GroupElement, QrElementN, QrElementPq},
    group::{QrGroup, QrGroupN, QrGroupPq},
    prime::SpecialRsaMod,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Bit lengths every party of the scheme agrees on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyGenParameters {
    /// Bits of the special RSA modulus
    pub l_n: usize,
    /// Maximal bits of a message or of a vertex or edge exponent
    pub l_m: usize,
    /// Bits of the randomness of a graph commitment
    pub l_v: usize,
    /// Bits of the randomness of a message commitment
    pub l_r: usize,
    /// Statistical zero knowledge parameter
    pub l_statzk: usize,
    /// Bits of the challenge, equal to the output bits of the hash function
    pub l_h: usize,
    /// Primality certainty, a composite passes with probability at most `2^-l_pt`
    pub l_pt: usize,
}

impl Default for KeyGenParameters {
    fn default() -> Self {
        Self {
            l_n: 2048,
            l_m: 256,
            l_v: 2724,
            l_r: 2128,
            l_statzk: 80,
            l_h: 256,
            l_pt: 80,
        }
    }
}

impl KeyGenParameters {
    pub fn validate(&self) -> Result<(), ProofSystemError> {
        let lengths = [
            ("l_n", self.l_n),
            ("l_m", self.l_m),
            ("l_v", self.l_v),
            ("l_r", self.l_r),
            ("l_statzk", self.l_statzk),
            ("l_h", self.l_h),
            ("l_pt", self.l_pt),
        ];
        for (name, l) in lengths {
            if l == 0 {
                return Err(ProofSystemError::InvalidParameters(format!(
                    "{} must be positive",
                    name
                )));
            }
        }
        if self.l_n % 2 != 0 || self.l_n < 32 {
            return Err(ProofSystemError::InvalidParameters(format!(
                "l_n must be even and at least 32 but is {}",
                self.l_n
            )));
        }
        if self.l_h % 8 != 0 {
            return Err(ProofSystemError::InvalidParameters(format!(
                "l_h must be a multiple of 8 but is {}",
                self.l_h
            )));
        }
        // Randomness must statistically hide a value modulo the unknown group order
        let hiding = self.l_n + self.l_statzk;
        if self.l_r < hiding || self.l_v < hiding {
            return Err(ProofSystemError::InvalidParameters(format!(
                "l_r and l_v must be at least l_n + l_statzk = {}",
                hiding
            )));
        }
        Ok(())
    }

    /// Bits of the witness randomness for a secret of `l` bits
    pub fn tilde(&self, l: usize) -> usize {
        l + self.l_statzk + self.l_h
    }

    /// Maximal bits of a response for a secret of `l` bits
    pub fn hat(&self, l: usize) -> usize {
        self.tilde(l) + 1
    }

    pub fn l_hat_m(&self) -> usize {
        self.hat(self.l_m)
    }

    pub fn l_hat_r(&self) -> usize {
        self.hat(self.l_r)
    }

    pub fn l_hat_v(&self) -> usize {
        self.hat(self.l_v)
    }
}

/// Sizes of the base pools and of the primes a graph is encoded with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEncodingParameters {
    /// Number of certified vertex bases
    pub l_v_pool: usize,
    /// Number of certified edge bases
    pub l_e_pool: usize,
    /// Bits of a vertex prime representative
    pub l_prime_v: usize,
    /// Maximal number of labels on a vertex
    pub l_labels_v: usize,
    /// Maximal number of labels on an edge
    pub l_labels_e: usize,
    /// Bits of a label prime representative
    pub l_prime_l: usize,
}

impl Default for GraphEncodingParameters {
    fn default() -> Self {
        Self {
            l_v_pool: 1000,
            l_e_pool: 50000,
            l_prime_v: 120,
            l_labels_v: 1,
            l_labels_e: 1,
            l_prime_l: 16,
        }
    }
}

impl GraphEncodingParameters {
    /// Bits of the largest possible vertex exponent, the vertex prime times all its label primes
    pub fn max_vertex_exponent_bits(&self) -> usize {
        self.l_prime_v + self.l_labels_v * self.l_prime_l
    }

    /// Bits of the largest possible edge exponent, both endpoint primes times all label primes
    pub fn max_edge_exponent_bits(&self) -> usize {
        2 * self.l_prime_v + self.l_labels_e * self.l_prime_l
    }

    /// Vertex bases are numbered `1..=l_v_pool`
    pub fn vertex_index_range(&self) -> RangeInclusive<usize> {
        1..=self.l_v_pool
    }

    /// Edge bases follow the vertex bases, `l_v_pool + 1..=l_v_pool + l_e_pool`
    pub fn edge_index_range(&self) -> RangeInclusive<usize> {
        self.l_v_pool + 1..=self.l_v_pool + self.l_e_pool
    }

    /// Every exponent a graph can produce must fit in `l_m` bits
    pub fn validate_against(&self, params: &KeyGenParameters) -> Result<(), ProofSystemError> {
        if self.l_v_pool == 0 || self.l_e_pool == 0 {
            return Err(ProofSystemError::InvalidParameters(String::from(
                "base pools must not be empty",
            )));
        }
        if self.l_prime_v < 2 || (self.l_prime_l < 2 && self.l_labels_v + self.l_labels_e > 0) {
            return Err(ProofSystemError::InvalidParameters(String::from(
                "primes need at least 2 bits",
            )));
        }
        let max_bits = self
            .max_vertex_exponent_bits()
            .max(self.max_edge_exponent_bits());
        if max_bits > params.l_m {
            return Err(ProofSystemError::InvalidParameters(format!(
                "exponents can have {} bits but l_m is {}",
                max_bits, params.l_m
            )));
        }
        Ok(())
    }
}

/// Factorization of the modulus and the discrete logarithms of `Z`, `R` and `R_0` to base `S`
#[derive(Clone, Debug)]
pub struct SignerPrivateKey {
    pub group: QrGroupPq,
    pub s: QrElementPq,
    pub x_z: BigUint,
    pub x_r: BigUint,
    pub x_r0: BigUint,
}

/// Signer's public key, containing only elements of the public group
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerPublicKey {
    pub group: QrGroupN,
    pub s: QrElementN,
    pub z: QrElementN,
    pub r: QrElementN,
    pub r_0: QrElementN,
    pub params: KeyGenParameters,
}

impl SignerPublicKey {
    pub fn modulus(&self) -> &BigUint {
        self.group.modulus()
    }

    /// Canonical strings of the key as they enter a challenge
    pub fn context_strings(&self) -> Vec<String> {
        let mut strings = vec![canonical_string(self.modulus())];
        strings.extend(canonical_strings([&self.s, &self.z, &self.r, &self.r_0]));
        strings
    }
}

#[derive(Clone, Debug)]
pub struct SignerKeyPair {
    pub private: SignerPrivateKey,
    pub public: SignerPublicKey,
}

impl SignerKeyPair {
    /// Generate a special RSA modulus of `l_n` bits, a generator `S` of its quadratic residues and
    /// `Z = S^x_Z`, `R = S^x_R`, `R_0 = S^x_R0` for random `x_Z, x_R, x_R0` in `[2, p'q' - 1)`
    pub fn generate<R: RngCore>(
        rng: &mut R,
        params: &KeyGenParameters,
    ) -> Result<Self, ProofSystemError> {
        params.validate()?;
        let timer = start_timer!(|| format!("Generate {} bit signer key pair", params.l_n));
        let modulus = SpecialRsaMod::generate(rng, params.l_n, params.l_pt)?;
        let group = QrGroupPq::new(modulus)?;
        let s = group.create_generator(rng)?;
        let order = group.group_order().clone();
        let x_z = rand_exponent_below(rng, &order);
        let x_r = rand_exponent_below(rng, &order);
        let x_r0 = rand_exponent_below(rng, &order);
        let z = s.mod_pow(&BigInt::from(x_z.clone()))?;
        let r = s.mod_pow(&BigInt::from(x_r.clone()))?;
        let r_0 = s.mod_pow(&BigInt::from(x_r0.clone()))?;
        let public = SignerPublicKey {
            group: group.public_group(),
            s: s.public_clone(),
            z: z.public_clone(),
            r: r.public_clone(),
            r_0: r_0.public_clone(),
            params: *params,
        };
        end_timer!(timer);
        tracing::debug!(l_n = params.l_n, "generated signer key pair");
        Ok(Self {
            private: SignerPrivateKey {
                group,
                s,
                x_z,
                x_r,
                x_r0,
            },
            public,
        })
    }
}

/// Signer's public key together with the certified vertex and edge bases
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedPublicKey {
    pub public_key: SignerPublicKey,
    pub bases: BaseCollection,
    pub encoding: GraphEncodingParameters,
}

impl ExtendedPublicKey {
    pub fn params(&self) -> &KeyGenParameters {
        &self.public_key.params
    }

    pub fn group(&self) -> &QrGroupN {
        &self.public_key.group
    }

    pub fn modulus(&self) -> &BigUint {
        self.public_key.modulus()
    }

    pub fn vertex_bases(&self) -> BaseIterator<'_> {
        self.bases.create_iterator(BaseType::Vertex)
    }

    pub fn edge_bases(&self) -> BaseIterator<'_> {
        self.bases.create_iterator(BaseType::Edge)
    }

    pub fn certified_base(
        &self,
        base_index: usize,
        base_type: BaseType,
    ) -> Option<&BaseRepresentation> {
        self.bases.get(base_index, base_type)
    }

    /// Whether `base` is one of the certified bases, same index, type and element
    pub fn is_certified(&self, base: &BaseRepresentation) -> bool {
        self.certified_base(base.base_index(), base.base_type())
            .map(|c| c.base() == base.base())
            .unwrap_or(false)
    }

    /// Canonical strings of the public key as they enter a challenge. The bases are not included,
    /// components add the ones they use.
    pub fn context_strings(&self) -> Vec<String> {
        self.public_key.context_strings()
    }
}

#[derive(Clone, Debug)]
pub struct ExtendedKeyPair {
    pub key_pair: SignerKeyPair,
    /// Discrete logarithm to base `S` of each certified vertex and edge base
    pub base_secrets: BTreeMap<(usize, BaseType), BigUint>,
    pub public: ExtendedPublicKey,
}

impl ExtendedKeyPair {
    /// Certify `l_v_pool` vertex bases and `l_e_pool` edge bases `R_i = S^x_i`. The fixed bases `S`,
    /// `Z`, `R` and `R_0` join the collection with index 0.
    pub fn generate<R: RngCore>(
        rng: &mut R,
        key_pair: SignerKeyPair,
        encoding: &GraphEncodingParameters,
    ) -> Result<Self, ProofSystemError> {
        encoding.validate_against(&key_pair.public.params)?;
        let timer = start_timer!(|| format!(
            "Certify {} vertex and {} edge bases",
            encoding.l_v_pool, encoding.l_e_pool
        ));
        let order = key_pair.private.group.group_order().clone();
        let secrets = encoding
            .vertex_index_range()
            .map(|i| (i, BaseType::Vertex))
            .chain(encoding.edge_index_range().map(|i| (i, BaseType::Edge)))
            .map(|id| (id, rand_exponent_below(rng, &order)))
            .collect::<Vec<_>>();

        let s = &key_pair.private.s;
        let certified = cfg_iter!(secrets)
            .map(|((i, t), x)| {
                s.mod_pow(&BigInt::from(x.clone()))
                    .map(|r_i| BaseRepresentation::new(r_i.public_clone(), *i, *t))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pk = &key_pair.public;
        let mut bases = BaseCollection::new();
        bases.add(BaseRepresentation::new(pk.s.clone(), 0, BaseType::BaseS))?;
        bases.add(BaseRepresentation::new(pk.z.clone(), 0, BaseType::BaseZ))?;
        bases.add(BaseRepresentation::new(pk.r.clone(), 0, BaseType::BaseR))?;
        bases.add(BaseRepresentation::new(pk.r_0.clone(), 0, BaseType::Base0))?;
        for b in certified {
            bases.add(b)?;
        }
        end_timer!(timer);
        tracing::debug!(
            vertex_bases = encoding.l_v_pool,
            edge_bases = encoding.l_e_pool,
            "certified bases"
        );

        let public = ExtendedPublicKey {
            public_key: pk.clone(),
            bases,
            encoding: *encoding,
        };
        Ok(Self {
            key_pair,
            base_secrets: secrets.into_iter().collect(),
            public,
        })
    }
}
