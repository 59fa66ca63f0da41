use crate::{
    element::{GroupElement, QrElementN, QrElementPq},
    error::QrGroupError,
    number_theory::{jacobi_symbol, CrtCoefficients},
    prime::{max_generation_attempts, SpecialRsaMod},
};
use ark_std::{fmt, rand::RngCore, sync::Arc};
use gs_crypto_utils::misc::rand_range;
use num::{integer::Integer, BigInt, BigUint, One};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// Capabilities shared by both groups of quadratic residues
pub trait QrGroup {
    type Element: GroupElement;

    fn modulus(&self) -> &BigUint;

    /// Order of the group, when known to the holder
    fn order(&self) -> Option<&BigUint>;

    fn identity(&self) -> Self::Element;

    /// Whether `value` is (as far as the holder can decide) a quadratic residue modulo `N`
    fn is_quadratic_residue(&self, value: &BigUint) -> bool;

    /// Whether `value` generates the whole group of quadratic residues
    fn verify_generator(&self, value: &BigUint) -> bool;

    /// Wrap `value` as an element after checking that it is a quadratic residue
    fn create_element(&self, value: BigUint) -> Result<Self::Element, QrGroupError>;

    /// A random quadratic residue, the square of a random unit
    fn create_random_element<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Self::Element, QrGroupError> {
        let n = self.modulus();
        let two = BigUint::from(2u8);
        let attempts = max_generation_attempts(n.bits() as usize);
        for _ in 0..attempts {
            let x = rand_range(rng, &two, n);
            if x.gcd(n).is_one() {
                return self.create_element(x.modpow(&two, n));
            }
        }
        Err(QrGroupError::GenerationExhausted("unit", attempts))
    }

    /// Repeatedly squares random units until one passes [`QrGroup::verify_generator`]
    fn create_generator<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Self::Element, QrGroupError> {
        let attempts = max_generation_attempts(self.modulus().bits() as usize);
        for attempt in 0..attempts {
            let candidate = self.create_random_element(rng)?;
            if self.verify_generator(candidate.value()) {
                tracing::trace!(attempt, "found generator");
                return Ok(candidate);
            }
        }
        Err(QrGroupError::GenerationExhausted("generator", attempts))
    }
}

fn is_unit(value: &BigUint, n: &BigUint) -> bool {
    !num::Zero::is_zero(value) && value < n && value.gcd(n).is_one()
}

/// Group of quadratic residues modulo `N` where the factorization of `N` is unknown
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "QrGroupNRepr")]
pub struct QrGroupN {
    #[serde_as(as = "DisplayFromStr")]
    modulus: BigUint,
}

#[serde_as]
#[derive(Deserialize)]
struct QrGroupNRepr {
    #[serde_as(as = "DisplayFromStr")]
    modulus: BigUint,
}

impl TryFrom<QrGroupNRepr> for QrGroupN {
    type Error = QrGroupError;

    fn try_from(r: QrGroupNRepr) -> Result<Self, Self::Error> {
        Self::new(r.modulus)
    }
}

impl QrGroupN {
    /// `modulus` must be odd and greater than 1
    pub fn new(modulus: BigUint) -> Result<Self, QrGroupError> {
        if modulus.is_even() || modulus <= BigUint::one() {
            return Err(QrGroupError::NotAUnit(modulus.to_string()));
        }
        Ok(Self { modulus })
    }

    pub(crate) fn element_unchecked(&self, value: BigUint) -> QrElementN {
        QrElementN::new_unchecked(self.clone(), value)
    }
}

impl QrGroup for QrGroupN {
    type Element = QrElementN;

    fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    fn order(&self) -> Option<&BigUint> {
        None
    }

    fn identity(&self) -> QrElementN {
        self.element_unchecked(BigUint::one())
    }

    /// Without the factorization only the necessary condition `(value / N) = 1` can be checked
    fn is_quadratic_residue(&self, value: &BigUint) -> bool {
        is_unit(value, &self.modulus)
            && jacobi_symbol(&BigInt::from(value.clone()), &self.modulus) == Ok(1)
    }

    /// A quadratic residue `g` with `gcd(g - 1, N) = 1` generates `QR_N` for a special RSA modulus
    fn verify_generator(&self, value: &BigUint) -> bool {
        self.is_quadratic_residue(value)
            && !value.is_one()
            && (value - BigUint::one()).gcd(&self.modulus).is_one()
    }

    fn create_element(&self, value: BigUint) -> Result<QrElementN, QrGroupError> {
        if !is_unit(&value, &self.modulus) {
            return Err(QrGroupError::NotAUnit(value.to_string()));
        }
        if !self.is_quadratic_residue(&value) {
            return Err(QrGroupError::NotQuadraticResidue(value.to_string()));
        }
        Ok(self.element_unchecked(value))
    }
}

struct PqParams {
    modulus: SpecialRsaMod,
    order: BigUint,
    crt: CrtCoefficients,
    public: QrGroupN,
}

/// Group of quadratic residues modulo `N = pq` where the holder knows the safe primes `p` and `q`.
/// Cloning is cheap, all clones share the same parameters.
#[derive(Clone)]
pub struct QrGroupPq {
    params: Arc<PqParams>,
}

impl QrGroupPq {
    pub fn new(modulus: SpecialRsaMod) -> Result<Self, QrGroupError> {
        let crt = CrtCoefficients::new(&modulus.p.a, &modulus.q.a)?;
        let order = modulus.qr_order();
        let public = QrGroupN::new(modulus.n.clone())?;
        Ok(Self {
            params: Arc::new(PqParams {
                modulus,
                order,
                crt,
                public,
            }),
        })
    }

    /// Order `p'q'` of the group
    pub fn group_order(&self) -> &BigUint {
        &self.params.order
    }

    /// The same group without the factorization, safe to hand to anyone
    pub fn public_group(&self) -> QrGroupN {
        self.params.public.clone()
    }

    pub(crate) fn p(&self) -> &BigUint {
        &self.params.modulus.p.a
    }

    pub(crate) fn q(&self) -> &BigUint {
        &self.params.modulus.q.a
    }

    pub(crate) fn p_prime(&self) -> &BigUint {
        &self.params.modulus.p.a_prime
    }

    pub(crate) fn q_prime(&self) -> &BigUint {
        &self.params.modulus.q.a_prime
    }

    pub(crate) fn crt(&self) -> &CrtCoefficients {
        &self.params.crt
    }

    /// The signer's copy of an element it handed out, for further private computation
    pub fn lift(&self, element: &QrElementN) -> Result<QrElementPq, QrGroupError> {
        if element.modulus() != self.modulus() {
            return Err(QrGroupError::GroupMismatch);
        }
        self.create_element(element.value().clone())
    }
}

impl QrGroup for QrGroupPq {
    type Element = QrElementPq;

    fn modulus(&self) -> &BigUint {
        &self.params.modulus.n
    }

    fn order(&self) -> Option<&BigUint> {
        Some(&self.params.order)
    }

    fn identity(&self) -> QrElementPq {
        QrElementPq::new_unchecked(self.clone(), BigUint::one())
    }

    /// Exact test: the Legendre symbols modulo `p` and `q` are both 1
    fn is_quadratic_residue(&self, value: &BigUint) -> bool {
        if !is_unit(value, self.modulus()) {
            return false;
        }
        let v = BigInt::from(value.clone());
        jacobi_symbol(&v, self.p()) == Ok(1) && jacobi_symbol(&v, self.q()) == Ok(1)
    }

    /// A quadratic residue generates `QR_N` iff its order is neither 1, `p'` nor `q'`
    fn verify_generator(&self, value: &BigUint) -> bool {
        if !self.is_quadratic_residue(value) || value.is_one() {
            return false;
        }
        let n = self.modulus();
        !value.modpow(self.p_prime(), n).is_one() && !value.modpow(self.q_prime(), n).is_one()
    }

    fn create_element(&self, value: BigUint) -> Result<QrElementPq, QrGroupError> {
        if !is_unit(&value, self.modulus()) {
            return Err(QrGroupError::NotAUnit(value.to_string()));
        }
        if !self.is_quadratic_residue(&value) {
            return Err(QrGroupError::NotQuadraticResidue(value.to_string()));
        }
        Ok(QrElementPq::new_unchecked(self.clone(), value))
    }
}

impl PartialEq for QrGroupPq {
    fn eq(&self, other: &Self) -> bool {
        self.modulus() == other.modulus()
    }
}

impl Eq for QrGroupPq {}

// Never print the factorization
impl fmt::Debug for QrGroupPq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QrGroupPq")
            .field("modulus", self.modulus())
            .finish_non_exhaustive()
    }
}
