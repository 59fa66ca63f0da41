use crate::{
    error::QrGroupError,
    group::{QrGroup, QrGroupN, QrGroupPq},
    number_theory::{mod_inverse, signed_mod_pow, simultaneous_exp},
};
use ark_std::{cfg_iter, fmt, vec::Vec};
use gs_crypto_utils::join;
use num::{integer::Integer, BigInt, BigUint, One, Signed};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Operations on an element of a group of quadratic residues
pub trait GroupElement: Clone + Sized {
    /// Representative in `[1, N)`
    fn value(&self) -> &BigUint;

    fn modulus(&self) -> &BigUint;

    /// `self * other mod N`. Fails if the elements are from different groups.
    fn multiply(&self, other: &Self) -> Result<Self, QrGroupError>;

    /// `self^exponent mod N`, negative exponents allowed
    fn mod_pow(&self, exponent: &BigInt) -> Result<Self, QrGroupError>;

    fn mod_inverse(&self) -> Result<Self, QrGroupError>;

    /// `prod bases[i]^exponents[i]`. All bases must be from the same group.
    fn multi_base_exp(bases: &[Self], exponents: &[BigInt]) -> Result<Self, QrGroupError>;

    /// Copy of this element in the public group `QR_N`, carrying no factorization data
    fn public_clone(&self) -> QrElementN;

    fn is_identity(&self) -> bool {
        self.value().is_one()
    }
}

fn check_multi_exp_args<T>(bases: &[T], exponents: &[BigInt]) -> Result<(), QrGroupError> {
    if bases.is_empty() {
        return Err(QrGroupError::EmptyBases);
    }
    if bases.len() != exponents.len() {
        return Err(QrGroupError::ExpectedSameSizeSequences(
            bases.len(),
            exponents.len(),
        ));
    }
    Ok(())
}

/// Element of [`QrGroupN`]
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "QrElementRepr", try_from = "QrElementRepr")]
pub struct QrElementN {
    group: QrGroupN,
    value: BigUint,
}

/// Wire form of an element. The value is checked again on deserialization.
#[serde_as]
#[derive(Clone, Serialize, Deserialize)]
struct QrElementRepr {
    #[serde_as(as = "DisplayFromStr")]
    modulus: BigUint,
    #[serde_as(as = "DisplayFromStr")]
    value: BigUint,
}

impl From<QrElementN> for QrElementRepr {
    fn from(e: QrElementN) -> Self {
        Self {
            modulus: e.group.modulus().clone(),
            value: e.value,
        }
    }
}

impl TryFrom<QrElementRepr> for QrElementN {
    type Error = QrGroupError;

    fn try_from(r: QrElementRepr) -> Result<Self, Self::Error> {
        QrGroupN::new(r.modulus)?.create_element(r.value)
    }
}

impl QrElementN {
    pub(crate) fn new_unchecked(group: QrGroupN, value: BigUint) -> Self {
        Self { group, value }
    }

    pub fn group(&self) -> &QrGroupN {
        &self.group
    }

    fn same_group(&self, other: &Self) -> Result<(), QrGroupError> {
        if self.group != other.group {
            return Err(QrGroupError::GroupMismatch);
        }
        Ok(())
    }
}

impl GroupElement for QrElementN {
    fn value(&self) -> &BigUint {
        &self.value
    }

    fn modulus(&self) -> &BigUint {
        self.group.modulus()
    }

    fn multiply(&self, other: &Self) -> Result<Self, QrGroupError> {
        self.same_group(other)?;
        let value = &self.value * &other.value % self.modulus();
        Ok(Self::new_unchecked(self.group.clone(), value))
    }

    fn mod_pow(&self, exponent: &BigInt) -> Result<Self, QrGroupError> {
        let value = signed_mod_pow(&self.value, exponent, self.modulus())?;
        Ok(Self::new_unchecked(self.group.clone(), value))
    }

    fn mod_inverse(&self) -> Result<Self, QrGroupError> {
        let value = mod_inverse(&self.value, self.modulus()).ok_or(QrGroupError::NotInvertible)?;
        Ok(Self::new_unchecked(self.group.clone(), value))
    }

    fn multi_base_exp(bases: &[Self], exponents: &[BigInt]) -> Result<Self, QrGroupError> {
        check_multi_exp_args(bases, exponents)?;
        let first = &bases[0];
        for b in &bases[1..] {
            first.same_group(b)?;
        }
        let n = first.modulus();
        // Negative exponents are applied to the inverted base
        let adjusted = cfg_iter!(bases)
            .zip(cfg_iter!(exponents))
            .map(|(b, e)| {
                if e.is_negative() {
                    mod_inverse(&b.value, n).ok_or(QrGroupError::NotInvertible)
                } else {
                    Ok(b.value.clone())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        let magnitudes = exponents
            .iter()
            .map(|e| e.magnitude().clone())
            .collect::<Vec<_>>();
        let value = simultaneous_exp(&adjusted, &magnitudes, n)?;
        Ok(Self::new_unchecked(first.group.clone(), value))
    }

    fn public_clone(&self) -> QrElementN {
        self.clone()
    }
}

impl fmt::Display for QrElementN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl fmt::Debug for QrElementN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QrElementN({})", self.value)
    }
}

/// Element of [`QrGroupPq`]. All arithmetic is done modulo `p` and `q` separately, with exponents
/// reduced modulo `p'` and `q'`, and recombined with the CRT.
#[derive(Clone, PartialEq, Eq)]
pub struct QrElementPq {
    group: QrGroupPq,
    value: BigUint,
}

impl QrElementPq {
    pub(crate) fn new_unchecked(group: QrGroupPq, value: BigUint) -> Self {
        Self { group, value }
    }

    pub fn group(&self) -> &QrGroupPq {
        &self.group
    }

    fn same_group(&self, other: &Self) -> Result<(), QrGroupError> {
        if self.group != other.group {
            return Err(QrGroupError::GroupMismatch);
        }
        Ok(())
    }

    fn residues(&self) -> (BigUint, BigUint) {
        (&self.value % self.group.p(), &self.value % self.group.q())
    }

    fn from_residues(&self, xp: &BigUint, xq: &BigUint) -> Self {
        Self::new_unchecked(self.group.clone(), self.group.crt().combine(xp, xq))
    }

    /// Exponent reduced into `[0, order)`. The residue modulo `p` of an element of `QR_N` has order
    /// dividing `p'`, same for `q`.
    fn reduce_exponent(exponent: &BigInt, order: &BigUint) -> BigUint {
        exponent
            .mod_floor(&BigInt::from(order.clone()))
            .magnitude()
            .clone()
    }
}

impl GroupElement for QrElementPq {
    fn value(&self) -> &BigUint {
        &self.value
    }

    fn modulus(&self) -> &BigUint {
        self.group.modulus()
    }

    fn multiply(&self, other: &Self) -> Result<Self, QrGroupError> {
        self.same_group(other)?;
        let (ap, aq) = self.residues();
        let (bp, bq) = other.residues();
        let xp = ap * bp % self.group.p();
        let xq = aq * bq % self.group.q();
        Ok(self.from_residues(&xp, &xq))
    }

    fn mod_pow(&self, exponent: &BigInt) -> Result<Self, QrGroupError> {
        let (ap, aq) = self.residues();
        let ep = Self::reduce_exponent(exponent, self.group.p_prime());
        let eq = Self::reduce_exponent(exponent, self.group.q_prime());
        let (xp, xq) = join!(
            ap.modpow(&ep, self.group.p()),
            aq.modpow(&eq, self.group.q())
        );
        Ok(self.from_residues(&xp, &xq))
    }

    fn mod_inverse(&self) -> Result<Self, QrGroupError> {
        self.mod_pow(&BigInt::from(-1))
    }

    fn multi_base_exp(bases: &[Self], exponents: &[BigInt]) -> Result<Self, QrGroupError> {
        check_multi_exp_args(bases, exponents)?;
        let first = &bases[0];
        for b in &bases[1..] {
            first.same_group(b)?;
        }
        let group = &first.group;
        let (bases_p, bases_q): (Vec<_>, Vec<_>) = bases.iter().map(|b| b.residues()).unzip();
        let exps_p = cfg_iter!(exponents)
            .map(|e| Self::reduce_exponent(e, group.p_prime()))
            .collect::<Vec<_>>();
        let exps_q = cfg_iter!(exponents)
            .map(|e| Self::reduce_exponent(e, group.q_prime()))
            .collect::<Vec<_>>();
        let (xp, xq) = join!(
            simultaneous_exp(&bases_p, &exps_p, group.p()),
            simultaneous_exp(&bases_q, &exps_q, group.q())
        );
        Ok(first.from_residues(&xp?, &xq?))
    }

    fn public_clone(&self) -> QrElementN {
        QrElementN::new_unchecked(self.group.public_group(), self.value.clone())
    }
}

impl fmt::Debug for QrElementPq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QrElementPq({})", self.value)
    }
}
