//! Number theoretic helpers: Jacobi symbols, modular inverses, the Chinese Remainder Theorem and
//! simultaneous exponentiation.

use crate::error::QrGroupError;
use ark_std::{mem, vec::Vec};
use num::{integer::Integer, BigInt, BigUint, One, Signed, Zero};

fn check_jacobi_modulus(n: &BigUint) -> Result<(), QrGroupError> {
    if n.is_zero() || n.is_even() {
        return Err(QrGroupError::InvalidJacobiModulus(n.to_string()));
    }
    Ok(())
}

/// `a mod n` as a non-negative integer, also for negative `a`
pub fn reduce_signed(a: &BigInt, n: &BigUint) -> BigUint {
    let n = BigInt::from(n.clone());
    // `mod_floor` with a positive modulus is never negative
    a.mod_floor(&n).magnitude().clone()
}

/// Jacobi symbol `(a / n)` for odd positive `n` computed by recursive application of quadratic
/// reciprocity and the second supplement for factors of 2. Returns 1, -1 or 0.
pub fn jacobi_symbol(a: &BigInt, n: &BigUint) -> Result<i8, QrGroupError> {
    check_jacobi_modulus(n)?;
    Ok(jacobi_recursive(reduce_signed(a, n), n))
}

fn jacobi_recursive(a: BigUint, n: &BigUint) -> i8 {
    if n.is_one() {
        return 1;
    }
    let a = a % n;
    if a.is_zero() {
        return 0;
    }
    if a.is_one() {
        return 1;
    }
    if a.is_even() {
        // (2 / n) = 1 iff n = 1 or 7 mod 8
        let s = match mod_small(n, 8) {
            1 | 7 => 1,
            _ => -1,
        };
        return s * jacobi_recursive(a >> 1u32, n);
    }
    // Both odd, flip (a / n) into (n / a)
    let s = if mod_small(&a, 4) == 3 && mod_small(n, 4) == 3 {
        -1
    } else {
        1
    };
    s * jacobi_recursive(n % &a, &a)
}

/// Jacobi symbol `(a / n)` for odd positive `n` computed iteratively by splitting off all powers of 2
/// with a shift and then swapping the arguments. Must agree with [`jacobi_symbol`] on every input.
pub fn jacobi_symbol_by_splitting(a: &BigInt, n: &BigUint) -> Result<i8, QrGroupError> {
    check_jacobi_modulus(n)?;
    let mut a = reduce_signed(a, n);
    let mut n = n.clone();
    let mut t = 1i8;
    while !a.is_zero() {
        // a = 2^z * a' with odd a'
        let z = a.trailing_zeros().unwrap_or(0);
        a >>= z;
        if z % 2 == 1 {
            let r = mod_small(&n, 8);
            if r == 3 || r == 5 {
                t = -t;
            }
        }
        if mod_small(&a, 4) == 3 && mod_small(&n, 4) == 3 {
            t = -t;
        }
        mem::swap(&mut a, &mut n);
        a %= &n;
    }
    Ok(if n.is_one() { t } else { 0 })
}

fn mod_small(n: &BigUint, m: u32) -> u32 {
    (n % m).to_u32_digits().first().copied().unwrap_or(0)
}

/// Inverse of `a` modulo `m` using the Extended Euclidean Algorithm. `None` when `gcd(a, m) != 1`
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }
    let a = BigInt::from(a % m);
    let m_signed = BigInt::from(m.clone());
    let e = a.extended_gcd(&m_signed);
    if !e.gcd.is_one() {
        return None;
    }
    Some(e.x.mod_floor(&m_signed).magnitude().clone())
}

/// `1_p = q * (q^{-1} mod p)`, which is 1 mod `p` and 0 mod `q`
pub fn compute_1p(p: &BigUint, q: &BigUint) -> Option<BigUint> {
    mod_inverse(q, p).map(|q_inv| q * q_inv)
}

/// `1_q = p * (p^{-1} mod q)`, which is 0 mod `p` and 1 mod `q`
pub fn compute_1q(p: &BigUint, q: &BigUint) -> Option<BigUint> {
    mod_inverse(p, q).map(|p_inv| p * p_inv)
}

/// The unique `x` in `[0, pq)` with `x = xp mod p` and `x = xq mod q`. `None` when `p` and `q` are
/// not coprime.
pub fn compute_crt(xp: &BigUint, p: &BigUint, xq: &BigUint, q: &BigUint) -> Option<BigUint> {
    CrtCoefficients::new(p, q).ok().map(|c| c.combine(xp, xq))
}

/// Precomputed coefficients to recombine residues modulo two coprime integers `p` and `q`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrtCoefficients {
    p: BigUint,
    q: BigUint,
    modulus: BigUint,
    one_p: BigUint,
    one_q: BigUint,
}

impl CrtCoefficients {
    pub fn new(p: &BigUint, q: &BigUint) -> Result<Self, QrGroupError> {
        let one_p = compute_1p(p, q).ok_or(QrGroupError::NotInvertible)?;
        let one_q = compute_1q(p, q).ok_or(QrGroupError::NotInvertible)?;
        Ok(Self {
            p: p.clone(),
            q: q.clone(),
            modulus: p * q,
            one_p,
            one_q,
        })
    }

    /// `xp * 1_p + xq * 1_q mod pq`
    pub fn combine(&self, xp: &BigUint, xq: &BigUint) -> BigUint {
        ((xp % &self.p) * &self.one_p + (xq % &self.q) * &self.one_q) % &self.modulus
    }

    pub fn one_p(&self) -> &BigUint {
        &self.one_p
    }

    pub fn one_q(&self) -> &BigUint {
        &self.one_q
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }
}

/// `prod bases[i]^exponents[i] mod modulus` by interleaved square-and-multiply over all exponents at
/// once (Straus/Shamir). Exponents must be non-negative.
pub fn simultaneous_exp(
    bases: &[BigUint],
    exponents: &[BigUint],
    modulus: &BigUint,
) -> Result<BigUint, QrGroupError> {
    if bases.len() != exponents.len() {
        return Err(QrGroupError::ExpectedSameSizeSequences(
            bases.len(),
            exponents.len(),
        ));
    }
    let max_bits = exponents.iter().map(|e| e.bits()).max().unwrap_or(0);
    let bases = bases.iter().map(|b| b % modulus).collect::<Vec<_>>();
    let mut acc = BigUint::one() % modulus;
    for i in (0..max_bits).rev() {
        acc = &acc * &acc % modulus;
        for (b, e) in bases.iter().zip(exponents.iter()) {
            if e.bit(i) {
                acc = acc * b % modulus;
            }
        }
    }
    Ok(acc)
}

/// `base^exponent mod modulus` for a possibly negative exponent. Negative exponents go through the
/// inverse of `base`.
pub fn signed_mod_pow(
    base: &BigUint,
    exponent: &BigInt,
    modulus: &BigUint,
) -> Result<BigUint, QrGroupError> {
    if exponent.is_negative() {
        let inv = mod_inverse(base, modulus).ok_or(QrGroupError::NotInvertible)?;
        Ok(inv.modpow(exponent.magnitude(), modulus))
    } else {
        Ok(base.modpow(exponent.magnitude(), modulus))
    }
}
