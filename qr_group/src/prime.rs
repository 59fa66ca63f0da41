//! Probabilistic primality testing and generation of safe primes and special RSA moduli

use crate::error::QrGroupError;
use ark_std::{
    end_timer,
    rand::{rngs::StdRng, RngCore, SeedableRng},
    start_timer,
};
use gs_crypto_utils::{join, misc::rand_odd_with_exact_bits, misc::rand_range};
use num::{integer::Integer, BigUint, One, Zero};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};


/// Upper bound on candidates tried per bit of the requested length squared before a generation
/// loop gives up. Safe primes of `k` bits have density about `1/k^2` so this is never reached with
/// sane parameters.
pub const GENERATION_ATTEMPTS_PER_BIT_SQUARED: usize = 64;

const SMALL_PRIMES: [u32; 54] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Maximum number of candidates for a generation loop producing numbers of `bits` bits
pub fn max_generation_attempts(bits: usize) -> usize {
    GENERATION_ATTEMPTS_PER_BIT_SQUARED * bits.max(8) * bits.max(8)
}

/// Returns `Some(true)` if `n` is one of the small primes, `Some(false)` if a small prime divides it
/// and `None` if trial division is inconclusive
fn trial_division(n: &BigUint) -> Option<bool> {
    for p in SMALL_PRIMES {
        if *n == BigUint::from(p) {
            return Some(true);
        }
        if (n % p).is_zero() {
            return Some(false);
        }
    }
    None
}

/// Miller-Rabin test of odd `n > 3` with `rounds` random bases
fn miller_rabin<R: RngCore + ?Sized>(rng: &mut R, n: &BigUint, rounds: usize) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u8);
    let n_minus_1 = n - &one;
    let s = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> s;
    'witness: for _ in 0..rounds {
        let a = rand_range(rng, &two, &n_minus_1);
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_1 {
            continue;
        }
        for _ in 1..s {
            x = &x * &x % n;
            if x == n_minus_1 {
                continue 'witness;
            }
            if x == one {
                return false;
            }
        }
        return false;
    }
    true
}

/// Probabilistic primality test. A composite passes with probability at most `2^-certainty`.
pub fn is_probable_prime<R: RngCore + ?Sized>(rng: &mut R, n: &BigUint, certainty: usize) -> bool {
    if *n < BigUint::from(2u8) {
        return false;
    }
    if let Some(decided) = trial_division(n) {
        return decided;
    }
    // Each round has error at most 1/4
    let rounds = Integer::div_ceil(&certainty, &2).max(1);
    miller_rabin(rng, n, rounds)
}

/// Random prime with exactly `bits` bits
pub fn random_prime<R: RngCore + ?Sized>(
    rng: &mut R,
    bits: usize,
    certainty: usize,
) -> Result<BigUint, QrGroupError> {
    if bits < 2 {
        return Err(QrGroupError::InvalidBitLength(bits));
    }
    if bits == 2 {
        return Ok(BigUint::from(if rng.next_u32() & 1 == 0 { 2u8 } else { 3u8 }));
    }
    let attempts = max_generation_attempts(bits);
    for _ in 0..attempts {
        let candidate = rand_odd_with_exact_bits(rng, bits);
        if is_probable_prime(rng, &candidate, certainty) {
            return Ok(candidate);
        }
    }
    Err(QrGroupError::GenerationExhausted("prime", attempts))
}

/// A safe prime `a = 2a' + 1` together with its Sophie Germain prime `a'`
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafePrime {
    #[serde_as(as = "DisplayFromStr")]
    pub a: BigUint,
    #[serde_as(as = "DisplayFromStr")]
    pub a_prime: BigUint,
}

impl SafePrime {
    /// Generate a safe prime of exactly `bits` bits whose two most significant bits are set, so that
    /// the product of two such primes always has exactly `2 * bits` bits. `bits` must be at least 8.
    pub fn generate<R: RngCore + ?Sized>(
        rng: &mut R,
        bits: usize,
        certainty: usize,
    ) -> Result<Self, QrGroupError> {
        if bits < 8 {
            return Err(QrGroupError::InvalidBitLength(bits));
        }
        let timer = start_timer!(|| format!("Generate {} bit safe prime", bits));
        let attempts = max_generation_attempts(bits);
        for attempt in 0..attempts {
            let mut a_prime = rand_odd_with_exact_bits(rng, bits - 1);
            a_prime.set_bit(bits as u64 - 3, true);
            let a = (&a_prime << 1u32) + 1u32;
            // Cheap checks first, a single Miller-Rabin round rejects almost every composite
            if trial_division(&a_prime) == Some(false) || trial_division(&a) == Some(false) {
                continue;
            }
            if !miller_rabin(rng, &a_prime, 1) || !miller_rabin(rng, &a, 1) {
                continue;
            }
            if is_probable_prime(rng, &a_prime, certainty) && is_probable_prime(rng, &a, certainty)
            {
                tracing::trace!(bits, attempt, "found safe prime");
                end_timer!(timer);
                return Ok(Self { a, a_prime });
            }
        }
        end_timer!(timer);
        Err(QrGroupError::GenerationExhausted("safe prime", attempts))
    }

    /// Check that `a` and `a'` are both (probable) primes and `a = 2a' + 1`
    pub fn from_prime<R: RngCore + ?Sized>(
        rng: &mut R,
        a: BigUint,
        certainty: usize,
    ) -> Result<Self, QrGroupError> {
        if a.is_even() {
            return Err(QrGroupError::NotASafePrime(a.to_string()));
        }
        let a_prime = (&a - 1u32) >> 1u32;
        if !is_probable_prime(rng, &a, certainty) || !is_probable_prime(rng, &a_prime, certainty) {
            return Err(QrGroupError::NotASafePrime(a.to_string()));
        }
        Ok(Self { a, a_prime })
    }
}

/// Special RSA modulus `N = p*q` where `p = 2p' + 1` and `q = 2q' + 1` are safe primes. Only the
/// signer ever holds this struct; everyone else sees `N` alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpecialRsaMod {
    pub n: BigUint,
    pub p: SafePrime,
    pub q: SafePrime,
}

impl SpecialRsaMod {
    /// Generate a special RSA modulus of exactly `bits` bits from two independently generated safe
    /// primes of `bits / 2` bits. `bits` must be even. With feature `parallel`, both prime searches
    /// run concurrently, each from its own rng seeded by `rng`.
    pub fn generate<R: RngCore + ?Sized>(
        rng: &mut R,
        bits: usize,
        certainty: usize,
    ) -> Result<Self, QrGroupError> {
        if bits % 2 != 0 || bits < 16 {
            return Err(QrGroupError::InvalidBitLength(bits));
        }
        let timer = start_timer!(|| format!("Generate {} bit special RSA modulus", bits));
        let half = bits / 2;
        let mut rng_p = Self::child_rng(rng);
        let mut rng_q = Self::child_rng(rng);
        let (p, q) = join!(
            SafePrime::generate(&mut rng_p, half, certainty),
            SafePrime::generate(&mut rng_q, half, certainty)
        );
        let p = p?;
        let mut q = q?;
        // Equal primes would make N a square
        let mut retries = 0;
        while q.a == p.a {
            retries += 1;
            if retries > 16 {
                return Err(QrGroupError::GenerationExhausted("distinct safe prime", retries));
            }
            q = SafePrime::generate(&mut rng_q, half, certainty)?;
        }
        end_timer!(timer);
        Ok(Self { n: &p.a * &q.a, p, q })
    }

    /// Build from two known safe primes
    pub fn from_safe_primes(p: SafePrime, q: SafePrime) -> Result<Self, QrGroupError> {
        if p.a == q.a {
            return Err(QrGroupError::NotASafePrime(q.a.to_string()));
        }
        Ok(Self { n: &p.a * &q.a, p, q })
    }

    /// Order `p'q'` of the group of quadratic residues modulo `N`
    pub fn qr_order(&self) -> BigUint {
        &self.p.a_prime * &self.q.a_prime
    }

    fn child_rng<R: RngCore + ?Sized>(rng: &mut R) -> StdRng {
        let mut seed = <StdRng as SeedableRng>::Seed::default();
        rng.fill_bytes(&mut seed);
        StdRng::from_seed(seed)
    }
}
