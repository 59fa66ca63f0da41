use ark_std::rand::RngCore;
use num::{bigint::RandBigInt, BigInt, BigUint, One};

/// Uniformly random integer in `[0, 2^bits)`
pub fn rand_bits<R: RngCore + ?Sized>(rng: &mut R, bits: usize) -> BigUint {
    rng.gen_biguint(bits as u64)
}

/// Uniformly random signed integer in `[0, 2^bits)`, as used for witness randomness
pub fn rand_bits_signed<R: RngCore + ?Sized>(rng: &mut R, bits: usize) -> BigInt {
    BigInt::from(rand_bits(rng, bits))
}

/// Random odd integer with exactly `bits` bits, i.e. in `[2^(bits-1), 2^bits)`. `bits` must be at least 2
pub fn rand_odd_with_exact_bits<R: RngCore + ?Sized>(rng: &mut R, bits: usize) -> BigUint {
    let mut candidate = rand_bits(rng, bits);
    candidate.set_bit(bits as u64 - 1, true);
    candidate.set_bit(0, true);
    candidate
}

/// Uniformly random integer in `[low, high)`. Panics if `low >= high`, like `RandBigInt`
pub fn rand_range<R: RngCore + ?Sized>(rng: &mut R, low: &BigUint, high: &BigUint) -> BigUint {
    rng.gen_biguint_range(low, high)
}

/// Uniformly random integer in `[2, bound - 1)`, the range secret exponents are drawn from
pub fn rand_exponent_below<R: RngCore + ?Sized>(rng: &mut R, bound: &BigUint) -> BigUint {
    let two = BigUint::from(2u8);
    rand_range(rng, &two, &(bound - BigUint::one()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn bit_lengths() {
        let mut rng = StdRng::seed_from_u64(0u64);
        for bits in [2, 3, 17, 64, 65, 300] {
            for _ in 0..20 {
                let r = rand_bits(&mut rng, bits);
                assert!(r.bits() <= bits as u64);

                let o = rand_odd_with_exact_bits(&mut rng, bits);
                assert_eq!(o.bits(), bits as u64);
                assert!(o.bit(0));
            }
        }
    }

    #[test]
    fn ranges() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let low = BigUint::from(100u32);
        let high = BigUint::from(110u32);
        for _ in 0..50 {
            let r = rand_range(&mut rng, &low, &high);
            assert!(r >= low && r < high);
            let e = rand_exponent_below(&mut rng, &high);
            assert!(e >= BigUint::from(2u8) && e < BigUint::from(109u32));
        }
    }
}
