use ark_std::{string::String, vec::Vec};
use digest::Digest;
use num::BigUint;

/// Number of bits in the output of the digest `D`
pub fn digest_bits<D: Digest>() -> usize {
    <D as Digest>::output_size() * 8
}

/// Hash an ordered list of strings to a non-negative integer of at most `digest_bits::<D>()` bits.
/// Every string is prefixed with its byte length (8 bytes, big endian) so that different lists can
/// never produce the same hash input. The order of `items` is significant.
/// This is vulnerable to timing attack and is only used when input is public anyway like when
/// generating a challenge
pub fn hash_strings_to_int<D: Digest, S: AsRef<str>>(items: &[S]) -> BigUint {
    let mut hasher = D::new();
    for item in items {
        let bytes = item.as_ref().as_bytes();
        hasher.update((bytes.len() as u64).to_be_bytes());
        hasher.update(bytes);
    }
    BigUint::from_bytes_be(&hasher.finalize())
}

/// Canonical string for an integer as used in challenge lists
pub fn canonical_string<T: ark_std::fmt::Display>(value: &T) -> String {
    value.to_string()
}

/// Canonical strings of all given values, order preserved
pub fn canonical_strings<'a, T, I>(values: I) -> Vec<String>
where
    T: ark_std::fmt::Display + 'a,
    I: IntoIterator<Item = &'a T>,
{
    values.into_iter().map(canonical_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use blake2::Blake2b512;
    use num::Zero;
    use sha2::Sha256;

    #[test]
    fn deterministic_and_order_sensitive() {
        let a = vec!["123".to_string(), "456".to_string()];
        let b = vec!["456".to_string(), "123".to_string()];
        let c = vec!["1234".to_string(), "56".to_string()];

        let h_a = hash_strings_to_int::<Sha256, _>(&a);
        assert_eq!(h_a, hash_strings_to_int::<Sha256, _>(&a));
        assert_ne!(h_a, hash_strings_to_int::<Sha256, _>(&b));
        // Same concatenation but different split
        assert_ne!(h_a, hash_strings_to_int::<Sha256, _>(&c));
        assert!(h_a.bits() <= 256);
        assert!(!h_a.is_zero());
    }

    #[test]
    fn output_sizes() {
        assert_eq!(digest_bits::<Sha256>(), 256);
        assert_eq!(digest_bits::<Blake2b512>(), 512);
        let h = hash_strings_to_int::<Blake2b512, _>(&["x"]);
        assert!(h.bits() <= 512);
    }

    #[test]
    fn canonical() {
        let values = vec![BigUint::from(10u32), BigUint::from(7u32)];
        assert_eq!(canonical_strings(&values), vec!["10", "7"]);
    }
}
