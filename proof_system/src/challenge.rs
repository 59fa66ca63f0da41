//! Fiat-Shamir challenge over the public context and the witnesses of all components

use crate::{
    constants::{CONTEXT_LABEL, NONCE_LABEL},
    error::ProofSystemError,
    store::StoreKey,
};
use ark_std::{fmt::Display, format, string::String, string::ToString, vec::Vec};
use digest::Digest;
use gs_crypto_utils::{
    expect_equality,
    hashing_utils::{digest_bits, hash_strings_to_int},
};
use num::BigInt;
use qr_group::element::QrElementN;

/// `key=value`, the canonical form of a named value in a challenge
pub fn context_entry<V: Display>(key: &StoreKey, value: &V) -> String {
    format!("{}={}", key, value)
}

/// Ordered strings the challenge is computed over: a fixed label, the public context, every
/// witness in the given order and the nonce if there is one
pub fn challenge_strings(
    context: &[String],
    witnesses: &[(StoreKey, QrElementN)],
    nonce: Option<&[u8]>,
) -> Vec<String> {
    let mut strings = Vec::with_capacity(context.len() + witnesses.len() + 3);
    strings.push(CONTEXT_LABEL.to_string());
    strings.extend(context.iter().cloned());
    strings.extend(witnesses.iter().map(|(k, w)| context_entry(k, w)));
    if let Some(n) = nonce {
        strings.push(NONCE_LABEL.to_string());
        strings.push(n.iter().map(|b| format!("{:02x}", b)).collect());
    }
    strings
}

/// Hash the challenge strings to an integer of at most `l_h` bits. The output of `D` must have
/// exactly `l_h` bits.
pub fn compute_challenge<D: Digest>(
    context: &[String],
    witnesses: &[(StoreKey, QrElementN)],
    nonce: Option<&[u8]>,
    l_h: usize,
) -> Result<BigInt, ProofSystemError> {
    expect_equality!(digest_bits::<D>(), l_h, ProofSystemError::DigestSizeMismatch);
    let strings = challenge_strings(context, witnesses, nonce);
    Ok(BigInt::from(hash_strings_to_int::<D, _>(&strings)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyClass;
    use blake2::Blake2b512;
    use num::BigUint;
    use qr_group::group::{QrGroup, QrGroupN};
    use sha2::Sha256;

    fn witnesses() -> Vec<(StoreKey, QrElementN)> {
        let group = QrGroupN::new(BigUint::from(1081u32)).unwrap();
        vec![
            (
                StoreKey::new("graph", KeyClass::Witness, "U"),
                group.create_element(BigUint::from(4u32)).unwrap(),
            ),
            (
                StoreKey::new("commitment", KeyClass::Witness, "C"),
                group.create_element(BigUint::from(9u32)).unwrap(),
            ),
        ]
    }

    #[test]
    fn strings_layout() {
        let context = vec!["1081".to_string()];
        let s = challenge_strings(&context, &witnesses(), Some(&[0xab, 0x01][..]));
        assert_eq!(
            s,
            vec![
                CONTEXT_LABEL.to_string(),
                "1081".to_string(),
                "gs:graph:witness:U=4".to_string(),
                "gs:commitment:witness:C=9".to_string(),
                NONCE_LABEL.to_string(),
                "ab01".to_string(),
            ]
        );
        assert_eq!(challenge_strings(&context, &witnesses(), None).len(), 4);
    }

    #[test]
    fn challenge_depends_on_everything() {
        let context = vec!["1081".to_string()];
        let w = witnesses();
        let c = compute_challenge::<Sha256>(&context, &w, None, 256).unwrap();
        assert!(c.bits() <= 256);
        assert_eq!(c, compute_challenge::<Sha256>(&context, &w, None, 256).unwrap());

        let mut reordered = w.clone();
        reordered.reverse();
        assert_ne!(
            c,
            compute_challenge::<Sha256>(&context, &reordered, None, 256).unwrap()
        );
        assert_ne!(
            c,
            compute_challenge::<Sha256>(&context, &w, Some(&[1u8][..]), 256).unwrap()
        );
        assert_ne!(
            c,
            compute_challenge::<Sha256>(&["1082".to_string()], &w, None, 256).unwrap()
        );
    }

    #[test]
    fn digest_must_match_hash_length() {
        assert!(matches!(
            compute_challenge::<Blake2b512>(&[], &witnesses(), None, 256),
            Err(ProofSystemError::DigestSizeMismatch(512, 256))
        ));
        compute_challenge::<Blake2b512>(&[], &witnesses(), None, 512).unwrap();
    }
}
