//! Arithmetic in the group of quadratic residues `QR_N` modulo a special RSA modulus `N = p*q` where
//! `p = 2p' + 1` and `q = 2q' + 1` are safe primes.
//!
//! Two groups are provided:
//! - [`QrGroupN`] knows only the modulus. This is what provers and verifiers work in.
//! - [`QrGroupPq`] additionally knows `p` and `q`. It belongs to the signer and computes every
//!   exponentiation as two half-size exponentiations modulo `p` and `q` recombined with the Chinese
//!   Remainder Theorem.
//!
//! Elements of [`QrGroupPq`] ([`QrElementPq`]) leave the signer only through
//! [`GroupElement::public_clone`] which yields a [`QrElementN`] holding no factorization data.
//!
//! [`QrGroupN`]: crate::group::QrGroupN
//! [`QrGroupPq`]: crate::group::QrGroupPq
//! [`QrElementN`]: crate::element::QrElementN
//! [`QrElementPq`]: crate::element::QrElementPq
//! [`GroupElement::public_clone`]: crate::element::GroupElement::public_clone

pub mod element;
pub mod error;
pub mod group;
pub mod number_theory;
pub mod prime;

pub mod prelude {
    pub use crate::element::{GroupElement, QrElementN, QrElementPq};
    pub use crate::error::QrGroupError;
    pub use crate::group::{QrGroup, QrGroupN, QrGroupPq};
    pub use crate::prime::{SafePrime, SpecialRsaMod};
}
