//! Common code for the graph signature crates: Fiat-Shamir hashing over canonical strings, random
//! big integer helpers and shared macros.

#[macro_use]
pub mod macros;
pub mod hashing_utils;
pub mod misc;

#[cfg(feature = "parallel")]
pub use rayon;
