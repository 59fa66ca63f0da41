//! Fixtures shared by the tests and benchmarks of the workspace

pub mod graphs;
#[macro_use]
pub mod serialization;
