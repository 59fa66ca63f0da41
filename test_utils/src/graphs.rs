//! Key pairs and random encoded graphs with small parameters

pub use gs_proof_system::test_utils::*;
