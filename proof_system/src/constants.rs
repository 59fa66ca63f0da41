/// First segment of every store key
pub const KEY_NAMESPACE: &str = "gs";

/// Component under which the orchestrators file values of the whole proof, like the challenge
pub const PROOF_COMPONENT: &str = "proof";
pub const CHALLENGE_NAME: &str = "challenge";

pub const CONTEXT_LABEL: &str = "graph-signature-proof";
pub const NONCE_LABEL: &str = "nonce";

/// Names of the values the components file in the store and the proof
pub const COMMITMENT_NAME: &str = "C";
pub const MESSAGE_NAME: &str = "m";
pub const COMMITMENT_RANDOMNESS_NAME: &str = "r";
pub const GRAPH_COMMITMENT_NAME: &str = "U";
pub const GRAPH_RANDOMNESS_NAME: &str = "v";
pub const VERTEX_NAME: &str = "vertex";
pub const EDGE_NAME: &str = "edge";

