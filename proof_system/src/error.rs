use crate::{base::BaseType, store::StoreKey};
use ark_std::{fmt, string::String};
use qr_group::error::QrGroupError;

#[derive(Debug)]
pub enum ProofSystemError {
    QrGroup(QrGroupError),
    /// A value was already stored under this key
    DuplicateStoreKey(StoreKey),
    /// Nothing stored under this key
    MissingStoreKey(StoreKey),
    /// Key holds a value of another kind than the one asked for
    UnexpectedStoreValue(StoreKey, &'static str),
    InvalidStoreKey(String),
    DuplicateBase(usize, BaseType),
    /// Base handed to a prover is not a certified vertex or edge base of the public key
    UncertifiedBase(usize, BaseType),
    BaseExponentAlreadySet(usize, BaseType),
    /// Base handed to a prover has no exponent
    MissingExponent(usize, BaseType),
    /// All bases of this type in the extended public key are already assigned. The key was
    /// generated with too small a pool for the graph.
    BasePoolExhausted(BaseType, usize),
    DuplicateVertex(u64),
    UnknownVertex(u64),
    DuplicateEdge(u64, u64),
    /// A vertex or edge carries more labels than the encoding parameters allow
    TooManyLabels(usize, usize),
    /// Value has more bits (first) than allowed (second)
    ExponentTooLarge(u64, u64),
    InvalidParameters(String),
    /// Digest output bits (first) differ from the configured hash length (second)
    DigestSizeMismatch(usize, usize),
    /// The orchestrator cannot move from the first state to the second
    InvalidStateTransition(&'static str, &'static str),
    NoComponents,
    /// A prover component's self check failed after the responses were computed
    SelfCheckFailed(String),
    /// Proof content found unusable while verifying, reported to the caller as a rejection
    MalformedProof(VerificationFailure),
}

impl From<QrGroupError> for ProofSystemError {
    fn from(e: QrGroupError) -> Self {
        Self::QrGroup(e)
    }
}

impl From<VerificationFailure> for ProofSystemError {
    fn from(e: VerificationFailure) -> Self {
        Self::MalformedProof(e)
    }
}

impl fmt::Display for ProofSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QrGroup(e) => write!(f, "group error: {}", e),
            Self::DuplicateStoreKey(k) => write!(f, "key {} already holds a value", k),
            Self::MissingStoreKey(k) => write!(f, "nothing stored under key {}", k),
            Self::UnexpectedStoreValue(k, expected) => {
                write!(f, "key {} does not hold {}", k, expected)
            }
            Self::InvalidStoreKey(s) => write!(f, "invalid store key {}", s),
            Self::DuplicateBase(i, t) => write!(f, "duplicate base {} of type {}", i, t),
            Self::UncertifiedBase(i, t) => {
                write!(f, "base {} of type {} is not a certified graph base", i, t)
            }
            Self::BaseExponentAlreadySet(i, t) => {
                write!(f, "exponent of base {} of type {} already set", i, t)
            }
            Self::MissingExponent(i, t) => write!(f, "base {} of type {} has no exponent", i, t),
            Self::BasePoolExhausted(t, size) => {
                write!(f, "all {} bases of type {} are assigned", size, t)
            }
            Self::DuplicateVertex(id) => write!(f, "vertex {} added twice", id),
            Self::UnknownVertex(id) => write!(f, "unknown vertex {}", id),
            Self::DuplicateEdge(s, t) => write!(f, "edge {} -> {} added twice", s, t),
            Self::TooManyLabels(count, max) => {
                write!(f, "{} labels given but at most {} allowed", count, max)
            }
            Self::ExponentTooLarge(bits, max) => {
                write!(f, "exponent has {} bits but at most {} allowed", bits, max)
            }
            Self::InvalidParameters(s) => write!(f, "invalid parameters: {}", s),
            Self::DigestSizeMismatch(got, expected) => write!(
                f,
                "digest outputs {} bits but hash length is {}",
                got, expected
            ),
            Self::InvalidStateTransition(from, to) => {
                write!(f, "cannot move from state {} to {}", from, to)
            }
            Self::NoComponents => write!(f, "no components added"),
            Self::SelfCheckFailed(c) => write!(f, "self check of component {} failed", c),
            Self::MalformedProof(failure) => write!(f, "malformed proof: {}", failure),
        }
    }
}

impl std::error::Error for ProofSystemError {}

/// Reason a proof was rejected. This is a normal outcome of verification and not a process error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationFailure {
    /// Response at the key has more bits than the bound for its kind
    ResponseOutOfRange {
        key: StoreKey,
        bits: u64,
        max_bits: u64,
    },
    /// Base not certified in the extended public key
    IllegalBase(usize, BaseType),
    /// Element in the proof belongs to another group than the public key
    ForeignElement(StoreKey),
    /// Proof lacks an entry the component needs
    MissingEntry(StoreKey),
    /// Entry exists but is of the wrong kind
    MalformedEntry(StoreKey),
    /// Two responses that must be equal are not
    ResponseMismatch(StoreKey, StoreKey),
    /// Recomputed challenge differs from the one in the proof
    ChallengeMismatch,
}

impl fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResponseOutOfRange {
                key,
                bits,
                max_bits,
            } => write!(
                f,
                "response {} has {} bits but at most {} allowed",
                key, bits, max_bits
            ),
            Self::IllegalBase(i, t) => write!(f, "base {} of type {} is not certified", i, t),
            Self::ForeignElement(k) => write!(f, "element {} is from another group", k),
            Self::MissingEntry(k) => write!(f, "proof has no entry {}", k),
            Self::MalformedEntry(k) => write!(f, "proof entry {} has the wrong kind", k),
            Self::ResponseMismatch(a, b) => write!(f, "responses {} and {} differ", a, b),
            Self::ChallengeMismatch => write!(f, "challenge mismatch"),
        }
    }
}

/// Result of verifying a proof
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationOutcome {
    Accepted,
    Rejected(VerificationFailure),
}

impl VerificationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn failure(&self) -> Option<&VerificationFailure> {
        match self {
            Self::Accepted => None,
            Self::Rejected(f) => Some(f),
        }
    }
}
