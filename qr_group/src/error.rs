use ark_std::{fmt, string::String};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QrGroupError {
    /// The two elements (or an element and a group) have different moduli
    GroupMismatch,
    /// The value is not a quadratic residue of the group
    NotQuadraticResidue(String),
    /// The value is not in `[1, N)` or shares a factor with `N`
    NotAUnit(String),
    /// Modular inverse asked for a non-invertible value
    NotInvertible,
    /// Number of bases does not match number of exponents
    ExpectedSameSizeSequences(usize, usize),
    /// Multi-exponentiation over zero bases
    EmptyBases,
    /// Requested bit length is too small for the operation
    InvalidBitLength(usize),
    /// Jacobi symbol asked for an even or non-positive modulus
    InvalidJacobiModulus(String),
    /// The two primes given for a special RSA modulus are not distinct safe primes
    NotASafePrime(String),
    /// A bounded generation loop (prime search, generator sampling) ran out of attempts. The
    /// parameters are too restrictive.
    GenerationExhausted(&'static str, usize),
}

impl fmt::Display for QrGroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GroupMismatch => write!(f, "elements belong to different groups"),
            Self::NotQuadraticResidue(v) => write!(f, "{} is not a quadratic residue", v),
            Self::NotAUnit(v) => write!(f, "{} is not a unit of the group", v),
            Self::NotInvertible => write!(f, "value is not invertible"),
            Self::ExpectedSameSizeSequences(a, b) => {
                write!(f, "expected sequences of same size but got {} and {}", a, b)
            }
            Self::EmptyBases => write!(f, "no bases given for multi-exponentiation"),
            Self::InvalidBitLength(b) => write!(f, "invalid bit length {}", b),
            Self::InvalidJacobiModulus(n) => write!(f, "invalid Jacobi modulus {}", n),
            Self::NotASafePrime(v) => write!(f, "{} is not a safe prime", v),
            Self::GenerationExhausted(what, attempts) => {
                write!(f, "no {} found after {} attempts", what, attempts)
            }
        }
    }
}

impl std::error::Error for QrGroupError {}
