//! This module defines errors returned by the library.
use bellpepper_core::SynthesisError;
use thiserror::Error;

/// Errors returned by an out-of-circuit hint.
///
/// These are build-time failures: they abort circuit construction and are
/// never turned into unsatisfied constraints.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum HintError {
  /// returned if the hint received a different number of inputs than it expects
  #[error("InvalidArity: {hint} expects {expected} inputs, got {actual}")]
  InvalidArity {
    /// The name of the hint
    hint: &'static str,
    /// The number of inputs the hint expects
    expected: usize,
    /// The number of inputs supplied
    actual: usize,
  },
  /// returned if the dividend or the divisor of an integer division is negative
  #[error("NegativeOperand: dividend or divisor is negative")]
  NegativeOperand,
  /// returned if the divisor of an integer division does not fit in a u64
  #[error("DivisorOutOfRange: divisor {divisor} is not a u64")]
  DivisorOutOfRange {
    /// The offending divisor, in decimal
    divisor: String,
  },
  /// returned if a hint output cannot be represented as a field element
  #[error("NotAFieldElement: {value}")]
  NotAFieldElement {
    /// The offending output, in decimal
    value: String,
  },
}

/// Errors returned while building or checking a circuit
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum GadgetError {
  /// returned when an out-of-circuit hint rejects its inputs
  #[error("HintError: {0}")]
  Hint(#[from] HintError),
  /// returned when the underlying constraint system fails during synthesis
  #[error("SynthesisError: {reason}")]
  Synthesis {
    /// The reason for circuit synthesis failure
    reason: String,
  },
  /// returned when a SHA-256 digest is written to or summed after it was finalized
  #[error("DigestFinalized: digest must be reset before reuse")]
  DigestFinalized,
  /// returned when SHA-256 padding leaves bytes in the pending buffer
  #[error("PaddingInvariant: {pending} bytes pending after padding")]
  PaddingInvariant {
    /// Number of bytes left in the buffer
    pending: usize,
  },
  /// returned if the supplied witness is not of the right length for a shape
  #[error("InvalidWitnessLength: expected {expected}, got {actual}")]
  InvalidWitnessLength {
    /// Expected length
    expected: usize,
    /// Actual length
    actual: usize,
  },
  /// returned if the supplied witness does not satisfy a shape
  #[error("UnSat: {reason}")]
  UnSat {
    /// The reason for circuit UnSat failure
    reason: String,
  },
}

impl From<SynthesisError> for GadgetError {
  fn from(err: SynthesisError) -> Self {
    GadgetError::Synthesis {
      reason: err.to_string(),
    }
  }
}
