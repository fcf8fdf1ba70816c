//! This library implements hand-written R1CS gadgets and the circuits that
//! benchmark them.
//!
//! The gadgets target bellpepper's `ConstraintSystem`: a floor division whose
//! quotient and remainder come from an out-of-circuit hint and are bound by
//! constraints, and a bit-accurate streaming SHA-256 that can exclude trailing
//! bytes from the hashed length. The benchmark circuits repeat these gadgets
//! together with bounded comparisons and bit decompositions, and
//! [`bench::run`] times their compilation, witness generation and
//! satisfiability check.
#![deny(
  warnings,
  unused,
  future_incompatible,
  nonstandard_style,
  rust_2018_idioms,
  missing_docs
)]
#![allow(clippy::type_complexity)]
#![forbid(unsafe_code)]

// public modules
pub mod bench;
pub mod circuits;
pub mod errors;
pub mod gadgets;
pub mod r1cs;

/// Start a span + timer, return `(Span, Instant)`.
macro_rules! start_span {
    ($name:expr $(, $($fmt:tt)+)?) => {{
        let span       = info_span!($name $(, $($fmt)+)?);
        let span_clone = span.clone();    // lives as long as the guard
        let _guard      = span_clone.enter();
        (span, Instant::now())
    }};
}
pub(crate) use start_span;
