// SPDX-License-Identifier: MIT
// This file is part of the zkbench-gadgets project.
// See the LICENSE file in the project root for full license information.

//! Out-of-circuit witness computation.
//!
//! A [`Hint`] computes values the prover supplies without proving how they
//! were obtained. [`solve`] allocates those values as free witnesses: a
//! gadget using a hint must constrain them itself, as
//! [`floor_div`](crate::gadgets::floor_div) does for the quotient and
//! remainder.

use crate::errors::{GadgetError, HintError};
use crate::gadgets::num::{bigint_to_scalar, scalar_to_bigint};
use bellpepper_core::{ConstraintSystem, SynthesisError, num::AllocatedNum};
use ff::PrimeFieldBits;
use num_bigint::BigInt;

/// A pure function from non-negative integers to non-negative integers,
/// evaluated outside the circuit.
pub trait Hint {
  /// Name used in errors and constraint paths.
  const NAME: &'static str;
  /// Number of values the hint produces.
  const NUM_OUTPUTS: usize;

  /// Compute the outputs from the inputs.
  fn compute_witness(inputs: &[BigInt]) -> Result<Vec<BigInt>, HintError>;
}

/// Allocates the outputs of `H` as unconstrained witnesses.
///
/// When every input value is known the hint runs and its errors abort
/// synthesis. Otherwise (shape synthesis) the outputs are allocated without
/// values. No constraint is emitted: the caller must bind every output.
pub fn solve<Scalar, CS, H>(
  mut cs: CS,
  inputs: &[&AllocatedNum<Scalar>],
) -> Result<Vec<AllocatedNum<Scalar>>, GadgetError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
  H: Hint,
{
  let values = inputs
    .iter()
    .map(|x| x.get_value().map(|v| scalar_to_bigint(&v)))
    .collect::<Option<Vec<_>>>();

  let outputs = match values {
    Some(values) => {
      let outputs = H::compute_witness(&values)?;
      if outputs.len() != H::NUM_OUTPUTS {
        return Err(
          HintError::InvalidArity {
            hint: H::NAME,
            expected: H::NUM_OUTPUTS,
            actual: outputs.len(),
          }
          .into(),
        );
      }
      outputs
        .iter()
        .map(|o| {
          bigint_to_scalar::<Scalar>(o)
            .map(Some)
            .ok_or_else(|| HintError::NotAFieldElement {
              value: o.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?
    }
    None => vec![None; H::NUM_OUTPUTS],
  };

  let mut allocated = Vec::with_capacity(outputs.len());
  for (i, value) in outputs.into_iter().enumerate() {
    allocated.push(AllocatedNum::alloc(
      cs.namespace(|| format!("{} output {i}", H::NAME)),
      || value.ok_or(SynthesisError::AssignmentMissing),
    )?);
  }
  Ok(allocated)
}
