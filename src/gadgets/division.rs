// SPDX-License-Identifier: MIT
// This file is part of the zkbench-gadgets project.
// See the LICENSE file in the project root for full license information.

//! Verified floor division.
//!
//! The quotient and remainder come from the [`IntegerDivision`] hint and are
//! then bound by constraints:
//!
//! | Divisor | Enforced |
//! |---------|----------|
//! | `0` | `quotient = 0` |
//! | `!= 0` | `quotient * divisor + remainder = dividend`, `remainder < divisor`, `quotient < 2^160` |
//!
//! Every constraint is emitted regardless of the divisor; the branch is taken
//! by masking with [`assert_equal_if`] and [`assert_less_if`], so the shape of
//! the system does not depend on the witness.

use super::{
  hint::{Hint, solve},
  masked::{assert_equal_if, assert_less_if},
  num::{add, alloc_constant, is_zero, pow2},
};
use crate::errors::{GadgetError, HintError};
use bellpepper_core::{ConstraintSystem, SynthesisError, num::AllocatedNum};
use ff::PrimeFieldBits;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

/// Quotients must stay below `2^QUOTIENT_BITS`.
pub const QUOTIENT_BITS: u64 = 160;

/// Divisors (and so remainders) must fit in this many bits.
pub const DIVISOR_BITS: usize = 64;

/// Computes `(dividend / divisor, dividend % divisor)` over non-negative
/// integers, with `(0, 0)` for a zero divisor.
pub struct IntegerDivision;

impl Hint for IntegerDivision {
  const NAME: &'static str = "integer division";
  const NUM_OUTPUTS: usize = 2;

  fn compute_witness(inputs: &[BigInt]) -> Result<Vec<BigInt>, HintError> {
    let [dividend, divisor] = inputs else {
      return Err(HintError::InvalidArity {
        hint: Self::NAME,
        expected: 2,
        actual: inputs.len(),
      });
    };
    if dividend.is_negative() || divisor.is_negative() {
      return Err(HintError::NegativeOperand);
    }
    if divisor.to_u64().is_none() {
      return Err(HintError::DivisorOutOfRange {
        divisor: divisor.to_string(),
      });
    }
    if divisor.is_zero() {
      return Ok(vec![BigInt::zero(), BigInt::zero()]);
    }
    let (quotient, remainder) = dividend.div_mod_floor(divisor);
    Ok(vec![quotient, remainder])
  }
}

/// Constrains `quotient` and `remainder` to be the floor division of
/// `dividend` by `divisor`.
pub fn bind_floor_div<Scalar, CS>(
  mut cs: CS,
  dividend: &AllocatedNum<Scalar>,
  divisor: &AllocatedNum<Scalar>,
  quotient: &AllocatedNum<Scalar>,
  remainder: &AllocatedNum<Scalar>,
) -> Result<(), SynthesisError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  let zero = alloc_constant(cs.namespace(|| "zero"), Scalar::ZERO)?;
  let divisor_is_zero = is_zero(cs.namespace(|| "divisor is zero"), divisor)?;
  let divisor_nonzero = is_zero(cs.namespace(|| "divisor nonzero"), &divisor_is_zero)?;

  assert_equal_if(
    cs.namespace(|| "zero divisor gives zero quotient"),
    &divisor_is_zero,
    quotient,
    &zero,
  )?;

  let product = quotient.mul(cs.namespace(|| "quotient * divisor"), divisor)?;
  let recomposed = add(cs.namespace(|| "product + remainder"), &product, remainder)?;
  assert_equal_if(
    cs.namespace(|| "division identity"),
    &divisor_nonzero,
    &recomposed,
    dividend,
  )?;

  assert_less_if(
    cs.namespace(|| "remainder < divisor"),
    &divisor_nonzero,
    remainder,
    divisor,
    DIVISOR_BITS,
  )?;

  let bound = alloc_constant(
    cs.namespace(|| "quotient bound"),
    pow2::<Scalar>(QUOTIENT_BITS),
  )?;
  assert_less_if(
    cs.namespace(|| "quotient < bound"),
    &divisor_nonzero,
    quotient,
    &bound,
    QUOTIENT_BITS as usize + 1,
  )
}

/// Returns `floor(dividend / divisor)`, or 0 when `divisor` is 0.
///
/// Hint failures (a divisor of 2^64 or more) abort synthesis. A quotient of
/// 2^160 or more is accepted here and leaves the system unsatisfied.
pub fn floor_div<Scalar, CS>(
  mut cs: CS,
  dividend: &AllocatedNum<Scalar>,
  divisor: &AllocatedNum<Scalar>,
) -> Result<AllocatedNum<Scalar>, GadgetError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  let outputs = solve::<_, _, IntegerDivision>(cs.namespace(|| "hint"), &[dividend, divisor])?;
  let [quotient, remainder] = <[_; 2]>::try_from(outputs).map_err(|outputs: Vec<_>| {
    HintError::InvalidArity {
      hint: IntegerDivision::NAME,
      expected: IntegerDivision::NUM_OUTPUTS,
      actual: outputs.len(),
    }
  })?;
  bind_floor_div(
    cs.namespace(|| "bind"),
    dividend,
    divisor,
    &quotient,
    &remainder,
  )?;
  Ok(quotient)
}
