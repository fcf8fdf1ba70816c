// SPDX-License-Identifier: MIT
// This file is part of the zkbench-gadgets project.
// See the LICENSE file in the project root for full license information.

//! Comparisons of values whose difference is bounded by `2^bits`.

use super::num::{lc_to_bits_le, pow2, to_bits_le};
use bellpepper_core::{
  ConstraintSystem, LinearCombination, SynthesisError, boolean::Boolean, num::AllocatedNum,
};
use ff::PrimeFieldBits;

/// Compares operands whose absolute difference is below `2^bits`.
///
/// Operands outside that bound leave the system unsatisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundedComparator {
  bits: usize,
}

impl BoundedComparator {
  /// A comparator for differences below `2^bits`.
  pub fn new(bits: usize) -> Self {
    BoundedComparator { bits }
  }

  /// Bit width of the bound.
  pub fn bits(&self) -> usize {
    self.bits
  }

  /// Returns `a < b`.
  ///
  /// `2^bits + a - b` is decomposed into `bits + 1` bits; its top bit is set
  /// exactly when `a >= b`.
  pub fn is_less<Scalar, CS>(
    &self,
    cs: CS,
    a: &AllocatedNum<Scalar>,
    b: &AllocatedNum<Scalar>,
  ) -> Result<Boolean, SynthesisError>
  where
    Scalar: PrimeFieldBits,
    CS: ConstraintSystem<Scalar>,
  {
    let shift = pow2::<Scalar>(self.bits as u64);
    let diff = LinearCombination::zero() + (shift, CS::one()) + a.get_variable() - b.get_variable();
    let value = a.get_value().and_then(|a| b.get_value().map(|b| shift + a - b));
    let bits = lc_to_bits_le(cs, diff, value, self.bits + 1)?;
    Ok(bits[self.bits].not())
  }

  /// Enforces `a < b`.
  pub fn assert_is_less<Scalar, CS>(
    &self,
    cs: CS,
    a: &AllocatedNum<Scalar>,
    b: &AllocatedNum<Scalar>,
  ) -> Result<(), SynthesisError>
  where
    Scalar: PrimeFieldBits,
    CS: ConstraintSystem<Scalar>,
  {
    let gap = LinearCombination::zero() + b.get_variable() - a.get_variable() - CS::one();
    let value = a
      .get_value()
      .and_then(|a| b.get_value().map(|b| b - a - Scalar::ONE));
    lc_to_bits_le(cs, gap, value, self.bits)?;
    Ok(())
  }
}

/// Enforces `x < 2^bits`.
pub fn range_check<Scalar, CS>(
  cs: CS,
  x: &AllocatedNum<Scalar>,
  bits: usize,
) -> Result<(), SynthesisError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  to_bits_le(cs, x, bits)?;
  Ok(())
}
