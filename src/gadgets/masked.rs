// SPDX-License-Identifier: MIT
// This file is part of the zkbench-gadgets project.
// See the LICENSE file in the project root for full license information.

//! Assertions that only bind when an `enabled` bit is set.
//!
//! Each operand is first passed through [`select`] so that a disabled
//! assertion compares fixed constants that trivially satisfy it (`0 = 0`,
//! `0 != 1`, `0 < 1`, `0 <= 0`). The constraints are emitted either way; only
//! their satisfiability depends on `enabled`.

use super::num::{alloc_constant, assert_equal, assert_less_or_equal, assert_less_than, assert_nonzero, select};
use bellpepper::gadgets::Assignment;
use bellpepper_core::{ConstraintSystem, SynthesisError, num::AllocatedNum};
use ff::{PrimeField, PrimeFieldBits};

fn mask<Scalar, CS>(
  mut cs: CS,
  enabled: &AllocatedNum<Scalar>,
  a: &AllocatedNum<Scalar>,
  b: &AllocatedNum<Scalar>,
  a_default: u64,
  b_default: u64,
) -> Result<(AllocatedNum<Scalar>, AllocatedNum<Scalar>), SynthesisError>
where
  Scalar: PrimeField,
  CS: ConstraintSystem<Scalar>,
{
  let a_default = alloc_constant(cs.namespace(|| "a default"), Scalar::from(a_default))?;
  let b_default = alloc_constant(cs.namespace(|| "b default"), Scalar::from(b_default))?;
  let a = select(cs.namespace(|| "a"), enabled, a, &a_default)?;
  let b = select(cs.namespace(|| "b"), enabled, b, &b_default)?;
  Ok((a, b))
}

/// Enforces `a = b` when `enabled` is 1.
pub fn assert_equal_if<Scalar, CS>(
  mut cs: CS,
  enabled: &AllocatedNum<Scalar>,
  a: &AllocatedNum<Scalar>,
  b: &AllocatedNum<Scalar>,
) -> Result<(), SynthesisError>
where
  Scalar: PrimeField,
  CS: ConstraintSystem<Scalar>,
{
  let (a, b) = mask(cs.namespace(|| "mask"), enabled, a, b, 0, 0)?;
  assert_equal(cs.namespace(|| "eq"), &a, &b);
  Ok(())
}

/// Enforces `a != b` when `enabled` is 1.
pub fn assert_different_if<Scalar, CS>(
  mut cs: CS,
  enabled: &AllocatedNum<Scalar>,
  a: &AllocatedNum<Scalar>,
  b: &AllocatedNum<Scalar>,
) -> Result<(), SynthesisError>
where
  Scalar: PrimeField,
  CS: ConstraintSystem<Scalar>,
{
  let (a, b) = mask(cs.namespace(|| "mask"), enabled, a, b, 0, 1)?;
  let diff = AllocatedNum::alloc(cs.namespace(|| "diff"), || {
    Ok(*a.get_value().get()? - b.get_value().get()?)
  })?;
  cs.enforce(
    || "diff = a - b",
    |lc| lc + a.get_variable() - b.get_variable(),
    |lc| lc + CS::one(),
    |lc| lc + diff.get_variable(),
  );
  assert_nonzero(cs.namespace(|| "ne"), &diff)
}

/// Enforces `a < b` over `num_bits`-bit operands when `enabled` is 1.
pub fn assert_less_if<Scalar, CS>(
  mut cs: CS,
  enabled: &AllocatedNum<Scalar>,
  a: &AllocatedNum<Scalar>,
  b: &AllocatedNum<Scalar>,
  num_bits: usize,
) -> Result<(), SynthesisError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  let (a, b) = mask(cs.namespace(|| "mask"), enabled, a, b, 0, 1)?;
  assert_less_than(cs.namespace(|| "lt"), &a, &b, num_bits)
}

/// Enforces `a <= b` over `num_bits`-bit operands when `enabled` is 1.
pub fn assert_less_or_equal_if<Scalar, CS>(
  mut cs: CS,
  enabled: &AllocatedNum<Scalar>,
  a: &AllocatedNum<Scalar>,
  b: &AllocatedNum<Scalar>,
  num_bits: usize,
) -> Result<(), SynthesisError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  let (a, b) = mask(cs.namespace(|| "mask"), enabled, a, b, 0, 0)?;
  assert_less_or_equal(cs.namespace(|| "le"), &a, &b, num_bits)
}
