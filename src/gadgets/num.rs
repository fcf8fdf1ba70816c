// SPDX-License-Identifier: MIT
// This file is part of the zkbench-gadgets project.
// See the LICENSE file in the project root for full license information.

//! Field-element primitives on top of bellpepper's `AllocatedNum`.
//!
//! Bellpepper only ships booleans and raw numbers; the selection, zero test,
//! bounded decomposition and comparison operations the gadgets in this crate
//! are written against live here.
//!
//! | Operation | Constraints |
//! |-----------|-------------|
//! | `alloc_constant()` | 1 |
//! | `add()` | 1 |
//! | `is_zero()` | 2 |
//! | `select()` | 1 |
//! | `assert_equal()` | 1 |
//! | `assert_nonzero()` | 1 |
//! | `to_bits_le()` | n + 1 |
//! | `from_bits_le()` | 1 |
//! | `assert_less_than()` | 3n + 3 |

use bellpepper::gadgets::Assignment;
use bellpepper_core::{
  ConstraintSystem, Index, LinearCombination, SynthesisError, Variable,
  boolean::{AllocatedBit, Boolean},
  num::{AllocatedNum, Num},
};
use ff::{PrimeField, PrimeFieldBits};
use num_bigint::{BigInt, Sign};

/// Little-endian bits of a field element.
pub(crate) fn le_bits<Scalar: PrimeFieldBits>(value: &Scalar) -> Vec<bool> {
  value.to_le_bits().iter().map(|b| *b).collect()
}

/// `2^n` as a field element.
pub fn pow2<Scalar: PrimeField>(n: u64) -> Scalar {
  Scalar::from(2u64).pow_vartime([n])
}

/// Interprets a field element as a non-negative integer.
pub fn scalar_to_bigint<Scalar: PrimeFieldBits>(value: &Scalar) -> BigInt {
  let bytes = le_bits(value)
    .chunks(8)
    .map(|chunk| {
      chunk
        .iter()
        .rev()
        .fold(0u8, |acc, bit| (acc << 1) | (*bit as u8))
    })
    .collect::<Vec<u8>>();
  BigInt::from_bytes_le(Sign::Plus, &bytes)
}

/// Maps a non-negative integer into the field, reducing modulo the characteristic.
/// Returns `None` for negative integers.
pub fn bigint_to_scalar<Scalar: PrimeField>(value: &BigInt) -> Option<Scalar> {
  if value.sign() == Sign::Minus {
    return None;
  }
  Scalar::from_str_vartime(&value.to_str_radix(10))
}

/// A constant as a `Num`, for arguments that take either a variable or a constant.
pub fn constant_num<Scalar: PrimeField>(value: Scalar) -> Num<Scalar> {
  let one = Variable::new_unchecked(Index::Input(0));
  Num::zero().add_bool_with_coeff(one, &Boolean::Constant(true), value)
}

/// Allocates `value` and pins it with `x * 1 = value`.
pub fn alloc_constant<Scalar, CS>(
  mut cs: CS,
  value: Scalar,
) -> Result<AllocatedNum<Scalar>, SynthesisError>
where
  Scalar: PrimeField,
  CS: ConstraintSystem<Scalar>,
{
  let x = AllocatedNum::alloc(cs.namespace(|| "value"), || Ok(value))?;
  cs.enforce(
    || "constant",
    |lc| lc + x.get_variable(),
    |lc| lc + CS::one(),
    |lc| lc + (value, CS::one()),
  );
  Ok(x)
}

/// Returns `a + b`.
pub fn add<Scalar, CS>(
  mut cs: CS,
  a: &AllocatedNum<Scalar>,
  b: &AllocatedNum<Scalar>,
) -> Result<AllocatedNum<Scalar>, SynthesisError>
where
  Scalar: PrimeField,
  CS: ConstraintSystem<Scalar>,
{
  let sum = AllocatedNum::alloc(cs.namespace(|| "sum"), || {
    Ok(*a.get_value().get()? + b.get_value().get()?)
  })?;
  cs.enforce(
    || "a + b = sum",
    |lc| lc + a.get_variable() + b.get_variable(),
    |lc| lc + CS::one(),
    |lc| lc + sum.get_variable(),
  );
  Ok(sum)
}

/// Returns 1 if `x` is zero and 0 otherwise.
///
/// Constraints: `x * inv = 1 - out` and `x * out = 0`.
pub fn is_zero<Scalar, CS>(
  mut cs: CS,
  x: &AllocatedNum<Scalar>,
) -> Result<AllocatedNum<Scalar>, SynthesisError>
where
  Scalar: PrimeField,
  CS: ConstraintSystem<Scalar>,
{
  let inv = AllocatedNum::alloc(cs.namespace(|| "inv"), || {
    let x = x.get_value().ok_or(SynthesisError::AssignmentMissing)?;
    Ok(x.invert().unwrap_or(Scalar::ZERO))
  })?;
  let out = AllocatedNum::alloc(cs.namespace(|| "out"), || {
    let x = x.get_value().ok_or(SynthesisError::AssignmentMissing)?;
    Ok(if x.is_zero_vartime() {
      Scalar::ONE
    } else {
      Scalar::ZERO
    })
  })?;

  cs.enforce(
    || "x * inv = 1 - out",
    |lc| lc + x.get_variable(),
    |lc| lc + inv.get_variable(),
    |lc| lc + CS::one() - out.get_variable(),
  );
  cs.enforce(
    || "x * out = 0",
    |lc| lc + x.get_variable(),
    |lc| lc + out.get_variable(),
    |lc| lc,
  );

  Ok(out)
}

/// Returns `a` if `cond` is 1 and `b` if `cond` is 0.
///
/// `cond` must already be constrained to a bit.
pub fn select<Scalar, CS>(
  mut cs: CS,
  cond: &AllocatedNum<Scalar>,
  a: &AllocatedNum<Scalar>,
  b: &AllocatedNum<Scalar>,
) -> Result<AllocatedNum<Scalar>, SynthesisError>
where
  Scalar: PrimeField,
  CS: ConstraintSystem<Scalar>,
{
  let out = AllocatedNum::alloc(cs.namespace(|| "out"), || {
    if cond.get_value().get()?.is_zero_vartime() {
      b.get_value().get().copied()
    } else {
      a.get_value().get().copied()
    }
  })?;

  // cond * (a - b) = out - b
  cs.enforce(
    || "select",
    |lc| lc + cond.get_variable(),
    |lc| lc + a.get_variable() - b.get_variable(),
    |lc| lc + out.get_variable() - b.get_variable(),
  );

  Ok(out)
}

/// Enforces `a = b`.
pub fn assert_equal<Scalar, CS>(mut cs: CS, a: &AllocatedNum<Scalar>, b: &AllocatedNum<Scalar>)
where
  Scalar: PrimeField,
  CS: ConstraintSystem<Scalar>,
{
  cs.enforce(
    || "a = b",
    |lc| lc + a.get_variable(),
    |lc| lc + CS::one(),
    |lc| lc + b.get_variable(),
  );
}

/// Enforces `x != 0` by exhibiting an inverse.
///
/// A zero `x` yields an unsatisfied constraint rather than a synthesis error.
pub fn assert_nonzero<Scalar, CS>(
  mut cs: CS,
  x: &AllocatedNum<Scalar>,
) -> Result<(), SynthesisError>
where
  Scalar: PrimeField,
  CS: ConstraintSystem<Scalar>,
{
  let inv = AllocatedNum::alloc(cs.namespace(|| "inv"), || {
    let x = x.get_value().ok_or(SynthesisError::AssignmentMissing)?;
    Ok(x.invert().unwrap_or(Scalar::ZERO))
  })?;
  cs.enforce(
    || "x * inv = 1",
    |lc| lc + x.get_variable(),
    |lc| lc + inv.get_variable(),
    |lc| lc + CS::one(),
  );
  Ok(())
}

/// Decomposes the value of `lc` into `num_bits` little-endian bits.
///
/// Every bit is boolean-constrained and one constraint ties their weighted sum
/// back to `lc`, so the system is unsatisfiable if `value >= 2^num_bits`.
/// Fails with `SynthesisError::Unsatisfiable` if `num_bits` exceeds the field
/// capacity.
pub(crate) fn lc_to_bits_le<Scalar, CS>(
  mut cs: CS,
  lc: LinearCombination<Scalar>,
  value: Option<Scalar>,
  num_bits: usize,
) -> Result<Vec<Boolean>, SynthesisError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  // The recomposition must not wrap the field.
  if num_bits > Scalar::CAPACITY as usize {
    return Err(SynthesisError::Unsatisfiable);
  }

  let values = match value {
    Some(v) => le_bits(&v).into_iter().take(num_bits).map(Some).collect(),
    None => vec![None; num_bits],
  };

  let mut weighted = LinearCombination::zero();
  let mut coeff = Scalar::ONE;
  let mut bits = Vec::with_capacity(num_bits);
  for (i, b) in values.into_iter().enumerate() {
    let bit = AllocatedBit::alloc(cs.namespace(|| format!("bit {i}")), b)?;
    weighted = weighted + (coeff, bit.get_variable());
    bits.push(Boolean::from(bit));
    coeff = coeff.double();
  }

  cs.enforce(
    || "recompose",
    |_| weighted,
    |lc| lc + CS::one(),
    |_| lc,
  );

  Ok(bits)
}

/// Decomposes `x` into `num_bits` little-endian bits (a range check on `x`).
pub fn to_bits_le<Scalar, CS>(
  cs: CS,
  x: &AllocatedNum<Scalar>,
  num_bits: usize,
) -> Result<Vec<Boolean>, SynthesisError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  lc_to_bits_le(
    cs,
    LinearCombination::zero() + x.get_variable(),
    x.get_value(),
    num_bits,
  )
}

/// Recomposes little-endian bits into a single field element.
pub fn from_bits_le<Scalar, CS>(
  mut cs: CS,
  bits: &[Boolean],
) -> Result<AllocatedNum<Scalar>, SynthesisError>
where
  Scalar: PrimeField,
  CS: ConstraintSystem<Scalar>,
{
  let mut weighted = LinearCombination::zero();
  let mut value = Some(Scalar::ZERO);
  let mut coeff = Scalar::ONE;
  for bit in bits {
    weighted = weighted + &bit.lc(CS::one(), coeff);
    value = value.and_then(|v| bit.get_value().map(|b| if b { v + coeff } else { v }));
    coeff = coeff.double();
  }

  let num = AllocatedNum::alloc(cs.namespace(|| "num"), || {
    value.ok_or(SynthesisError::AssignmentMissing)
  })?;
  cs.enforce(
    || "pack",
    |_| weighted,
    |lc| lc + CS::one(),
    |lc| lc + num.get_variable(),
  );

  Ok(num)
}

/// Enforces `b - a - offset` lies in `[0, 2^num_bits)`.
fn enforce_gap<Scalar, CS>(
  cs: CS,
  a: &AllocatedNum<Scalar>,
  b: &AllocatedNum<Scalar>,
  offset: u64,
  num_bits: usize,
) -> Result<(), SynthesisError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  let offset = Scalar::from(offset);
  let gap = LinearCombination::zero() + b.get_variable() - a.get_variable() - (offset, CS::one());
  let value = a
    .get_value()
    .and_then(|a| b.get_value().map(|b| b - a - offset));
  lc_to_bits_le(cs, gap, value, num_bits)?;
  Ok(())
}

/// Enforces `a < b` for operands that must both fit in `num_bits` bits.
///
/// Both operands are range checked; `b - a - 1` is then decomposed into
/// `num_bits` bits, which only succeeds when it did not wrap around the field.
pub fn assert_less_than<Scalar, CS>(
  mut cs: CS,
  a: &AllocatedNum<Scalar>,
  b: &AllocatedNum<Scalar>,
  num_bits: usize,
) -> Result<(), SynthesisError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  to_bits_le(cs.namespace(|| "a range"), a, num_bits)?;
  to_bits_le(cs.namespace(|| "b range"), b, num_bits)?;
  enforce_gap(cs.namespace(|| "b - a - 1"), a, b, 1, num_bits)
}

/// Enforces `a <= b` for operands that must both fit in `num_bits` bits.
pub fn assert_less_or_equal<Scalar, CS>(
  mut cs: CS,
  a: &AllocatedNum<Scalar>,
  b: &AllocatedNum<Scalar>,
  num_bits: usize,
) -> Result<(), SynthesisError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  to_bits_le(cs.namespace(|| "a range"), a, num_bits)?;
  to_bits_le(cs.namespace(|| "b range"), b, num_bits)?;
  enforce_gap(cs.namespace(|| "b - a"), a, b, 0, num_bits)
}

#[cfg(test)]
mod tests {
  use super::*;
  use bellpepper_core::test_cs::TestConstraintSystem;
  use ff::Field;
  use halo2curves::bn256::Fr;

  fn alloc(cs: &mut TestConstraintSystem<Fr>, name: &str, v: u64) -> AllocatedNum<Fr> {
    AllocatedNum::alloc(cs.namespace(|| name), || Ok(Fr::from(v))).unwrap()
  }

  #[test]
  fn test_bigint_round_trip() {
    let v = pow2::<Fr>(200) + Fr::from(12345);
    let n = scalar_to_bigint(&v);
    assert_eq!(n, (BigInt::from(1) << 200) + BigInt::from(12345));
    assert_eq!(bigint_to_scalar::<Fr>(&n), Some(v));
    assert_eq!(bigint_to_scalar::<Fr>(&BigInt::from(-1)), None);
  }

  #[test]
  fn test_constant_num() {
    let n = constant_num(Fr::from(42));
    assert_eq!(n.get_value(), Some(Fr::from(42)));
  }

  #[test]
  fn test_is_zero() {
    for (v, expected) in [(0u64, Fr::ONE), (7, Fr::ZERO)] {
      let mut cs = TestConstraintSystem::<Fr>::new();
      let x = alloc(&mut cs, "x", v);
      let out = is_zero(cs.namespace(|| "is_zero"), &x).unwrap();
      assert_eq!(out.get_value(), Some(expected));
      assert!(cs.is_satisfied());
      assert_eq!(cs.num_constraints(), 2);
    }
  }

  #[test]
  fn test_is_zero_rejects_wrong_output() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let x = alloc(&mut cs, "x", 5);
    is_zero(cs.namespace(|| "is_zero"), &x).unwrap();
    cs.set("is_zero/out/num", Fr::ONE);
    assert!(!cs.is_satisfied());
  }

  #[test]
  fn test_select() {
    for (c, expected) in [(1u64, 10u64), (0, 20)] {
      let mut cs = TestConstraintSystem::<Fr>::new();
      let cond = alloc(&mut cs, "cond", c);
      let a = alloc(&mut cs, "a", 10);
      let b = alloc(&mut cs, "b", 20);
      let out = select(cs.namespace(|| "select"), &cond, &a, &b).unwrap();
      assert_eq!(out.get_value(), Some(Fr::from(expected)));
      assert!(cs.is_satisfied());
    }
  }

  #[test]
  fn test_to_bits_le_range() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let x = alloc(&mut cs, "x", 0b1011);
    let bits = to_bits_le(cs.namespace(|| "bits"), &x, 4).unwrap();
    let values: Vec<bool> = bits.iter().map(|b| b.get_value().unwrap()).collect();
    assert_eq!(values, vec![true, true, false, true]);
    assert!(cs.is_satisfied());

    let mut cs = TestConstraintSystem::<Fr>::new();
    let x = alloc(&mut cs, "x", 16);
    to_bits_le(cs.namespace(|| "bits"), &x, 4).unwrap();
    assert!(!cs.is_satisfied());
  }

  #[test]
  fn test_to_bits_le_beyond_capacity_is_error() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let x = alloc(&mut cs, "x", 1);
    let full = to_bits_le(cs.namespace(|| "full"), &x, Fr::CAPACITY as usize).unwrap();
    assert_eq!(full.len(), 253);
    assert!(matches!(
      to_bits_le(cs.namespace(|| "wide"), &x, Fr::CAPACITY as usize + 1),
      Err(SynthesisError::Unsatisfiable)
    ));
    assert!(cs.is_satisfied());
  }

  #[test]
  fn test_from_bits_le() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let bits = [true, false, true, true].map(Boolean::constant);
    let num = from_bits_le(cs.namespace(|| "num"), &bits).unwrap();
    assert_eq!(num.get_value(), Some(Fr::from(13)));
    assert!(cs.is_satisfied());
  }

  #[test]
  fn test_assert_less_than() {
    let cases = [(3u64, 4u64, true), (4, 4, false), (5, 4, false), (0, 1, true)];
    for (a, b, ok) in cases {
      let mut cs = TestConstraintSystem::<Fr>::new();
      let a = alloc(&mut cs, "a", a);
      let b = alloc(&mut cs, "b", b);
      assert_less_than(cs.namespace(|| "lt"), &a, &b, 8).unwrap();
      assert_eq!(cs.is_satisfied(), ok);
    }
  }

  #[test]
  fn test_assert_less_or_equal() {
    let cases = [(3u64, 4u64, true), (4, 4, true), (5, 4, false)];
    for (a, b, ok) in cases {
      let mut cs = TestConstraintSystem::<Fr>::new();
      let a = alloc(&mut cs, "a", a);
      let b = alloc(&mut cs, "b", b);
      assert_less_or_equal(cs.namespace(|| "le"), &a, &b, 8).unwrap();
      assert_eq!(cs.is_satisfied(), ok);
    }
  }

  #[test]
  fn test_assert_nonzero() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let x = alloc(&mut cs, "x", 0);
    assert_nonzero(cs.namespace(|| "nz"), &x).unwrap();
    assert!(!cs.is_satisfied());
  }
}
