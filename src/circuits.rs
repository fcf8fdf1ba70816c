// SPDX-License-Identifier: MIT
// This file is part of the zkbench-gadgets project.
// See the LICENSE file in the project root for full license information.

//! Benchmark circuits.
//!
//! Each circuit repeats a fixed mix of gadget calls on two private inputs `x`
//! and `y`, with `y < x < 2^160`. The repetition counts are public fields so
//! the same circuit can be built at full or reduced scale.
//!
//! | Circuit | Mix |
//! |---------|-----|
//! | [`PreBlock`] | comparisons, floor divisions, 160-bit range checks |
//! | [`TxLoop`] | comparisons, range checks, floor divisions, bit decompositions |
//! | [`VerifyBlock`] | two SHA-256 of 242 bytes, bit decompositions, comparisons, floor divisions |

use crate::{
  errors::GadgetError,
  gadgets::{
    BoundedComparator, QUOTIENT_BITS, floor_div,
    num::{assert_equal, constant_num, from_bits_le, pow2, to_bits_le},
    range_check, sha256,
  },
};
use bellpepper_core::{ConstraintSystem, boolean::Boolean, num::AllocatedNum};
use ff::{PrimeField, PrimeFieldBits};

/// Bound of the comparator and the range checks, in bits.
pub const BOUND_BITS: usize = QUOTIENT_BITS as usize;

/// Number of bytes hashed by [`VerifyBlock`].
pub const HASHED_BYTES: usize = 242;

/// A circuit the benchmark driver can compile and solve.
pub trait BenchCircuit<Scalar: PrimeFieldBits> {
  /// Name used in logs and reports.
  fn name(&self) -> &'static str;

  /// Emits the circuit's variables and constraints into `cs`.
  fn synthesize<CS: ConstraintSystem<Scalar>>(&self, cs: &mut CS) -> Result<(), GadgetError>;
}

/// The inputs every benchmark runs on: `x = 2^160 - 1` and `y = 2^60 - 1`.
pub fn bench_inputs<Scalar: PrimeField>() -> (Scalar, Scalar) {
  let x = pow2::<Scalar>(BOUND_BITS as u64) - Scalar::ONE;
  let y = Scalar::from(0xFFFFFFFFFFFFFFF);
  (x, y)
}

fn alloc_inputs<Scalar, CS>(
  cs: &mut CS,
  x: Scalar,
  y: Scalar,
) -> Result<(AllocatedNum<Scalar>, AllocatedNum<Scalar>), GadgetError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  let x = AllocatedNum::alloc(cs.namespace(|| "x"), || Ok(x))?;
  let y = AllocatedNum::alloc(cs.namespace(|| "y"), || Ok(y))?;
  Ok((x, y))
}

/// `is_less(y, x)` asserted true, `count` times.
fn comparisons<Scalar, CS>(
  cs: &mut CS,
  x: &AllocatedNum<Scalar>,
  y: &AllocatedNum<Scalar>,
  count: usize,
) -> Result<(), GadgetError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  let cmp = BoundedComparator::new(BOUND_BITS);
  for i in 0..count {
    let lt = cmp.is_less(cs.namespace(|| format!("is_less {i}")), y, x)?;
    Boolean::enforce_equal(
      cs.namespace(|| format!("is_less {i} holds")),
      &lt,
      &Boolean::constant(true),
    )?;
  }
  Ok(())
}

fn asserted_comparisons<Scalar, CS>(
  cs: &mut CS,
  x: &AllocatedNum<Scalar>,
  y: &AllocatedNum<Scalar>,
  count: usize,
) -> Result<(), GadgetError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  let cmp = BoundedComparator::new(BOUND_BITS);
  for i in 0..count {
    cmp.assert_is_less(cs.namespace(|| format!("assert_is_less {i}")), y, x)?;
  }
  Ok(())
}

fn divisions<Scalar, CS>(
  cs: &mut CS,
  x: &AllocatedNum<Scalar>,
  y: &AllocatedNum<Scalar>,
  count: usize,
) -> Result<(), GadgetError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  for i in 0..count {
    floor_div(cs.namespace(|| format!("floor_div {i}")), x, y)?;
  }
  Ok(())
}

fn range_checks<Scalar, CS>(
  cs: &mut CS,
  x: &AllocatedNum<Scalar>,
  count: usize,
) -> Result<(), GadgetError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  for i in 0..count {
    range_check(cs.namespace(|| format!("range_check {i}")), x, BOUND_BITS)?;
  }
  Ok(())
}

/// Decomposes `x` into `Scalar::CAPACITY` bits `decompositions` times, then
/// recomposes the last decomposition and asserts it equals `x`
/// `recompositions` times.
///
/// `bits` seeds the recomposition. When it is empty and nothing is
/// decomposed, `x` is still decomposed once so the recomposition has bits.
fn bit_round_trips<Scalar, CS>(
  cs: &mut CS,
  x: &AllocatedNum<Scalar>,
  mut bits: Vec<Boolean>,
  decompositions: usize,
  recompositions: usize,
) -> Result<(), GadgetError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  let needed = usize::from(bits.is_empty() && recompositions > 0);
  for i in 0..decompositions.max(needed) {
    bits = to_bits_le(
      cs.namespace(|| format!("to_binary {i}")),
      x,
      Scalar::CAPACITY as usize,
    )?;
  }
  for i in 0..recompositions {
    let packed = from_bits_le(cs.namespace(|| format!("from_binary {i}")), &bits)?;
    assert_equal(cs.namespace(|| format!("from_binary {i} matches")), x, &packed);
  }
  Ok(())
}

/// Comparison-heavy circuit.
#[derive(Clone, Debug)]
pub struct PreBlock<Scalar: PrimeField> {
  /// Dividend and larger operand
  pub x: Scalar,
  /// Divisor and smaller operand
  pub y: Scalar,
  /// `is_less(y, x)` calls
  pub is_less: usize,
  /// `assert_is_less(y, x)` calls
  pub assert_is_less: usize,
  /// `floor_div(x, y)` calls
  pub floor_div: usize,
  /// 160-bit range checks of `x`
  pub range_checks: usize,
}

impl<Scalar: PrimeField> PreBlock<Scalar> {
  /// Full-scale circuit over `x` and `y`.
  pub fn new(x: Scalar, y: Scalar) -> Self {
    PreBlock {
      x,
      y,
      is_less: 1280,
      assert_is_less: 1024,
      floor_div: 256,
      range_checks: 256,
    }
  }
}

impl<Scalar: PrimeFieldBits> BenchCircuit<Scalar> for PreBlock<Scalar> {
  fn name(&self) -> &'static str {
    "pre-block"
  }

  fn synthesize<CS: ConstraintSystem<Scalar>>(&self, cs: &mut CS) -> Result<(), GadgetError> {
    let (x, y) = alloc_inputs(cs, self.x, self.y)?;
    comparisons(cs, &x, &y, self.is_less)?;
    asserted_comparisons(cs, &x, &y, self.assert_is_less)?;
    divisions(cs, &x, &y, self.floor_div)?;
    range_checks(cs, &x, self.range_checks)
  }
}

/// Transaction loop circuit, without its hash and signature parts.
#[derive(Clone, Debug)]
pub struct TxLoop<Scalar: PrimeField> {
  /// Dividend and larger operand
  pub x: Scalar,
  /// Divisor and smaller operand
  pub y: Scalar,
  /// `is_less(y, x)` calls
  pub is_less: usize,
  /// `assert_is_less(y, x)` calls
  pub assert_is_less: usize,
  /// 160-bit range checks of `x`
  pub range_checks: usize,
  /// `floor_div(x, y)` calls
  pub floor_div: usize,
  /// Full bit decompositions of `x`
  pub decompositions: usize,
  /// Recompositions asserted equal to `x`
  pub recompositions: usize,
}

impl<Scalar: PrimeField> TxLoop<Scalar> {
  /// Full-scale circuit over `x` and `y`.
  pub fn new(x: Scalar, y: Scalar) -> Self {
    TxLoop {
      x,
      y,
      is_less: 49,
      assert_is_less: 19,
      range_checks: 6,
      floor_div: 13,
      decompositions: 65,
      recompositions: 236,
    }
  }
}

impl<Scalar: PrimeFieldBits> BenchCircuit<Scalar> for TxLoop<Scalar> {
  fn name(&self) -> &'static str {
    "tx-loop"
  }

  fn synthesize<CS: ConstraintSystem<Scalar>>(&self, cs: &mut CS) -> Result<(), GadgetError> {
    let (x, y) = alloc_inputs(cs, self.x, self.y)?;
    comparisons(cs, &x, &y, self.is_less)?;
    asserted_comparisons(cs, &x, &y, self.assert_is_less)?;
    range_checks(cs, &x, self.range_checks)?;
    divisions(cs, &x, &y, self.floor_div)?;
    bit_round_trips(cs, &x, vec![], self.decompositions, self.recompositions)
  }
}

/// Block verification circuit, without its MiMC part.
#[derive(Clone, Debug)]
pub struct VerifyBlock<Scalar: PrimeField> {
  /// Dividend and larger operand
  pub x: Scalar,
  /// Divisor and smaller operand
  pub y: Scalar,
  /// SHA-256 invocations over the bits of `x`
  pub hashes: usize,
  /// Full bit decompositions of `x`
  pub decompositions: usize,
  /// Recompositions asserted equal to `x`
  pub recompositions: usize,
  /// `is_less(y, x)` calls
  pub is_less: usize,
  /// `assert_is_less(y, x)` calls
  pub assert_is_less: usize,
  /// `floor_div(x, y)` calls
  pub floor_div: usize,
}

impl<Scalar: PrimeField> VerifyBlock<Scalar> {
  /// Full-scale circuit over `x` and `y`.
  pub fn new(x: Scalar, y: Scalar) -> Self {
    VerifyBlock {
      x,
      y,
      hashes: 2,
      decompositions: 84,
      recompositions: 484,
      is_less: 3,
      assert_is_less: 1,
      floor_div: 13,
    }
  }
}

impl<Scalar: PrimeFieldBits> BenchCircuit<Scalar> for VerifyBlock<Scalar> {
  fn name(&self) -> &'static str {
    "verify-block"
  }

  fn synthesize<CS: ConstraintSystem<Scalar>>(&self, cs: &mut CS) -> Result<(), GadgetError> {
    let (x, y) = alloc_inputs(cs, self.x, self.y)?;

    let x_bits = to_bits_le(cs.namespace(|| "x bits"), &x, Scalar::CAPACITY as usize)?;
    let packed = from_bits_le(cs.namespace(|| "x packed"), &x_bits)?;
    assert_equal(cs.namespace(|| "x packed matches"), &x, &packed);

    // The message is the bits of x, one per byte, padded with zero bytes.
    let message = (0..HASHED_BYTES)
      .map(|i| {
        let bit = x_bits.get(i).cloned().unwrap_or(Boolean::constant(false));
        from_bits_le(cs.namespace(|| format!("message byte {i}")), &[bit])
      })
      .collect::<Result<Vec<_>, _>>()?;
    let ignore = constant_num(Scalar::ZERO);
    for i in 0..self.hashes {
      sha256(cs.namespace(|| format!("commitment {i}")), &ignore, &message)?;
    }

    bit_round_trips(cs, &x, x_bits, self.decompositions, self.recompositions)?;
    comparisons(cs, &x, &y, self.is_less)?;
    asserted_comparisons(cs, &x, &y, self.assert_is_less)?;
    divisions(cs, &x, &y, self.floor_div)
  }
}
