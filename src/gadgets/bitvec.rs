// SPDX-License-Identifier: MIT
// This file is part of the zkbench-gadgets project.
// See the LICENSE file in the project root for full license information.

//! Fixed-width unsigned integers as vectors of constrained bits.
//!
//! [`BitVec<W>`] carries its width in the type, so an 8-bit [`Byte`] can never
//! be passed where a 32-bit [`Word`] is expected. Bits are stored
//! least-significant first. Every bit is either a constant or an
//! `AllocatedBit`, which is boolean-constrained when it is allocated.
//!
//! # Operations
//!
//! | Operation | Constraints |
//! |-----------|-------------|
//! | `constant()` | None |
//! | `from_num()` | W booleanity + 1 recomposition |
//! | `to_num()` | 1 recomposition |
//! | `from_bytes_be()` / `to_bytes_be()` | None - just reorders bits |
//! | `rotr()` / `shr()` / `not()` | None |
//! | `xor()` / `and()` | Delegates to Boolean |
//! | `sha256_ch()` / `sha256_maj()` | Delegates to Boolean |
//! | `add_many()` | result bits booleanity + 1 |

use super::num::{from_bits_le, lc_to_bits_le};
use bellpepper_core::{
  ConstraintSystem, LinearCombination, SynthesisError,
  boolean::{AllocatedBit, Boolean},
  num::AllocatedNum,
};
use ff::{PrimeField, PrimeFieldBits};

/// An unsigned integer of `W` bits, `W <= 64`.
#[derive(Clone, Debug)]
pub struct BitVec<const W: usize> {
  /// Little-endian bit representation
  bits: [Boolean; W],
  /// Cached value (if known)
  value: Option<u64>,
}

/// An 8-bit byte.
pub type Byte = BitVec<8>;

/// A 32-bit word.
pub type Word = BitVec<32>;

impl<const W: usize> BitVec<W> {
  const MASK: u64 = if W >= 64 { u64::MAX } else { (1u64 << W) - 1 };

  /// Construct a `BitVec` from little-endian bits.
  pub fn from_bits_le(bits: [Boolean; W]) -> Self {
    let value = bits.iter().rev().try_fold(0u64, |acc, bit| {
      bit
        .get_value()
        .map(|b| if b { (acc << 1) | 1 } else { acc << 1 })
    });
    BitVec { bits, value }
  }

  /// Get the bits in little-endian order.
  pub fn bits_le(&self) -> &[Boolean; W] {
    &self.bits
  }

  /// Get the value if known.
  pub fn get_value(&self) -> Option<u64> {
    self.value
  }

  /// Create a constant `BitVec`. Bits of `value` above `W` are dropped.
  pub fn constant(value: u64) -> Self {
    let value = value & Self::MASK;
    BitVec {
      bits: std::array::from_fn(|i| Boolean::constant((value >> i) & 1 == 1)),
      value: Some(value),
    }
  }

  /// Allocate `W` fresh boolean-constrained bits.
  pub fn alloc<Scalar, CS>(mut cs: CS, value: Option<u64>) -> Result<Self, SynthesisError>
  where
    Scalar: PrimeField,
    CS: ConstraintSystem<Scalar>,
  {
    let mut bits = [const { Boolean::Constant(false) }; W];
    for (i, slot) in bits.iter_mut().enumerate() {
      *slot = Boolean::from(AllocatedBit::alloc(
        cs.namespace(|| format!("b{i}")),
        value.map(|v| (v >> i) & 1 == 1),
      )?);
    }
    Ok(BitVec {
      bits,
      value: value.map(|v| v & Self::MASK),
    })
  }

  /// Decompose a packed field element into `W` bits.
  ///
  /// Unsatisfiable when `x >= 2^W`.
  pub fn from_num<Scalar, CS>(cs: CS, x: &AllocatedNum<Scalar>) -> Result<Self, SynthesisError>
  where
    Scalar: PrimeFieldBits,
    CS: ConstraintSystem<Scalar>,
  {
    let bits = lc_to_bits_le(
      cs,
      LinearCombination::zero() + x.get_variable(),
      x.get_value(),
      W,
    )?;
    Ok(Self::from_bit_vec(bits))
  }

  /// Recompose already-boolean bit variables (least significant first) and
  /// decompose the result into a `BitVec`.
  pub fn from_nums<Scalar, CS>(
    mut cs: CS,
    bits: &[AllocatedNum<Scalar>],
  ) -> Result<Self, SynthesisError>
  where
    Scalar: PrimeFieldBits,
    CS: ConstraintSystem<Scalar>,
  {
    let mut lc = LinearCombination::zero();
    let mut value = Some(Scalar::ZERO);
    let mut coeff = Scalar::ONE;
    for bit in bits {
      lc = lc + (coeff, bit.get_variable());
      value = value.and_then(|v| bit.get_value().map(|b| v + b * coeff));
      coeff = coeff.double();
    }
    let bits = lc_to_bits_le(cs.namespace(|| "decompose"), lc, value, W)?;
    Ok(Self::from_bit_vec(bits))
  }

  /// Recompose the bits into one field element.
  pub fn to_num<Scalar, CS>(&self, cs: CS) -> Result<AllocatedNum<Scalar>, SynthesisError>
  where
    Scalar: PrimeField,
    CS: ConstraintSystem<Scalar>,
  {
    from_bits_le(cs, &self.bits)
  }

  /// `Σ coeff·2^i·b_i` as a linear combination.
  pub fn lc<Scalar: PrimeField>(
    &self,
    one: bellpepper_core::Variable,
    coeff: Scalar,
  ) -> LinearCombination<Scalar> {
    let mut lc = LinearCombination::zero();
    let mut coeff = coeff;
    for bit in &self.bits {
      lc = lc + &bit.lc(one, coeff);
      coeff = coeff.double();
    }
    lc
  }

  fn from_bit_vec(bits: Vec<Boolean>) -> Self {
    let mut out = [const { Boolean::Constant(false) }; W];
    for (slot, bit) in out.iter_mut().zip(bits) {
      *slot = bit;
    }
    Self::from_bits_le(out)
  }

  /// Right rotation.
  pub fn rotr(&self, by: usize) -> Self {
    let by = by % W;
    let bits: [Boolean; W] = std::array::from_fn(|i| self.bits[(i + by) % W].clone());

    BitVec {
      bits,
      value: self
        .value
        .map(|v| ((v >> by) | (v << ((W - by) % W))) & Self::MASK),
    }
  }

  /// Right shift.
  pub fn shr(&self, by: usize) -> Self {
    let bits: [Boolean; W] = std::array::from_fn(|i| {
      if i + by < W {
        self.bits[i + by].clone()
      } else {
        Boolean::constant(false)
      }
    });

    BitVec {
      bits,
      value: self.value.map(|v| if by >= W { 0 } else { v >> by }),
    }
  }

  /// Bitwise NOT.
  pub fn not(&self) -> Self {
    BitVec {
      bits: std::array::from_fn(|i| self.bits[i].not()),
      value: self.value.map(|v| !v & Self::MASK),
    }
  }

  /// XOR with another `BitVec`.
  pub fn xor<Scalar, CS>(&self, mut cs: CS, other: &Self) -> Result<Self, SynthesisError>
  where
    Scalar: PrimeField,
    CS: ConstraintSystem<Scalar>,
  {
    let mut bits = [const { Boolean::Constant(false) }; W];
    for (i, (slot, (a, b))) in bits
      .iter_mut()
      .zip(self.bits.iter().zip(other.bits.iter()))
      .enumerate()
    {
      *slot = Boolean::xor(cs.namespace(|| format!("b{i}")), a, b)?;
    }

    Ok(BitVec {
      bits,
      value: self.value.and_then(|a| other.value.map(|b| a ^ b)),
    })
  }

  /// AND with another `BitVec`.
  pub fn and<Scalar, CS>(&self, mut cs: CS, other: &Self) -> Result<Self, SynthesisError>
  where
    Scalar: PrimeField,
    CS: ConstraintSystem<Scalar>,
  {
    let mut bits = [const { Boolean::Constant(false) }; W];
    for (i, (slot, (a, b))) in bits
      .iter_mut()
      .zip(self.bits.iter().zip(other.bits.iter()))
      .enumerate()
    {
      *slot = Boolean::and(cs.namespace(|| format!("b{i}")), a, b)?;
    }

    Ok(BitVec {
      bits,
      value: self.value.and_then(|a| other.value.map(|b| a & b)),
    })
  }

  /// SHA-256 CH function: (a AND b) XOR ((NOT a) AND c)
  pub fn sha256_ch<Scalar, CS>(
    mut cs: CS,
    a: &Self,
    b: &Self,
    c: &Self,
  ) -> Result<Self, SynthesisError>
  where
    Scalar: PrimeField,
    CS: ConstraintSystem<Scalar>,
  {
    let mut bits = [const { Boolean::Constant(false) }; W];
    for (i, (slot, ((a_bit, b_bit), c_bit))) in bits
      .iter_mut()
      .zip(a.bits.iter().zip(b.bits.iter()).zip(c.bits.iter()))
      .enumerate()
    {
      *slot = Boolean::sha256_ch(cs.namespace(|| format!("b{i}")), a_bit, b_bit, c_bit)?;
    }

    Ok(BitVec {
      bits,
      value: a
        .value
        .and_then(|a| b.value.and_then(|b| c.value.map(|c| (a & b) ^ (!a & c & Self::MASK)))),
    })
  }

  /// SHA-256 MAJ function: (a AND b) XOR (a AND c) XOR (b AND c)
  pub fn sha256_maj<Scalar, CS>(
    mut cs: CS,
    a: &Self,
    b: &Self,
    c: &Self,
  ) -> Result<Self, SynthesisError>
  where
    Scalar: PrimeField,
    CS: ConstraintSystem<Scalar>,
  {
    let mut bits = [const { Boolean::Constant(false) }; W];
    for (i, (slot, ((a_bit, b_bit), c_bit))) in bits
      .iter_mut()
      .zip(a.bits.iter().zip(b.bits.iter()).zip(c.bits.iter()))
      .enumerate()
    {
      *slot = Boolean::sha256_maj(cs.namespace(|| format!("b{i}")), a_bit, b_bit, c_bit)?;
    }

    Ok(BitVec {
      bits,
      value: a.value.and_then(|a| {
        b.value
          .and_then(|b| c.value.map(|c| (a & b) ^ (a & c) ^ (b & c)))
      }),
    })
  }

  /// Modular addition of any number of operands.
  ///
  /// The packed operands are summed in one linear combination and the sum is
  /// decomposed into as many bits as the largest possible sum needs (33 for
  /// two 32-bit operands). The carry bits above `W` are discarded. The sum of
  /// no operands is the constant zero.
  pub fn add_many<Scalar, CS>(mut cs: CS, operands: &[Self]) -> Result<Self, SynthesisError>
  where
    Scalar: PrimeFieldBits,
    CS: ConstraintSystem<Scalar>,
  {
    if operands.is_empty() {
      return Ok(Self::constant(0));
    }

    // Compute the maximum value of the sum
    let max_value = (operands.len() as u128) * (Self::MASK as u128);

    // How many bits do we need to represent the result?
    let result_bits = 128 - max_value.leading_zeros() as usize;

    let result_value = operands
      .iter()
      .try_fold(0u128, |acc, op| op.get_value().map(|v| acc + (v as u128)));

    let mut all_operands_lc = LinearCombination::zero();
    for op in operands {
      all_operands_lc = all_operands_lc + &op.lc(CS::one(), Scalar::ONE);
    }

    let value = result_value.map(|v| {
      let lo = Scalar::from(v as u64);
      let hi = Scalar::from((v >> 64) as u64);
      hi * super::num::pow2::<Scalar>(64) + lo
    });
    let bits = lc_to_bits_le(cs.namespace(|| "sum"), all_operands_lc, value, result_bits)?;

    // Truncate to W bits
    Ok(Self::from_bit_vec(bits))
  }
}

impl Word {
  /// Assemble a word from four bytes, byte 0 being the most significant.
  pub fn from_bytes_be(bytes: &[Byte; 4]) -> Self {
    let bits: [Boolean; 32] =
      std::array::from_fn(|i| bytes[3 - i / 8].bits_le()[i % 8].clone());
    Self::from_bits_le(bits)
  }

  /// Split a word into four bytes, byte 0 being the most significant.
  pub fn to_bytes_be(&self) -> [Byte; 4] {
    std::array::from_fn(|j| {
      let start = (3 - j) * 8;
      Byte::from_bits_le(std::array::from_fn(|i| self.bits[start + i].clone()))
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use bellpepper_core::test_cs::TestConstraintSystem;
  use halo2curves::bn256::Fr;
  use proptest::prelude::*;

  #[test]
  fn test_byte_round_trip_all_values() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    for v in 0..=255u64 {
      let x = AllocatedNum::alloc(cs.namespace(|| format!("x{v}")), || Ok(Fr::from(v))).unwrap();
      let byte = Byte::from_num(cs.namespace(|| format!("byte{v}")), &x).unwrap();
      assert_eq!(byte.get_value(), Some(v));
      let packed = byte.to_num(cs.namespace(|| format!("packed{v}"))).unwrap();
      assert_eq!(packed.get_value(), Some(Fr::from(v)));
    }
    assert!(cs.is_satisfied());
  }

  #[test]
  fn test_byte_from_num_out_of_range() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let x = AllocatedNum::alloc(cs.namespace(|| "x"), || Ok(Fr::from(256))).unwrap();
    Byte::from_num(cs.namespace(|| "byte"), &x).unwrap();
    assert!(!cs.is_satisfied());
    assert_eq!(cs.which_is_unsatisfied(), Some("byte/recompose"));
  }

  #[test]
  fn test_byte_from_num_constraint_count() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let x = AllocatedNum::alloc(cs.namespace(|| "x"), || Ok(Fr::from(200))).unwrap();
    Byte::from_num(cs.namespace(|| "byte"), &x).unwrap();
    // 8 booleanity + 1 recomposition
    assert_eq!(cs.num_constraints(), 9);
  }

  #[test]
  fn test_from_nums() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let bits: Vec<_> = [1u64, 0, 1, 1]
      .iter()
      .enumerate()
      .map(|(i, b)| AllocatedNum::alloc(cs.namespace(|| format!("bit{i}")), || Ok(Fr::from(*b))).unwrap())
      .collect();
    let byte = Byte::from_nums(cs.namespace(|| "byte"), &bits).unwrap();
    assert_eq!(byte.get_value(), Some(0b1101));
    assert!(cs.is_satisfied());
  }

  #[test]
  fn test_constant() {
    assert_eq!(Byte::constant(0x80).get_value(), Some(0x80));
    assert_eq!(Byte::constant(0x1ff).get_value(), Some(0xff));
    assert_eq!(Word::constant(0x6a09e667).get_value(), Some(0x6a09e667));
  }

  #[test]
  fn test_word_bytes_big_endian() {
    let w = Word::constant(0x12345678);
    let bytes = w.to_bytes_be();
    let values: Vec<_> = bytes.iter().map(|b| b.get_value().unwrap()).collect();
    assert_eq!(values, vec![0x12, 0x34, 0x56, 0x78]);
    assert_eq!(Word::from_bytes_be(&bytes).get_value(), Some(0x12345678));
  }

  #[test]
  fn test_rotr_shr_not() {
    let u = Word::constant(0x80000001);
    assert_eq!(u.rotr(1).get_value(), Some(0xC0000000));
    assert_eq!(u.rotr(0).get_value(), Some(0x80000001));
    assert_eq!(u.shr(1).get_value(), Some(0x40000000));
    assert_eq!(u.not().get_value(), Some(0x7FFFFFFE));
    assert_eq!(Byte::constant(0x81).rotr(4).get_value(), Some(0x18));
  }

  #[test]
  fn test_xor_and_allocated() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let a = Word::alloc(cs.namespace(|| "a"), Some(0xAAAA5555)).unwrap();
    let b = Word::alloc(cs.namespace(|| "b"), Some(0x0FF00FF0)).unwrap();
    let x = a.xor(cs.namespace(|| "xor"), &b).unwrap();
    let y = a.and(cs.namespace(|| "and"), &b).unwrap();
    assert_eq!(x.get_value(), Some(0xAAAA5555 ^ 0x0FF00FF0));
    assert_eq!(y.get_value(), Some(0xAAAA5555 & 0x0FF00FF0));
    assert!(cs.is_satisfied());
  }

  #[test]
  fn test_sha256_ch_maj() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let a = Word::alloc(cs.namespace(|| "a"), Some(0xFF00FF00)).unwrap();
    let b = Word::alloc(cs.namespace(|| "b"), Some(0xF0F0F0F0)).unwrap();
    let c = Word::alloc(cs.namespace(|| "c"), Some(0x0F0F0F0F)).unwrap();

    let ch = Word::sha256_ch(cs.namespace(|| "ch"), &a, &b, &c).unwrap();
    assert_eq!(ch.get_value(), Some(0xF00FF00F));
    let maj = Word::sha256_maj(cs.namespace(|| "maj"), &a, &b, &c).unwrap();
    assert_eq!(maj.get_value(), Some(0xFF00FF00 & 0xF0F0F0F0 ^ 0xFF00FF00 & 0x0F0F0F0F));
    assert!(cs.is_satisfied());
  }

  #[test]
  fn test_add_two_operands_uses_33_bits() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let a = Word::alloc(cs.namespace(|| "a"), Some(0xFFFFFFFF)).unwrap();
    let b = Word::alloc(cs.namespace(|| "b"), Some(1)).unwrap();
    let before = cs.num_constraints();
    let sum = Word::add_many(cs.namespace(|| "add"), &[a, b]).unwrap();
    // Should wrap to 0
    assert_eq!(sum.get_value(), Some(0));
    // 33 booleanity + 1 recomposition
    assert_eq!(cs.num_constraints() - before, 34);
    assert!(cs.is_satisfied());
  }

  #[test]
  fn test_add_many_5_operands() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let values = [0x12345678u32, 0x87654321, 0xDEADBEEF, 0xCAFEBABE, 0x01020304];
    let operands: Vec<Word> = values
      .iter()
      .enumerate()
      .map(|(i, v)| Word::alloc(cs.namespace(|| format!("op{i}")), Some(*v as u64)).unwrap())
      .collect();
    let expected = values.iter().fold(0u32, |acc, v| acc.wrapping_add(*v));

    let sum = Word::add_many(cs.namespace(|| "add"), &operands).unwrap();
    assert_eq!(sum.get_value(), Some(expected as u64));
    assert!(cs.is_satisfied());
  }

  #[test]
  fn test_add_many_with_constants() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let a = Word::alloc(cs.namespace(|| "a"), Some(0x428a2f98)).unwrap();
    let k = Word::constant(0xc67178f2);
    let sum = Word::add_many(cs.namespace(|| "add"), &[a, k]).unwrap();
    assert_eq!(sum.get_value(), Some(0x428a2f98u32.wrapping_add(0xc67178f2) as u64));
    assert!(cs.is_satisfied());
  }

  #[test]
  fn test_add_many_no_operands() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let sum = Word::add_many(cs.namespace(|| "add"), &[]).unwrap();
    assert_eq!(sum.get_value(), Some(0));
    assert_eq!(cs.num_constraints(), 0);
  }

  proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_word_bytes_round_trip(v in any::<u32>()) {
      let w = Word::constant(v as u64);
      let back = Word::from_bytes_be(&w.to_bytes_be());
      prop_assert_eq!(back.get_value(), Some(v as u64));
    }

    #[test]
    fn prop_allocated_word_round_trip(v in any::<u32>()) {
      let mut cs = TestConstraintSystem::<Fr>::new();
      let x = AllocatedNum::alloc(cs.namespace(|| "x"), || Ok(Fr::from(v as u64))).unwrap();
      let w = Word::from_num(cs.namespace(|| "word"), &x).unwrap();
      let bytes = w.to_bytes_be();
      prop_assert_eq!(bytes[0].get_value(), Some((v >> 24) as u64));
      let packed = Word::from_bytes_be(&bytes).to_num(cs.namespace(|| "packed")).unwrap();
      prop_assert_eq!(packed.get_value(), Some(Fr::from(v as u64)));
      prop_assert!(cs.is_satisfied());
    }
  }
}
