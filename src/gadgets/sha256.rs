// SPDX-License-Identifier: MIT
// This file is part of the zkbench-gadgets project.
// See the LICENSE file in the project root for full license information.

//! Streaming SHA-256 over constrained bytes.
//!
//! [`Sha256Digest`] mirrors a native streaming hasher: bytes are buffered and
//! every full 64-byte block is compressed in circuit. [`Sha256Digest::sum`]
//! pads, appends the bit length and packs the 32-byte digest into a single
//! field element.
//!
//! The length field is `(len - ignore) * 8`, where `ignore` may be a variable.
//! It only changes the encoded length; block segmentation always follows the
//! number of bytes actually written.
//!
//! # Usage
//!
//! ```ignore
//! let mut digest = Sha256Digest::new();
//! digest.write_nums(cs.namespace(|| "write"), &bytes)?;
//! let hash = digest.sum(cs.namespace(|| "sum"), &constant_num(Fr::ZERO))?;
//! ```

use super::{
  bitvec::{Byte, Word},
  num::{from_bits_le, lc_to_bits_le},
};
use crate::errors::GadgetError;
use bellpepper_core::{
  ConstraintSystem, LinearCombination, SynthesisError,
  boolean::Boolean,
  num::{AllocatedNum, Num},
};
use ff::PrimeFieldBits;

/// SHA-256 block size in bytes.
pub const BLOCK_SIZE: usize = 64;

/// SHA-256 digest size in bytes.
pub const DIGEST_SIZE: usize = 32;

/// SHA-256 round constants K[0..63].
const ROUND_CONSTANTS: [u32; 64] = [
  0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
  0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
  0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
  0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
  0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
  0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
  0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
  0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

/// SHA-256 initial hash values H[0..7].
const IV: [u32; 8] = [
  0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// Σ0(x) = ROTR^2(x) ⊕ ROTR^13(x) ⊕ ROTR^22(x)
fn big_sigma_0<Scalar: PrimeFieldBits, CS: ConstraintSystem<Scalar>>(
  mut cs: CS,
  x: &Word,
) -> Result<Word, SynthesisError> {
  let tmp = x.rotr(2).xor(cs.namespace(|| "r2 xor r13"), &x.rotr(13))?;
  tmp.xor(cs.namespace(|| "xor r22"), &x.rotr(22))
}

/// Σ1(x) = ROTR^6(x) ⊕ ROTR^11(x) ⊕ ROTR^25(x)
fn big_sigma_1<Scalar: PrimeFieldBits, CS: ConstraintSystem<Scalar>>(
  mut cs: CS,
  x: &Word,
) -> Result<Word, SynthesisError> {
  let tmp = x.rotr(6).xor(cs.namespace(|| "r6 xor r11"), &x.rotr(11))?;
  tmp.xor(cs.namespace(|| "xor r25"), &x.rotr(25))
}

/// σ0(x) = ROTR^7(x) ⊕ ROTR^18(x) ⊕ SHR^3(x)
fn small_sigma_0<Scalar: PrimeFieldBits, CS: ConstraintSystem<Scalar>>(
  mut cs: CS,
  x: &Word,
) -> Result<Word, SynthesisError> {
  let tmp = x.rotr(7).xor(cs.namespace(|| "r7 xor r18"), &x.rotr(18))?;
  tmp.xor(cs.namespace(|| "xor s3"), &x.shr(3))
}

/// σ1(x) = ROTR^17(x) ⊕ ROTR^19(x) ⊕ SHR^10(x)
fn small_sigma_1<Scalar: PrimeFieldBits, CS: ConstraintSystem<Scalar>>(
  mut cs: CS,
  x: &Word,
) -> Result<Word, SynthesisError> {
  let tmp = x.rotr(17).xor(cs.namespace(|| "r17 xor r19"), &x.rotr(19))?;
  tmp.xor(cs.namespace(|| "xor s10"), &x.shr(10))
}

/// SHA-256 compression of one 64-byte block into the running hash `h`.
fn compress<Scalar, CS>(mut cs: CS, h: &mut [Word; 8], block: &[Byte]) -> Result<(), SynthesisError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  debug_assert_eq!(block.len(), BLOCK_SIZE);

  // Message schedule: 16 big-endian words expanded to 64
  let mut w: Vec<Word> = block
    .chunks_exact(4)
    .map(|b| Word::from_bytes_be(&std::array::from_fn(|j| b[j].clone())))
    .collect();
  w.reserve(48);

  for i in 16..64 {
    // W[i] = σ1(W[i-2]) + W[i-7] + σ0(W[i-15]) + W[i-16]
    let s1 = small_sigma_1(cs.namespace(|| format!("w{i} s1")), &w[i - 2])?;
    let s0 = small_sigma_0(cs.namespace(|| format!("w{i} s0")), &w[i - 15])?;
    let wi = Word::add_many(
      cs.namespace(|| format!("w{i}")),
      &[s1, w[i - 7].clone(), s0, w[i - 16].clone()],
    )?;
    w.push(wi);
  }

  let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h_var] = h.clone();

  for i in 0..64 {
    // T1 = h + Σ1(e) + Ch(e,f,g) + K[i] + W[i]
    let sigma1 = big_sigma_1(cs.namespace(|| format!("r{i} sigma1")), &e)?;
    let ch = Word::sha256_ch(cs.namespace(|| format!("r{i} ch")), &e, &f, &g)?;
    let k = Word::constant(ROUND_CONSTANTS[i] as u64);
    let t1 = Word::add_many(
      cs.namespace(|| format!("r{i} t1")),
      &[h_var, sigma1, ch, k, w[i].clone()],
    )?;

    // T2 = Σ0(a) + Maj(a,b,c), folded into the update of `a`
    let sigma0 = big_sigma_0(cs.namespace(|| format!("r{i} sigma0")), &a)?;
    let maj = Word::sha256_maj(cs.namespace(|| format!("r{i} maj")), &a, &b, &c)?;

    h_var = g;
    g = f;
    f = e;
    e = Word::add_many(cs.namespace(|| format!("r{i} e")), &[d, t1.clone()])?;
    d = c;
    c = b;
    b = a;
    a = Word::add_many(cs.namespace(|| format!("r{i} a")), &[t1, sigma0, maj])?;
  }

  for (i, v) in [a, b, c, d, e, f, g, h_var].into_iter().enumerate() {
    h[i] = Word::add_many(cs.namespace(|| format!("h{i}")), &[h[i].clone(), v])?;
  }

  Ok(())
}

/// Lifecycle of a [`Sha256Digest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigestState {
  /// Nothing written since creation or the last reset
  Fresh,
  /// Bytes have been written
  Streaming,
  /// `sum` has been called; only `reset` is allowed
  Finalized,
}

/// In-circuit streaming SHA-256.
#[derive(Clone, Debug)]
pub struct Sha256Digest {
  h: [Word; 8],
  x: Vec<Byte>,
  len: u64,
  state: DigestState,
  // names every block, padding and packing; survives reset
  ops: usize,
}

impl Default for Sha256Digest {
  fn default() -> Self {
    Self::new()
  }
}

impl Sha256Digest {
  /// A fresh digest at the SHA-256 IV.
  pub fn new() -> Self {
    Sha256Digest {
      h: IV.map(|v| Word::constant(v as u64)),
      x: Vec::with_capacity(BLOCK_SIZE),
      len: 0,
      state: DigestState::Fresh,
      ops: 0,
    }
  }

  /// Returns the digest to the IV with an empty buffer.
  pub fn reset(&mut self) {
    self.h = IV.map(|v| Word::constant(v as u64));
    self.x.clear();
    self.len = 0;
    self.state = DigestState::Fresh;
  }

  /// Current lifecycle state.
  pub fn state(&self) -> DigestState {
    self.state
  }

  /// Total bytes written since the last reset.
  pub fn len(&self) -> u64 {
    self.len
  }

  /// Whether nothing was written since the last reset.
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  fn next_op(&mut self) -> usize {
    let op = self.ops;
    self.ops += 1;
    op
  }

  fn ensure_open(&self) -> Result<(), GadgetError> {
    if self.state == DigestState::Finalized {
      return Err(GadgetError::DigestFinalized);
    }
    Ok(())
  }

  /// Appends `bytes`, compressing every block that fills up.
  pub fn write<Scalar, CS>(&mut self, mut cs: CS, bytes: &[Byte]) -> Result<usize, GadgetError>
  where
    Scalar: PrimeFieldBits,
    CS: ConstraintSystem<Scalar>,
  {
    self.ensure_open()?;
    self.state = DigestState::Streaming;
    self.len += bytes.len() as u64;

    for byte in bytes {
      self.x.push(byte.clone());
      if self.x.len() == BLOCK_SIZE {
        let op = self.next_op();
        let block = std::mem::replace(&mut self.x, Vec::with_capacity(BLOCK_SIZE));
        compress(cs.namespace(|| format!("block {op}")), &mut self.h, &block)?;
      }
    }

    Ok(bytes.len())
  }

  /// Decomposes each variable into a byte (unsatisfiable if any is 256 or
  /// more) and writes the bytes.
  pub fn write_nums<Scalar, CS>(
    &mut self,
    mut cs: CS,
    nums: &[AllocatedNum<Scalar>],
  ) -> Result<usize, GadgetError>
  where
    Scalar: PrimeFieldBits,
    CS: ConstraintSystem<Scalar>,
  {
    self.ensure_open()?;
    let op = self.next_op();
    let bytes = nums
      .iter()
      .enumerate()
      .map(|(i, x)| Byte::from_num(cs.namespace(|| format!("bytes {op} {i}")), x))
      .collect::<Result<Vec<_>, _>>()?;
    self.write(cs, &bytes)
  }

  /// Pads, appends the big-endian bit length `(len - ignore) * 8` and returns
  /// the 32 digest bytes.
  pub fn sum_bytes<Scalar, CS>(
    &mut self,
    mut cs: CS,
    ignore: &Num<Scalar>,
  ) -> Result<[Byte; DIGEST_SIZE], GadgetError>
  where
    Scalar: PrimeFieldBits,
    CS: ConstraintSystem<Scalar>,
  {
    self.ensure_open()?;
    let op = self.next_op();
    let len = self.len;

    let rem = (len % BLOCK_SIZE as u64) as usize;
    let pad_len = if rem < 56 { 56 - rem } else { BLOCK_SIZE + 56 - rem };
    let padding: Vec<Byte> = (0..pad_len)
      .map(|i| Byte::constant(if i == 0 { 0x80 } else { 0 }))
      .collect();
    self.write(cs.namespace(|| format!("padding {op}")), &padding)?;

    let eight = Scalar::from(8u64);
    let bit_len =
      LinearCombination::zero() + (Scalar::from(len) * eight, CS::one()) + &ignore.lc(-eight);
    let value = ignore
      .get_value()
      .map(|ignore| (Scalar::from(len) - ignore) * eight);
    let bits = lc_to_bits_le(cs.namespace(|| format!("length {op}")), bit_len, value, 64)?;
    let length: [Byte; 8] = std::array::from_fn(|j| {
      Byte::from_bits_le(std::array::from_fn(|i| bits[(7 - j) * 8 + i].clone()))
    });
    self.write(cs.namespace(|| format!("length bytes {op}")), &length)?;

    if !self.x.is_empty() {
      return Err(GadgetError::PaddingInvariant {
        pending: self.x.len(),
      });
    }
    self.state = DigestState::Finalized;

    let bytes: Vec<Byte> = self.h.iter().flat_map(Word::to_bytes_be).collect();
    Ok(std::array::from_fn(|i| bytes[i].clone()))
  }

  /// Like [`Self::sum_bytes`], with the digest packed into one field element,
  /// first byte most significant, reduced modulo the field characteristic.
  pub fn sum<Scalar, CS>(
    &mut self,
    mut cs: CS,
    ignore: &Num<Scalar>,
  ) -> Result<AllocatedNum<Scalar>, GadgetError>
  where
    Scalar: PrimeFieldBits,
    CS: ConstraintSystem<Scalar>,
  {
    let bytes = self.sum_bytes(&mut cs, ignore)?;
    let op = self.next_op();
    let bits: Vec<Boolean> = bytes
      .iter()
      .rev()
      .flat_map(|b| b.bits_le().iter().cloned())
      .collect();
    Ok(from_bits_le(cs.namespace(|| format!("pack {op}")), &bits)?)
  }
}

/// One-shot SHA-256 of `data` (one byte per variable), packed into a field
/// element.
pub fn sha256<Scalar, CS>(
  mut cs: CS,
  ignore: &Num<Scalar>,
  data: &[AllocatedNum<Scalar>],
) -> Result<AllocatedNum<Scalar>, GadgetError>
where
  Scalar: PrimeFieldBits,
  CS: ConstraintSystem<Scalar>,
{
  let mut digest = Sha256Digest::new();
  digest.write_nums(cs.namespace(|| "write"), data)?;
  digest.sum(cs.namespace(|| "sum"), ignore)
}
