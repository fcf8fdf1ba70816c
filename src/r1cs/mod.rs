// SPDX-License-Identifier: MIT
// This file is part of the zkbench-gadgets project.
// See the LICENSE file in the project root for full license information.

//! This module defines R1CS related types
//!
//! A circuit is compiled once into an [`R1CSShape`] by synthesizing it into a
//! [`ShapeCS`], then solved any number of times into a [`WitnessCS`]. Each
//! matrix entry names its variable by bellpepper `Index`: `Aux(i)` is the
//! `i`-th private value and `Input(i)` the `i`-th public one, `Input(0)`
//! being `ONE`.
#![allow(non_snake_case)]

use crate::errors::GadgetError;
use bellpepper_core::Index;
use ff::PrimeField;
use rayon::prelude::*;

mod shape_cs;

pub use bellpepper::util_cs::witness_cs::WitnessCS;
pub use shape_cs::ShapeCS;

/// One sparse row: `(variable, coefficient)` pairs.
pub type SparseRow<Scalar> = Vec<(Index, Scalar)>;

/// A type that holds the shape of the R1CS matrices
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct R1CSShape<Scalar: PrimeField> {
  pub(crate) num_cons: usize,
  pub(crate) num_vars: usize,
  pub(crate) num_io: usize,
  pub(crate) A: Vec<SparseRow<Scalar>>,
  pub(crate) B: Vec<SparseRow<Scalar>>,
  pub(crate) C: Vec<SparseRow<Scalar>>,
  names: Vec<String>,
}

impl<Scalar: PrimeField> R1CSShape<Scalar> {
  /// Number of constraints.
  pub fn num_cons(&self) -> usize {
    self.num_cons
  }

  /// Number of private variables.
  pub fn num_vars(&self) -> usize {
    self.num_vars
  }

  /// Number of public inputs, not counting `ONE`.
  pub fn num_io(&self) -> usize {
    self.num_io
  }

  /// Path of the constraint in row `i`.
  pub fn name(&self, i: usize) -> Option<&str> {
    self.names.get(i).map(String::as_str)
  }

  /// Checks if `Az ∘ Bz = Cz` for the assignment recorded in `witness`.
  ///
  /// Rows are evaluated in parallel; the error names the first failing row.
  pub fn is_sat(&self, witness: &WitnessCS<Scalar>) -> Result<(), GadgetError> {
    let W = witness.aux_assignment();
    let X = witness.input_assignment();
    if W.len() != self.num_vars {
      return Err(GadgetError::InvalidWitnessLength {
        expected: self.num_vars,
        actual: W.len(),
      });
    }
    if X.len() != self.num_io + 1 {
      return Err(GadgetError::InvalidWitnessLength {
        expected: self.num_io + 1,
        actual: X.len(),
      });
    }

    let eval = |row: &SparseRow<Scalar>| {
      row.iter().fold(Scalar::ZERO, |acc, (index, coeff)| {
        let value = match index {
          Index::Aux(i) => W[*i],
          Index::Input(i) => X[*i],
        };
        acc + value * coeff
      })
    };

    let failing = self
      .A
      .par_iter()
      .zip(self.B.par_iter())
      .zip(self.C.par_iter())
      .position_first(|((a, b), c)| eval(a) * eval(b) != eval(c));

    match failing {
      Some(i) => Err(GadgetError::UnSat {
        reason: format!("constraint {i} ({}) is unsatisfied", self.names[i]),
      }),
      None => Ok(()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::gadgets::{bind_floor_div, floor_div};
  use bellpepper_core::{ConstraintSystem, SynthesisError, num::AllocatedNum};
  use halo2curves::bn256::Fr;

  fn alloc<CS: ConstraintSystem<Fr>>(mut cs: CS, v: Option<u64>) -> AllocatedNum<Fr> {
    AllocatedNum::alloc(cs.namespace(|| "num"), || {
      v.map(Fr::from).ok_or(SynthesisError::AssignmentMissing)
    })
    .unwrap()
  }

  fn divide<CS: ConstraintSystem<Fr>>(mut cs: CS, a: Option<u64>, b: Option<u64>) {
    let a = AllocatedNum::alloc_input(cs.namespace(|| "a"), || {
      a.map(Fr::from).ok_or(SynthesisError::AssignmentMissing)
    })
    .unwrap();
    let b = alloc(cs.namespace(|| "b"), b);
    floor_div(cs.namespace(|| "div"), &a, &b).unwrap();
  }

  /// Binds a caller-chosen quotient and remainder instead of the hint's.
  fn bind<CS: ConstraintSystem<Fr>>(mut cs: CS, values: Option<[u64; 4]>) {
    let [a, b, q, r] = match values {
      Some(v) => v.map(Some),
      None => [None; 4],
    };
    let a = alloc(cs.namespace(|| "a"), a);
    let b = alloc(cs.namespace(|| "b"), b);
    let q = alloc(cs.namespace(|| "q"), q);
    let r = alloc(cs.namespace(|| "r"), r);
    bind_floor_div(cs.namespace(|| "bind"), &a, &b, &q, &r).unwrap();
  }

  fn compile<F: FnOnce(&mut ShapeCS<Fr>)>(synthesize: F) -> R1CSShape<Fr> {
    let mut cs = ShapeCS::<Fr>::new();
    synthesize(&mut cs);
    cs.into_shape().unwrap()
  }

  #[test]
  fn test_shape_and_witness_agree() {
    let shape = compile(|cs| divide(cs, None, None));
    let mut witness = WitnessCS::<Fr>::new();
    divide(&mut witness, Some(100), Some(7));

    assert_eq!(shape.num_io(), 1);
    assert_eq!(witness.input_assignment().len(), shape.num_io() + 1);
    assert_eq!(witness.aux_assignment().len(), shape.num_vars());
    assert!(shape.num_cons() > 0);
    assert_eq!(shape.is_sat(&witness), Ok(()));
  }

  #[test]
  fn test_unsat_names_the_constraint() {
    let shape = compile(|cs| bind(cs, None));

    let mut witness = WitnessCS::<Fr>::new();
    bind(&mut witness, Some([100, 7, 14, 2]));
    assert_eq!(shape.is_sat(&witness), Ok(()));

    // 100 = 13 * 7 + 9, but 9 >= 7
    let mut witness = WitnessCS::<Fr>::new();
    bind(&mut witness, Some([100, 7, 13, 9]));
    match shape.is_sat(&witness) {
      Err(GadgetError::UnSat { reason }) => assert!(reason.contains("bind/remainder < divisor")),
      other => panic!("expected UnSat, got {other:?}"),
    }
  }

  #[test]
  fn test_witness_length_is_checked() {
    let shape = compile(|cs| divide(cs, None, None));
    let witness = WitnessCS::<Fr>::new();
    assert_eq!(
      shape.is_sat(&witness),
      Err(GadgetError::InvalidWitnessLength {
        expected: shape.num_vars(),
        actual: 0
      })
    );
  }
}
