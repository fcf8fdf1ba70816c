// SPDX-License-Identifier: MIT
// This file is part of the zkbench-gadgets project.
// See the LICENSE file in the project root for full license information.

//! Compiles a circuit straight into an [`R1CSShape`].
//!
//! No value is ever computed, so a circuit can be compiled without a witness.
//! Every variable, constraint and namespace gets a `/`-separated path; a
//! repeated path or a name containing `/` is reported by
//! [`ShapeCS::into_shape`].

use super::{R1CSShape, SparseRow};
use crate::errors::GadgetError;
use bellpepper_core::{ConstraintSystem, Index, LinearCombination, SynthesisError, Variable};
use ff::PrimeField;
use std::collections::HashSet;

/// A `ConstraintSystem` that appends each constraint as a row of an
/// [`R1CSShape`].
pub struct ShapeCS<Scalar: PrimeField> {
  shape: R1CSShape<Scalar>,
  namespace: Vec<String>,
  paths: HashSet<String>,
  error: Option<String>,
}

impl<Scalar: PrimeField> ShapeCS<Scalar> {
  /// An empty system holding only `ONE`.
  pub fn new() -> Self {
    ShapeCS::default()
  }

  /// The matrices recorded so far.
  pub fn shape(&self) -> &R1CSShape<Scalar> {
    &self.shape
  }

  /// Finishes compilation, failing on the first naming error.
  pub fn into_shape(self) -> Result<R1CSShape<Scalar>, GadgetError> {
    match self.error {
      Some(reason) => Err(GadgetError::Synthesis { reason }),
      None => Ok(self.shape),
    }
  }

  /// Registers `name` under the current namespace and returns its path.
  fn claim(&mut self, name: String) -> String {
    if name.contains('/') {
      self.fail(format!("'/' is not allowed in names: {name}"));
    }
    let path = match self.namespace.is_empty() {
      true => name,
      false => format!("{}/{name}", self.namespace.join("/")),
    };
    if !self.paths.insert(path.clone()) {
      self.fail(format!("path {path} is used twice"));
    }
    path
  }

  fn fail(&mut self, reason: String) {
    self.error.get_or_insert(reason);
  }
}

impl<Scalar: PrimeField> Default for ShapeCS<Scalar> {
  fn default() -> Self {
    ShapeCS {
      shape: R1CSShape {
        num_cons: 0,
        num_vars: 0,
        num_io: 0,
        A: vec![],
        B: vec![],
        C: vec![],
        names: vec![],
      },
      namespace: vec![],
      paths: HashSet::from(["ONE".to_string()]),
      error: None,
    }
  }
}

fn sparse_row<Scalar: PrimeField>(lc: &LinearCombination<Scalar>) -> SparseRow<Scalar> {
  lc.iter()
    .map(|(var, coeff)| (var.get_unchecked(), *coeff))
    .collect()
}

impl<Scalar: PrimeField> ConstraintSystem<Scalar> for ShapeCS<Scalar> {
  type Root = Self;

  fn alloc<F, A, AR>(&mut self, annotation: A, _f: F) -> Result<Variable, SynthesisError>
  where
    F: FnOnce() -> Result<Scalar, SynthesisError>,
    A: FnOnce() -> AR,
    AR: Into<String>,
  {
    self.claim(annotation().into());
    let var = Variable::new_unchecked(Index::Aux(self.shape.num_vars));
    self.shape.num_vars += 1;
    Ok(var)
  }

  fn alloc_input<F, A, AR>(&mut self, annotation: A, _f: F) -> Result<Variable, SynthesisError>
  where
    F: FnOnce() -> Result<Scalar, SynthesisError>,
    A: FnOnce() -> AR,
    AR: Into<String>,
  {
    self.claim(annotation().into());
    // Input(0) is ONE
    self.shape.num_io += 1;
    Ok(Variable::new_unchecked(Index::Input(self.shape.num_io)))
  }

  fn enforce<A, AR, LA, LB, LC>(&mut self, annotation: A, a: LA, b: LB, c: LC)
  where
    A: FnOnce() -> AR,
    AR: Into<String>,
    LA: FnOnce(LinearCombination<Scalar>) -> LinearCombination<Scalar>,
    LB: FnOnce(LinearCombination<Scalar>) -> LinearCombination<Scalar>,
    LC: FnOnce(LinearCombination<Scalar>) -> LinearCombination<Scalar>,
  {
    let path = self.claim(annotation().into());
    self.shape.A.push(sparse_row(&a(LinearCombination::zero())));
    self.shape.B.push(sparse_row(&b(LinearCombination::zero())));
    self.shape.C.push(sparse_row(&c(LinearCombination::zero())));
    self.shape.names.push(path);
    self.shape.num_cons += 1;
  }

  fn push_namespace<NR, N>(&mut self, name_fn: N)
  where
    NR: Into<String>,
    N: FnOnce() -> NR,
  {
    let name = name_fn().into();
    self.claim(name.clone());
    self.namespace.push(name);
  }

  fn pop_namespace(&mut self) {
    self.namespace.pop();
  }

  fn get_root(&mut self) -> &mut Self::Root {
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use bellpepper_core::num::AllocatedNum;
  use halo2curves::bn256::Fr;

  #[test]
  fn test_rows_follow_allocation_order() {
    let mut cs = ShapeCS::<Fr>::new();
    let a = AllocatedNum::alloc(cs.namespace(|| "a"), || Err(SynthesisError::AssignmentMissing))
      .unwrap();
    let x = AllocatedNum::alloc_input(cs.namespace(|| "x"), || Err(SynthesisError::AssignmentMissing))
      .unwrap();
    let sq = a.square(cs.namespace(|| "square")).unwrap();
    cs.enforce(
      || "sq = x",
      |lc| lc + sq.get_variable(),
      |lc| lc + ShapeCS::<Fr>::one(),
      |lc| lc + x.get_variable(),
    );

    let shape = cs.into_shape().unwrap();
    assert_eq!(shape.num_vars(), 2);
    assert_eq!(shape.num_io(), 1);
    assert_eq!(shape.num_cons(), 2);
    assert_eq!(shape.name(0), Some("square/squaring constraint"));
    assert_eq!(shape.name(1), Some("sq = x"));
    assert_eq!(shape.A[0], vec![(Index::Aux(0), Fr::from(1))]);
    assert_eq!(shape.C[0], vec![(Index::Aux(1), Fr::from(1))]);
    assert_eq!(shape.B[1], vec![(Index::Input(0), Fr::from(1))]);
    assert_eq!(shape.C[1], vec![(Index::Input(1), Fr::from(1))]);
  }

  #[test]
  fn test_nested_paths() {
    let mut cs = ShapeCS::<Fr>::new();
    {
      let mut outer = cs.namespace(|| "outer");
      let mut inner = outer.namespace(|| "inner");
      inner.enforce(|| "c", |lc| lc, |lc| lc, |lc| lc);
    }
    let shape = cs.into_shape().unwrap();
    assert_eq!(shape.name(0), Some("outer/inner/c"));
  }

  #[test]
  fn test_duplicate_namespace_is_error() {
    let mut cs = ShapeCS::<Fr>::new();
    cs.push_namespace(|| "x");
    cs.pop_namespace();
    cs.push_namespace(|| "x");
    cs.pop_namespace();
    assert_eq!(
      cs.into_shape(),
      Err(GadgetError::Synthesis {
        reason: "path x is used twice".to_string()
      })
    );
  }

  #[test]
  fn test_slash_in_name_is_error() {
    let mut cs = ShapeCS::<Fr>::new();
    AllocatedNum::alloc(cs.namespace(|| "fi/le"), || Err(SynthesisError::AssignmentMissing))
      .unwrap();
    assert!(matches!(
      cs.into_shape(),
      Err(GadgetError::Synthesis { reason }) if reason.contains("'/' is not allowed")
    ));
  }
}
