// SPDX-License-Identifier: MIT
// This file is part of the zkbench-gadgets project.
// See the LICENSE file in the project root for full license information.

//! Timing pipeline for the benchmark circuits.
//!
//! A circuit is compiled once into an [`R1CSShape`], then solved and checked
//! `iterations` times. Each phase runs inside a tracing span and emits an
//! `elapsed_ms` event.
use crate::{
  circuits::BenchCircuit,
  errors::GadgetError,
  r1cs::{R1CSShape, ShapeCS, WitnessCS},
  start_span,
};
use bellpepper_core::ConstraintSystem;
use ff::PrimeFieldBits;
use std::time::{Duration, Instant};
use tracing::{info, info_span};

/// Sizes and timings of one benchmark run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchReport {
  /// Circuit name
  pub circuit: &'static str,
  /// Number of constraints
  pub num_cons: usize,
  /// Number of private variables
  pub num_vars: usize,
  /// Number of public inputs, not counting `ONE`
  pub num_io: usize,
  /// Time to synthesize the shape and build the matrices
  pub compile: Duration,
  /// Time of each witness generation
  pub solve: Vec<Duration>,
  /// Time of each satisfiability check
  pub check: Vec<Duration>,
}

impl BenchReport {
  /// Mean witness generation time, zero if nothing was solved.
  pub fn mean_solve(&self) -> Duration {
    mean(&self.solve)
  }

  /// Mean satisfiability check time, zero if nothing was checked.
  pub fn mean_check(&self) -> Duration {
    mean(&self.check)
  }
}

fn mean(samples: &[Duration]) -> Duration {
  match u32::try_from(samples.len()) {
    Ok(0) | Err(_) => Duration::ZERO,
    Ok(n) => samples.iter().sum::<Duration>() / n,
  }
}

/// Synthesizes `circuit` without values and builds its matrices.
pub fn compile<Scalar, C>(circuit: &C) -> Result<R1CSShape<Scalar>, GadgetError>
where
  Scalar: PrimeFieldBits,
  C: BenchCircuit<Scalar>,
{
  let mut cs = ShapeCS::<Scalar>::new();
  circuit.synthesize(&mut cs)?;
  cs.into_shape()
}

/// Synthesizes `circuit` with values and records the assignment.
pub fn solve<Scalar, C>(circuit: &C) -> Result<WitnessCS<Scalar>, GadgetError>
where
  Scalar: PrimeFieldBits,
  C: BenchCircuit<Scalar>,
{
  let mut cs = WitnessCS::<Scalar>::new();
  circuit.synthesize(&mut cs)?;
  Ok(cs)
}

/// Compiles `circuit`, then solves and checks it `iterations` times.
///
/// Fails on the first witness that does not satisfy the shape.
pub fn run<Scalar, C>(circuit: &C, iterations: usize) -> Result<BenchReport, GadgetError>
where
  Scalar: PrimeFieldBits,
  C: BenchCircuit<Scalar>,
{
  let (_run_span, _run_t) = start_span!("bench", circuit = circuit.name(), iterations);

  let (_compile_span, compile_t) = start_span!("compile");
  let shape = compile(circuit)?;
  let compile = compile_t.elapsed();
  info!(
    elapsed_ms = %compile.as_millis(),
    num_cons = shape.num_cons(),
    num_vars = shape.num_vars(),
    num_io = shape.num_io(),
    "compile"
  );

  let mut solve_times = Vec::with_capacity(iterations);
  let mut check_times = Vec::with_capacity(iterations);
  for i in 0..iterations {
    let (_solve_span, solve_t) = start_span!("solve", iteration = i);
    let witness = solve(circuit)?;
    solve_times.push(solve_t.elapsed());
    info!(elapsed_ms = %solve_t.elapsed().as_millis(), "solve");

    let (_check_span, check_t) = start_span!("is_sat", iteration = i);
    shape.is_sat(&witness)?;
    check_times.push(check_t.elapsed());
    info!(elapsed_ms = %check_t.elapsed().as_millis(), "is_sat");
  }

  Ok(BenchReport {
    circuit: circuit.name(),
    num_cons: shape.num_cons(),
    num_vars: shape.num_vars(),
    num_io: shape.num_io(),
    compile,
    solve: solve_times,
    check: check_times,
  })
}
