//! Benchmarks witness generation and satisfiability checking for the gadgets
//! and the benchmark circuits.
use bellpepper_core::{ConstraintSystem, num::AllocatedNum};
use core::time::Duration;
use criterion::*;
use ff::Field;
use halo2curves::bn256::Fr;
use zkbench_gadgets::{
  bench::{compile, solve},
  circuits::{BenchCircuit, PreBlock, TxLoop, VerifyBlock, bench_inputs},
  errors::GadgetError,
  gadgets::{floor_div, num::constant_num, sha256},
};

#[derive(Clone, Debug)]
struct Sha256Circuit {
  preimage: Vec<u8>,
}

impl BenchCircuit<Fr> for Sha256Circuit {
  fn name(&self) -> &'static str {
    "sha256"
  }

  fn synthesize<CS: ConstraintSystem<Fr>>(&self, cs: &mut CS) -> Result<(), GadgetError> {
    let data = self
      .preimage
      .iter()
      .enumerate()
      .map(|(i, b)| AllocatedNum::alloc(cs.namespace(|| format!("preimage byte {i}")), || Ok(Fr::from(*b as u64))))
      .collect::<Result<Vec<_>, _>>()?;
    sha256(cs.namespace(|| "sha256"), &constant_num(Fr::ZERO), &data)?;
    Ok(())
  }
}

#[derive(Clone, Debug)]
struct FloorDivCircuit {
  count: usize,
}

impl BenchCircuit<Fr> for FloorDivCircuit {
  fn name(&self) -> &'static str {
    "floor_div"
  }

  fn synthesize<CS: ConstraintSystem<Fr>>(&self, cs: &mut CS) -> Result<(), GadgetError> {
    let (x, y) = bench_inputs::<Fr>();
    let x = AllocatedNum::alloc(cs.namespace(|| "x"), || Ok(x))?;
    let y = AllocatedNum::alloc(cs.namespace(|| "y"), || Ok(y))?;
    for i in 0..self.count {
      floor_div(cs.namespace(|| format!("floor_div {i}")), &x, &y)?;
    }
    Ok(())
  }
}

fn bench_circuit<C: BenchCircuit<Fr>>(c: &mut Criterion, label: String, circuit: &C) {
  let mut group = c.benchmark_group(label);
  group.sample_size(10);

  let shape = compile(circuit).expect("failed to compile circuit");
  let witness = solve(circuit).expect("failed to solve circuit");

  group.bench_function("Solve", |b| {
    b.iter(|| {
      let res = solve(black_box(circuit));
      assert!(res.is_ok());
    })
  });
  group.bench_function("IsSat", |b| {
    b.iter(|| {
      let res = shape.is_sat(black_box(&witness));
      assert!(res.is_ok());
    })
  });
  group.finish();
}

fn bench_gadgets(c: &mut Criterion) {
  for len in [64usize, 242, 1 << 10] {
    let circuit = Sha256Circuit {
      preimage: vec![0u8; len],
    };
    bench_circuit(c, format!("Sha256-message-len-{len}"), &circuit);
  }
  for count in [1usize, 16, 256] {
    bench_circuit(c, format!("FloorDiv-count-{count}"), &FloorDivCircuit { count });
  }
}

fn bench_circuits(c: &mut Criterion) {
  let (x, y) = bench_inputs::<Fr>();
  bench_circuit(c, "PreBlock".to_string(), &PreBlock::new(x, y));
  bench_circuit(c, "TxLoop".to_string(), &TxLoop::new(x, y));
  bench_circuit(c, "VerifyBlock".to_string(), &VerifyBlock::new(x, y));
}

criterion_group! {
name = gadgets;
config = Criterion::default().warm_up_time(Duration::from_millis(3000));
targets = bench_gadgets, bench_circuits
}

criterion_main!(gadgets);
