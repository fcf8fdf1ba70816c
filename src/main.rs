//! Runs one benchmark circuit through the compile, solve and check pipeline.
//!
//! ```text
//! RUST_LOG=info zkbench verify-block --iterations 3
//! ```
use clap::{Parser, ValueEnum};
use halo2curves::bn256::Fr;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zkbench_gadgets::{
  bench::{BenchReport, run},
  circuits::{PreBlock, TxLoop, VerifyBlock, bench_inputs},
  errors::GadgetError,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Circuit {
  PreBlock,
  TxLoop,
  VerifyBlock,
}

#[derive(Parser, Debug)]
#[command(about = "Benchmark hand-written R1CS gadgets")]
struct Args {
  /// Circuit to benchmark
  #[arg(value_enum)]
  circuit: Circuit,

  /// Number of witness generations to time
  #[arg(long, default_value_t = 1)]
  iterations: usize,
}

fn main() -> Result<(), GadgetError> {
  tracing_subscriber::fmt()
    .with_target(false)
    .with_ansi(false)
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let args = Args::parse();
  let (x, y) = bench_inputs::<Fr>();
  let report = match args.circuit {
    Circuit::PreBlock => run(&PreBlock::new(x, y), args.iterations)?,
    Circuit::TxLoop => run(&TxLoop::new(x, y), args.iterations)?,
    Circuit::VerifyBlock => run(&VerifyBlock::new(x, y), args.iterations)?,
  };
  summarize(&report);
  Ok(())
}

fn summarize(report: &BenchReport) {
  info!(
    circuit = report.circuit,
    num_cons = report.num_cons,
    num_vars = report.num_vars,
    compile_ms = %report.compile.as_millis(),
    mean_solve_ms = %report.mean_solve().as_millis(),
    mean_check_ms = %report.mean_check().as_millis(),
    "summary"
  );
  println!(
    "{}: {} constraints, {} variables, compile {:?}, solve {:?}, check {:?}",
    report.circuit,
    report.num_cons,
    report.num_vars,
    report.compile,
    report.mean_solve(),
    report.mean_check()
  );
}
