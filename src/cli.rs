//! Command-line surface: ten positional arguments mirroring the original single-shot simulator
//! invocation, dispatching to [`crate::driver::run_experiment`].

use crate::code::Code;
use crate::driver::{run_experiment, RunResult, SweepSchedule};
use crate::fault_injection::{CorrelatedErrorModel, DiagonalPairModel};
use crate::geometry::{Boundary, Family};
use clap::{ArgEnum, Parser};
use rand::Rng;

#[derive(Copy, Clone, PartialEq, Eq, ArgEnum, Debug)]
pub enum LatticeType {
    RhombicToric,
    RhombicBoundaries,
    CubicBoundaries,
}

impl LatticeType {
    fn family(self) -> Family {
        match self {
            LatticeType::RhombicToric | LatticeType::RhombicBoundaries => Family::Rhombic,
            LatticeType::CubicBoundaries => Family::Cubic,
        }
    }

    fn boundary(self) -> Boundary {
        match self {
            LatticeType::RhombicToric => Boundary::Toric,
            LatticeType::RhombicBoundaries | LatticeType::CubicBoundaries => Boundary::Bounded,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ArgEnum, Debug)]
pub enum CliSweepSchedule {
    RotatingXz,
    AlternatingXz,
    RotatingYz,
    AlternatingYz,
    RotatingXy,
    AlternatingXy,
    Random,
}

impl From<CliSweepSchedule> for SweepSchedule {
    fn from(s: CliSweepSchedule) -> SweepSchedule {
        match s {
            CliSweepSchedule::RotatingXz => SweepSchedule::RotatingXz,
            CliSweepSchedule::AlternatingXz => SweepSchedule::AlternatingXz,
            CliSweepSchedule::RotatingYz => SweepSchedule::RotatingYz,
            CliSweepSchedule::AlternatingYz => SweepSchedule::AlternatingYz,
            CliSweepSchedule::RotatingXy => SweepSchedule::RotatingXy,
            CliSweepSchedule::AlternatingXy => SweepSchedule::AlternatingXy,
            CliSweepSchedule::Random => SweepSchedule::Random,
        }
    }
}

/// Monte-Carlo trial of the sweep-rule cellular-automaton decoder against an independent
/// data/measurement noise model, reporting whether the resulting correction was logically
/// trivial.
#[derive(Parser, Clone)]
#[clap(author = clap::crate_authors!(", "))]
#[clap(version = env!("CARGO_PKG_VERSION"))]
#[clap(about = "Sweep-rule cellular-automaton decoder for 3D topological codes")]
#[clap(color = clap::ColorChoice::Auto)]
pub struct Cli {
    /// lattice linear size
    #[clap(value_parser)]
    l: usize,
    /// per-face data error probability
    #[clap(value_parser)]
    p: f64,
    /// per-edge measurement error probability
    #[clap(value_parser)]
    q: f64,
    /// number of noisy rounds before readout
    #[clap(value_parser)]
    rounds: u32,
    /// which of the four code variants to simulate
    #[clap(value_parser, arg_enum)]
    lattice_type: LatticeType,
    /// rounds between sweep-direction advances
    #[clap(value_parser)]
    sweep_limit: u32,
    /// cyclic sweep-direction schedule
    #[clap(value_parser, arg_enum)]
    sweep_schedule: CliSweepSchedule,
    /// maximum sweep steps to allow at readout before declaring failure
    #[clap(value_parser)]
    timeout: u32,
    /// sweep every vertex in the sweep set regardless of extremality
    #[clap(value_parser)]
    greedy: bool,
    /// inject the diagonal-pair correlated error model alongside independent faults
    #[clap(value_parser)]
    correlated_errors: bool,
}

impl Cli {
    pub fn run(self) {
        let seed = rand::thread_rng().gen::<u64>();
        let mut code = match Code::new(self.lattice_type.family(), self.lattice_type.boundary(), self.l, self.p, self.q, seed) {
            Ok(code) => code,
            Err(err) => {
                eprintln!("error constructing code: {err}");
                std::process::exit(1);
            }
        };
        let correlated: Option<Box<dyn CorrelatedErrorModel>> = if self.correlated_errors { Some(Box::new(DiagonalPairModel)) } else { None };
        let correlated_ref = correlated.as_deref();
        let RunResult { decode_succeeded, clean_syndrome, elapsed_seconds } = run_experiment(
            &mut code,
            self.sweep_schedule.into(),
            self.sweep_limit,
            self.rounds,
            self.timeout,
            self.greedy,
            correlated_ref,
        );
        println!("{}, {}, {}", decode_succeeded, clean_syndrome, elapsed_seconds);
    }
}
