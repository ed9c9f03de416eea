//! `construct` — synthesizes a `Main.java` that builds a value of a given
//! class, mined from a small built-in demonstration bytecode image.
//!
//! Real jar/classpath loading stays an external collaborator (spec.md §1):
//! this binary demonstrates the pipeline end to end against
//! [`javacraft::view::fixture::demo_view`] rather than parsing `.class`
//! files itself. `--check` still shells out to a real `javac` if one is on
//! `PATH`, against whatever jars/directories `--classpath` names.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use javacraft::miner::DependencyMiner;
use javacraft::model::Node;
use javacraft::solver::{Config, MonteCarloSolver};
use javacraft::types::ClassType;
use javacraft::view::fixture::demo_view;

/// Synthesizes a Java program that constructs a value of the given class.
#[derive(Parser)]
#[command(name = "construct", about = "Synthesize a Main.java that builds a target class", long_about = None)]
struct Args {
    /// Fully qualified name of the class to construct, e.g.
    /// `org.example.catalog.Widget`.
    target: String,

    /// Number of randomized search trials.
    #[arg(long, default_value_t = Config::default().number_of_trials)]
    trials: u32,

    /// Abort a trial once its running cost exceeds this.
    #[arg(long, default_value_t = Config::default().cost_limit)]
    cost_limit: u32,

    /// Abort a trial once its recursion depth exceeds this.
    #[arg(long, default_value_t = Config::default().depth_limit)]
    depth_limit: u32,

    /// Discard successful trials cheaper than this.
    #[arg(long, default_value_t = Config::default().min_cost)]
    min_cost: u32,

    /// RNG seed; fixing it makes the search deterministic.
    #[arg(long, default_value_t = Config::default().seed)]
    seed: u64,

    /// After emitting, invoke `javac` against the emitted source and report
    /// whether it compiles.
    #[arg(long)]
    check: bool,

    /// Jars or directories of `.class` files to put on the classpath when
    /// `--check` is given.
    #[arg(long = "classpath")]
    classpath: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let view = demo_view();
    let miner = DependencyMiner::new(&view);
    let mut solver = MonteCarloSolver::new(miner, args.seed);
    let config = Config {
        number_of_trials: args.trials,
        cost_limit: args.cost_limit,
        depth_limit: args.depth_limit,
        min_cost: args.min_cost,
        seed: args.seed,
    };

    let target = Node::Class(ClassType::new(&args.target));
    let Some(plan) = solver.solve(&target, &config) else {
        eprintln!(
            "no construction plan found for {} within {} trials",
            args.target, args.trials
        );
        return ExitCode::FAILURE;
    };

    let source = match javacraft::emit::emit(&plan) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("emission failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("{source}");
    eprintln!("plan cost: {}, steps: {}", plan.cost, plan.creation_order.len());

    if args.check {
        let classpath = javacraft::compile_check::classpath_from_dirs(args.classpath);
        match javacraft::compile_check::check(&source, &classpath) {
            Ok(report) if report.success => eprintln!("javac: OK"),
            Ok(report) => {
                eprintln!("javac: FAILED\n{}", report.stderr);
                return ExitCode::FAILURE;
            }
            Err(err) => {
                eprintln!("could not run javac: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
