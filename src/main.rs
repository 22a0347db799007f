//! meshsolve - Mesh Analysis of Resistive Networks
//!
//! Solves the clockwise mesh currents of a planar network described in a
//! mesh description file.
//!
//! # Usage
//!
//! ```bash
//! meshsolve ladder.mesh --equations -v
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use mesh_core::{
    dsl,
    error::Result,
    solver::DEFAULT_PRECISION,
    AnalysisConfig, MeshAnalysis, NetworkBuilder,
};

/// Mesh-current analysis of planar resistive networks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the mesh description file
    #[arg(value_name = "MESH_FILE")]
    mesh_file: PathBuf,

    /// Decimal places of the reported currents
    #[arg(short, long, default_value_t = DEFAULT_PRECISION)]
    precision: u32,

    /// Print the mesh equations before solving
    #[arg(short, long)]
    equations: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

const INSTRUCTIONS: &[&str] = &[
    "Resistances in Ohm, voltages in V, currents in A",
    "Source values are signed: + aids clockwise current, - opposes it",
    "All mesh currents are assumed clockwise",
];

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    // Parse the description file
    let ast = dsl::parse_file(&args.mesh_file)?;

    // Build the network
    let network = NetworkBuilder::from_ast(ast)?.build();

    println!("MESH ANALYSIS");
    for (i, line) in INSTRUCTIONS.iter().enumerate() {
        println!("({}) {}", i + 1, line);
    }
    println!();

    let config = AnalysisConfig::new().with_precision(args.precision);
    let analysis = MeshAnalysis::with_config(network, config);
    println!("{}", analysis.network().summary());
    println!();

    let equations = analysis.equations();
    if args.equations {
        println!("Mesh Equations:");
        for equation in &equations {
            println!("{}: {}", equation.mesh(), equation);
        }
        println!();
    }

    let result = analysis.solve_equations(equations)?;

    println!("Mesh Currents:");
    print!("{}", result.report());

    Ok(())
}
