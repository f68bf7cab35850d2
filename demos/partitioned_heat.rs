use clap::Parser;
use parheat::adapter::ManufacturedAdapter;
use parheat::config::{Args, RunConfig, ERROR_TOL};
use parheat::controller::{RunReport, WindowController};
use parheat::error::Result;
use parheat::fem::HeatSolver;
use parheat::manufactured::ManufacturedSolution;
use parheat::vtk::OutputSeries;
use std::process::ExitCode;

/// Number of coupling windows the verification adapter runs before it
/// reports the coupled simulation finished.
const WINDOWS: usize = 10;

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(report) => {
            println!("windows completed: {}", report.windows_completed);
            if let Some(error) = report.last_error {
                println!("final error vs manufactured solution: {error:e}");
            }
            if report.verification_failures > 0 {
                eprintln!("{} window(s) failed verification", report.verification_failures);
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<RunReport> {
    let config = RunConfig::resolve(args)?;
    println!(
        "participant {} with adapter config {:?} (partner {:?})",
        config.role.tag(),
        config.adapter_config,
        config.partner_adapter_config
    );

    let solution = ManufacturedSolution::default();
    let solver = HeatSolver::for_role(&config, solution)?;
    let adapter =
        ManufacturedAdapter::new(solution, config.window_size, config.substeps(), WINDOWS);
    let output = match &config.output_dir {
        Some(dir) => Some(OutputSeries::new(dir, config.role.tag())?),
        None => None,
    };

    let mut controller = WindowController::new(
        &config,
        solver,
        adapter,
        solution,
        Some(ERROR_TOL),
        output,
    );
    controller.run()
}
