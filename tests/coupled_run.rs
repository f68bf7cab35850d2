use clap::Parser;
use parheat::adapter::ManufacturedAdapter;
use parheat::config::{Args, RunConfig, ERROR_TOL};
use parheat::controller::WindowController;
use parheat::fem::HeatSolver;
use parheat::manufactured::ManufacturedSolution;
use parheat::solver_interface::SolverInterface;
use parheat::verify;
use parheat::vtk::OutputSeries;

fn resolve(argv: &[&str]) -> RunConfig {
    RunConfig::resolve(&Args::try_parse_from(argv).unwrap()).unwrap()
}

#[test]
fn initial_interpolant_matches_the_reference() {
    let config = resolve(&["parheat", "-d"]);
    let solution = ManufacturedSolution::default();
    let solver = HeatSolver::for_role(&config, solution).unwrap();
    let space = solver.space();
    let initial = space.interpolate("Temperature", |p| solution.u(p, 0.0));
    let reference = space.interpolate("reference", |p| solution.u(p, 0.0));
    let assessment = verify::compute_errors(&initial, &reference, space, Some(ERROR_TOL));
    assert!(assessment.total < 1e-12);
    assert_eq!(assessment.within_tolerance, Some(true));
}

#[test]
fn one_accepted_step_stays_within_tolerance() {
    let config = resolve(&["parheat", "-d"]);
    let solution = ManufacturedSolution::default();
    let solver = HeatSolver::for_role(&config, solution).unwrap();
    let adapter = ManufacturedAdapter::new(solution, config.window_size, config.substeps(), 1);
    let mut controller =
        WindowController::new(&config, solver, adapter, solution, Some(ERROR_TOL), None);
    let report = controller.run().unwrap();
    assert_eq!(report.steps_accepted, 1);
    assert_eq!(report.verification_failures, 0);
    assert!(report.last_error.unwrap() < 1e-12);
}

#[test]
fn dirichlet_participant_runs_to_completion() {
    let out_dir = std::env::temp_dir().join(format!(
        "parheat_e2e_dirichlet_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&out_dir);

    let config = resolve(&["parheat", "--dirichlet"]);
    assert_eq!(config.coupling_scheme, "SERIAL_FIRST_DIRICHLET");
    assert_eq!(config.waveform, (1, 1));

    let solution = ManufacturedSolution::default();
    let solver = HeatSolver::for_role(&config, solution).unwrap();
    let windows = 5;
    let adapter = ManufacturedAdapter::new(solution, config.window_size, config.substeps(), windows);
    let output = OutputSeries::new(&out_dir, config.role.tag()).unwrap();
    let mut controller =
        WindowController::new(&config, solver, adapter, solution, Some(ERROR_TOL), Some(output));
    let report = controller.run().unwrap();

    assert!(report.finalized);
    assert!(controller.adapter().is_finalized());
    assert_eq!(controller.adapter().windows_completed(), windows);
    assert_eq!(report.windows_completed, windows);
    assert_eq!(report.steps_accepted, windows);
    // output frames: one per completed window, never per sub-step
    assert_eq!(report.outputs_written, windows);
    assert_eq!(report.verification_failures, 0);
    assert!(report.last_error.unwrap() < 1e-12);

    // three series (temperature, reference, error), initial frame plus one
    // frame per window
    let files = std::fs::read_dir(&out_dir).unwrap().count();
    assert_eq!(files, 3 * (windows + 1));
    std::fs::remove_dir_all(&out_dir).unwrap();
}

#[test]
fn neumann_participant_subcycles_within_windows() {
    let config = resolve(&["parheat", "-n", "-w", "1", "2"]);
    assert_eq!(config.substeps(), 2);

    let solution = ManufacturedSolution::default();
    let solver = HeatSolver::for_role(&config, solution).unwrap();
    let windows = 3;
    let adapter = ManufacturedAdapter::new(solution, config.window_size, config.substeps(), windows);
    let mut controller =
        WindowController::new(&config, solver, adapter, solution, Some(ERROR_TOL), None);
    let report = controller.run().unwrap();

    // two accepted sub-steps per window, scored only at window boundaries
    assert_eq!(report.steps_accepted, 2 * windows);
    assert_eq!(report.windows_completed, windows);
    assert_eq!(report.outputs_written, 0);
    assert_eq!(report.verification_failures, 0);
    assert!(report.last_error.unwrap() < 1e-12);
}
