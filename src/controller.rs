use crate::adapter::{CouplingAdapter, CouplingCondition};
use crate::config::{Role, RunConfig};
use crate::error::{Error, Result};
use crate::field::Field;
use crate::flux;
use crate::geometry::CouplingBoundary;
use crate::manufactured::ManufacturedSolution;
use crate::solver_interface::SolverInterface;
use crate::verify;
use crate::vtk::OutputSeries;

/// Control state of one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Initializing,
    StepPending,
    Exchanging,
    WindowComplete,
    OngoingNextStep,
    Finalized,
}

/// Time state owned by the controller. `t` and `n` only move when the
/// coupling library accepts a step; `dt` is re-clamped after every exchange.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeState {
    pub t: f64,
    pub n: usize,
    pub dt: f64,
    pub window_size: f64,
    pub window_complete: bool,
}

/// Counters and the last verification score of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub exchange_attempts: usize,
    pub steps_accepted: usize,
    pub windows_completed: usize,
    /// Window-complete output frames; the initial state frame is not counted.
    pub outputs_written: usize,
    pub verification_failures: usize,
    pub last_error: Option<f64>,
    pub finalized: bool,
}

/// Drives one participant through the coupled run: solve a step, exchange
/// the role-specific quantity, honor the negotiated step size, and score
/// and dump fields only on completed windows.
pub struct WindowController<S, A> {
    role: Role,
    interface: CouplingBoundary,
    solution: ManufacturedSolution,
    error_tolerance: Option<f64>,
    solver: S,
    adapter: A,
    output: Option<OutputSeries>,
    state: ControllerState,
    time: TimeState,
    previous: Field,
    report: RunReport,
}

impl<S: SolverInterface, A: CouplingAdapter> WindowController<S, A> {
    pub fn new(
        config: &RunConfig,
        solver: S,
        adapter: A,
        solution: ManufacturedSolution,
        error_tolerance: Option<f64>,
        output: Option<OutputSeries>,
    ) -> Self {
        let previous = solver.space().interpolate("Temperature", |p| solution.u(p, 0.0));
        WindowController {
            role: config.role,
            interface: CouplingBoundary::new(config.geometry),
            solution,
            error_tolerance,
            solver,
            adapter,
            output,
            state: ControllerState::Initializing,
            time: TimeState {
                t: 0.0,
                n: 0,
                dt: 0.0,
                window_size: config.window_size,
                window_complete: false,
            },
            previous,
            report: RunReport::default(),
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn time(&self) -> &TimeState {
        &self.time
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Run the coupled loop to completion and perform the finalize
    /// handshake.
    pub fn run(&mut self) -> Result<RunReport> {
        self.initialize()?;
        while self.adapter.is_coupling_ongoing() {
            self.step_once()?;
        }
        self.adapter.finalize()?;
        self.state = ControllerState::Finalized;
        self.report.finalized = true;
        Ok(self.report.clone())
    }

    fn initialize(&mut self) -> Result<()> {
        if self.state != ControllerState::Initializing {
            return Err(Error::Adapter("controller already ran".to_string()));
        }
        let solution = self.solution;
        let temperature = self
            .solver
            .space()
            .interpolate("Temperature", |p| solution.u(p, 0.0));
        let fluxes = self
            .solver
            .space()
            .interpolate("Flux", |p| solution.flux_x(p, 0.0));
        // Dirichlet role reads temperature and writes flux, Neumann role
        // the reverse.
        let (read_field, write_field) = match self.role {
            Role::Dirichlet => (&temperature, &fluxes),
            Role::Neumann => (&fluxes, &temperature),
        };
        let initial_dt = self.adapter.initialize(
            &self.interface,
            self.solver.space(),
            read_field,
            write_field,
            &self.previous,
        )?;
        self.time.dt = self.solver.preferred_dt().min(initial_dt);
        self.write_initial_frame()?;
        self.state = ControllerState::StepPending;
        Ok(())
    }

    /// One solve/exchange attempt. A rejected exchange leaves `t`, `n` and
    /// the previous field untouched, so the next attempt replays the same
    /// logical step with the smaller negotiated `dt`.
    fn step_once(&mut self) -> Result<()> {
        self.state = ControllerState::StepPending;
        let t_next = self.time.t + self.time.dt;

        let condition = match self.role {
            Role::Dirichlet => CouplingCondition::Dirichlet(
                self.adapter.coupling_dirichlet_values(self.solver.space())?,
            ),
            Role::Neumann => CouplingCondition::Neumann(
                self.adapter.coupling_neumann_values(self.solver.space())?,
            ),
        };
        let solved = self
            .solver
            .step(&self.previous, &condition, t_next, self.time.dt)?;

        let outgoing = match self.role {
            Role::Dirichlet => {
                let residual =
                    self.solver
                        .assemble_residual(&solved, &self.previous, t_next, self.time.dt);
                flux::fluxes_from_residual(&residual, &self.solver.boundary_measures(), "Flux")?
            }
            Role::Neumann => solved.clone(),
        };

        self.state = ControllerState::Exchanging;
        let outcome = self.adapter.advance(
            &outgoing,
            &solved,
            &self.previous,
            self.time.t,
            self.time.dt,
            self.time.n,
        )?;
        self.report.exchange_attempts += 1;

        let accepted = outcome.n > self.time.n;
        self.time.window_complete = accepted && outcome.window_complete;
        if accepted {
            self.time.t = outcome.t;
            self.time.n = outcome.n;
            self.previous.assign(&solved);
            self.report.steps_accepted += 1;
            if outcome.window_complete {
                self.state = ControllerState::WindowComplete;
                self.report.windows_completed += 1;
                self.score_window()?;
            } else {
                self.state = ControllerState::OngoingNextStep;
            }
        }

        // the local step must never exceed what the library negotiated
        self.time.dt = self.solver.preferred_dt().min(outcome.negotiated_dt);
        Ok(())
    }

    fn write_initial_frame(&mut self) -> Result<()> {
        let solution = self.solution;
        let space = self.solver.space();
        let reference = space.interpolate("reference", |p| solution.u(p, 0.0));
        let assessment =
            verify::compute_errors(&self.previous, &reference, space, self.error_tolerance);
        if let Some(output) = &mut self.output {
            output.write_frame(space, &[&self.previous, &reference, &assessment.pointwise])?;
        }
        Ok(())
    }

    /// Recompute the reference at the window end, score the solution, and
    /// emit output. Intermediate sub-steps are never scored or dumped.
    fn score_window(&mut self) -> Result<()> {
        let solution = self.solution;
        let t = self.time.t;
        let space = self.solver.space();
        let reference = space.interpolate("reference", |p| solution.u(p, t));
        let assessment =
            verify::compute_errors(&self.previous, &reference, space, self.error_tolerance);
        if assessment.within_tolerance == Some(false) {
            println!(
                "window {} verification failure: error {:e}",
                self.report.windows_completed, assessment.total
            );
            self.report.verification_failures += 1;
        }
        self.report.last_error = Some(assessment.total);
        if let Some(output) = &mut self.output {
            output.write_frame(space, &[&self.previous, &reference, &assessment.pointwise])?;
            self.report.outputs_written += 1;
        }
        Ok(())
    }
}
