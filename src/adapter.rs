use crate::error::{Error, Result};
use crate::field::Field;
use crate::geometry::CouplingBoundary;
use crate::manufactured::ManufacturedSolution;
use crate::space::FunctionSpace;
use crate::util::*;

/// Partner data sampled on the interface dofs of the local space.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceValues {
    pub dofs: Vec<usize>,
    pub values: Vec<f64>,
}

impl InterfaceValues {
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.dofs.iter().copied().zip(self.values.iter().copied())
    }
}

/// The boundary operator a participant applies on the interface, built from
/// the partner's last exchanged quantity.
#[derive(Debug, Clone, PartialEq)]
pub enum CouplingCondition {
    /// Prescribed temperature on interface dofs.
    Dirichlet(InterfaceValues),
    /// Prescribed flux (du/dx across the interface) added to the weak form.
    Neumann(InterfaceValues),
}

/// Result of one exchange attempt. On rejection `t` and `n` come back
/// unchanged and the step must be recomputed with `negotiated_dt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvanceOutcome {
    pub t: f64,
    pub n: usize,
    pub window_complete: bool,
    pub negotiated_dt: f64,
}

/// Contract of the external coupling library. The library owns transport,
/// mesh-to-mesh mapping and convergence bookkeeping; this crate only drives
/// it.
pub trait CouplingAdapter {
    /// Register the interface and the role-specific read/write fields;
    /// returns the initial step size.
    fn initialize(
        &mut self,
        interface: &CouplingBoundary,
        space: &FunctionSpace,
        read_field: &Field,
        write_field: &Field,
        previous: &Field,
    ) -> Result<f64>;

    fn is_coupling_ongoing(&self) -> bool;

    /// Partner temperature for the upcoming step, as a Dirichlet operator.
    fn coupling_dirichlet_values(&self, space: &FunctionSpace) -> Result<InterfaceValues>;

    /// Partner flux for the upcoming step, as a Neumann contribution.
    fn coupling_neumann_values(&self, space: &FunctionSpace) -> Result<InterfaceValues>;

    /// Hand the outgoing quantity to the library and receive the updated
    /// time state. May be called repeatedly at the same `(t, n)` until the
    /// step is accepted.
    fn advance(
        &mut self,
        outgoing: &Field,
        solved: &Field,
        previous: &Field,
        t: f64,
        dt: f64,
        n: usize,
    ) -> Result<AdvanceOutcome>;

    fn finalize(&mut self) -> Result<()>;
}

/// Verification stand-in for the coupling library: answers every read from
/// the manufactured solution, negotiates `window / substeps` as the step
/// size, and completes a window every `substeps` accepted steps. Lets a
/// single participant run the full control loop against ground truth.
pub struct ManufacturedAdapter {
    solution: ManufacturedSolution,
    window_size: f64,
    substeps: u32,
    total_windows: usize,
    interface: Vec<(usize, Point)>,
    t: f64,
    n: usize,
    dt: f64,
    steps_in_window: u32,
    windows_completed: usize,
    initialized: bool,
    finalized: bool,
}

impl ManufacturedAdapter {
    pub fn new(
        solution: ManufacturedSolution,
        window_size: f64,
        substeps: u32,
        total_windows: usize,
    ) -> Self {
        assert!(substeps >= 1);
        assert!(window_size > 0.0);
        ManufacturedAdapter {
            solution,
            window_size,
            substeps,
            total_windows,
            interface: Vec::new(),
            t: 0.0,
            n: 0,
            dt: 0.0,
            steps_in_window: 0,
            windows_completed: 0,
            initialized: false,
            finalized: false,
        }
    }

    pub fn windows_completed(&self) -> usize {
        self.windows_completed
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Time the partner data handed out by the read operations refers to.
    fn read_time(&self) -> f64 {
        self.t + self.dt
    }

    fn read_values<F: Fn(&Point, f64) -> f64>(&self, eval: F) -> Result<InterfaceValues> {
        if !self.initialized {
            return Err(Error::Adapter("read before initialize".to_string()));
        }
        let t = self.read_time();
        Ok(InterfaceValues {
            dofs: self.interface.iter().map(|(dof, _)| *dof).collect(),
            values: self.interface.iter().map(|(_, p)| eval(p, t)).collect(),
        })
    }
}

impl CouplingAdapter for ManufacturedAdapter {
    fn initialize(
        &mut self,
        interface: &CouplingBoundary,
        space: &FunctionSpace,
        read_field: &Field,
        write_field: &Field,
        previous: &Field,
    ) -> Result<f64> {
        if self.initialized {
            return Err(Error::Adapter("initialize called twice".to_string()));
        }
        let dofs = space.dof_count();
        if read_field.len() != dofs || write_field.len() != dofs || previous.len() != dofs {
            return Err(Error::Adapter(
                "field sizes do not match the registered space".to_string(),
            ));
        }
        self.interface = space
            .nodes()
            .filter(|(_, p)| interface.contains(p))
            .collect();
        if self.interface.is_empty() {
            return Err(Error::Adapter(
                "no mesh node lies on the coupling interface".to_string(),
            ));
        }
        self.dt = self.window_size / self.substeps as f64;
        self.initialized = true;
        Ok(self.dt)
    }

    fn is_coupling_ongoing(&self) -> bool {
        self.initialized && !self.finalized && self.windows_completed < self.total_windows
    }

    fn coupling_dirichlet_values(&self, _space: &FunctionSpace) -> Result<InterfaceValues> {
        let solution = self.solution;
        self.read_values(|p, t| solution.u(p, t))
    }

    fn coupling_neumann_values(&self, _space: &FunctionSpace) -> Result<InterfaceValues> {
        let solution = self.solution;
        self.read_values(|p, t| solution.flux_x(p, t))
    }

    fn advance(
        &mut self,
        outgoing: &Field,
        _solved: &Field,
        _previous: &Field,
        t: f64,
        dt: f64,
        n: usize,
    ) -> Result<AdvanceOutcome> {
        if !self.initialized || self.finalized {
            return Err(Error::Adapter("advance outside the coupling run".to_string()));
        }
        if n != self.n || !near(t, self.t, 1e-12) {
            return Err(Error::Adapter(format!(
                "advance at unexpected step: got (t={t}, n={n}), expected (t={}, n={})",
                self.t, self.n
            )));
        }
        for (dof, _) in &self.interface {
            if *dof >= outgoing.len() {
                return Err(Error::Adapter(
                    "outgoing field does not cover the interface".to_string(),
                ));
            }
        }
        self.t = t + dt;
        self.n = n + 1;
        self.steps_in_window += 1;
        let window_complete = self.steps_in_window >= self.substeps;
        if window_complete {
            self.steps_in_window = 0;
            self.windows_completed += 1;
        }
        self.dt = self.window_size / self.substeps as f64;
        Ok(AdvanceOutcome {
            t: self.t,
            n: self.n,
            window_complete,
            negotiated_dt: self.dt,
        })
    }

    fn finalize(&mut self) -> Result<()> {
        if !self.initialized {
            return Err(Error::Adapter("finalize before initialize".to_string()));
        }
        if self.finalized {
            return Err(Error::Adapter("finalize called twice".to_string()));
        }
        self.finalized = true;
        Ok(())
    }
}
