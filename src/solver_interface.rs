use crate::adapter::CouplingCondition;
use crate::error::Result;
use crate::field::Field;
use crate::space::FunctionSpace;
use crate::util::*;

/// All participant solvers should adhere to this interface.
///
/// One implicit step advances the temperature from `previous` to the target
/// time under the partner's coupling condition on the interface; the weak
/// residual of that step equation feeds the flux extraction on the
/// Dirichlet side.
pub trait SolverInterface {
    fn space(&self) -> &FunctionSpace;

    /// Step size this solver would take if the coupling library imposed no
    /// constraint.
    fn preferred_dt(&self) -> f64;

    /// Solve one backward Euler step targeting `t_next = t + dt`.
    fn step(
        &self,
        previous: &Field,
        coupling: &CouplingCondition,
        t_next: f64,
        dt: f64,
    ) -> Result<Field>;

    /// Weak residual of the step equation with `solved` substituted,
    /// assembled over the full domain without boundary elimination.
    fn assemble_residual(
        &self,
        solved: &Field,
        previous: &Field,
        t_next: f64,
        dt: f64,
    ) -> DofVector;

    /// Surface integral of each test function over the domain boundary.
    fn boundary_measures(&self) -> DofVector;
}
