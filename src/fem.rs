use crate::adapter::CouplingCondition;
use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::field::Field;
use crate::geometry::{ComplementaryBoundary, CouplingBoundary, DomainGeometry};
use crate::manufactured::ManufacturedSolution;
use crate::solver_interface::SolverInterface;
use crate::space::FunctionSpace;
use crate::util::*;
use nalgebra::DMatrix;

/// P1 finite element heat solver on one half of the split rectangle.
///
/// Backward Euler with consistent mass,
///
///   (M/dt + K) u+ = M (u_n/dt + f) + interface flux terms,
///
/// Dirichlet rows replaced after assembly. On the structured triangulation
/// this is nodally exact for the manufactured solution, which is what the
/// 1e-12 verification bounds rely on.
pub struct HeatSolver {
    space: FunctionSpace,
    solution: ManufacturedSolution,
    mass: DMatrix<f64>,
    stiffness: DMatrix<f64>,
    complement_dofs: Vec<usize>,
    interface_dofs: Vec<usize>,
    interface_measures: DofVector,
    /// x component of the outward normal on the coupling side.
    normal_x: f64,
    preferred_dt: f64,
}

impl HeatSolver {
    pub fn new(
        space: FunctionSpace,
        geometry: DomainGeometry,
        solution: ManufacturedSolution,
        preferred_dt: f64,
    ) -> Result<Self> {
        let (min, max) = space.corners();
        let (nx, _) = space.resolution();
        let (coupling_column, normal_x) = if near(min.x, geometry.x_coupling, GEOM_EPS) {
            (0, -1.0)
        } else if near(max.x, geometry.x_coupling, GEOM_EPS) {
            (nx, 1.0)
        } else {
            return Err(Error::Adapter(
                "mesh does not touch the coupling interface".to_string(),
            ));
        };

        let interface = CouplingBoundary::new(geometry);
        let complement = ComplementaryBoundary::new(geometry);
        let interface_dofs = space.interface_dofs(&interface);
        let complement_dofs: Vec<usize> = space
            .nodes()
            .filter(|(_, p)| complement.contains(p, space.is_on_boundary(p)))
            .map(|(dof, _)| dof)
            .collect();
        let interface_measures = space.column_measures(coupling_column);
        let (mass, stiffness) = assemble(&space);

        Ok(HeatSolver {
            space,
            solution,
            mass,
            stiffness,
            complement_dofs,
            interface_dofs,
            interface_measures,
            normal_x,
            preferred_dt,
        })
    }

    /// Build the half-domain solver for the configured role.
    pub fn for_role(config: &RunConfig, solution: ManufacturedSolution) -> Result<Self> {
        let (p0, p1, nx, ny) = config.mesh_extents();
        let space = FunctionSpace::new(p0, p1, nx, ny);
        HeatSolver::new(space, config.geometry, solution, config.preferred_dt())
    }

    pub fn interface_dofs(&self) -> &[usize] {
        &self.interface_dofs
    }

    fn source_vector(&self, t: f64) -> DofVector {
        let solution = self.solution;
        DofVector::from_iterator(
            self.space.dof_count(),
            self.space.nodes().map(|(_, p)| solution.source(&p, t)),
        )
    }

    fn constrain(system: &mut DMatrix<f64>, rhs: &mut DofVector, dof: usize, value: f64) {
        system.row_mut(dof).fill(0.0);
        system[(dof, dof)] = 1.0;
        rhs[dof] = value;
    }
}

/// Consistent mass and stiffness over the triangulated space.
fn assemble(space: &FunctionSpace) -> (DMatrix<f64>, DMatrix<f64>) {
    let n = space.dof_count();
    let mut mass = DMatrix::zeros(n, n);
    let mut stiffness = DMatrix::zeros(n, n);
    for tri in space.triangles() {
        let p: Vec<Point> = tri.iter().map(|&dof| space.node(dof)).collect();
        let area = 0.5
            * ((p[1].x - p[0].x) * (p[2].y - p[0].y) - (p[2].x - p[0].x) * (p[1].y - p[0].y));
        debug_assert!(area > 0.0);
        let b = [
            (p[1].y - p[2].y) / (2.0 * area),
            (p[2].y - p[0].y) / (2.0 * area),
            (p[0].y - p[1].y) / (2.0 * area),
        ];
        let c = [
            (p[2].x - p[1].x) / (2.0 * area),
            (p[0].x - p[2].x) / (2.0 * area),
            (p[1].x - p[0].x) / (2.0 * area),
        ];
        for a in 0..3 {
            for d in 0..3 {
                stiffness[(tri[a], tri[d])] += area * (b[a] * b[d] + c[a] * c[d]);
                let m = if a == d { 2.0 } else { 1.0 };
                mass[(tri[a], tri[d])] += area / 12.0 * m;
            }
        }
    }
    (mass, stiffness)
}

impl SolverInterface for HeatSolver {
    fn space(&self) -> &FunctionSpace {
        &self.space
    }

    fn preferred_dt(&self) -> f64 {
        self.preferred_dt
    }

    fn step(
        &self,
        previous: &Field,
        coupling: &CouplingCondition,
        t_next: f64,
        dt: f64,
    ) -> Result<Field> {
        let mut system = &self.mass / dt + &self.stiffness;
        let mut rhs = &self.mass * (previous.values() / dt + self.source_vector(t_next));

        match coupling {
            CouplingCondition::Neumann(values) => {
                // boundary term of the weak form: flux is du/dx, scaled by
                // the outward normal of this half and the edge measure
                for (dof, g) in values.iter() {
                    rhs[dof] += self.normal_x * g * self.interface_measures[dof];
                }
            }
            CouplingCondition::Dirichlet(values) => {
                for (dof, value) in values.iter() {
                    Self::constrain(&mut system, &mut rhs, dof, value);
                }
            }
        }
        for &dof in &self.complement_dofs {
            let p = self.space.node(dof);
            Self::constrain(&mut system, &mut rhs, dof, self.solution.u(&p, t_next));
        }

        let solved = system
            .lu()
            .solve(&rhs)
            .ok_or(Error::SingularSystem)?;
        Ok(Field::new(previous.name(), solved))
    }

    fn assemble_residual(
        &self,
        solved: &Field,
        previous: &Field,
        t_next: f64,
        dt: f64,
    ) -> DofVector {
        let rate = (solved.values() - previous.values()) / dt;
        &self.mass * (rate - self.source_vector(t_next)) + &self.stiffness * solved.values()
    }

    fn boundary_measures(&self) -> DofVector {
        self.space.boundary_measures()
    }
}
