use crate::util::*;

/// Manufactured solution family for the partitioned heat problem,
///
///   u = 1 + gamma*t*x^2 + (1 - gamma)*x^2 + alpha*y^2 + beta*t
///
/// with matching source term so u solves u_t = laplace(u) + f exactly.
/// Quadratic in space and linear in time, so backward Euler on the P1
/// discretization reproduces it at the nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManufacturedSolution {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Default for ManufacturedSolution {
    fn default() -> Self {
        ManufacturedSolution {
            alpha: 3.0,
            beta: 1.3,
            gamma: 0.0,
        }
    }
}

impl ManufacturedSolution {
    /// Exact temperature.
    pub fn u(&self, p: &Point, t: f64) -> f64 {
        1.0 + self.gamma * t * p.x * p.x
            + (1.0 - self.gamma) * p.x * p.x
            + self.alpha * p.y * p.y
            + self.beta * t
    }

    /// Source term of the heat equation.
    pub fn source(&self, p: &Point, t: f64) -> f64 {
        self.beta + self.gamma * p.x * p.x
            - 2.0 * self.gamma * t
            - 2.0 * (1.0 - self.gamma)
            - 2.0 * self.alpha
    }

    /// du/dx, the flux exchanged across the vertical interface.
    pub fn flux_x(&self, p: &Point, t: f64) -> f64 {
        2.0 * self.gamma * t * p.x + 2.0 * (1.0 - self.gamma) * p.x
    }
}
