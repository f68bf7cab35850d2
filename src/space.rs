use crate::field::Field;
use crate::geometry::CouplingBoundary;
use crate::util::*;

/// P1 nodal function space over a structured rectangle mesh.
///
/// Cells are split into two triangles each (lower-right diagonal), nodes are
/// numbered x-fastest. This is the mesh family the verification solver and
/// the output writer agree on; dof indices double as node indices.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSpace {
    min: Point,
    max: Point,
    nx: usize,
    ny: usize,
}

impl FunctionSpace {
    pub fn new(min: Point, max: Point, nx: usize, ny: usize) -> Self {
        assert!(nx > 0 && ny > 0);
        assert!(max.x > min.x && max.y > min.y);
        FunctionSpace { min, max, nx, ny }
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    pub fn corners(&self) -> (Point, Point) {
        (self.min, self.max)
    }

    pub fn dx(&self) -> f64 {
        (self.max.x - self.min.x) / self.nx as f64
    }

    pub fn dy(&self) -> f64 {
        (self.max.y - self.min.y) / self.ny as f64
    }

    pub fn dof_count(&self) -> usize {
        (self.nx + 1) * (self.ny + 1)
    }

    #[inline]
    pub fn node_index(&self, ix: usize, iy: usize) -> usize {
        debug_assert!(ix <= self.nx && iy <= self.ny);
        iy * (self.nx + 1) + ix
    }

    pub fn node(&self, dof: usize) -> Point {
        let ix = dof % (self.nx + 1);
        let iy = dof / (self.nx + 1);
        Point::new(
            self.min.x + ix as f64 * self.dx(),
            self.min.y + iy as f64 * self.dy(),
        )
    }

    pub fn nodes(&self) -> impl Iterator<Item = (usize, Point)> + '_ {
        (0..self.dof_count()).map(|dof| (dof, self.node(dof)))
    }

    pub fn is_on_boundary(&self, p: &Point) -> bool {
        near(p.x, self.min.x, GEOM_EPS)
            || near(p.x, self.max.x, GEOM_EPS)
            || near(p.y, self.min.y, GEOM_EPS)
            || near(p.y, self.max.y, GEOM_EPS)
    }

    /// Triangles as dof triples, counterclockwise.
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        let mut tris = Vec::with_capacity(2 * self.nx * self.ny);
        for j in 0..self.ny {
            for i in 0..self.nx {
                let s = self.node_index(i, j);
                let e = self.node_index(i + 1, j);
                let ne = self.node_index(i + 1, j + 1);
                let n = self.node_index(i, j + 1);
                tris.push([s, e, ne]);
                tris.push([s, ne, n]);
            }
        }
        tris
    }

    /// Quads as dof quadruples, for output cells.
    pub fn quads(&self) -> Vec<[usize; 4]> {
        let mut quads = Vec::with_capacity(self.nx * self.ny);
        for j in 0..self.ny {
            for i in 0..self.nx {
                quads.push([
                    self.node_index(i, j),
                    self.node_index(i + 1, j),
                    self.node_index(i + 1, j + 1),
                    self.node_index(i, j + 1),
                ]);
            }
        }
        quads
    }

    /// Nodal quadrature weights, the row sums of the consistent mass matrix.
    pub fn lumped_mass(&self) -> DofVector {
        let area_third = self.dx() * self.dy() / 6.0;
        let mut weights = DofVector::zeros(self.dof_count());
        for tri in self.triangles() {
            for dof in tri {
                weights[dof] += area_third;
            }
        }
        weights
    }

    /// Assembled surface integral of each test function over the full
    /// boundary; zero on interior dofs.
    pub fn boundary_measures(&self) -> DofVector {
        let mut measures = DofVector::zeros(self.dof_count());
        let half_dx = self.dx() / 2.0;
        let half_dy = self.dy() / 2.0;
        for i in 0..self.nx {
            for iy in [0, self.ny] {
                measures[self.node_index(i, iy)] += half_dx;
                measures[self.node_index(i + 1, iy)] += half_dx;
            }
        }
        for j in 0..self.ny {
            for ix in [0, self.nx] {
                measures[self.node_index(ix, j)] += half_dy;
                measures[self.node_index(ix, j + 1)] += half_dy;
            }
        }
        measures
    }

    /// Assembled surface integral of each test function over the vertical
    /// edge column `ix` only (0 or nx for the two sides).
    pub fn column_measures(&self, ix: usize) -> DofVector {
        let mut measures = DofVector::zeros(self.dof_count());
        let half_dy = self.dy() / 2.0;
        for j in 0..self.ny {
            measures[self.node_index(ix, j)] += half_dy;
            measures[self.node_index(ix, j + 1)] += half_dy;
        }
        measures
    }

    /// Dofs whose node lies on the coupling interface.
    pub fn interface_dofs(&self, interface: &CouplingBoundary) -> Vec<usize> {
        self.nodes()
            .filter(|(_, p)| interface.contains(p))
            .map(|(dof, _)| dof)
            .collect()
    }

    /// Nodal interpolation of a closed-form expression.
    pub fn interpolate<F: Fn(&Point) -> f64>(&self, name: &str, f: F) -> Field {
        let values = DofVector::from_iterator(
            self.dof_count(),
            (0..self.dof_count()).map(|dof| f(&self.node(dof))),
        );
        Field::new(name, values)
    }
}
