use crate::util::*;

/// Extents of the full rectangle and the x coordinate of the coupling
/// interface that splits it into the two participant halves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainGeometry {
    pub x_left: f64,
    pub x_right: f64,
    pub y_bottom: f64,
    pub y_top: f64,
    pub x_coupling: f64,
}

impl DomainGeometry {
    /// The partitioned heat setup: [0, 2] x [0, 1] split at x = 1.5.
    pub fn partitioned_rectangle() -> Self {
        DomainGeometry {
            x_left: 0.0,
            x_right: 2.0,
            y_bottom: 0.0,
            y_top: 1.0,
            x_coupling: 1.5,
        }
    }
}

/// Predicate for points on the coupling interface. The two corner points of
/// the interface line belong to the complementary boundary so that the two
/// predicates partition the boundary without double classification.
#[derive(Debug, Clone, Copy)]
pub struct CouplingBoundary {
    geometry: DomainGeometry,
}

impl CouplingBoundary {
    pub fn new(geometry: DomainGeometry) -> Self {
        CouplingBoundary { geometry }
    }

    pub fn contains(&self, point: &Point) -> bool {
        let g = &self.geometry;
        near(point.x, g.x_coupling, GEOM_EPS)
            && point.y > g.y_bottom
            && point.y < g.y_top
            && !near(point.y, g.y_bottom, GEOM_EPS)
            && !near(point.y, g.y_top, GEOM_EPS)
    }
}

/// Predicate for boundary points not on the coupling interface.
#[derive(Debug, Clone, Copy)]
pub struct ComplementaryBoundary {
    complement: CouplingBoundary,
}

impl ComplementaryBoundary {
    pub fn new(geometry: DomainGeometry) -> Self {
        ComplementaryBoundary {
            complement: CouplingBoundary::new(geometry),
        }
    }

    pub fn contains(&self, point: &Point, on_boundary: bool) -> bool {
        on_boundary && !self.complement.contains(point)
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn sample_boundary_points(g: &DomainGeometry) -> Vec<Point> {
        let mut points = Vec::new();
        let samples = 40;
        for k in 0..=samples {
            let s = k as f64 / samples as f64;
            let x = g.x_left + s * (g.x_right - g.x_left);
            let y = g.y_bottom + s * (g.y_top - g.y_bottom);
            points.push(Point::new(x, g.y_bottom));
            points.push(Point::new(x, g.y_top));
            points.push(Point::new(g.x_left, y));
            points.push(Point::new(g.x_right, y));
            // interface line is part of both half-domain boundaries
            points.push(Point::new(g.x_coupling, y));
        }
        points
    }

    #[test]
    fn interface_hits_interior_of_coupling_line() {
        let g = DomainGeometry::partitioned_rectangle();
        let interface = CouplingBoundary::new(g);
        assert!(interface.contains(&Point::new(1.5, 0.5)));
        assert!(interface.contains(&Point::new(1.5, 1e-3)));
        assert!(!interface.contains(&Point::new(1.5, 0.0)));
        assert!(!interface.contains(&Point::new(1.5, 1.0)));
        assert!(!interface.contains(&Point::new(1.0, 0.5)));
        assert!(!interface.contains(&Point::new(1.5 + 1e-9, 0.5)));
    }

    #[test]
    fn tolerance_absorbs_roundoff() {
        let g = DomainGeometry::partitioned_rectangle();
        let interface = CouplingBoundary::new(g);
        assert!(interface.contains(&Point::new(1.5 + 1e-15, 0.5)));
        assert!(!interface.contains(&Point::new(1.5, 1.0 - 1e-16)));
    }

    #[test]
    fn predicates_partition_the_boundary() {
        let g = DomainGeometry::partitioned_rectangle();
        let interface = CouplingBoundary::new(g);
        let complement = ComplementaryBoundary::new(g);
        for p in sample_boundary_points(&g) {
            let on_interface = interface.contains(&p);
            let on_complement = complement.contains(&p, true);
            assert!(
                on_interface != on_complement,
                "point ({}, {}) must be classified exactly once",
                p.x,
                p.y
            );
        }
    }

    #[test]
    fn complement_requires_boundary_flag() {
        let g = DomainGeometry::partitioned_rectangle();
        let complement = ComplementaryBoundary::new(g);
        assert!(!complement.contains(&Point::new(0.3, 0.3), false));
        assert!(complement.contains(&Point::new(0.0, 0.3), true));
    }
}
