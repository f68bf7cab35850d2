use crate::error::{Error, Result};
use crate::field::Field;
use crate::space::FunctionSpace;

/// Outcome of scoring a numerical field against the reference field.
#[derive(Debug, Clone)]
pub struct ErrorAssessment {
    /// Mass-weighted L2 norm of the pointwise error.
    pub total: f64,
    /// Signed nodal difference, for diagnostic output.
    pub pointwise: Field,
    /// Set iff a tolerance was supplied.
    pub within_tolerance: Option<bool>,
}

impl ErrorAssessment {
    /// Escalate a verification failure into an error, for regression
    /// gating. Passing or unchecked assessments return Ok.
    pub fn check(&self, tolerance: f64) -> Result<()> {
        if self.total > tolerance {
            return Err(Error::Verification {
                error: self.total,
                tolerance,
            });
        }
        Ok(())
    }
}

/// Pointwise and aggregate error of `numerical` against `reference`.
///
/// The aggregate is a lumped-mass weighted L2 norm of the nodal error, the
/// discrete analogue of the continuous L2 error of the interpolant. A
/// supplied tolerance only flags the assessment; callers decide whether to
/// escalate.
pub fn compute_errors(
    numerical: &Field,
    reference: &Field,
    space: &FunctionSpace,
    tolerance: Option<f64>,
) -> ErrorAssessment {
    assert_eq!(numerical.len(), space.dof_count());
    assert_eq!(reference.len(), space.dof_count());
    let pointwise = Field::new("error", numerical.values() - reference.values());
    let weights = space.lumped_mass();
    let total = pointwise
        .values()
        .iter()
        .zip(weights.iter())
        .map(|(e, w)| w * e * e)
        .sum::<f64>()
        .sqrt();
    let within_tolerance = tolerance.map(|tol| total <= tol);
    ErrorAssessment {
        total,
        pointwise,
        within_tolerance,
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::util::*;
    use float_cmp::assert_approx_eq;

    fn unit_space() -> FunctionSpace {
        FunctionSpace::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0), 4, 4)
    }

    #[test]
    fn identical_fields_have_zero_error() {
        let space = unit_space();
        let u = space.interpolate("Temperature", |p| 1.0 + p.x * p.x);
        let assessment = compute_errors(&u, &u, &space, Some(1e-12));
        assert_approx_eq!(f64, assessment.total, 0.0);
        assert_eq!(assessment.within_tolerance, Some(true));
        assert!(assessment.check(1e-12).is_ok());
    }

    #[test]
    fn constant_offset_recovers_the_l2_norm() {
        let space = unit_space();
        let u = space.interpolate("Temperature", |_| 2.0);
        let reference = space.interpolate("reference", |_| 1.5);
        let assessment = compute_errors(&u, &reference, &space, None);
        // ||0.5||_L2 over the unit square
        assert_approx_eq!(f64, assessment.total, 0.5, epsilon = 1e-12);
        assert_eq!(assessment.within_tolerance, None);
        assert_approx_eq!(f64, assessment.pointwise.values()[3], 0.5);
    }

    #[test]
    fn exceeding_the_tolerance_flags_and_escalates() {
        let space = unit_space();
        let u = space.interpolate("Temperature", |_| 1.0);
        let reference = space.interpolate("reference", |_| 0.0);
        let assessment = compute_errors(&u, &reference, &space, Some(1e-3));
        assert_eq!(assessment.within_tolerance, Some(false));
        match assessment.check(1e-3) {
            Err(Error::Verification { error, tolerance }) => {
                assert_approx_eq!(f64, error, 1.0, epsilon = 1e-12);
                assert_approx_eq!(f64, tolerance, 1e-3);
            }
            other => panic!("expected a verification failure, got {other:?}"),
        }
    }
}
