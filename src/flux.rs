use crate::error::{Error, Result};
use crate::field::Field;
use crate::util::*;

/// Residual magnitude tolerated on dofs with no boundary measure.
pub const INTERIOR_RESIDUAL_TOL: f64 = 1e-10;

/// Convert an assembled weak residual into a boundary-normal flux field.
///
/// Each nodal residual is scaled by the boundary measure of its test
/// function (the assembled surface integral), which turns the
/// volume-integrated residual into a flux usable as the partner's Neumann
/// datum. Interior dofs have zero measure and must carry a (numerically)
/// zero residual; anything else means the assembly upstream is broken and
/// the value is not allowed to reach the partner.
pub fn fluxes_from_residual(
    residual: &DofVector,
    boundary_measure: &DofVector,
    name: &str,
) -> Result<Field> {
    assert_eq!(residual.len(), boundary_measure.len());
    let mut flux = DofVector::zeros(residual.len());
    for i in 0..residual.len() {
        if boundary_measure[i] != 0.0 {
            flux[i] = residual[i] / boundary_measure[i];
        } else {
            if residual[i].abs() >= INTERIOR_RESIDUAL_TOL {
                return Err(Error::FluxConsistency {
                    index: i,
                    residual: residual[i],
                });
            }
            flux[i] = residual[i];
        }
    }
    Ok(Field::new(name, flux))
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn scales_by_boundary_measure() {
        let residual = DofVector::from_vec(vec![0.3, 1e-14, -0.05, 0.0]);
        let measure = DofVector::from_vec(vec![0.1, 0.0, 0.025, 0.05]);
        let flux = fluxes_from_residual(&residual, &measure, "Flux").unwrap();
        assert_eq!(flux.name(), "Flux");
        assert_approx_eq!(f64, flux.values()[0], 3.0, epsilon = 1e-12);
        assert_approx_eq!(f64, flux.values()[2], -2.0, epsilon = 1e-12);
        assert_approx_eq!(f64, flux.values()[3], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn interior_residual_passes_through_unscaled() {
        let residual = DofVector::from_vec(vec![5e-11]);
        let measure = DofVector::from_vec(vec![0.0]);
        let flux = fluxes_from_residual(&residual, &measure, "Flux").unwrap();
        assert_approx_eq!(f64, flux.values()[0], 5e-11);
    }

    #[test]
    fn interior_residual_above_tolerance_is_fatal() {
        let residual = DofVector::from_vec(vec![0.0, 1e-9]);
        let measure = DofVector::from_vec(vec![0.1, 0.0]);
        let err = fluxes_from_residual(&residual, &measure, "Flux").unwrap_err();
        match err {
            Error::FluxConsistency { index, residual } => {
                assert_eq!(index, 1);
                assert_approx_eq!(f64, residual, 1e-9);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
