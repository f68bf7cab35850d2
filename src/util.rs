pub type Point = nalgebra::Point2<f64>;
pub type DofVector = nalgebra::DVector<f64>;

/// Tolerance for classifying mesh points against geometric features.
pub const GEOM_EPS: f64 = 1e-14;

#[inline]
pub fn near(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
