use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Exactly one of the two participant roles must be selected.
    #[error("choose either the dirichlet participant (-d) or the neumann participant (-n)")]
    RoleSelection,

    /// An interior dof carried a non-negligible residual during flux
    /// extraction. This indicates a defective mesh/assembly setup and the
    /// run must stop rather than send bad boundary data to the partner.
    #[error("flux consistency violated: interior dof {index} carries residual {residual:e}")]
    FluxConsistency { index: usize, residual: f64 },

    /// Aggregate error against the manufactured solution exceeded the
    /// configured tolerance.
    #[error("verification failed: aggregate error {error:e} exceeds tolerance {tolerance:e}")]
    Verification { error: f64, tolerance: f64 },

    /// The coupling adapter was used outside its initialize/advance/finalize
    /// protocol or reported a failure.
    #[error("coupling adapter: {0}")]
    Adapter(String),

    #[error("linear solve failed: system matrix is singular")]
    SingularSystem,

    #[error("writing output failed: {0}")]
    Output(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
