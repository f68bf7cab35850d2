use crate::error::{Error, Result};
use crate::geometry::DomainGeometry;
use crate::util::*;
use clap::Parser;
use std::path::PathBuf;

/// Base mesh resolution per half domain; the Dirichlet half is refined by
/// three in x, matching its longer extent.
pub const BASE_NX: usize = 10;
pub const BASE_NY: usize = 10;
pub const DIRICHLET_X_REFINEMENT: usize = 3;

/// Aggregate error tolerance used for verification against the
/// manufactured solution.
pub const ERROR_TOL: f64 = 1e-12;

/// Which boundary condition this participant enforces on the interface.
/// The Dirichlet participant sends flux and receives temperature; the
/// Neumann participant the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Dirichlet,
    Neumann,
}

impl Role {
    /// Validate the mutually exclusive CLI flags.
    pub fn from_flags(dirichlet: bool, neumann: bool) -> Result<Role> {
        match (dirichlet, neumann) {
            (true, false) => Ok(Role::Dirichlet),
            (false, true) => Ok(Role::Neumann),
            _ => Err(Error::RoleSelection),
        }
    }

    /// Tag used in adapter config file names and output series.
    pub fn tag(&self) -> &'static str {
        match self {
            Role::Dirichlet => "D",
            Role::Neumann => "N",
        }
    }

    pub fn partner(&self) -> Role {
        match self {
            Role::Dirichlet => Role::Neumann,
            Role::Neumann => Role::Dirichlet,
        }
    }
}

/// Partitioned heat participant.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Run the Dirichlet participant (receives temperature, sends flux).
    #[arg(short = 'd', long)]
    pub dirichlet: bool,

    /// Run the Neumann participant (receives flux, sends temperature).
    #[arg(short = 'n', long)]
    pub neumann: bool,

    /// Waveform relaxation orders for the Dirichlet and Neumann participants.
    #[arg(
        short = 'w',
        long,
        visible_alias = "wr",
        num_args = 2,
        value_names = ["WR1", "WR2"],
        default_values_t = [1u32, 1u32]
    )]
    pub waveform: Vec<u32>,

    /// Coupling window size.
    #[arg(short = 'T', long = "window-size", visible_alias = "dT", default_value_t = 1.0)]
    pub window_size: f64,

    /// Coupling scheme tag used to locate the adapter configs.
    #[arg(
        short = 'c',
        long = "coupling-scheme",
        visible_alias = "cpl",
        default_value = "SERIAL_FIRST_DIRICHLET"
    )]
    pub coupling_scheme: String,

    /// Directory for per-window field output series, created if missing.
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,
}

/// Resolved run configuration. Built deterministically from the CLI flags,
/// so identical invocations locate identical experiment artifacts.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub role: Role,
    pub waveform: (u32, u32),
    pub window_size: f64,
    pub coupling_scheme: String,
    pub adapter_config: PathBuf,
    pub partner_adapter_config: PathBuf,
    pub geometry: DomainGeometry,
    pub output_dir: Option<PathBuf>,
}

impl RunConfig {
    pub fn resolve(args: &Args) -> Result<RunConfig> {
        let role = Role::from_flags(args.dirichlet, args.neumann)?;
        assert_eq!(args.waveform.len(), 2);
        let waveform = (args.waveform[0], args.waveform[1]);
        let configs_path = Self::configs_path(waveform, args.window_size, &args.coupling_scheme);
        Ok(RunConfig {
            role,
            waveform,
            window_size: args.window_size,
            coupling_scheme: args.coupling_scheme.clone(),
            adapter_config: configs_path.join(Self::adapter_config_name(role)),
            partner_adapter_config: configs_path.join(Self::adapter_config_name(role.partner())),
            geometry: DomainGeometry::partitioned_rectangle(),
            output_dir: args.output_dir.clone(),
        })
    }

    fn configs_path(waveform: (u32, u32), window_size: f64, scheme: &str) -> PathBuf {
        PathBuf::from("experiments")
            .join(format!("WR{}{}", waveform.0, waveform.1))
            .join(format!("dT{window_size:?}"))
            .join(scheme)
    }

    fn adapter_config_name(role: Role) -> String {
        format!("precice-adapter-config-{}.json", role.tag())
    }

    /// Waveform relaxation order of this participant, the number of solver
    /// sub-steps per shared window.
    pub fn substeps(&self) -> u32 {
        match self.role {
            Role::Dirichlet => self.waveform.0.max(1),
            Role::Neumann => self.waveform.1.max(1),
        }
    }

    /// Step size this participant prefers before negotiation.
    pub fn preferred_dt(&self) -> f64 {
        self.window_size / self.substeps() as f64
    }

    /// Corner points and resolution of this participant's half domain.
    pub fn mesh_extents(&self) -> (Point, Point, usize, usize) {
        let g = &self.geometry;
        match self.role {
            Role::Dirichlet => (
                Point::new(g.x_left, g.y_bottom),
                Point::new(g.x_coupling, g.y_top),
                BASE_NX * DIRICHLET_X_REFINEMENT,
                BASE_NY,
            ),
            Role::Neumann => (
                Point::new(g.x_coupling, g.y_bottom),
                Point::new(g.x_right, g.y_top),
                BASE_NX,
                BASE_NY,
            ),
        }
    }
}
