pub mod adapter;
pub mod config;
pub mod controller;
pub mod error;
pub mod fem;
pub mod field;
pub mod flux;
pub mod geometry;
pub mod manufactured;
pub mod solver_interface;
pub mod space;
pub mod util;
pub mod verify;
pub mod vtk;
