//! Mesh equation formulation and solving.
//!
//! Mesh analysis assembles one equation per mesh into a square system
//! Ax = b where x holds the clockwise mesh currents:
//!
//! ```text
//! free mesh m:    R_m * i_m  -  sum_j C_mj * i_j  =  -sum V_m
//! fixed mesh m:   i_m                              =  -I_m
//! ```
//!
//! where:
//! - R_m is the sum of the resistors around mesh m
//! - C_mj is the resistance shared by meshes m and j
//! - V_m are the signed voltage sources of mesh m
//! - I_m is the current source forcing mesh m
//!
//! The system is solved directly with LU decomposition and partial pivoting.

mod analysis;
mod dense;
mod equation;

pub use analysis::{AnalysisConfig, AnalysisResult, MeshAnalysis};
pub use dense::{solve, LinearSystem, Solution};
pub use equation::{build_equations, Equation, KvlEquation};

/// Relative pivot magnitude below which the system is treated as singular.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-12;

/// Decimal places used when reporting current magnitudes.
pub const DEFAULT_PRECISION: u32 = 2;
