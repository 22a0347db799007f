//! # Mesh Core
//!
//! Mesh-current analysis of planar resistive networks.
//!
//! This library provides:
//! - A network model of meshes, their resistors, voltage and current sources,
//!   and the resistors shared between adjacent meshes
//! - KVL equation formulation with current-source constraints
//! - A direct dense linear solver for the mesh currents
//! - A small text format for describing networks
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`dsl`] - Parser for the mesh description language
//! - [`network`] - Network builder and the frozen network model
//! - [`solver`] - Equation building and LU solving
//! - [`report`] - Magnitude and direction of each solved current
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! meshsolve ladder.mesh --equations
//! ```
//!
//! ### Library
//!
//! ```
//! use mesh_core::{MeshAnalysis, MeshId, NetworkBuilder};
//!
//! let mut builder = NetworkBuilder::new(2)?;
//! builder.add_resistors(MeshId(1), &[10.0])?;
//! builder.add_voltage_sources(MeshId(1), &[10.0])?;
//! builder.add_resistors(MeshId(2), &[5.0])?;
//! builder.set_coupling(MeshId(1), MeshId(2), 5.0)?;
//!
//! let result = MeshAnalysis::new(builder.build()).run()?;
//! assert!((result.currents[0].value + 2.0).abs() < 1e-9);
//! # Ok::<(), mesh_core::MeshError>(())
//! ```
//!
//! ## Analysis Method
//!
//! Every mesh is assigned one clockwise loop current. For each mesh:
//!
//! 1. If a current source forces the mesh, its row pins the current
//! 2. Otherwise KVL around the mesh gives one linear equation
//! 3. The square system is factored with LU and solved directly
//!
//! Any failure aborts the analysis as a whole.

pub mod dsl;
pub mod error;
pub mod network;
pub mod report;
pub mod solver;

// Re-export main types for convenience
pub use error::{MeshError, Result};
pub use network::{MeshId, Network, NetworkBuilder};
pub use report::{Direction, MeshCurrent};
pub use solver::{AnalysisConfig, AnalysisResult, MeshAnalysis};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmMeshAnalysis;

/// Parse a mesh description and solve it with the given configuration.
pub fn analyze_with_config(description: &str, config: AnalysisConfig) -> Result<AnalysisResult> {
    let ast = dsl::parse(description)?;
    let network = NetworkBuilder::from_ast(ast)?.build();
    MeshAnalysis::with_config(network, config).run()
}

/// Parse a mesh description and solve it.
pub fn analyze(description: &str) -> Result<AnalysisResult> {
    analyze_with_config(description, AnalysisConfig::default())
}
