//! Network model for mesh analysis.
//!
//! This module holds the description of a planar resistive network as a set
//! of meshes. Elements are accumulated through a [`NetworkBuilder`] during the
//! input phase, which is then frozen into an immutable [`Network`] that the
//! equation builder reads from.

mod model;
mod types;
mod validate;

pub use model::{Coupling, Network, NetworkBuilder, NetworkSummary};
pub use types::*;
pub use validate::{validate_network, NetworkWarning};

/// Largest mesh count accepted by [`NetworkBuilder::new`].
///
/// The solver works on a dense N×N matrix, so this bounds its memory to a few
/// megabytes.
pub const MAX_MESHES: usize = 1024;
