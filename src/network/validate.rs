//! Network sanity checks.

use std::fmt;

use super::{MeshId, Network};

/// A legal but suspicious network feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkWarning {
    /// Mesh has no resistors and no current source, so KVL cannot fix its current
    UndeterminedMesh(MeshId),
    /// Mesh shares no resistor with any other mesh
    IsolatedMesh(MeshId),
}

impl fmt::Display for NetworkWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndeterminedMesh(id) => {
                write!(f, "{} has no resistors and no current source", id)
            }
            Self::IsolatedMesh(id) => write!(f, "{} shares no resistor with another mesh", id),
        }
    }
}

/// Inspect a network for features that usually indicate an input mistake.
///
/// Checks:
/// - Meshes whose current is not constrained by any resistor or source
/// - Meshes isolated from the rest of a multi-mesh network
///
/// Neither stops the analysis; an undetermined mesh surfaces later as a
/// singular system.
pub fn validate_network(network: &Network) -> Vec<NetworkWarning> {
    let mut warnings = Vec::new();

    for mesh in network.meshes() {
        if mesh.resistors.is_empty() && !mesh.is_fixed() {
            warnings.push(NetworkWarning::UndeterminedMesh(mesh.id));
        }
        if network.mesh_count() > 1 && network.partners(mesh.id).next().is_none() {
            warnings.push(NetworkWarning::IsolatedMesh(mesh.id));
        }
    }

    warnings
}
