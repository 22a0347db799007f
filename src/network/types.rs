//! Core types for the network model.

use std::fmt;

/// Identifier of a mesh. Meshes are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub usize);

impl MeshId {
    /// Zero-based index of this mesh in the unknown vector.
    pub fn index(&self) -> usize {
        self.0 - 1
    }

    /// Mesh id for a zero-based unknown index.
    pub fn from_index(index: usize) -> Self {
        MeshId(index + 1)
    }

    /// Name of the unknown current of this mesh (`i1`, `i2`, ...).
    pub fn current_symbol(&self) -> String {
        format!("i{}", self.0)
    }
}

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mesh {}", self.0)
    }
}

/// Elements owned by a single mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub id: MeshId,
    /// Resistor magnitudes in Ohms, in insertion order
    pub resistors: Vec<f64>,
    /// Signed voltage source values in Volts (positive aids clockwise current)
    pub voltages: Vec<f64>,
    /// Current forced by an ideal current source, if any
    pub fixed_current: Option<f64>,
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new(id: MeshId) -> Self {
        Self {
            id,
            resistors: Vec::new(),
            voltages: Vec::new(),
            fixed_current: None,
        }
    }

    /// Sum of the resistors in this mesh.
    pub fn total_resistance(&self) -> f64 {
        self.resistors.iter().sum()
    }

    /// Sum of the signed voltage sources in this mesh.
    pub fn total_voltage(&self) -> f64 {
        self.voltages.iter().sum()
    }

    /// Check if this mesh current is forced by a current source.
    pub fn is_fixed(&self) -> bool {
        self.fixed_current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_id_index() {
        assert_eq!(MeshId(1).index(), 0);
        assert_eq!(MeshId::from_index(2), MeshId(3));
        assert_eq!(MeshId(4).current_symbol(), "i4");
        assert_eq!(MeshId(2).to_string(), "Mesh 2");
    }

    #[test]
    fn test_mesh_totals() {
        let mut mesh = Mesh::new(MeshId(1));
        mesh.resistors = vec![2.0, 5.0, 10.0];
        mesh.voltages = vec![-5.0, 10.0];
        assert_eq!(mesh.total_resistance(), 17.0);
        assert_eq!(mesh.total_voltage(), 5.0);
        assert!(!mesh.is_fixed());
    }
}
