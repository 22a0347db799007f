//! Network builder and the frozen network model.

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, warn};

use super::types::{Mesh, MeshId};
use super::MAX_MESHES;
use crate::dsl::{ElementKind, MeshAst};
use crate::error::{MeshError, Result};

/// A resistor shared by the boundary of two adjacent meshes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coupling {
    /// Lower-numbered mesh of the pair
    pub a: MeshId,
    /// Higher-numbered mesh of the pair
    pub b: MeshId,
    /// Shared resistance magnitude in Ohms
    pub resistance: f64,
}

impl Coupling {
    /// The mesh on the other side of the shared branch, if `mesh` is part of the pair.
    pub fn partner(&self, mesh: MeshId) -> Option<MeshId> {
        if mesh == self.a {
            Some(self.b)
        } else if mesh == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Mutable accumulator for the input phase.
///
/// Every operation validates its arguments before touching any state, so a
/// rejected call leaves the builder unchanged.
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    meshes: Vec<Mesh>,
    couplings: BTreeMap<(MeshId, MeshId), f64>,
}

impl NetworkBuilder {
    /// Create a builder for a network with `mesh_count` meshes.
    pub fn new(mesh_count: usize) -> Result<Self> {
        if mesh_count == 0 {
            return Err(MeshError::invalid_input(
                "mesh count must be a positive integer",
            ));
        }
        if mesh_count > MAX_MESHES {
            return Err(MeshError::invalid_input(format!(
                "mesh count {} exceeds the limit of {}",
                mesh_count, MAX_MESHES
            )));
        }

        Ok(Self {
            meshes: (0..mesh_count).map(|i| Mesh::new(MeshId::from_index(i))).collect(),
            couplings: BTreeMap::new(),
        })
    }

    /// Build a network from a parsed mesh description.
    ///
    /// Element values are applied in file order, so later lines override
    /// earlier ones wherever the model has last-write-wins semantics.
    pub fn from_ast(ast: MeshAst) -> Result<Self> {
        let mesh_count = ast
            .mesh_count
            .ok_or_else(|| MeshError::invalid_input("mesh count was not declared"))?;
        let mut builder = Self::new(mesh_count)?;

        for element in &ast.elements {
            let mesh = MeshId(element.meshes[0]);
            let applied = match element.kind {
                ElementKind::Resistor => builder.add_resistors(mesh, &element.values).map(|_| ()),
                ElementKind::VoltageSource => {
                    builder.add_voltage_sources(mesh, &element.values).map(|_| ())
                }
                // A zero-valued source means "no current source in this mesh"
                ElementKind::CurrentSource if element.values[0] == 0.0 => {
                    warn!("line {}: ignoring zero current source in {}", element.line, mesh);
                    Ok(())
                }
                ElementKind::CurrentSource => {
                    builder.fix_current(mesh, element.values[0]).map(|_| ())
                }
                ElementKind::CommonResistor => builder
                    .set_coupling(mesh, MeshId(element.meshes[1]), element.values[0])
                    .map(|_| ()),
            };
            applied.map_err(|e| e.at_line(element.line))?;
        }

        Ok(builder)
    }

    /// Number of meshes in the network being built.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Append resistor magnitudes to a mesh.
    pub fn add_resistors(&mut self, mesh: MeshId, values: &[f64]) -> Result<&mut Self> {
        let idx = self.check_mesh(mesh)?;
        if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v <= 0.0) {
            return Err(MeshError::invalid_input(format!(
                "resistor value {} in {} must be a positive number",
                bad, mesh
            )));
        }

        self.meshes[idx].resistors.extend_from_slice(values);
        Ok(self)
    }

    /// Append signed voltage source values to a mesh.
    pub fn add_voltage_sources(&mut self, mesh: MeshId, values: &[f64]) -> Result<&mut Self> {
        let idx = self.check_mesh(mesh)?;
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(MeshError::invalid_input(format!(
                "voltage value {} in {} is not a finite number",
                bad, mesh
            )));
        }

        self.meshes[idx].voltages.extend_from_slice(values);
        Ok(self)
    }

    /// Record the resistance shared by two distinct meshes.
    ///
    /// The pair is unordered and a later value for the same pair replaces the
    /// earlier one. A zero value removes the coupling.
    pub fn set_coupling(&mut self, a: MeshId, b: MeshId, value: f64) -> Result<&mut Self> {
        self.check_mesh(a)?;
        self.check_mesh(b)?;
        if a == b {
            return Err(MeshError::invalid_input(format!(
                "{} cannot share a resistor with itself",
                a
            )));
        }
        if !value.is_finite() || value < 0.0 {
            return Err(MeshError::invalid_input(format!(
                "common resistance {} between {} and {} must be a non-negative number",
                value, a, b
            )));
        }

        let key = if a < b { (a, b) } else { (b, a) };
        if value == 0.0 {
            self.couplings.remove(&key);
        } else {
            self.couplings.insert(key, value);
        }
        Ok(self)
    }

    /// Force the current of a mesh with an ideal current source. Last write wins.
    pub fn fix_current(&mut self, mesh: MeshId, value: f64) -> Result<&mut Self> {
        let idx = self.check_mesh(mesh)?;
        if !value.is_finite() {
            return Err(MeshError::invalid_input(format!(
                "current source value {} in {} is not a finite number",
                value, mesh
            )));
        }

        if let Some(previous) = self.meshes[idx].fixed_current.replace(value) {
            debug!("{}: current source {} A replaced by {} A", mesh, previous, value);
        }
        Ok(self)
    }

    /// Freeze the accumulated elements into an immutable network.
    pub fn build(self) -> Network {
        let couplings = self
            .couplings
            .into_iter()
            .map(|((a, b), resistance)| Coupling { a, b, resistance })
            .collect();

        Network {
            meshes: self.meshes,
            couplings,
        }
    }

    fn check_mesh(&self, mesh: MeshId) -> Result<usize> {
        if mesh.0 == 0 || mesh.0 > self.meshes.len() {
            return Err(MeshError::invalid_input(format!(
                "mesh {} is out of range 1..={}",
                mesh.0,
                self.meshes.len()
            )));
        }
        Ok(mesh.index())
    }
}

/// An immutable planar network ready for equation building.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    meshes: Vec<Mesh>,
    /// Couplings ordered by mesh pair
    couplings: Vec<Coupling>,
}

impl Network {
    /// Number of meshes (and unknown currents).
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// All meshes, ordered by id.
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Look up a mesh by id.
    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        if id.0 == 0 {
            return None;
        }
        self.meshes.get(id.index())
    }

    /// All non-zero couplings, ordered by mesh pair.
    pub fn couplings(&self) -> &[Coupling] {
        &self.couplings
    }

    /// Shared resistance between two meshes (0 when they share none).
    pub fn coupling(&self, a: MeshId, b: MeshId) -> f64 {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.couplings
            .iter()
            .find(|c| c.a == lo && c.b == hi)
            .map_or(0.0, |c| c.resistance)
    }

    /// Couplings touching the given mesh, as (partner, resistance) pairs.
    pub fn partners(&self, mesh: MeshId) -> impl Iterator<Item = (MeshId, f64)> + '_ {
        self.couplings
            .iter()
            .filter_map(move |c| c.partner(mesh).map(|p| (p, c.resistance)))
    }

    /// Element totals for display.
    pub fn summary(&self) -> NetworkSummary {
        NetworkSummary {
            meshes: self.meshes.len(),
            resistors: self.meshes.iter().map(|m| m.resistors.len()).sum(),
            voltage_sources: self.meshes.iter().map(|m| m.voltages.len()).sum(),
            current_sources: self.meshes.iter().filter(|m| m.is_fixed()).count(),
            couplings: self.couplings.len(),
        }
    }
}

/// Element counts of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkSummary {
    pub meshes: usize,
    pub resistors: usize,
    pub voltage_sources: usize,
    pub current_sources: usize,
    pub couplings: usize,
}

impl fmt::Display for NetworkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} meshes, {} resistors, {} voltage sources, {} current sources, {} common resistors",
            self.meshes, self.resistors, self.voltage_sources, self.current_sources, self.couplings
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_meshes_rejected() {
        let err = NetworkBuilder::new(0).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_mesh_count_limit() {
        let builder = NetworkBuilder::new(MAX_MESHES).unwrap();
        assert_eq!(builder.mesh_count(), MAX_MESHES);

        assert!(NetworkBuilder::new(MAX_MESHES + 1).unwrap_err().is_invalid_input());
        assert!(NetworkBuilder::new(usize::MAX).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_add_elements() {
        let mut builder = NetworkBuilder::new(2).unwrap();
        builder
            .add_resistors(MeshId(1), &[2.0, 5.0])
            .unwrap()
            .add_voltage_sources(MeshId(1), &[-5.0])
            .unwrap();
        builder.add_resistors(MeshId(1), &[10.0]).unwrap();

        let network = builder.build();
        let mesh = network.mesh(MeshId(1)).unwrap();
        assert_eq!(mesh.resistors, vec![2.0, 5.0, 10.0]);
        assert_eq!(mesh.voltages, vec![-5.0]);
        assert!(network.mesh(MeshId(2)).unwrap().resistors.is_empty());
        assert!(network.mesh(MeshId(0)).is_none());
        assert!(network.mesh(MeshId(3)).is_none());
    }

    #[test]
    fn test_invalid_resistors_leave_mesh_untouched() {
        let mut builder = NetworkBuilder::new(1).unwrap();
        assert!(builder.add_resistors(MeshId(1), &[4.0, 0.0]).is_err());
        assert!(builder.add_resistors(MeshId(1), &[-1.0]).is_err());
        assert!(builder.add_resistors(MeshId(1), &[f64::NAN]).is_err());
        assert!(builder.add_voltage_sources(MeshId(1), &[f64::INFINITY]).is_err());

        let network = builder.build();
        assert!(network.mesh(MeshId(1)).unwrap().resistors.is_empty());
        assert!(network.mesh(MeshId(1)).unwrap().voltages.is_empty());
    }

    #[test]
    fn test_mesh_out_of_range() {
        let mut builder = NetworkBuilder::new(2).unwrap();
        assert!(builder.add_resistors(MeshId(3), &[1.0]).is_err());
        assert!(builder.add_voltage_sources(MeshId(0), &[1.0]).is_err());
        assert!(builder.fix_current(MeshId(5), 1.0).is_err());
        assert!(builder.set_coupling(MeshId(1), MeshId(3), 1.0).is_err());
    }

    #[test]
    fn test_coupling_is_symmetric_and_last_write_wins() {
        let mut builder = NetworkBuilder::new(3).unwrap();
        builder.set_coupling(MeshId(2), MeshId(1), 5.0).unwrap();
        builder.set_coupling(MeshId(1), MeshId(2), 7.0).unwrap();
        builder.set_coupling(MeshId(2), MeshId(3), 3.0).unwrap();

        let network = builder.build();
        assert_eq!(network.coupling(MeshId(1), MeshId(2)), 7.0);
        assert_eq!(network.coupling(MeshId(2), MeshId(1)), 7.0);
        assert_eq!(network.coupling(MeshId(1), MeshId(3)), 0.0);
        assert_eq!(network.couplings().len(), 2);

        let partners: Vec<_> = network.partners(MeshId(2)).collect();
        assert_eq!(partners, vec![(MeshId(1), 7.0), (MeshId(3), 3.0)]);
    }

    #[test]
    fn test_invalid_coupling() {
        let mut builder = NetworkBuilder::new(2).unwrap();
        assert!(builder.set_coupling(MeshId(1), MeshId(1), 5.0).is_err());
        assert!(builder.set_coupling(MeshId(1), MeshId(2), -5.0).is_err());
        assert!(builder.set_coupling(MeshId(1), MeshId(2), f64::NAN).is_err());
    }

    #[test]
    fn test_zero_coupling_removes_pair() {
        let mut builder = NetworkBuilder::new(2).unwrap();
        builder.set_coupling(MeshId(1), MeshId(2), 5.0).unwrap();
        builder.set_coupling(MeshId(2), MeshId(1), 0.0).unwrap();
        assert!(builder.build().couplings().is_empty());
    }

    #[test]
    fn test_fix_current_last_write_wins() {
        let mut builder = NetworkBuilder::new(1).unwrap();
        builder.fix_current(MeshId(1), 3.0).unwrap();
        builder.fix_current(MeshId(1), -1.5).unwrap();
        let network = builder.build();
        assert_eq!(network.mesh(MeshId(1)).unwrap().fixed_current, Some(-1.5));
    }

    #[test]
    fn test_from_ast() {
        let ast = crate::dsl::parse(".meshes 2\nR 1 10\nV 1 10\nR 2 5\nI 2 0\nCR 2 1 5").unwrap();
        let network = NetworkBuilder::from_ast(ast).unwrap().build();

        assert_eq!(network.mesh_count(), 2);
        assert_eq!(network.mesh(MeshId(1)).unwrap().voltages, vec![10.0]);
        assert_eq!(network.mesh(MeshId(2)).unwrap().fixed_current, None);
        assert_eq!(network.coupling(MeshId(1), MeshId(2)), 5.0);
    }

    #[test]
    fn test_from_ast_reports_line() {
        let ast = crate::dsl::parse(".meshes 2\nR 1 10\nR 3 5").unwrap();
        let err = NetworkBuilder::from_ast(ast).unwrap_err();
        assert!(matches!(err, MeshError::InvalidLine { line: 3, .. }));
        assert!(err.is_invalid_input());

        let ast = crate::dsl::parse(".meshes 2\nCR 1 1 5").unwrap();
        assert!(NetworkBuilder::from_ast(ast).is_err());

        let ast = crate::dsl::parse(".meshes 0").unwrap();
        assert!(NetworkBuilder::from_ast(ast).is_err());
    }

    #[test]
    fn test_summary() {
        let mut builder = NetworkBuilder::new(2).unwrap();
        builder.add_resistors(MeshId(1), &[10.0, 20.0]).unwrap();
        builder.add_voltage_sources(MeshId(2), &[5.0]).unwrap();
        builder.fix_current(MeshId(1), 1.0).unwrap();
        builder.set_coupling(MeshId(1), MeshId(2), 2.0).unwrap();

        let summary = builder.build().summary();
        assert_eq!(
            summary,
            NetworkSummary {
                meshes: 2,
                resistors: 2,
                voltage_sources: 1,
                current_sources: 1,
                couplings: 1,
            }
        );
    }
}
