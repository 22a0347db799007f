//! Mesh equation formulation.
//!
//! Each mesh contributes exactly one row to the linear system: a KVL
//! equation when its current is free, or a direct assignment when a current
//! source forces it.

use std::fmt;

use crate::network::{MeshId, Network};

/// KVL around one mesh: `coefficients · i + constant = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct KvlEquation {
    /// Mesh this equation was written for
    pub mesh: MeshId,
    /// Coefficient of each mesh current, indexed by `MeshId::index`
    pub coefficients: Vec<f64>,
    /// Sum of the mesh's voltage sources
    pub constant: f64,
}

/// One row of the mesh system.
#[derive(Debug, Clone, PartialEq)]
pub enum Equation {
    /// Kirchhoff voltage law around a free mesh
    Kvl(KvlEquation),
    /// Mesh current pinned by a current source: `i_mesh = value`.
    ///
    /// `value` is the negated source value. The solved unknown and the source
    /// are both referenced clockwise, yet the assignment is made from the
    /// opposite side of the source; this matches the worked circuits this
    /// solver is checked against and must not be "corrected" silently.
    Fixed { mesh: MeshId, value: f64 },
}

impl Equation {
    /// Mesh this equation belongs to.
    pub fn mesh(&self) -> MeshId {
        match self {
            Equation::Kvl(kvl) => kvl.mesh,
            Equation::Fixed { mesh, .. } => *mesh,
        }
    }

    /// Row form `(coefficients, rhs)` of this equation for a system of `size` unknowns.
    pub fn row(&self, size: usize) -> (Vec<f64>, f64) {
        match self {
            Equation::Kvl(kvl) => {
                let mut coefficients = kvl.coefficients.clone();
                coefficients.resize(size, 0.0);
                (coefficients, -kvl.constant)
            }
            Equation::Fixed { mesh, value } => {
                let mut coefficients = vec![0.0; size];
                coefficients[mesh.index()] = 1.0;
                (coefficients, *value)
            }
        }
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Equation::Fixed { mesh, value } => write!(f, "{} = {}", mesh.current_symbol(), value),
            Equation::Kvl(kvl) => {
                let mut wrote_term = false;
                let terms = kvl
                    .coefficients
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| **c != 0.0)
                    .map(|(i, c)| (*c, Some(MeshId::from_index(i))));
                let constant = Some((kvl.constant, None)).filter(|(c, _)| *c != 0.0);

                for (value, symbol) in terms.chain(constant) {
                    let magnitude = value.abs();
                    match (wrote_term, value < 0.0) {
                        (false, false) => {}
                        (false, true) => write!(f, "-")?,
                        (true, false) => write!(f, " + ")?,
                        (true, true) => write!(f, " - ")?,
                    }
                    match symbol {
                        Some(id) => write!(f, "{}*{}", magnitude, id.current_symbol())?,
                        None => write!(f, "{}", magnitude)?,
                    }
                    wrote_term = true;
                }

                if !wrote_term {
                    write!(f, "0")?;
                }
                write!(f, " = 0")
            }
        }
    }
}

/// Formulate one equation per mesh, ordered by mesh id.
pub fn build_equations(network: &Network) -> Vec<Equation> {
    let size = network.mesh_count();

    network
        .meshes()
        .iter()
        .map(|mesh| {
            if let Some(current) = mesh.fixed_current {
                // 0.0 - x keeps a zero source from printing as -0
                return Equation::Fixed {
                    mesh: mesh.id,
                    value: 0.0 - current,
                };
            }

            let mut coefficients = vec![0.0; size];
            coefficients[mesh.id.index()] = mesh.total_resistance();

            // Opposing mesh currents through the shared branch
            for (partner, resistance) in network.partners(mesh.id) {
                coefficients[partner.index()] -= resistance;
            }

            Equation::Kvl(KvlEquation {
                mesh: mesh.id,
                coefficients,
                constant: mesh.total_voltage(),
            })
        })
        .collect()
}
