//! Dense linear system assembly and LU solving.

use log::trace;

use super::equation::Equation;
use crate::error::{MeshError, Result};
use crate::network::MeshId;

/// Dense square system Ax = b.
#[derive(Debug)]
pub struct LinearSystem {
    /// System matrix A (row-major)
    pub a: Vec<f64>,
    /// Right-hand side b
    pub b: Vec<f64>,
    /// Solution vector x
    pub x: Vec<f64>,
    /// Matrix dimension
    pub size: usize,
    /// LU decomposition of A
    pub lu: Vec<f64>,
    /// Pivot indices for LU decomposition
    pub pivots: Vec<usize>,
}

impl LinearSystem {
    /// Create a zeroed system of the given dimension.
    pub fn new(size: usize) -> Result<Self> {
        let cells = size.checked_mul(size).ok_or_else(|| {
            MeshError::invalid_input(format!("system of {} unknowns is too large", size))
        })?;

        Ok(Self {
            a: vec![0.0; cells],
            b: vec![0.0; size],
            x: vec![0.0; size],
            size,
            lu: vec![0.0; cells],
            pivots: vec![0; size],
        })
    }

    /// Assemble the system from one equation per unknown.
    pub fn from_equations(equations: &[Equation], size: usize) -> Result<Self> {
        if equations.len() != size {
            return Err(MeshError::invalid_input(format!(
                "expected {} equations, got {}",
                size,
                equations.len()
            )));
        }

        let mut system = Self::new(size)?;
        for (row, equation) in equations.iter().enumerate() {
            let (coefficients, rhs) = equation.row(size);
            system.set_row(row, &coefficients, rhs);
        }
        Ok(system)
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.a[row * self.size + col]
    }

    /// Set matrix element at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] = value;
    }

    /// Overwrite a full row and its right-hand side.
    pub fn set_row(&mut self, row: usize, coefficients: &[f64], rhs: f64) {
        let start = row * self.size;
        self.a[start..start + self.size].copy_from_slice(&coefficients[..self.size]);
        self.b[row] = rhs;
    }

    /// Perform LU decomposition with scaled partial pivoting.
    ///
    /// Each candidate pivot is measured against the largest entry of its own
    /// original row, so rows of very different magnitude (a 1 mOhm loop next
    /// to a 10 GOhm loop, or a unit current-source row) do not mask each
    /// other. A relative pivot below `tolerance`, or an all-zero row, marks
    /// the system as singular.
    pub fn factor(&mut self, tolerance: f64) -> Result<()> {
        let n = self.size;
        self.lu.copy_from_slice(&self.a);

        let mut scales: Vec<f64> = self
            .a
            .chunks(n.max(1))
            .map(|row| row.iter().fold(0.0f64, |m, v| m.max(v.abs())))
            .collect();
        if let Some(row) = scales.iter().position(|s| *s == 0.0 || !s.is_finite()) {
            trace!("row {}: no usable coefficient", row);
            return Err(MeshError::SingularSystem);
        }

        for i in 0..n {
            self.pivots[i] = i;
        }

        for k in 0..n {
            // Find pivot
            let mut max_val = self.lu[k * n + k].abs() / scales[k];
            let mut max_row = k;

            for i in (k + 1)..n {
                let val = self.lu[i * n + k].abs() / scales[i];
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val < tolerance {
                trace!("column {}: relative pivot {:e} below {:e}", k, max_val, tolerance);
                return Err(MeshError::SingularSystem);
            }

            if max_row != k {
                trace!("column {}: swapping rows {} and {}", k, k, max_row);
                self.pivots.swap(k, max_row);
                scales.swap(k, max_row);
                for j in 0..n {
                    self.lu.swap(k * n + j, max_row * n + j);
                }
            }

            // Eliminate
            let pivot = self.lu[k * n + k];
            for i in (k + 1)..n {
                let factor = self.lu[i * n + k] / pivot;
                self.lu[i * n + k] = factor;
                for j in (k + 1)..n {
                    self.lu[i * n + j] -= factor * self.lu[k * n + j];
                }
            }
        }

        Ok(())
    }

    /// Solve the system using the pre-computed LU decomposition.
    pub fn solve(&mut self) -> Result<()> {
        let n = self.size;

        // Apply pivot permutation to b
        for i in 0..n {
            self.x[i] = self.b[self.pivots[i]];
        }

        // Forward substitution (L * y = Pb)
        for i in 0..n {
            for j in 0..i {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
        }

        // Back substitution (U * x = y)
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
            let diag = self.lu[i * n + i];
            if diag == 0.0 {
                return Err(MeshError::SingularSystem);
            }
            self.x[i] /= diag;
        }

        if self.x.iter().any(|v| !v.is_finite()) {
            return Err(MeshError::SingularSystem);
        }

        Ok(())
    }
}

/// Solved mesh currents, one per mesh, ordered by mesh id.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    currents: Vec<f64>,
}

impl Solution {
    /// Wrap raw currents indexed by `MeshId::index`.
    pub fn new(currents: Vec<f64>) -> Self {
        Self { currents }
    }

    /// Number of solved meshes.
    pub fn len(&self) -> usize {
        self.currents.len()
    }

    /// Check if no meshes were solved.
    pub fn is_empty(&self) -> bool {
        self.currents.is_empty()
    }

    /// Current of a mesh in Amps, clockwise positive.
    pub fn current(&self, mesh: MeshId) -> Option<f64> {
        if mesh.0 == 0 {
            return None;
        }
        self.currents.get(mesh.index()).copied()
    }

    /// Iterate (mesh, current) pairs in mesh order.
    pub fn iter(&self) -> impl Iterator<Item = (MeshId, f64)> + '_ {
        self.currents
            .iter()
            .enumerate()
            .map(|(i, v)| (MeshId::from_index(i), *v))
    }

    /// Raw current vector.
    pub fn as_slice(&self) -> &[f64] {
        &self.currents
    }
}

/// Solve a full set of mesh equations for all `size` mesh currents.
///
/// Either every unknown is resolved or an error is returned.
pub fn solve(equations: &[Equation], size: usize, pivot_tolerance: f64) -> Result<Solution> {
    let mut system = LinearSystem::from_equations(equations, size)?;
    system.factor(pivot_tolerance)?;
    system.solve()?;
    Ok(Solution::new(system.x))
}
