//! Mesh current reporting.
//!
//! Converts a raw [`Solution`] into per-mesh magnitudes and directions. The
//! solved value is positive for a current flowing in the assumed clockwise
//! reference direction.

use std::fmt;

use crate::network::MeshId;
use crate::solver::{Solution, DEFAULT_PRECISION};

/// Direction of a mesh current relative to the clockwise reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    Anticlockwise,
    /// Exactly zero current
    None,
}

impl Direction {
    /// Direction of a signed current.
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Direction::Clockwise
        } else if value < 0.0 {
            Direction::Anticlockwise
        } else {
            Direction::None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Clockwise => write!(f, "CW"),
            Direction::Anticlockwise => write!(f, "A.CW"),
            Direction::None => Ok(()),
        }
    }
}

/// Reported current of one mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshCurrent {
    pub mesh: MeshId,
    /// Unrounded signed current in Amps
    pub value: f64,
    /// Absolute current rounded to the report precision
    pub magnitude: f64,
    pub direction: Direction,
}

impl MeshCurrent {
    /// Describe a solved current, rounding its magnitude to `precision` decimals.
    pub fn new(mesh: MeshId, value: f64, precision: u32) -> Self {
        Self {
            mesh,
            value,
            magnitude: round_to(value.abs(), precision),
            direction: Direction::of(value),
        }
    }
}

impl fmt::Display for MeshCurrent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(DEFAULT_PRECISION as usize);
        write!(
            f,
            "{} --> {} = {:.*} A",
            self.mesh,
            self.mesh.current_symbol(),
            precision,
            self.magnitude
        )?;
        if self.direction != Direction::None {
            write!(f, " ({})", self.direction)?;
        }
        Ok(())
    }
}

/// Report with the default precision of two decimal places.
pub fn format(solution: &Solution) -> Vec<MeshCurrent> {
    format_with_precision(solution, DEFAULT_PRECISION)
}

/// Report each solved current, in mesh order.
pub fn format_with_precision(solution: &Solution, precision: u32) -> Vec<MeshCurrent> {
    solution
        .iter()
        .map(|(mesh, value)| MeshCurrent::new(mesh, value, precision))
        .collect()
}

/// Line-per-mesh rendering of reported currents.
pub struct Report<'a> {
    currents: &'a [MeshCurrent],
    precision: u32,
}

impl<'a> Report<'a> {
    pub fn new(currents: &'a [MeshCurrent], precision: u32) -> Self {
        Self {
            currents,
            precision,
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for current in self.currents {
            writeln!(f, "{:.*}", self.precision as usize, current)?;
        }
        Ok(())
    }
}

fn round_to(value: f64, precision: u32) -> f64 {
    let scale = 10f64.powi(precision as i32);
    (value * scale).round() / scale
}
