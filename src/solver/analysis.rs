//! Main analysis interface.

use log::{debug, info, warn};

use super::dense::{solve, Solution};
use super::equation::{build_equations, Equation};
use super::{DEFAULT_PIVOT_TOLERANCE, DEFAULT_PRECISION};
use crate::error::Result;
use crate::network::{validate_network, Network};
use crate::report::{format_with_precision, MeshCurrent, Report};

/// Configuration for a mesh analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Relative pivot magnitude below which the system is singular.
    pub pivot_tolerance: f64,
    /// Decimal places of reported current magnitudes.
    pub precision: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
            precision: DEFAULT_PRECISION,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the singular-pivot tolerance, relative to the largest coefficient of its row.
    pub fn with_pivot_tolerance(mut self, pivot_tolerance: f64) -> Self {
        self.pivot_tolerance = pivot_tolerance;
        self
    }

    /// Set the number of decimal places in the report.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }
}

/// Everything produced by one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// One equation per mesh, ordered by mesh id
    pub equations: Vec<Equation>,
    /// Unrounded mesh currents
    pub solution: Solution,
    /// Reported currents with magnitude and direction
    pub currents: Vec<MeshCurrent>,
    precision: u32,
}

impl AnalysisResult {
    /// Printable report of the mesh currents.
    pub fn report(&self) -> Report<'_> {
        Report::new(&self.currents, self.precision)
    }
}

/// Mesh analysis over a frozen network.
pub struct MeshAnalysis {
    network: Network,
    config: AnalysisConfig,
}

impl MeshAnalysis {
    /// Create an analysis with default configuration.
    pub fn new(network: Network) -> Self {
        Self::with_config(network, AnalysisConfig::default())
    }

    /// Create an analysis with custom configuration.
    ///
    /// Suspicious network features are logged here, once per analysis.
    pub fn with_config(network: Network, config: AnalysisConfig) -> Self {
        info!("analysing {}", network.summary());
        for warning in validate_network(&network) {
            warn!("{}", warning);
        }
        Self { network, config }
    }

    /// The network being analysed.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// The configuration of this analysis.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// One equation per mesh, ordered by mesh id.
    pub fn equations(&self) -> Vec<Equation> {
        build_equations(&self.network)
    }

    /// Build the equations, solve them and report the mesh currents.
    ///
    /// Any failure aborts the whole run; no partial currents are returned.
    pub fn run(&self) -> Result<AnalysisResult> {
        self.solve_equations(self.equations())
    }

    /// Solve previously built equations and report the mesh currents.
    pub fn solve_equations(&self, equations: Vec<Equation>) -> Result<AnalysisResult> {
        for equation in &equations {
            debug!("{}: {}", equation.mesh(), equation);
        }

        let solution = solve(
            &equations,
            self.network.mesh_count(),
            self.config.pivot_tolerance,
        )?;
        for (mesh, current) in solution.iter() {
            debug!("{} = {} A", mesh.current_symbol(), current);
        }

        let currents = format_with_precision(&solution, self.config.precision);

        Ok(AnalysisResult {
            equations,
            solution,
            currents,
            precision: self.config.precision,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::MeshError;
    use crate::network::{MeshId, NetworkBuilder};
    use crate::report::Direction;

    #[test]
    fn test_single_mesh() {
        let mut builder = NetworkBuilder::new(1).unwrap();
        builder.add_resistors(MeshId(1), &[4.0]).unwrap();
        builder.add_voltage_sources(MeshId(1), &[12.0]).unwrap();

        let result = MeshAnalysis::new(builder.build()).run().unwrap();
        assert_eq!(result.currents.len(), 1);
        assert_abs_diff_eq!(
            result.solution.current(MeshId(1)).unwrap(),
            -12.0 / 4.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_two_meshes_sharing_resistor() {
        let mut builder = NetworkBuilder::new(2).unwrap();
        builder.add_resistors(MeshId(1), &[10.0]).unwrap();
        builder.add_voltage_sources(MeshId(1), &[10.0]).unwrap();
        builder.add_resistors(MeshId(2), &[5.0]).unwrap();
        builder.add_voltage_sources(MeshId(2), &[0.0]).unwrap();
        builder.set_coupling(MeshId(1), MeshId(2), 5.0).unwrap();

        let result = MeshAnalysis::new(builder.build()).run().unwrap();
        for current in &result.currents {
            assert_abs_diff_eq!(current.value, -2.0, epsilon = 1e-9);
            assert_eq!(current.magnitude, 2.0);
            assert_eq!(current.direction, Direction::Anticlockwise);
        }
    }

    #[test]
    fn test_current_source_mesh() {
        let mut builder = NetworkBuilder::new(2).unwrap();
        builder.fix_current(MeshId(1), 3.0).unwrap();
        builder.add_resistors(MeshId(2), &[4.0]).unwrap();
        builder.add_voltage_sources(MeshId(2), &[-8.0]).unwrap();
        builder.set_coupling(MeshId(1), MeshId(2), 2.0).unwrap();

        let result = MeshAnalysis::new(builder.build()).run().unwrap();
        assert_abs_diff_eq!(result.currents[0].value, -3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.currents[1].value, 0.5, epsilon = 1e-9);
        assert_eq!(result.currents[1].direction, Direction::Clockwise);
    }

    #[test]
    fn test_unsourced_meshes_carry_no_current() {
        let mut builder = NetworkBuilder::new(2).unwrap();
        builder.add_resistors(MeshId(1), &[3.0]).unwrap();
        builder.add_resistors(MeshId(2), &[6.0]).unwrap();
        builder.set_coupling(MeshId(1), MeshId(2), 2.0).unwrap();

        let result = MeshAnalysis::new(builder.build()).run().unwrap();
        assert_eq!(result.currents.len(), 2);
        for current in &result.currents {
            assert_abs_diff_eq!(current.value, 0.0, epsilon = 1e-12);
            assert_eq!(current.magnitude, 0.0);
        }
    }

    #[test]
    fn test_empty_mesh_is_singular() {
        let builder = NetworkBuilder::new(1).unwrap();
        let err = MeshAnalysis::new(builder.build()).run().unwrap_err();
        assert!(matches!(err, MeshError::SingularSystem));
    }

    #[test]
    fn test_solve_prebuilt_equations() {
        let mut builder = NetworkBuilder::new(2).unwrap();
        builder.fix_current(MeshId(1), 1.0).unwrap();
        builder.add_resistors(MeshId(2), &[1e13]).unwrap();
        builder.add_voltage_sources(MeshId(2), &[5.0]).unwrap();

        let analysis = MeshAnalysis::new(builder.build());
        assert_eq!(analysis.network().mesh_count(), 2);

        let equations = analysis.equations();
        assert_eq!(equations[0].to_string(), "i1 = -1");
        let result = analysis.solve_equations(equations).unwrap();
        assert_abs_diff_eq!(result.currents[0].value, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.currents[1].value, -5e-13, epsilon = 1e-20);
    }

    #[test]
    fn test_wrong_equation_count() {
        let mut builder = NetworkBuilder::new(2).unwrap();
        builder.add_resistors(MeshId(1), &[1.0]).unwrap();
        builder.add_resistors(MeshId(2), &[1.0]).unwrap();

        let analysis = MeshAnalysis::new(builder.build());
        let mut equations = analysis.equations();
        equations.pop();
        assert!(analysis.solve_equations(equations).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_deterministic() {
        let build = || {
            let mut builder = NetworkBuilder::new(3).unwrap();
            builder.add_resistors(MeshId(1), &[2.0, 3.0]).unwrap();
            builder.add_resistors(MeshId(2), &[4.0]).unwrap();
            builder.add_resistors(MeshId(3), &[1.0]).unwrap();
            builder.add_voltage_sources(MeshId(1), &[9.0]).unwrap();
            builder.add_voltage_sources(MeshId(3), &[-3.0]).unwrap();
            builder
        };

        let mut forward = build();
        forward.set_coupling(MeshId(1), MeshId(2), 1.0).unwrap();
        forward.set_coupling(MeshId(2), MeshId(3), 2.0).unwrap();
        let mut reversed = build();
        reversed.set_coupling(MeshId(3), MeshId(2), 2.0).unwrap();
        reversed.set_coupling(MeshId(2), MeshId(1), 1.0).unwrap();

        let a = MeshAnalysis::new(forward.build()).run().unwrap();
        let b = MeshAnalysis::new(reversed.build()).run().unwrap();
        assert_eq!(a.solution, b.solution);
    }

    #[test]
    fn test_precision_config() {
        let mut builder = NetworkBuilder::new(1).unwrap();
        builder.add_resistors(MeshId(1), &[3.0]).unwrap();
        builder.add_voltage_sources(MeshId(1), &[1.0]).unwrap();

        let config = AnalysisConfig::new().with_precision(4);
        let analysis = MeshAnalysis::with_config(builder.build(), config);
        assert_eq!(analysis.config().precision, 4);
        let result = analysis.run().unwrap();
        assert_eq!(result.currents[0].magnitude, 0.3333);
        assert_eq!(
            result.report().to_string(),
            "Mesh 1 --> i1 = 0.3333 A (A.CW)\n"
        );
    }
}
