//! WASM bindings for Mesh Core.
//!
//! This module provides JavaScript-friendly bindings for solving mesh
//! descriptions in the browser.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmMeshAnalysis } from 'mesh_core';
//!
//! await init();
//!
//! const description = `
//!   .meshes 2
//!   R 1 10
//!   V 1 10
//!   R 2 5
//!   CR 1 2 5
//! `;
//!
//! const analysis = new WasmMeshAnalysis(description);
//! console.log(analysis.currents()); // Float64Array [-2, -2]
//! console.log(analysis.report());
//! ```

use wasm_bindgen::prelude::*;

use crate::solver::AnalysisResult;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Solved mesh description.
#[wasm_bindgen]
pub struct WasmMeshAnalysis {
    result: AnalysisResult,
}

#[wasm_bindgen]
impl WasmMeshAnalysis {
    /// Parse and solve a mesh description.
    ///
    /// # Returns
    /// The solved analysis, or the error message if the description is
    /// invalid or the system is singular.
    #[wasm_bindgen(constructor)]
    pub fn new(description: &str) -> Result<WasmMeshAnalysis, JsValue> {
        let result = crate::analyze(description).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmMeshAnalysis { result })
    }

    /// Unrounded mesh currents in Amps, clockwise positive, in mesh order.
    #[wasm_bindgen]
    pub fn currents(&self) -> Vec<f64> {
        self.result.solution.as_slice().to_vec()
    }

    /// Mesh equations, one string per mesh.
    #[wasm_bindgen]
    pub fn equations(&self) -> Vec<String> {
        self.result.equations.iter().map(|e| e.to_string()).collect()
    }

    /// Formatted report, one line per mesh.
    #[wasm_bindgen]
    pub fn report(&self) -> String {
        self.result.report().to_string()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
