//! Abstract Syntax Tree types for the mesh description language.

/// Complete AST representation of a parsed mesh description.
#[derive(Debug, Clone, Default)]
pub struct MeshAst {
    /// Declared mesh count from `.meshes`
    pub mesh_count: Option<usize>,
    /// All element lines, in file order
    pub elements: Vec<ElementDef>,
}

impl MeshAst {
    /// Create a new empty AST.
    pub fn new() -> Self {
        Self::default()
    }
}

/// One element line from the description.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDef {
    /// Element kind (R, V, I, CR)
    pub kind: ElementKind,
    /// Mesh numbers the element belongs to
    pub meshes: Vec<usize>,
    /// Element values in base units
    pub values: Vec<f64>,
    /// Source line number for error reporting
    pub line: usize,
}

/// Element kinds supported by the description language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Resistors around a single mesh
    Resistor,
    /// Voltage sources around a single mesh
    VoltageSource,
    /// Current source forcing a mesh current
    CurrentSource,
    /// Resistor shared by two meshes
    CommonResistor,
}

impl ElementKind {
    /// Parse an element kind from its keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "R" => Some(Self::Resistor),
            "V" => Some(Self::VoltageSource),
            "I" => Some(Self::CurrentSource),
            "CR" => Some(Self::CommonResistor),
            _ => None,
        }
    }

    /// Number of mesh references on the line.
    pub fn mesh_count(&self) -> usize {
        match self {
            Self::CommonResistor => 2,
            _ => 1,
        }
    }

    /// Whether the line takes a list of values rather than exactly one.
    pub fn accepts_list(&self) -> bool {
        matches!(self, Self::Resistor | Self::VoltageSource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(ElementKind::from_keyword("r"), Some(ElementKind::Resistor));
        assert_eq!(ElementKind::from_keyword("CR"), Some(ElementKind::CommonResistor));
        assert_eq!(ElementKind::from_keyword("L"), None);
        assert_eq!(ElementKind::CommonResistor.mesh_count(), 2);
        assert!(!ElementKind::CurrentSource.accepts_list());
    }
}
