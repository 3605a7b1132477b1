//! Analyzer configuration and fixed thresholds

use lens_foundation::{LensError, LensResult};

/// Which smell families to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmellCategory {
    #[default]
    All,
    Complexity,
    Design,
    Inheritance,
}

impl SmellCategory {
    pub fn parse(value: &str) -> LensResult<Self> {
        match value {
            "all" => Ok(Self::All),
            "complexity" => Ok(Self::Complexity),
            "design" => Ok(Self::Design),
            "inheritance" => Ok(Self::Inheritance),
            other => Err(LensError::invalid_input(format!(
                "unknown smell category '{other}' (expected all, complexity, design, or inheritance)"
            ))),
        }
    }

    pub fn includes_complexity(self) -> bool {
        matches!(self, Self::All | Self::Complexity)
    }

    pub fn includes_design(self) -> bool {
        matches!(self, Self::All | Self::Design)
    }

    pub fn includes_inheritance(self) -> bool {
        matches!(self, Self::All | Self::Inheritance)
    }
}

/// Inputs of one analyzer run.
#[derive(Debug, Clone, Default)]
pub struct SmellConfig {
    pub category: SmellCategory,
    pub project: Option<String>,
    /// Enables the semantic feature-envy pass
    pub deep: bool,
}

// Body metrics
pub const LONG_METHOD_WARNING: u32 = 50;
pub const LONG_METHOD_CRITICAL: u32 = 100;
pub const DEEP_NESTING_WARNING: u32 = 3;
pub const DEEP_NESTING_CRITICAL: u32 = 5;
pub const COMPLEXITY_WARNING: u32 = 10;
pub const COMPLEXITY_CRITICAL: u32 = 20;

// Middle man
pub const MIDDLE_MAN_MIN_METHODS: usize = 3;
pub const MIDDLE_MAN_RATIO: f64 = 0.8;

// Structural
pub const LARGE_CLASS_WARNING: usize = 20;
pub const LARGE_CLASS_CRITICAL: usize = 40;
pub const LONG_PARAMS_WARNING: usize = 5;
pub const LONG_PARAMS_CRITICAL: usize = 8;
pub const GOD_CLASS_MEMBERS: usize = 20;
pub const GOD_CLASS_DEPENDENCIES: usize = 5;
pub const DATA_CLASS_MIN_PROPERTIES: usize = 2;
pub const MANY_DEPENDENCIES_WARNING: usize = 5;
pub const MANY_DEPENDENCIES_CRITICAL: usize = 8;
pub const DEEP_INHERITANCE_DEPTH: usize = 3;
pub const REFUSED_BEQUEST_MIN_VIRTUALS: usize = 3;
pub const REFUSED_BEQUEST_RATIO: f64 = 0.2;
pub const FEATURE_ENVY_MIN_ACCESSES: usize = 3;

/// Types that never count as dependencies for the god-class check.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "bool", "byte", "sbyte", "char", "decimal", "double", "float", "int", "uint", "long", "ulong",
    "short", "ushort", "nint", "nuint", "object", "string", "void", "var",
];
