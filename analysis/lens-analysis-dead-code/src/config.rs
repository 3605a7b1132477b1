//! Configuration for the unused-code analysis

use lens_foundation::{LensError, LensResult};
use lens_semantic::SymbolKind;

/// Which symbol kinds to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnusedScope {
    #[default]
    All,
    Types,
    Methods,
    Properties,
    Fields,
}

impl UnusedScope {
    pub fn parse(value: &str) -> LensResult<Self> {
        match value {
            "all" => Ok(Self::All),
            "types" => Ok(Self::Types),
            "methods" => Ok(Self::Methods),
            "properties" => Ok(Self::Properties),
            "fields" => Ok(Self::Fields),
            other => Err(LensError::invalid_input(format!(
                "unknown scope '{other}' (expected all, types, methods, properties, or fields)"
            ))),
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Types => "types",
            Self::Methods => "methods",
            Self::Properties => "properties",
            Self::Fields => "fields",
        }
    }

    pub fn accepts(self, kind: SymbolKind) -> bool {
        match self {
            Self::All => {
                kind.is_type()
                    || matches!(
                        kind,
                        SymbolKind::Method | SymbolKind::Property | SymbolKind::Field
                    )
            }
            Self::Types => kind.is_type(),
            Self::Methods => kind == SymbolKind::Method,
            Self::Properties => kind == SymbolKind::Property,
            Self::Fields => kind == SymbolKind::Field,
        }
    }
}

/// Inputs of one unused-code run.
#[derive(Debug, Clone, Default)]
pub struct UnusedCodeConfig {
    pub scope: UnusedScope,
    pub project: Option<String>,
}
