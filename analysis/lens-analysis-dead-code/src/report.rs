//! Unused-code report rendering

use crate::config::UnusedScope;
use std::time::Duration;

/// One symbol with zero references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedSymbol {
    pub kind: String,
    pub display: String,
    pub file_path: String,
    /// 1-based
    pub line: u32,
}

pub fn render(
    scope: UnusedScope,
    unused: &[UnusedSymbol],
    analyzed: usize,
    duration: Duration,
) -> String {
    let mut out = format!(
        "Unused code: {} symbols (scope: {}, {} analyzed in {} ms)\n",
        unused.len(),
        scope.display(),
        analyzed,
        duration.as_millis()
    );
    if unused.is_empty() {
        out.push_str("  nothing unreferenced found\n");
        return out;
    }
    for symbol in unused {
        out.push_str(&format!(
            "  {} {} [{}:{}] - no references found\n",
            symbol.kind, symbol.display, symbol.file_path, symbol.line
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_symbols_with_locations() {
        let unused = vec![UnusedSymbol {
            kind: "method".to_string(),
            display: "App.Foo.Helper()".to_string(),
            file_path: "src/Foo.cs".to_string(),
            line: 22,
        }];
        let text = render(UnusedScope::All, &unused, 10, Duration::from_millis(5));
        assert!(text.contains("Unused code: 1 symbols (scope: all, 10 analyzed"));
        assert!(text.contains("method App.Foo.Helper() [src/Foo.cs:22] - no references found"));
    }
}
