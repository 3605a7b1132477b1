//! Parameter-specification parsing for change-signature
//!
//! Added parameters arrive as a comma-separated string of `type name`
//! entries with an optional `= defaultValue`. The type may itself contain
//! commas inside generic angle brackets, so splitting respects
//! angle-bracket nesting depth.

use lens_foundation::{LensError, LensResult};

/// One parameter to add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedParameter {
    pub ty: String,
    pub name: String,
    pub default_value: Option<String>,
}

/// Split a comma-separated list at top-level commas, honoring angle,
/// paren and bracket nesting.
fn split_top_level(input: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut depth = 0isize;
    let mut angle = 0isize;
    let mut current = String::new();
    for ch in input.chars() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            '<' => angle += 1,
            '>' if angle > 0 => angle -= 1,
            ',' if depth == 0 && angle == 0 => {
                pieces.push(current.trim().to_string());
                current = String::new();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    let last = current.trim().to_string();
    if !last.is_empty() {
        pieces.push(last);
    }
    pieces.retain(|p| !p.is_empty());
    pieces
}

/// Parse an `addParameters` string.
pub fn parse_added_parameters(input: &str) -> LensResult<Vec<AddedParameter>> {
    let mut parameters = Vec::new();
    for piece in split_top_level(input) {
        // Optional default value after a top-level '='
        let (decl, default_value) = match top_level_eq(&piece) {
            Some(at) => (
                piece[..at].trim().to_string(),
                Some(piece[at + 1..].trim().to_string()),
            ),
            None => (piece.clone(), None),
        };

        // The name is the trailing identifier; everything before is the type
        let name_start = decl
            .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .map(|i| i + 1)
            .unwrap_or(0);
        let name = decl[name_start..].trim().to_string();
        let ty = decl[..name_start].trim().to_string();
        if name.is_empty() || ty.is_empty() {
            return Err(LensError::invalid_input(format!(
                "malformed parameter specification '{piece}' (expected 'type name' with optional '= default')"
            )));
        }
        parameters.push(AddedParameter {
            ty,
            name,
            default_value,
        });
    }
    Ok(parameters)
}

fn top_level_eq(piece: &str) -> Option<usize> {
    let mut depth = 0isize;
    let mut angle = 0isize;
    for (i, ch) in piece.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            '<' => angle += 1,
            '>' if angle > 0 => angle -= 1,
            '=' if depth == 0 && angle == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Parse a plain comma-separated name list.
pub fn parse_name_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
