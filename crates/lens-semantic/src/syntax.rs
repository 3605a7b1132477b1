//! Lightweight syntactic facility
//!
//! Text-splicing refactors need just enough syntax to find spans: method
//! invocations and their argument lists, a declaration's parameter list,
//! a type declaration's base list and closing brace. This module is a
//! byte-level scanner that understands string literals (regular, verbatim,
//! interpolated), char literals and comments, and balances parentheses,
//! braces and generic angle brackets. It is not a parser; interpolation
//! holes are treated as string text.

use crate::model::TextSpan;

/// Classification of one byte of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    Code,
    Str,
    Comment,
}

/// Classify every byte of `text` as code, string-literal, or comment.
pub fn classify(text: &str) -> Vec<ByteClass> {
    #[derive(PartialEq)]
    enum State {
        Code,
        LineComment,
        BlockComment,
        Str,
        VerbatimStr,
        Char,
    }

    let bytes = text.as_bytes();
    let mut classes = vec![ByteClass::Code; bytes.len()];
    let mut state = State::Code;
    let mut i = 0;

    while i < bytes.len() {
        match state {
            State::Code => match bytes[i] {
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    state = State::LineComment;
                    classes[i] = ByteClass::Comment;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    state = State::BlockComment;
                    classes[i] = ByteClass::Comment;
                    classes[i + 1] = ByteClass::Comment;
                    i += 1;
                }
                b'@' if bytes.get(i + 1) == Some(&b'"') => {
                    state = State::VerbatimStr;
                    classes[i] = ByteClass::Str;
                    classes[i + 1] = ByteClass::Str;
                    i += 1;
                }
                b'$' if bytes.get(i + 1) == Some(&b'"') => {
                    state = State::Str;
                    classes[i] = ByteClass::Str;
                    classes[i + 1] = ByteClass::Str;
                    i += 1;
                }
                b'$' if bytes.get(i + 1) == Some(&b'@') && bytes.get(i + 2) == Some(&b'"') => {
                    state = State::VerbatimStr;
                    classes[i] = ByteClass::Str;
                    classes[i + 1] = ByteClass::Str;
                    classes[i + 2] = ByteClass::Str;
                    i += 2;
                }
                b'@' if bytes.get(i + 1) == Some(&b'$') && bytes.get(i + 2) == Some(&b'"') => {
                    state = State::VerbatimStr;
                    classes[i] = ByteClass::Str;
                    classes[i + 1] = ByteClass::Str;
                    classes[i + 2] = ByteClass::Str;
                    i += 2;
                }
                b'"' => {
                    state = State::Str;
                    classes[i] = ByteClass::Str;
                }
                b'\'' => {
                    state = State::Char;
                    classes[i] = ByteClass::Str;
                }
                _ => {}
            },
            State::LineComment => {
                if bytes[i] == b'\n' {
                    state = State::Code;
                } else {
                    classes[i] = ByteClass::Comment;
                }
            }
            State::BlockComment => {
                classes[i] = ByteClass::Comment;
                if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    classes[i + 1] = ByteClass::Comment;
                    i += 1;
                    state = State::Code;
                }
            }
            State::Str => {
                classes[i] = ByteClass::Str;
                if bytes[i] == b'\\' && i + 1 < bytes.len() {
                    classes[i + 1] = ByteClass::Str;
                    i += 1;
                } else if bytes[i] == b'"' {
                    state = State::Code;
                }
            }
            State::VerbatimStr => {
                classes[i] = ByteClass::Str;
                if bytes[i] == b'"' {
                    if bytes.get(i + 1) == Some(&b'"') {
                        classes[i + 1] = ByteClass::Str;
                        i += 1;
                    } else {
                        state = State::Code;
                    }
                }
            }
            State::Char => {
                classes[i] = ByteClass::Str;
                if bytes[i] == b'\\' && i + 1 < bytes.len() {
                    classes[i + 1] = ByteClass::Str;
                    i += 1;
                } else if bytes[i] == b'\'' {
                    state = State::Code;
                }
            }
        }
        i += 1;
    }

    classes
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Next whole-word occurrence of `word` in a code region, at or after `from`.
fn find_word(text: &str, classes: &[ByteClass], word: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut at = from;
    while at + word.len() <= bytes.len() {
        let pos = text[at..].find(word)? + at;
        at = pos + 1;
        if classes[pos] != ByteClass::Code {
            continue;
        }
        if pos > 0 && is_ident_byte(bytes[pos - 1]) {
            continue;
        }
        let end = pos + word.len();
        if end < bytes.len() && is_ident_byte(bytes[end]) {
            continue;
        }
        return Some(pos);
    }
    None
}

fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Offset of the `)` matching the `(` at `open`, honoring strings/comments.
pub fn matching_paren(text: &str, classes: &[ByteClass], open: usize) -> Option<usize> {
    matching(text, classes, open, b'(', b')')
}

/// Offset of the `}` matching the `{` at `open`.
pub fn matching_brace(text: &str, classes: &[ByteClass], open: usize) -> Option<usize> {
    matching(text, classes, open, b'{', b'}')
}

fn matching(text: &str, classes: &[ByteClass], open: usize, lhs: u8, rhs: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    debug_assert_eq!(bytes[open], lhs);
    let mut depth = 0usize;
    for i in open..bytes.len() {
        if classes[i] != ByteClass::Code {
            continue;
        }
        if bytes[i] == lhs {
            depth += 1;
        } else if bytes[i] == rhs {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn matching_angle(text: &str, classes: &[ByteClass], open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    for i in open..bytes.len() {
        if classes[i] != ByteClass::Code {
            continue;
        }
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            // A type-argument list never crosses these
            b';' | b'{' | b'}' => return None,
            _ => {}
        }
    }
    None
}

/// Split the given span at top-level commas. `respect_angles` is required
/// for type lists, where generic arguments contain commas of their own;
/// argument lists must not use it because `<` may be a comparison there.
pub fn split_spans(
    text: &str,
    classes: &[ByteClass],
    span: TextSpan,
    respect_angles: bool,
) -> Vec<TextSpan> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut depth = 0isize;
    let mut angle_depth = 0isize;
    let mut piece_start = span.start;

    for i in span.start..span.end.min(bytes.len()) {
        if classes[i] != ByteClass::Code {
            continue;
        }
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            b'<' if respect_angles => angle_depth += 1,
            b'>' if respect_angles && angle_depth > 0 => angle_depth -= 1,
            b',' if depth == 0 && angle_depth == 0 => {
                pieces.push(trim_span(text, TextSpan::new(piece_start, i)));
                piece_start = i + 1;
            }
            _ => {}
        }
    }
    let last = trim_span(text, TextSpan::new(piece_start, span.end.min(bytes.len())));
    if !last.is_empty() || !pieces.is_empty() {
        pieces.push(last);
    }
    pieces.retain(|s| !s.is_empty());
    pieces
}

fn trim_span(text: &str, span: TextSpan) -> TextSpan {
    let bytes = text.as_bytes();
    let mut start = span.start;
    let mut end = span.end;
    while start < end && bytes[start].is_ascii_whitespace() {
        start += 1;
    }
    while end > start && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    TextSpan::new(start, end)
}

/// One textual argument of an invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Present for named arguments (`name: expr`)
    pub name: Option<String>,
    /// Full argument text, including any name prefix
    pub text: String,
    pub span: TextSpan,
}

/// An invocation of a named method.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationSite {
    pub name_span: TextSpan,
    /// Span between the parentheses, exclusive of both
    pub arg_list_span: TextSpan,
    pub arguments: Vec<Argument>,
}

/// A method declaration of a given name.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationSite {
    pub name_span: TextSpan,
    /// Span between the parentheses, exclusive of both
    pub param_list_span: TextSpan,
    pub parameter_names: Vec<String>,
}

// Words that introduce an expression context, so `word Name(` is a call
const EXPRESSION_KEYWORDS: &[&str] = &[
    "return", "await", "yield", "throw", "else", "do", "in", "case", "when", "is", "and", "or",
    "not", "switch", "while", "if",
];

/// Is the name occurrence at `name_start` a declaration rather than a call?
fn is_declaration_context(text: &str, classes: &[ByteClass], name_start: usize) -> bool {
    let bytes = text.as_bytes();
    let mut k = name_start;
    while k > 0 {
        k -= 1;
        if classes[k] != ByteClass::Code || bytes[k].is_ascii_whitespace() {
            continue;
        }
        if bytes[k] == b'.' {
            return false;
        }
        if bytes[k] == b'>' {
            // `=>` introduces an expression; `Task<int>` a return type
            return k == 0 || bytes[k - 1] != b'=';
        }
        if bytes[k] == b']' {
            return true;
        }
        if is_ident_byte(bytes[k]) {
            let end = k + 1;
            let mut start = k;
            while start > 0 && is_ident_byte(bytes[start - 1]) {
                start -= 1;
            }
            let word = &text[start..end];
            return !EXPRESSION_KEYWORDS.contains(&word);
        }
        return false;
    }
    true
}

/// Locate the name + argument-list span of a candidate, shared by the
/// invocation and declaration scans.
fn candidate_at(
    text: &str,
    classes: &[ByteClass],
    pos: usize,
    name_len: usize,
) -> Option<(TextSpan, TextSpan)> {
    let bytes = text.as_bytes();
    let mut j = skip_ws(bytes, pos + name_len);
    if bytes.get(j) == Some(&b'<') {
        let close = matching_angle(text, classes, j)?;
        j = skip_ws(bytes, close + 1);
    }
    if bytes.get(j) != Some(&b'(') {
        return None;
    }
    let close = matching_paren(text, classes, j)?;
    Some((
        TextSpan::new(pos, pos + name_len),
        TextSpan::new(j + 1, close),
    ))
}

fn parse_argument(text: &str, span: TextSpan) -> Argument {
    let bytes = text.as_bytes();
    let raw = &text[span.start..span.end];
    // Named argument: identifier, optional spaces, ':' not followed by ':'
    let mut k = span.start;
    while k < span.end && is_ident_byte(bytes[k]) {
        k += 1;
    }
    let name = if k > span.start {
        let after = skip_ws(bytes, k);
        if bytes.get(after) == Some(&b':') && bytes.get(after + 1) != Some(&b':') {
            Some(text[span.start..k].to_string())
        } else {
            None
        }
    } else {
        None
    };
    Argument {
        name,
        text: raw.to_string(),
        span,
    }
}

/// Find every invocation of `method_name` in `text`.
pub fn find_invocations(text: &str, method_name: &str) -> Vec<InvocationSite> {
    let classes = classify(text);
    let mut sites = Vec::new();
    let mut at = 0usize;

    while let Some(pos) = find_word(text, &classes, method_name, at) {
        at = pos + method_name.len();
        if is_declaration_context(text, &classes, pos) {
            continue;
        }
        let Some((name_span, arg_list_span)) = candidate_at(text, &classes, pos, method_name.len())
        else {
            continue;
        };
        let arguments = split_spans(text, &classes, arg_list_span, false)
            .into_iter()
            .map(|span| parse_argument(text, span))
            .collect();
        sites.push(InvocationSite {
            name_span,
            arg_list_span,
            arguments,
        });
    }
    sites
}

/// Name of one declared parameter: the identifier before any default
/// value, after any modifiers and the type.
fn parameter_name(text: &str, classes: &[ByteClass], span: TextSpan) -> String {
    let bytes = text.as_bytes();
    // Cut at a top-level '=' (default value)
    let mut end = span.end;
    let mut depth = 0isize;
    let mut angle = 0isize;
    for i in span.start..span.end {
        if classes[i] != ByteClass::Code {
            continue;
        }
        match bytes[i] {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth -= 1,
            b'<' => angle += 1,
            b'>' => angle -= 1,
            b'=' if depth == 0 && angle == 0 => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    // Trailing identifier
    while end > span.start && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    let mut start = end;
    while start > span.start && is_ident_byte(bytes[start - 1]) {
        start -= 1;
    }
    text[start..end].to_string()
}

/// Find every declaration of a method named `method_name`.
pub fn find_method_declarations(text: &str, method_name: &str) -> Vec<DeclarationSite> {
    let classes = classify(text);
    let mut sites = Vec::new();
    let mut at = 0usize;

    while let Some(pos) = find_word(text, &classes, method_name, at) {
        at = pos + method_name.len();
        if !is_declaration_context(text, &classes, pos) {
            continue;
        }
        let Some((name_span, param_list_span)) = candidate_at(text, &classes, pos, method_name.len())
        else {
            continue;
        };
        let parameter_names = split_spans(text, &classes, param_list_span, true)
            .into_iter()
            .map(|span| parameter_name(text, &classes, span))
            .collect();
        sites.push(DeclarationSite {
            name_span,
            param_list_span,
            parameter_names,
        });
    }
    sites
}

/// Where to splice an interface name into a type's base list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaseListInsertion {
    /// No base list yet; insert ` : Name` at the offset
    NewList { at: usize },
    /// Base list present; insert `, Name` at the offset
    Append { at: usize },
}

/// A class / struct / interface / record declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclarationSite {
    pub name_span: TextSpan,
    pub insertion: BaseListInsertion,
    pub open_brace: usize,
    pub close_brace: usize,
}

const TYPE_KEYWORDS: &[&str] = &["class", "struct", "interface", "record"];

/// Find the declaration of the named type.
pub fn find_type_declaration(text: &str, type_name: &str) -> Option<TypeDeclarationSite> {
    let classes = classify(text);
    let bytes = text.as_bytes();

    let mut at = 0usize;
    while let Some(pos) = find_word(text, &classes, type_name, at) {
        at = pos + type_name.len();

        // The word before the name must be a type-introducing keyword
        let mut k = pos;
        while k > 0 && bytes[k - 1].is_ascii_whitespace() {
            k -= 1;
        }
        let word_end = k;
        while k > 0 && is_ident_byte(bytes[k - 1]) {
            k -= 1;
        }
        if !TYPE_KEYWORDS.contains(&&text[k..word_end]) {
            continue;
        }

        // Skip a generic parameter list after the name
        let mut after_name = pos + type_name.len();
        let mut j = skip_ws(bytes, after_name);
        if bytes.get(j) == Some(&b'<') {
            after_name = matching_angle(text, &classes, j)? + 1;
            j = skip_ws(bytes, after_name);
        }

        // Scan to ':', 'where', or '{'
        let mut colon: Option<usize> = None;
        let mut stop = j;
        let mut i = j;
        while i < bytes.len() {
            if classes[i] != ByteClass::Code {
                i += 1;
                continue;
            }
            if bytes[i] == b':' && colon.is_none() {
                colon = Some(i);
            } else if bytes[i] == b'{' {
                stop = i;
                break;
            } else if is_ident_byte(bytes[i]) {
                let mut end = i;
                while end < bytes.len() && is_ident_byte(bytes[end]) {
                    end += 1;
                }
                if &text[i..end] == "where" {
                    stop = i;
                    break;
                }
                i = end;
                continue;
            }
            i += 1;
        }
        if bytes.get(stop).is_none() {
            return None;
        }

        // Insertion point: after the last non-ws byte before the stop
        let mut insert_at = stop;
        while insert_at > after_name && bytes[insert_at - 1].is_ascii_whitespace() {
            insert_at -= 1;
        }
        let insertion = match colon {
            Some(_) => BaseListInsertion::Append { at: insert_at },
            None => BaseListInsertion::NewList { at: insert_at },
        };

        let open_brace = if bytes.get(stop) == Some(&b'{') {
            stop
        } else {
            let mut b = stop;
            while b < bytes.len() && !(classes[b] == ByteClass::Code && bytes[b] == b'{') {
                b += 1;
            }
            b
        };
        if open_brace >= bytes.len() {
            return None;
        }
        let close_brace = matching_brace(text, &classes, open_brace)?;

        return Some(TypeDeclarationSite {
            name_span: TextSpan::new(pos, pos + type_name.len()),
            insertion,
            open_brace,
            close_brace,
        });
    }
    None
}

/// Replace whole-word occurrences of `word` inside string literals and/or
/// comments, leaving code regions untouched.
pub fn replace_word_in_regions(
    text: &str,
    word: &str,
    replacement: &str,
    in_strings: bool,
    in_comments: bool,
) -> String {
    let classes = classify(text);
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0usize;

    while i < bytes.len() {
        let eligible = match classes[i] {
            ByteClass::Str => in_strings,
            ByteClass::Comment => in_comments,
            ByteClass::Code => false,
        };
        if eligible
            && text[i..].starts_with(word)
            && (i == 0 || !is_ident_byte(bytes[i - 1]))
            && (i + word.len() >= bytes.len() || !is_ident_byte(bytes[i + word.len()]))
        {
            out.push_str(replacement);
            i += word.len();
        } else {
            // Advance one UTF-8 character at a time
            let ch = text[i..].chars().next().unwrap();
            out.push(ch);
            i += ch.len_utf8();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn classify_skips_strings_and_comments() {
        let text = r#"var x = "Foo(1)"; // Foo(2)
Foo(3);"#;
        let classes = classify(text);
        let call = text.rfind("Foo").unwrap();
        assert_eq!(classes[call], ByteClass::Code);
        let in_string = text.find("Foo").unwrap();
        assert_eq!(classes[in_string], ByteClass::Str);
        let in_comment = text.find("Foo(2)").unwrap();
        assert_eq!(classes[in_comment], ByteClass::Comment);
    }

    #[test]
    fn classify_verbatim_strings() {
        let text = r#"var p = @"C:\temp\""quoted"" \no-escape"; Foo();"#;
        let classes = classify(text);
        let call = text.find("Foo").unwrap();
        assert_eq!(classes[call], ByteClass::Code);
    }

    #[test]
    fn finds_invocations_not_declarations() {
        let text = "class C\n{\n    void Foo(int a, int b) { }\n    void Bar()\n    {\n        Foo(1, 2);\n        this.Foo(3, 4);\n        return;\n    }\n}\n";
        let sites = find_invocations(text, "Foo");
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].arguments.len(), 2);
        assert_eq!(sites[0].arguments[0].text, "1");
        assert_eq!(sites[1].arguments[1].text, "4");
    }

    #[test]
    fn invocation_after_return_keyword() {
        let text = "int Bar() { return Foo(1); }";
        let sites = find_invocations(text, "Foo");
        assert_eq!(sites.len(), 1);
    }

    #[test]
    fn invocation_in_lambda_body() {
        let text = "var f = () => Foo(1);";
        let sites = find_invocations(text, "Foo");
        assert_eq!(sites.len(), 1);
    }

    #[test]
    fn named_arguments_are_detected() {
        let text = "void Bar() { M(y: \"z\", x: 1); }";
        let sites = find_invocations(text, "M");
        assert_eq!(sites.len(), 1);
        let args = &sites[0].arguments;
        assert_eq!(args[0].name.as_deref(), Some("y"));
        assert_eq!(args[0].text, "y: \"z\"");
        assert_eq!(args[1].name.as_deref(), Some("x"));
    }

    #[test]
    fn nested_calls_do_not_split_arguments() {
        let text = "void Bar() { Foo(Baz(1, 2), 3); }";
        let sites = find_invocations(text, "Foo");
        assert_eq!(sites[0].arguments.len(), 2);
        assert_eq!(sites[0].arguments[0].text, "Baz(1, 2)");
    }

    #[test]
    fn generic_invocation() {
        let text = "void Bar() { var x = Foo<int, string>(1); }";
        let sites = find_invocations(text, "Foo");
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].arguments.len(), 1);
    }

    #[test]
    fn declaration_parameter_names() {
        let text =
            "public Dictionary<string, int> Count(IEnumerable<string> items, int seed = 0) { }";
        let decls = find_method_declarations(text, "Count");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].parameter_names, vec!["items", "seed"]);
    }

    #[test]
    fn declaration_with_modifiers_and_arrays() {
        let text = "void Fill(ref int total, params string[] rest) { }";
        let decls = find_method_declarations(text, "Fill");
        assert_eq!(decls[0].parameter_names, vec!["total", "rest"]);
    }

    #[test]
    fn type_declaration_without_base_list() {
        let text = "namespace App\n{\n    public class Greeter\n    {\n        void Hello() { }\n    }\n}\n";
        let site = find_type_declaration(text, "Greeter").unwrap();
        assert!(matches!(site.insertion, BaseListInsertion::NewList { .. }));
        assert_eq!(text.as_bytes()[site.close_brace], b'}');
        let BaseListInsertion::NewList { at } = site.insertion else {
            unreachable!()
        };
        assert_eq!(&text[at - 7..at], "Greeter");
    }

    #[test]
    fn type_declaration_with_base_list() {
        let text = "public class Greeter : BaseGreeter, IDisposable\n{\n}\n";
        let site = find_type_declaration(text, "Greeter").unwrap();
        let BaseListInsertion::Append { at } = site.insertion else {
            panic!("expected append")
        };
        assert_eq!(&text[at - 11..at], "IDisposable");
    }

    #[test]
    fn generic_type_declaration_with_constraint() {
        let text = "public class Cache<T> where T : class\n{\n}\n";
        let site = find_type_declaration(text, "Cache").unwrap();
        let BaseListInsertion::NewList { at } = site.insertion else {
            panic!("expected new list")
        };
        assert_eq!(&text[at - 3..at], "<T>");
    }

    #[test]
    fn word_replacement_respects_regions() {
        let text = "// Foo does things\nvar s = \"call Foo here\"; Foo();";
        let replaced = replace_word_in_regions(text, "Foo", "Bar", true, true);
        assert_eq!(replaced, "// Bar does things\nvar s = \"call Bar here\"; Foo();");

        let strings_only = replace_word_in_regions(text, "Foo", "Bar", true, false);
        assert_eq!(
            strings_only,
            "// Foo does things\nvar s = \"call Bar here\"; Foo();"
        );
    }

    #[test]
    fn word_replacement_honors_boundaries() {
        let text = "// Food and Foo";
        let replaced = replace_word_in_regions(text, "Foo", "Bar", true, true);
        assert_eq!(replaced, "// Food and Bar");
    }

    #[test]
    fn split_spans_respects_angle_depth_for_types() {
        let text = "Dictionary<string, int> map, int x";
        let classes = classify(text);
        let spans = split_spans(
            text,
            &classes,
            TextSpan::new(0, text.len()),
            true,
        );
        assert_eq!(spans.len(), 2);
        assert_eq!(&text[spans[0].start..spans[0].end], "Dictionary<string, int> map");
        assert_eq!(&text[spans[1].start..spans[1].end], "int x");
    }
}
