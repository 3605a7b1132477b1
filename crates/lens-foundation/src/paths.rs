//! Filesystem path canonicalization and relative display
//!
//! All externally displayed paths are relative to a caller-supplied base
//! when that base is a strict prefix (compared case-insensitively, since
//! solution files routinely mix drive/path casing); absolute otherwise.
//! Separators in displayed paths always match the host OS.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// Canonicalize a path: resolve symlinks when the path exists, otherwise
/// fall back to a lexical cleanup of an absolutized path.
pub fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    lexical_clean(&absolute)
}

/// Remove `.` segments and resolve `..` segments without touching the
/// filesystem.
fn lexical_clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    cleaned.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    cleaned.pop();
                }
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}

/// Compare two paths component-wise, ignoring case.
pub fn paths_equal_ci(a: &Path, b: &Path) -> bool {
    let a: Vec<_> = a.components().collect();
    let b: Vec<_> = b.components().collect();
    a.len() == b.len()
        && a.iter().zip(b.iter()).all(|(x, y)| {
            x.as_os_str()
                .to_string_lossy()
                .eq_ignore_ascii_case(&y.as_os_str().to_string_lossy())
        })
}

/// Does `base` strictly prefix `path` (case-insensitive, component-wise)?
fn is_strict_prefix_ci(base: &Path, path: &Path) -> bool {
    let base: Vec<_> = base.components().collect();
    let path: Vec<_> = path.components().collect();
    base.len() < path.len()
        && base.iter().zip(path.iter()).all(|(x, y)| {
            x.as_os_str()
                .to_string_lossy()
                .eq_ignore_ascii_case(&y.as_os_str().to_string_lossy())
        })
}

/// Render `path` relative to `base` when `base` is a strict prefix;
/// otherwise render the absolute path. Host separators either way.
pub fn display_relative(base: &Path, path: &Path) -> String {
    if is_strict_prefix_ci(base, path) {
        let skip = base.components().count();
        let parts: Vec<String> = path
            .components()
            .skip(skip)
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        parts.join(&MAIN_SEPARATOR.to_string())
    } else {
        path.display().to_string()
    }
}

/// Case-insensitive comparison of file base names (without extension).
pub fn file_stem_equals_ci(path: &Path, name: &str) -> bool {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().eq_ignore_ascii_case(name))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_clean_resolves_dots() {
        let cleaned = lexical_clean(Path::new("/a/b/../c/./d"));
        assert_eq!(cleaned, PathBuf::from("/a/c/d"));
    }

    #[test]
    fn relative_when_base_is_strict_prefix() {
        let base = Path::new("/home/user/proj");
        let path = Path::new("/home/user/proj/src/Greeter.cs");
        let sep = MAIN_SEPARATOR.to_string();
        assert_eq!(
            display_relative(base, path),
            format!("src{sep}Greeter.cs")
        );
    }

    #[test]
    fn absolute_when_base_is_not_a_prefix() {
        let base = Path::new("/home/user/proj");
        let path = Path::new("/tmp/other/File.cs");
        assert_eq!(display_relative(base, path), "/tmp/other/File.cs");
    }

    #[test]
    fn prefix_comparison_ignores_case() {
        let base = Path::new("/Home/User/Proj");
        let path = Path::new("/home/user/proj/Program.cs");
        assert_eq!(display_relative(base, path), "Program.cs");
    }

    #[test]
    fn equal_paths_are_not_a_strict_prefix() {
        let base = Path::new("/home/user/proj");
        assert_eq!(
            display_relative(base, base),
            "/home/user/proj"
        );
    }

    #[test]
    fn file_stem_comparison() {
        assert!(file_stem_equals_ci(Path::new("/x/Greeter.cs"), "greeter"));
        assert!(!file_stem_equals_ci(Path::new("/x/Greeter.cs"), "other"));
    }
}
