//! String helpers over filesystem paths.
//!
//! Both `\` and `/` are accepted as separators so Windows-style paths can be
//! handled (and tested) on any host.

use std::path::{Path, PathBuf};

/// Suffix carried by shell link files.
pub const LINK_SUFFIX: &str = ".lnk";

fn is_sep(c: char) -> bool {
    c == '\\' || c == '/'
}

fn as_str(path: &Path) -> std::borrow::Cow<'_, str> {
    path.to_string_lossy()
}

/// Length of the root prefix of `s` (`C:\`, `C:`, `\\server\share\`, `/`), or 0.
fn root_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        return if bytes.len() >= 3 && is_sep(bytes[2] as char) { 3 } else { 2 };
    }
    if s.starts_with("\\\\") || s.starts_with("//") {
        // \\server\share\
        let rest = &s[2..];
        let mut seps = rest.char_indices().filter(|&(_, c)| is_sep(c));
        return match (seps.next(), seps.next()) {
            (Some(_), Some((second, _))) => 2 + second + 1,
            (Some(_), None) => s.len(),
            _ => s.len(),
        };
    }
    if s.starts_with(is_sep) {
        return 1;
    }
    0
}

/// Whether `path` names a filesystem root (`C:\`, `/`, `\\server\share`).
pub fn is_root(path: &Path) -> bool {
    let s = as_str(path);
    let root = root_len(&s);
    root > 0 && s[root..].trim_matches(is_sep).is_empty()
}

/// Root of the volume holding `path`, e.g. `E:\` for `E:\foo\bar`.
pub fn drive_root(path: &Path) -> Option<PathBuf> {
    let s = as_str(path);
    let root = root_len(&s);
    if root == 0 {
        return None;
    }
    let mut prefix = s[..root].to_string();
    if prefix.len() == 2 && prefix.ends_with(':') {
        prefix.push('\\');
    }
    Some(PathBuf::from(prefix))
}

/// `X:\` for a path on a lettered drive, `None` for every other kind of path.
pub fn drive_letter_root(path: &Path) -> Option<PathBuf> {
    let s = as_str(path);
    let bytes = s.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        Some(PathBuf::from(format!("{}:\\", &s[..1])))
    } else {
        None
    }
}

/// Parent folder of `path`, `None` for roots and bare names.
pub fn parent(path: &Path) -> Option<PathBuf> {
    let s = as_str(path);
    let root = root_len(&s);
    let trimmed = s.trim_end_matches(is_sep);
    if trimmed.len() <= root {
        return None;
    }
    let cut = trimmed.rfind(is_sep)?;
    if cut < root {
        return Some(PathBuf::from(&s[..root]));
    }
    if cut + 1 == root {
        return Some(PathBuf::from(&s[..root]));
    }
    Some(PathBuf::from(&trimmed[..cut]))
}

/// Last path segment. Roots return themselves so a breadcrumb row has text.
pub fn file_name(path: &Path) -> String {
    let s = as_str(path);
    if is_root(path) {
        return s.into_owned();
    }
    let trimmed = s.trim_end_matches(is_sep);
    match trimmed.rfind(is_sep) {
        Some(cut) => trimmed[cut + 1..].to_string(),
        None => trimmed.to_string(),
    }
}

/// Lower-cased extension without the dot, empty when there is none.
/// Leading dots (`.profile`) do not start an extension.
pub fn extension_lower(name: &str) -> String {
    let base = name.rsplit(is_sep).next().unwrap_or(name);
    match base.rfind('.') {
        Some(0) | None => String::new(),
        Some(dot) => base[dot + 1..].to_ascii_lowercase(),
    }
}

/// Whether `name` carries the shell link suffix.
pub fn has_link_suffix(name: &str) -> bool {
    name.len() > LINK_SUFFIX.len()
        && name[name.len() - LINK_SUFFIX.len()..].eq_ignore_ascii_case(LINK_SUFFIX)
}

/// `name` without the shell link suffix.
pub fn strip_link_suffix(name: &str) -> &str {
    if has_link_suffix(name) {
        &name[..name.len() - LINK_SUFFIX.len()]
    } else {
        name
    }
}

/// Wrap in double quotes when the path contains whitespace, for shell command lines.
pub fn quote(path: &Path) -> String {
    let s = as_str(path);
    if s.contains(char::is_whitespace) && !(s.starts_with('"') && s.ends_with('"')) {
        format!("\"{}\"", s)
    } else {
        s.into_owned()
    }
}

/// `path` followed by each ancestor, ordered root first.
pub fn ancestors_root_first(path: &Path) -> Vec<PathBuf> {
    let mut chain = vec![path.to_path_buf()];
    let mut current = path.to_path_buf();
    while let Some(up) = parent(&current) {
        chain.push(up.clone());
        current = up;
    }
    chain.reverse();
    chain
}

/// Case-insensitive path equality on Windows-style paths, exact elsewhere.
pub fn same_path(a: &Path, b: &Path) -> bool {
    let a = as_str(a);
    let b = as_str(b);
    let a = a.trim_end_matches(is_sep);
    let b = b.trim_end_matches(is_sep);
    if root_len(a) == 2 || root_len(a) == 3 {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}
