use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Read one path per line, at most `max` entries. `None` when the file does not exist.
pub fn read_list(path: &Path, max: usize) -> Result<Option<Vec<PathBuf>>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
    };
    let entries = text
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(max)
        .map(PathBuf::from)
        .collect();
    Ok(Some(entries))
}

/// Overwrite `path` with one entry per line.
pub fn write_list(path: &Path, entries: &[PathBuf]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let mut text = String::new();
    for entry in entries {
        text.push_str(&entry.to_string_lossy());
        text.push('\n');
    }
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_list(&dir.path().join("nope.txt"), 10).unwrap().is_none());
    }

    #[test]
    fn lines_are_trimmed_capped_and_bom_stripped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.txt");
        fs::write(&path, "\u{feff}C:\\A\r\n\n  C:\\B \nC:\\C\n").unwrap();
        let entries = read_list(&path, 2).unwrap().unwrap();
        assert_eq!(entries, vec![PathBuf::from("C:\\A"), PathBuf::from("C:\\B")]);
    }

    #[test]
    fn write_overwrites_fully() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bookmarks.txt");
        write_list(&path, &[PathBuf::from("/a"), PathBuf::from("/b")]).unwrap();
        write_list(&path, &[PathBuf::from("/c")]).unwrap();
        assert_eq!(read_list(&path, 10).unwrap().unwrap(), vec![PathBuf::from("/c")]);
    }
}
