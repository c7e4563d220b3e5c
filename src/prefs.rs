//! Typed key/value preference storage.
//!
//! Sections and keys follow INI conventions; the backing file is TOML so it
//! stays human-editable. String lists are stored as numbered keys
//! (`Fav0`, `Fav1`, ...).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use toml::{Table, Value};

pub trait Preferences {
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn set_int(&mut self, section: &str, key: &str, value: i64);
    fn get_string(&self, section: &str, key: &str, default: &str) -> String;
    fn set_string(&mut self, section: &str, key: &str, value: &str);
    /// Values of `prefix0`, `prefix1`, ... up to the first gap or `max` entries.
    fn get_string_list(&self, section: &str, key_prefix: &str, max: usize) -> Vec<String>;
    /// Replace every numbered `prefix<n>` key with `values`.
    fn set_string_list(&mut self, section: &str, key_prefix: &str, values: &[String]);

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get_int(section, key, default as i64) != 0
    }

    fn set_bool(&mut self, section: &str, key: &str, value: bool) {
        self.set_int(section, key, value as i64);
    }
}

/// Preferences kept in a TOML table, optionally tied to a file.
#[derive(Debug, Clone, Default)]
pub struct TomlPreferences {
    path: Option<PathBuf>,
    table: Table,
    dirty: bool,
}

impl TomlPreferences {
    /// In-memory store with no backing file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `path`. A missing file yields an empty store bound to that path.
    pub fn load(path: &Path) -> Result<Self> {
        let table = match fs::read_to_string(path) {
            Ok(text) => text
                .parse::<Table>()
                .with_context(|| format!("Failed to parse preferences {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No preferences at {}, using defaults", path.display());
                Table::new()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read preferences {}", path.display()))
            }
        };
        Ok(Self { path: Some(path.to_path_buf()), table, dirty: false })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write back to the bound file; a store without a file is left alone.
    pub fn save(&mut self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let text = toml::to_string(&self.table).context("Failed to serialize preferences")?;
        fs::write(path, text).with_context(|| format!("Failed to write preferences {}", path.display()))?;
        tracing::debug!("Preferences saved to {}", path.display());
        self.dirty = false;
        Ok(())
    }

    fn value(&self, section: &str, key: &str) -> Option<&Value> {
        self.table.get(section)?.as_table()?.get(key)
    }

    /// Run `f` on the named section, creating it (or replacing a stray scalar) first.
    fn with_section(&mut self, section: &str, f: impl FnOnce(&mut Table)) {
        let mut table = match self.table.remove(section) {
            Some(Value::Table(table)) => table,
            _ => Table::new(),
        };
        f(&mut table);
        self.table.insert(section.to_string(), Value::Table(table));
        self.dirty = true;
    }

    fn put(&mut self, section: &str, key: &str, value: Value) {
        self.with_section(section, |table| {
            table.insert(key.to_string(), value);
        });
    }
}

impl Preferences for TomlPreferences {
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match self.value(section, key) {
            Some(Value::Integer(v)) => *v,
            Some(Value::Boolean(b)) => *b as i64,
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    fn set_int(&mut self, section: &str, key: &str, value: i64) {
        self.put(section, key, Value::Integer(value));
    }

    fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        match self.value(section, key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Integer(v)) => v.to_string(),
            _ => default.to_string(),
        }
    }

    fn set_string(&mut self, section: &str, key: &str, value: &str) {
        self.put(section, key, Value::String(value.to_string()));
    }

    fn get_string_list(&self, section: &str, key_prefix: &str, max: usize) -> Vec<String> {
        let mut values = Vec::new();
        for n in 0..max {
            match self.value(section, &format!("{key_prefix}{n}")) {
                Some(Value::String(s)) => values.push(s.clone()),
                _ => break,
            }
        }
        values
    }

    fn set_string_list(&mut self, section: &str, key_prefix: &str, values: &[String]) {
        self.with_section(section, |table| {
            table.retain(|key, _| {
                !key.strip_prefix(key_prefix)
                    .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            });
            for (n, value) in values.iter().enumerate() {
                table.insert(format!("{key_prefix}{n}"), Value::String(value.clone()));
            }
        });
    }
}
