use std::collections::HashMap;

use compact_str::CompactString;

use crate::list::item::UNCLASSIFIED;
use crate::prefs::Preferences;

/// Key used to ask for the folder colour instead of an extension.
pub const FOLDER_KEY: &str = "<folder>";

/// Read-only mapping from file type to colour id and open command.
pub trait TypeClassifier {
    /// Colour id for a lower-case extension or `FOLDER_KEY`; `-1` when unclassified.
    fn color_for(&self, key: &str) -> i32;
    fn open_command_for(&self, extension: &str) -> Option<String>;
}

/// File type categories for colour mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    /// Images: jpg, png, gif, bmp, svg, webp, ico, tiff
    Image,
    /// Video: mp4, avi, mkv, mov, wmv, flv, webm
    Video,
    /// Audio: mp3, wav, flac, aac, ogg, wma, m4a
    Audio,
    /// Documents: pdf, doc, docx, txt, rtf, odt, xls, xlsx, ppt, csv
    Document,
    /// Archives: zip, rar, 7z, tar, gz, bz2, xz
    Archive,
    /// Code: rs, py, js, c, cpp, h, java, go, html, css
    Code,
    /// Executables and scripts: exe, dll, bat, cmd, ps1
    Executable,
    /// Config: ini, cfg, toml, yaml, json, xml, reg
    Config,
    /// Shell links
    Link,
    /// Disk images: iso, img, vhd, vmdk
    DiskImage,
    Other,
}

impl FileCategory {
    /// Colour id handed out for this category. `Other` is unclassified.
    pub fn color_id(self) -> i32 {
        match self {
            FileCategory::Image => 1,
            FileCategory::Video => 2,
            FileCategory::Audio => 3,
            FileCategory::Document => 4,
            FileCategory::Archive => 5,
            FileCategory::Code => 6,
            FileCategory::Executable => 7,
            FileCategory::Config => 8,
            FileCategory::Link => 9,
            FileCategory::DiskImage => 10,
            FileCategory::Other => UNCLASSIFIED,
        }
    }
}

/// Colour id of folders.
pub const FOLDER_COLOR: i32 = 0;

/// Classify a file extension into a category.
pub fn categorize_extension(ext: &str) -> FileCategory {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "svg" | "webp" | "ico" | "tiff" | "tif" | "heic" => {
            FileCategory::Image
        }
        "mp4" | "avi" | "mkv" | "mov" | "wmv" | "flv" | "webm" | "m4v" | "mpg" | "mpeg" => FileCategory::Video,
        "mp3" | "wav" | "flac" | "aac" | "ogg" | "wma" | "m4a" | "opus" | "mid" => FileCategory::Audio,
        "pdf" | "doc" | "docx" | "txt" | "rtf" | "odt" | "xls" | "xlsx" | "ppt" | "pptx" | "csv" | "md" => {
            FileCategory::Document
        }
        "zip" | "rar" | "7z" | "tar" | "gz" | "bz2" | "xz" | "zst" | "cab" | "lzh" => FileCategory::Archive,
        "rs" | "py" | "js" | "ts" | "c" | "cpp" | "h" | "hpp" | "java" | "go" | "rb" | "php" | "html"
        | "htm" | "css" | "cs" | "lua" | "sh" | "sql" => FileCategory::Code,
        "exe" | "dll" | "sys" | "bat" | "cmd" | "ps1" | "com" | "scr" | "msi" => FileCategory::Executable,
        "ini" | "cfg" | "toml" | "yaml" | "yml" | "json" | "xml" | "reg" | "conf" => FileCategory::Config,
        "lnk" | "url" => FileCategory::Link,
        "iso" | "img" | "vhd" | "vhdx" | "vmdk" => FileCategory::DiskImage,
        _ => FileCategory::Other,
    }
}

#[derive(Debug, Clone)]
struct TypeRule {
    color: i32,
    command: Option<String>,
}

/// Built-in categories plus user overrides from `[TypeTable]`.
///
/// Override entries read `ext1,ext2|color|command`; an empty colour keeps the
/// built-in one, an empty command means none.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    rules: HashMap<CompactString, TypeRule>,
}

impl TypeTable {
    pub const MAX_RULES: usize = 256;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_prefs(prefs: &dyn Preferences) -> Self {
        let mut table = Self::new();
        for line in prefs.get_string_list("TypeTable", "Type", Self::MAX_RULES) {
            if !table.add_rule(&line) {
                tracing::warn!("Ignoring malformed type rule '{}'", line);
            }
        }
        table
    }

    /// Parse and add one `ext1,ext2|color|command` rule.
    pub fn add_rule(&mut self, line: &str) -> bool {
        let mut parts = line.splitn(3, '|');
        let exts = parts.next().unwrap_or("").trim();
        let color = parts.next().unwrap_or("").trim();
        let command = parts.next().unwrap_or("").trim();
        if exts.is_empty() {
            return false;
        }
        let color = if color.is_empty() {
            None
        } else {
            match color.parse::<i32>() {
                Ok(c) => Some(c),
                Err(_) => return false,
            }
        };
        for ext in exts.split(',').map(|e| e.trim().trim_start_matches('.')).filter(|e| !e.is_empty()) {
            let key = CompactString::new(ext.to_ascii_lowercase());
            let builtin = builtin_color(&key);
            self.rules.insert(
                key,
                TypeRule {
                    color: color.unwrap_or(builtin),
                    command: (!command.is_empty()).then(|| command.to_string()),
                },
            );
        }
        true
    }
}

fn builtin_color(key: &str) -> i32 {
    if key == FOLDER_KEY {
        FOLDER_COLOR
    } else {
        categorize_extension(key).color_id()
    }
}

impl TypeClassifier for TypeTable {
    fn color_for(&self, key: &str) -> i32 {
        let lower = key.to_ascii_lowercase();
        match self.rules.get(lower.as_str()) {
            Some(rule) => rule.color,
            None => builtin_color(&lower),
        }
    }

    fn open_command_for(&self, extension: &str) -> Option<String> {
        let lower = extension.to_ascii_lowercase();
        self.rules.get(lower.as_str()).and_then(|rule| rule.command.clone())
    }
}
