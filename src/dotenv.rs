//! Local settings file (`.env.local`) support.
//!
//! Values from the file are kept as an overlay behind the real process
//! environment instead of being written into it, so a variable that is already
//! set always wins.

use std::collections::HashMap;
use std::env::VarError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENV_FILE: &str = ".env.local";

#[derive(Debug, Clone)]
pub struct Environment {
    path: PathBuf,
    file: HashMap<String, String>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_ENV_FILE),
            file: HashMap::new(),
        }
    }
}

impl Environment {
    /// Load `path` if it exists. A missing file yields an empty overlay.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let env = match std::fs::read_to_string(path) {
            Ok(s) => Self::parse(&s),
            Err(e) if e.kind() == ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(e),
        };
        Ok(Self {
            path: path.to_owned(),
            ..env
        })
    }

    /// The settings file this overlay was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse(contents: &str) -> Self {
        let mut file = HashMap::new();
        for (key, value) in contents.lines().filter_map(parse_line) {
            file.entry(key.to_owned()).or_insert(value.to_owned());
        }
        tracing::debug!("loaded {} entries from settings file", file.len());
        Self {
            file,
            ..Self::default()
        }
    }

    /// Process environment first; the settings file only for variables that
    /// are not set at all. A preset empty value is returned as is.
    pub fn var(&self, key: &str) -> Option<String> {
        match std::env::var(key) {
            Ok(v) => Some(v),
            Err(VarError::NotPresent) => self.file.get(key).cloned(),
            Err(VarError::NotUnicode(_)) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.file.len()
    }
}

fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let key = key.strip_prefix("export ").map(str::trim).unwrap_or(key);
    if key.is_empty() {
        return None;
    }
    Some((key, strip_quotes(value.trim())))
}

/// Remove one layer of matching `"` or `'` around `s`.
fn strip_quotes(s: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(q).and_then(|r| r.strip_suffix(q)) {
            return inner;
        }
    }
    s
}
