use std::fmt;
use std::fs;
use std::ops::Index;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::Error;
use crate::key;

#[cfg(windows)]
const LINE_SEP: &str = "\r\n";
#[cfg(not(windows))]
const LINE_SEP: &str = "\n";

/// An immutable, insertion-ordered mapping of resolved `.env` variables.
///
/// Produced by a parse and never mutated afterwards; there are no public
/// mutating methods. Re-assigning a key during the parse overwrites the
/// value but keeps the key's original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvMap {
    vars: IndexMap<String, String>,
}

impl EnvMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from arbitrary pairs, validating every key. Later pairs
    /// overwrite earlier ones for the same key.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut vars = IndexMap::new();
        for (k, v) in pairs {
            let k = k.into();
            key::validate_key(&k)?;
            vars.insert(k, v.into());
        }
        Ok(Self { vars })
    }

    /// Internal constructor for parser output; keys are already validated.
    pub(crate) fn from_resolved(vars: IndexMap<String, String>) -> Self {
        Self { vars }
    }

    /// Get value by key (returns None if not found)
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Get value or default
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Iterate over all pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Sets every variable in the current process environment, skipping keys
    /// whose value already matches. Callers must not run this concurrently
    /// with another parse or apply in the same process.
    pub fn apply_to_env(&self) {
        for (key, value) in &self.vars {
            if std::env::var(key).map_or(true, |current| current != *value) {
                std::env::set_var(key, value);
            }
        }
    }

    /// Removes every key in this map from the process environment.
    pub fn remove_from_env(&self) {
        for key in self.vars.keys() {
            std::env::remove_var(key);
        }
    }

    /// Writes the canonical `KEY="VALUE"` form to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        fs::write(path, self.to_string())
            .map_err(|e| Error::Io(format!("failed to write {}: {}", path.display(), e)))
    }
}

/// Canonical form: one `KEY="VALUE"` per line. Lossy: multi-line and
/// interpolated source syntax is not reproduced.
impl fmt::Display for EnvMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.vars {
            if !first {
                f.write_str(LINE_SEP)?;
            }
            first = false;
            write!(f, "{}=\"{}\"", key, value)?;
        }
        Ok(())
    }
}

/// Panics when the key is missing, like a plain map index.
impl Index<&str> for EnvMap {
    type Output = str;

    fn index(&self, key: &str) -> &str {
        &self.vars[key]
    }
}

impl<'a> IntoIterator for &'a EnvMap {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}
