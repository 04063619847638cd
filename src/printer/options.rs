use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Option names every backend understands, with the values CUPS documents.
pub const KNOWN_OPTIONS: &[(&str, &str)] = &[
    ("sides", "one-sided, two-sided-long-edge, two-sided-short-edge"),
    ("media", "a4, letter, legal, etc."),
    ("orientation", "portrait, landscape"),
    ("quality", "draft, normal, high"),
    ("copies", "number of copies (1, 2, 3, etc.)"),
    ("page-ranges", "1-5, 1,3,5, etc."),
    (
        "finishings",
        "staple-top-left, staple-top-right, staple-bottom-left, staple-bottom-right, \
         staple-dual-left, staple-dual-top, staple-none",
    ),
];

pub fn is_known_option(key: &str) -> bool {
    KNOWN_OPTIONS.iter().any(|(name, _)| *name == key)
}

/// Job options forwarded to the print backend, in the order given.
///
/// Values are never interpreted here. Unknown keys are kept so that
/// backend-specific options still reach the spooler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintOptions {
    entries: Vec<(String, String)>,
}

impl PrintOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing any earlier value for it.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unknown_keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|(k, _)| k.as_str())
            .filter(|k| !is_known_option(k))
            .collect()
    }
}

impl FromStr for PrintOptions {
    type Err = Error;

    /// Parse `key=value,key=value`. Empty segments are skipped.
    fn from_str(s: &str) -> Result<Self> {
        let mut options = PrintOptions::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                Error::invalid("--print-options", format!("expected key=value, got '{}'", part))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(Error::invalid(
                    "--print-options",
                    format!("missing option name in '{}'", part),
                ));
            }
            options.insert(key, value.trim());
        }
        Ok(options)
    }
}

impl fmt::Display for PrintOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}
