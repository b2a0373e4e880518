//! Parsing of `git config --list --null`.
//!
//! With `--null`, each entry is terminated by NUL and the key is separated
//! from its value by a newline, so values containing newlines or `=` survive.
//! A key with no newline is a boolean-style entry without a value.

use std::collections::BTreeMap;

/// Flat view of the effective git configuration.
///
/// Keys keep git's normalisation: section and variable names are lowercase,
/// subsection names (branch names) keep their case. Multi-valued keys keep
/// the last value, matching git's own "last one wins" lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitConfigMap {
    entries: BTreeMap<String, String>,
}

impl GitConfigMap {
    /// Parse the raw output of `git config --list --null`.
    pub fn parse(raw: &str) -> Self {
        let entries = raw
            .split('\0')
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once('\n') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (entry.to_string(), String::new()),
            })
            .collect();
        GitConfigMap { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Look up `branch.<branch>.<key>`.
    pub fn branch_value(&self, branch: &str, key: &str) -> Option<&str> {
        self.get(&format!("branch.{}.{}", branch, key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for GitConfigMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        GitConfigMap {
            entries: iter.into_iter().collect(),
        }
    }
}
