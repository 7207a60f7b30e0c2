//! Marker file sets
//!
//! Hook tasks signal progress by touching marker files in the shared `alloc`
//! directory: `<phase>-running` while a hook runs and `<phase>-ran` once it
//! finished. A [`FileSet`] maps marker names to whether they should exist (or
//! were found), and [`FileSet::observe`] builds the observed set from a
//! directory listing.

use std::collections::BTreeMap;
use std::fmt;

use lifecycle_core::domain::fs::AllocFileInfo;
use serde::Serialize;
use tracing::debug;

/// Ordered mapping of marker file name to presence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileSet(BTreeMap<String, bool>);

/// A marker whose observed presence differs from the expected one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub name: String,
    pub expected: bool,
    pub observed: Option<bool>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker set for hooks that all completed cleanly
    ///
    /// Every phase must have left `<phase>-ran` behind and removed its
    /// `<phase>-running` marker.
    pub fn completed_hooks(phases: &[&str]) -> Self {
        phases
            .iter()
            .flat_map(|phase| [(format!("{}-ran", phase), true), (format!("{}-running", phase), false)])
            .collect()
    }

    /// Adds or overrides one expectation
    pub fn expect(mut self, name: impl Into<String>, present: bool) -> Self {
        self.0.insert(name.into(), present);
        self
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.0.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds the observed set for these expectations from a directory listing
    ///
    /// The result has exactly the keys of `self`. A key is true when some
    /// listing entry carries that exact name; entries with other names are
    /// ignored.
    pub fn observe(&self, listing: &[AllocFileInfo]) -> FileSet {
        let mut observed: BTreeMap<String, bool> =
            self.0.keys().map(|name| (name.clone(), false)).collect();

        let mut ignored = 0usize;
        for entry in listing {
            match observed.get_mut(&entry.name) {
                Some(found) => *found = true,
                None => ignored += 1,
            }
        }

        if ignored > 0 {
            debug!("Ignored {} unrelated entries in allocation listing", ignored);
        }

        FileSet(observed)
    }

    /// Expectations that `observed` does not meet, in name order
    pub fn mismatches(&self, observed: &FileSet) -> Vec<Mismatch> {
        self.0
            .iter()
            .filter_map(|(name, &expected)| {
                let actual = observed.get(name);
                (actual != Some(expected)).then(|| Mismatch {
                    name: name.clone(),
                    expected,
                    observed: actual,
                })
            })
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for FileSet {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        FileSet(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Display for FileSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, present)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", name, present)?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.observed {
            Some(observed) => write!(
                f,
                "{}: expected {}, observed {}",
                self.name, self.expected, observed
            ),
            None => write!(f, "{}: expected {}, not checked", self.name, self.expected),
        }
    }
}
