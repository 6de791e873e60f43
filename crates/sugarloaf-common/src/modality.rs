//! Compound records handed from name resolution to the embedding stage.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Resolved modality
// ---------------------------------------------------------------------------

/// Structure string and registry id for one compound name.
///
/// Only built when the structure lookup produced a value. The `cid` field is
/// kept whatever its own lookup returned, so it may hold an outcome label
/// such as `"not found"` instead of a numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedModality {
    pub smiles: String,
    pub cid: String,
}

impl ResolvedModality {
    pub fn new(smiles: impl Into<String>, cid: impl Into<String>) -> Self {
        Self { smiles: smiles.into(), cid: cid.into() }
    }
}

/// Original candidate name -> resolved modality.
pub type Modalities = BTreeMap<String, ResolvedModality>;

/// Original candidate name -> pooled embedding vector.
pub type Embeddings = BTreeMap<String, Vec<f32>>;

// ---------------------------------------------------------------------------
// Failure log
// ---------------------------------------------------------------------------

/// Ordered record of candidate names that failed a pipeline stage.
///
/// Names keep the order in which they were processed. The log is a report
/// for operators, not a retry queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailureLog {
    names: Vec<String>,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl fmt::Display for FailureLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: [{}]", self.names.len(), self.names.join(", "))
    }
}

impl<S: Into<String>> FromIterator<S> for FailureLog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { names: iter.into_iter().map(Into::into).collect() }
    }
}
