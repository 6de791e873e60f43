//! Lookup endpoints and their classified outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

pub(crate) const STATUS_OK: u16 = 200;
pub(crate) const STATUS_NOT_FOUND: u16 = 404;
pub(crate) const STATUS_SERVICE_UNAVAILABLE: u16 = 503;

/// The two per-name PubChem lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    /// Canonical SMILES via `property/CanonicalSMILES/TXT`
    Smiles,
    /// Compound id via `cids/TXT`
    Cid,
}

impl Lookup {
    /// Path segments appended after `compound/name/<name>`.
    pub fn path_tail(self) -> &'static [&'static str] {
        match self {
            Lookup::Smiles => &["property", "CanonicalSMILES", "TXT"],
            Lookup::Cid => &["cids", "TXT"],
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Smiles => f.write_str("smiles"),
            Lookup::Cid => f.write_str("cid"),
        }
    }
}

/// Classified result of one lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupOutcome {
    /// First line of a successful response body, trimmed.
    Value(String),
    /// PubChem has no compound under this name.
    NotFound,
    /// Still `503` after every retry.
    ServiceUnavailable,
    /// Any other status, not retried.
    Error(u16),
    /// The request never got a response.
    Unreachable,
}

impl LookupOutcome {
    /// Classify a `200` body. A blank body carries no record.
    pub(crate) fn from_body(body: &str) -> Self {
        match body.trim().lines().next().map(str::trim) {
            Some(line) if !line.is_empty() => LookupOutcome::Value(line.to_string()),
            _ => LookupOutcome::NotFound,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            LookupOutcome::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, LookupOutcome::Value(_))
    }

    /// The value itself, or the failure label.
    pub fn into_label(self) -> String {
        match self {
            LookupOutcome::Value(v) => v,
            other => other.to_string(),
        }
    }
}

impl fmt::Display for LookupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupOutcome::Value(v) => f.write_str(v),
            LookupOutcome::NotFound => f.write_str("not found"),
            LookupOutcome::ServiceUnavailable => f.write_str("503 service unavailable"),
            LookupOutcome::Error(status) => write!(f, "error: {status}"),
            LookupOutcome::Unreachable => f.write_str("transport error"),
        }
    }
}

/// Both lookup outcomes for one name, classified independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub smiles: LookupOutcome,
    pub cid: LookupOutcome,
}

impl Resolution {
    pub fn outcome(&self, lookup: Lookup) -> &LookupOutcome {
        match lookup {
            Lookup::Smiles => &self.smiles,
            Lookup::Cid => &self.cid,
        }
    }
}
