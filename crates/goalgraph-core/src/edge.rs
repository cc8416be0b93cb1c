//! Prerequisite edges and their logical combinators.
//!
//! An [`Edge`] is owned by its source node and refers to both endpoints by id.
//! The [`EdgeKind`] decides how the resolver treats the source when it is
//! reached from the target: mandatory (`AND`, `IMPLIES`), one-of (`OR`), or
//! blocker (`NOT`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The logical combinator carried by an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Source is a mandatory prerequisite of the target.
    #[serde(rename = "AND")]
    And,
    /// Source is one of several alternative prerequisites.
    #[serde(rename = "OR")]
    Or,
    /// Source implies the target; resolved exactly like `And`.
    #[serde(rename = "IMPLIES")]
    Implies,
    /// Source blocks the target once it has been visited.
    #[serde(rename = "NOT")]
    Not,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 4] = [EdgeKind::And, EdgeKind::Or, EdgeKind::Implies, EdgeKind::Not];

    /// Symbolic name used in persisted documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::And => "AND",
            EdgeKind::Or => "OR",
            EdgeKind::Implies => "IMPLIES",
            EdgeKind::Not => "NOT",
        }
    }

    /// Returns `true` for kinds whose source must always be satisfied.
    pub fn is_mandatory(&self) -> bool {
        matches!(self, EdgeKind::And | EdgeKind::Implies)
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeKind {
    type Err = CoreError;

    /// Parses a symbolic name. Matching is exact and case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(EdgeKind::And),
            "OR" => Ok(EdgeKind::Or),
            "IMPLIES" => Ok(EdgeKind::Implies),
            "NOT" => Ok(EdgeKind::Not),
            other => Err(CoreError::InvalidEdgeType {
                value: other.to_string(),
            }),
        }
    }
}

/// A directed relation from `source` to `target`, both given by node id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: EdgeKind) -> Self {
        Edge {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.source, self.kind, self.target)
    }
}
