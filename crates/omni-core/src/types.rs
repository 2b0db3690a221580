//! Core type definitions for OmniStudio activation

use serde::{Deserialize, Serialize};

/// Kind of artifact subject to server-side compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// An interactive process script (OmniScript)
    Script,
    /// A UI card (FlexCard)
    Card,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Script => write!(f, "script"),
            Self::Card => write!(f, "card"),
        }
    }
}

/// Reference to a single activatable artifact, as returned by the listing
/// queries. Immutable once listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    /// Opaque platform record id
    pub id: String,
    /// Unique name, carried for log readability
    pub name: String,
    pub kind: ArtifactKind,
}

impl ArtifactRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ArtifactKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

impl std::fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.kind, self.name, self.id)
    }
}

/// Terminal result of compiling one script or one card batch.
///
/// Exactly one of these is produced per script artifact and per card batch
/// per run; never mutated after being set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompilationOutcome {
    Succeeded,
    /// Compilation finished, but non-fatal error text was observed along the
    /// way (missing custom modules, per-card intermediate errors)
    SucceededWithWarning(String),
    /// The compiler reported a terminal error
    Failed(String),
    /// A deadline expired before a terminal status appeared
    TimedOut,
}

impl CompilationOutcome {
    /// True for outcomes that allow the run to continue
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded | Self::SucceededWithWarning(_))
    }
}

impl std::fmt::Display for CompilationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::SucceededWithWarning(detail) => {
                write!(f, "succeeded with warnings: {}", detail)
            }
            Self::Failed(detail) => write!(f, "failed: {}", detail),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

/// One snapshot of the compiler page, read on each poll tick.
///
/// `detail` and `chrome_error` are empty for script pages; card pages expose
/// a machine-parsable error payload and a page-chrome fatal indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollSample {
    pub status: String,
    pub detail: String,
    pub chrome_error: String,
}

impl PollSample {
    pub fn status_only(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..Self::default()
        }
    }
}
