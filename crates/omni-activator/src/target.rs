//! Per-kind compile-target policies
//!
//! The script and card compiler pages share one polling control flow but
//! differ in URL, sampled fields and how status text is classified. Each
//! difference lives here, behind [`CompileTarget`].

use omni_core::{ArtifactRef, PollSample};

/// Managed-package namespace of the stock OmniStudio install. Orgs running
/// a branded package (e.g. `vlocity_cmt__`) override this.
pub const DEFAULT_NAMESPACE: &str = "omnistudio__";

const SCRIPT_STATUS_DONE: &str = "DONE";
const SCRIPT_ERROR_PREFIX: &str = "ERROR";
const MISSING_MODULE_PREFIX: &str = "ERROR: No MODULE named markup";

const CARD_STATUS_DONE: &str = "DONE SUCCESSFULLY";
const CARD_STATUS_DONE_WITH_ERRORS: &str = "DONE WITH ERRORS";

/// How one status sample moves the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusClass {
    /// Terminal success
    Done,
    /// Non-fatal error class; log it and keep polling — the platform is
    /// expected to converge on its own
    Informational(String),
    /// Terminal compiler error
    Fatal(String),
    /// Compilation still running
    InProgress,
}

/// Everything the generic poller needs to know about one kind of compiler
/// page.
pub trait CompileTarget: Send + Sync {
    /// Human-readable name for logs
    fn describe(&self) -> String;

    /// Compile-and-activate page for this target
    fn page_url(&self, instance_url: &str) -> String;

    /// Path fragment confirming the navigation landed on the intended page
    fn path_fragment(&self) -> &'static str;

    /// Selector of the rendered status field
    fn status_selector(&self) -> &'static str;

    /// Selector of the machine-parsable error payload, if the page has one
    fn detail_selector(&self) -> Option<&'static str> {
        None
    }

    /// Selector of the page-chrome fatal indicator, if the page has one.
    /// Non-empty text there means the page itself failed to render and must
    /// be reloaded; it is never a compilation verdict.
    fn chrome_error_selector(&self) -> Option<&'static str> {
        None
    }

    fn classify(&self, sample: &PollSample) -> StatusClass;
}

/// One process script, activated through its own page load
pub struct ScriptTarget {
    artifact: ArtifactRef,
    namespace: String,
}

impl ScriptTarget {
    pub fn new(artifact: ArtifactRef, namespace: impl Into<String>) -> Self {
        Self {
            artifact,
            namespace: namespace.into(),
        }
    }
}

impl CompileTarget for ScriptTarget {
    fn describe(&self) -> String {
        self.artifact.to_string()
    }

    fn page_url(&self, instance_url: &str) -> String {
        format!(
            "{}/apex/{}OmniLwcCompile?id={}&activate=true",
            instance_url, self.namespace, self.artifact.id
        )
    }

    fn path_fragment(&self) -> &'static str {
        "OmniLwcCompile"
    }

    fn status_selector(&self) -> &'static str {
        "#compiler-message"
    }

    fn classify(&self, sample: &PollSample) -> StatusClass {
        if sample.status == SCRIPT_STATUS_DONE {
            StatusClass::Done
        } else if sample.status.starts_with(MISSING_MODULE_PREFIX) {
            // The dependent module usually appears once its own activation
            // lands; the page keeps recompiling until then.
            StatusClass::Informational(format!("Missing custom module - {}", sample.status))
        } else if sample.status.starts_with(SCRIPT_ERROR_PREFIX) {
            StatusClass::Fatal(sample.status.clone())
        } else {
            StatusClass::InProgress
        }
    }
}

/// All listed cards, activated together through one batch page load
pub struct CardBatchTarget {
    cards: Vec<ArtifactRef>,
    namespace: String,
}

impl CardBatchTarget {
    pub fn new(cards: Vec<ArtifactRef>, namespace: impl Into<String>) -> Self {
        Self {
            cards,
            namespace: namespace.into(),
        }
    }
}

impl CompileTarget for CardBatchTarget {
    fn describe(&self) -> String {
        format!("card batch ({} cards)", self.cards.len())
    }

    fn page_url(&self, instance_url: &str) -> String {
        let ids: Vec<&str> = self.cards.iter().map(|c| c.id.as_str()).collect();
        format!(
            "{}/apex/{}FlexCardCompilePage?id={}",
            instance_url,
            self.namespace,
            ids.join(",")
        )
    }

    fn path_fragment(&self) -> &'static str {
        "FlexCardCompilePage"
    }

    fn status_selector(&self) -> &'static str {
        "#compileMessage-0"
    }

    fn detail_selector(&self) -> Option<&'static str> {
        Some("#resultJSON-0")
    }

    fn chrome_error_selector(&self) -> Option<&'static str> {
        Some("#auraErrorMessage")
    }

    fn classify(&self, sample: &PollSample) -> StatusClass {
        if sample.status == CARD_STATUS_DONE {
            StatusClass::Done
        } else if sample.status == CARD_STATUS_DONE_WITH_ERRORS {
            // Some card UIs report this per sub-card before the final
            // aggregate; only the deadline makes it terminal.
            StatusClass::Informational(sample.detail.clone())
        } else {
            StatusClass::InProgress
        }
    }
}
