//! # omni-activator
//!
//! The activation engine: drives the platform's internal compiler pages
//! until every listed artifact is compiled and activated, or the run fails.
//!
//! The engine is one generic status-polling state machine
//! ([`poller::run_to_terminal`]) parameterized by a per-kind
//! [`CompileTarget`] policy — scripts and card batches differ only in page
//! URL, sampled fields and status classification, so the control flow lives
//! in exactly one place.
//!
//! Sequencing, fail-fast aggregation and the login settle live in
//! [`Activator`].

pub mod activator;
pub mod poller;
pub mod target;

pub use activator::{preflight, Activator, ActivatorConfig, RunReport};
pub use poller::{run_to_terminal, PollerConfig};
pub use target::{CardBatchTarget, CompileTarget, ScriptTarget, StatusClass, DEFAULT_NAMESPACE};
