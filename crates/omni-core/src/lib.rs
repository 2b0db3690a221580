//! # omni-core
//!
//! Core types for OmniStudio activation orchestration.
//!
//! OmniStudio compiles its process scripts (OmniScripts) and UI cards
//! (FlexCards) server-side, and the only way to trigger and observe that
//! compilation is through internal Visualforce compiler pages. This crate
//! holds the types shared by every layer of the activation pipeline:
//!
//! - artifact references and terminal compilation outcomes
//! - the unified [`OmniError`] type
//! - the [`Deadline`] hierarchy bounding run / artifact / page-load scopes

mod deadline;
mod error;
mod types;

pub use deadline::Deadline;
pub use error::{OmniError, Result};
pub use types::*;
