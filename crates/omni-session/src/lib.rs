//! Salesforce session and listing layer
//!
//! Authentication itself is out of scope: the tool consumes a pre-obtained
//! credential (instance URL + access token, as produced by `sf org login`
//! or any OAuth flow) and only verifies that the session carries the scopes
//! the compiler pages need before any browser activity starts.

mod client;
mod listing;
mod session;

pub use client::{QueryRow, RestClient};
pub use listing::{list_cards, list_scripts, CARD_LISTING_QUERY, SCRIPT_LISTING_QUERY};
pub use session::{Session, REQUIRED_SCOPES};
