//! Browser remote-control layer for OmniStudio activation
//!
//! The compiler pages this tool drives are ordinary server-rendered pages;
//! everything we need from the browser is a narrow surface: navigate, wait
//! for an element, read its text, and report the current location. That
//! surface is the [`BrowserDriver`] trait; [`ChromeDriver`] implements it
//! over Chrome DevTools Protocol via `headless_chrome`.
//!
//! The one piece of browser state beyond the tab itself is the
//! [`IdleDetector`], which debounces the tab's network activity into a single
//! "the page has settled" signal used once, right after login.

pub mod chrome;
pub mod driver;
pub mod idle;

pub use chrome::{ChromeConfig, ChromeDriver};
pub use driver::BrowserDriver;
pub use idle::{IdleDetector, IdleObserver, DEFAULT_IDLE_WINDOW};
