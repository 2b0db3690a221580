//! Narrow driver seam over the browser session

use async_trait::async_trait;
use omni_core::Result;
use std::time::Duration;

/// The operations the activation engine needs from a browser.
///
/// Kept deliberately narrow so tests can drive the poller and orchestrator
/// with a scripted fake instead of a live Chrome process.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate the tab to `url` and wait for the navigation to commit
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Wait until the element matching `selector` is present and visible
    async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Read the text content of the element matching `selector`
    ///
    /// An absent element reads as the empty string.
    async fn read_text(&self, selector: &str) -> Result<String>;

    /// Current URL of the tab
    async fn current_location(&self) -> Result<String>;
}
