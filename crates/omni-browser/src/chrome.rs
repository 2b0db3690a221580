//! Chrome session management using Chrome DevTools Protocol

use crate::driver::BrowserDriver;
use crate::idle::IdleDetector;
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use omni_core::{OmniError, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the Chrome session
#[derive(Debug, Clone)]
pub struct ChromeConfig {
    /// Run in headless mode (default: true)
    pub headless: bool,
    /// Verbose diagnostics; also relaxes certificate validation so local
    /// debugging proxies can intercept traffic
    pub debug: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            headless: true,
            debug: false,
            window_width: 1920,
            window_height: 1080,
        }
    }
}

/// Active Chrome session implementing [`BrowserDriver`]
pub struct ChromeDriver {
    /// Underlying browser instance (kept alive for tab lifetime)
    #[allow(dead_code)]
    browser: Browser,
    /// Single tab the whole run drives
    tab: Arc<Tab>,
    #[allow(dead_code)]
    config: ChromeConfig,
}

impl ChromeDriver {
    /// Launch a new Chrome instance
    pub async fn launch(config: ChromeConfig) -> Result<Self> {
        info!(
            "Launching browser (headless: {}, debug: {})",
            config.headless, config.debug
        );

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false)
            .ignore_certificate_errors(config.debug)
            .window_size(Some((config.window_width, config.window_height)))
            .build()
            .map_err(|e| OmniError::Browser(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| OmniError::Browser(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| OmniError::Browser(format!("Failed to create tab: {}", e)))?;

        info!("Browser launched successfully");

        Ok(Self {
            browser,
            tab,
            config,
        })
    }

    /// Install a network listener on the tab and return the idle detector
    /// fed by it.
    ///
    /// Every response the tab receives counts as network activity and resets
    /// the detector's debounce window.
    pub fn watch_network(&self, window: Duration) -> Result<IdleDetector> {
        let detector = IdleDetector::new(window);
        let observer = detector.observer();

        self.tab
            .register_response_handling("network-idle", Box::new(move |_params, _fetch_body| {
                observer.observe();
            }))
            .map_err(|e| OmniError::Browser(format!("Failed to register network listener: {}", e)))?;

        debug!("Network listener installed (window: {:?})", window);
        Ok(detector)
    }

    /// Execute JavaScript in the page context
    async fn evaluate_script(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| OmniError::Browser(format!("JavaScript evaluation failed: {}", e)))?;

        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }
}

#[async_trait]
impl BrowserDriver for ChromeDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);

        self.tab
            .navigate_to(url)
            .map_err(|e| OmniError::Browser(format!("Failed to navigate to {}: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| OmniError::Browser(format!("Navigation timeout for {}: {}", url, e)))?;

        Ok(())
    }

    async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<()> {
        debug!("Waiting for element: {} (timeout: {:?})", selector, timeout);

        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map_err(|_e| OmniError::Browser(format!("Element not found: {}", selector)))?;

        Ok(())
    }

    async fn read_text(&self, selector: &str) -> Result<String> {
        let script = format!("document.querySelector('{}')?.textContent", selector);
        let result = self.evaluate_script(&script).await?;
        Ok(result.as_str().unwrap_or("").trim().to_string())
    }

    async fn current_location(&self) -> Result<String> {
        let result = self.evaluate_script("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }
}

impl Drop for ChromeDriver {
    fn drop(&mut self) {
        debug!("ChromeDriver dropped, browser will be cleaned up");
    }
}
