//! Generic compilation status poller
//!
//! One state machine drives every compiler page:
//!
//! ```text
//! Loading -> Polling -> { Succeeded, Failed, TimedOut }
//!    ^          |
//!    +----------+  (card pages only: page-chrome error forces a reload)
//! ```
//!
//! `Loading` navigates and confirms the landed URL actually is the compiler
//! page (the platform sometimes bounces through interstitials); `Polling`
//! samples the rendered status on a fixed interval and lets the
//! [`CompileTarget`] policy classify it. Deadline expiry in any state is a
//! `TimedOut` outcome, never a hang.

use crate::target::{CompileTarget, StatusClass};
use omni_browser::BrowserDriver;
use omni_core::{CompilationOutcome, Deadline, PollSample, Result};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Timing knobs for the poller
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Pause between status samples
    pub poll_interval: Duration,
    /// Budget for one navigate-and-confirm page load attempt
    pub load_attempt_timeout: Duration,
    /// Backoff between page-identity checks after a navigation
    pub location_retry: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            load_attempt_timeout: Duration::from_secs(30),
            location_retry: Duration::from_millis(100),
        }
    }
}

/// Drive `target`'s compiler page to a terminal outcome.
///
/// Returns `Ok` with the outcome for everything the compiler itself decides
/// (including timeouts); `Err` only for driver failures.
pub async fn run_to_terminal<D>(
    driver: &D,
    target: &dyn CompileTarget,
    instance_url: &str,
    deadline: &Deadline,
    config: &PollerConfig,
) -> Result<CompilationOutcome>
where
    D: BrowserDriver + ?Sized,
{
    let url = target.page_url(instance_url);
    // Non-fatal error text seen along the way; a later success downgrades it
    // to a warning instead of forgetting it.
    let mut warning: Option<String> = None;

    'load: loop {
        info!("Loading {}", url);
        let load = deadline.child(config.load_attempt_timeout);
        match load
            .bound("page load", load_page(driver, target, &url, config))
            .await
        {
            Ok(loaded) => loaded?,
            Err(_) => {
                warn!("Timed out loading compiler page for {}", target.describe());
                return Ok(CompilationOutcome::TimedOut);
            }
        }

        loop {
            let sample = match deadline
                .bound("status sample", sample_page(driver, target, deadline))
                .await
            {
                Ok(sampled) => sampled?,
                Err(_) => {
                    warn!("Timed out polling {}", target.describe());
                    return Ok(CompilationOutcome::TimedOut);
                }
            };

            // A page-chrome failure means the page itself broke, not the
            // compilation; it outranks whatever the status field says.
            if target.chrome_error_selector().is_some() && !sample.chrome_error.is_empty() {
                warn!(
                    "Page error on {}: {} - reloading",
                    target.describe(),
                    sample.chrome_error
                );
                continue 'load;
            }

            match target.classify(&sample) {
                StatusClass::Done => {
                    info!("{} activated successfully", target.describe());
                    return Ok(match warning.take() {
                        Some(detail) => CompilationOutcome::SucceededWithWarning(detail),
                        None => CompilationOutcome::Succeeded,
                    });
                }
                StatusClass::Informational(detail) => {
                    warn!("{}: {}", target.describe(), detail);
                    warning = Some(detail);
                }
                StatusClass::Fatal(detail) => {
                    error!("Error activating {} - {}", target.describe(), detail);
                    return Ok(CompilationOutcome::Failed(detail));
                }
                StatusClass::InProgress => {
                    info!("Status: {}", sample.status);
                }
            }

            if deadline
                .sleep(config.poll_interval, "poll interval")
                .await
                .is_err()
            {
                warn!("Timed out polling {}", target.describe());
                return Ok(CompilationOutcome::TimedOut);
            }
        }
    }
}

/// Navigate and confirm the landed page is the intended compiler page,
/// retrying the identity check on a short backoff.
async fn load_page<D>(
    driver: &D,
    target: &dyn CompileTarget,
    url: &str,
    config: &PollerConfig,
) -> Result<()>
where
    D: BrowserDriver + ?Sized,
{
    driver.navigate(url).await?;

    loop {
        let location = driver.current_location().await?;
        if path_of(&location).contains(target.path_fragment()) {
            return Ok(());
        }
        debug!(
            "current URL {} does not match expected {}",
            location,
            target.path_fragment()
        );
        tokio::time::sleep(config.location_retry).await;
    }
}

/// Read one snapshot of the page's status fields
async fn sample_page<D>(
    driver: &D,
    target: &dyn CompileTarget,
    deadline: &Deadline,
) -> Result<PollSample>
where
    D: BrowserDriver + ?Sized,
{
    driver
        .wait_visible(target.status_selector(), deadline.remaining())
        .await?;
    let status = driver.read_text(target.status_selector()).await?;

    let detail = match target.detail_selector() {
        Some(selector) => {
            driver.wait_visible(selector, deadline.remaining()).await?;
            driver.read_text(selector).await?
        }
        None => String::new(),
    };

    // Chrome errors have no guaranteed element; absent reads as empty.
    let chrome_error = match target.chrome_error_selector() {
        Some(selector) => driver.read_text(selector).await?,
        None => String::new(),
    };

    Ok(PollSample {
        status,
        detail,
        chrome_error,
    })
}

/// Path component of a URL, without query or fragment
fn path_of(url: &str) -> &str {
    let after_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = match after_scheme.find('/') {
        Some(index) => &after_scheme[index..],
        None => "",
    };
    path.split(['?', '#'])
        .next()
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_of_strips_query() {
        assert_eq!(
            path_of("https://example.my.salesforce.com/apex/omnistudio__OmniLwcCompile?id=1&activate=true"),
            "/apex/omnistudio__OmniLwcCompile"
        );
    }

    #[test]
    fn test_path_of_no_path() {
        assert_eq!(path_of("https://example.my.salesforce.com"), "");
    }

    #[test]
    fn test_path_of_fragment() {
        assert_eq!(path_of("https://host/one/two#frag"), "/one/two");
    }

    #[test]
    fn test_default_config_matches_page_cadence() {
        let config = PollerConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.load_attempt_timeout, Duration::from_secs(30));
        assert_eq!(config.location_retry, Duration::from_millis(100));
    }
}
