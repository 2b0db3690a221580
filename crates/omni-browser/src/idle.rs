//! Network-idle detection
//!
//! The platform's session bootstrap page keeps issuing background requests
//! for a while after the document loads; navigating away before the session
//! cookie settles intermittently produces half-authenticated states. The
//! detector watches the tab's network activity and resolves once a full
//! debounce window passes with no traffic.

use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Default quiet period before the page is treated as settled
pub const DEFAULT_IDLE_WINDOW: Duration = Duration::from_secs(2);

/// Sending half of the detector: installed as the driver's network event
/// listener. Cloneable and cheap; `observe` never blocks.
#[derive(Debug, Clone)]
pub struct IdleObserver {
    tx: mpsc::UnboundedSender<()>,
}

impl IdleObserver {
    /// Record that network activity occurred now
    pub fn observe(&self) {
        // Send failure means the detector already resolved and was retired;
        // late events are irrelevant then.
        let _ = self.tx.send(());
    }
}

/// Debounces a stream of network-activity events into a single idle signal.
///
/// `wait` resolves exactly once, when the debounce window elapses with no
/// `observe` call; consuming it retires the detector. Events and the window
/// timer race through one channel, so an event that lands while the window
/// is expiring is picked up as a fresh reset rather than lost.
///
/// # Example
///
/// ```
/// use omni_browser::idle::IdleDetector;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let detector = IdleDetector::new(Duration::from_millis(50));
///     let observer = detector.observer();
///     observer.observe();
///     detector.wait().await;
/// }
/// ```
#[derive(Debug)]
pub struct IdleDetector {
    tx: mpsc::UnboundedSender<()>,
    rx: mpsc::UnboundedReceiver<()>,
    window: Duration,
}

impl IdleDetector {
    pub fn new(window: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx, window }
    }

    /// Handle for the event-listening side
    pub fn observer(&self) -> IdleObserver {
        IdleObserver {
            tx: self.tx.clone(),
        }
    }

    /// Suspend until the network has been quiet for the full window.
    ///
    /// Each observed event restarts the window; the wait only resolves when
    /// `window` elapses after the most recent event.
    pub async fn wait(mut self) {
        loop {
            match tokio::time::timeout(self.window, self.rx.recv()).await {
                // Window elapsed with no event: the page has settled.
                Err(_) => {
                    debug!("network idle for {:?}", self.window);
                    return;
                }
                // Activity observed: restart the window.
                Ok(Some(())) => continue,
                // Channel closed; nothing can reset the window again, but
                // the quiet period still has to elapse.
                Ok(None) => {
                    tokio::time::sleep(self.window).await;
                    return;
                }
            }
        }
    }
}

impl Default for IdleDetector {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_WINDOW)
    }
}
