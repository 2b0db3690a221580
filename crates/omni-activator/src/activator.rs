//! Activation orchestrator
//!
//! Sequences the run: scope pre-check and listings, frontdoor login with a
//! single network-idle settle, then every script strictly in listing order,
//! then the card batch. The browser tab is a single shared resource, so
//! nothing here fans out; the first unresolved failure or timeout aborts the
//! whole run (fail-fast).

use crate::poller::{run_to_terminal, PollerConfig};
use crate::target::{CardBatchTarget, ScriptTarget, DEFAULT_NAMESPACE};
use omni_browser::{BrowserDriver, IdleDetector};
use omni_core::{ArtifactRef, CompilationOutcome, Deadline, OmniError, Result};
use omni_session::{list_cards, list_scripts, RestClient, Session, REQUIRED_SCOPES};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Timing and namespace configuration for a run
#[derive(Debug, Clone)]
pub struct ActivatorConfig {
    /// Budget for the whole run
    pub run_timeout: Duration,
    /// Budget for one script (or the whole card batch)
    pub artifact_timeout: Duration,
    /// Quiet period on network activity before the login page counts as
    /// settled
    pub idle_window: Duration,
    /// Managed-package namespace prefix for the compiler page URLs
    pub namespace: String,
    pub poller: PollerConfig,
}

impl Default for ActivatorConfig {
    fn default() -> Self {
        Self {
            run_timeout: Duration::from_secs(600),
            artifact_timeout: Duration::from_secs(300),
            idle_window: Duration::from_secs(2),
            namespace: DEFAULT_NAMESPACE.to_string(),
            poller: PollerConfig::default(),
        }
    }
}

/// Outcomes recorded across a run.
///
/// Under fail-fast semantics this holds everything that reached a terminal
/// state before the run ended, so an aborted run can still show its partial
/// progress in the log.
#[derive(Debug, Default)]
pub struct RunReport {
    pub scripts: Vec<(ArtifactRef, CompilationOutcome)>,
    pub cards: Option<CompilationOutcome>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.scripts.iter().all(|(_, outcome)| outcome.is_success())
            && self.cards.as_ref().map_or(true, |o| o.is_success())
    }

    fn log_progress(&self) {
        for (artifact, outcome) in &self.scripts {
            info!("{}: {}", artifact, outcome);
        }
        if let Some(outcome) = &self.cards {
            info!("card batch: {}", outcome);
        }
    }
}

/// Scope pre-check and artifact listings, before any browser activity.
///
/// Returns `(scripts, cards)` in listing order.
pub async fn preflight(client: &RestClient) -> Result<(Vec<ArtifactRef>, Vec<ArtifactRef>)> {
    client.session().require_scopes(REQUIRED_SCOPES)?;
    let scripts = list_scripts(client).await?;
    let cards = list_cards(client).await?;
    Ok((scripts, cards))
}

/// Drives one activation run over an exclusively-owned browser session
pub struct Activator<D: BrowserDriver> {
    driver: D,
    config: ActivatorConfig,
}

impl<D: BrowserDriver> Activator<D> {
    pub fn new(driver: D, config: ActivatorConfig) -> Self {
        Self { driver, config }
    }

    /// Run every listed script, then the card batch, to terminal outcomes.
    ///
    /// `idle` must be fed by the driver's network events; it is consumed by
    /// the single login settle. Fails fast: the first `Failed` or `TimedOut`
    /// outcome aborts the run with an error after logging the progress made.
    pub async fn run(
        &self,
        session: &Session,
        idle: IdleDetector,
        scripts: Vec<ArtifactRef>,
        cards: Vec<ArtifactRef>,
    ) -> Result<RunReport> {
        let run_deadline = Deadline::start(self.config.run_timeout);

        info!("Logging in via frontdoor");
        run_deadline
            .bound("login navigation", self.driver.navigate(&session.frontdoor_url()))
            .await??;
        run_deadline.bound("session settle", idle.wait()).await?;

        let mut report = RunReport::default();

        info!(
            "Activating {} scripts: {:?}",
            scripts.len(),
            scripts.iter().map(|s| s.name.as_str()).collect::<Vec<_>>()
        );
        for artifact in scripts {
            let target = ScriptTarget::new(artifact.clone(), self.config.namespace.clone());
            let deadline = run_deadline.child(self.config.artifact_timeout);
            let outcome = run_to_terminal(
                &self.driver,
                &target,
                &session.instance_url,
                &deadline,
                &self.config.poller,
            )
            .await?;

            report.scripts.push((artifact.clone(), outcome.clone()));
            self.check_outcome(&report, &artifact.to_string(), outcome)?;
        }

        if cards.is_empty() {
            debug!("No active cards listed, skipping card batch");
        } else {
            info!(
                "Activating card batch: {:?}",
                cards.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
            );
            let target = CardBatchTarget::new(cards, self.config.namespace.clone());
            let deadline = run_deadline.child(self.config.artifact_timeout);
            let outcome = run_to_terminal(
                &self.driver,
                &target,
                &session.instance_url,
                &deadline,
                &self.config.poller,
            )
            .await?;

            report.cards = Some(outcome.clone());
            self.check_outcome(&report, "card batch", outcome)?;
        }

        info!("Activation run complete");
        report.log_progress();
        Ok(report)
    }

    /// Enforce the fail-fast policy on one terminal outcome
    fn check_outcome(
        &self,
        report: &RunReport,
        what: &str,
        outcome: CompilationOutcome,
    ) -> Result<()> {
        match outcome {
            CompilationOutcome::Succeeded => Ok(()),
            CompilationOutcome::SucceededWithWarning(detail) => {
                warn!("{} succeeded with warnings: {}", what, detail);
                Ok(())
            }
            CompilationOutcome::Failed(detail) => {
                report.log_progress();
                Err(OmniError::CompileFailed(format!("{}: {}", what, detail)))
            }
            CompilationOutcome::TimedOut => {
                report.log_progress();
                Err(OmniError::DeadlineExceeded(format!("activation of {}", what)))
            }
        }
    }
}
