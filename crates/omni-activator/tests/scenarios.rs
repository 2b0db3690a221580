//! End-to-end activation scenarios over a scripted browser driver
//!
//! These drive the real poller and orchestrator; only the browser is faked.
//! Timing runs under tokio's paused clock, so the 2 s poll cadence and the
//! multi-minute deadlines elapse instantly and deterministically.

use async_trait::async_trait;
use omni_activator::{
    run_to_terminal, Activator, ActivatorConfig, CardBatchTarget, PollerConfig, ScriptTarget,
    DEFAULT_NAMESPACE,
};
use omni_browser::{BrowserDriver, IdleDetector};
use omni_core::{ArtifactKind, ArtifactRef, CompilationOutcome, Deadline, OmniError, Result};
use omni_session::Session;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const INSTANCE: &str = "https://example.my.salesforce.com";

/// Scripted driver: `read_text` replays a queued sequence per selector,
/// holding the last value once the queue runs down (a real page keeps
/// rendering its final status). Clones share state, so tests keep a handle
/// to inspect after the activator takes ownership.
#[derive(Default, Clone)]
struct FakeDriver {
    texts: Arc<Mutex<HashMap<String, VecDeque<String>>>>,
    navigations: Arc<Mutex<Vec<String>>>,
}

impl FakeDriver {
    fn new() -> Self {
        Self::default()
    }

    fn script_reads(&self, selector: &str, values: &[&str]) {
        self.texts.lock().unwrap().insert(
            selector.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        );
    }

    fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.navigations.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn wait_visible(&self, _selector: &str, _timeout: Duration) -> Result<()> {
        Ok(())
    }

    async fn read_text(&self, selector: &str) -> Result<String> {
        let mut texts = self.texts.lock().unwrap();
        let text = match texts.get_mut(selector) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or_default(),
            None => String::new(),
        };
        Ok(text)
    }

    async fn current_location(&self) -> Result<String> {
        Ok(self
            .navigations
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_default())
    }
}

fn session() -> Session {
    Session::new(INSTANCE, "00Dxx!token", vec!["web".into(), "api".into()])
}

fn script(id: &str, name: &str) -> ArtifactRef {
    ArtifactRef::new(id, name, ArtifactKind::Script)
}

fn card(id: &str, name: &str) -> ArtifactRef {
    ArtifactRef::new(id, name, ArtifactKind::Card)
}

fn activator(driver: FakeDriver) -> Activator<FakeDriver> {
    Activator::new(driver, ActivatorConfig::default())
}

fn idle() -> IdleDetector {
    IdleDetector::new(Duration::from_secs(2))
}

async fn run(
    activator: &Activator<FakeDriver>,
    scripts: Vec<ArtifactRef>,
    cards: Vec<ArtifactRef>,
) -> Result<omni_activator::RunReport> {
    activator.run(&session(), idle(), scripts, cards).await
}

#[tokio::test(start_paused = true)]
async fn scenario_a_two_scripts_no_cards() {
    let driver = FakeDriver::new();
    driver.script_reads("#compiler-message", &["PENDING", "DONE", "DONE"]);
    let activator = activator(driver.clone());

    let report = run(
        &activator,
        vec![script("0jNxx01", "First"), script("0jNxx02", "Second")],
        vec![],
    )
    .await
    .unwrap();

    assert!(report.is_success());
    assert_eq!(report.scripts.len(), 2);
    assert_eq!(report.scripts[0].1, CompilationOutcome::Succeeded);
    assert_eq!(report.scripts[1].1, CompilationOutcome::Succeeded);
    assert!(report.cards.is_none());
}

#[tokio::test(start_paused = true)]
async fn scenario_b_missing_module_error_is_tolerated() {
    let driver = FakeDriver::new();
    driver.script_reads(
        "#compiler-message",
        &["ERROR: No MODULE named markup.foo", "PENDING", "DONE"],
    );
    let activator = activator(driver.clone());

    let report = run(&activator, vec![script("0jNxx01", "First")], vec![])
        .await
        .unwrap();

    assert!(report.is_success());
    assert!(matches!(
        report.scripts[0].1,
        CompilationOutcome::SucceededWithWarning(_)
    ));
}

#[tokio::test(start_paused = true)]
async fn scenario_c_generic_error_fails_fast() {
    let driver = FakeDriver::new();
    driver.script_reads("#compiler-message", &["ERROR: compile failed"]);
    let activator = activator(driver.clone());

    let err = run(
        &activator,
        vec![script("0jNxx01", "Broken"), script("0jNxx02", "NeverReached")],
        vec![],
    )
    .await
    .unwrap_err();

    assert!(matches!(err, OmniError::CompileFailed(_)));

    // Fail-fast: the second script's page is never loaded.
    let navigations = driver.navigations();
    assert!(!navigations.iter().any(|url| url.contains("0jNxx02")));
}

#[tokio::test(start_paused = true)]
async fn scenario_d_card_batch_with_intermediate_errors() {
    let driver = FakeDriver::new();
    driver.script_reads(
        "#compileMessage-0",
        &["PENDING", "DONE WITH ERRORS", "DONE SUCCESSFULLY"],
    );
    driver.script_reads("#resultJSON-0", &[r#"{"errors":["CardTwo: bad field"]}"#]);
    let activator = activator(driver.clone());

    let report = run(
        &activator,
        vec![],
        vec![
            card("0jExx01", "CardOne"),
            card("0jExx02", "CardTwo"),
            card("0jExx03", "CardThree"),
        ],
    )
    .await
    .unwrap();

    assert!(report.is_success());
    assert!(matches!(
        report.cards,
        Some(CompilationOutcome::SucceededWithWarning(_))
    ));

    // One batch navigation carrying all three ids.
    let navigations = driver.navigations();
    let batch: Vec<_> = navigations
        .iter()
        .filter(|url| url.contains("FlexCardCompilePage"))
        .collect();
    assert_eq!(batch.len(), 1);
    assert!(batch[0].contains("0jExx01,0jExx02,0jExx03"));
}

#[tokio::test(start_paused = true)]
async fn empty_listing_is_a_successful_no_op() {
    let driver = FakeDriver::new();
    let activator = activator(driver.clone());

    let report = run(&activator, vec![], vec![]).await.unwrap();

    assert!(report.is_success());
    assert!(report.scripts.is_empty());
    assert!(report.cards.is_none());

    // Only the frontdoor login was navigated.
    let navigations = driver.navigations();
    assert_eq!(navigations.len(), 1);
    assert!(navigations[0].contains("frontdoor.jsp"));
}

#[tokio::test(start_paused = true)]
async fn chrome_error_forces_reload_even_over_success_status() {
    let driver = FakeDriver::new();
    driver.script_reads("#compileMessage-0", &["DONE SUCCESSFULLY"]);
    driver.script_reads("#auraErrorMessage", &["Aura blew up", ""]);

    let target = CardBatchTarget::new(vec![card("0jExx01", "CardOne")], DEFAULT_NAMESPACE);
    let deadline = Deadline::start(Duration::from_secs(300));
    let outcome = run_to_terminal(
        &driver,
        &target,
        INSTANCE,
        &deadline,
        &PollerConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(outcome, CompilationOutcome::Succeeded);

    // First pass reloaded instead of trusting the simultaneous DONE.
    let reloads = driver
        .navigations()
        .iter()
        .filter(|url| url.contains("FlexCardCompilePage"))
        .count();
    assert_eq!(reloads, 2);
}

#[tokio::test(start_paused = true)]
async fn stuck_status_times_out_at_the_artifact_deadline() {
    let driver = FakeDriver::new();
    driver.script_reads("#compiler-message", &["PENDING"]);

    let target = ScriptTarget::new(script("0jNxx01", "Stuck"), DEFAULT_NAMESPACE);
    let deadline = Deadline::start(Duration::from_secs(5));
    let outcome = run_to_terminal(
        &driver,
        &target,
        INSTANCE,
        &deadline,
        &PollerConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(outcome, CompilationOutcome::TimedOut);
}

#[tokio::test(start_paused = true)]
async fn done_succeeds_even_after_earlier_informational_errors() {
    let driver = FakeDriver::new();
    driver.script_reads(
        "#compiler-message",
        &[
            "ERROR: No MODULE named markup.alpha",
            "ERROR: No MODULE named markup.beta",
            "DONE",
        ],
    );

    let target = ScriptTarget::new(script("0jNxx01", "Deps"), DEFAULT_NAMESPACE);
    let deadline = Deadline::start(Duration::from_secs(300));
    let outcome = run_to_terminal(
        &driver,
        &target,
        INSTANCE,
        &deadline,
        &PollerConfig::default(),
    )
    .await
    .unwrap();

    assert!(matches!(
        outcome,
        CompilationOutcome::SucceededWithWarning(ref detail)
            if detail.contains("markup.beta")
    ));
}
