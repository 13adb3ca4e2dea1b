//! The bounded observe→decide→act loop, one run per task.

use std::time::Duration;

use tracing::{debug, error, info, warn};
use webpilot_core_types::{ActionRecord, ToolCall};

use crate::command::Command;
use crate::decision::DecisionMaker;
use crate::ports::{BrowserPort, PortError};

/// Tuning knobs for one task run.
///
/// The pause durations are heuristics, not correctness requirements; what
/// matters is their ordering: typing settles fastest, a click inside a
/// batch is assumed cheap, an isolated click may be a navigation, and a
/// navigation needs the longest settle.
#[derive(Clone, Debug)]
pub struct LoopConfig {
    /// Hard ceiling on observe→decide→act cycles per task.
    pub max_steps: u32,

    /// Backoff after a failed or empty decision.
    pub decision_retry_delay: Duration,

    /// Settle pause after a type action.
    pub type_pause: Duration,

    /// Settle pause after a click/key-press inside a multi-action batch.
    pub batched_click_pause: Duration,

    /// Settle pause after an isolated click/key-press.
    pub solo_click_pause: Duration,

    /// Settle pause after a navigation.
    pub navigate_pause: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_steps: 30,
            decision_retry_delay: Duration::from_secs(2),
            type_pause: Duration::from_millis(50),
            batched_click_pause: Duration::from_millis(100),
            solo_click_pause: Duration::from_secs(2),
            navigate_pause: Duration::from_secs(3),
        }
    }
}

impl LoopConfig {
    /// All pauses zeroed. For scripted runs and tests where no real page
    /// needs to settle.
    pub fn immediate() -> Self {
        Self {
            max_steps: 30,
            decision_retry_delay: Duration::ZERO,
            type_pause: Duration::ZERO,
            batched_click_pause: Duration::ZERO,
            solo_click_pause: Duration::ZERO,
            navigate_pause: Duration::ZERO,
        }
    }
}

/// How a task run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskVerdict {
    /// The decision-maker submitted a final report.
    Completed { report: String },

    /// The step ceiling ran out, a bounded-effort outcome rather than an error.
    StepLimitReached,

    /// The task could not continue (observation impossible).
    Aborted { reason: String },
}

/// Everything a caller learns about one task run.
#[derive(Clone, Debug)]
pub struct TaskReport {
    pub verdict: TaskVerdict,
    pub steps_taken: u32,
    pub history: Vec<ActionRecord>,
}

impl TaskReport {
    pub fn is_success(&self) -> bool {
        matches!(self.verdict, TaskVerdict::Completed { .. })
    }
}

/// Drives one browser and one decision-maker through tasks.
pub struct Orchestrator<B, D> {
    browser: B,
    decider: D,
    config: LoopConfig,
}

impl<B: BrowserPort, D: DecisionMaker> Orchestrator<B, D> {
    pub fn new(browser: B, decider: D) -> Self {
        Self::with_config(browser, decider, LoopConfig::default())
    }

    pub fn with_config(browser: B, decider: D, config: LoopConfig) -> Self {
        Self {
            browser,
            decider,
            config,
        }
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Access to the underlying browser, e.g. for shutdown.
    pub fn browser_mut(&mut self) -> &mut B {
        &mut self.browser
    }

    /// Run one task to completion, ceiling, or abort.
    ///
    /// History is fresh per task; the previous task's records are gone the
    /// moment a new one starts.
    pub async fn run_task(&mut self, task: &str) -> TaskReport {
        info!(target: "agent-runtime", %task, "task accepted");

        let mut history: Vec<ActionRecord> = Vec::new();
        let mut step = 0u32;

        while step < self.config.max_steps {
            step += 1;
            debug!(target: "agent-runtime", step, "cycle start");

            // Observe. Running blind is not an option.
            let observation = match self.browser.observe().await {
                Ok(observation) => observation,
                Err(err) => {
                    error!(target: "agent-runtime", %err, "observation failed, aborting task");
                    return TaskReport {
                        verdict: TaskVerdict::Aborted {
                            reason: format!("observation failed: {err}"),
                        },
                        steps_taken: step,
                        history,
                    };
                }
            };
            info!(
                target: "agent-runtime",
                step,
                url = %observation.url,
                title = %observation.title,
                "observed"
            );

            // Decide. Failures and empty decisions cost a step but never
            // the task; the ceiling is the backstop against endless retry.
            let calls = match self.decider.decide(task, &observation, &history).await {
                Ok(calls) => calls,
                Err(err) => {
                    warn!(target: "agent-runtime", %err, "decision failed, retrying next cycle");
                    tokio::time::sleep(self.config.decision_retry_delay).await;
                    continue;
                }
            };
            if calls.is_empty() {
                debug!(target: "agent-runtime", "decision returned no actions");
                tokio::time::sleep(self.config.decision_retry_delay).await;
                continue;
            }

            // Act. Every action in the batch runs and gets its outcome
            // recorded, regardless of what happened before it.
            let batch_size = calls.len();
            let mut completion: Option<String> = None;

            for call in &calls {
                let outcome = self.execute(call, batch_size, &mut completion).await;
                info!(
                    target: "agent-runtime",
                    action = %call.name,
                    reasoning = %call.reasoning,
                    %outcome,
                    "action executed"
                );
                history.push(ActionRecord {
                    reasoning: call.reasoning.clone(),
                    action: call.name.clone(),
                    args: serde_json::to_string(&call.args).unwrap_or_else(|_| "{}".to_string()),
                    outcome,
                });
            }

            if let Some(report) = completion {
                info!(target: "agent-runtime", steps = step, "task completed");
                return TaskReport {
                    verdict: TaskVerdict::Completed { report },
                    steps_taken: step,
                    history,
                };
            }
        }

        info!(
            target: "agent-runtime",
            max_steps = self.config.max_steps,
            "step ceiling exhausted without completion"
        );
        TaskReport {
            verdict: TaskVerdict::StepLimitReached,
            steps_taken: self.config.max_steps,
            history,
        }
    }

    /// Execute one intended action, returning its outcome text.
    async fn execute(
        &mut self,
        call: &ToolCall,
        batch_size: usize,
        completion: &mut Option<String>,
    ) -> String {
        let command = match Command::decode(call) {
            Ok(command) => command,
            Err(err) => return format!("Error: {err}"),
        };

        match command {
            Command::Click { id } => {
                let outcome = fold(self.browser.click(id).await);
                self.pause_after_pointer(batch_size).await;
                outcome
            }
            Command::Press { key } => {
                let outcome = fold(self.browser.press_key(&key).await);
                self.pause_after_pointer(batch_size).await;
                outcome
            }
            Command::TypeText { id, text } => {
                let outcome = fold(self.browser.type_text(id, &text).await);
                tokio::time::sleep(self.config.type_pause).await;
                outcome
            }
            Command::Navigate { url } => {
                let outcome = fold(self.browser.navigate(&url).await);
                tokio::time::sleep(self.config.navigate_pause).await;
                outcome
            }
            Command::Scroll { direction } => fold(self.browser.scroll(direction).await),
            Command::GoBack => fold(self.browser.go_back().await),
            Command::Memorize { info } => match info {
                Some(info) => format!("Saved to memory: {info}"),
                None => "Saved info.".to_string(),
            },
            Command::SubmitResult { report } => {
                // Completion takes effect after the batch drains.
                let outcome = match &report {
                    Some(report) => format!("DONE: {report}"),
                    None => "Task completed.".to_string(),
                };
                *completion = Some(report.unwrap_or_else(|| "Task completed.".to_string()));
                outcome
            }
        }
    }

    async fn pause_after_pointer(&self, batch_size: usize) {
        let pause = if batch_size > 1 {
            self.config.batched_click_pause
        } else {
            self.config.solo_click_pause
        };
        tokio::time::sleep(pause).await;
    }
}

fn fold(result: Result<(), PortError>) -> String {
    match result {
        Ok(()) => "Success".to_string(),
        Err(err) => format!("Error: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::ScriptedDecisionMaker;
    use crate::ports::ScriptedBrowser;
    use webpilot_core_types::Observation;

    fn observation() -> Observation {
        Observation {
            url: "https://example.com".into(),
            title: "Example".into(),
            dom_summary: "[10] <button> [ACTION] Delete\n[11] <button> [ACTION] Archive".into(),
        }
    }

    fn click(id: u32) -> ToolCall {
        ToolCall::new("click").with_arg("id", id)
    }

    fn submit(report: &str) -> ToolCall {
        ToolCall::new("submit_task_result").with_arg("final_report", report)
    }

    #[tokio::test]
    async fn failed_action_does_not_stop_the_batch() {
        let browser = ScriptedBrowser::new(observation()).fail_click(10);
        let decider = ScriptedDecisionMaker::new(vec![
            vec![click(10), click(11)],
            vec![submit("cleaned up")],
        ]);
        let mut orchestrator = Orchestrator::with_config(browser, decider, LoopConfig::immediate());

        let report = orchestrator.run_task("delete both entries").await;

        assert!(report.is_success());
        // Both outcomes recorded, in order, despite the first failing.
        assert!(report.history[0].outcome.starts_with("Error:"));
        assert_eq!(report.history[1].outcome, "Success");
        assert_eq!(report.history[0].action, "click");
        assert_eq!(
            orchestrator.browser_mut().log,
            vec!["observe", "click(10)", "click(11)", "observe"]
        );
    }

    #[tokio::test]
    async fn submit_mid_batch_completes_after_the_batch_drains() {
        let browser = ScriptedBrowser::new(observation());
        let decider = ScriptedDecisionMaker::new(vec![vec![
            click(10),
            submit("Order placed"),
            click(11),
        ]]);
        let mut orchestrator = Orchestrator::with_config(browser, decider, LoopConfig::immediate());

        let report = orchestrator.run_task("place the order").await;

        assert_eq!(
            report.verdict,
            TaskVerdict::Completed {
                report: "Order placed".into()
            }
        );
        // The trailing click still ran and was recorded.
        assert_eq!(report.history.len(), 3);
        assert!(report.history[1].outcome.contains("Order placed"));
        assert_eq!(report.history[2].action, "click");
    }

    #[tokio::test]
    async fn step_ceiling_is_a_bounded_effort_outcome() {
        let browser = ScriptedBrowser::new(observation());
        // Endless clicking, never a submit.
        let batches: Vec<_> = (0..64).map(|_| vec![click(11)]).collect();
        let decider = ScriptedDecisionMaker::new(batches);
        let mut orchestrator = Orchestrator::with_config(browser, decider, LoopConfig::immediate());

        let report = orchestrator.run_task("never finishes").await;

        assert_eq!(report.verdict, TaskVerdict::StepLimitReached);
        assert_eq!(report.steps_taken, 30);
        assert!(!report.is_success());
        assert_eq!(report.history.len(), 30);
    }

    #[tokio::test]
    async fn empty_decisions_do_not_corrupt_history() {
        let browser = ScriptedBrowser::new(observation());
        // Two empty decisions, then a submit.
        let decider = ScriptedDecisionMaker::new(vec![vec![], vec![], vec![submit("done")]]);
        let mut orchestrator = Orchestrator::with_config(browser, decider, LoopConfig::immediate());

        let report = orchestrator.run_task("slow start").await;

        assert!(report.is_success());
        assert_eq!(report.steps_taken, 3);
        // No entries were appended for the empty cycles.
        assert_eq!(report.history.len(), 1);
    }

    #[tokio::test]
    async fn observation_failure_aborts_the_task() {
        let browser = ScriptedBrowser::new(observation()).fail_observe();
        let decider = ScriptedDecisionMaker::new(vec![vec![click(10)]]);
        let mut orchestrator = Orchestrator::with_config(browser, decider, LoopConfig::immediate());

        let report = orchestrator.run_task("anything").await;

        match report.verdict {
            TaskVerdict::Aborted { reason } => {
                assert!(reason.contains("observation failed"));
            }
            other => panic!("expected abort, got {other:?}"),
        }
        assert!(report.history.is_empty());
    }

    #[tokio::test]
    async fn unknown_tool_degrades_to_an_error_outcome() {
        let browser = ScriptedBrowser::new(observation());
        let decider = ScriptedDecisionMaker::new(vec![
            vec![ToolCall::new("teleport")],
            vec![submit("done")],
        ]);
        let mut orchestrator = Orchestrator::with_config(browser, decider, LoopConfig::immediate());

        let report = orchestrator.run_task("task").await;

        assert!(report.is_success());
        assert_eq!(report.history[0].outcome, "Error: unknown tool 'teleport'");
        // The unknown action never reached the browser.
        assert!(!orchestrator
            .browser_mut()
            .log
            .iter()
            .any(|entry| entry.contains("teleport")));
    }

    #[tokio::test]
    async fn memorize_records_without_touching_the_page() {
        let browser = ScriptedBrowser::new(observation());
        let decider = ScriptedDecisionMaker::new(vec![
            vec![ToolCall::new("memorize").with_arg("info", "invoice #441")],
            vec![submit("done")],
        ]);
        let mut orchestrator = Orchestrator::with_config(browser, decider, LoopConfig::immediate());

        let report = orchestrator.run_task("remember the invoice").await;

        assert_eq!(report.history[0].outcome, "Saved to memory: invoice #441");
        // Only observations hit the browser.
        assert_eq!(orchestrator.browser_mut().log, vec!["observe", "observe"]);
    }

    #[tokio::test]
    async fn invalid_parameter_yields_outcome_not_abort() {
        let browser = ScriptedBrowser::new(observation());
        let decider = ScriptedDecisionMaker::new(vec![
            vec![ToolCall::new("click").with_arg("id", "abc"), click(11)],
            vec![submit("done")],
        ]);
        let mut orchestrator = Orchestrator::with_config(browser, decider, LoopConfig::immediate());

        let report = orchestrator.run_task("task").await;

        assert!(report.is_success());
        assert_eq!(
            report.history[0].outcome,
            "Error: missing or invalid 'id' parameter"
        );
        assert_eq!(report.history[1].outcome, "Success");
    }

    #[test]
    fn default_pacing_preserves_the_settle_ordering() {
        let config = LoopConfig::default();
        assert!(config.type_pause < config.batched_click_pause);
        assert!(config.batched_click_pause < config.solo_click_pause);
        assert!(config.solo_click_pause < config.navigate_pause);
    }
}
