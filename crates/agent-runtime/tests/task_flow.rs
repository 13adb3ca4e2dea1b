//! End-to-end task flow over the public surface, with scripted ports.

use agent_runtime::{
    BrowserPort, LoopConfig, Orchestrator, ScriptedBrowser, ScriptedDecisionMaker, TaskVerdict,
};
use webpilot_core_types::{Observation, ToolCall};

fn inbox_observation() -> Observation {
    Observation {
        url: "https://mail.example.com/inbox".into(),
        title: "Inbox".into(),
        dom_summary: concat!(
            "[1] <link> [NAVIGATE] Inbox\n",
            "[2] <checkbox> [SELECT] Promo mail ( )\n",
            "[3] <button> [ACTION] Delete selected\n",
            "    <p> 2 unread messages\n",
        )
        .into(),
    }
}

#[tokio::test]
async fn full_task_runs_batches_and_submits() {
    let browser = ScriptedBrowser::new(inbox_observation());
    let decider = ScriptedDecisionMaker::new(vec![
        // Step 1: select the mail, delete it.
        vec![
            ToolCall::new("click")
                .with_arg("id", "2")
                .with_reasoning("select the promo mail"),
            ToolCall::new("click")
                .with_arg("id", 3)
                .with_reasoning("select the promo mail"),
        ],
        // Step 2: done.
        vec![ToolCall::new("done").with_arg("final_report", "Deleted one promo mail")],
    ]);

    let mut orchestrator = Orchestrator::with_config(browser, decider, LoopConfig::immediate());
    let report = orchestrator.run_task("clean up my inbox").await;

    assert_eq!(
        report.verdict,
        TaskVerdict::Completed {
            report: "Deleted one promo mail".into()
        }
    );
    assert_eq!(report.steps_taken, 2);
    assert_eq!(report.history.len(), 3);

    // The string-typed id was coerced before reaching the browser.
    assert_eq!(
        orchestrator.browser_mut().log,
        vec!["observe", "click(2)", "click(3)", "observe"]
    );

    // History keeps the decision-maker's justification with each record.
    assert_eq!(report.history[0].reasoning, "select the promo mail");
    assert!(report.history[2].outcome.contains("Deleted one promo mail"));
}

#[tokio::test]
async fn closing_the_only_tab_is_refused_and_state_survives() {
    let mut browser = ScriptedBrowser::new(inbox_observation()).refuse_close_tab();

    let err = browser.close_tab().await.unwrap_err();
    assert!(err.to_string().contains("navigate instead"));

    // The session still answers observations afterwards.
    let observation = browser.observe().await.unwrap();
    assert_eq!(observation.url, "https://mail.example.com/inbox");
}

#[tokio::test]
async fn press_and_scroll_route_through_the_port() {
    let browser = ScriptedBrowser::new(inbox_observation());
    let decider = ScriptedDecisionMaker::new(vec![
        vec![
            ToolCall::new("type").with_arg("id", 2).with_arg("text", "hello"),
            ToolCall::new("press").with_arg("key", "enter"),
        ],
        vec![
            ToolCall::new("scroll").with_arg("direction", "down"),
            ToolCall::new("go_back"),
        ],
        vec![ToolCall::new("submit_task_result").with_arg("final_report", "ok")],
    ]);

    let mut orchestrator = Orchestrator::with_config(browser, decider, LoopConfig::immediate());
    let report = orchestrator.run_task("poke around").await;

    assert!(report.is_success());
    assert_eq!(
        orchestrator.browser_mut().log,
        vec![
            "observe",
            "type(2, hello)",
            "press(enter)",
            "observe",
            "scroll(down)",
            "go_back",
            "observe",
        ]
    );
}
