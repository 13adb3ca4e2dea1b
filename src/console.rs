//! Interactive console: one line in, one task run.

use agent_runtime::{BrowserPort, DecisionMaker, Orchestrator, TaskVerdict};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Read tasks from stdin until `exit`/`quit` or EOF.
///
/// Each non-empty line is forwarded verbatim to the control loop; the
/// verdict and every recorded outcome are echoed back to the operator.
pub async fn run<B, D>(orchestrator: &mut Orchestrator<B, D>) -> std::io::Result<()>
where
    B: BrowserPort,
    D: DecisionMaker,
{
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(b"Browser agent ready. Enter a task (or 'exit' to quit):\n")
        .await?;

    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let task = line.trim();

        if task.is_empty() {
            continue;
        }
        if task == "exit" || task == "quit" {
            stdout.write_all(b"Bye!\n").await?;
            break;
        }

        let report = orchestrator.run_task(task).await;

        let mut echo = String::new();
        for (index, record) in report.history.iter().enumerate() {
            echo.push_str(&format!(
                "  {:>2}. {} {} -> {}\n",
                index + 1,
                record.action,
                record.args,
                record.outcome
            ));
        }
        match &report.verdict {
            TaskVerdict::Completed { report: summary } => {
                echo.push_str(&format!("Task complete: {summary}\n"));
            }
            TaskVerdict::StepLimitReached => {
                echo.push_str(&format!(
                    "Stopped after {} steps without completion (bounded effort exhausted).\n",
                    report.steps_taken
                ));
            }
            TaskVerdict::Aborted { reason } => {
                echo.push_str(&format!("Task aborted: {reason}\n"));
            }
        }
        stdout.write_all(echo.as_bytes()).await?;
    }

    Ok(())
}
