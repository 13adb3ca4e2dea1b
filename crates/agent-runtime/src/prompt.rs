//! Prompt construction for the decision-maker.
//!
//! Pure input → output so it can be tested without any transport: task plus
//! history plus the current observation become the message list sent to the
//! chat-completions endpoint.

use serde_json::{json, Value};
use webpilot_core_types::{ActionRecord, Observation};

pub const SYSTEM_PROMPT: &str = r#"You are an autonomous browser agent. Your goal is to operate the browser efficiently.

### WORKING PROTOCOL:
1. Analyze the DOM summary.
2. Plan your actions.
3. Execute actions through the provided tools.
4. When finished, call "submit_task_result".

### BATCHING:
You may return several tool calls in one answer.

WHEN TO BATCH:
- Ticking several checkboxes.
- Filling a long form (first name, then last name, then email).
- Sequences like [type(1), type(2), click(3)].

WHEN NOT TO BATCH:
- If an action changes the URL or reloads the page (following a link, a search button, a login button).
- RULE: a page-changing action must be the ONLY action or the LAST action in the batch.

### ANSWER FORMAT:
- Do not describe actions in prose. Return the tool calls directly.

### IMPORTANT:
- Never announce completion in text. Use the "submit_task_result" tool.
- Element IDs change after every page update; only use IDs from the latest DOM summary.
"#;

/// Build the full message list: system prompt, an optional read-only
/// history block, then the current task and browser state.
///
/// History is rendered as JSON Lines, machine-log shaped context the model
/// reads but does not imitate, since its own output channel is tool calls.
pub fn build_messages(
    task: &str,
    history: &[ActionRecord],
    observation: &Observation,
) -> Vec<Value> {
    let mut messages = vec![json!({
        "role": "system",
        "content": SYSTEM_PROMPT,
    })];

    if !history.is_empty() {
        messages.push(json!({
            "role": "user",
            "content": render_history(history),
        }));
    }

    messages.push(json!({
        "role": "user",
        "content": format!(
            "CURRENT TASK: {}\n\nCURRENT BROWSER STATE:\nURL: {}\nTitle: {}\n\nDOM STRUCTURE (Interactive Elements):\n{}",
            task, observation.url, observation.title, observation.dom_summary
        ),
    }));

    messages
}

fn render_history(history: &[ActionRecord]) -> String {
    let mut block = String::from("PREVIOUS ACTIONS LOG (Read-Only Context):\n");
    for (index, record) in history.iter().enumerate() {
        let entry = json!({
            "step": index + 1,
            "thought": record.reasoning,
            "action": record.action,
            "args": record.args,
            "result": record.outcome,
        });
        block.push_str(&entry.to_string());
        block.push('\n');
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(message: &Value) -> &str {
        message["content"].as_str().unwrap()
    }

    fn observation(url: &str, title: &str, summary: &str) -> Observation {
        Observation {
            url: url.to_string(),
            title: title.to_string(),
            dom_summary: summary.to_string(),
        }
    }

    #[test]
    fn first_step_has_no_history_block() {
        let obs = observation("https://google.com", "Google", "[1] <input> [INPUT] Search");
        let messages = build_messages("Buy an elephant", &[], &obs);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert!(content(&messages[0]).contains("autonomous browser agent"));

        let user = content(&messages[1]);
        assert!(user.contains("CURRENT TASK: Buy an elephant"));
        assert!(user.contains("google.com"));
        assert!(!user.contains("PREVIOUS ACTIONS LOG"));
    }

    #[test]
    fn history_block_is_separate_from_current_state() {
        let obs = observation("https://mail.example.com", "Inbox", "[1] <p> Inbox is empty");
        let history = vec![ActionRecord {
            reasoning: "I can see an email from mom".to_string(),
            action: "click".to_string(),
            args: r#"{"id":15}"#.to_string(),
            outcome: "Success".to_string(),
        }];

        let messages = build_messages("Delete the spam", &history, &obs);
        assert_eq!(messages.len(), 3);

        let history_block = content(&messages[1]);
        assert!(history_block.contains("PREVIOUS ACTIONS LOG"));
        assert!(history_block.contains("I can see an email from mom"));
        assert!(history_block.contains("\"step\":1"));

        // History must never leak into the current-state message.
        let current = content(&messages[2]);
        assert!(!current.contains("I can see an email from mom"));
        assert!(current.contains("Inbox is empty"));
    }

    #[test]
    fn history_entries_are_numbered_in_order() {
        let obs = observation("https://example.com", "Example", "No elements found");
        let history: Vec<_> = (0..3)
            .map(|i| ActionRecord {
                reasoning: format!("thought {i}"),
                action: "scroll".to_string(),
                args: "{}".to_string(),
                outcome: "Success".to_string(),
            })
            .collect();

        let messages = build_messages("task", &history, &obs);
        let block = content(&messages[1]);
        assert!(block.contains("\"step\":1"));
        assert!(block.contains("\"step\":3"));
        let first = block.find("\"thought 0\"").unwrap();
        let last = block.find("\"thought 2\"").unwrap();
        assert!(first < last);
    }
}
