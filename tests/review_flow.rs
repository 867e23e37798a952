mod common;

use codelens::review::interpreter::CODE_ONLY_ACK;
use codelens::review::prompt::SYSTEM_PROMPT;
use codelens::review::session::{CHAT_FAILURE, EXECUTION_FAILURE};
use codelens::review::{Mode, ReviewSession, Role};
use common::FakeGateway;

const MODEL: &str = "llama-3.3-70b-versatile";
const PY_DUPES: &str = "def dupes(xs):\n    out = []\n    for i in xs:\n        for j in xs:\n            if i == j:\n                out.append(i)\n    return out";

#[tokio::test]
async fn test_analyze_reply_updates_metrics_and_keeps_buffer() {
    let gateway = FakeGateway::replying(
        "- ❌ Nested loop is quadratic\n- 💡 Use a set\n[SCORE: 62] [TIME: O(N^2)] [SPACE: O(N)]",
    );
    let mut session = ReviewSession::new(PY_DUPES);

    let done = session.submit(&gateway, MODEL, Mode::Analyze, "").await.unwrap();

    assert!(!done.failed);
    assert!(!done.buffer_replaced);
    assert_eq!(session.buffer(), PY_DUPES);
    assert_eq!(session.metrics().score, Some(62));
    assert_eq!(session.metrics().time_complexity.as_deref(), Some("O(N^2)"));
    assert_eq!(session.metrics().space_complexity.as_deref(), Some("O(N)"));

    let reply = session.last_assistant().unwrap();
    assert_eq!(reply.content, "- ❌ Nested loop is quadratic\n- 💡 Use a set");
    assert!(!reply.content.contains('['));

    // system + greeting + hidden analyze turn + final combined turn
    let turns = gateway.last_turns();
    assert_eq!(turns.len(), 4);
    assert_eq!(turns[0].content, SYSTEM_PROMPT);
    assert_eq!(turns[1].role, Role::Assistant);
    assert!(turns[3].content.starts_with("CURRENT CODE CONTEXT:\ndef dupes"));
    assert!(turns[3].content.contains("Python"));
}

#[tokio::test]
async fn test_analyze_request_is_hidden_from_chat() {
    let gateway = FakeGateway::replying("- ✅ ok [SCORE: 90]");
    let mut session = ReviewSession::new(PY_DUPES);

    session.submit(&gateway, MODEL, Mode::Analyze, "").await.unwrap();

    let visible: Vec<_> = session.visible_messages().collect();
    assert_eq!(visible.len(), 2);
    assert_eq!(session.messages().len(), 3);
    assert!(session.messages()[1].hidden);
}

#[tokio::test]
async fn test_optimize_replaces_buffer_and_prefers_new_time() {
    let gateway = FakeGateway::replying(
        "```python\ndef dupes(xs):\n    return list({x for x in xs})\n```\n[SCORE: 95] [OLD_TIME: O(N^2)] [NEW_TIME: O(N)] [NEW_SPACE: O(N)]",
    );
    let mut session = ReviewSession::new(PY_DUPES);

    let done = session.submit(&gateway, MODEL, Mode::Optimize, "").await.unwrap();

    assert!(done.buffer_replaced);
    assert_eq!(
        session.buffer(),
        "def dupes(xs):\n    return list({x for x in xs})"
    );
    let metrics = session.metrics();
    assert_eq!(metrics.score, Some(95));
    assert_eq!(metrics.time_complexity.as_deref(), Some("O(N)"));
    assert_eq!(metrics.previous_time_complexity.as_deref(), Some("O(N^2)"));
    assert_eq!(metrics.space_complexity.as_deref(), Some("O(N)"));
    assert_eq!(metrics.time_label().as_deref(), Some("O(N^2) ➔ O(N)"));

    // Tags follow the block, so no acknowledgement; stripping leaves nothing.
    assert_eq!(session.last_assistant().unwrap().content, "");
}

#[tokio::test]
async fn test_code_only_reply_is_acknowledged() {
    let gateway = FakeGateway::replying("```c++\nint main() { return 0; }\n```");
    let mut session = ReviewSession::new("#include <iostream>\nint main() { return 1; }");

    let done = session.submit(&gateway, MODEL, Mode::Optimize, "").await.unwrap();

    assert!(done.buffer_replaced);
    assert_eq!(session.buffer(), "int main() { return 0; }");
    assert_eq!(session.last_assistant().unwrap().content, CODE_ONLY_ACK);
}

#[tokio::test]
async fn test_optimize_without_block_leaves_buffer() {
    let gateway = FakeGateway::replying("This is already optimal. [SCORE: 100]");
    let mut session = ReviewSession::new(PY_DUPES);

    let done = session.submit(&gateway, MODEL, Mode::Optimize, "").await.unwrap();

    assert!(!done.buffer_replaced);
    assert_eq!(session.buffer(), PY_DUPES);
    assert_eq!(session.metrics().score, Some(100));
    assert_eq!(
        session.last_assistant().unwrap().content,
        "This is already optimal."
    );
}

#[tokio::test]
async fn test_next_analyze_clears_previous_time() {
    let mut session = ReviewSession::new(PY_DUPES);

    let optimize = FakeGateway::replying("```\nx\n```\n[OLD_TIME: O(N^2)] [NEW_TIME: O(N)]");
    session.submit(&optimize, MODEL, Mode::Optimize, "").await.unwrap();
    assert_eq!(session.metrics().previous_time_complexity.as_deref(), Some("O(N^2)"));

    let analyze = FakeGateway::replying("- ✅ fine [SCORE: 88]");
    session.submit(&analyze, MODEL, Mode::Analyze, "").await.unwrap();

    let metrics = session.metrics();
    assert!(metrics.previous_time_complexity.is_none());
    assert_eq!(metrics.score, Some(88));
    // No TIME tag this round, so the last value stays.
    assert_eq!(metrics.time_complexity.as_deref(), Some("O(N)"));
    assert_eq!(metrics.time_label().as_deref(), Some("O(N)"));
}

#[tokio::test]
async fn test_missing_credential_appends_only_failure_notice() {
    let gateway = FakeGateway::without_key();
    let mut session = ReviewSession::new(PY_DUPES);

    let done = session
        .submit(&gateway, MODEL, Mode::Chat, "Why is this slow?")
        .await
        .unwrap();

    assert!(done.failed);
    assert!(!session.is_loading());
    assert_eq!(session.buffer(), PY_DUPES);
    assert_eq!(session.metrics().score, None);

    let contents: Vec<&str> = session.messages().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[1], "Why is this slow?");
    assert_eq!(contents[2], CHAT_FAILURE);
}

#[tokio::test]
async fn test_execute_writes_console_only() {
    let mut session = ReviewSession::new("print('hi')");

    let gateway = FakeGateway::replying("```text\nhi\n```");
    session.submit(&gateway, MODEL, Mode::Execute, "").await.unwrap();
    assert_eq!(session.console(), Some("hi"));
    assert_eq!(session.messages().len(), 1);
    // Execute sends no prior turns: system + final only.
    assert_eq!(gateway.last_turns().len(), 2);

    let failing = FakeGateway::without_key();
    let done = session.submit(&failing, MODEL, Mode::Execute, "").await.unwrap();
    assert!(done.failed);
    assert_eq!(session.console(), Some(EXECUTION_FAILURE));
    assert_eq!(session.buffer(), "print('hi')");
}

#[tokio::test]
async fn test_chat_history_grows_across_turns() {
    let gateway = FakeGateway::replying("Sure.");
    let mut session = ReviewSession::new("x = 1");

    session.submit(&gateway, MODEL, Mode::Chat, "first").await.unwrap();
    session.submit(&gateway, MODEL, Mode::Chat, "second").await.unwrap();

    // system + greeting, first, Sure., second + final
    let turns = gateway.last_turns();
    assert_eq!(turns.len(), 6);
    assert_eq!(turns[2].content, "first");
    assert_eq!(turns[3].content, "Sure.");
    assert!(turns[5].content.ends_with("USER QUESTION:\nsecond"));
    assert_eq!(gateway.calls.lock().unwrap().len(), 2);
}
