use mcp_chat::budget::CallBudget;
use mcp_chat::models::Message;
use mcp_chat::session::Session;
use mcp_chat::ui::preview;
use mcp_chat::ChatError;

#[test]
fn test_budget_allows_up_to_limit() {
    let mut budget = CallBudget::new(3);

    for expected in 1..=3 {
        budget.check_and_increment().unwrap();
        assert_eq!(budget.used(), expected);
    }

    assert!(budget.is_exhausted());
    assert_eq!(budget.remaining(), 0);
}

#[test]
fn test_budget_refusal_does_not_count() {
    let mut budget = CallBudget::new(1);
    budget.check_and_increment().unwrap();

    for _ in 0..3 {
        match budget.check_and_increment() {
            Err(ChatError::BudgetExceeded { limit, .. }) => assert_eq!(limit, 1),
            other => panic!("expected BudgetExceeded, got {:?}", other),
        }
    }
    assert_eq!(budget.used(), 1);
}

#[test]
fn test_default_budget_is_twenty() {
    let budget = CallBudget::default();
    assert_eq!(budget.limit(), 20);
    assert_eq!(budget.remaining(), 20);
}

#[test]
fn test_session_begin_query_resets_transcript() {
    let mut session = Session::new(5);
    session.begin_query("first");
    session.push(Message::Assistant(vec![]));
    assert_eq!(session.transcript().len(), 2);

    session.begin_query("second");
    assert_eq!(session.transcript(), &[Message::User("second".to_string())]);
    assert_eq!(session.budget.limit(), 5);
}

#[test]
fn test_preview_respects_char_boundaries() {
    assert_eq!(preview("short", 10), "short");
    assert_eq!(preview("abcdef", 3), "abc...");
    assert_eq!(preview("日本語テキスト", 3), "日本語...");
}
