//! Integration tests for a full chat session driven through mock adapters.
//!
//! These tests verify that:
//! 1. Sentiment flows through tone into the prompt sent to the generator
//! 2. Model failures and abandoned turns are recovered at the turn boundary
//! 3. Feedback is captured once after the session ends
//! 4. The history window bounds what a long session sends

use std::sync::Arc;

use mind_haven::adapters::ai::{MockAIProvider, MockError};
use mind_haven::adapters::sentiment::MockClassifier;
use mind_haven::application::{SessionFactory, SessionSettings, RECOVERY_NOTICE};
use mind_haven::domain::conversation::{HistoryWindow, Role};
use mind_haven::domain::sentiment::{SentimentLabel, ToneDirective};
use mind_haven::domain::session::{FeedbackRating, SessionError, SessionState};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn factory(classifier: &MockClassifier, generator: &MockAIProvider) -> SessionFactory {
    factory_with(classifier, generator, SessionSettings::default())
}

fn factory_with(
    classifier: &MockClassifier,
    generator: &MockAIProvider,
    settings: SessionSettings,
) -> SessionFactory {
    SessionFactory::new(
        Arc::new(classifier.clone()),
        Arc::new(generator.clone()),
        settings,
    )
}

// =============================================================================
// End-to-end turn
// =============================================================================

#[tokio::test]
async fn positive_utterance_gets_encouraging_reply() {
    let classifier = MockClassifier::new().with_label(SentimentLabel::VeryPositive);
    let generator = MockAIProvider::new().with_response("That's wonderful to hear!");
    let mut session = factory(&classifier, &generator).open();

    let outcome = session.submit_text("I feel great today").await.unwrap();

    assert_eq!(outcome.sentiment, SentimentLabel::VeryPositive);
    assert_eq!(outcome.tone, ToneDirective::Encouraging);

    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("encouraging and warm"));
    assert!(prompt.contains("User input: I feel great today"));
    assert!(!prompt.contains('{'));

    let turns = session.all_turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role(), Role::User);
    assert_eq!(turns[0].text(), "I feel great today");
    assert_eq!(turns[1].role(), Role::Assistant);
    assert_eq!(turns[1].text(), "That's wonderful to hear!");
    assert_eq!(classifier.calls(), vec!["I feel great today"]);
}

#[tokio::test]
async fn tone_follows_each_turns_sentiment() {
    let classifier = MockClassifier::new()
        .with_label(SentimentLabel::VeryNegative)
        .with_label(SentimentLabel::Neutral)
        .with_label(SentimentLabel::Positive);
    let generator = MockAIProvider::new();
    let mut session = factory(&classifier, &generator).open();

    session.submit_text("Everything is falling apart").await.unwrap();
    session.submit_text("I talked to my sister").await.unwrap();
    session.submit_text("She helped a lot").await.unwrap();

    let prompts: Vec<String> = generator
        .requests()
        .into_iter()
        .map(|req| req.messages[0].content.clone())
        .collect();
    assert!(prompts[0].starts_with("Respond with a comforting and empathetic tone."));
    assert!(prompts[1].starts_with("Respond with a neutral and empathetic tone."));
    assert!(prompts[2].starts_with("Respond with an encouraging and warm tone."));
    assert_eq!(session.all_turns().len(), 6);
}

#[tokio::test]
async fn every_request_is_a_single_user_message() {
    let classifier = MockClassifier::new();
    let generator = MockAIProvider::new();
    let mut session = factory(&classifier, &generator).open();

    session.submit_text("one").await.unwrap();
    session.submit_text("two").await.unwrap();

    for request in generator.requests() {
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, Role::User);
        assert_eq!(request.metadata.session_id, session.id());
    }
}

// =============================================================================
// Recovery
// =============================================================================

#[tokio::test]
async fn generator_outage_is_turn_local() {
    let classifier = MockClassifier::new();
    let generator = MockAIProvider::new()
        .with_error(MockError::RateLimited {
            retry_after_secs: 20,
        })
        .with_response("Thanks for waiting.");
    let mut session = factory(&classifier, &generator).open();

    let first = session.submit_text("Hello?").await;
    assert!(matches!(first, Err(SessionError::GeneratorUnavailable(_))));
    assert_eq!(session.state(), SessionState::AwaitingInput);

    let notices = session
        .all_turns()
        .iter()
        .filter(|t| t.text() == RECOVERY_NOTICE)
        .count();
    assert_eq!(notices, 1);

    session.submit_text("Still there?").await.unwrap();
    let turns = session.all_turns();
    assert_eq!(turns.len(), 4);
    assert_eq!(turns[3].text(), "Thanks for waiting.");

    // The notice is part of history for the next prompt.
    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains(&format!("assistant: {}", RECOVERY_NOTICE)));
}

#[tokio::test]
async fn classifier_outage_never_reaches_generator() {
    let classifier = MockClassifier::new().with_empty_result();
    let generator = MockAIProvider::new();
    let mut session = factory(&classifier, &generator).open();

    let result = session.submit_text("I don't know how I feel").await;

    assert!(matches!(result, Err(SessionError::ClassifierUnavailable(_))));
    assert_eq!(generator.call_count(), 0);
    assert_eq!(session.all_turns()[0].text(), "I don't know how I feel");
    assert_eq!(session.all_turns()[1].text(), RECOVERY_NOTICE);
}

#[tokio::test]
async fn slow_classifier_times_out() {
    let classifier = MockClassifier::new().with_delay(std::time::Duration::from_millis(200));
    let generator = MockAIProvider::new();
    let settings = SessionSettings {
        classifier_timeout: std::time::Duration::from_millis(10),
        ..SessionSettings::default()
    };
    let mut session = factory_with(&classifier, &generator, settings).open();

    let result = session.submit_text("hello").await;

    assert!(matches!(result, Err(SessionError::ClassifierUnavailable(_))));
    assert_eq!(generator.call_count(), 0);
    assert_eq!(session.state(), SessionState::AwaitingInput);
}

#[tokio::test]
async fn abandoned_turn_recovers_and_session_continues() {
    let classifier = MockClassifier::new().with_delay(std::time::Duration::from_millis(200));
    let generator = MockAIProvider::new().with_response("Welcome back.");
    let mut session = factory(&classifier, &generator).open();

    let abandoned = tokio::time::timeout(
        std::time::Duration::from_millis(20),
        session.submit_text("I need to talk"),
    )
    .await;
    assert!(abandoned.is_err());

    assert_eq!(session.state(), SessionState::AwaitingInput);
    assert_eq!(session.all_turns().len(), 2);
    assert_eq!(session.all_turns()[1].text(), RECOVERY_NOTICE);
    assert_eq!(generator.call_count(), 0);

    // Slow classifier, but nobody is waiting on a deadline this time
    let outcome = session.submit_text("Still there?").await.unwrap();
    assert_eq!(outcome.reply, "Welcome back.");
    assert_eq!(session.all_turns().len(), 4);

    session.end_session().unwrap();
    session.submit_feedback(FeedbackRating::Satisfied).unwrap();
}

// =============================================================================
// Lifecycle and feedback
// =============================================================================

#[tokio::test]
async fn full_session_with_feedback() {
    let classifier = MockClassifier::new();
    let generator = MockAIProvider::new();
    let mut session = factory(&classifier, &generator).open();

    session.submit_text("I had a hard day").await.unwrap();
    session.end_session().unwrap();

    assert_eq!(
        session.submit_text("one more thing").await,
        Err(SessionError::NotAcceptingInput(SessionState::SessionEnded))
    );

    session.submit_feedback(FeedbackRating::Satisfied).unwrap();
    assert!(matches!(
        session.submit_feedback(FeedbackRating::Dissatisfied),
        Err(SessionError::InvalidFeedback(_))
    ));
    assert_eq!(session.feedback(), Some(FeedbackRating::Satisfied));

    assert!(session.take_acknowledgment());
    assert!(!session.take_acknowledgment());
    assert_eq!(session.all_turns().len(), 2);
}

#[tokio::test]
async fn sessions_do_not_share_transcripts() {
    let classifier = MockClassifier::new();
    let generator = MockAIProvider::new();
    let factory = factory(&classifier, &generator);

    let mut first = factory.open();
    let second = factory.open();

    first.submit_text("only in the first session").await.unwrap();

    assert_eq!(first.all_turns().len(), 2);
    assert!(second.all_turns().is_empty());
    assert_ne!(first.id(), second.id());
}

// =============================================================================
// History window
// =============================================================================

#[tokio::test]
async fn long_sessions_send_bounded_history() {
    let classifier = MockClassifier::new();
    let generator = MockAIProvider::new();
    let settings = SessionSettings {
        window: HistoryWindow::new(4, 10_000),
        ..SessionSettings::default()
    };
    let mut session = factory_with(&classifier, &generator, settings).open();

    for i in 0..5 {
        session.submit_text(&format!("message {}", i)).await.unwrap();
    }

    // 8 prior turns, 4 kept
    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("[4 earlier turns omitted]"));
    assert!(!prompt.contains("user: message 1"));
    assert!(prompt.contains("user: message 2"));
    assert!(prompt.contains("user: message 3"));
    assert!(prompt.contains("User input: message 4"));
    assert_eq!(session.all_turns().len(), 10);
}
