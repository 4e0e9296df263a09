//! Session controller - drives one chat session through its lifecycle.
//!
//! A turn runs classify → tone → compose → generate against the injected
//! ports. Model failures are recovered at the turn boundary: the user turn
//! stays in the transcript, a single notice turn is appended and the session
//! accepts input again.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::domain::conversation::{ConversationStore, HistoryWindow, PromptComposer, Turn};
use crate::domain::foundation::{SessionId, StateMachine};
use crate::domain::sentiment::{SentimentLabel, ToneDirective};
use crate::domain::session::{FeedbackRating, FeedbackSlot, SessionError, SessionState};
use crate::ports::{CompletionRequest, RequestMetadata, ResponseGenerator, SentimentClassifier};

/// Assistant text appended when a turn cannot be answered.
pub const RECOVERY_NOTICE: &str =
    "I'm sorry, I'm having trouble responding right now. Please try again in a moment.";

/// Per-session tuning.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub window: HistoryWindow,
    /// Upper bound on one classification, retries included.
    pub classifier_timeout: Duration,
    /// Upper bound on one completion, retries included.
    pub generator_timeout: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            window: HistoryWindow::default(),
            classifier_timeout: Duration::from_secs(30),
            generator_timeout: Duration::from_secs(90),
        }
    }
}

/// What a successful turn produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub sentiment: SentimentLabel,
    pub tone: ToneDirective,
    pub reply: String,
}

/// Owns the state, transcript and feedback of a single session.
pub struct SessionController {
    id: SessionId,
    state: SessionState,
    store: ConversationStore,
    feedback: FeedbackSlot,
    acknowledgment_pending: bool,
    turns_taken: u32,
    classifier: Arc<dyn SentimentClassifier>,
    generator: Arc<dyn ResponseGenerator>,
    composer: PromptComposer,
    settings: SessionSettings,
}

impl SessionController {
    /// Creates an idle session. Call [`start`](Self::start) before submitting text.
    pub fn new(
        classifier: Arc<dyn SentimentClassifier>,
        generator: Arc<dyn ResponseGenerator>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            id: SessionId::new(),
            state: SessionState::Idle,
            store: ConversationStore::new(),
            feedback: FeedbackSlot::default(),
            acknowledgment_pending: false,
            turns_taken: 0,
            classifier,
            generator,
            composer: PromptComposer::new(settings.window),
            settings,
        }
    }

    /// Replaces the prompt composer.
    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Idle → AwaitingInput.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.transition(SessionState::AwaitingInput)?;
        tracing::info!(session_id = %self.id, "Session started");
        Ok(())
    }

    fn started(mut self) -> Self {
        self.state = SessionState::AwaitingInput;
        tracing::info!(session_id = %self.id, "Session started");
        self
    }

    /// Runs one turn for the user's utterance.
    ///
    /// # Errors
    ///
    /// - `NotAcceptingInput` outside AwaitingInput, nothing changes
    /// - `EmptyInput` for empty or whitespace-only text, nothing changes
    /// - `ClassifierUnavailable` / `GeneratorUnavailable` after recovery
    pub async fn submit_text(&mut self, text: &str) -> Result<TurnOutcome, SessionError> {
        if !self.state.accepts_input() {
            return Err(SessionError::NotAcceptingInput(self.state));
        }
        let user_turn = Turn::user(text).map_err(|_| SessionError::EmptyInput)?;

        self.transition(SessionState::Processing)?;
        self.turns_taken += 1;

        // History covers prior turns only; the new utterance is its own slot.
        let history = self.composer.bound_history(&self.store);
        if history.was_truncated() {
            tracing::debug!(
                session_id = %self.id,
                omitted = history.omitted,
                "History window dropped earlier turns"
            );
        }
        self.store.append(user_turn);

        // Dropping the future mid-turn (request timeout, client gone) still
        // closes the turn with a notice.
        let mut guard = TurnGuard {
            session: self,
            completed: false,
        };
        let result = guard.session.run_turn(text, &history.text).await;
        guard.completed = true;
        drop(guard);

        match &result {
            Ok(outcome) => self.close_turn(&outcome.reply),
            Err(err) => {
                tracing::warn!(session_id = %self.id, error = %err, "Turn failed, appending notice");
                self.close_turn(RECOVERY_NOTICE);
            }
        }
        result
    }

    /// Appends the assistant turn and returns to AwaitingInput.
    fn close_turn(&mut self, reply: &str) {
        debug_assert_eq!(self.state, SessionState::Processing);
        // run_turn only succeeds with non-blank reply text
        if let Ok(turn) = Turn::assistant(reply) {
            self.store.append(turn);
        }
        self.state = SessionState::AwaitingInput;
    }

    async fn run_turn(&self, text: &str, history: &str) -> Result<TurnOutcome, SessionError> {
        let sentiment = timeout(self.settings.classifier_timeout, self.classifier.classify(text))
            .await
            .map_err(|_| {
                SessionError::classifier_unavailable(format!(
                    "no answer within {}s",
                    self.settings.classifier_timeout.as_secs()
                ))
            })?
            .map_err(|e| SessionError::classifier_unavailable(e.to_string()))?;

        let tone = ToneDirective::for_sentiment(sentiment);
        tracing::info!(
            session_id = %self.id,
            sentiment = %sentiment,
            tone = ?tone,
            model = self.classifier.model(),
            "Classified user turn"
        );

        let prompt = self.composer.compose(tone, history, text);
        let request = CompletionRequest::for_prompt(
            prompt,
            RequestMetadata::new(self.id, format!("{}-{}", self.id, self.turns_taken)),
        );

        let response = timeout(self.settings.generator_timeout, self.generator.complete(request))
            .await
            .map_err(|_| {
                SessionError::generator_unavailable(format!(
                    "no answer within {}s",
                    self.settings.generator_timeout.as_secs()
                ))
            })?
            .map_err(|e| SessionError::generator_unavailable(e.to_string()))?;

        if response.content.trim().is_empty() {
            return Err(SessionError::generator_unavailable("empty response from model"));
        }

        tracing::debug!(
            session_id = %self.id,
            provider = %self.generator.provider_info().name,
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            "Generated reply"
        );

        Ok(TurnOutcome {
            sentiment,
            tone,
            reply: response.content,
        })
    }

    /// AwaitingInput → SessionEnded.
    pub fn end_session(&mut self) -> Result<(), SessionError> {
        self.transition(SessionState::SessionEnded)?;
        tracing::info!(session_id = %self.id, turns = self.store.len(), "Session ended");
        Ok(())
    }

    /// Records the rating once, after the session has ended.
    pub fn submit_feedback(&mut self, rating: FeedbackRating) -> Result<(), SessionError> {
        if !self.state.is_ended() {
            return Err(SessionError::invalid_feedback("session has not ended"));
        }
        if !self.feedback.record(rating) {
            return Err(SessionError::invalid_feedback("feedback already recorded"));
        }

        self.acknowledgment_pending = true;
        tracing::info!(session_id = %self.id, rating = %rating, "Feedback recorded");
        Ok(())
    }

    /// Returns true once after feedback is recorded.
    pub fn take_acknowledgment(&mut self) -> bool {
        std::mem::take(&mut self.acknowledgment_pending)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn all_turns(&self) -> &[Turn] {
        self.store.all_turns()
    }

    pub fn feedback(&self) -> Option<FeedbackRating> {
        self.feedback.get()
    }

    fn transition(&mut self, to: SessionState) -> Result<(), SessionError> {
        self.state = self
            .state
            .transition_to(to)
            .map_err(|_| SessionError::NotAcceptingInput(self.state))?;
        Ok(())
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("turns", &self.store.len())
            .field("feedback", &self.feedback.get())
            .finish()
    }
}

/// Opens sessions that share the same model adapters.
#[derive(Clone)]
pub struct SessionFactory {
    classifier: Arc<dyn SentimentClassifier>,
    generator: Arc<dyn ResponseGenerator>,
    settings: SessionSettings,
}

impl SessionFactory {
    pub fn new(
        classifier: Arc<dyn SentimentClassifier>,
        generator: Arc<dyn ResponseGenerator>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            classifier,
            generator,
            settings,
        }
    }

    /// Creates a session already accepting input.
    pub fn open(&self) -> SessionController {
        SessionController::new(
            Arc::clone(&self.classifier),
            Arc::clone(&self.generator),
            self.settings,
        )
        .started()
    }
}

/// Closes an in-flight turn with the recovery notice when dropped early.
struct TurnGuard<'a> {
    session: &'a mut SessionController,
    completed: bool,
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        tracing::warn!(
            session_id = %self.session.id,
            "Turn interrupted before completion, appending notice"
        );
        self.session.close_turn(RECOVERY_NOTICE);
    }
}
