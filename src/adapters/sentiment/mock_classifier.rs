//! Mock sentiment classifier for testing.
//!
//! Returns scripted labels in order, then falls back to a default label.
//! Errors can be injected to exercise the recovery path.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::sentiment::SentimentLabel;
use crate::ports::{ClassifierError, SentimentClassifier};

#[derive(Debug, Clone)]
enum Scripted {
    Label(SentimentLabel),
    Unavailable(String),
    Empty,
}

/// Scripted classifier. Clones share the script and the call history.
#[derive(Debug, Clone)]
pub struct MockClassifier {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    default_label: SentimentLabel,
    delay: Duration,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClassifier {
    /// Creates a classifier that answers `Neutral` unless scripted otherwise.
    pub fn new() -> Self {
        Self::always(SentimentLabel::Neutral)
    }

    /// Creates a classifier that answers `label` unless scripted otherwise.
    pub fn always(label: SentimentLabel) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            default_label: label,
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a label for the next call.
    pub fn with_label(self, label: SentimentLabel) -> Self {
        self.script.lock().unwrap().push_back(Scripted::Label(label));
        self
    }

    /// Queues an outage for the next call.
    pub fn with_unavailable(self, message: impl Into<String>) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Unavailable(message.into()));
        self
    }

    /// Queues an empty result for the next call.
    pub fn with_empty_result(self) -> Self {
        self.script.lock().unwrap().push_back(Scripted::Empty);
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Texts classified so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SentimentClassifier for MockClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentLabel, ClassifierError> {
        self.calls.lock().unwrap().push(text.to_string());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Label(label)) => Ok(label),
            Some(Scripted::Unavailable(message)) => Err(ClassifierError::Unavailable(message)),
            Some(Scripted::Empty) => Err(ClassifierError::EmptyResult),
            None => Ok(self.default_label),
        }
    }

    fn model(&self) -> &str {
        "mock-sentiment"
    }
}
