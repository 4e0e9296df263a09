//! Prompt composition.
//!
//! Renders the tone directive, bounded conversation history, and the new
//! utterance into a single instruction string. The template is parsed once
//! into literal and slot segments; rendering is a single pass, so slot-like
//! text inside user input is never substituted a second time.

use once_cell::sync::Lazy;
use thiserror::Error;

use super::{BoundedHistory, ConversationStore, HistoryWindow};
use crate::domain::sentiment::ToneDirective;

/// Template used for every turn.
pub const DEFAULT_TEMPLATE: &str = "Respond with {tone}. Use prior conversation context to provide advice. Previous conversation: {conversation_history} User input: {user_input}";

static DEFAULT_PARSED: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::parse(DEFAULT_TEMPLATE).expect("default prompt template should parse")
});

/// Errors raised while parsing a prompt template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown template slot '{{{0}}}'")]
    UnknownSlot(String),

    #[error("template is missing the '{{{0}}}' slot")]
    MissingSlot(&'static str),

    #[error("unclosed '{{' at byte {0}")]
    Unclosed(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Tone,
    ConversationHistory,
    UserInput,
}

impl Slot {
    const ALL: [Slot; 3] = [Slot::Tone, Slot::ConversationHistory, Slot::UserInput];

    fn name(&self) -> &'static str {
        match self {
            Slot::Tone => "tone",
            Slot::ConversationHistory => "conversation_history",
            Slot::UserInput => "user_input",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Slot),
}

/// A parsed template with `{tone}`, `{conversation_history}` and
/// `{user_input}` slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parses a template, requiring each of the three slots at least once.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(open) = rest.find('{') {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or(TemplateError::Unclosed(offset + open))?;
            let name = &after[..close];
            let slot =
                Slot::from_name(name).ok_or_else(|| TemplateError::UnknownSlot(name.to_string()))?;
            segments.push(Segment::Slot(slot));

            let consumed = open + 1 + close + 1;
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        for slot in Slot::ALL {
            if !segments.contains(&Segment::Slot(slot)) {
                return Err(TemplateError::MissingSlot(slot.name()));
            }
        }

        Ok(Self { segments })
    }

    /// Substitutes the three slots.
    pub fn render(&self, tone: &str, conversation_history: &str, user_input: &str) -> String {
        let mut out = String::with_capacity(
            self.literal_len() + tone.len() + conversation_history.len() + user_input.len(),
        );
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(Slot::Tone) => out.push_str(tone),
                Segment::Slot(Slot::ConversationHistory) => out.push_str(conversation_history),
                Segment::Slot(Slot::UserInput) => out.push_str(user_input),
            }
        }
        out
    }

    fn literal_len(&self) -> usize {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => text.len(),
                Segment::Slot(_) => 0,
            })
            .sum()
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        DEFAULT_PARSED.clone()
    }
}

/// Builds the instruction string sent to the response generator.
#[derive(Debug, Clone, Default)]
pub struct PromptComposer {
    template: PromptTemplate,
    window: HistoryWindow,
}

impl PromptComposer {
    /// Creates a composer with the default template and the given window.
    pub fn new(window: HistoryWindow) -> Self {
        Self {
            template: PromptTemplate::default(),
            window,
        }
    }

    /// Replaces the template.
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Returns the history window.
    pub fn window(&self) -> HistoryWindow {
        self.window
    }

    /// Serializes the store's turns, bounded by the window.
    pub fn bound_history(&self, store: &ConversationStore) -> BoundedHistory {
        self.window.apply(store.render_history())
    }

    /// Interpolates tone, history, and the new utterance into the template.
    pub fn compose(&self, tone: ToneDirective, conversation_history: &str, user_input: &str) -> String {
        self.template
            .render(tone.instruction(), conversation_history, user_input)
    }
}
