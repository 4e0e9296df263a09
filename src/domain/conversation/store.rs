//! Append-only transcript of one session.

use std::iter::FusedIterator;
use std::slice;

use super::Turn;

/// Ordered, append-only log of turns owned by a single session.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn to the end of the transcript.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Returns `role: text` lines for every turn, oldest first.
    ///
    /// The iterator borrows the store, so it always reflects every append
    /// made before it was created. Clone it or call again to restart.
    pub fn render_history(&self) -> HistoryLines<'_> {
        HistoryLines {
            turns: self.turns.iter(),
        }
    }

    /// Returns all turns in insertion order.
    pub fn all_turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the most recent turn.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Lazy iterator over serialized history lines.
#[derive(Debug, Clone)]
pub struct HistoryLines<'a> {
    turns: slice::Iter<'a, Turn>,
}

impl Iterator for HistoryLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.turns.next().map(Turn::history_line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.turns.size_hint()
    }
}

impl DoubleEndedIterator for HistoryLines<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.turns.next_back().map(Turn::history_line)
    }
}

impl ExactSizeIterator for HistoryLines<'_> {}

impl FusedIterator for HistoryLines<'_> {}
