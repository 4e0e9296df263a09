//! History window management for prompts.
//!
//! Bounds the serialized conversation history included in each prompt so
//! that prompt size (and model cost and latency) stays flat across long
//! sessions, while preserving the most recent turns.

/// Limits applied to serialized history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    /// Maximum number of turns to include.
    pub max_turns: usize,
    /// Maximum characters across the included history lines.
    pub max_chars: usize,
}

impl HistoryWindow {
    /// Creates a new window.
    pub fn new(max_turns: usize, max_chars: usize) -> Self {
        Self {
            max_turns,
            max_chars,
        }
    }

    /// Selects the most recent lines that fit the window.
    ///
    /// Works backward from the newest line; the first line that would exceed
    /// either limit stops the scan so the kept history is always a contiguous
    /// suffix. When older lines are dropped, a marker line naming how many
    /// were omitted is placed first.
    pub fn apply<I>(&self, lines: I) -> BoundedHistory
    where
        I: DoubleEndedIterator<Item = String> + ExactSizeIterator,
    {
        let total = lines.len();
        let mut kept: Vec<String> = Vec::new();
        let mut used_chars = 0usize;

        for line in lines.rev() {
            if kept.len() >= self.max_turns {
                break;
            }
            // Joining newline counts against the budget too.
            let cost = line.chars().count() + usize::from(!kept.is_empty());
            if used_chars + cost > self.max_chars {
                break;
            }
            used_chars += cost;
            kept.push(line);
        }

        kept.reverse();
        let omitted = total - kept.len();

        let mut text = String::new();
        if omitted > 0 {
            text.push_str(&omission_marker(omitted));
            if !kept.is_empty() {
                text.push('\n');
            }
        }
        text.push_str(&kept.join("\n"));

        BoundedHistory {
            text,
            included: kept.len(),
            omitted,
        }
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::new(20, 6_000)
    }
}

fn omission_marker(omitted: usize) -> String {
    if omitted == 1 {
        "[1 earlier turn omitted]".to_string()
    } else {
        format!("[{} earlier turns omitted]", omitted)
    }
}

/// History text ready for interpolation into a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedHistory {
    /// Newline-joined history lines, oldest first.
    pub text: String,
    /// Number of turns included.
    pub included: usize,
    /// Number of older turns left out.
    pub omitted: usize,
}

impl BoundedHistory {
    /// Returns true if any turns were left out.
    pub fn was_truncated(&self) -> bool {
        self.omitted > 0
    }
}
