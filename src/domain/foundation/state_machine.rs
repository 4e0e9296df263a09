//! Checked transitions for lifecycle enums.

use super::ValidationError;

/// A lifecycle enum with an explicit transition table.
///
/// Implementors list their legal moves; `transition_to` refuses anything
/// else so callers cannot skip a step.
///
/// ```ignore
/// let next = SessionState::AwaitingInput.transition_to(SessionState::Processing)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Every state reachable in one step.
    fn valid_transitions(&self) -> Vec<Self>;

    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if !self.can_transition_to(&target) {
            return Err(ValidationError::invalid_format(
                "state",
                format!("{:?} cannot move to {:?}", self, target),
            ));
        }
        Ok(target)
    }

    /// No outgoing transitions.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
