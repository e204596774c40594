//! Selection phases and the allowed-transition table

use crate::error::SelectionError;

/// Coarse engine state used by the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionPhase {
    Idle,
    Dragging,
    Editing,
}

/// Validates a phase transition
///
/// # Errors
/// Returns error if `to` is not reachable from `from`
pub fn validate_transition(from: SelectionPhase, to: SelectionPhase) -> Result<(), SelectionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(SelectionError::IllegalTransition { from, to })
    }
}

/// Phases reachable in one step from `from`
#[must_use]
pub fn allowed_transitions(from: SelectionPhase) -> &'static [SelectionPhase] {
    use SelectionPhase::{Dragging, Editing, Idle};
    match from {
        Idle => &[Dragging, Editing],
        Dragging => &[Dragging, Idle, Editing],
        // a pointer-down commits first, then starts a drag from Idle
        Editing => &[Idle],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use super::SelectionPhase::{Dragging, Editing, Idle};

    #[test]
    fn idle_transitions() {
        assert!(validate_transition(Idle, Dragging).is_ok());
        assert!(validate_transition(Idle, Editing).is_ok());
        assert!(validate_transition(Idle, Idle).is_err());
    }

    #[test]
    fn editing_only_returns_to_idle() {
        assert!(validate_transition(Editing, Idle).is_ok());
        assert_eq!(
            validate_transition(Editing, Dragging),
            Err(SelectionError::IllegalTransition {
                from: Editing,
                to: Dragging
            })
        );
    }

    proptest! {
        #[test]
        fn prop_validate_agrees_with_table(
            from in prop_oneof![Just(Idle), Just(Dragging), Just(Editing)],
            to in prop_oneof![Just(Idle), Just(Dragging), Just(Editing)],
        ) {
            let ok = validate_transition(from, to).is_ok();
            prop_assert_eq!(ok, allowed_transitions(from).contains(&to));
        }
    }
}
