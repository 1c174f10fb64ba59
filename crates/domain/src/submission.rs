/// Per-page-view state of the comment form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    AwaitingSubmission,
    Submitted,
}

/// The request never reached the comment endpoint (connection refused,
/// DNS failure, broken body...). HTTP error statuses are not transport
/// errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("comment submission failed: {0}")]
pub struct TransportError(pub String);

pub type SubmitOutcome = Result<(), TransportError>;

impl SubmissionState {
    /// Applies the outcome of a submission request. `Submitted` is terminal.
    pub fn transition(self, outcome: &SubmitOutcome) -> SubmissionState {
        match (self, outcome) {
            (SubmissionState::Submitted, _) => SubmissionState::Submitted,
            (_, Ok(())) => SubmissionState::Submitted,
            (_, Err(_)) => SubmissionState::AwaitingSubmission,
        }
    }

    pub fn shows_form(self) -> bool {
        self == SubmissionState::AwaitingSubmission
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_submits() {
        let next = SubmissionState::default().transition(&Ok(()));
        assert_eq!(next, SubmissionState::Submitted);
        assert!(!next.shows_form());
    }

    #[test]
    fn failure_resets_to_form() {
        let next = SubmissionState::AwaitingSubmission
            .transition(&Err(TransportError("connection refused".into())));
        assert_eq!(next, SubmissionState::AwaitingSubmission);
        assert!(next.shows_form());
    }

    #[test]
    fn submitted_is_terminal() {
        let next =
            SubmissionState::Submitted.transition(&Err(TransportError("late failure".into())));
        assert_eq!(next, SubmissionState::Submitted);
    }
}
