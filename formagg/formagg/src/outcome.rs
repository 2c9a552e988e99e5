use formagg_engine::PersistedSubmission;

use crate::error::FormError;

/// Result of handing a client submission to [`Form::accept`](crate::Form::accept).
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Re-encoded submission, ready to store.
    Accepted(PersistedSubmission),
    Rejected(Rejection),
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted(_))
    }

    pub fn into_result(self) -> Result<PersistedSubmission, Rejection> {
        match self {
            SubmissionOutcome::Accepted(submission) => Ok(submission),
            SubmissionOutcome::Rejected(rejection) => Err(rejection),
        }
    }
}

/// A refused submission.
///
/// Displays a generic message suitable for end users; the underlying cause is
/// kept for host-side logging only.
#[derive(Debug, thiserror::Error)]
#[error("the submission could not be validated; please review the form and try again")]
pub struct Rejection {
    cause: FormError,
}

impl Rejection {
    pub(crate) fn new(cause: FormError) -> Self {
        Self { cause }
    }

    pub fn cause(&self) -> &FormError {
        &self.cause
    }
}
