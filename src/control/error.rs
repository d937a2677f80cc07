//! Error types for trampoline evaluation.
//!
//! Evaluation through [`Trampoline::run`](super::Trampoline::run) never
//! fails on its own: a computation either finishes, loops forever, or
//! panics from inside user code. The bounded runner
//! [`Trampoline::run_bounded`](super::Trampoline::run_bounded) is the only
//! operation that reports an error.

/// Represents errors reported by bounded trampoline evaluation.
///
/// # Examples
///
/// ```rust
/// use bindery::control::TrampolineError;
///
/// let error = TrampolineError::StepLimitExceeded { limit: 500 };
/// assert_eq!(
///     format!("{}", error),
///     "trampoline did not finish within 500 steps"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrampolineError {
    /// The computation was still running after `limit` steps.
    StepLimitExceeded {
        /// The number of steps that were allowed.
        limit: u64,
    },
}

impl std::fmt::Display for TrampolineError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StepLimitExceeded { limit } => {
                write!(formatter, "trampoline did not finish within {limit} steps")
            }
        }
    }
}

impl std::error::Error for TrampolineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_limit_exceeded_display() {
        let error = TrampolineError::StepLimitExceeded { limit: 3 };
        assert_eq!(
            format!("{error}"),
            "trampoline did not finish within 3 steps"
        );
    }

    #[test]
    fn test_step_limit_exceeded_equality() {
        let error1 = TrampolineError::StepLimitExceeded { limit: 3 };
        let error2 = TrampolineError::StepLimitExceeded { limit: 3 };
        let error3 = TrampolineError::StepLimitExceeded { limit: 4 };
        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&TrampolineError::StepLimitExceeded { limit: 1 });
    }
}
