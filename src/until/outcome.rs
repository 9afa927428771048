use crate::until::{error::RunUntilError, state::RunState};

/// Exit status reported on success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status reported for faults and for non-positive child exit codes.
pub const EXIT_FAILURE: i32 = 1;

/// How a run concluded. Exactly one is produced per run.
///
/// # Examples
///
/// ```rust
/// use run_until::until::outcome::RunOutcome;
///
/// let outcome = RunOutcome::NotFound { exit_code: Some(3) };
/// assert_eq!(outcome.exit_status(), 3);
///
/// let outcome = RunOutcome::NotFound { exit_code: Some(0) };
/// assert_eq!(outcome.exit_status(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The target string appeared in a chunk of output.
    Matched {
        /// Process id of the intermediary child runner
        process_id: u32,
        /// `true` when the child was left running instead of killed
        detached: bool,
    },

    /// The child exited before the target string appeared.
    NotFound {
        /// Exit code of the child runner (`None` if it was killed by a signal)
        exit_code: Option<i32>,
    },

    /// Supervision failed for a reason other than the child exiting.
    Faulted(RunUntilError),
}

impl RunOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, RunOutcome::Matched { .. })
    }

    pub fn state(&self) -> RunState {
        match self {
            RunOutcome::Matched { .. } => RunState::Matched,
            RunOutcome::NotFound { .. } => RunState::NotFound,
            RunOutcome::Faulted(_) => RunState::Faulted,
        }
    }

    /// Process exit status a front end should report for this outcome.
    pub fn exit_status(&self) -> i32 {
        match self {
            RunOutcome::Matched { .. } => EXIT_SUCCESS,
            RunOutcome::NotFound {
                exit_code: Some(code),
            } if *code > 0 => *code,
            RunOutcome::NotFound { .. } => EXIT_FAILURE,
            RunOutcome::Faulted(_) => EXIT_FAILURE,
        }
    }

    pub fn into_result(self) -> Result<(), RunUntilError> {
        match self {
            RunOutcome::Matched { .. } => Ok(()),
            RunOutcome::NotFound { exit_code } => Err(RunUntilError::TargetNotFound { exit_code }),
            RunOutcome::Faulted(e) => Err(e),
        }
    }
}
