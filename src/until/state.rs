/// Lifecycle of a supervised run.
///
/// `Spawned` is the only non-terminal state after start; each run reaches
/// exactly one of the terminal states.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Spawned,
    Matched,
    NotFound,
    Faulted,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Matched | RunState::NotFound | RunState::Faulted
        )
    }
}
