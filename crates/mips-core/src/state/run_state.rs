/// Per-run execution state derived from the program counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// The program counter still points inside the text segment.
    #[default]
    Running,
    /// The program counter reached or passed the end of the text segment.
    Terminated,
}

impl RunState {
    /// Returns `true` once no further tick can succeed.
    #[must_use]
    pub const fn is_terminated(self) -> bool {
        matches!(self, Self::Terminated)
    }
}

#[cfg(test)]
mod tests {
    use super::RunState;

    #[test]
    fn run_state_default_is_running() {
        assert_eq!(RunState::default(), RunState::Running);
        assert!(!RunState::Running.is_terminated());
        assert!(RunState::Terminated.is_terminated());
    }
}
