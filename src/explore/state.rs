//! Explorer session state machine states.

/// Session state.
///
/// `Routing -> Arrived -> Wandering -> Done` is the happy path; `Done` can
/// be entered from anywhere when the step budget runs out, the game
/// interface fails, or shutdown is signalled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Following a computed route toward the target.
    Routing,
    /// Reached the target (or gave up routing to it).
    Arrived,
    /// Taking bounded random steps around the arrival point.
    Wandering,
    /// Finished; the local mesh is ready to hand back.
    Done,
}

impl SessionState {
    /// State name for logging.
    pub fn name(self) -> &'static str {
        match self {
            SessionState::Routing => "Routing",
            SessionState::Arrived => "Arrived",
            SessionState::Wandering => "Wandering",
            SessionState::Done => "Done",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == SessionState::Done
    }
}
