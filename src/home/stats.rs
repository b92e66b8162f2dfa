#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stats {
    sessions_started: u32,
    continuations: u32,
    turns_completed: u32,
    turns_failed: u32,
}

impl Stats {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_session_started(&mut self) {
        self.sessions_started += 1;
    }

    pub(crate) fn record_continuation(&mut self) {
        self.continuations += 1;
    }

    pub(crate) fn record_turn(&mut self, succeeded: bool) {
        if succeeded {
            self.turns_completed += 1;
        } else {
            self.turns_failed += 1;
        }
    }

    /// Conversations the assistant started, including continuations.
    pub fn sessions_started(&self) -> u32 {
        self.sessions_started
    }

    pub fn continuations(&self) -> u32 {
        self.continuations
    }

    pub fn turns_completed(&self) -> u32 {
        self.turns_completed
    }

    pub fn turns_failed(&self) -> u32 {
        self.turns_failed
    }
}
