//! Phase - where the teller is in its idle/select/submit cycle

use super::Action;

/// Teller lifecycle: idle → action selected → submitting → idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    ActionSelected(Action),
    Submitting(Action),
}

impl Phase {
    /// Busy flag: a request sequence is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Submitting(_))
    }

    /// Label of the submit control
    pub fn submit_label(&self) -> &'static str {
        if self.is_busy() {
            "Processing..."
        } else {
            "Submit"
        }
    }
}
