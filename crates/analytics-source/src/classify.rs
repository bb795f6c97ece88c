//! Call classification strategies.

use analytics_core::types::CallDayMetrics;
use serde::{Deserialize, Serialize};

/// One call from the Talk incremental export.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TalkCall {
    pub created_at: Option<String>,
    pub direction: Option<String>,
    pub completion_status: Option<String>,
    #[serde(default)]
    pub callback: bool,
    #[serde(default)]
    pub voicemail: bool,
    pub duration: Option<u64>,
}

/// Decides whether an inbound call counts as answered.
///
/// Direction, voicemail and callback flags are read the same way by every
/// strategy; only the answered/unanswered split differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallClassifier {
    /// Answered when Talk reports `completion_status = "completed"`
    #[default]
    CompletionStatus,
    /// Answered when the call lasted at least `min_answered_secs`
    TalkTime { min_answered_secs: u64 },
}

impl CallClassifier {
    fn is_answered(&self, call: &TalkCall) -> bool {
        match self {
            CallClassifier::CompletionStatus => call.completion_status.as_deref() == Some("completed"),
            CallClassifier::TalkTime { min_answered_secs } => {
                call.duration.unwrap_or(0) >= *min_answered_secs
            }
        }
    }

    /// Add one call to the day's counters.
    pub(crate) fn tally(&self, metrics: &mut CallDayMetrics, call: &TalkCall) {
        metrics.total_calls += 1;

        if call.callback {
            metrics.callbacks += 1;
        }

        if call.direction.as_deref() == Some("outbound") {
            metrics.outbound_calls += 1;
            return;
        }

        metrics.inbound_calls += 1;
        if call.voicemail {
            metrics.voicemails += 1;
            metrics.unanswered_calls += 1;
        } else if self.is_answered(call) {
            metrics.answered_calls += 1;
            metrics.total_duration_secs += call.duration.unwrap_or(0);
        } else {
            metrics.unanswered_calls += 1;
        }
    }
}
