//! Typed payload schemas for call and ticket analytics.

use serde::{Deserialize, Serialize};

use super::DayPayload;

/// Voice channel metrics for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallDayMetrics {
    /// All calls, both directions
    pub total_calls: u64,
    /// Calls placed by customers
    pub inbound_calls: u64,
    /// Calls placed by agents
    pub outbound_calls: u64,
    /// Inbound calls an agent picked up
    pub answered_calls: u64,
    /// Inbound calls abandoned before an agent picked up
    pub unanswered_calls: u64,
    /// Callback requests
    pub callbacks: u64,
    /// Calls that ended in voicemail
    pub voicemails: u64,
    /// Summed talk duration in seconds
    pub total_duration_secs: u64,
}

impl CallDayMetrics {
    /// Share of inbound calls that were answered, as a percentage.
    pub fn answer_rate(&self) -> f64 {
        let offered = self.answered_calls + self.unanswered_calls;
        if offered == 0 {
            0.0
        } else {
            self.answered_calls as f64 / offered as f64 * 100.0
        }
    }

    /// Convert into an opaque payload.
    pub fn to_payload(&self) -> DayPayload {
        DayPayload::new()
            .with("total_calls", self.total_calls)
            .with("inbound_calls", self.inbound_calls)
            .with("outbound_calls", self.outbound_calls)
            .with("answered_calls", self.answered_calls)
            .with("unanswered_calls", self.unanswered_calls)
            .with("callbacks", self.callbacks)
            .with("voicemails", self.voicemails)
            .with("total_duration_secs", self.total_duration_secs)
    }
}

/// Ticket metrics for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketDayMetrics {
    /// Tickets created that day
    pub total_tickets: u64,
    /// Tickets solved that day
    pub solved_tickets: u64,
    /// Tickets created through the voice channel
    pub voice_tickets: u64,
    /// Good satisfaction ratings
    pub satisfaction_good: u64,
    /// Bad satisfaction ratings
    pub satisfaction_bad: u64,
}

impl TicketDayMetrics {
    /// Convert into an opaque payload.
    pub fn to_payload(&self) -> DayPayload {
        DayPayload::new()
            .with("total_tickets", self.total_tickets)
            .with("solved_tickets", self.solved_tickets)
            .with("voice_tickets", self.voice_tickets)
            .with("satisfaction_good", self.satisfaction_good)
            .with("satisfaction_bad", self.satisfaction_bad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_payload_roundtrip() {
        let metrics = CallDayMetrics {
            total_calls: 12,
            inbound_calls: 10,
            outbound_calls: 2,
            answered_calls: 8,
            unanswered_calls: 2,
            callbacks: 1,
            voicemails: 1,
            total_duration_secs: 3600,
        };

        let payload = metrics.to_payload();
        assert_eq!(payload.metric("answered_calls"), Some(8.0));

        let back: CallDayMetrics = payload.to_typed().unwrap();
        assert_eq!(back, metrics);
    }

    #[test]
    fn test_zeroed_payload_has_every_field() {
        let payload = TicketDayMetrics::default().to_payload();
        assert_eq!(payload.len(), 5);
        assert!(payload.numeric_fields().all(|(_, v)| v == 0.0));
    }

    #[test]
    fn test_partial_payload_decodes_with_defaults() {
        let payload = DayPayload::new().with("total_calls", 4);
        let metrics: CallDayMetrics = payload.to_typed().unwrap();
        assert_eq!(metrics.total_calls, 4);
        assert_eq!(metrics.answered_calls, 0);
    }

    #[test]
    fn test_answer_rate_without_calls() {
        assert_eq!(CallDayMetrics::default().answer_rate(), 0.0);
    }
}
