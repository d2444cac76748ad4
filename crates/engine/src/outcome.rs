//! Engine output types.

use serde::{Deserialize, Serialize};

/// Coarse triage classification. Ordered so that escalation is a `max`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    #[default]
    Routine,
    Urgent,
    Emergency,
}

impl UrgencyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            UrgencyLevel::Routine => "routine",
            UrgencyLevel::Urgent => "urgent",
            UrgencyLevel::Emergency => "emergency",
        }
    }

    /// Raise to `level` if that is more urgent. Never lowers.
    pub fn escalate(&mut self, level: UrgencyLevel) {
        *self = (*self).max(level);
    }
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the engine concluded for one set of answers.
///
/// Sequences keep the order in which rules fired: the primary rule first, then any additive
/// rules. Nothing is sorted or de-duplicated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub diagnoses: Vec<String>,
    pub recommendations: Vec<String>,
    pub treatment_plan: Vec<String>,
    pub urgency_level: UrgencyLevel,
}

/// A [`DiagnosisResult`] together with the identifiers of the rules that produced it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub result: DiagnosisResult,
    /// Rule identifiers in firing order.
    pub fired_rules: Vec<&'static str>,
}

impl Evaluation {
    pub(crate) fn record(&mut self, rule_id: &'static str) {
        self.fired_rules.push(rule_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escalate_never_lowers() {
        let mut level = UrgencyLevel::Emergency;
        level.escalate(UrgencyLevel::Urgent);
        level.escalate(UrgencyLevel::Routine);
        assert_eq!(level, UrgencyLevel::Emergency);

        let mut level = UrgencyLevel::Routine;
        level.escalate(UrgencyLevel::Urgent);
        assert_eq!(level, UrgencyLevel::Urgent);
    }

    #[test]
    fn urgency_serialises_snake_case() {
        let json = serde_json::to_string(&UrgencyLevel::Emergency).expect("serialise");
        assert_eq!(json, "\"emergency\"");
    }
}
