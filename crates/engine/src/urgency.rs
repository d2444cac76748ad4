//! Risk-flag urgency layer.
//!
//! Runs after the complaint branch. Urgency only ever rises: a rule outcome may already have
//! raised it to `urgent`, and the risk flags here can raise it further to `emergency`.

use crate::answers::Answers;
use crate::outcome::{Evaluation, UrgencyLevel};

/// A risk flag that forces a minimum urgency whatever the complaint.
struct RiskFlag {
    id: &'static str,
    raised: fn(&Answers) -> bool,
    level: UrgencyLevel,
}

fn high_fever(answers: &Answers) -> bool {
    answers.high_fever
}

fn difficulty_swallowing(answers: &Answers) -> bool {
    answers.difficulty_swallowing
}

static RISK_FLAGS: &[RiskFlag] = &[
    RiskFlag {
        id: "urgency.high_fever",
        raised: high_fever,
        level: UrgencyLevel::Emergency,
    },
    RiskFlag {
        id: "urgency.difficulty_swallowing",
        raised: difficulty_swallowing,
        level: UrgencyLevel::Emergency,
    },
];

pub(crate) fn apply_risk_flags(answers: &Answers, eval: &mut Evaluation) {
    for flag in RISK_FLAGS.iter().filter(|flag| (flag.raised)(answers)) {
        eval.result.urgency_level.escalate(flag.level);
        eval.record(flag.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_leave_urgency_untouched() {
        let mut eval = Evaluation::default();
        eval.result.urgency_level = UrgencyLevel::Urgent;
        apply_risk_flags(&Answers::default(), &mut eval);
        assert_eq!(eval.result.urgency_level, UrgencyLevel::Urgent);
        assert!(eval.fired_rules.is_empty());
    }

    #[test]
    fn both_flags_are_recorded_and_give_emergency() {
        let answers = Answers {
            high_fever: true,
            difficulty_swallowing: true,
            ..Answers::default()
        };
        let mut eval = Evaluation::default();
        apply_risk_flags(&answers, &mut eval);
        assert_eq!(eval.result.urgency_level, UrgencyLevel::Emergency);
        assert_eq!(
            eval.fired_rules,
            ["urgency.high_fever", "urgency.difficulty_swallowing"]
        );
    }
}
