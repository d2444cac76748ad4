//! Ordered rule tables, one per complaint.
//!
//! Each complaint has two rule layers:
//! - **primary** rules, evaluated top to bottom; the first match supplies the diagnosis,
//!   recommendation and treatment, and nothing after it is consulted for that triple. Every
//!   table ends in an `otherwise` rule so a match always exists.
//! - **additive** rules, each evaluated on its own regardless of the primary match; a match
//!   appends one recommendation.
//!
//! Predicates run over a per-complaint *facts* value in which missing answers have already been
//! replaced by their defaults.

use crate::answers::{Answers, BleedingFrequency, PainSeverity, PainTrigger};
use crate::outcome::{Evaluation, UrgencyLevel};

// ============================================================================
// Rule types
// ============================================================================

/// Diagnosis, recommendation and treatment contributed by a primary rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub diagnosis: &'static str,
    pub recommendation: &'static str,
    pub treatment: &'static str,
    /// Urgency this outcome raises the result to, if any.
    pub escalation: Option<UrgencyLevel>,
}

/// A mutually exclusive rule within a complaint branch.
pub struct Rule<F> {
    pub id: &'static str,
    pub when: fn(&F) -> bool,
    pub outcome: Outcome,
}

/// A rule that appends a recommendation independently of the primary match.
pub struct AdditiveRule<F> {
    pub id: &'static str,
    pub when: fn(&F) -> bool,
    pub recommendation: &'static str,
}

/// The complete rule set for one complaint.
pub struct RuleSet<F: 'static> {
    pub primary: &'static [Rule<F>],
    pub otherwise: Rule<F>,
    pub additive: &'static [AdditiveRule<F>],
}

impl<F: 'static> RuleSet<F> {
    /// First primary rule whose predicate holds, or `otherwise`.
    pub fn primary_match(&self, facts: &F) -> &Rule<F> {
        self.primary
            .iter()
            .find(|rule| (rule.when)(facts))
            .unwrap_or(&self.otherwise)
    }

    /// Additive rules whose predicates hold, in table order.
    pub fn additive_matches<'a>(
        &'a self,
        facts: &'a F,
    ) -> impl Iterator<Item = &'a AdditiveRule<F>> + 'a {
        self.additive.iter().filter(move |rule| (rule.when)(facts))
    }

    /// Evaluate both layers and append their contributions to `eval`.
    pub(crate) fn apply(&self, facts: &F, eval: &mut Evaluation) {
        let rule = self.primary_match(facts);
        let outcome = &rule.outcome;
        eval.result.diagnoses.push(outcome.diagnosis.to_string());
        eval.result
            .recommendations
            .push(outcome.recommendation.to_string());
        eval.result.treatment_plan.push(outcome.treatment.to_string());
        if let Some(level) = outcome.escalation {
            eval.result.urgency_level.escalate(level);
        }
        eval.record(rule.id);

        for additive in self.additive_matches(facts) {
            eval.result
                .recommendations
                .push(additive.recommendation.to_string());
            eval.record(additive.id);
        }
    }
}

fn always<F>(_: &F) -> bool {
    true
}

// ============================================================================
// Facts (answers with defaults applied)
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToothacheFacts {
    pub severity: PainSeverity,
    pub duration_days: u32,
    pub trigger: PainTrigger,
}

impl ToothacheFacts {
    pub fn from_answers(answers: &Answers) -> Self {
        Self {
            severity: answers.pain_severity.unwrap_or(PainSeverity::Mild),
            duration_days: answers.pain_duration_days.unwrap_or(0),
            trigger: answers.pain_trigger.unwrap_or(PainTrigger::None),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BleedingFacts {
    pub frequency: BleedingFrequency,
    pub duration_days: u32,
    pub swelling_located: bool,
    pub pain_with_swelling: bool,
}

impl BleedingFacts {
    pub fn from_answers(answers: &Answers) -> Self {
        Self {
            frequency: answers
                .bleeding_frequency
                .unwrap_or(BleedingFrequency::Rarely),
            duration_days: answers.bleeding_duration_days.unwrap_or(0),
            swelling_located: answers
                .swelling_location
                .as_deref()
                .is_some_and(|loc| !loc.trim().is_empty()),
            pain_with_swelling: answers.pain_with_swelling.unwrap_or(false),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwellingFacts {
    pub pain: bool,
    pub duration_days: u32,
}

impl SwellingFacts {
    pub fn from_answers(answers: &Answers) -> Self {
        Self {
            pain: answers.pain_with_swelling.unwrap_or(false),
            duration_days: answers.swelling_duration_days.unwrap_or(0),
        }
    }
}

// ============================================================================
// Toothache
// ============================================================================

fn pulpitis(f: &ToothacheFacts) -> bool {
    f.severity == PainSeverity::Severe
        && f.duration_days > 3
        && matches!(f.trigger, PainTrigger::Cold | PainTrigger::Heat)
}

fn cracked_tooth(f: &ToothacheFacts) -> bool {
    matches!(f.severity, PainSeverity::Moderate | PainSeverity::Severe)
        && f.trigger == PainTrigger::Chewing
}

fn sensitivity(f: &ToothacheFacts) -> bool {
    f.severity == PainSeverity::Mild && f.trigger == PainTrigger::None
}

fn prolonged_severe_pain(f: &ToothacheFacts) -> bool {
    f.severity == PainSeverity::Severe && f.duration_days > 7
}

pub static TOOTHACHE: RuleSet<ToothacheFacts> = RuleSet {
    primary: &[
        Rule {
            id: "toothache.pulpitis",
            when: pulpitis,
            outcome: Outcome {
                diagnosis: "irreversible pulpitis or deep dental caries",
                recommendation: "urgent endodontic evaluation",
                treatment: "root canal therapy or extraction",
                escalation: Some(UrgencyLevel::Urgent),
            },
        },
        Rule {
            id: "toothache.cracked_tooth",
            when: cracked_tooth,
            outcome: Outcome {
                diagnosis: "possible cracked tooth or pulp inflammation",
                recommendation: "clinical exam and bite test",
                treatment: "crown or root canal depending on severity",
                escalation: None,
            },
        },
        Rule {
            id: "toothache.sensitivity",
            when: sensitivity,
            outcome: Outcome {
                diagnosis: "tooth sensitivity",
                recommendation: "desensitizing toothpaste",
                treatment: "topical fluoride, monitor",
                escalation: None,
            },
        },
    ],
    otherwise: Rule {
        id: "toothache.unclear",
        when: always,
        outcome: Outcome {
            diagnosis: "unclear etiology",
            recommendation: "further clinical and radiographic evaluation",
            treatment: "clinical and radiographic exam",
            escalation: None,
        },
    },
    additive: &[AdditiveRule {
        id: "toothache.prolonged_severe_pain",
        when: prolonged_severe_pain,
        recommendation: "urgent dental intervention due to prolonged severe pain",
    }],
};

// ============================================================================
// Bleeding gums
// ============================================================================

fn chronic_bleeding(f: &BleedingFacts) -> bool {
    matches!(
        f.frequency,
        BleedingFrequency::Often | BleedingFrequency::Always
    ) && f.duration_days > 7
}

fn acute_bleeding(f: &BleedingFacts) -> bool {
    matches!(
        f.frequency,
        BleedingFrequency::Sometimes | BleedingFrequency::Often
    ) && f.duration_days <= 7
}

fn periodontal_abscess(f: &BleedingFacts) -> bool {
    f.swelling_located && f.pain_with_swelling
}

pub static BLEEDING_GUMS: RuleSet<BleedingFacts> = RuleSet {
    primary: &[
        Rule {
            id: "bleeding.chronic",
            when: chronic_bleeding,
            outcome: Outcome {
                diagnosis: "chronic gingivitis or periodontitis",
                recommendation: "professional cleaning and periodontal assessment",
                treatment: "scaling and root planing, chlorhexidine rinse",
                escalation: None,
            },
        },
        Rule {
            id: "bleeding.acute",
            when: acute_bleeding,
            outcome: Outcome {
                diagnosis: "acute gingivitis",
                recommendation: "professional cleaning and oral hygiene instruction",
                treatment: "chlorhexidine rinse and improved brushing and flossing",
                escalation: None,
            },
        },
    ],
    otherwise: Rule {
        id: "bleeding.minimal",
        when: always,
        outcome: Outcome {
            diagnosis: "minimal gingival bleeding",
            recommendation: "monitor and maintain oral hygiene",
            treatment: "routine cleaning at next visit",
            escalation: None,
        },
    },
    additive: &[AdditiveRule {
        id: "bleeding.periodontal_abscess",
        when: periodontal_abscess,
        recommendation: "possible periodontal abscess; urgent assessment",
    }],
};

// ============================================================================
// Swelling
// ============================================================================

fn abscess(f: &SwellingFacts) -> bool {
    f.pain && f.duration_days > 1
}

fn cyst(f: &SwellingFacts) -> bool {
    !f.pain && f.duration_days > 7
}

pub static SWELLING: RuleSet<SwellingFacts> = RuleSet {
    primary: &[
        Rule {
            id: "swelling.abscess",
            when: abscess,
            outcome: Outcome {
                diagnosis: "dental abscess or cellulitis",
                recommendation: "immediate evaluation; may require drainage",
                treatment: "antibiotics and drainage, possible extraction or root canal",
                escalation: None,
            },
        },
        Rule {
            id: "swelling.cyst",
            when: cyst,
            outcome: Outcome {
                diagnosis: "possible cyst or tumor",
                recommendation: "referral for imaging and specialist evaluation",
                treatment: "biopsy or surgical excision pending imaging",
                escalation: None,
            },
        },
    ],
    otherwise: Rule {
        id: "swelling.mild",
        when: always,
        outcome: Outcome {
            diagnosis: "mild inflammatory swelling",
            recommendation: "monitor; warm saline rinses",
            treatment: "review if swelling persists beyond one week",
            escalation: None,
        },
    },
    additive: &[],
};

// ============================================================================
// Single-outcome complaints
// ============================================================================

pub static MOUTH_ULCER: RuleSet<()> = RuleSet {
    primary: &[],
    otherwise: Rule {
        id: "mouth_ulcer",
        when: always,
        outcome: Outcome {
            diagnosis: "aphthous or traumatic ulcer",
            recommendation: "avoid spicy foods, apply topical analgesic",
            treatment: "topical corticosteroids if severe",
            escalation: None,
        },
    },
    additive: &[],
};

pub static BROKEN_TOOTH: RuleSet<()> = RuleSet {
    primary: &[],
    otherwise: Rule {
        id: "broken_tooth",
        when: always,
        outcome: Outcome {
            diagnosis: "fractured tooth",
            recommendation: "radiographic assessment and restoration planning",
            treatment: "composite restoration, crown, or extraction",
            escalation: None,
        },
    },
    additive: &[],
};

pub static DISCOLORATION: RuleSet<()> = RuleSet {
    primary: &[],
    otherwise: Rule {
        id: "discoloration",
        when: always,
        outcome: Outcome {
            diagnosis: "extrinsic or intrinsic tooth staining",
            recommendation: "evaluate etiology, advise on oral hygiene",
            treatment: "scaling and polishing or bleaching",
            escalation: None,
        },
    },
    additive: &[],
};

/// Used when the complaint is missing, `other`, or unrecognised.
pub static FALLBACK: RuleSet<()> = RuleSet {
    primary: &[],
    otherwise: Rule {
        id: "fallback",
        when: always,
        outcome: Outcome {
            diagnosis: "needs further evaluation",
            recommendation: "complete exam recommended",
            treatment: "pending clinical findings",
            escalation: None,
        },
    },
    additive: &[],
};
