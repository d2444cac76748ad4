//! # Consult Engine
//!
//! Rule-based diagnosis inference for the dental self-consultation tool.
//!
//! This crate is a pure decision function:
//! - [`infer`] maps patient [`Answers`] to a [`DiagnosisResult`]
//! - [`evaluate`] does the same and also reports which rules fired
//! - [`symptoms::assess`] scores general symptoms against a small condition table
//!
//! Nothing here performs I/O, reads process state, or fails. Every missing or unrecognised
//! answer has a default, so any partially filled record produces a result.
//!
//! **No presentation concerns**: rendering, persistence and the form flow belong in
//! `consult-core`.

pub mod answers;
pub mod outcome;
pub mod rules;
pub mod symptoms;
mod urgency;

pub use answers::{
    Answers, BleedingFrequency, Complaint, DentalChart, Gender, LastDentalVisit, MedicalHistory,
    PainSeverity, PainTrigger, ToothStatus, Vitals, Wire, FDI_QUADRANTS,
};
pub use outcome::{DiagnosisResult, Evaluation, UrgencyLevel};
pub use symptoms::{assess, Assessment, Differential, SymptomReport};

use rules::{BleedingFacts, SwellingFacts, ToothacheFacts};

/// Infer diagnoses, recommendations, treatment and urgency from the answers.
pub fn infer(answers: &Answers) -> DiagnosisResult {
    evaluate(answers).result
}

/// Like [`infer`], also returning the identifiers of the rules that fired.
///
/// Evaluation order:
/// 1. the complaint's primary rules (first match wins), then its additive rules
/// 2. the risk-flag urgency layer
pub fn evaluate(answers: &Answers) -> Evaluation {
    let mut eval = Evaluation::default();

    match answers.complaint.as_ref() {
        Some(Complaint::Toothache) => {
            rules::TOOTHACHE.apply(&ToothacheFacts::from_answers(answers), &mut eval)
        }
        Some(Complaint::BleedingGums) => {
            rules::BLEEDING_GUMS.apply(&BleedingFacts::from_answers(answers), &mut eval)
        }
        Some(Complaint::Swelling) => {
            rules::SWELLING.apply(&SwellingFacts::from_answers(answers), &mut eval)
        }
        Some(Complaint::MouthUlcer) => rules::MOUTH_ULCER.apply(&(), &mut eval),
        Some(Complaint::BrokenTooth) => rules::BROKEN_TOOTH.apply(&(), &mut eval),
        Some(Complaint::Discoloration) => rules::DISCOLORATION.apply(&(), &mut eval),
        Some(Complaint::Other) | Some(Complaint::Unrecognised(_)) | None => {
            rules::FALLBACK.apply(&(), &mut eval)
        }
    }

    urgency::apply_risk_flags(answers, &mut eval);
    eval
}
