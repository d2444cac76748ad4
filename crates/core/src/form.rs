//! Multi-step consultation form driver.
//!
//! The form owns the [`Answers`] being collected and the current [`Step`]. Callers edit the
//! answers through [`ConsultationForm::answers_mut`] and move between steps with `next` and
//! `back`; the diagnosis is only produced once the summary step is reached.
//!
//! Steps:
//! 1. `PatientInfo` - name, age, gender, history, vitals, dental chart
//! 2. `Complaint` - presenting complaint and its sub-questions
//! 3. `Summary` - diagnosis and report

use crate::validation::{validate_patient_info, validate_vitals};
use crate::{ConsultError, ConsultResult};
use consult_engine::{Answers, Complaint, DiagnosisResult, Evaluation};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    #[default]
    PatientInfo,
    Complaint,
    Summary,
}

impl Step {
    /// One-based position, as shown in step headers.
    pub fn number(self) -> u8 {
        match self {
            Step::PatientInfo => 1,
            Step::Complaint => 2,
            Step::Summary => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::PatientInfo => "Patient Information",
            Step::Complaint => "Presenting Complaint",
            Step::Summary => "Diagnosis & Report",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConsultationForm {
    step: Step,
    answers: Answers,
}

impl ConsultationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn answers_mut(&mut self) -> &mut Answers {
        &mut self.answers
    }

    pub fn select_complaint(&mut self, complaint: Complaint) {
        self.answers.complaint = Some(complaint);
    }

    /// Advance one step after validating the current one.
    ///
    /// # Errors
    ///
    /// - from `PatientInfo`: missing name, invalid age or out-of-range vitals
    /// - from `Complaint`: no complaint selected
    /// - from `Summary`: `ConsultError::InvalidStep`
    ///
    /// On error the step is unchanged.
    pub fn next(&mut self) -> ConsultResult<Step> {
        self.step = match self.step {
            Step::PatientInfo => {
                validate_patient_info(&self.answers)?;
                validate_vitals(&self.answers.vitals)?;
                Step::Complaint
            }
            Step::Complaint => {
                if self.answers.complaint.is_none() {
                    return Err(ConsultError::MissingComplaint);
                }
                Step::Summary
            }
            Step::Summary => {
                return Err(ConsultError::InvalidStep {
                    action: "advance",
                    step: Step::Summary,
                })
            }
        };
        Ok(self.step)
    }

    /// Go back one step. Stays on the first step.
    pub fn back(&mut self) -> Step {
        self.step = match self.step {
            Step::PatientInfo | Step::Complaint => Step::PatientInfo,
            Step::Summary => Step::Complaint,
        };
        self.step
    }

    /// Run the diagnosis engine on the collected answers.
    ///
    /// # Errors
    ///
    /// Returns `ConsultError::InvalidStep` unless the form is on the summary step.
    pub fn diagnose(&self) -> ConsultResult<DiagnosisResult> {
        self.evaluate().map(|eval| eval.result)
    }

    /// Like [`ConsultationForm::diagnose`], including the fired rule identifiers.
    pub fn evaluate(&self) -> ConsultResult<Evaluation> {
        if self.step != Step::Summary {
            return Err(ConsultError::InvalidStep {
                action: "diagnose",
                step: self.step,
            });
        }
        Ok(consult_engine::evaluate(&self.answers))
    }

    /// Start a new consultation.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consult_engine::{PainSeverity, PainTrigger, UrgencyLevel};

    fn filled_patient_info() -> ConsultationForm {
        let mut form = ConsultationForm::new();
        let answers = form.answers_mut();
        answers.patient_name = Some("Sarah Williams".into());
        answers.age = Some(34);
        form
    }

    #[test]
    fn walks_all_steps_and_diagnoses() {
        let mut form = filled_patient_info();
        assert_eq!(form.next().unwrap(), Step::Complaint);

        form.select_complaint(Complaint::Toothache);
        let answers = form.answers_mut();
        answers.pain_severity = Some(PainSeverity::Severe);
        answers.pain_duration_days = Some(5);
        answers.pain_trigger = Some(PainTrigger::Cold);

        assert_eq!(form.next().unwrap(), Step::Summary);
        let result = form.diagnose().unwrap();
        assert_eq!(
            result.diagnoses,
            ["irreversible pulpitis or deep dental caries"]
        );
        assert_eq!(result.urgency_level, UrgencyLevel::Urgent);
    }

    #[test]
    fn patient_step_blocks_without_name_or_age() {
        let mut form = ConsultationForm::new();
        assert!(matches!(form.next(), Err(ConsultError::MissingPatientName)));
        assert_eq!(form.step(), Step::PatientInfo);

        form.answers_mut().patient_name = Some("Ada".into());
        form.answers_mut().age = Some(0);
        assert!(matches!(form.next(), Err(ConsultError::InvalidAge(_))));
        assert_eq!(form.step(), Step::PatientInfo);
    }

    #[test]
    fn complaint_step_requires_a_complaint() {
        let mut form = filled_patient_info();
        form.next().unwrap();
        let err = form.next().unwrap_err();
        assert!(matches!(err, ConsultError::MissingComplaint));
        assert!(err.is_validation());
        assert_eq!(form.step(), Step::Complaint);
    }

    #[test]
    fn diagnosis_is_only_available_on_summary() {
        let form = filled_patient_info();
        assert!(matches!(
            form.diagnose(),
            Err(ConsultError::InvalidStep {
                action: "diagnose",
                step: Step::PatientInfo
            })
        ));
    }

    #[test]
    fn back_saturates_and_keeps_answers() {
        let mut form = filled_patient_info();
        form.next().unwrap();
        form.select_complaint(Complaint::MouthUlcer);
        form.next().unwrap();

        assert_eq!(form.back(), Step::Complaint);
        assert_eq!(form.back(), Step::PatientInfo);
        assert_eq!(form.back(), Step::PatientInfo);
        assert_eq!(form.answers().complaint, Some(Complaint::MouthUlcer));
    }

    #[test]
    fn summary_cannot_advance_and_reset_starts_over() {
        let mut form = filled_patient_info();
        form.next().unwrap();
        form.select_complaint(Complaint::Other);
        form.next().unwrap();
        assert!(matches!(
            form.next(),
            Err(ConsultError::InvalidStep { .. })
        ));

        form.reset();
        assert_eq!(form.step(), Step::PatientInfo);
        assert_eq!(form.answers(), &Answers::default());
    }
}
