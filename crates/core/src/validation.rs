//! Input validation for the consultation form.
//!
//! These checks gate step advancement in [`crate::form::ConsultationForm`]. The diagnosis
//! engine itself never validates; it defaults.

use crate::constants::{PULSE_RANGE_BPM, TEMPERATURE_RANGE_C};
use crate::{ConsultError, ConsultResult};
use consult_engine::{Answers, Vitals};
use consult_types::{NonEmptyText, PatientAge};

/// Validates the demographics needed before the complaint step.
///
/// # Errors
///
/// - `ConsultError::MissingPatientName` if the name is absent or blank
/// - `ConsultError::InvalidAge` if the age is absent, zero, or above 120
pub fn validate_patient_info(answers: &Answers) -> ConsultResult<(NonEmptyText, PatientAge)> {
    let name = answers
        .patient_name
        .as_deref()
        .and_then(|n| NonEmptyText::new(n).ok())
        .ok_or(ConsultError::MissingPatientName)?;

    let age = PatientAge::new(answers.age.unwrap_or(0)).map_err(ConsultError::InvalidAge)?;

    Ok((name, age))
}

/// Validates optional vital signs against the ranges the form accepts.
///
/// # Errors
///
/// Returns `ConsultError::InvalidInput` naming the first out-of-range value.
pub fn validate_vitals(vitals: &Vitals) -> ConsultResult<()> {
    if let Some(temp) = vitals.temperature_c {
        if !TEMPERATURE_RANGE_C.contains(&temp) {
            return Err(ConsultError::InvalidInput(format!(
                "temperature must be between {} and {} °C",
                TEMPERATURE_RANGE_C.start(),
                TEMPERATURE_RANGE_C.end()
            )));
        }
    }

    if let Some(pulse) = vitals.pulse_bpm {
        if !PULSE_RANGE_BPM.contains(&pulse) {
            return Err(ConsultError::InvalidInput(format!(
                "pulse must be between {} and {} bpm",
                PULSE_RANGE_BPM.start(),
                PULSE_RANGE_BPM.end()
            )));
        }
    }

    if let Some(bp) = vitals.blood_pressure.as_deref() {
        if !bp.trim().is_empty() && !looks_like_blood_pressure(bp.trim()) {
            return Err(ConsultError::InvalidInput(
                "blood pressure must look like 120/80".into(),
            ));
        }
    }

    Ok(())
}

fn looks_like_blood_pressure(value: &str) -> bool {
    let Some((systolic, diastolic)) = value.split_once('/') else {
        return false;
    };
    let parse = |s: &str| s.trim().parse::<u32>().ok().filter(|v| *v > 0);
    matches!((parse(systolic), parse(diastolic)), (Some(s), Some(d)) if s > d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(name: Option<&str>, age: Option<u32>) -> Answers {
        Answers {
            patient_name: name.map(str::to_string),
            age,
            ..Answers::default()
        }
    }

    #[test]
    fn patient_info_requires_name_and_age() {
        assert!(matches!(
            validate_patient_info(&patient(None, Some(30))),
            Err(ConsultError::MissingPatientName)
        ));
        assert!(matches!(
            validate_patient_info(&patient(Some("   "), Some(30))),
            Err(ConsultError::MissingPatientName)
        ));
        assert!(matches!(
            validate_patient_info(&patient(Some("Ada"), Some(0))),
            Err(ConsultError::InvalidAge(_))
        ));
        assert!(matches!(
            validate_patient_info(&patient(Some("Ada"), None)),
            Err(ConsultError::InvalidAge(_))
        ));

        let (name, age) = validate_patient_info(&patient(Some(" Ada "), Some(36))).unwrap();
        assert_eq!(name.as_str(), "Ada");
        assert_eq!(age.years(), 36);
    }

    #[test]
    fn vitals_are_range_checked() {
        assert!(validate_vitals(&Vitals::default()).is_ok());
        assert!(validate_vitals(&Vitals {
            temperature_c: Some(36.5),
            pulse_bpm: Some(72),
            blood_pressure: Some("120/80".into()),
        })
        .is_ok());
        assert!(validate_vitals(&Vitals {
            temperature_c: Some(47.0),
            ..Vitals::default()
        })
        .is_err());
        assert!(validate_vitals(&Vitals {
            pulse_bpm: Some(200),
            ..Vitals::default()
        })
        .is_err());
        assert!(validate_vitals(&Vitals {
            blood_pressure: Some("high".into()),
            ..Vitals::default()
        })
        .is_err());
    }
}
