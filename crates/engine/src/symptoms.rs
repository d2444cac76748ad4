//! Keyword-based scoring of general (non-dental) symptoms.
//!
//! Each known condition lists a few symptom keywords. A condition scores one point per keyword
//! present in the reported symptoms; conditions with no points are dropped and the rest are
//! ranked by score, ties keeping table order. The top condition becomes the primary diagnosis
//! and up to three runners-up are reported as differentials with a confidence relative to it.

use serde::{Deserialize, Serialize};

/// Maximum number of differential diagnoses reported.
const MAX_DIFFERENTIALS: usize = 3;

/// Age above which treatment and lab advice gain an age-related note.
const SENIOR_AGE: u32 = 60;

struct ConditionProfile {
    condition: &'static str,
    keywords: &'static [&'static str],
    treatment: &'static str,
    lab_exams: &'static str,
}

static CONDITIONS: &[ConditionProfile] = &[
    ConditionProfile {
        condition: "Upper respiratory tract infection (URTI)",
        keywords: &["fever", "cough", "sore throat"],
        treatment: "Paracetamol, rest, fluids",
        lab_exams: "CBC, COVID-19 test",
    },
    ConditionProfile {
        condition: "Dental infection",
        keywords: &["toothache", "gum pain", "swelling"],
        treatment: "Amoxicillin, Diclofenac, dental referral",
        lab_exams: "Panoramic X-ray",
    },
    ConditionProfile {
        condition: "Gastroenteritis",
        keywords: &["diarrhea", "vomiting", "abdominal pain"],
        treatment: "Oral rehydration salts, zinc, Metronidazole",
        lab_exams: "Stool analysis, culture",
    },
    ConditionProfile {
        condition: "Tension headache or migraine",
        keywords: &["headache", "migraine", "nausea"],
        treatment: "Paracetamol or Ibuprofen, hydration, rest",
        lab_exams: "Blood pressure check, optional CT if persistent",
    },
];

/// Symptoms reported for a general assessment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomReport {
    pub symptoms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default)]
    pub comorbidities: Vec<String>,
}

/// A condition with its keyword score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoredCondition {
    pub condition: &'static str,
    pub score: usize,
    pub treatment: &'static str,
    pub lab_exams: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Differential {
    pub condition: String,
    /// Relative to the primary score, e.g. `66.7%`.
    pub confidence: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub diagnosis: String,
    pub treatment: String,
    pub lab_exams: String,
    pub differential_diagnoses: Vec<Differential>,
}

/// Score every known condition against the symptoms and rank the matches.
pub fn score_conditions(symptoms: &[String]) -> Vec<ScoredCondition> {
    let lowered: Vec<String> = symptoms
        .iter()
        .map(|s| s.trim().to_lowercase())
        .collect();

    let mut scored: Vec<ScoredCondition> = CONDITIONS
        .iter()
        .map(|profile| ScoredCondition {
            condition: profile.condition,
            score: profile
                .keywords
                .iter()
                .filter(|kw| lowered.iter().any(|s| s == *kw))
                .count(),
            treatment: profile.treatment,
            lab_exams: profile.lab_exams,
        })
        .filter(|c| c.score > 0)
        .collect();

    // Stable sort keeps table order between equal scores.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Assess a symptom report. Total: an unmatched report yields supportive-care advice.
pub fn assess(report: &SymptomReport) -> Assessment {
    let scored = score_conditions(&report.symptoms);

    let Some(primary) = scored.first() else {
        return Assessment {
            diagnosis: "No matching condition found".into(),
            treatment: "Supportive care, follow up if symptoms worsen".into(),
            lab_exams: "Basic CBC and Urinalysis".into(),
            differential_diagnoses: Vec::new(),
        };
    };

    let mut treatment = primary.treatment.to_string();
    let mut lab_exams = primary.lab_exams.to_string();

    if report.age.is_some_and(|age| age > SENIOR_AGE) {
        treatment.push_str("; monitor closely due to age");
        lab_exams.push_str(", EKG if cardiac symptoms");
    }
    if !report.comorbidities.is_empty() {
        treatment.push_str("; consider interactions with existing medications");
    }

    let differential_diagnoses = scored
        .iter()
        .skip(1)
        .take(MAX_DIFFERENTIALS)
        .map(|c| Differential {
            condition: c.condition.to_string(),
            confidence: format!("{:.1}%", c.score as f64 / primary.score as f64 * 100.0),
        })
        .collect();

    Assessment {
        diagnosis: primary.condition.to_string(),
        treatment,
        lab_exams,
        differential_diagnoses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symptoms(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ranks_by_score_and_keeps_table_order_on_ties() {
        let scored = score_conditions(&symptoms(&["Headache", "nausea", "toothache", "fever"]));
        let names: Vec<_> = scored.iter().map(|c| (c.condition, c.score)).collect();
        assert_eq!(
            names,
            [
                ("Tension headache or migraine", 2),
                ("Upper respiratory tract infection (URTI)", 1),
                ("Dental infection", 1),
            ]
        );
    }

    #[test]
    fn no_match_gives_supportive_care() {
        let assessment = assess(&SymptomReport {
            symptoms: symptoms(&["itchy elbow"]),
            ..SymptomReport::default()
        });
        assert_eq!(assessment.diagnosis, "No matching condition found");
        assert_eq!(assessment.lab_exams, "Basic CBC and Urinalysis");
        assert!(assessment.differential_diagnoses.is_empty());
    }

    #[test]
    fn differentials_carry_relative_confidence() {
        let assessment = assess(&SymptomReport {
            symptoms: symptoms(&["fever", "cough", "sore throat", "vomiting", "headache"]),
            ..SymptomReport::default()
        });
        assert_eq!(
            assessment.diagnosis,
            "Upper respiratory tract infection (URTI)"
        );
        assert_eq!(
            assessment.differential_diagnoses,
            vec![
                Differential {
                    condition: "Gastroenteritis".into(),
                    confidence: "33.3%".into(),
                },
                Differential {
                    condition: "Tension headache or migraine".into(),
                    confidence: "33.3%".into(),
                },
            ]
        );
    }

    #[test]
    fn personalises_for_age_and_comorbidities() {
        let assessment = assess(&SymptomReport {
            symptoms: symptoms(&["toothache", "swelling"]),
            age: Some(72),
            comorbidities: symptoms(&["hypertension"]),
        });
        assert_eq!(
            assessment.treatment,
            "Amoxicillin, Diclofenac, dental referral; monitor closely due to age; consider interactions with existing medications"
        );
        assert_eq!(
            assessment.lab_exams,
            "Panoramic X-ray, EKG if cardiac symptoms"
        );
    }

    #[test]
    fn age_sixty_is_not_senior() {
        let assessment = assess(&SymptomReport {
            symptoms: symptoms(&["diarrhea"]),
            age: Some(60),
            ..SymptomReport::default()
        });
        assert_eq!(
            assessment.treatment,
            "Oral rehydration salts, zinc, Metronidazole"
        );
    }
}
