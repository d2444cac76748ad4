//! Text rendering of consultation results.
//!
//! The engine returns structured sequences; everything that turns them into prose lives here.
//! Reports are markdown so they can be shown in a terminal, served over HTTP, or handed to a
//! document converter.

use chrono::{DateTime, Utc};
use consult_engine::{Answers, DiagnosisResult, ToothStatus, Wire, FDI_QUADRANTS};
use std::fmt::Write as _;
use std::path::Path;

/// Markdown summary of a diagnosis result.
///
/// ```text
/// **Possible Diagnoses:**
/// - a; b
///
/// **Recommendations:**
/// - ...
/// ```
pub fn render_summary(result: &DiagnosisResult) -> String {
    format!(
        "**Possible Diagnoses:**  \n- {}\n\n**Recommendations:**  \n- {}\n\n**Treatment Plan:**  \n- {}\n\n**Urgency:** {}",
        result.diagnoses.join("; "),
        result.recommendations.join("; "),
        result.treatment_plan.join("; "),
        result.urgency_level
    )
}

/// The summary flattened onto one line, for row-oriented storage.
pub fn summary_line(result: &DiagnosisResult) -> String {
    render_summary(result).replace('\n', " ")
}

/// Everything needed to render a full report.
pub struct ReportContext<'a> {
    pub generated_by: &'a str,
    pub generated_at: DateTime<Utc>,
    pub answers: &'a Answers,
    pub result: &'a DiagnosisResult,
    /// Logo image; skipped without complaint if the file is missing.
    pub logo_path: Option<&'a Path>,
}

/// Render a full consultation report as markdown.
pub fn render_report(ctx: &ReportContext<'_>) -> String {
    let answers = ctx.answers;
    let mut out = String::new();

    if let Some(logo) = ctx.logo_path {
        if logo.is_file() {
            let _ = writeln!(out, "![Logo]({})\n", logo.display());
        } else {
            tracing::debug!("report logo not found at {}, skipping", logo.display());
        }
    }

    let _ = writeln!(out, "# Consultation Report\n");
    let _ = writeln!(out, "Generated by: {}  ", ctx.generated_by);
    let _ = writeln!(
        out,
        "Date: {}\n",
        ctx.generated_at.format("%Y-%m-%d %H:%M:%S")
    );

    out.push_str("## Patient\n\n");
    field(&mut out, "Name", answers.patient_name.as_deref());
    field(&mut out, "Age", answers.age.map(|a| a.to_string()).as_deref());
    field(&mut out, "Gender", answers.gender.map(Wire::to_wire));
    out.push('\n');

    out.push_str("## Presenting Complaint\n\n");
    field(
        &mut out,
        "Complaint",
        Some(answers.complaint.as_ref().map_or("not recorded", |c| c.label())),
    );
    field(&mut out, "Pain severity", answers.pain_severity.map(Wire::to_wire));
    field(
        &mut out,
        "Pain duration (days)",
        answers.pain_duration_days.map(|d| d.to_string()).as_deref(),
    );
    field(&mut out, "Pain trigger", answers.pain_trigger.map(Wire::to_wire));
    field(
        &mut out,
        "Bleeding frequency",
        answers.bleeding_frequency.map(Wire::to_wire),
    );
    field(
        &mut out,
        "Bleeding duration (days)",
        answers.bleeding_duration_days.map(|d| d.to_string()).as_deref(),
    );
    field(&mut out, "Swelling location", answers.swelling_location.as_deref());
    field(
        &mut out,
        "Swelling duration (days)",
        answers.swelling_duration_days.map(|d| d.to_string()).as_deref(),
    );
    field(
        &mut out,
        "Pain with swelling",
        answers.pain_with_swelling.map(yes_no),
    );
    out.push('\n');

    let flags: Vec<&str> = [
        (answers.high_fever, "High fever"),
        (answers.difficulty_swallowing, "Difficulty swallowing"),
        (answers.recent_facial_trauma, "Recent facial trauma"),
        (answers.rapid_symptom_worsening, "Rapidly worsening symptoms"),
    ]
    .into_iter()
    .filter_map(|(set, label)| set.then_some(label))
    .collect();
    if !flags.is_empty() {
        out.push_str("## Risk Flags\n\n");
        for flag in flags {
            let _ = writeln!(out, "- {flag}");
        }
        out.push('\n');
    }

    let history = &answers.medical_history;
    let conditions: Vec<&str> = [
        (history.diabetes, "Diabetic"),
        (history.smoking, "Smoker"),
        (history.bleeding_disorder, "Bleeding disorder"),
    ]
    .into_iter()
    .filter_map(|(set, label)| set.then_some(label))
    .collect();
    let allergies = history.allergies.as_deref().filter(|a| !a.trim().is_empty());
    if !conditions.is_empty() || allergies.is_some() || history.last_dental_visit.is_some() {
        out.push_str("## Medical History\n\n");
        if !conditions.is_empty() {
            field(&mut out, "Conditions", Some(&conditions.join(", ")));
        }
        field(&mut out, "Known allergies", allergies);
        field(
            &mut out,
            "Last dental visit",
            history.last_dental_visit.map(Wire::to_wire),
        );
        out.push('\n');
    }

    let vitals = &answers.vitals;
    if vitals.blood_pressure.is_some() || vitals.temperature_c.is_some() || vitals.pulse_bpm.is_some()
    {
        out.push_str("## Vital Signs\n\n");
        field(&mut out, "Blood pressure", vitals.blood_pressure.as_deref());
        field(
            &mut out,
            "Temperature (°C)",
            vitals.temperature_c.map(|t| format!("{t:.1}")).as_deref(),
        );
        field(
            &mut out,
            "Pulse (bpm)",
            vitals.pulse_bpm.map(|p| p.to_string()).as_deref(),
        );
        out.push('\n');
    }

    let charted: Vec<(u8, ToothStatus)> = FDI_QUADRANTS
        .iter()
        .flat_map(|(_, teeth)| teeth.iter())
        .filter_map(|tooth| {
            answers
                .dental_chart
                .get(tooth)
                .filter(|status| **status != ToothStatus::Normal)
                .map(|status| (*tooth, *status))
        })
        .collect();
    if !charted.is_empty() {
        out.push_str("## Dental Chart\n\n");
        for (tooth, status) in charted {
            let _ = writeln!(out, "- Tooth {tooth}: {}", status.to_wire());
        }
        out.push('\n');
    }

    out.push_str("## Diagnosis\n\n");
    out.push_str(&render_summary(ctx.result));
    out.push('\n');
    out
}

fn field(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        let _ = writeln!(out, "- {label}: {value}");
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consult_engine::{infer, Complaint, PainSeverity, UrgencyLevel};
    use tempfile::TempDir;

    fn sample() -> (Answers, DiagnosisResult) {
        let mut answers = Answers {
            patient_name: Some("Sarah Williams".into()),
            age: Some(34),
            pain_severity: Some(PainSeverity::Severe),
            pain_duration_days: Some(10),
            high_fever: true,
            ..Answers::with_complaint(Complaint::Toothache)
        };
        answers.dental_chart.insert(16, ToothStatus::Caries);
        answers.dental_chart.insert(11, ToothStatus::Normal);
        let result = infer(&answers);
        (answers, result)
    }

    fn context<'a>(
        answers: &'a Answers,
        result: &'a DiagnosisResult,
        logo_path: Option<&'a Path>,
    ) -> ReportContext<'a> {
        ReportContext {
            generated_by: "doctor1",
            generated_at: DateTime::parse_from_rfc3339("2026-01-23T13:58:04Z")
                .unwrap()
                .with_timezone(&Utc),
            answers,
            result,
            logo_path,
        }
    }

    #[test]
    fn summary_joins_items_with_semicolons() {
        let result = DiagnosisResult {
            diagnoses: vec!["a".into()],
            recommendations: vec!["b".into(), "c".into()],
            treatment_plan: vec!["d".into()],
            urgency_level: UrgencyLevel::Urgent,
        };
        assert_eq!(
            render_summary(&result),
            "**Possible Diagnoses:**  \n- a\n\n**Recommendations:**  \n- b; c\n\n**Treatment Plan:**  \n- d\n\n**Urgency:** urgent"
        );
        assert!(!summary_line(&result).contains('\n'));
    }

    #[test]
    fn report_lists_answers_and_non_normal_teeth() {
        let (answers, result) = sample();
        let report = render_report(&context(&answers, &result, None));

        assert!(report.starts_with("# Consultation Report"));
        assert!(report.contains("Date: 2026-01-23 13:58:04"));
        assert!(report.contains("- Name: Sarah Williams"));
        assert!(report.contains("- Complaint: Toothache"));
        assert!(report.contains("- High fever"));
        assert!(report.contains("- Tooth 16: caries"));
        assert!(!report.contains("Tooth 11"));
        assert!(report.contains("**Urgency:** emergency"));
        assert!(!report.contains("## Vital Signs"));
    }

    #[test]
    fn missing_logo_is_skipped_silently() {
        let (answers, result) = sample();
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("logo.png");
        let report = render_report(&context(&answers, &result, Some(&missing)));
        assert!(!report.contains("![Logo]"));
        assert!(report.starts_with("# Consultation Report"));
    }

    #[test]
    fn present_logo_is_referenced_first() {
        let (answers, result) = sample();
        let dir = TempDir::new().unwrap();
        let logo = dir.path().join("logo.png");
        std::fs::write(&logo, b"png").unwrap();
        let report = render_report(&context(&answers, &result, Some(&logo)));
        assert!(report.starts_with("![Logo]("));
    }
}
