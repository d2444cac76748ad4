//! # API Shared
//!
//! Shared request and response types for the consultation APIs.
//!
//! Contains:
//! - JSON wire types with OpenAPI schemas
//! - Shared services like `HealthService`
//! - API key validation
//!
//! Used by `api-rest`; the CLI talks to `consult-core` directly.

pub mod auth;
pub mod health;

pub use auth::{validate_api_key, AuthError};
pub use health::HealthService;

use consult_core::{
    Answers, Assessment, ConsultationRecord, DiagnosisResult, Evaluation, SymptomReport,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct DiagnoseReq {
    /// Patient answers; every field is optional.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub answers: Answers,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiagnosisRes {
    pub diagnoses: Vec<String>,
    pub recommendations: Vec<String>,
    pub treatment_plan: Vec<String>,
    /// `routine`, `urgent` or `emergency`.
    pub urgency_level: String,
    /// Identifiers of the rules that contributed, in firing order.
    pub fired_rules: Vec<String>,
}

impl From<Evaluation> for DiagnosisRes {
    fn from(eval: Evaluation) -> Self {
        let fired_rules = eval.fired_rules.iter().map(|id| id.to_string()).collect();
        Self {
            fired_rules,
            ..Self::from(eval.result)
        }
    }
}

impl From<DiagnosisResult> for DiagnosisRes {
    fn from(result: DiagnosisResult) -> Self {
        Self {
            urgency_level: result.urgency_level.as_str().to_string(),
            diagnoses: result.diagnoses,
            recommendations: result.recommendations,
            treatment_plan: result.treatment_plan,
            fired_rules: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct AssessReq {
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub comorbidities: Vec<String>,
}

impl From<AssessReq> for SymptomReport {
    fn from(req: AssessReq) -> Self {
        SymptomReport {
            symptoms: req.symptoms,
            age: req.age,
            comorbidities: req.comorbidities,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DifferentialRes {
    pub condition: String,
    pub confidence: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AssessmentRes {
    pub diagnosis: String,
    pub treatment: String,
    pub lab_exams: String,
    pub differential_diagnoses: Vec<DifferentialRes>,
}

impl From<Assessment> for AssessmentRes {
    fn from(a: Assessment) -> Self {
        Self {
            diagnosis: a.diagnosis,
            treatment: a.treatment,
            lab_exams: a.lab_exams,
            differential_diagnoses: a
                .differential_diagnoses
                .into_iter()
                .map(|d| DifferentialRes {
                    condition: d.condition,
                    confidence: d.confidence,
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CredentialsReq {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoginRes {
    pub ok: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RegisterRes {
    pub username: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SaveConsultationReq {
    /// Clinician saving the consultation.
    pub username: String,
    #[schema(value_type = Object)]
    pub answers: Answers,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConsultationRes {
    pub id: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    pub username: String,
    pub patient_name: Option<String>,
    pub age: Option<u32>,
    /// Complaint in the same wire form requests use, e.g. `bleeding_gums`.
    pub complaint: Option<String>,
    pub urgency_level: String,
    pub summary: String,
}

impl From<ConsultationRecord> for ConsultationRes {
    fn from(r: ConsultationRecord) -> Self {
        Self {
            id: r.id.to_string(),
            timestamp: r.timestamp.to_rfc3339(),
            username: r.username,
            patient_name: r.patient_name,
            age: r.age,
            complaint: r.complaint.map(|c| c.as_wire().to_string()),
            urgency_level: r.urgency_level.as_str().to_string(),
            summary: r.summary,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SaveConsultationRes {
    pub consultation: ConsultationRes,
    pub result: DiagnosisRes,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListConsultationsRes {
    pub consultations: Vec<ConsultationRes>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use consult_core::{evaluate, infer, Complaint, Username};

    #[test]
    fn diagnosis_res_carries_fired_rules() {
        let answers = Answers {
            high_fever: true,
            ..Answers::with_complaint(Complaint::MouthUlcer)
        };
        let res = DiagnosisRes::from(evaluate(&answers));
        assert_eq!(res.urgency_level, "emergency");
        assert_eq!(res.fired_rules, ["mouth_ulcer", "urgency.high_fever"]);
    }

    #[test]
    fn consultation_res_uses_wire_complaint() {
        let answers = Answers {
            patient_name: Some("Sarah Williams".into()),
            age: Some(34),
            ..Answers::with_complaint(Complaint::BleedingGums)
        };
        let user = Username::new("doctor1").unwrap();
        let record = ConsultationRecord::new(&user, &answers, &infer(&answers));

        let res = ConsultationRes::from(record);
        assert_eq!(res.complaint.as_deref(), Some("bleeding_gums"));
        assert_eq!(
            Complaint::from_wire(res.complaint.as_deref().unwrap()),
            Complaint::BleedingGums
        );
    }

    #[test]
    fn diagnose_req_accepts_empty_body() {
        let req: DiagnoseReq = serde_json::from_str("{}").unwrap();
        assert_eq!(req.answers, Answers::default());
    }
}
