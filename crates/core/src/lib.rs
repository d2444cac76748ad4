//! # Consult Core
//!
//! Everything around the diagnosis engine that a consultation needs:
//! - Multi-step form flow with per-step validation
//! - Append-only JSON-lines consultation store under the data directory
//! - YAML credential store with salted SHA-256 password hashes
//! - Markdown summaries and full reports
//!
//! **No API concerns**: HTTP servers and the command line belong in `api-rest` and `cli`.
//! **No environment access**: binaries resolve [`CoreConfig`] once and pass it in.

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod form;
pub mod report;
pub mod service;
pub mod store;
pub mod validation;

pub use auth::CredentialStore;
pub use config::CoreConfig;
pub use error::{ConsultError, ConsultResult};
pub use form::{ConsultationForm, Step};
pub use report::{render_report, render_summary, ReportContext};
pub use service::ConsultService;
pub use store::{ConsultationRecord, ConsultationStore};

pub use consult_engine::{
    assess, evaluate, infer, Answers, Assessment, Complaint, DiagnosisResult, Evaluation,
    SymptomReport, UrgencyLevel,
};
pub use consult_types::{NonEmptyText, PatientAge, TextError, Username};
pub use uuid::Uuid;
