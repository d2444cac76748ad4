//! Consultation service.
//!
//! Ties the engine, the consultation store, the credential store and report rendering
//! together behind one type that the CLI and the REST API share.

use crate::auth::CredentialStore;
use crate::config::CoreConfig;
use crate::report::{render_report, ReportContext};
use crate::store::{ConsultationRecord, ConsultationStore};
use crate::validation::validate_patient_info;
use crate::{ConsultError, ConsultResult};
use chrono::Utc;
use consult_engine::{Answers, DiagnosisResult, Evaluation};
use consult_types::Username;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct ConsultService {
    cfg: Arc<CoreConfig>,
}

impl ConsultService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    pub fn diagnose(&self, answers: &Answers) -> DiagnosisResult {
        consult_engine::infer(answers)
    }

    pub fn evaluate(&self, answers: &Answers) -> Evaluation {
        consult_engine::evaluate(answers)
    }

    /// Persist a consultation for `username`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the patient name or age is missing, otherwise any
    /// storage error from the consultation store.
    pub fn save(
        &self,
        username: &Username,
        answers: &Answers,
        result: &DiagnosisResult,
    ) -> ConsultResult<ConsultationRecord> {
        validate_patient_info(answers)?;
        let record = ConsultationRecord::new(username, answers, result);
        self.store().append(&record)?;
        Ok(record)
    }

    /// Consultations visible to `username`: everything for the admin, otherwise their own.
    pub fn history(&self, username: &Username) -> ConsultResult<Vec<ConsultationRecord>> {
        let store = self.store();
        if self.cfg.is_admin(username) {
            store.list()
        } else {
            store.list_for_user(username)
        }
    }

    /// A single consultation, visible to the clinician who saved it and to the admin.
    ///
    /// # Errors
    ///
    /// - `ConsultError::ConsultationNotFound` if no record has this id
    /// - `ConsultError::NotConsultationOwner` if it was saved by someone else
    pub fn consultation(&self, username: &Username, id: Uuid) -> ConsultResult<ConsultationRecord> {
        let record = self
            .store()
            .get(id)?
            .ok_or(ConsultError::ConsultationNotFound(id))?;
        if record.username != username.as_str() && !self.cfg.is_admin(username) {
            return Err(ConsultError::NotConsultationOwner(id));
        }
        Ok(record)
    }

    /// Render the full markdown report for a consultation.
    pub fn report(&self, username: &Username, answers: &Answers, result: &DiagnosisResult) -> String {
        render_report(&ReportContext {
            generated_by: username.as_str(),
            generated_at: Utc::now(),
            answers,
            result,
            logo_path: self.cfg.logo_path(),
        })
    }

    pub fn credentials(&self) -> CredentialStore {
        CredentialStore::new(&self.cfg)
    }

    fn store(&self) -> ConsultationStore {
        ConsultationStore::new(&self.cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consult_engine::Complaint;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> ConsultService {
        let cfg = CoreConfig::new(dir.path().to_path_buf(), "admin", None).unwrap();
        ConsultService::new(Arc::new(cfg))
    }

    fn user(name: &str) -> Username {
        Username::new(name).unwrap()
    }

    fn answers(name: &str) -> Answers {
        Answers {
            patient_name: Some(name.into()),
            age: Some(40),
            ..Answers::with_complaint(Complaint::BleedingGums)
        }
    }

    #[test]
    fn admin_sees_every_consultation() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);

        for (clinician, patient) in [("doctor1", "A"), ("doctor2", "B"), ("doctor1", "C")] {
            let answers = answers(patient);
            let result = service.diagnose(&answers);
            service.save(&user(clinician), &answers, &result).unwrap();
        }

        assert_eq!(service.history(&user("admin")).unwrap().len(), 3);
        let mine = service.history(&user("doctor1")).unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|r| r.username == "doctor1"));
        assert!(service.history(&user("doctor3")).unwrap().is_empty());
    }

    #[test]
    fn consultation_is_visible_to_its_owner_and_the_admin() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let answers = answers("Sarah Williams");
        let result = service.diagnose(&answers);
        let saved = service.save(&user("doctor1"), &answers, &result).unwrap();

        assert_eq!(service.consultation(&user("doctor1"), saved.id).unwrap(), saved);
        assert_eq!(service.consultation(&user("admin"), saved.id).unwrap(), saved);
        assert!(matches!(
            service.consultation(&user("doctor2"), saved.id),
            Err(ConsultError::NotConsultationOwner(id)) if id == saved.id
        ));

        let missing = Uuid::new_v4();
        assert!(matches!(
            service.consultation(&user("admin"), missing),
            Err(ConsultError::ConsultationNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn save_requires_patient_details() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let answers = Answers::with_complaint(Complaint::Toothache);
        let result = service.diagnose(&answers);

        let err = service.save(&user("doctor1"), &answers, &result).unwrap_err();
        assert!(matches!(err, ConsultError::MissingPatientName));
        assert!(service.history(&user("admin")).unwrap().is_empty());
    }

    #[test]
    fn report_names_the_clinician_and_result() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let answers = answers("Sarah Williams");
        let result = service.diagnose(&answers);

        let report = service.report(&user("doctor1"), &answers, &result);
        assert!(report.contains("Generated by: doctor1"));
        assert!(report.contains("minimal gingival bleeding"));
    }
}
