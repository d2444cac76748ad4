use crate::form::Step;
use consult_types::TextError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ConsultError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("patient name is required")]
    MissingPatientName,
    #[error("invalid patient age: {0}")]
    InvalidAge(TextError),
    #[error("a presenting complaint must be selected")]
    MissingComplaint,
    #[error("cannot {action} from the {step} step")]
    InvalidStep { action: &'static str, step: Step },

    #[error("username is already registered: {0}")]
    DuplicateUser(String),

    #[error("consultation not found: {0}")]
    ConsultationNotFound(Uuid),
    #[error("consultation {0} belongs to another user")]
    NotConsultationOwner(Uuid),

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize record: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize record: {0}")]
    Deserialization(serde_json::Error),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),

    #[error("invalid text: {0}")]
    Text(#[from] TextError),
}

impl ConsultError {
    /// Validation failures are reported back to the user and the flow can continue.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConsultError::InvalidInput(_)
                | ConsultError::MissingPatientName
                | ConsultError::InvalidAge(_)
                | ConsultError::MissingComplaint
                | ConsultError::InvalidStep { .. }
                | ConsultError::DuplicateUser(_)
                | ConsultError::Text(_)
        )
    }
}

pub type ConsultResult<T> = std::result::Result<T, ConsultError>;
