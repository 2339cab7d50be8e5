use mch_predictor::PredictorError;
use mch_types::TextError;
use mch_uuid::UuidError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid input: {0}")]
    Text(#[from] TextError),
    #[error("invalid identifier: {0}")]
    Uuid(#[from] UuidError),

    #[error("Mother not found: {0}")]
    SubjectNotFound(String),
    #[error("Medical record not found: {0}")]
    RecordNotFound(String),
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Email already in use")]
    EmailInUse,
    #[error("National identity number already registered")]
    NationalIdInUse,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("failed to hash password: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Predictor(#[from] PredictorError),
    #[error("failed to persist medical record: {source}")]
    PersistenceFailure {
        #[source]
        source: Box<CoreError>,
    },
    #[error(
        "registration failed and cleanup also failed (user: {user_id}): registration={registration_error}; cleanup={cleanup_error}"
    )]
    CleanupAfterRegistrationFailed {
        user_id: String,
        #[source]
        registration_error: Box<CoreError>,
        cleanup_error: Box<CoreError>,
    },

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write document: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read document: {0}")]
    FileRead(std::io::Error),
    #[error("failed to remove document: {0}")]
    FileRemove(std::io::Error),
    #[error("failed to serialize document: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize document: {0}")]
    Deserialization(serde_json::Error),
}

impl CoreError {
    /// True for the "no such thing" family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::SubjectNotFound(_) | CoreError::RecordNotFound(_) | CoreError::UserNotFound(_)
        )
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
