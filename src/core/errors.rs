use serde::ser::SerializeStruct;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("structural mismatch: {0}")]
    StructuralMismatch(String),
    #[error("extraction failed: {0}")]
    Extraction(String),
    #[error("empty input: {0}")]
    EmptyInput(String),
    #[error("regrouping skipped: {0}")]
    RegroupingInconsistency(String),
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AppError", 2)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Io(_) => "IO_ERROR",
            Self::StructuralMismatch(_) => "STRUCTURAL_MISMATCH",
            Self::Extraction(_) => "EXTRACTION_FAILURE",
            Self::EmptyInput(_) => "EMPTY_INPUT",
            Self::RegroupingInconsistency(_) => "REGROUPING_INCONSISTENCY",
            Self::Timeout(_) => "TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Errors a batch records against one document and keeps going.
    pub fn is_document_local(&self) -> bool {
        matches!(
            self,
            Self::StructuralMismatch(_)
                | Self::Extraction(_)
                | Self::EmptyInput(_)
                | Self::Timeout(_)
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(value: zip::result::ZipError) -> Self {
        Self::Extraction(format!("zip: {value}"))
    }
}

impl From<roxmltree::Error> for AppError {
    fn from(value: roxmltree::Error) -> Self {
        Self::Extraction(format!("xml: {value}"))
    }
}

pub type AppResult<T> = Result<T, AppError>;
