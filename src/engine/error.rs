//! Engine Error Types

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The scanner did not finish within the wall-clock budget
    #[error("scan timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The scanner exited non-zero. The Display form matches the scanner's
    /// exit convention so the parser can recognise a detection.
    #[error("exit status {code}")]
    ExitStatus { code: i32 },

    #[error("failed to launch {program}: {cause}")]
    Launch { program: String, cause: String },

    #[error("{path}: {cause}")]
    Io { path: String, cause: String },

    #[error("could not find Ikarus license file: {path}")]
    LicenseMissing { path: String },

    #[error("invalid license end date '{value}': {cause}")]
    LicenseDate { value: String, cause: String },

    #[error("missing scanner binary: {path}")]
    BinaryMissing { path: String },

    #[error("{binary} is not executable! Use chmod +x to fix it!")]
    NotExecutable { binary: String },
}

impl EngineError {
    /// The scanner signals a detection by exiting with status 1, which is a
    /// successful scan as far as callers are concerned.
    pub fn is_detection(&self) -> bool {
        matches!(self, EngineError::ExitStatus { code: 1 })
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
