use thiserror::Error;

/// All errors that can occur in confscope-core.
#[derive(Debug, Error)]
pub enum ConfscopeError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid dataset in {path}: {reason}")]
    InvalidDataset { path: String, reason: String },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Process exit codes used by the CLI.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    NotFound = 2,
    InvalidArgs = 3,
    FileSystemError = 4,
    InvalidInput = 5,
}

impl ConfscopeError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::FileNotFound(_) => ExitCode::NotFound,
            Self::InvalidDataset { .. } | Self::Json(_) => ExitCode::InvalidInput,
            Self::ConfigError(_) | Self::TomlParse(_) | Self::TomlSerialize(_) => {
                ExitCode::InvalidArgs
            }
            Self::Io(_) => ExitCode::FileSystemError,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfscopeError>;
