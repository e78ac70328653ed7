use confscope_core::ExitCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    #[error("missing column '{column}' in {source_name}")]
    MissingColumn { column: String, source_name: String },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] confscope_core::ConfscopeError),
}

pub type Result<T> = std::result::Result<T, IngestError>;

impl IngestError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Core(err) => err.exit_code(),
            Self::SheetNotFound(_) => ExitCode::NotFound,
            Self::UnsupportedFormat(_) => ExitCode::InvalidArgs,
            Self::MissingColumn { .. }
            | Self::Xml(_)
            | Self::XmlAttr(_)
            | Self::Spreadsheet(_)
            | Self::Csv(_) => ExitCode::InvalidInput,
            Self::Io(_) => ExitCode::FileSystemError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confscope_core::ConfscopeError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            IngestError::from(ConfscopeError::FileNotFound("x".into())).exit_code(),
            ExitCode::NotFound
        );
        assert_eq!(
            IngestError::MissingColumn {
                column: "Title".into(),
                source_name: "Sheet1".into(),
            }
            .exit_code(),
            ExitCode::InvalidInput
        );
        assert_eq!(
            IngestError::UnsupportedFormat("a.txt".into()).exit_code(),
            ExitCode::InvalidArgs
        );
    }
}
