use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("invalid table reference '{reference}', expected project.dataset.table")]
    InvalidTableReference { reference: String },

    #[error("duplicate dimension '{name}' for table '{table}'")]
    DuplicateDimension { name: String, table: String },

    #[error("duplicate measure '{name}' for table '{table}'")]
    DuplicateMeasure { name: String, table: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    System,
}

impl GenError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GenError::ApiError(_) | GenError::HttpStatusError { .. } => ErrorCategory::Network,
            GenError::ConfigError { .. }
            | GenError::InvalidConfigValueError { .. }
            | GenError::MissingConfigError { .. } => ErrorCategory::Configuration,
            GenError::SerializationError(_)
            | GenError::YamlError(_)
            | GenError::ZipError(_)
            | GenError::InvalidTableReference { .. }
            | GenError::DuplicateDimension { .. }
            | GenError::DuplicateMeasure { .. }
            | GenError::ProcessingError { .. } => ErrorCategory::Data,
            GenError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            GenError::ApiError(_) | GenError::HttpStatusError { .. } => {
                "Check network connectivity and that the URI is reachable".to_string()
            }
            GenError::ConfigError { .. }
            | GenError::InvalidConfigValueError { .. }
            | GenError::MissingConfigError { .. } => {
                "Review the command-line arguments and input files".to_string()
            }
            GenError::DuplicateDimension { table, .. }
            | GenError::DuplicateMeasure { table, .. } => format!(
                "Rename the conflicting column in '{}' or drop it from the view",
                table
            ),
            GenError::InvalidTableReference { .. } => {
                "Table references must be fully qualified as project.dataset.table".to_string()
            }
            GenError::ZipError(_) => {
                "Verify the generated-SQL archive is a valid zip file".to_string()
            }
            GenError::SerializationError(_) | GenError::YamlError(_) => {
                "Check the input file for syntax errors".to_string()
            }
            GenError::IoError(_) => "Check file permissions and free disk space".to_string(),
            GenError::ProcessingError { .. } => {
                "Inspect the namespace definitions for inconsistencies".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GenError::DuplicateDimension { .. } | GenError::DuplicateMeasure { .. } => {
                format!("Error: {}", self)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GenError>;
