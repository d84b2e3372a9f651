use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Input stream error: {0}")]
    Input(#[from] std::io::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Processor setup failed: {message}")]
    ProcessorSetupError { message: String },

    #[error("Failed to start a thread for line {index}: {source}")]
    UnitSpawn {
        index: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Runtime error: {message}")]
    Runtime { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Processor,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DispatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DispatchError::ConfigValidationError { .. }
            | DispatchError::InvalidConfigValueError { .. }
            | DispatchError::MissingConfigError { .. } => ErrorCategory::Configuration,
            DispatchError::ProcessorSetupError { .. } => ErrorCategory::Processor,
            DispatchError::Input(_) => ErrorCategory::Input,
            DispatchError::UnitSpawn { .. } | DispatchError::Runtime { .. } => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Processor => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 對應 CLI 的退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DispatchError::Input(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                "Standard input contained bytes that are not valid UTF-8".to_string()
            }
            DispatchError::Input(e) => format!("Failed to read standard input: {}", e),
            DispatchError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            DispatchError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            DispatchError::MissingConfigError { field } => {
                format!("Setting '{}' is required", field)
            }
            DispatchError::ProcessorSetupError { message } => {
                format!("Could not set up the line processor: {}", message)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command line flags and the TOML file passed with --config"
            }
            ErrorCategory::Processor => "Check the --exec command or the [processor] section",
            ErrorCategory::Input => "Make sure the input is readable UTF-8 text",
            ErrorCategory::System => "Lower --max-concurrency or raise the process thread limit",
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
