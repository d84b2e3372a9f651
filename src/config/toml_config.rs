use crate::processors::ProcessorSpec;
use crate::utils::error::{DispatchError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const PROCESSOR_KINDS: &[&str] = &["echo", "command"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub processor: ProcessorConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// 未設定時維持無上限派發
    pub max_concurrency: Option<usize>,
    pub drain_on_exit: Option<bool>,
    pub drain_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessorConfig {
    pub kind: Option<String>,
    pub command: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub interval_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| DispatchError::ConfigValidationError {
                field: "config".to_string(),
                message: format!("cannot read {}: {}", path.display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DispatchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LINE_CMD})，未定義的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DispatchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn processor_kind(&self) -> &str {
        self.processor.kind.as_deref().unwrap_or("echo")
    }

    pub fn processor_spec(&self) -> Result<ProcessorSpec> {
        match self.processor_kind() {
            "echo" => Ok(ProcessorSpec::Echo),
            "command" => {
                let command =
                    validation::validate_required_field("processor.command", &self.processor.command)?;
                Ok(ProcessorSpec::Command(command.clone()))
            }
            other => Err(DispatchError::InvalidConfigValueError {
                field: "processor.kind".to_string(),
                value: other.to_string(),
                reason: format!("Expected one of: {}", PROCESSOR_KINDS.join(", ")),
            }),
        }
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(limit) = self.dispatch.max_concurrency {
            validation::validate_positive_number("dispatch.max_concurrency", limit, 1)?;
        }

        validation::validate_one_of("processor.kind", self.processor_kind(), PROCESSOR_KINDS)?;
        if self.processor_kind() == "command" {
            let command =
                validation::validate_required_field("processor.command", &self.processor.command)?;
            validation::validate_non_empty_string("processor.command", command)?;
        }

        if let Some(interval) = self.monitoring.as_ref().and_then(|m| m.interval_seconds) {
            validation::validate_range("monitoring.interval_seconds", interval, 1, 3600)?;
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[dispatch]
max_concurrency = 8
drain_on_exit = true
drain_timeout_seconds = 30

[processor]
kind = "command"
command = "sh -c 'wc -c'"

[monitoring]
enabled = true
interval_seconds = 2
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.dispatch.max_concurrency, Some(8));
        assert_eq!(config.dispatch.drain_on_exit, Some(true));
        assert_eq!(config.dispatch.drain_timeout_seconds, Some(30));
        assert!(config.monitoring_enabled());
        assert_eq!(
            config.processor_spec().unwrap(),
            ProcessorSpec::Command("sh -c 'wc -c'".to_string())
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_defaults_to_unbounded_echo() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.dispatch.max_concurrency, None);
        assert_eq!(config.processor_spec().unwrap(), ProcessorSpec::Echo);
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LINE_FANOUT_TEST_COMMAND", "cat");

        let toml_content = r#"
[processor]
kind = "command"
command = "${LINE_FANOUT_TEST_COMMAND}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.processor.command.as_deref(), Some("cat"));

        std::env::remove_var("LINE_FANOUT_TEST_COMMAND");
    }

    #[test]
    fn test_config_validation() {
        let zero_limit = TomlConfig::from_toml_str("[dispatch]\nmax_concurrency = 0\n").unwrap();
        assert!(zero_limit.validate().is_err());

        let unknown_kind = TomlConfig::from_toml_str("[processor]\nkind = \"markdown\"\n").unwrap();
        assert!(unknown_kind.validate().is_err());

        let missing_command = TomlConfig::from_toml_str("[processor]\nkind = \"command\"\n").unwrap();
        assert!(matches!(
            missing_command.validate(),
            Err(DispatchError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[dispatch]\nmax_concurrency = 2\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.dispatch.max_concurrency, Some(2));

        assert!(TomlConfig::from_file("/nonexistent/line-fanout.toml").is_err());
    }
}
