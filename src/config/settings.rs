use crate::config::toml_config::TomlConfig;
use crate::domain::ports::ConfigProvider;
use crate::processors::ProcessorSpec;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;

pub const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_secs(5);

/// Effective settings after layering defaults, the TOML file and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub max_concurrency: Option<usize>,
    pub drain_on_exit: bool,
    pub drain_timeout: Option<Duration>,
    pub processor: ProcessorSpec,
    pub monitor: bool,
    pub monitor_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_concurrency: None,
            drain_on_exit: false,
            drain_timeout: None,
            processor: ProcessorSpec::Echo,
            monitor: false,
            monitor_interval: DEFAULT_MONITOR_INTERVAL,
        }
    }
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Result<Self> {
        config.validate()?;

        let defaults = Self::default();
        Ok(Self {
            max_concurrency: config.dispatch.max_concurrency,
            drain_on_exit: config.dispatch.drain_on_exit.unwrap_or(defaults.drain_on_exit),
            drain_timeout: config.dispatch.drain_timeout_seconds.map(Duration::from_secs),
            processor: config.processor_spec()?,
            monitor: config.monitoring_enabled(),
            monitor_interval: config
                .monitoring
                .as_ref()
                .and_then(|m| m.interval_seconds)
                .map(Duration::from_secs)
                .unwrap_or(defaults.monitor_interval),
        })
    }

    /// CLI flags win over the TOML file, which wins over defaults.
    #[cfg(feature = "cli")]
    pub fn resolve(cli: &crate::config::CliConfig) -> Result<Self> {
        let mut settings = match &cli.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                Self::from_toml(&TomlConfig::from_file(path)?)?
            }
            None => Self::default(),
        };

        if let Some(limit) = cli.max_concurrency {
            settings.max_concurrency = Some(limit);
        }
        if cli.drain {
            settings.drain_on_exit = true;
        }
        if let Some(secs) = cli.drain_timeout_secs {
            settings.drain_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(command) = &cli.exec {
            settings.processor = ProcessorSpec::Command(command.clone());
        }
        if cli.monitor {
            settings.monitor = true;
        }

        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        if let Some(limit) = self.max_concurrency {
            validation::validate_positive_number("max_concurrency", limit, 1)?;
        }
        if let ProcessorSpec::Command(command) = &self.processor {
            validation::validate_non_empty_string("exec", command)?;
        }
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    fn drain_on_exit(&self) -> bool {
        self.drain_on_exit
    }

    fn drain_timeout(&self) -> Option<Duration> {
        self.drain_timeout
    }
}
