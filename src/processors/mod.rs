// Concrete line processors the CLI can plug into the dispatcher.

pub mod command;
pub mod echo;

pub use command::CommandProcessor;
pub use echo::EchoProcessor;

use crate::domain::ports::LineProcessor;
use crate::utils::error::Result;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessorSpec {
    Echo,
    Command(String),
}

impl ProcessorSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessorSpec::Echo => "echo",
            ProcessorSpec::Command(_) => "command",
        }
    }
}

pub fn build_processor(spec: &ProcessorSpec) -> Result<Arc<dyn LineProcessor>> {
    let processor: Arc<dyn LineProcessor> = match spec {
        ProcessorSpec::Echo => Arc::new(EchoProcessor::stdout()),
        ProcessorSpec::Command(command_line) => {
            let processor = CommandProcessor::parse(command_line)?;
            tracing::debug!(
                "Command processor: program={} args={:?}",
                processor.program(),
                processor.args()
            );
            Arc::new(processor)
        }
    };
    Ok(processor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_processor_reports_setup_errors() {
        assert!(build_processor(&ProcessorSpec::Echo).is_ok());
        assert!(build_processor(&ProcessorSpec::Command("cat".to_string())).is_ok());
        assert!(build_processor(&ProcessorSpec::Command(String::new())).is_err());
    }
}
