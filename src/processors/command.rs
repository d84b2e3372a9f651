use crate::domain::model::Line;
use crate::domain::ports::LineProcessor;
use crate::utils::error::{DispatchError, Result};
use anyhow::Context;
use std::io::Write;
use std::process::{Command, Stdio};

/// Runs an external program once per line, feeding the line on its stdin.
///
/// The child inherits stdout and stderr, so output from different lines may
/// interleave. A non-zero exit status is reported as a failure of that line.
#[derive(Debug, Clone)]
pub struct CommandProcessor {
    program: String,
    args: Vec<String>,
}

impl CommandProcessor {
    /// Parses a shell-style command line such as `sh -c 'wc -c'`.
    pub fn parse(command_line: &str) -> Result<Self> {
        let mut words =
            shell_words::split(command_line).map_err(|e| DispatchError::ProcessorSetupError {
                message: format!("cannot parse command '{}': {}", command_line, e),
            })?;

        if words.is_empty() {
            return Err(DispatchError::ProcessorSetupError {
                message: "command is empty".to_string(),
            });
        }

        let program = words.remove(0);
        Ok(Self {
            program,
            args: words,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl LineProcessor for CommandProcessor {
    fn process_line(&self, line: Line) -> anyhow::Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("LINE_FANOUT_INDEX", line.index().to_string())
            .stdin(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn '{}'", self.program))?;

        if let Some(mut stdin) = child.stdin.take() {
            // 子行程可能不讀 stdin，BrokenPipe 不算失敗
            if let Err(e) = stdin.write_all(line.text().as_bytes()) {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e).context("failed to write line to child stdin");
                }
            }
        }

        let status = child.wait().context("failed to wait for child")?;
        if !status.success() {
            anyhow::bail!("'{}' exited with {}", self.program, status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_quoted_arguments() {
        let processor = CommandProcessor::parse("sh -c 'read l; test -n \"$l\"'").unwrap();
        assert_eq!(processor.program(), "sh");
        assert_eq!(processor.args(), &["-c", "read l; test -n \"$l\""]);
    }

    #[test]
    fn test_parse_rejects_empty_and_unbalanced() {
        assert!(matches!(
            CommandProcessor::parse("   "),
            Err(DispatchError::ProcessorSetupError { .. })
        ));
        assert!(CommandProcessor::parse("echo 'unterminated").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_decides_outcome() {
        let check = CommandProcessor::parse("sh -c 'read l; test \"$l\" = hello'").unwrap();
        assert!(check.process_line(Line::new(0, "hello\n")).is_ok());
        assert!(check.process_line(Line::new(1, "goodbye\n")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_program_is_a_line_failure() {
        let missing = CommandProcessor::parse("definitely-not-a-real-program-xyz").unwrap();
        let err = missing.process_line(Line::new(0, "x\n")).unwrap_err();
        assert!(err.to_string().contains("failed to spawn"));
    }
}
