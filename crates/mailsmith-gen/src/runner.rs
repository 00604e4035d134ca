//! External command execution.
//!
//! The scaffolding tool and the site builder are separate programs. Running
//! them sits behind a trait so the pipeline can be tested without either tool
//! installed.

use std::process::{Command, ExitStatus};

/// Errors from running an external command.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}")]
    Failed { command: String, status: ExitStatus },
}

/// Runs an external command to completion.
pub trait CommandRunner {
    /// Run `program` with `args`, returning an error on spawn failure or a
    /// nonzero exit.
    fn run(&self, program: &str, args: &[String]) -> Result<(), RunError>;
}

/// Production runner backed by `std::process`, with stdio inherited so the
/// external tool's own output reaches the user.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<(), RunError> {
        let rendered = render_command(program, args);
        tracing::debug!("running `{rendered}`");

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| RunError::Spawn {
                command: rendered.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(RunError::Failed {
                command: rendered,
                status,
            })
        }
    }
}

fn render_command(program: &str, args: &[String]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}
